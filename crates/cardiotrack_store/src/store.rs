//! The measurement store trait.

use crate::error::StoreResult;
use cardiotrack_model::{Measurement, MeasurementId, NewMeasurement, SyncStatus};

/// A measurement joined with its ledger entry.
///
/// Selection queries always return the pair, because every decision the
/// sync engine makes needs both halves.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    /// The stored sample.
    pub measurement: Measurement,
    /// Its reconciliation ledger entry.
    pub status: SyncStatus,
}

/// Aggregate reconciliation counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncCounts {
    /// Total stored measurements.
    pub total: u64,
    /// Measurements with `synced = true`.
    pub synced: u64,
    /// Ledger entries in `pending` state.
    pub pending: u64,
    /// Ledger entries in `failed` state.
    pub failed: u64,
}

/// Durable record of heart-rate samples and their sync ledger.
///
/// Implementations must uphold atomic pairing: a measurement and its
/// ledger entry are created in the same logical transaction, and no
/// measurement ever exists without exactly one ledger row.
pub trait MeasurementStore: Send + Sync {
    /// Persists a device upload together with its initial `pending`
    /// ledger entry. Callers validate the upload first.
    fn create_with_ledger(&self, upload: NewMeasurement) -> StoreResult<MeasurementRecord>;

    /// Selects measurements eligible for an automatic sync pass.
    ///
    /// Matches `synced = false` joined with ledger state in
    /// {pending, failed} and `retry_count < max_retries`, bounded to
    /// `limit` records in insertion order.
    fn find_pending_or_failed_unsynced(
        &self,
        max_retries: u32,
        limit: usize,
    ) -> StoreResult<Vec<MeasurementRecord>>;

    /// Looks up a single measurement with its ledger entry.
    fn find_by_id(&self, id: MeasurementId) -> StoreResult<Option<MeasurementRecord>>;

    /// Persists the sync-owned fields of a measurement.
    fn save_measurement(&self, measurement: &Measurement) -> StoreResult<()>;

    /// Persists a ledger entry.
    fn save_sync_status(&self, status: &SyncStatus) -> StoreResult<()>;

    /// Returns the aggregate reconciliation counters.
    fn counts(&self) -> StoreResult<SyncCounts>;
}
