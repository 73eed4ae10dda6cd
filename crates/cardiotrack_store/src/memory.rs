//! In-memory measurement store.

use crate::error::{StoreError, StoreResult};
use crate::store::{MeasurementRecord, MeasurementStore, SyncCounts};
use cardiotrack_model::{
    Measurement, MeasurementId, NewMeasurement, SyncState, SyncStatus,
};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
struct Inner {
    records: HashMap<MeasurementId, MeasurementRecord>,
    /// Insertion order, so selection is deterministic.
    order: Vec<MeasurementId>,
}

/// A thread-safe in-memory measurement store.
///
/// Suitable for:
/// - Unit and integration tests
/// - Ephemeral deployments that don't need persistence
///
/// # Thread Safety
///
/// All operations take the inner lock for the duration of the call, so
/// the measurement/ledger pair is always created and observed atomically.
///
/// # Example
///
/// ```rust
/// use cardiotrack_model::{NewMeasurement, PatientId};
/// use cardiotrack_store::{MeasurementStore, MemoryStore};
/// use chrono::Utc;
///
/// let store = MemoryStore::new();
/// let upload = NewMeasurement::new(PatientId::new(), 72, Utc::now());
/// let record = store.create_with_ledger(upload).unwrap();
/// assert!(!record.measurement.synced);
/// ```
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an unavailable backend.
    ///
    /// While set, every operation fails with [`StoreError::Unavailable`].
    /// Exists for testing infrastructure-failure paths.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored measurements.
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("store marked unavailable".into()))
        } else {
            Ok(())
        }
    }
}

impl MeasurementStore for MemoryStore {
    fn create_with_ledger(&self, upload: NewMeasurement) -> StoreResult<MeasurementRecord> {
        self.check_available()?;

        let now = Utc::now();
        let measurement = upload.into_measurement(now);
        let status = SyncStatus::pending(measurement.id, now);
        let record = MeasurementRecord {
            measurement,
            status,
        };

        let mut inner = self.inner.write();
        let id = record.measurement.id;
        if inner.records.contains_key(&id) {
            return Err(StoreError::DuplicateLedgerEntry(id));
        }
        inner.records.insert(id, record.clone());
        inner.order.push(id);

        Ok(record)
    }

    fn find_pending_or_failed_unsynced(
        &self,
        max_retries: u32,
        limit: usize,
    ) -> StoreResult<Vec<MeasurementRecord>> {
        self.check_available()?;

        let inner = self.inner.read();
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id))
            .filter(|r| !r.measurement.synced && r.status.eligible_for_retry(max_retries))
            .take(limit)
            .cloned()
            .collect())
    }

    fn find_by_id(&self, id: MeasurementId) -> StoreResult<Option<MeasurementRecord>> {
        self.check_available()?;
        Ok(self.inner.read().records.get(&id).cloned())
    }

    fn save_measurement(&self, measurement: &Measurement) -> StoreResult<()> {
        self.check_available()?;

        let mut inner = self.inner.write();
        match inner.records.get_mut(&measurement.id) {
            Some(record) => {
                record.measurement = measurement.clone();
                Ok(())
            }
            None => Err(StoreError::UnknownMeasurement(measurement.id)),
        }
    }

    fn save_sync_status(&self, status: &SyncStatus) -> StoreResult<()> {
        self.check_available()?;

        let mut inner = self.inner.write();
        match inner.records.get_mut(&status.measurement_id) {
            Some(record) => {
                record.status = status.clone();
                Ok(())
            }
            None => Err(StoreError::UnknownMeasurement(status.measurement_id)),
        }
    }

    fn counts(&self) -> StoreResult<SyncCounts> {
        self.check_available()?;

        let inner = self.inner.read();
        let mut counts = SyncCounts {
            total: inner.records.len() as u64,
            ..SyncCounts::default()
        };

        for record in inner.records.values() {
            if record.measurement.synced {
                counts.synced += 1;
            }
            match record.status.state {
                SyncState::Pending => counts.pending += 1,
                SyncState::Failed => counts.failed += 1,
                SyncState::Synced => {}
            }
        }

        Ok(counts)
    }
}
