//! The per-measurement reconciliation ledger.

use crate::measurement::MeasurementId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncStatusId(Uuid);

impl SyncStatusId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SyncStatusId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SyncStatusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Reconciliation state of a single measurement.
///
/// Transitions are one-directional except `Failed → Synced` (eventual
/// success) and the idempotent `Synced → Synced` overwrite on forced
/// re-sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    /// Created, not yet attempted.
    Pending,
    /// Forwarded to the telemetry platform.
    Synced,
    /// Last attempt failed; eligible for retry until the ceiling.
    Failed,
}

impl SyncState {
    /// Returns the wire/storage name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncState::Pending => "pending",
            SyncState::Synced => "synced",
            SyncState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger entry tracking reconciliation progress for one measurement.
///
/// Exactly one entry exists per measurement. After creation the sync
/// engine is the only writer; all mutation goes through
/// [`record_success`](SyncStatus::record_success) and
/// [`record_failure`](SyncStatus::record_failure) so the state-transition
/// rules live in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Unique id.
    pub id: SyncStatusId,
    /// The measurement this entry tracks.
    pub measurement_id: MeasurementId,
    /// Identifier assigned by the telemetry platform once synced.
    pub external_id: Option<String>,
    /// Current reconciliation state.
    pub state: SyncState,
    /// Number of failed attempts so far. Never decreases.
    pub retry_count: u32,
    /// When the engine last attempted this measurement.
    pub last_attempt_at: Option<DateTime<Utc>>,
    /// Error message of the last failed attempt.
    pub error_message: Option<String>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// When the entry was last written.
    pub updated_at: DateTime<Utc>,
}

impl SyncStatus {
    /// Creates the initial ledger entry for a freshly ingested measurement.
    pub fn pending(measurement_id: MeasurementId, now: DateTime<Utc>) -> Self {
        Self {
            id: SyncStatusId::new(),
            measurement_id,
            external_id: None,
            state: SyncState::Pending,
            retry_count: 0,
            last_attempt_at: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a successful gateway call.
    ///
    /// Overwrites the external id (idempotent on forced re-sync), clears
    /// the error, and stamps the attempt. `retry_count` is left intact for
    /// observability.
    pub fn record_success(&mut self, external_id: Option<String>, now: DateTime<Utc>) {
        self.state = SyncState::Synced;
        self.external_id = external_id;
        self.error_message = None;
        self.last_attempt_at = Some(now);
        self.updated_at = now;
    }

    /// Applies a failed gateway call.
    ///
    /// Moves to `Failed`, increments the retry counter, and records the
    /// error for inspection.
    pub fn record_failure(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.state = SyncState::Failed;
        self.retry_count = self.retry_count.saturating_add(1);
        self.error_message = Some(message.into());
        self.last_attempt_at = Some(now);
        self.updated_at = now;
    }

    /// Whether an automatic batch pass may still pick up this entry.
    pub fn eligible_for_retry(&self, max_retries: u32) -> bool {
        matches!(self.state, SyncState::Pending | SyncState::Failed)
            && self.retry_count < max_retries
    }
}
