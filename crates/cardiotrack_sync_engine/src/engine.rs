//! The sync reconciliation engine.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use cardiotrack_gateway::{TelemetryGateway, TelemetryPayload};
use cardiotrack_model::{Measurement, MeasurementId};
use cardiotrack_store::{MeasurementRecord, MeasurementStore};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of one batch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Measurements forwarded successfully this pass.
    pub synced: u64,
    /// Measurements that failed this pass.
    pub failed: u64,
}

/// Aggregate reconciliation status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    /// Total stored measurements.
    pub total: u64,
    /// Measurements already forwarded.
    pub synced: u64,
    /// Ledger entries still pending a first attempt.
    pub pending: u64,
    /// Ledger entries whose last attempt failed.
    pub failed: u64,
}

/// The reconciliation engine.
///
/// Selects eligible measurements, pushes them through the telemetry
/// gateway, and updates the ledger. The engine is the sole writer to
/// ledger state and to the measurement sync fields; it never deletes
/// anything.
///
/// # Concurrency
///
/// The engine holds no mutable state of its own, so it is safe to share
/// behind an `Arc` and to invoke concurrently. Two overlapping batch
/// passes may sync the same measurement twice; the upstream sink is an
/// append-style time-series store that tolerates the duplicate write, so
/// no lock or lease is taken.
pub struct SyncEngine<S, G> {
    config: SyncConfig,
    store: Arc<S>,
    gateway: Arc<G>,
}

impl<S: MeasurementStore, G: TelemetryGateway> SyncEngine<S, G> {
    /// Creates a new engine over shared store and gateway handles.
    pub fn new(config: SyncConfig, store: Arc<S>, gateway: Arc<G>) -> Self {
        Self {
            config,
            store,
            gateway,
        }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the underlying store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Runs one batch reconciliation pass.
    ///
    /// Selects up to `batch_size` measurements that are unsynced, in
    /// `pending` or `failed` state, and under the retry ceiling, then
    /// syncs them sequentially. A failure on one item is recorded and
    /// counted; the pass continues with the next item. Only a failure of
    /// the selection itself propagates.
    pub fn sync_pending(&self) -> SyncResult<BatchOutcome> {
        let batch = self
            .store
            .find_pending_or_failed_unsynced(self.config.max_retries, self.config.batch_size)?;

        if batch.is_empty() {
            debug!("no pending measurements to sync");
            return Ok(BatchOutcome::default());
        }

        info!(count = batch.len(), "starting sync pass");

        let mut outcome = BatchOutcome::default();
        for record in batch {
            let id = record.measurement.id;
            match self.sync_one(record) {
                Ok(()) => outcome.synced += 1,
                Err(error) => {
                    outcome.failed += 1;
                    warn!(measurement = %id, %error, "failed to sync measurement");
                }
            }
        }

        info!(
            synced = outcome.synced,
            failed = outcome.failed,
            "sync pass completed"
        );
        Ok(outcome)
    }

    /// Syncs a single measurement: the unit of retry.
    ///
    /// Performs exactly one gateway attempt. On success both the
    /// measurement and its ledger entry are updated and persisted; on
    /// failure the ledger records the attempt (state `failed`,
    /// `retry_count` incremented, error stored) and the error is
    /// re-raised so the caller can count it. No retry loop lives here;
    /// retries happen only through re-invocation of the batch pass.
    pub fn sync_one(&self, record: MeasurementRecord) -> SyncResult<()> {
        let MeasurementRecord {
            mut measurement,
            mut status,
        } = record;

        let payload = self.build_payload(&measurement);
        let result = self
            .gateway
            .post_variables(&self.config.device_label, &payload);
        let now = Utc::now();

        match result {
            Ok(receipt) => {
                measurement.mark_synced();
                status.record_success(receipt.external_id, now);
                self.store.save_measurement(&measurement)?;
                self.store.save_sync_status(&status)?;

                info!(
                    measurement = %measurement.id,
                    external_id = status.external_id.as_deref().unwrap_or("-"),
                    "measurement synced"
                );
                Ok(())
            }
            Err(error) => {
                let message = error.to_string();
                status.record_failure(message.as_str(), now);
                measurement.record_sync_error(message.as_str());
                self.store.save_sync_status(&status)?;
                self.store.save_measurement(&measurement)?;

                Err(SyncError::Upstream { message })
            }
        }
    }

    /// Forces a sync of one measurement, bypassing the retry ceiling and
    /// the pending/failed state filter.
    ///
    /// This is the only path by which a measurement that exhausted its
    /// automatic retries can be reconciled again. The underlying sync
    /// error, if any, is surfaced to the caller unmodified.
    pub fn force_sync(&self, id: MeasurementId) -> SyncResult<()> {
        let record = self
            .store
            .find_by_id(id)?
            .ok_or(SyncError::NotFound(id))?;

        info!(measurement = %id, "forcing sync");
        self.sync_one(record)
    }

    /// Returns the aggregate reconciliation status. Pure read.
    pub fn status(&self) -> SyncResult<SyncSummary> {
        let counts = self.store.counts()?;
        Ok(SyncSummary {
            total: counts.total,
            synced: counts.synced,
            pending: counts.pending,
            failed: counts.failed,
        })
    }

    /// Builds the outbound payload for one measurement.
    ///
    /// The heart-rate value is always present; the signal series and
    /// electrode status are included only when set, each JSON-encoded
    /// independently and stamped with the measurement timestamp.
    fn build_payload(&self, measurement: &Measurement) -> TelemetryPayload {
        let timestamp_ms = measurement.measured_at.timestamp_millis();
        let variables = &self.config.variables;

        let mut payload = TelemetryPayload::new();
        payload.insert(
            variables.heart_rate.as_str(),
            serde_json::json!(measurement.bpm),
            timestamp_ms,
        );

        if let Some(signal) = &measurement.ecg_signal {
            payload.insert(
                variables.ecg_signal.as_str(),
                serde_json::Value::String(encode_signal(signal)),
                timestamp_ms,
            );
        }

        if let Some(electrode_status) = &measurement.electrode_status {
            payload.insert(
                variables.electrode_status.as_str(),
                serde_json::Value::String(electrode_status.to_string()),
                timestamp_ms,
            );
        }

        payload
    }
}

/// JSON-encodes a signal series. Non-finite samples become `null`.
fn encode_signal(signal: &[f64]) -> String {
    serde_json::Value::Array(
        signal
            .iter()
            .map(|v| {
                serde_json::Number::from_f64(*v)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            })
            .collect(),
    )
    .to_string()
}
