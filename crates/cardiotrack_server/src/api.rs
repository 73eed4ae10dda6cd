//! Request handlers for the sync endpoints.

use crate::error::{ServerError, ServerResult};
use cardiotrack_gateway::TelemetryGateway;
use cardiotrack_model::{MeasurementId, NewMeasurement};
use cardiotrack_store::{MeasurementRecord, MeasurementStore};
use cardiotrack_sync_engine::{BatchOutcome, SyncEngine, SyncSummary};
use std::sync::Arc;
use tracing::info;

/// Framework-free handlers for the sync API.
///
/// Each method corresponds to one endpoint of the surrounding
/// application:
///
/// - `POST /sync/trigger` → [`trigger_sync`](SyncApi::trigger_sync)
/// - `GET  /sync/status` → [`sync_status`](SyncApi::sync_status)
/// - `POST /sync/force/{id}` → [`force_sync`](SyncApi::force_sync) (admin)
/// - `POST /measurements` → [`ingest`](SyncApi::ingest)
pub struct SyncApi<S, G> {
    engine: Arc<SyncEngine<S, G>>,
}

impl<S: MeasurementStore, G: TelemetryGateway> SyncApi<S, G> {
    /// Creates the handler set over a shared engine.
    pub fn new(engine: Arc<SyncEngine<S, G>>) -> Self {
        Self { engine }
    }

    /// Returns the shared engine handle.
    pub fn engine(&self) -> &Arc<SyncEngine<S, G>> {
        &self.engine
    }

    /// Runs a batch pass synchronously and returns its counts.
    ///
    /// Per-item failures are part of the returned counts, not errors;
    /// only an infrastructure failure of the selection query maps to an
    /// error response.
    pub fn trigger_sync(&self) -> ServerResult<BatchOutcome> {
        info!("manual sync triggered");
        Ok(self.engine.sync_pending()?)
    }

    /// Returns the aggregate reconciliation counters.
    pub fn sync_status(&self) -> ServerResult<SyncSummary> {
        Ok(self.engine.status()?)
    }

    /// Forces a sync of one measurement, bypassing the retry ceiling.
    ///
    /// Callers must gate this behind an elevated role.
    pub fn force_sync(&self, id: MeasurementId) -> ServerResult<()> {
        self.engine.force_sync(id)?;
        Ok(())
    }

    /// Validates and stores a device upload with its ledger entry.
    pub fn ingest(&self, upload: NewMeasurement) -> ServerResult<MeasurementRecord> {
        upload.validate()?;

        let record = self
            .engine
            .store()
            .create_with_ledger(upload)
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        info!(
            measurement = %record.measurement.id,
            patient = %record.measurement.patient_id,
            bpm = record.measurement.bpm,
            "measurement recorded"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardiotrack_gateway::{GatewayError, MockGateway};
    use cardiotrack_model::{PatientId, SyncState};
    use cardiotrack_store::MemoryStore;
    use cardiotrack_sync_engine::SyncConfig;
    use chrono::Utc;

    fn api() -> SyncApi<MemoryStore, MockGateway> {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(MockGateway::new());
        let engine = SyncEngine::new(SyncConfig::new("cardio-01"), store, gateway);
        SyncApi::new(Arc::new(engine))
    }

    fn upload(bpm: u16) -> NewMeasurement {
        NewMeasurement::new(PatientId::new(), bpm, Utc::now() - chrono::Duration::seconds(5))
    }

    #[test]
    fn ingest_then_trigger_roundtrip() {
        let api = api();
        let record = api.ingest(upload(75)).unwrap();
        assert_eq!(record.status.state, SyncState::Pending);

        let outcome = api.trigger_sync().unwrap();
        assert_eq!(outcome.synced, 1);
        assert_eq!(outcome.failed, 0);

        let summary = api.sync_status().unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.synced, 1);
        assert_eq!(summary.pending, 0);
    }

    #[test]
    fn invalid_upload_is_a_client_error() {
        let api = api();
        let mut bad = upload(75);
        bad.bpm = 10;

        let err = api.ingest(bad).unwrap_err();
        assert!(err.is_client_error());

        let mut future = upload(75);
        future.measured_at = Utc::now() + chrono::Duration::hours(1);
        let err = api.ingest(future).unwrap_err();
        assert!(matches!(err, ServerError::InvalidUpload(_)));

        // Nothing was stored.
        assert_eq!(api.sync_status().unwrap().total, 0);
    }

    #[test]
    fn trigger_reports_failures_as_counts_not_errors() {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(MockGateway::new());
        // First item fails, the second succeeds via the default response.
        gateway.enqueue_error(GatewayError::Timeout);
        let engine = SyncEngine::new(SyncConfig::new("cardio-01"), store, gateway);
        let api = SyncApi::new(Arc::new(engine));

        api.ingest(upload(70)).unwrap();
        api.ingest(upload(80)).unwrap();

        let outcome = api.trigger_sync().unwrap();
        assert_eq!(outcome.synced, 1);
        assert_eq!(outcome.failed, 1);
    }

    #[test]
    fn force_sync_maps_not_found() {
        let api = api();
        let err = api.force_sync(MeasurementId::new()).unwrap_err();
        assert!(matches!(err, ServerError::NotFound(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn force_sync_maps_upstream_failure() {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(MockGateway::new());
        gateway.enqueue_error(GatewayError::Http {
            status: 502,
            body: "bad gateway".into(),
        });
        let engine = SyncEngine::new(SyncConfig::new("cardio-01"), Arc::clone(&store), gateway);
        let api = SyncApi::new(Arc::new(engine));

        let id = api.ingest(upload(75)).unwrap().measurement.id;
        let err = api.force_sync(id).unwrap_err();
        assert!(matches!(err, ServerError::Upstream(_)));
        assert!(err.is_server_error());
    }
}
