//! Periodic driver for the batch sync pass.

use cardiotrack_gateway::TelemetryGateway;
use cardiotrack_store::MeasurementStore;
use cardiotrack_sync_engine::SyncEngine;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Background task that re-runs the batch pass on a fixed interval.
///
/// The pass itself is synchronous, so each tick hands the engine to a
/// blocking worker thread. A tick that fails (or panics inside the
/// store) is logged and the loop keeps going; the scheduler only stops
/// on [`shutdown`](SyncScheduler::shutdown).
pub struct SyncScheduler {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SyncScheduler {
    /// Spawns the scheduler on the current tokio runtime, ticking at the
    /// engine's configured `sync_interval`.
    ///
    /// The first pass runs one full interval after start, not
    /// immediately.
    pub fn start<S, G>(engine: Arc<SyncEngine<S, G>>) -> Self
    where
        S: MeasurementStore + 'static,
        G: TelemetryGateway + 'static,
    {
        let interval = engine.config().sync_interval;
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // interval fires immediately on the first poll; consume it.
            ticker.tick().await;

            info!(interval_secs = interval.as_secs_f64(), "sync scheduler started");
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let engine = Arc::clone(&engine);
                        let result =
                            tokio::task::spawn_blocking(move || engine.sync_pending()).await;
                        match result {
                            Ok(Ok(outcome)) => {
                                if outcome.synced > 0 || outcome.failed > 0 {
                                    info!(
                                        synced = outcome.synced,
                                        failed = outcome.failed,
                                        "scheduled sync pass finished"
                                    );
                                }
                            }
                            Ok(Err(e)) => warn!(error = %e, "scheduled sync pass failed"),
                            Err(e) => error!(error = %e, "sync pass worker panicked"),
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
            info!("sync scheduler stopped");
        });

        Self { shutdown_tx, handle }
    }

    /// Returns true while the scheduler task is alive.
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Signals the task to stop and waits for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardiotrack_gateway::MockGateway;
    use cardiotrack_model::{NewMeasurement, PatientId};
    use cardiotrack_store::MemoryStore;
    use cardiotrack_sync_engine::SyncConfig;
    use chrono::Utc;
    use std::time::Duration;

    #[tokio::test]
    async fn scheduler_ticks_at_configured_interval_and_shuts_down() {
        let store = Arc::new(MemoryStore::new());
        store
            .create_with_ledger(NewMeasurement::new(PatientId::new(), 72, Utc::now()))
            .unwrap();

        let engine = Arc::new(SyncEngine::new(
            SyncConfig::new("cardio-01").with_sync_interval(Duration::from_millis(10)),
            Arc::clone(&store),
            Arc::new(MockGateway::new()),
        ));

        let scheduler = SyncScheduler::start(engine.clone());
        assert!(scheduler.is_running());

        // Wait for at least one tick to drain the queue.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            if engine.status().unwrap().synced == 1 {
                break;
            }
            assert!(tokio::time::Instant::now() < deadline, "scheduler never synced");
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        scheduler.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_is_prompt_with_a_long_interval() {
        let engine = Arc::new(SyncEngine::new(
            SyncConfig::new("cardio-01").with_sync_interval(Duration::from_secs(3600)),
            Arc::new(MemoryStore::new()),
            Arc::new(MockGateway::new()),
        ));

        let scheduler = SyncScheduler::start(engine);
        tokio::time::timeout(Duration::from_secs(1), scheduler.shutdown())
            .await
            .expect("shutdown did not complete");
    }
}
