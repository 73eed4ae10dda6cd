//! Configuration for the sync engine.

use std::time::Duration;

/// Default number of measurements per batch pass.
pub const DEFAULT_BATCH_SIZE: usize = 50;
/// Default automatic-retry ceiling.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default interval between scheduled passes.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Telemetry variable names for the measurement fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableNames {
    /// Variable carrying the heart-rate value.
    pub heart_rate: String,
    /// Variable carrying the JSON-encoded ECG signal series.
    pub ecg_signal: String,
    /// Variable carrying the JSON-encoded electrode status.
    pub electrode_status: String,
}

impl Default for VariableNames {
    fn default() -> Self {
        Self {
            heart_rate: "heart-rate".into(),
            ecg_signal: "ecg-signal".into(),
            electrode_status: "electrode-status".into(),
        }
    }
}

/// Configuration for sync operations.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Device label the measurements are posted under.
    pub device_label: String,
    /// Telemetry variable names.
    pub variables: VariableNames,
    /// Maximum measurements attempted per batch pass.
    pub batch_size: usize,
    /// Automatic-retry ceiling; forced sync bypasses it.
    pub max_retries: u32,
    /// Interval between scheduled passes (consumed by the scheduler).
    pub sync_interval: Duration,
}

impl SyncConfig {
    /// Creates a configuration with the documented defaults
    /// (batch size 50, max retries 3, every 5 minutes).
    pub fn new(device_label: impl Into<String>) -> Self {
        Self {
            device_label: device_label.into(),
            variables: VariableNames::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            sync_interval: DEFAULT_SYNC_INTERVAL,
        }
    }

    /// Sets the batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Sets the automatic-retry ceiling.
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Sets the scheduled pass interval.
    pub fn with_sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = interval;
        self
    }

    /// Overrides the telemetry variable names.
    pub fn with_variables(mut self, variables: VariableNames) -> Self {
        self.variables = variables;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_fallbacks() {
        let config = SyncConfig::new("cardio-01");
        assert_eq!(config.device_label, "cardio-01");
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.sync_interval, Duration::from_secs(300));
        assert_eq!(config.variables.heart_rate, "heart-rate");
        assert_eq!(config.variables.ecg_signal, "ecg-signal");
        assert_eq!(config.variables.electrode_status, "electrode-status");
    }

    #[test]
    fn config_builder() {
        let config = SyncConfig::new("cardio-01")
            .with_batch_size(10)
            .with_max_retries(5)
            .with_sync_interval(Duration::from_secs(60));

        assert_eq!(config.batch_size, 10);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.sync_interval, Duration::from_secs(60));
    }
}
