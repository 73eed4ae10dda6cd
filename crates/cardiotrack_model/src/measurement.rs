//! Heart-rate measurements and device upload validation.

use crate::error::{ModelError, ModelResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest heart-rate value accepted from a device.
pub const BPM_MIN: u16 = 30;
/// Highest heart-rate value accepted from a device.
pub const BPM_MAX: u16 = 220;

/// Unique identifier of a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementId(Uuid);

impl MeasurementId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for MeasurementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MeasurementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for MeasurementId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unique identifier of a patient.
///
/// Patients themselves are owned by the surrounding application; the sync
/// pipeline only carries the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(Uuid);

impl PatientId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PatientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored heart-rate measurement.
///
/// The sync engine only ever mutates [`synced`](Measurement::synced) and
/// [`sync_error`](Measurement::sync_error); everything else is immutable
/// after ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Unique id.
    pub id: MeasurementId,
    /// Patient this sample belongs to.
    pub patient_id: PatientId,
    /// Heart-rate in beats per minute.
    pub bpm: u16,
    /// Optional raw ECG signal series.
    pub ecg_signal: Option<Vec<f64>>,
    /// Optional electrode status payload, opaque to the sync engine.
    pub electrode_status: Option<serde_json::Value>,
    /// When the sample was taken on the device.
    pub measured_at: DateTime<Utc>,
    /// Whether the sample has been forwarded to the telemetry platform.
    pub synced: bool,
    /// Message of the most recent failed sync attempt, if any.
    pub sync_error: Option<String>,
    /// When the sample was ingested.
    pub created_at: DateTime<Utc>,
}

impl Measurement {
    /// Marks the measurement as forwarded and clears any stale error.
    pub fn mark_synced(&mut self) {
        self.synced = true;
        self.sync_error = None;
    }

    /// Records a failed sync attempt on the measurement itself.
    ///
    /// The ledger entry carries the authoritative attempt history; this
    /// field exists so callers reading only measurements still see the
    /// latest failure.
    pub fn record_sync_error(&mut self, message: impl Into<String>) {
        self.sync_error = Some(message.into());
    }
}

/// A device upload, not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMeasurement {
    /// Patient this sample belongs to.
    pub patient_id: PatientId,
    /// Heart-rate in beats per minute.
    pub bpm: u16,
    /// Optional raw ECG signal series.
    pub ecg_signal: Option<Vec<f64>>,
    /// Optional electrode status payload.
    pub electrode_status: Option<serde_json::Value>,
    /// When the sample was taken on the device.
    pub measured_at: DateTime<Utc>,
}

impl NewMeasurement {
    /// Creates an upload with only the required fields set.
    pub fn new(patient_id: PatientId, bpm: u16, measured_at: DateTime<Utc>) -> Self {
        Self {
            patient_id,
            bpm,
            ecg_signal: None,
            electrode_status: None,
            measured_at,
        }
    }

    /// Attaches a raw ECG signal series.
    pub fn with_ecg_signal(mut self, signal: Vec<f64>) -> Self {
        self.ecg_signal = Some(signal);
        self
    }

    /// Attaches an electrode status payload.
    pub fn with_electrode_status(mut self, status: serde_json::Value) -> Self {
        self.electrode_status = Some(status);
        self
    }

    /// Validates the upload against `Utc::now()`.
    pub fn validate(&self) -> ModelResult<()> {
        self.validate_at(Utc::now())
    }

    /// Validates the upload against an explicit notion of "now".
    pub fn validate_at(&self, now: DateTime<Utc>) -> ModelResult<()> {
        if self.bpm < BPM_MIN || self.bpm > BPM_MAX {
            return Err(ModelError::BpmOutOfRange {
                value: self.bpm,
                min: BPM_MIN,
                max: BPM_MAX,
            });
        }

        if self.measured_at > now {
            return Err(ModelError::FutureTimestamp {
                timestamp: self.measured_at.to_rfc3339(),
            });
        }

        if let Some(signal) = &self.ecg_signal {
            if signal.is_empty() {
                return Err(ModelError::EmptySignalSeries);
            }
        }

        Ok(())
    }

    /// Builds the stored measurement, assigning a fresh id.
    pub fn into_measurement(self, now: DateTime<Utc>) -> Measurement {
        Measurement {
            id: MeasurementId::new(),
            patient_id: self.patient_id,
            bpm: self.bpm,
            ecg_signal: self.ecg_signal,
            electrode_status: self.electrode_status,
            measured_at: self.measured_at,
            synced: false,
            sync_error: None,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn upload(bpm: u16) -> NewMeasurement {
        NewMeasurement::new(PatientId::new(), bpm, Utc::now() - Duration::minutes(1))
    }

    #[test]
    fn valid_upload_passes() {
        assert!(upload(75).validate().is_ok());
        assert!(upload(BPM_MIN).validate().is_ok());
        assert!(upload(BPM_MAX).validate().is_ok());
    }

    #[test]
    fn bpm_bounds_enforced() {
        let err = upload(BPM_MIN - 1).validate().unwrap_err();
        assert!(matches!(err, ModelError::BpmOutOfRange { value: 29, .. }));

        let err = upload(BPM_MAX + 1).validate().unwrap_err();
        assert!(matches!(err, ModelError::BpmOutOfRange { value: 221, .. }));
    }

    #[test]
    fn future_timestamp_rejected() {
        let mut m = upload(75);
        m.measured_at = Utc::now() + Duration::hours(1);
        let err = m.validate().unwrap_err();
        assert!(matches!(err, ModelError::FutureTimestamp { .. }));
    }

    #[test]
    fn empty_signal_rejected() {
        let m = upload(75).with_ecg_signal(vec![]);
        assert_eq!(m.validate().unwrap_err(), ModelError::EmptySignalSeries);

        let m = upload(75).with_ecg_signal(vec![0.1, 0.2]);
        assert!(m.validate().is_ok());
    }

    #[test]
    fn into_measurement_starts_unsynced() {
        let now = Utc::now();
        let m = upload(80)
            .with_electrode_status(serde_json::json!({"connected": true}))
            .into_measurement(now);

        assert!(!m.synced);
        assert!(m.sync_error.is_none());
        assert_eq!(m.bpm, 80);
        assert_eq!(m.created_at, now);
        assert!(m.electrode_status.is_some());
    }

    #[test]
    fn mark_synced_clears_error() {
        let mut m = upload(80).into_measurement(Utc::now());
        m.record_sync_error("gateway timeout");
        assert_eq!(m.sync_error.as_deref(), Some("gateway timeout"));

        m.mark_synced();
        assert!(m.synced);
        assert!(m.sync_error.is_none());
    }

    #[test]
    fn measurement_id_round_trip() {
        let id = MeasurementId::new();
        let parsed: MeasurementId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
