//! Alert record encoder
//!
//! Wraps alert events into proctor.alert.v1 records carrying producer
//! metadata, the session id and the warning state they leave behind.

use crate::error::ComputeError;
use crate::types::{AlertEvent, AlertProducer, AlertRecord, WarningState};
use crate::{PRODUCER_NAME, PROCTOR_VERSION};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Current output schema version
pub const ALERT_SCHEMA_VERSION: &str = "proctor.alert.v1";

/// Alert record encoder
#[derive(Debug, Clone)]
pub struct AlertEncoder {
    instance_id: String,
}

impl Default for AlertEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn encode(
        &self,
        session_id: &str,
        at: DateTime<Utc>,
        event: AlertEvent,
        state: WarningState,
    ) -> AlertRecord {
        AlertRecord {
            schema_version: ALERT_SCHEMA_VERSION.to_string(),
            producer: AlertProducer {
                name: PRODUCER_NAME.to_string(),
                version: PROCTOR_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            session_id: session_id.to_string(),
            emitted_at_utc: at.to_rfc3339(),
            event,
            state,
        }
    }

    /// Encode a record to a single JSON line
    pub fn encode_to_json(record: &AlertRecord) -> Result<String, ComputeError> {
        serde_json::to_string(record).map_err(|e| ComputeError::EncodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ViolationKind, TAB_SWITCH_MESSAGE};
    use chrono::TimeZone;

    fn sample_event() -> AlertEvent {
        AlertEvent::Violation {
            violation: ViolationKind::TabSwitch,
            detector: None,
            message: TAB_SWITCH_MESSAGE.to_string(),
            tally: 1,
        }
    }

    #[test]
    fn test_encode_alert_record() {
        let encoder = AlertEncoder::with_instance_id("test-instance".to_string());
        let at = Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 3).unwrap();
        let state = WarningState {
            violation_tally: 1,
            current_message: TAB_SWITCH_MESSAGE.to_string(),
            auto_clear_scheduled: true,
        };

        let record = encoder.encode("session-1", at, sample_event(), state.clone());

        assert_eq!(record.schema_version, ALERT_SCHEMA_VERSION);
        assert_eq!(record.producer.name, PRODUCER_NAME);
        assert_eq!(record.producer.version, PROCTOR_VERSION);
        assert_eq!(record.producer.instance_id, "test-instance");
        assert_eq!(record.session_id, "session-1");
        assert_eq!(record.emitted_at_utc, "2024-05-20T09:00:03+00:00");
        assert_eq!(record.state, state);
    }

    #[test]
    fn test_encode_to_json() {
        let encoder = AlertEncoder::new();
        let record = encoder.encode("s", Utc::now(), sample_event(), WarningState::default());
        let json = AlertEncoder::encode_to_json(&record).unwrap();

        assert!(!json.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["schema_version"], "proctor.alert.v1");
        assert_eq!(parsed["producer"]["name"], "synheart-proctor");
        assert_eq!(parsed["event"]["kind"], "violation");
        assert_eq!(parsed["event"]["violation"], "tab_switch");
    }

    #[test]
    fn test_unique_instance_ids() {
        assert_ne!(AlertEncoder::new().instance_id(), AlertEncoder::new().instance_id());
    }
}
