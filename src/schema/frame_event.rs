//! proctor.frame_event.v1 schema definition
//!
//! One record per inbound signal:
//! - `faces`: landmark meshes for every face detected in a video frame
//! - `visibility`: the host page/window gained or lost the foreground
//! - `model_ready`: the landmark model finished loading

use crate::landmarks::{FaceBatch, LandmarkSet};
use crate::visibility::VisibilityState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current schema version
pub const SCHEMA_VERSION: &str = "proctor.frame_event.v1";

/// Where the record came from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Source {
    /// Landmark model name (e.g., "facemesh")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Capture device identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_id: Option<String>,
    /// Host environment (browser tab, desktop shell, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

/// Type of record contained in the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Faces,
    Visibility,
    ModelReady,
}

/// Landmark meshes for one video frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacesPayload {
    #[serde(default)]
    pub faces: Vec<LandmarkSet>,
    /// Source frame dimensions, informational
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_height: Option<u32>,
}

/// Host foreground change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityPayload {
    pub state: VisibilityState,
}

/// Landmark model lifecycle notice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelReadyPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

/// Event payload, keyed by record type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Faces { faces: FacesPayload },
    Visibility { visibility: VisibilityPayload },
    ModelReady { model_ready: ModelReadyPayload },
}

/// The main proctor.frame_event.v1 schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameEvent {
    /// Schema version identifier
    pub schema_version: String,
    /// Unique event identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Event timestamp (UTC)
    pub timestamp: DateTime<Utc>,
    /// Optional source information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    /// Type of record
    pub record_type: RecordType,
    /// Event payload (depends on record_type)
    pub payload: Payload,
}

impl FrameEvent {
    fn with_payload(timestamp: DateTime<Utc>, record_type: RecordType, payload: Payload) -> Self {
        FrameEvent {
            schema_version: SCHEMA_VERSION.to_string(),
            event_id: Some(uuid::Uuid::new_v4().to_string()),
            timestamp,
            source: None,
            record_type,
            payload,
        }
    }

    /// Create a new faces event
    pub fn faces(timestamp: DateTime<Utc>, batch: FaceBatch) -> Self {
        Self::with_payload(
            timestamp,
            RecordType::Faces,
            Payload::Faces {
                faces: FacesPayload {
                    faces: batch.faces,
                    frame_width: None,
                    frame_height: None,
                },
            },
        )
    }

    /// Create a new visibility event
    pub fn visibility(timestamp: DateTime<Utc>, state: VisibilityState) -> Self {
        Self::with_payload(
            timestamp,
            RecordType::Visibility,
            Payload::Visibility {
                visibility: VisibilityPayload { state },
            },
        )
    }

    /// Create a new model-ready event
    pub fn model_ready(timestamp: DateTime<Utc>) -> Self {
        Self::with_payload(
            timestamp,
            RecordType::ModelReady,
            Payload::ModelReady {
                model_ready: ModelReadyPayload::default(),
            },
        )
    }

    /// Add source information to the event
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// Validate the event schema
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(ValidationError::InvalidSchemaVersion {
                expected: SCHEMA_VERSION.to_string(),
                actual: self.schema_version.clone(),
            });
        }

        match (&self.record_type, &self.payload) {
            (RecordType::Faces, Payload::Faces { faces }) => validate_faces(faces),
            (RecordType::Visibility, Payload::Visibility { .. }) => Ok(()),
            (RecordType::ModelReady, Payload::ModelReady { .. }) => Ok(()),
            _ => Err(ValidationError::PayloadTypeMismatch {
                record_type: format!("{:?}", self.record_type),
                payload_type: self.payload_type_name(),
            }),
        }
    }

    fn payload_type_name(&self) -> String {
        match &self.payload {
            Payload::Faces { .. } => "faces".to_string(),
            Payload::Visibility { .. } => "visibility".to_string(),
            Payload::ModelReady { .. } => "model_ready".to_string(),
        }
    }
}

fn validate_faces(payload: &FacesPayload) -> Result<(), ValidationError> {
    for (face, landmarks) in payload.faces.iter().enumerate() {
        if let Some(point) = landmarks.mesh.iter().position(|p| !p.is_finite()) {
            return Err(ValidationError::NonFiniteLandmark { face, point });
        }
    }
    Ok(())
}

/// Validation errors for frame events
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid schema version: expected {expected}, got {actual}")]
    InvalidSchemaVersion { expected: String, actual: String },

    #[error("Payload type mismatch: record_type is {record_type} but payload is {payload_type}")]
    PayloadTypeMismatch { record_type: String, payload_type: String },

    #[error("Face {face} has a non-finite coordinate at landmark {point}")]
    NonFiniteLandmark { face: usize, point: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Point2;
    use crate::test_support::attentive_batch;

    #[test]
    fn test_serialize_faces_event() {
        let event = FrameEvent::faces(Utc::now(), attentive_batch()).with_source(Source {
            model: Some("facemesh".to_string()),
            camera_id: None,
            host: None,
        });
        let json = serde_json::to_string(&event).unwrap();

        assert!(json.contains("proctor.frame_event.v1"));
        assert!(json.contains("\"record_type\":\"faces\""));
        assert!(json.contains("facemesh"));
    }

    #[test]
    fn test_deserialize_faces_event_with_depth() {
        let json = r#"{
            "schema_version": "proctor.frame_event.v1",
            "timestamp": "2024-05-20T09:00:00.250Z",
            "record_type": "faces",
            "payload": {
                "faces": {
                    "faces": [
                        { "mesh": [[100.0, 120.0, -3.5], [101.5, 121.0, -3.1]], "confidence": 0.97 }
                    ]
                }
            }
        }"#;

        let event: FrameEvent = serde_json::from_str(json).unwrap();
        assert!(event.validate().is_ok());
        match event.payload {
            Payload::Faces { faces } => {
                assert_eq!(faces.faces.len(), 1);
                assert_eq!(faces.faces[0].mesh[1], Point2::new(101.5, 121.0));
                assert_eq!(faces.faces[0].confidence, Some(0.97));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_deserialize_visibility_and_model_ready() {
        let hidden: FrameEvent = serde_json::from_str(
            r#"{"schema_version":"proctor.frame_event.v1","timestamp":"2024-05-20T09:00:01Z",
                "record_type":"visibility","payload":{"visibility":{"state":"hidden"}}}"#,
        )
        .unwrap();
        assert!(hidden.validate().is_ok());
        assert!(matches!(
            hidden.payload,
            Payload::Visibility { visibility: VisibilityPayload { state: VisibilityState::Hidden } }
        ));

        let ready: FrameEvent = serde_json::from_str(
            r#"{"schema_version":"proctor.frame_event.v1","timestamp":"2024-05-20T09:00:00Z",
                "record_type":"model_ready","payload":{"model_ready":{"model_name":"facemesh"}}}"#,
        )
        .unwrap();
        assert!(ready.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_wrong_version() {
        let mut event = FrameEvent::model_ready(Utc::now());
        event.schema_version = "proctor.frame_event.v0".to_string();
        assert!(matches!(
            event.validate(),
            Err(ValidationError::InvalidSchemaVersion { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_mismatched_payload() {
        let mut event = FrameEvent::visibility(Utc::now(), VisibilityState::Hidden);
        event.record_type = RecordType::Faces;
        assert!(matches!(
            event.validate(),
            Err(ValidationError::PayloadTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_non_finite_points() {
        let mut batch = attentive_batch();
        batch.faces[0].mesh[7] = Point2::new(f64::INFINITY, 0.0);
        let event = FrameEvent::faces(Utc::now(), batch);
        assert!(matches!(
            event.validate(),
            Err(ValidationError::NonFiniteLandmark { face: 0, point: 7 })
        ));
    }
}
