//! Core types for the Synheart Proctor pipeline
//!
//! This module defines the values that leave the detection pipeline: which
//! detector fired, what kind of violation it represents, and the alert
//! records handed to the presentation layer.

use crate::features::Diagnostics;
use serde::{Deserialize, Serialize};

pub const MULTIPLE_FACES_MESSAGE: &str = "WARNING: Multiple faces detected!";
pub const LOOKING_AWAY_MESSAGE: &str = "WARNING: Looking away from screen!";
pub const EYES_CLOSED_MESSAGE: &str = "WARNING: Eyes closed for too long!";
pub const TAB_SWITCH_MESSAGE: &str = "WARNING: Tab switching detected!";
pub const FINAL_WARNING_MESSAGE: &str = "FINAL WARNING: Exam may be terminated!";
pub const MONITORING_STARTED_MESSAGE: &str = "Camera monitoring started";

/// The four tick-driven detectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    MultipleFaces,
    GazeAngle,
    GazeProximity,
    EyesClosed,
}

impl DetectorKind {
    /// Evaluation order within a tick
    pub const ALL: [DetectorKind; 4] = [
        DetectorKind::MultipleFaces,
        DetectorKind::GazeAngle,
        DetectorKind::GazeProximity,
        DetectorKind::EyesClosed,
    ];

    pub fn violation(&self) -> ViolationKind {
        match self {
            DetectorKind::MultipleFaces => ViolationKind::MultipleFaces,
            DetectorKind::GazeAngle | DetectorKind::GazeProximity => ViolationKind::LookingAway,
            DetectorKind::EyesClosed => ViolationKind::EyesClosed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorKind::MultipleFaces => "multiple_faces",
            DetectorKind::GazeAngle => "gaze_angle",
            DetectorKind::GazeProximity => "gaze_proximity",
            DetectorKind::EyesClosed => "eyes_closed",
        }
    }
}

/// Suspicious behavior categories shown to the subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MultipleFaces,
    LookingAway,
    EyesClosed,
    TabSwitch,
}

impl ViolationKind {
    pub fn message(&self) -> &'static str {
        match self {
            ViolationKind::MultipleFaces => MULTIPLE_FACES_MESSAGE,
            ViolationKind::LookingAway => LOOKING_AWAY_MESSAGE,
            ViolationKind::EyesClosed => EYES_CLOSED_MESSAGE,
            ViolationKind::TabSwitch => TAB_SWITCH_MESSAGE,
        }
    }
}

/// Snapshot of the shared warning state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningState {
    pub violation_tally: u32,
    /// Empty when nothing is displayed
    pub current_message: String,
    pub auto_clear_scheduled: bool,
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertEvent {
    /// A detector (or the visibility monitor) reported a violation
    Violation {
        violation: ViolationKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        detector: Option<DetectorKind>,
        message: String,
        /// Tally after this violation was counted
        tally: u32,
    },
    /// The tally reached the escalation threshold and was reset
    FinalWarning {
        message: String,
        triggered_by: ViolationKind,
    },
    /// Informational status message (not a violation)
    Status { message: String },
    /// The auto-clear deadline elapsed and the message was removed
    MessageCleared,
    /// Per-tick statistics readout
    Diagnostics {
        stats: String,
        readout: Diagnostics,
    },
}

impl AlertEvent {
    pub fn is_violation(&self) -> bool {
        matches!(self, AlertEvent::Violation { .. })
    }
}

/// Producer metadata embedded in every record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// proctor.alert.v1 output record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub schema_version: String,
    pub producer: AlertProducer,
    pub session_id: String,
    pub emitted_at_utc: String,
    pub event: AlertEvent,
    pub state: WarningState,
}
