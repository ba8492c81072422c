//! Monitor configuration
//!
//! All thresholds and timings recognized by the detection pipeline. Every
//! field has a default, so a partial JSON document is a valid configuration.

use crate::error::ComputeError;
use crate::types::DetectorKind;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default sampling tick (ms)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;
/// Positive ticks tolerated before firing (fires on tick `dwell_ticks + 1`)
pub const DEFAULT_DWELL_TICKS: u32 = 2;
pub const DEFAULT_ANGLE_THRESHOLD_DEG: f64 = 30.0;
pub const DEFAULT_PROXIMITY_THRESHOLD_PX: f64 = 100.0;
pub const DEFAULT_EYE_CLOSED_THRESHOLD_PX: f64 = 5.0;
pub const DEFAULT_FINAL_WARNING_THRESHOLD: u32 = 3;
/// How long a warning stays on screen (ms)
pub const DEFAULT_AUTO_CLEAR_MS: u64 = 3_000;
/// How long the "monitoring started" status stays on screen (ms)
pub const DEFAULT_STATUS_CLEAR_MS: u64 = 2_000;
/// Upper bound for every interval and display duration (one day, in ms)
pub const MAX_DURATION_MS: u64 = 86_400_000;

/// What happens to a pending auto-clear when a new message is published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoClearPolicy {
    /// Reschedule the clear so the newest message gets its full display time
    #[default]
    Refresh,
    /// Leave the earlier deadline running; the new message may clear early
    KeepPending,
}

/// Per-detector dwell overrides; `None` falls back to `dwell_ticks`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DwellOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_faces: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gaze_angle: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gaze_proximity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eyes_closed: Option<u32>,
}

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub tick_interval_ms: u64,
    pub dwell_ticks: u32,
    pub dwell_overrides: DwellOverrides,
    pub angle_threshold_deg: f64,
    pub proximity_threshold_px: f64,
    pub eye_closed_threshold_px: f64,
    pub final_warning_threshold: u32,
    pub auto_clear_ms: u64,
    pub status_clear_ms: u64,
    pub auto_clear_policy: AutoClearPolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            dwell_ticks: DEFAULT_DWELL_TICKS,
            dwell_overrides: DwellOverrides::default(),
            angle_threshold_deg: DEFAULT_ANGLE_THRESHOLD_DEG,
            proximity_threshold_px: DEFAULT_PROXIMITY_THRESHOLD_PX,
            eye_closed_threshold_px: DEFAULT_EYE_CLOSED_THRESHOLD_PX,
            final_warning_threshold: DEFAULT_FINAL_WARNING_THRESHOLD,
            auto_clear_ms: DEFAULT_AUTO_CLEAR_MS,
            status_clear_ms: DEFAULT_STATUS_CLEAR_MS,
            auto_clear_policy: AutoClearPolicy::default(),
        }
    }
}

impl MonitorConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let config: MonitorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load(path: &Path) -> Result<Self, ComputeError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ComputeError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ComputeError> {
        serde_json::to_string_pretty(self).map_err(ComputeError::JsonError)
    }

    pub fn validate(&self) -> Result<(), ComputeError> {
        if self.tick_interval_ms == 0 {
            return Err(ComputeError::InvalidConfig(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        for (name, value) in [
            ("tick_interval_ms", self.tick_interval_ms),
            ("auto_clear_ms", self.auto_clear_ms),
            ("status_clear_ms", self.status_clear_ms),
        ] {
            if value > MAX_DURATION_MS {
                return Err(ComputeError::InvalidConfig(format!(
                    "{name} must be at most {MAX_DURATION_MS}, got {value}"
                )));
            }
        }
        if self.final_warning_threshold == 0 {
            return Err(ComputeError::InvalidConfig(
                "final_warning_threshold must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("angle_threshold_deg", self.angle_threshold_deg),
            ("proximity_threshold_px", self.proximity_threshold_px),
            ("eye_closed_threshold_px", self.eye_closed_threshold_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ComputeError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Dwell threshold for a given detector
    pub fn dwell_for(&self, kind: DetectorKind) -> u32 {
        let overridden = match kind {
            DetectorKind::MultipleFaces => self.dwell_overrides.multiple_faces,
            DetectorKind::GazeAngle => self.dwell_overrides.gaze_angle,
            DetectorKind::GazeProximity => self.dwell_overrides.gaze_proximity,
            DetectorKind::EyesClosed => self.dwell_overrides.eyes_closed,
        };
        overridden.unwrap_or(self.dwell_ticks)
    }

    pub fn tick_interval(&self) -> Duration {
        bounded_millis(self.tick_interval_ms)
    }

    pub fn auto_clear(&self) -> Duration {
        bounded_millis(self.auto_clear_ms)
    }

    pub fn status_clear(&self) -> Duration {
        bounded_millis(self.status_clear_ms)
    }
}

/// Milliseconds clamped to `MAX_DURATION_MS`, for configs built without `validate`
fn bounded_millis(ms: u64) -> Duration {
    Duration::milliseconds(ms.min(MAX_DURATION_MS) as i64)
}
