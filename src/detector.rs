//! Debounced behavior detectors
//!
//! Every detector is the same edge-triggered dwell state machine, differing
//! only in its condition and dwell threshold:
//!
//! - condition true: counter += 1, fire and reset once counter > dwell
//! - condition false: counter = 0
//! - no signal: counter held
//!
//! `DetectorBank` owns one instance per `DetectorKind` and evaluates them in
//! a fixed order on each tick.

use crate::config::MonitorConfig;
use crate::features::FeatureVector;
use crate::types::DetectorKind;

/// Outcome of one tick for one detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Condition false, counter reset
    Cleared,
    /// Condition true, still accumulating
    Accumulating(u32),
    /// Condition held past the dwell threshold; counter reset
    Fired,
    /// No signal this tick, counter untouched
    Held(u32),
}

/// Edge-triggered dwell state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DwellDetector {
    kind: DetectorKind,
    dwell_ticks: u32,
    consecutive_ticks: u32,
}

impl DwellDetector {
    pub fn new(kind: DetectorKind, dwell_ticks: u32) -> Self {
        Self {
            kind,
            dwell_ticks,
            consecutive_ticks: 0,
        }
    }

    pub fn kind(&self) -> DetectorKind {
        self.kind
    }

    pub fn dwell_ticks(&self) -> u32 {
        self.dwell_ticks
    }

    pub fn consecutive_ticks(&self) -> u32 {
        self.consecutive_ticks
    }

    /// Advance one tick. `None` means no assertion can be made this tick.
    pub fn observe(&mut self, condition: Option<bool>) -> Observation {
        match condition {
            None => Observation::Held(self.consecutive_ticks),
            Some(false) => {
                self.consecutive_ticks = 0;
                Observation::Cleared
            }
            Some(true) => {
                self.consecutive_ticks += 1;
                if self.consecutive_ticks > self.dwell_ticks {
                    self.consecutive_ticks = 0;
                    Observation::Fired
                } else {
                    Observation::Accumulating(self.consecutive_ticks)
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.consecutive_ticks = 0;
    }
}

/// Signal available to the detectors on one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Face count of the batch seen this tick; `None` if no fresh batch
    pub face_count: Option<usize>,
    /// Primary-face features; `None` if extraction failed or no fresh batch
    pub features: Option<FeatureVector>,
}

impl TickInput {
    pub fn no_signal() -> Self {
        Self {
            face_count: None,
            features: None,
        }
    }
}

/// Condition thresholds shared by the bank
#[derive(Debug, Clone, Copy, PartialEq)]
struct Thresholds {
    angle_deg: f64,
    proximity_px: f64,
    eye_closed_px: f64,
}

/// Evaluate the condition for a detector kind against this tick's input.
fn condition(kind: DetectorKind, input: &TickInput, t: &Thresholds) -> Option<bool> {
    match kind {
        DetectorKind::MultipleFaces => input.face_count.map(|n| n > 1),
        DetectorKind::GazeAngle => input
            .features
            .map(|f| f.head_angle_degrees.abs() > t.angle_deg),
        DetectorKind::GazeProximity => input
            .features
            .map(|f| f.inter_eye_distance < t.proximity_px),
        DetectorKind::EyesClosed => input.features.map(|f| {
            f.left_eye_openness < t.eye_closed_px && f.right_eye_openness < t.eye_closed_px
        }),
    }
}

/// Position of a detector in the bank, matching `DetectorKind::ALL`
fn slot(kind: DetectorKind) -> usize {
    match kind {
        DetectorKind::MultipleFaces => 0,
        DetectorKind::GazeAngle => 1,
        DetectorKind::GazeProximity => 2,
        DetectorKind::EyesClosed => 3,
    }
}

/// The four behavior detectors
#[derive(Debug, Clone)]
pub struct DetectorBank {
    detectors: [DwellDetector; 4],
    thresholds: Thresholds,
}

impl DetectorBank {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            detectors: DetectorKind::ALL
                .map(|kind| DwellDetector::new(kind, config.dwell_for(kind))),
            thresholds: Thresholds {
                angle_deg: config.angle_threshold_deg,
                proximity_px: config.proximity_threshold_px,
                eye_closed_px: config.eye_closed_threshold_px,
            },
        }
    }

    /// Run every detector for one tick; returns the kinds that fired, in
    /// evaluation order.
    pub fn tick(&mut self, input: &TickInput) -> Vec<DetectorKind> {
        let mut fired = Vec::new();
        for detector in self.detectors.iter_mut() {
            let kind = detector.kind();
            let observation = detector.observe(condition(kind, input, &self.thresholds));
            match observation {
                Observation::Fired => {
                    log::debug!("{} detector fired", kind.as_str());
                    fired.push(kind);
                }
                Observation::Accumulating(n) => {
                    log::debug!(
                        "{} detector accumulating ({}/{})",
                        kind.as_str(),
                        n,
                        detector.dwell_ticks() + 1
                    );
                }
                Observation::Cleared | Observation::Held(_) => {}
            }
        }
        fired
    }

    pub fn get(&self, kind: DetectorKind) -> &DwellDetector {
        &self.detectors[slot(kind)]
    }

    pub fn reset(&mut self) {
        for detector in self.detectors.iter_mut() {
            detector.reset();
        }
    }
}
