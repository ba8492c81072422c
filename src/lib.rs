//! Synheart Proctor - On-device attentiveness monitor for remote exams
//!
//! Proctor turns a stream of face-landmark batches and page-visibility changes
//! into debounced warnings through a deterministic pipeline: landmark batch →
//! feature extraction → dwell detectors → warning aggregation → alert
//! encoding.
//!
//! ## Modules
//!
//! - **Replay**: Process recorded `proctor.frame_event.v1` streams into alert records
//! - **Live runtime**: Drive a monitor from the wall clock on a worker thread
//! - **FFI**: C bindings for host applications

pub mod cadence;
pub mod config;
pub mod detector;
pub mod encoder;
pub mod error;
pub mod features;
pub mod landmarks;
pub mod pipeline;
pub mod runtime;
pub mod schema;
pub mod sink;
pub mod types;
pub mod visibility;
pub mod warning;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

#[cfg(test)]
mod test_support;

pub use config::{AutoClearPolicy, MonitorConfig};
pub use error::ComputeError;
pub use features::{Diagnostics, FeatureExtractor, FeatureVector};
pub use landmarks::{FaceBatch, LandmarkSet, Point2};
pub use pipeline::{replay_to_alerts, MonitorProcessor, MonitorSnapshot};
pub use runtime::MonitorHandle;
pub use sink::{AlertSink, NdjsonSink};
pub use types::{AlertEvent, AlertRecord, DetectorKind, ViolationKind, WarningState};
pub use visibility::VisibilityState;

// Schema exports
pub use schema::{FrameEvent, FrameEventAdapter, SCHEMA_VERSION};

/// Proctor version embedded in all alert records
pub const PROCTOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for alert records
pub const PRODUCER_NAME: &str = "synheart-proctor";
