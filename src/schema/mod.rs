//! Unified proctor.frame_event.v1 schema
//!
//! This module defines the input schema for the monitor: face landmark
//! batches from the landmark model, visibility signals from the host and
//! model lifecycle notices, all as timestamped records.

mod adapter;
mod frame_event;

pub use adapter::*;
pub use frame_event::*;
