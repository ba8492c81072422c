//! Pipeline orchestration
//!
//! This module provides the public API for Synheart Proctor. It orchestrates
//! the full pipeline from timestamped frame events to alert records:
//! landmark batch → feature extraction → dwell detectors → warning aggregator
//! → encoder / sink.
//!
//! The processor is driven by event time. Before an input stamped `t` is
//! applied, every sampling tick and auto-clear deadline due at or before `t`
//! is run in time order, with a clear running before a tick due at the same
//! instant.

use crate::cadence::Cadence;
use crate::config::MonitorConfig;
use crate::detector::{DetectorBank, TickInput};
use crate::encoder::AlertEncoder;
use crate::error::ComputeError;
use crate::features::{Diagnostics, FeatureExtractor, FeatureVector};
use crate::landmarks::FaceBatch;
use crate::schema::{FrameEventAdapter, MonitorInput, TimedInput};
use crate::sink::AlertSink;
use crate::types::{
    AlertEvent, AlertRecord, DetectorKind, ViolationKind, WarningState, MONITORING_STARTED_MESSAGE,
};
use crate::visibility::{VisibilityMonitor, VisibilityState};
use crate::warning::WarningAggregator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Replay an NDJSON stream of frame events and return every alert record
/// (stateless, one-shot).
///
/// Pending auto-clears are drained after the last event so the output ends
/// with the display cleared.
///
/// # Example
/// ```ignore
/// let records = replay_to_alerts(&ndjson, &MonitorConfig::default())?;
/// ```
pub fn replay_to_alerts(
    ndjson: &str,
    config: &MonitorConfig,
) -> Result<Vec<AlertRecord>, ComputeError> {
    let events = FrameEventAdapter::parse_ndjson(ndjson)?;
    let inputs = FrameEventAdapter::to_inputs(events)?;

    let mut processor = MonitorProcessor::new(config.clone())?;
    let mut records = processor.replay(inputs);
    records.extend(processor.drain());
    Ok(records)
}

/// Most recent landmark batch, as seen by the ticker
#[derive(Debug, Clone)]
struct LatestBatch {
    face_count: usize,
    features: Option<FeatureVector>,
    /// Arrived after the previous tick
    fresh: bool,
}

/// Point-in-time view of the monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSnapshot {
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_utc: Option<String>,
    pub ticks: u64,
    pub warning: WarningState,
    pub visibility: VisibilityState,
    pub tab_switches: u32,
    /// Consecutive positive ticks per detector
    pub detector_counters: BTreeMap<String, u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics_text: Option<String>,
}

/// Stateful processor for one monitoring session at a time.
pub struct MonitorProcessor {
    config: MonitorConfig,
    session_id: String,
    clock: Option<DateTime<Utc>>,
    cadence: Cadence,
    detectors: DetectorBank,
    warnings: WarningAggregator,
    visibility: VisibilityMonitor,
    latest: Option<LatestBatch>,
    diagnostics: Option<Diagnostics>,
    emit_diagnostics: bool,
    encoder: AlertEncoder,
    sink: Option<Box<dyn AlertSink + Send>>,
}

impl MonitorProcessor {
    /// Create a processor; fails if the configuration is invalid.
    pub fn new(config: MonitorConfig) -> Result<Self, ComputeError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Processor with the default thresholds and timings
    pub fn with_defaults() -> Self {
        Self::build(MonitorConfig::default())
    }

    fn build(config: MonitorConfig) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            clock: None,
            cadence: Cadence::new(config.tick_interval()),
            detectors: DetectorBank::new(&config),
            warnings: WarningAggregator::new(&config),
            visibility: VisibilityMonitor::new(),
            latest: None,
            diagnostics: None,
            emit_diagnostics: false,
            encoder: AlertEncoder::new(),
            sink: None,
            config,
        }
    }

    /// Forward every record to a presentation target as well as returning it
    pub fn set_sink(&mut self, sink: Box<dyn AlertSink + Send>) {
        self.sink = Some(sink);
    }

    pub fn clear_sink(&mut self) {
        self.sink = None;
    }

    /// Emit a diagnostics record on every tick that has a batch
    pub fn set_emit_diagnostics(&mut self, enabled: bool) {
        self.emit_diagnostics = enabled;
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn warning_state(&self) -> WarningState {
        self.warnings.state()
    }

    /// Latest diagnostics readout, refreshed on every batch
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        self.diagnostics.as_ref()
    }

    /// Earliest pending timer (tick or auto-clear), if the session is running
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        match (self.cadence.next_due(), self.warnings.next_deadline()) {
            (Some(t), Some(c)) => Some(t.min(c)),
            (t, c) => t.or(c),
        }
    }

    /// Process a batch of inputs, assumed ordered by time
    pub fn replay(&mut self, inputs: Vec<TimedInput>) -> Vec<AlertRecord> {
        let mut records = Vec::new();
        for input in inputs {
            records.extend(self.ingest(input));
        }
        records
    }

    /// Apply one timestamped input
    pub fn ingest(&mut self, input: TimedInput) -> Vec<AlertRecord> {
        match input.input {
            MonitorInput::Faces(batch) => self.push_faces(batch, input.at),
            MonitorInput::Visibility(state) => self.push_visibility(state, input.at),
            MonitorInput::ModelReady => self.model_ready(input.at),
        }
    }

    /// New landmark batch from the face model
    pub fn push_faces(&mut self, batch: FaceBatch, at: DateTime<Utc>) -> Vec<AlertRecord> {
        let (_, records) = self.catch_up(at);

        let features = match FeatureExtractor::extract(&batch) {
            Ok(features) => Some(features),
            Err(ComputeError::EmptyBatch) => None,
            Err(e) => {
                log::debug!("no features this frame: {}", e);
                None
            }
        };
        self.diagnostics = Some(Diagnostics {
            face_count: batch.face_count(),
            features,
        });
        self.latest = Some(LatestBatch {
            face_count: batch.face_count(),
            features,
            fresh: true,
        });
        records
    }

    /// Host foreground change
    pub fn push_visibility(
        &mut self,
        state: VisibilityState,
        at: DateTime<Utc>,
    ) -> Vec<AlertRecord> {
        let (now, mut records) = self.catch_up(at);

        if self.visibility.observe(state) {
            let events = self
                .warnings
                .report_violation(ViolationKind::TabSwitch, None, now);
            records.extend(self.emit(now, events));
        }
        records
    }

    /// The landmark model finished loading
    pub fn model_ready(&mut self, at: DateTime<Utc>) -> Vec<AlertRecord> {
        let (now, mut records) = self.catch_up(at);
        log::info!("landmark model ready, monitoring session {}", self.session_id);
        let event = self
            .warnings
            .announce(MONITORING_STARTED_MESSAGE, self.config.status_clear(), now);
        records.extend(self.emit(now, vec![event]));
        records
    }

    /// Run every tick and auto-clear due up to `now`.
    pub fn advance_to(&mut self, now: DateTime<Utc>) -> Vec<AlertRecord> {
        let mut records = Vec::new();
        if self.clock.is_none() {
            return records;
        }

        loop {
            let next_tick = self.cadence.next_due();
            let next_clear = self.warnings.next_deadline();

            match (next_clear, next_tick) {
                (Some(clear), tick) if clear <= now && tick.map_or(true, |t| clear <= t) => {
                    if let Some(event) = self.warnings.poll(clear) {
                        records.extend(self.emit(clear, vec![event]));
                    }
                }
                (_, Some(tick)) if tick <= now => {
                    self.cadence.advance();
                    let events = self.run_tick(tick);
                    records.extend(self.emit(tick, events));
                }
                _ => break,
            }
        }

        if self.clock.map_or(true, |c| now > c) {
            self.clock = Some(now);
        }
        records
    }

    /// Fire the pending auto-clear (and any ticks before it), if one is set.
    pub fn drain(&mut self) -> Vec<AlertRecord> {
        match self.warnings.next_deadline() {
            Some(deadline) => self.advance_to(deadline),
            None => Vec::new(),
        }
    }

    /// End the session: cancel the pending auto-clear and forget all state.
    ///
    /// The next input starts a new session with a fresh id.
    pub fn end_session(&mut self) {
        log::info!(
            "ending session {} after {} ticks ({} tab switches)",
            self.session_id,
            self.cadence.ticks(),
            self.visibility.hide_transitions()
        );
        self.warnings.reset();
        self.detectors.reset();
        self.visibility.reset();
        self.cadence.stop();
        self.latest = None;
        self.diagnostics = None;
        self.clock = None;
        self.session_id = Uuid::new_v4().to_string();
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            session_id: self.session_id.clone(),
            clock_utc: self.clock.map(|c| c.to_rfc3339()),
            ticks: self.cadence.ticks(),
            warning: self.warnings.state(),
            visibility: self.visibility.state(),
            tab_switches: self.visibility.hide_transitions(),
            detector_counters: DetectorKind::ALL
                .iter()
                .map(|kind| {
                    (
                        kind.as_str().to_string(),
                        self.detectors.get(*kind).consecutive_ticks(),
                    )
                })
                .collect(),
            diagnostics: self.diagnostics,
            diagnostics_text: self.diagnostics.map(|d| d.to_string()),
        }
    }

    /// Start the session if needed, clamp `at` to the monitor clock and run
    /// everything due before it.
    fn catch_up(&mut self, at: DateTime<Utc>) -> (DateTime<Utc>, Vec<AlertRecord>) {
        let now = match self.clock {
            None => {
                log::info!("starting session {} at {}", self.session_id, at.to_rfc3339());
                self.clock = Some(at);
                self.cadence.start(at);
                at
            }
            Some(clock) if at < clock => {
                log::warn!(
                    "input at {} is older than monitor clock {}; applying at clock",
                    at.to_rfc3339(),
                    clock.to_rfc3339()
                );
                clock
            }
            Some(_) => at,
        };
        let records = self.advance_to(now);
        (now, records)
    }

    fn run_tick(&mut self, at: DateTime<Utc>) -> Vec<AlertEvent> {
        let input = match self.latest.as_mut() {
            Some(latest) if latest.fresh => {
                latest.fresh = false;
                TickInput {
                    face_count: Some(latest.face_count),
                    features: latest.features,
                }
            }
            _ => {
                log::debug!("tick at {} has no fresh batch; detectors hold", at.to_rfc3339());
                TickInput::no_signal()
            }
        };

        let fired: Vec<(ViolationKind, Option<DetectorKind>)> = self
            .detectors
            .tick(&input)
            .into_iter()
            .map(|kind| (kind.violation(), Some(kind)))
            .collect();
        let mut events = self.warnings.report_violations(&fired, at);

        if self.emit_diagnostics {
            if let Some(readout) = self.diagnostics {
                events.push(AlertEvent::Diagnostics {
                    stats: readout.to_string(),
                    readout,
                });
            }
        }
        events
    }

    fn emit(&mut self, at: DateTime<Utc>, events: Vec<AlertEvent>) -> Vec<AlertRecord> {
        let state = self.warnings.state();
        let records: Vec<AlertRecord> = events
            .into_iter()
            .map(|event| self.encoder.encode(&self.session_id, at, event, state.clone()))
            .collect();

        if let Some(sink) = self.sink.as_mut() {
            for record in &records {
                if let Err(e) = sink.publish(record) {
                    log::warn!("failed to publish alert: {}", e);
                }
            }
        }
        records
    }
}
