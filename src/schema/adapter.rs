//! Adapter for converting proctor.frame_event.v1 records to monitor inputs
//!
//! Parses NDJSON / JSON array documents, validates each record and turns it
//! into the canonical `MonitorInput` the processor consumes.

use crate::error::ComputeError;
use crate::landmarks::FaceBatch;
use crate::schema::frame_event::*;
use crate::visibility::VisibilityState;
use chrono::{DateTime, Utc};

/// Canonical inbound signal
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorInput {
    Faces(FaceBatch),
    Visibility(VisibilityState),
    ModelReady,
}

/// Inbound signal with its event time
#[derive(Debug, Clone, PartialEq)]
pub struct TimedInput {
    pub at: DateTime<Utc>,
    pub input: MonitorInput,
}

impl From<FrameEvent> for TimedInput {
    fn from(event: FrameEvent) -> Self {
        let input = match event.payload {
            Payload::Faces { faces } => MonitorInput::Faces(FaceBatch::new(faces.faces)),
            Payload::Visibility { visibility } => MonitorInput::Visibility(visibility.state),
            Payload::ModelReady { .. } => MonitorInput::ModelReady,
        };
        TimedInput {
            at: event.timestamp,
            input,
        }
    }
}

/// Adapter for converting frame events to monitor inputs
pub struct FrameEventAdapter;

impl FrameEventAdapter {
    /// Parse a JSON string containing an array of FrameEvents
    pub fn parse_array(json: &str) -> Result<Vec<FrameEvent>, ComputeError> {
        let events: Vec<FrameEvent> = serde_json::from_str(json)?;
        Ok(events)
    }

    /// Parse NDJSON (newline-delimited JSON) containing FrameEvents
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<FrameEvent>, ComputeError> {
        let mut events = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let event = Self::parse_line(trimmed).map_err(|e| {
                ComputeError::ParseError(format!("Failed to parse line {}: {}", line_num + 1, e))
            })?;
            events.push(event);
        }
        Ok(events)
    }

    /// Parse a single NDJSON line
    pub fn parse_line(line: &str) -> Result<FrameEvent, ComputeError> {
        Ok(serde_json::from_str::<FrameEvent>(line)?)
    }

    /// Validate and convert events to inputs ordered by event time.
    ///
    /// The sort is stable, so events sharing a timestamp keep file order.
    pub fn to_inputs(events: Vec<FrameEvent>) -> Result<Vec<TimedInput>, ComputeError> {
        let mut inputs = Vec::with_capacity(events.len());
        for event in events {
            event.validate()?;
            inputs.push(TimedInput::from(event));
        }
        inputs.sort_by_key(|input| input.at);
        Ok(inputs)
    }

    /// Validate a batch of events
    pub fn validate_events(events: &[FrameEvent]) -> Vec<ValidationResult> {
        events
            .iter()
            .enumerate()
            .map(|(idx, event)| ValidationResult {
                index: idx,
                event_id: event.event_id.clone(),
                result: event.validate().err(),
            })
            .filter(|r| r.result.is_some())
            .collect()
    }
}

/// Result of event validation
#[derive(Debug)]
pub struct ValidationResult {
    pub index: usize,
    pub event_id: Option<String>,
    pub result: Option<ValidationError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{attentive_batch, crowd_batch};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap()
    }

    fn ndjson(events: &[FrameEvent]) -> String {
        events
            .iter()
            .map(|e| serde_json::to_string(e).unwrap())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_parse_ndjson_skips_blank_lines() {
        let doc = format!(
            "{}\n\n   \n{}\n",
            serde_json::to_string(&FrameEvent::model_ready(t0())).unwrap(),
            serde_json::to_string(&FrameEvent::faces(t0(), attentive_batch())).unwrap()
        );
        let events = FrameEventAdapter::parse_ndjson(&doc).unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_parse_ndjson_reports_line_number() {
        let doc = format!(
            "{}\n{{ not json",
            serde_json::to_string(&FrameEvent::model_ready(t0())).unwrap()
        );
        let err = FrameEventAdapter::parse_ndjson(&doc).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_array() {
        let events = vec![
            FrameEvent::model_ready(t0()),
            FrameEvent::visibility(t0(), VisibilityState::Hidden),
        ];
        let json = serde_json::to_string(&events).unwrap();
        assert_eq!(FrameEventAdapter::parse_array(&json).unwrap().len(), 2);
    }

    #[test]
    fn test_to_inputs_orders_by_time() {
        let later = t0() + Duration::milliseconds(1500);
        let doc = ndjson(&[
            FrameEvent::faces(later, crowd_batch(2)),
            FrameEvent::visibility(t0(), VisibilityState::Hidden),
            FrameEvent::model_ready(t0()),
        ]);
        let inputs = FrameEventAdapter::to_inputs(FrameEventAdapter::parse_ndjson(&doc).unwrap())
            .unwrap();

        assert_eq!(inputs.len(), 3);
        assert_eq!(inputs[0].input, MonitorInput::Visibility(VisibilityState::Hidden));
        assert_eq!(inputs[1].input, MonitorInput::ModelReady);
        assert_eq!(inputs[2].at, later);
        assert!(matches!(&inputs[2].input, MonitorInput::Faces(b) if b.face_count() == 2));
    }

    #[test]
    fn test_validate_events_collects_failures() {
        let mut bad = FrameEvent::model_ready(t0());
        bad.schema_version = "wear.raw_event.v1".to_string();
        let events = vec![FrameEvent::model_ready(t0()), bad];

        let failures = FrameEventAdapter::validate_events(&events);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].index, 1);

        assert!(FrameEventAdapter::to_inputs(events).is_err());
    }
}
