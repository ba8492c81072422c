//! Presentation targets
//!
//! The widget that actually shows warnings lives outside this crate. An
//! `AlertSink` is whatever hands records to it. A processor without a sink
//! still updates its state; records are simply not forwarded anywhere.

use crate::encoder::AlertEncoder;
use crate::error::ComputeError;
use crate::types::AlertRecord;
use std::io::Write;

pub trait AlertSink {
    fn publish(&mut self, record: &AlertRecord) -> Result<(), ComputeError>;
}

impl AlertSink for Vec<AlertRecord> {
    fn publish(&mut self, record: &AlertRecord) -> Result<(), ComputeError> {
        self.push(record.clone());
        Ok(())
    }
}

impl AlertSink for crossbeam_channel::Sender<AlertRecord> {
    fn publish(&mut self, record: &AlertRecord) -> Result<(), ComputeError> {
        self.send(record.clone())
            .map_err(|_| ComputeError::EncodingError("alert receiver disconnected".to_string()))
    }
}

/// Writes one JSON record per line
pub struct NdjsonSink<W: Write> {
    writer: W,
    flush: bool,
}

impl<W: Write> NdjsonSink<W> {
    pub fn new(writer: W, flush: bool) -> Self {
        Self { writer, flush }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> AlertSink for NdjsonSink<W> {
    fn publish(&mut self, record: &AlertRecord) -> Result<(), ComputeError> {
        let line = AlertEncoder::encode_to_json(record)?;
        writeln!(self.writer, "{line}").map_err(|e| ComputeError::EncodingError(e.to_string()))?;
        if self.flush {
            self.writer
                .flush()
                .map_err(|e| ComputeError::EncodingError(e.to_string()))?;
        }
        Ok(())
    }
}
