//! Live monitoring runtime
//!
//! Runs a [`MonitorProcessor`] on a dedicated worker thread that owns all
//! monitor state. Camera frames and visibility changes arrive as commands on
//! a channel; ticks and auto-clears fire from the wall clock while the worker
//! waits for the next command. Alert records leave through a second channel.

use crate::config::MonitorConfig;
use crate::error::ComputeError;
use crate::landmarks::FaceBatch;
use crate::pipeline::{MonitorProcessor, MonitorSnapshot};
use crate::types::AlertRecord;
use crate::visibility::VisibilityState;
use chrono::Utc;
use crossbeam_channel::{after, never, select, Receiver, Sender};
use std::thread::{self, JoinHandle};

enum Command {
    Faces(FaceBatch),
    Visibility(VisibilityState),
    ModelReady,
    Snapshot(Sender<MonitorSnapshot>),
    EndSession,
    Shutdown,
}

/// Handle to a running monitor worker
pub struct MonitorHandle {
    commands: Sender<Command>,
    worker: Option<JoinHandle<()>>,
}

/// Start a monitor worker.
///
/// Returns the handle used to feed it and the receiver its alert records are
/// published on.
pub fn spawn(
    config: MonitorConfig,
    emit_diagnostics: bool,
) -> Result<(MonitorHandle, Receiver<AlertRecord>), ComputeError> {
    let mut processor = MonitorProcessor::new(config)?;
    processor.set_emit_diagnostics(emit_diagnostics);

    let (alert_tx, alert_rx) = crossbeam_channel::unbounded::<AlertRecord>();
    processor.set_sink(Box::new(alert_tx));

    let (tx, rx) = crossbeam_channel::unbounded::<Command>();
    let worker = thread::Builder::new()
        .name("proctor-monitor".to_string())
        .spawn(move || run_worker(processor, rx))
        .map_err(|_| ComputeError::WorkerStopped)?;

    Ok((
        MonitorHandle {
            commands: tx,
            worker: Some(worker),
        },
        alert_rx,
    ))
}

fn run_worker(mut processor: MonitorProcessor, commands: Receiver<Command>) {
    log::debug!("monitor worker started");
    loop {
        let deadline = match processor.next_deadline() {
            Some(at) => after((at - Utc::now()).to_std().unwrap_or_default()),
            None => never(),
        };

        select! {
            recv(commands) -> msg => {
                let Ok(command) = msg else { break };
                let now = Utc::now();
                match command {
                    Command::Faces(batch) => {
                        processor.push_faces(batch, now);
                    }
                    Command::Visibility(state) => {
                        processor.push_visibility(state, now);
                    }
                    Command::ModelReady => {
                        processor.model_ready(now);
                    }
                    Command::Snapshot(reply) => {
                        processor.advance_to(now);
                        let _ = reply.send(processor.snapshot());
                    }
                    Command::EndSession => processor.end_session(),
                    Command::Shutdown => break,
                }
            }
            recv(deadline) -> _ => {
                processor.advance_to(Utc::now());
            }
        }
    }
    processor.end_session();
    log::debug!("monitor worker stopped");
}

impl MonitorHandle {
    fn send(&self, command: Command) -> Result<(), ComputeError> {
        self.commands
            .send(command)
            .map_err(|_| ComputeError::WorkerStopped)
    }

    pub fn push_faces(&self, batch: FaceBatch) -> Result<(), ComputeError> {
        self.send(Command::Faces(batch))
    }

    pub fn push_visibility(&self, state: VisibilityState) -> Result<(), ComputeError> {
        self.send(Command::Visibility(state))
    }

    pub fn model_ready(&self) -> Result<(), ComputeError> {
        self.send(Command::ModelReady)
    }

    pub fn end_session(&self) -> Result<(), ComputeError> {
        self.send(Command::EndSession)
    }

    pub fn snapshot(&self) -> Result<MonitorSnapshot, ComputeError> {
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        self.send(Command::Snapshot(reply_tx))?;
        reply_rx.recv().map_err(|_| ComputeError::WorkerStopped)
    }

    /// Stop the worker, ending its session, and wait for it to exit.
    pub fn shutdown(mut self) -> Result<(), ComputeError> {
        self.stop()
    }

    fn stop(&mut self) -> Result<(), ComputeError> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        let _ = self.commands.send(Command::Shutdown);
        worker.join().map_err(|_| ComputeError::WorkerStopped)
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::warn!("monitor worker did not stop cleanly: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{attentive_batch, crowd_batch};
    use crate::types::{AlertEvent, ViolationKind};
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    fn fast_config() -> MonitorConfig {
        MonitorConfig {
            tick_interval_ms: 20,
            auto_clear_ms: 60,
            status_clear_ms: 40,
            ..MonitorConfig::default()
        }
    }

    #[test]
    fn test_tab_switch_is_reported_immediately() {
        let (handle, alerts) = spawn(fast_config(), false).unwrap();
        handle.push_faces(attentive_batch()).unwrap();
        handle.push_visibility(VisibilityState::Hidden).unwrap();

        let record = alerts.recv_timeout(WAIT).unwrap();
        assert!(matches!(
            record.event,
            AlertEvent::Violation {
                violation: ViolationKind::TabSwitch,
                tally: 1,
                ..
            }
        ));

        // The auto-clear fires from the wall clock without further input
        let cleared = alerts.recv_timeout(WAIT).unwrap();
        assert_eq!(cleared.event, AlertEvent::MessageCleared);
        handle.shutdown().unwrap();
    }

    #[test]
    fn test_ticks_drive_detectors() {
        let (handle, alerts) = spawn(fast_config(), false).unwrap();
        handle.push_faces(crowd_batch(2)).unwrap();

        // Keep the batch fresh until the dwell elapses
        let fired = (0..200).find_map(|_| {
            handle.push_faces(crowd_batch(2)).unwrap();
            alerts
                .recv_timeout(Duration::from_millis(25))
                .ok()
                .filter(|r| r.event.is_violation())
        });

        let record = fired.unwrap();
        assert!(matches!(
            record.event,
            AlertEvent::Violation {
                violation: ViolationKind::MultipleFaces,
                ..
            }
        ));
        handle.shutdown().unwrap();
    }

    #[test]
    fn test_snapshot_and_end_session() {
        let (handle, _alerts) = spawn(fast_config(), false).unwrap();
        handle.model_ready().unwrap();

        let snapshot = handle.snapshot().unwrap();
        assert_eq!(snapshot.warning.violation_tally, 0);
        let first_session = snapshot.session_id;

        handle.end_session().unwrap();
        let snapshot = handle.snapshot().unwrap();
        assert_ne!(snapshot.session_id, first_session);
        assert_eq!(snapshot.warning.current_message, "");
        assert!(snapshot.clock_utc.is_none());
        handle.shutdown().unwrap();
    }

    #[test]
    fn test_alert_channel_closes_after_shutdown() {
        let (handle, alerts) = spawn(fast_config(), false).unwrap();
        handle.shutdown().unwrap();
        assert!(alerts.recv_timeout(WAIT).is_err());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = MonitorConfig {
            final_warning_threshold: 0,
            ..MonitorConfig::default()
        };
        assert!(spawn(config, false).is_err());
    }
}
