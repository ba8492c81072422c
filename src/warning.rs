//! Warning aggregation
//!
//! The aggregator is the single owner of the shared warning state: the
//! violation tally, the message currently on display and the one pending
//! auto-clear deadline. Detectors and the visibility monitor report into it;
//! nothing else mutates it.
//!
//! Time is passed in explicitly. The auto-clear is a deadline, not a
//! callback: whoever drives the aggregator calls [`WarningAggregator::poll`]
//! once the deadline passes. Replacing or cancelling the deadline therefore
//! can never leave a stale timer behind.

use crate::config::{AutoClearPolicy, MonitorConfig};
use crate::types::{AlertEvent, DetectorKind, ViolationKind, WarningState, FINAL_WARNING_MESSAGE};
use chrono::{DateTime, Duration, Utc};

/// Shared tally, message and auto-clear deadline
#[derive(Debug, Clone)]
pub struct WarningAggregator {
    tally: u32,
    message: String,
    clear_at: Option<DateTime<Utc>>,
    final_warning_threshold: u32,
    display_duration: Duration,
    policy: AutoClearPolicy,
}

impl WarningAggregator {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            tally: 0,
            message: String::new(),
            clear_at: None,
            final_warning_threshold: config.final_warning_threshold,
            display_duration: config.auto_clear(),
            policy: config.auto_clear_policy,
        }
    }

    /// Count a violation and publish its message.
    ///
    /// Returns the violation event, followed by a final-warning event when the
    /// tally reaches the escalation threshold (the tally is then reset to 0).
    pub fn report_violation(
        &mut self,
        violation: ViolationKind,
        detector: Option<DetectorKind>,
        now: DateTime<Utc>,
    ) -> Vec<AlertEvent> {
        self.report_violations(&[(violation, detector)], now)
    }

    /// Count every violation raised at the same instant, then escalate once.
    ///
    /// The threshold is checked after the whole group is counted, so a final
    /// warning is always the message left on display.
    pub fn report_violations(
        &mut self,
        violations: &[(ViolationKind, Option<DetectorKind>)],
        now: DateTime<Utc>,
    ) -> Vec<AlertEvent> {
        let Some(&(last, _)) = violations.last() else {
            return Vec::new();
        };

        let mut events = Vec::with_capacity(violations.len() + 1);
        for &(violation, detector) in violations {
            self.tally += 1;
            self.message = violation.message().to_string();
            log::info!(
                "violation {:?} reported (tally {}/{})",
                violation,
                self.tally,
                self.final_warning_threshold
            );
            events.push(AlertEvent::Violation {
                violation,
                detector,
                message: self.message.clone(),
                tally: self.tally,
            });
        }
        self.schedule_clear(now + self.display_duration);

        if self.tally >= self.final_warning_threshold {
            self.message = FINAL_WARNING_MESSAGE.to_string();
            self.tally = 0;
            log::info!("final warning raised after {:?}", last);
            events.push(AlertEvent::FinalWarning {
                message: self.message.clone(),
                triggered_by: last,
            });
        }

        events
    }

    /// Show an informational message for `duration` without counting it.
    pub fn announce(&mut self, message: &str, duration: Duration, now: DateTime<Utc>) -> AlertEvent {
        self.message = message.to_string();
        self.schedule_clear(now + duration);
        AlertEvent::Status {
            message: self.message.clone(),
        }
    }

    fn schedule_clear(&mut self, at: DateTime<Utc>) {
        match (self.policy, self.clear_at) {
            (AutoClearPolicy::KeepPending, Some(_)) => {}
            _ => self.clear_at = Some(at),
        }
    }

    /// Fire the auto-clear if its deadline has passed.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<AlertEvent> {
        let due = self.clear_at.filter(|at| *at <= now)?;
        self.clear_at = None;
        log::debug!("auto-clear due at {} fired", due.to_rfc3339());
        if self.message.is_empty() {
            return None;
        }
        self.message.clear();
        Some(AlertEvent::MessageCleared)
    }

    /// When the pending auto-clear is due, if one is scheduled
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.clear_at
    }

    /// Drop the pending auto-clear; the current message stays up.
    pub fn cancel_auto_clear(&mut self) {
        self.clear_at = None;
    }

    /// Return to the initial state: no tally, no message, no pending clear.
    pub fn reset(&mut self) {
        self.tally = 0;
        self.message.clear();
        self.clear_at = None;
    }

    pub fn tally(&self) -> u32 {
        self.tally
    }

    pub fn current_message(&self) -> &str {
        &self.message
    }

    pub fn state(&self) -> WarningState {
        WarningState {
            violation_tally: self.tally,
            current_message: self.message.clone(),
            auto_clear_scheduled: self.clear_at.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LOOKING_AWAY_MESSAGE, TAB_SWITCH_MESSAGE};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap()
    }

    fn secs(n: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(n)
    }

    fn aggregator() -> WarningAggregator {
        WarningAggregator::new(&MonitorConfig::default())
    }

    #[test]
    fn test_tally_escalates_and_resets() {
        let mut agg = aggregator();

        let first = agg.report_violation(ViolationKind::LookingAway, Some(DetectorKind::GazeAngle), t0());
        assert_eq!(first.len(), 1);
        assert_eq!(agg.tally(), 1);
        assert_eq!(agg.current_message(), LOOKING_AWAY_MESSAGE);

        agg.report_violation(ViolationKind::EyesClosed, Some(DetectorKind::EyesClosed), t0());
        assert_eq!(agg.tally(), 2);

        let third = agg.report_violation(ViolationKind::TabSwitch, None, t0());
        assert_eq!(
            third,
            vec![
                AlertEvent::Violation {
                    violation: ViolationKind::TabSwitch,
                    detector: None,
                    message: TAB_SWITCH_MESSAGE.to_string(),
                    tally: 3,
                },
                AlertEvent::FinalWarning {
                    message: FINAL_WARNING_MESSAGE.to_string(),
                    triggered_by: ViolationKind::TabSwitch,
                },
            ]
        );
        assert_eq!(agg.tally(), 0);
        assert_eq!(agg.current_message(), FINAL_WARNING_MESSAGE);
    }

    #[test]
    fn test_tally_does_not_carry_over_escalations() {
        let mut agg = aggregator();
        let finals = (0..7)
            .flat_map(|_| agg.report_violation(ViolationKind::MultipleFaces, None, t0()))
            .filter(|e| matches!(e, AlertEvent::FinalWarning { .. }))
            .count();
        assert_eq!(finals, 2);
        assert_eq!(agg.tally(), 1);
    }

    #[test]
    fn test_simultaneous_violations_escalate_once_at_the_end() {
        let mut agg = aggregator();
        agg.report_violation(ViolationKind::TabSwitch, None, t0());
        agg.report_violation(ViolationKind::TabSwitch, None, t0());

        let events = agg.report_violations(
            &[
                (ViolationKind::LookingAway, Some(DetectorKind::GazeAngle)),
                (ViolationKind::LookingAway, Some(DetectorKind::GazeProximity)),
            ],
            secs(1),
        );

        let tallies: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                AlertEvent::Violation { tally, .. } => Some(*tally),
                _ => None,
            })
            .collect();
        assert_eq!(tallies, vec![3, 4]);
        assert_eq!(
            events.last(),
            Some(&AlertEvent::FinalWarning {
                message: FINAL_WARNING_MESSAGE.to_string(),
                triggered_by: ViolationKind::LookingAway,
            })
        );
        assert_eq!(agg.tally(), 0);
        assert_eq!(agg.current_message(), FINAL_WARNING_MESSAGE);
        assert!(agg.report_violations(&[], secs(1)).is_empty());
    }

    #[test]
    fn test_auto_clear_after_display_duration() {
        let mut agg = aggregator();
        agg.report_violation(ViolationKind::LookingAway, None, t0());
        assert!(agg.state().auto_clear_scheduled);

        assert_eq!(agg.poll(secs(2)), None);
        assert_eq!(agg.current_message(), LOOKING_AWAY_MESSAGE);

        assert_eq!(agg.poll(secs(3)), Some(AlertEvent::MessageCleared));
        assert_eq!(agg.state(), WarningState {
            violation_tally: 1,
            current_message: String::new(),
            auto_clear_scheduled: false,
        });
    }

    #[test]
    fn test_refresh_policy_extends_deadline() {
        let mut agg = aggregator();
        agg.report_violation(ViolationKind::LookingAway, None, t0());
        agg.report_violation(ViolationKind::EyesClosed, None, secs(2));

        assert_eq!(agg.next_deadline(), Some(secs(5)));
        assert_eq!(agg.poll(secs(3)), None);
        assert_eq!(agg.poll(secs(5)), Some(AlertEvent::MessageCleared));
    }

    #[test]
    fn test_keep_pending_policy_leaves_first_deadline() {
        let config = MonitorConfig {
            auto_clear_policy: AutoClearPolicy::KeepPending,
            ..MonitorConfig::default()
        };
        let mut agg = WarningAggregator::new(&config);
        agg.report_violation(ViolationKind::LookingAway, None, t0());
        agg.report_violation(ViolationKind::EyesClosed, None, secs(2));

        assert_eq!(agg.next_deadline(), Some(secs(3)));
        assert_eq!(agg.poll(secs(3)), Some(AlertEvent::MessageCleared));

        // A later violation schedules a fresh clear once the old one fired
        agg.report_violation(ViolationKind::MultipleFaces, None, secs(4));
        assert_eq!(agg.next_deadline(), Some(secs(7)));
    }

    #[test]
    fn test_announce_does_not_count() {
        let mut agg = aggregator();
        let event = agg.announce("Camera monitoring started", Duration::seconds(2), t0());
        assert!(matches!(event, AlertEvent::Status { .. }));
        assert_eq!(agg.tally(), 0);
        assert_eq!(agg.poll(secs(2)), Some(AlertEvent::MessageCleared));
    }

    #[test]
    fn test_cancel_and_reset_drop_pending_clear() {
        let mut agg = aggregator();
        agg.report_violation(ViolationKind::LookingAway, None, t0());
        agg.cancel_auto_clear();
        assert_eq!(agg.poll(secs(10)), None);
        assert_eq!(agg.current_message(), LOOKING_AWAY_MESSAGE);

        agg.report_violation(ViolationKind::LookingAway, None, secs(10));
        agg.reset();
        assert_eq!(agg.state(), WarningState::default());

        // A message published after the reset is not cleared by the old deadline
        agg.announce("Camera monitoring started", Duration::seconds(2), secs(12));
        assert_eq!(agg.poll(secs(13)), None);
        assert_eq!(agg.current_message(), "Camera monitoring started");
    }
}
