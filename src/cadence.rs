//! Fixed-rate sampling cadence
//!
//! Interval-timer semantics on event time: once started at `t0`, ticks are due
//! at `t0 + k * interval` for k = 1, 2, ... regardless of how irregularly
//! frames arrive.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
pub struct Cadence {
    interval: Duration,
    next_due: Option<DateTime<Utc>>,
    ticks: u64,
}

impl Cadence {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            ticks: 0,
        }
    }

    pub fn start(&mut self, at: DateTime<Utc>) {
        self.next_due = Some(at + self.interval);
        self.ticks = 0;
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.next_due
    }

    /// Consume the due tick and schedule the next one.
    pub fn advance(&mut self) -> Option<DateTime<Utc>> {
        let due = self.next_due?;
        self.next_due = Some(due + self.interval);
        self.ticks += 1;
        Some(due)
    }

    /// Ticks consumed since `start`
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_first_tick_one_interval_after_start() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap();
        let mut cadence = Cadence::new(Duration::seconds(1));
        assert_eq!(cadence.next_due(), None);

        cadence.start(t0);
        assert_eq!(cadence.advance(), Some(t0 + Duration::seconds(1)));
        assert_eq!(cadence.advance(), Some(t0 + Duration::seconds(2)));
        assert_eq!(cadence.next_due(), Some(t0 + Duration::seconds(3)));
        assert_eq!(cadence.ticks(), 2);
    }

    #[test]
    fn test_stopped_cadence_never_ticks() {
        let mut cadence = Cadence::new(Duration::milliseconds(250));
        cadence.start(Utc::now());
        cadence.stop();
        assert!(!cadence.is_running());
        assert_eq!(cadence.advance(), None);
    }
}
