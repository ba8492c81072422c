//! Host visibility monitoring
//!
//! The host reports when the monitored page or window loses and regains the
//! foreground. Losing it is a violation on its own, no dwell required. Only
//! the visible → hidden transition counts; repeated "hidden" signals without
//! an intervening "visible" are ignored.

use serde::{Deserialize, Serialize};

/// Foreground state reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityState {
    Visible,
    Hidden,
}

#[derive(Debug, Clone)]
pub struct VisibilityMonitor {
    state: VisibilityState,
    hide_transitions: u32,
}

impl Default for VisibilityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityMonitor {
    pub fn new() -> Self {
        Self {
            state: VisibilityState::Visible,
            hide_transitions: 0,
        }
    }

    /// Record a host signal; returns true when it is a new hide transition.
    pub fn observe(&mut self, next: VisibilityState) -> bool {
        let previous = std::mem::replace(&mut self.state, next);
        let lost = previous == VisibilityState::Visible && next == VisibilityState::Hidden;
        if lost {
            self.hide_transitions += 1;
        } else if previous == next {
            log::debug!("duplicate visibility signal {:?} ignored", next);
        }
        lost
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Hide transitions seen this session
    pub fn hide_transitions(&self) -> u32 {
        self.hide_transitions
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
