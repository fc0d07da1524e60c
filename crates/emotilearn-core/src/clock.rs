//! Study-session elapsed-time counter.
//!
//! Like the rest of the core, the clock owns no thread. The event loop calls
//! `tick()` once per wall-clock second; the clock only decides whether that
//! second counts.

use serde::{Deserialize, Serialize};

/// Elapsed study time and whether it is currently accruing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub elapsed_secs: u64,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    state: SessionState,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.state.elapsed_secs
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn start(&mut self) {
        self.state.active = true;
    }

    pub fn stop(&mut self) {
        self.state.active = false;
    }

    /// Zero the counter without touching `active`.
    pub fn reset(&mut self) {
        self.state.elapsed_secs = 0;
    }

    /// Count one second if active. Returns whether the counter moved.
    pub fn tick(&mut self) -> bool {
        if self.state.active {
            self.state.elapsed_secs = self.state.elapsed_secs.saturating_add(1);
        }
        self.state.active
    }
}

/// `mm:ss`, minutes unbounded.
pub fn format_mm_ss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// `Xh Ym` past the hour, `Ym` below it.
pub fn format_hours_minutes(secs: u64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}
