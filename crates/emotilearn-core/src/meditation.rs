//! Meditation sub-session.
//!
//! ## State Transitions
//!
//! ```text
//! Ready -> Running <-> Paused
//!             |
//!             v
//!         Completed -> (restart) Running
//! ```
//!
//! `active_secs` counts seconds spent `Running` since the last start or
//! reset. It freezes while paused and is the only input to the breathing
//! cycle, so the breathing guide pauses with it.

use serde::{Deserialize, Serialize};

use crate::breathing::{phase_at, BreathingCycleState, BreathingPattern};
use crate::error::{CoreError, Result};

/// Selectable session lengths in seconds.
pub const ALLOWED_DURATIONS: [u64; 3] = [120, 300, 600];

pub const DEFAULT_DURATION_SECS: u64 = 300;

pub fn validate_duration(secs: u64) -> Result<u64> {
    if ALLOWED_DURATIONS.contains(&secs) {
        Ok(secs)
    } else {
        Err(CoreError::InvalidDuration { secs })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeditationStatus {
    Ready,
    Running,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeditationSession {
    selected_duration_secs: u64,
    active_secs: u64,
    status: MeditationStatus,
}

impl MeditationSession {
    /// Fresh session in `Ready`. Falls back to the default length if
    /// `duration_secs` is not an allowed value.
    pub fn new(duration_secs: u64) -> Self {
        let selected_duration_secs =
            validate_duration(duration_secs).unwrap_or(DEFAULT_DURATION_SECS);
        Self {
            selected_duration_secs,
            active_secs: 0,
            status: MeditationStatus::Ready,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> MeditationStatus {
        self.status
    }

    pub fn selected_duration_secs(&self) -> u64 {
        self.selected_duration_secs
    }

    pub fn active_secs(&self) -> u64 {
        self.active_secs
    }

    pub fn time_left_secs(&self) -> u64 {
        self.selected_duration_secs.saturating_sub(self.active_secs)
    }

    /// 0.0 .. 100.0
    pub fn progress_pct(&self) -> f64 {
        if self.selected_duration_secs == 0 {
            return 0.0;
        }
        (self.active_secs as f64 / self.selected_duration_secs as f64 * 100.0).min(100.0)
    }

    pub fn breathing(&self, pattern: &BreathingPattern) -> BreathingCycleState {
        phase_at(self.active_secs, pattern)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Only allowed before the session has begun counting.
    pub fn select_duration(&mut self, secs: u64) -> Result<()> {
        let secs = validate_duration(secs)?;
        if matches!(self.status, MeditationStatus::Running | MeditationStatus::Paused) {
            return Err(CoreError::Validation(crate::error::ValidationError::InvalidValue {
                field: "duration".into(),
                message: "cannot change duration while a meditation is in progress".into(),
            }));
        }
        self.selected_duration_secs = secs;
        Ok(())
    }

    /// Start from zero. From `Completed` this is the restart action.
    /// Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.status == MeditationStatus::Running {
            return false;
        }
        self.active_secs = 0;
        self.status = MeditationStatus::Running;
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.status != MeditationStatus::Running {
            return false;
        }
        self.status = MeditationStatus::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.status != MeditationStatus::Paused {
            return false;
        }
        self.status = MeditationStatus::Running;
        true
    }

    /// Back to `Ready` at the selected duration, breathing at the start.
    pub fn reset(&mut self) {
        self.active_secs = 0;
        self.status = MeditationStatus::Ready;
    }

    /// Count one second while running. Returns true on the tick that
    /// completes the session.
    pub fn tick(&mut self) -> bool {
        if self.status != MeditationStatus::Running {
            return false;
        }
        self.active_secs += 1;
        if self.active_secs >= self.selected_duration_secs {
            self.active_secs = self.selected_duration_secs;
            self.status = MeditationStatus::Completed;
            return true;
        }
        false
    }
}

impl Default for MeditationSession {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS)
    }
}
