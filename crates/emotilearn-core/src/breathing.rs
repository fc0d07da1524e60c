//! Breathing-cycle derivation and per-emotion guidance.
//!
//! The cycle position is a pure function of active meditation seconds and
//! a pattern, so there is no breathing timer to keep in sync.

use serde::{Deserialize, Serialize};

use crate::emotion::EmotionLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
}

impl BreathPhase {
    pub fn instruction(&self) -> &'static str {
        match self {
            BreathPhase::Inhale => "Breathe in slowly...",
            BreathPhase::Hold => "Hold gently...",
            BreathPhase::Exhale => "Breathe out slowly...",
        }
    }
}

/// Seconds spent in each phase. All components are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingPattern {
    pub inhale_secs: u32,
    pub hold_secs: u32,
    pub exhale_secs: u32,
}

impl BreathingPattern {
    pub const fn new(inhale_secs: u32, hold_secs: u32, exhale_secs: u32) -> Self {
        Self {
            inhale_secs,
            hold_secs,
            exhale_secs,
        }
    }

    pub fn total_secs(&self) -> u64 {
        self.inhale_secs as u64 + self.hold_secs as u64 + self.exhale_secs as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingCycleState {
    pub phase: BreathPhase,
    /// Position within the whole cycle, in `[0, total)`.
    pub elapsed_in_cycle: u64,
}

impl BreathingCycleState {
    pub const START: BreathingCycleState = BreathingCycleState {
        phase: BreathPhase::Inhale,
        elapsed_in_cycle: 0,
    };
}

/// Where in the cycle `elapsed_active_secs` falls.
pub fn phase_at(elapsed_active_secs: u64, pattern: &BreathingPattern) -> BreathingCycleState {
    let total = pattern.total_secs();
    if total == 0 {
        return BreathingCycleState::START;
    }
    let t = elapsed_active_secs % total;
    let inhale = pattern.inhale_secs as u64;
    let hold_end = inhale + pattern.hold_secs as u64;
    let phase = if t < inhale {
        BreathPhase::Inhale
    } else if t < hold_end {
        BreathPhase::Hold
    } else {
        BreathPhase::Exhale
    };
    BreathingCycleState {
        phase,
        elapsed_in_cycle: t,
    }
}

/// Emotion-specific framing for a meditation break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreathingGuidance {
    pub title: &'static str,
    pub instruction: &'static str,
    pub pattern: BreathingPattern,
}

const CENTERING: BreathingGuidance = BreathingGuidance {
    title: "Centering Practice",
    instruction: "Find your center with balanced breathing",
    pattern: BreathingPattern::new(4, 4, 4),
};

pub fn guidance_for(label: EmotionLabel) -> BreathingGuidance {
    match label {
        EmotionLabel::Frustrated => BreathingGuidance {
            title: "Calming Breath",
            instruction: "Let's release that tension with gentle breathing",
            pattern: BreathingPattern::new(4, 4, 6),
        },
        EmotionLabel::Sad => BreathingGuidance {
            title: "Gentle Comfort",
            instruction: "Be kind to yourself with this soothing practice",
            pattern: BreathingPattern::new(4, 2, 4),
        },
        EmotionLabel::Bored => BreathingGuidance {
            title: "Energizing Focus",
            instruction: "Recharge your mind with focused breathing",
            pattern: BreathingPattern::new(3, 3, 3),
        },
        EmotionLabel::Happy => BreathingGuidance {
            title: "Joyful Mindfulness",
            instruction: "Maintain this positive energy with mindful breathing",
            pattern: BreathingPattern::new(4, 4, 4),
        },
        _ => CENTERING,
    }
}

pub fn pattern_for(label: EmotionLabel) -> BreathingPattern {
    guidance_for(label).pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn phase_boundaries_are_exact() {
        let p = BreathingPattern::new(4, 4, 6);
        assert_eq!(phase_at(3, &p).phase, BreathPhase::Inhale);
        assert_eq!(phase_at(4, &p).phase, BreathPhase::Hold);
        assert_eq!(phase_at(7, &p).phase, BreathPhase::Hold);
        assert_eq!(phase_at(8, &p).phase, BreathPhase::Exhale);
        assert_eq!(phase_at(9, &p).phase, BreathPhase::Exhale);
        assert_eq!(phase_at(13, &p).phase, BreathPhase::Exhale);
        assert_eq!(phase_at(14, &p), BreathingCycleState::START);
    }

    #[test]
    fn unmapped_labels_fall_back_to_centering() {
        assert_eq!(guidance_for(EmotionLabel::Angry).title, "Centering Practice");
        assert_eq!(pattern_for(EmotionLabel::Surprised), BreathingPattern::new(4, 4, 4));
        assert_eq!(pattern_for(EmotionLabel::Sad), BreathingPattern::new(4, 2, 4));
    }

    proptest! {
        #[test]
        fn elapsed_in_cycle_stays_below_total(
            t in 0u64..1_000_000,
            inhale in 1u32..20,
            hold in 1u32..20,
            exhale in 1u32..20,
        ) {
            let p = BreathingPattern::new(inhale, hold, exhale);
            let state = phase_at(t, &p);
            prop_assert!(state.elapsed_in_cycle < p.total_secs());
            let expected = if state.elapsed_in_cycle < inhale as u64 {
                BreathPhase::Inhale
            } else if state.elapsed_in_cycle < (inhale + hold) as u64 {
                BreathPhase::Hold
            } else {
                BreathPhase::Exhale
            };
            prop_assert_eq!(state.phase, expected);
        }
    }
}
