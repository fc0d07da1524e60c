//! Emotion-keyed motivational prompts and dashboard recommendations.

use serde::Serialize;

use crate::emotion::EmotionLabel;
use crate::mode::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub title: &'static str,
    pub action: &'static str,
}

const NEUTRAL_PROMPTS: &[Prompt] = &[
    Prompt {
        title: "Steady Wins the Race",
        action: "Set a small, achievable goal for the next 15 minutes",
    },
    Prompt {
        title: "The Power of Consistent Effort",
        action: "Focus on understanding rather than memorizing",
    },
];

/// Prompt deck for `label`; neutral for anything without its own deck.
pub fn prompts_for(label: EmotionLabel) -> &'static [Prompt] {
    match label {
        EmotionLabel::Frustrated => &[
            Prompt {
                title: "Every Expert Was Once a Beginner",
                action: "Break this problem into smaller, manageable steps",
            },
            Prompt {
                title: "Progress Over Perfection",
                action: "Write down one thing you've learned today",
            },
        ],
        EmotionLabel::Bored => &[
            Prompt {
                title: "Curiosity Ignites Learning",
                action: "Find one surprising fact about this topic",
            },
            Prompt {
                title: "Connect the Dots",
                action: "Think of a real-world application for what you're learning",
            },
        ],
        EmotionLabel::Happy => &[
            Prompt {
                title: "Ride the Wave of Positivity",
                action: "Challenge yourself with the hardest topic on your list",
            },
            Prompt {
                title: "Share Your Energy",
                action: "Explain this concept in your own words",
            },
        ],
        EmotionLabel::Focused => &[
            Prompt {
                title: "You're in the Zone",
                action: "Dive deeper into the most complex aspect of your topic",
            },
            Prompt {
                title: "Maximize This Moment",
                action: "Test yourself without looking at your notes",
            },
        ],
        EmotionLabel::Sad => &[
            Prompt {
                title: "Learning Heals",
                action: "Start with something small and build momentum",
            },
            Prompt {
                title: "You're Stronger Than You Know",
                action: "Acknowledge one thing you've accomplished recently",
            },
        ],
        _ => NEUTRAL_PROMPTS,
    }
}

/// Prompt at `index`, wrapping around the deck.
pub fn prompt_at(label: EmotionLabel, index: usize) -> Prompt {
    let deck = prompts_for(label);
    deck[index % deck.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub title: &'static str,
    /// Activity that suits the emotion, if any differs from studying on.
    pub suggested_mode: Option<Mode>,
}

pub fn recommendation_for(label: EmotionLabel) -> Recommendation {
    let (title, suggested_mode) = match label {
        EmotionLabel::Frustrated => ("Take a Breather", Some(Mode::Meditation)),
        EmotionLabel::Bored => ("Spice Things Up", Some(Mode::Quiz)),
        EmotionLabel::Happy => ("Great Energy!", None),
        EmotionLabel::Focused => ("In the Zone", Some(Mode::Focus)),
        EmotionLabel::Sad => ("Gentle Support", Some(Mode::Meditation)),
        _ => ("Ready to Learn", None),
    };
    Recommendation {
        title,
        suggested_mode,
    }
}

/// Half-hour target progress, 0.0 .. 100.0.
pub fn study_progress_pct(elapsed_secs: u64) -> f64 {
    (elapsed_secs as f64 / 1800.0 * 100.0).min(100.0)
}

/// Focus estimate oscillating over five-minute blocks, 0.0 .. 100.0.
pub fn focus_score(elapsed_secs: u64) -> f64 {
    let offset = (elapsed_secs % 300) as f64 - 150.0;
    (100.0 - offset.abs() / 1.5).max(0.0)
}

/// Completed five-minute blocks.
pub fn pomodoro_count(elapsed_secs: u64) -> u64 {
    elapsed_secs / 300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_has_a_non_empty_deck() {
        for label in EmotionLabel::ALL {
            assert!(!prompts_for(label).is_empty());
        }
        assert_eq!(prompts_for(EmotionLabel::Angry), NEUTRAL_PROMPTS);
    }

    #[test]
    fn prompt_index_wraps() {
        assert_eq!(
            prompt_at(EmotionLabel::Happy, 2),
            prompt_at(EmotionLabel::Happy, 0)
        );
    }

    #[test]
    fn dashboard_metrics() {
        assert_eq!(study_progress_pct(900), 50.0);
        assert_eq!(study_progress_pct(7200), 100.0);
        assert_eq!(focus_score(150), 100.0);
        assert_eq!(focus_score(0), 0.0);
        assert_eq!(pomodoro_count(899), 2);
    }

    #[test]
    fn recommendations_point_at_matching_modes() {
        assert_eq!(
            recommendation_for(EmotionLabel::Sad).suggested_mode,
            Some(Mode::Meditation)
        );
        assert_eq!(recommendation_for(EmotionLabel::Surprised).title, "Ready to Learn");
    }
}
