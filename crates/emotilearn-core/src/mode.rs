use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::emotion::EmotionLabel;
use crate::error::ValidationError;

/// Top-level activity. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Dashboard,
    Quiz,
    Meditation,
    Focus,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Dashboard => "dashboard",
            Mode::Quiz => "quiz",
            Mode::Meditation => "meditation",
            Mode::Focus => "focus",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dashboard" => Ok(Mode::Dashboard),
            "quiz" => Ok(Mode::Quiz),
            "meditation" => Ok(Mode::Meditation),
            "focus" => Ok(Mode::Focus),
            other => Err(ValidationError::InvalidValue {
                field: "mode".into(),
                message: format!("unknown mode '{other}'"),
            }),
        }
    }
}

/// What caused a mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    Manual,
    Emotion,
    QuizComplete,
}

/// Mode an emotion label pulls toward, if any.
pub fn automatic_target(label: EmotionLabel) -> Option<Mode> {
    if label.is_distressed() {
        Some(Mode::Meditation)
    } else if label.is_disengaged() {
        Some(Mode::Quiz)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn automatic_targets_by_label() {
        assert_eq!(automatic_target(EmotionLabel::Frustrated), Some(Mode::Meditation));
        assert_eq!(automatic_target(EmotionLabel::Sad), Some(Mode::Meditation));
        assert_eq!(automatic_target(EmotionLabel::Bored), Some(Mode::Quiz));
        assert_eq!(automatic_target(EmotionLabel::Neutral), Some(Mode::Quiz));
        for label in [
            EmotionLabel::Happy,
            EmotionLabel::Focused,
            EmotionLabel::Angry,
            EmotionLabel::Surprised,
        ] {
            assert_eq!(automatic_target(label), None);
        }
    }

    #[test]
    fn parses_modes() {
        assert_eq!("Meditation".parse::<Mode>().unwrap(), Mode::Meditation);
        assert!("nap".parse::<Mode>().is_err());
    }
}
