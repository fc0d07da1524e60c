//! Emotion labels and timestamped samples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Closed set of affect labels an emotion source may report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Happy,
    Sad,
    Angry,
    Surprised,
    #[default]
    Neutral,
    Focused,
    Frustrated,
    Bored,
}

impl EmotionLabel {
    pub const ALL: [EmotionLabel; 8] = [
        EmotionLabel::Happy,
        EmotionLabel::Sad,
        EmotionLabel::Angry,
        EmotionLabel::Surprised,
        EmotionLabel::Neutral,
        EmotionLabel::Focused,
        EmotionLabel::Frustrated,
        EmotionLabel::Bored,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Happy => "happy",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Angry => "angry",
            EmotionLabel::Surprised => "surprised",
            EmotionLabel::Neutral => "neutral",
            EmotionLabel::Focused => "focused",
            EmotionLabel::Frustrated => "frustrated",
            EmotionLabel::Bored => "bored",
        }
    }

    /// Labels that call for a calming break.
    pub fn is_distressed(&self) -> bool {
        matches!(self, EmotionLabel::Frustrated | EmotionLabel::Sad)
    }

    /// Labels that call for a more engaging activity.
    pub fn is_disengaged(&self) -> bool {
        matches!(self, EmotionLabel::Bored | EmotionLabel::Neutral)
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionLabel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        EmotionLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == needle)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "emotion".into(),
                message: format!("unknown emotion label '{s}'"),
            })
    }
}

/// One timestamped classification of user affect.
///
/// Immutable once created; fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionSample {
    label: EmotionLabel,
    confidence: f32,
    at: DateTime<Utc>,
}

impl EmotionSample {
    /// Build a sample, rejecting confidences outside `[0, 1]`.
    pub fn new(
        label: EmotionLabel,
        confidence: f32,
        at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ValidationError::InvalidValue {
                field: "confidence".into(),
                message: format!("{confidence} is outside [0, 1]"),
            });
        }
        Ok(Self {
            label,
            confidence,
            at,
        })
    }

    /// Sample with full confidence stamped now.
    pub fn certain(label: EmotionLabel) -> Self {
        Self {
            label,
            confidence: 1.0,
            at: Utc::now(),
        }
    }

    pub fn label(&self) -> EmotionLabel {
        self.label
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }
}
