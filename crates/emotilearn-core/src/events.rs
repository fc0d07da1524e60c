use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::emotion::EmotionLabel;
use crate::mode::{Mode, TransitionCause};
use crate::scheduler::TaskKind;

/// Every state change in the controller produces an Event.
/// The presentation layer consumes them alongside a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        at: DateTime<Utc>,
    },
    SessionStopped {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    EmotionRecorded {
        label: EmotionLabel,
        confidence: f32,
        at: DateTime<Utc>,
    },
    /// Sample arrived while the session was inactive and was dropped.
    SampleIgnored {
        label: EmotionLabel,
    },
    TransitionScheduled {
        kind: TaskKind,
        target: Mode,
        due_at_ms: u64,
    },
    TransitionCancelled {
        kind: TaskKind,
        target: Mode,
    },
    ModeChanged {
        from: Mode,
        to: Mode,
        cause: TransitionCause,
        at: DateTime<Utc>,
    },
    QuizAnswered {
        question_id: u32,
        selected_index: usize,
        correct: bool,
        score: u32,
    },
    QuizAdvanced {
        current_index: usize,
    },
    QuizFinished {
        score: u32,
        total: usize,
    },
    DurationSelected {
        duration_secs: u64,
    },
    MeditationStarted {
        duration_secs: u64,
    },
    MeditationPaused {
        active_secs: u64,
    },
    MeditationResumed {
        active_secs: u64,
    },
    MeditationCompleted {
        duration_secs: u64,
    },
    MeditationReset,
    AchievementUnlocked {
        threshold_secs: u64,
        label: String,
    },
    PromptAdvanced {
        index: usize,
    },
}

impl Event {
    /// Short machine name of the variant, as used in the serialized tag.
    pub fn name(&self) -> &'static str {
        match self {
            Event::SessionStarted { .. } => "SessionStarted",
            Event::SessionStopped { .. } => "SessionStopped",
            Event::SessionReset { .. } => "SessionReset",
            Event::EmotionRecorded { .. } => "EmotionRecorded",
            Event::SampleIgnored { .. } => "SampleIgnored",
            Event::TransitionScheduled { .. } => "TransitionScheduled",
            Event::TransitionCancelled { .. } => "TransitionCancelled",
            Event::ModeChanged { .. } => "ModeChanged",
            Event::QuizAnswered { .. } => "QuizAnswered",
            Event::QuizAdvanced { .. } => "QuizAdvanced",
            Event::QuizFinished { .. } => "QuizFinished",
            Event::DurationSelected { .. } => "DurationSelected",
            Event::MeditationStarted { .. } => "MeditationStarted",
            Event::MeditationPaused { .. } => "MeditationPaused",
            Event::MeditationResumed { .. } => "MeditationResumed",
            Event::MeditationCompleted { .. } => "MeditationCompleted",
            Event::MeditationReset => "MeditationReset",
            Event::AchievementUnlocked { .. } => "AchievementUnlocked",
            Event::PromptAdvanced { .. } => "PromptAdvanced",
        }
    }
}
