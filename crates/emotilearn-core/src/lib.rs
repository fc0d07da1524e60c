//! # EmotiLearn Core Library
//!
//! Core logic for an emotion-adaptive study session. A stream of emotion
//! samples steers the learner between a dashboard, an adaptive quiz, a
//! guided breathing meditation and a focus view. All operations are
//! available through the `emotilearn` CLI; any other front end is a thin
//! layer over the same controller.
//!
//! ## Architecture
//!
//! - **Controller**: A single-threaded mode state machine. The caller drives
//!   it by feeding samples, calling `tick()` once per second and `poll()`
//!   when a scheduled transition may be due
//! - **Scheduler**: Cancellable delayed transitions over an injectable clock
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionController`]: Mode state machine and session owner
//! - [`EmotionSource`]: Pluggable producer of emotion samples
//! - [`Config`]: Application configuration management

pub mod achievements;
pub mod breathing;
pub mod clock;
pub mod controller;
pub mod emotion;
pub mod error;
pub mod events;
pub mod history;
pub mod meditation;
pub mod mode;
pub mod motivation;
pub mod quiz;
pub mod scheduler;
pub mod source;
pub mod storage;

pub use breathing::{BreathPhase, BreathingCycleState, BreathingPattern};
pub use clock::{SessionClock, SessionState};
pub use controller::{ControllerSettings, SessionController, Snapshot};
pub use emotion::{EmotionLabel, EmotionSample};
pub use error::{ConfigError, CoreError, NoActiveQuizReason, ValidationError};
pub use events::Event;
pub use history::EmotionHistoryLog;
pub use meditation::{MeditationSession, MeditationStatus};
pub use mode::{Mode, TransitionCause};
pub use quiz::{Catalog, Difficulty, Question, QuizSession};
pub use scheduler::{Clock, ManualClock, SystemClock, TaskKind};
pub use source::{EmotionSource, ScriptedSource, WeightedSource};
pub use storage::Config;
