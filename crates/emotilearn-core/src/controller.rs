//! Emotion-adaptive session controller.
//!
//! The controller is the mode state machine. It owns every piece of
//! mutable session state and is driven by three periodic triggers from a
//! single event loop:
//!
//! - `record_sample()` whenever the emotion source produces a sample
//! - `tick()` once per wall-clock second
//! - `poll()` whenever a scheduled task may be due (see `next_due_at()`)
//!
//! Plus the manual controls the presentation layer exposes. Every call
//! returns the events it produced; `snapshot()` gives the read-only view.
//!
//! ## Mode Transitions
//!
//! ```text
//!             frustrated|sad (+2000ms)        bored|neutral (+1500ms)
//! Dashboard ----------------------> Meditation    ----------------> Quiz
//!     ^                                                               |
//!     +------------------ last question answered (+2000ms) ----------+
//! ```
//!
//! Any manual `request_mode()` applies immediately and cancels whatever is
//! pending. An automatic change only drops what it makes stale: the quiz
//! return once the quiz is left, and a transition into the mode entered.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::achievements::{self, Achievement};
use crate::breathing::{self, BreathingCycleState, BreathingGuidance};
use crate::clock::{SessionClock, SessionState};
use crate::emotion::{EmotionLabel, EmotionSample};
use crate::error::{CoreError, NoActiveQuizReason, Result};
use crate::events::Event;
use crate::history::{EmotionHistoryLog, HISTORY_CAPACITY};
use crate::meditation::{self, MeditationSession, MeditationStatus, DEFAULT_DURATION_SECS};
use crate::mode::{automatic_target, Mode, TransitionCause};
use crate::motivation::{self, Prompt, Recommendation};
use crate::quiz::{self, Question, QuizAdvance, QuizSession};
use crate::scheduler::{Clock, ScheduledTask, TaskKind, TaskQueue};
use crate::storage::Config;

/// Tunables the controller needs from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    pub meditation_delay_ms: u64,
    pub quiz_delay_ms: u64,
    pub quiz_return_delay_ms: u64,
    pub history_capacity: usize,
    pub default_meditation_secs: u64,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            meditation_delay_ms: 2000,
            quiz_delay_ms: 1500,
            quiz_return_delay_ms: 2000,
            history_capacity: HISTORY_CAPACITY,
            default_meditation_secs: DEFAULT_DURATION_SECS,
        }
    }
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            meditation_delay_ms: config.transitions.meditation_delay_ms,
            quiz_delay_ms: config.transitions.quiz_delay_ms,
            quiz_return_delay_ms: config.transitions.quiz_return_delay_ms,
            history_capacity: config.session.history_capacity,
            default_meditation_secs: config.meditation.default_duration_secs,
        }
    }
}

pub struct SessionController {
    clock: Box<dyn Clock + Send>,
    settings: ControllerSettings,
    catalog: Vec<Question>,
    session_id: Option<Uuid>,
    session: SessionClock,
    history: EmotionHistoryLog,
    mode: Mode,
    tasks: TaskQueue,
    quiz: Option<QuizSession>,
    meditation: Option<MeditationSession>,
    /// Duration applied to the next meditation session.
    meditation_secs: u64,
    prompt_index: usize,
}

impl SessionController {
    pub fn new(
        clock: Box<dyn Clock + Send>,
        settings: ControllerSettings,
        catalog: Vec<Question>,
    ) -> Self {
        let meditation_secs = meditation::validate_duration(settings.default_meditation_secs)
            .unwrap_or(DEFAULT_DURATION_SECS);
        Self {
            clock,
            history: EmotionHistoryLog::with_capacity(settings.history_capacity),
            settings,
            catalog,
            session_id: None,
            session: SessionClock::new(),
            mode: Mode::Dashboard,
            tasks: TaskQueue::new(),
            quiz: None,
            meditation: None,
            meditation_secs,
            prompt_index: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Label of the most recent sample, `neutral` before any arrives.
    pub fn current_emotion(&self) -> EmotionLabel {
        self.history
            .latest()
            .map(|s| s.label())
            .unwrap_or_default()
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn history(&self) -> &EmotionHistoryLog {
        &self.history
    }

    pub fn quiz(&self) -> Option<&QuizSession> {
        self.quiz.as_ref()
    }

    pub fn meditation(&self) -> Option<&MeditationSession> {
        self.meditation.as_ref()
    }

    pub fn pending_tasks(&self) -> Vec<ScheduledTask> {
        self.tasks.live()
    }

    /// Earliest scheduled deadline, for the event loop to sleep until.
    pub fn next_due_at(&self) -> Option<u64> {
        self.tasks.next_due_at()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Current breathing position; only present in Meditation mode.
    pub fn breathing_state(&self) -> Option<BreathingCycleState> {
        let session = self.meditation.as_ref()?;
        Some(session.breathing(&breathing::pattern_for(self.current_emotion())))
    }

    pub fn snapshot(&self) -> Snapshot {
        let emotion = self.current_emotion();
        let elapsed = self.session.elapsed_secs();
        Snapshot {
            session_id: self.session_id,
            current_mode: self.mode,
            current_emotion: emotion,
            session: self.session.state(),
            breathing: self.meditation.as_ref().map(|m| {
                let guidance = breathing::guidance_for(emotion);
                let state = m.breathing(&guidance.pattern);
                BreathingView {
                    guidance,
                    instruction: state.phase.instruction(),
                    state,
                }
            }),
            meditation: self.meditation.as_ref().map(|m| MeditationView {
                status: m.status(),
                selected_duration_secs: m.selected_duration_secs(),
                active_secs: m.active_secs(),
                time_left_secs: m.time_left_secs(),
                progress_pct: m.progress_pct(),
            }),
            quiz: self.quiz.as_ref().map(|q| QuizView {
                emotion: q.emotion(),
                encouragement: quiz::encouragement_for(q.emotion()),
                questions: q.questions().to_vec(),
                current_index: q.current_index(),
                score: q.score(),
                answered: q.answered().to_vec(),
                finished: q.is_finished(),
                percent: q.percent(),
            }),
            prompt: (self.mode == Mode::Focus)
                .then(|| motivation::prompt_at(emotion, self.prompt_index)),
            recommendation: motivation::recommendation_for(emotion),
            study_progress_pct: motivation::study_progress_pct(elapsed),
            focus_score: motivation::focus_score(elapsed),
            pomodoro_count: motivation::pomodoro_count(elapsed),
            unlocked_achievements: achievements::unlocked_for(elapsed).to_vec(),
            next_milestone: achievements::next_milestone(elapsed).copied(),
            recent_emotions: self.history.recent(self.history.capacity()),
            pending: self.tasks.live(),
            at: Utc::now(),
        }
    }

    // ── Session controls ─────────────────────────────────────────────

    pub fn start_session(&mut self) -> Vec<Event> {
        if self.session.is_active() {
            return Vec::new();
        }
        let session_id = Uuid::new_v4();
        self.session_id = Some(session_id);
        self.session.start();
        tracing::info!(%session_id, "study session started");
        vec![Event::SessionStarted {
            session_id,
            at: Utc::now(),
        }]
    }

    /// Freeze the clock and drop every pending transition.
    pub fn stop_session(&mut self) -> Vec<Event> {
        if !self.session.is_active() {
            return Vec::new();
        }
        self.session.stop();
        let mut events = self.cancel_all_tasks();
        let elapsed_secs = self.session.elapsed_secs();
        tracing::info!(elapsed_secs, "study session stopped");
        events.push(Event::SessionStopped {
            elapsed_secs,
            at: Utc::now(),
        });
        events
    }

    pub fn reset_session(&mut self) -> Vec<Event> {
        self.session.reset();
        vec![Event::SessionReset { at: Utc::now() }]
    }

    // ── Triggers ─────────────────────────────────────────────────────

    /// Feed one emotion sample. Dropped while the session is inactive.
    pub fn record_sample(&mut self, sample: EmotionSample) -> Vec<Event> {
        let label = sample.label();
        if !self.session.is_active() {
            tracing::debug!(%label, "sample ignored: session inactive");
            return vec![Event::SampleIgnored { label }];
        }

        let mut events = vec![Event::EmotionRecorded {
            label,
            confidence: sample.confidence(),
            at: sample.at(),
        }];
        tracing::debug!(%label, confidence = sample.confidence(), "emotion recorded");
        self.history.record(sample);

        let pending = self.tasks.pending(TaskKind::EmotionTransition).copied();
        let target = automatic_target(label).filter(|t| *t != self.mode);
        match (target, pending) {
            (Some(target), Some(p)) if p.target == target => {
                // Same destination already armed; keep its deadline.
            }
            (Some(target), _) => {
                events.extend(self.cancel_emotion_transitions());
                let due_at_ms = self.clock.now_ms().saturating_add(self.delay_for(target));
                self.tasks
                    .schedule(TaskKind::EmotionTransition, target, due_at_ms);
                tracing::debug!(%target, due_at_ms, "automatic transition scheduled");
                events.push(Event::TransitionScheduled {
                    kind: TaskKind::EmotionTransition,
                    target,
                    due_at_ms,
                });
            }
            (None, _) => events.extend(self.cancel_emotion_transitions()),
        }
        events
    }

    /// One wall-clock second.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        let before = self.session.elapsed_secs();
        if self.session.tick() {
            let after = self.session.elapsed_secs();
            for achievement in achievements::newly_unlocked(before, after) {
                tracing::info!(label = achievement.label, "achievement unlocked");
                events.push(Event::AchievementUnlocked {
                    threshold_secs: achievement.threshold_secs,
                    label: achievement.label.to_string(),
                });
            }
        }
        if let Some(session) = self.meditation.as_mut() {
            if session.tick() {
                tracing::info!("meditation completed");
                events.push(Event::MeditationCompleted {
                    duration_secs: session.selected_duration_secs(),
                });
            }
        }
        events
    }

    /// Apply every scheduled task that has come due.
    pub fn poll(&mut self) -> Vec<Event> {
        let now = self.clock.now_ms();
        let mut events = Vec::new();
        for task in self.tasks.take_due(now) {
            // An earlier task in this batch may have changed mode.
            if task.generation != self.tasks.generation() {
                continue;
            }
            let cause = match task.kind {
                TaskKind::EmotionTransition => TransitionCause::Emotion,
                TaskKind::QuizReturn => TransitionCause::QuizComplete,
            };
            if task.target == self.mode {
                continue;
            }
            // A return queued in this batch is stale once the quiz is left.
            if task.kind == TaskKind::QuizReturn && self.mode != Mode::Quiz {
                continue;
            }
            events.extend(self.enter_mode(task.target, cause));
        }
        events
    }

    // ── Manual controls ──────────────────────────────────────────────

    /// Switch mode now. Cancels anything pending; re-requesting the
    /// current mode keeps its state.
    pub fn request_mode(&mut self, mode: Mode) -> Vec<Event> {
        if mode == self.mode {
            return self.cancel_all_tasks();
        }
        self.enter_mode(mode, TransitionCause::Manual)
    }

    pub fn submit_quiz_answer(&mut self, index: usize) -> Result<Vec<Event>> {
        let quiz = self.active_quiz()?;
        let outcome = quiz.submit(index).inspect_err(|e| {
            tracing::warn!(error = %e, "quiz answer rejected");
        })?;
        Ok(vec![Event::QuizAnswered {
            question_id: outcome.question_id,
            selected_index: outcome.selected_index,
            correct: outcome.correct,
            score: outcome.score,
        }])
    }

    /// Next question, or finish and schedule the return to the dashboard.
    pub fn advance_quiz(&mut self) -> Result<Vec<Event>> {
        let quiz = self.active_quiz()?;
        let advance = quiz.advance().inspect_err(|e| {
            tracing::warn!(error = %e, "quiz advance rejected");
        })?;
        match advance {
            QuizAdvance::Next(current_index) => Ok(vec![Event::QuizAdvanced { current_index }]),
            QuizAdvance::Finished => {
                let score = quiz.score();
                let total = quiz.questions().len();
                tracing::info!(score, total, "quiz finished");
                let delay = self.settings.quiz_return_delay_ms;
                Ok(vec![
                    Event::QuizFinished { score, total },
                    self.schedule_quiz_return(delay),
                ])
            }
        }
    }

    /// Choose the length of the next (or current, not yet running)
    /// meditation.
    pub fn select_meditation_duration(&mut self, secs: u64) -> Result<Vec<Event>> {
        let secs = meditation::validate_duration(secs).inspect_err(|e| {
            tracing::warn!(error = %e, "duration rejected");
        })?;
        if let Some(session) = self.meditation.as_mut() {
            session.select_duration(secs).inspect_err(|e| {
                tracing::warn!(error = %e, "duration rejected");
            })?;
        }
        self.meditation_secs = secs;
        Ok(vec![Event::DurationSelected {
            duration_secs: secs,
        }])
    }

    /// Start counting. From `Paused` this resumes; from `Completed` it
    /// restarts at the selected duration.
    pub fn start_meditation(&mut self) -> Result<Vec<Event>> {
        let session = self.active_meditation()?;
        match session.status() {
            MeditationStatus::Running => Ok(Vec::new()),
            MeditationStatus::Paused => {
                session.resume();
                Ok(vec![Event::MeditationResumed {
                    active_secs: session.active_secs(),
                }])
            }
            MeditationStatus::Ready | MeditationStatus::Completed => {
                session.start();
                Ok(vec![Event::MeditationStarted {
                    duration_secs: session.selected_duration_secs(),
                }])
            }
        }
    }

    /// Toggle between running and paused.
    pub fn pause_meditation(&mut self) -> Result<Vec<Event>> {
        let session = self.active_meditation()?;
        if session.pause() {
            Ok(vec![Event::MeditationPaused {
                active_secs: session.active_secs(),
            }])
        } else if session.resume() {
            Ok(vec![Event::MeditationResumed {
                active_secs: session.active_secs(),
            }])
        } else {
            Ok(Vec::new())
        }
    }

    pub fn resume_meditation(&mut self) -> Result<Vec<Event>> {
        let session = self.active_meditation()?;
        if session.resume() {
            Ok(vec![Event::MeditationResumed {
                active_secs: session.active_secs(),
            }])
        } else {
            Ok(Vec::new())
        }
    }

    pub fn reset_meditation(&mut self) -> Result<Vec<Event>> {
        let session = self.active_meditation()?;
        session.reset();
        Ok(vec![Event::MeditationReset])
    }

    /// Rotate to the next motivational prompt.
    pub fn next_prompt(&mut self) -> Vec<Event> {
        let deck_len = motivation::prompts_for(self.current_emotion()).len();
        self.prompt_index = (self.prompt_index + 1) % deck_len;
        vec![Event::PromptAdvanced {
            index: self.prompt_index,
        }]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn delay_for(&self, target: Mode) -> u64 {
        match target {
            Mode::Meditation => self.settings.meditation_delay_ms,
            _ => self.settings.quiz_delay_ms,
        }
    }

    fn active_quiz(&mut self) -> Result<&mut QuizSession> {
        match self.quiz.as_mut() {
            Some(quiz) if self.mode == Mode::Quiz => Ok(quiz),
            _ => {
                tracing::warn!(mode = %self.mode, "quiz control outside quiz mode");
                Err(CoreError::NoActiveQuiz(NoActiveQuizReason::NotInQuiz))
            }
        }
    }

    fn active_meditation(&mut self) -> Result<&mut MeditationSession> {
        match self.meditation.as_mut() {
            Some(session) => Ok(session),
            None => {
                tracing::warn!(mode = %self.mode, "meditation control outside meditation mode");
                Err(CoreError::NotInMeditation)
            }
        }
    }

    fn schedule_quiz_return(&mut self, delay_ms: u64) -> Event {
        let due_at_ms = self.clock.now_ms().saturating_add(delay_ms);
        self.tasks
            .schedule(TaskKind::QuizReturn, Mode::Dashboard, due_at_ms);
        Event::TransitionScheduled {
            kind: TaskKind::QuizReturn,
            target: Mode::Dashboard,
            due_at_ms,
        }
    }

    fn cancel_all_tasks(&mut self) -> Vec<Event> {
        self.tasks
            .cancel_all()
            .into_iter()
            .map(cancelled_event)
            .collect()
    }

    fn cancel_emotion_transitions(&mut self) -> Vec<Event> {
        self.tasks
            .cancel_kind(TaskKind::EmotionTransition)
            .into_iter()
            .map(cancelled_event)
            .collect()
    }

    /// Drop what an automatic mode change makes stale: the quiz return
    /// (the quiz is being left) and an emotion transition into `to`.
    fn cancel_stale_tasks(&mut self, to: Mode) -> Vec<Event> {
        self.tasks
            .cancel_matching(|t| t.kind == TaskKind::QuizReturn || t.target == to)
            .into_iter()
            .map(cancelled_event)
            .collect()
    }

    /// Leave the current mode, discard its transient state, set up the new one.
    ///
    /// A manual change invalidates everything pending. An automatic one
    /// keeps an emotion transition armed by a later sample.
    fn enter_mode(&mut self, to: Mode, cause: TransitionCause) -> Vec<Event> {
        let mut events = match cause {
            TransitionCause::Manual => self.cancel_all_tasks(),
            TransitionCause::Emotion | TransitionCause::QuizComplete => {
                self.cancel_stale_tasks(to)
            }
        };
        let from = self.mode;

        self.quiz = None;
        self.meditation = None;
        match to {
            Mode::Quiz => {
                let quiz = QuizSession::new(self.current_emotion(), &self.catalog);
                tracing::debug!(
                    emotion = %quiz.emotion(),
                    questions = quiz.questions().len(),
                    "quiz prepared"
                );
                self.quiz = Some(quiz);
            }
            Mode::Meditation => {
                self.meditation = Some(MeditationSession::new(self.meditation_secs));
            }
            Mode::Focus => self.prompt_index = 0,
            Mode::Dashboard => {}
        }
        self.mode = to;

        tracing::info!(%from, %to, ?cause, "mode changed");
        events.push(Event::ModeChanged {
            from,
            to,
            cause,
            at: Utc::now(),
        });

        if self.quiz.as_ref().is_some_and(|q| q.questions().is_empty()) {
            tracing::warn!("question catalog is empty; returning to dashboard");
            events.push(self.schedule_quiz_return(0));
        }
        events
    }
}

fn cancelled_event(task: ScheduledTask) -> Event {
    Event::TransitionCancelled {
        kind: task.kind,
        target: task.target,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BreathingView {
    pub guidance: BreathingGuidance,
    pub state: BreathingCycleState,
    pub instruction: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeditationView {
    pub status: MeditationStatus,
    pub selected_duration_secs: u64,
    pub active_secs: u64,
    pub time_left_secs: u64,
    pub progress_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizView {
    pub emotion: EmotionLabel,
    pub encouragement: &'static str,
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub score: u32,
    pub answered: Vec<usize>,
    pub finished: bool,
    pub percent: u32,
}

/// Read-only view of the controller for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub session_id: Option<Uuid>,
    pub current_mode: Mode,
    pub current_emotion: EmotionLabel,
    pub session: SessionState,
    pub breathing: Option<BreathingView>,
    pub meditation: Option<MeditationView>,
    pub quiz: Option<QuizView>,
    pub prompt: Option<Prompt>,
    pub recommendation: Recommendation,
    pub study_progress_pct: f64,
    pub focus_score: f64,
    pub pomodoro_count: u64,
    pub unlocked_achievements: Vec<Achievement>,
    pub next_milestone: Option<Achievement>,
    pub recent_emotions: Vec<EmotionSample>,
    pub pending: Vec<ScheduledTask>,
    pub at: DateTime<Utc>,
}
