//! Virtual time and cancellable delayed tasks.
//!
//! The core never sleeps. Delayed work is recorded as a [`ScheduledTask`]
//! stamped with the queue's current generation; the event loop asks for
//! due tasks and the controller applies them. Bumping the generation
//! invalidates everything scheduled before it, so a stale timer cannot
//! fire into a state the user has already left.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::mode::Mode;

/// Monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Milliseconds since construction, from `Instant`.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set_ms(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Mode switch requested by an emotion sample.
    EmotionTransition,
    /// Return to the dashboard after the last quiz question.
    QuizReturn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub kind: TaskKind,
    pub target: Mode,
    pub due_at_ms: u64,
    pub generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    tasks: Vec<ScheduledTask>,
    generation: u64,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn schedule(&mut self, kind: TaskKind, target: Mode, due_at_ms: u64) -> ScheduledTask {
        let task = ScheduledTask {
            kind,
            target,
            due_at_ms,
            generation: self.generation,
        };
        self.tasks.push(task);
        task
    }

    /// Invalidate every pending task. Returns the live tasks dropped.
    pub fn cancel_all(&mut self) -> Vec<ScheduledTask> {
        self.generation += 1;
        let generation = self.generation;
        std::mem::take(&mut self.tasks)
            .into_iter()
            .filter(|t| t.generation + 1 == generation)
            .collect()
    }

    /// Remove live tasks of one kind without touching the generation.
    pub fn cancel_kind(&mut self, kind: TaskKind) -> Vec<ScheduledTask> {
        self.cancel_matching(|t| t.kind == kind)
    }

    /// Remove tasks matching `pred` without touching the generation.
    /// Returns the live ones dropped.
    pub fn cancel_matching(&mut self, pred: impl Fn(&ScheduledTask) -> bool) -> Vec<ScheduledTask> {
        let (dropped, kept): (Vec<_>, Vec<_>) = self.tasks.drain(..).partition(|t| pred(t));
        self.tasks = kept;
        dropped
            .into_iter()
            .filter(|t| t.generation == self.generation)
            .collect()
    }

    pub fn pending(&self, kind: TaskKind) -> Option<&ScheduledTask> {
        self.tasks
            .iter()
            .find(|t| t.kind == kind && t.generation == self.generation)
    }

    /// Remove and return tasks due at `now_ms`, earliest first.
    /// Tasks from an older generation are discarded.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<ScheduledTask> {
        let generation = self.generation;
        self.tasks.retain(|t| t.generation == generation);
        let (mut due, later): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|t| t.due_at_ms <= now_ms);
        self.tasks = later;
        due.sort_by_key(|t| t.due_at_ms);
        due
    }

    /// Earliest deadline among live tasks.
    pub fn next_due_at(&self) -> Option<u64> {
        self.tasks
            .iter()
            .filter(|t| t.generation == self.generation)
            .map(|t| t.due_at_ms)
            .min()
    }

    pub fn is_empty(&self) -> bool {
        self.next_due_at().is_none()
    }

    pub fn live(&self) -> Vec<ScheduledTask> {
        self.tasks
            .iter()
            .filter(|t| t.generation == self.generation)
            .copied()
            .collect()
    }
}
