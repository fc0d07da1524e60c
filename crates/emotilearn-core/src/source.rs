//! Emotion sources.
//!
//! The controller never asks how a label was produced. A source is polled
//! by the event loop on its own cadence and hands back the next sample, or
//! `None` when it has nothing to report (camera off, model unavailable,
//! script exhausted). An absent sample leaves the current emotion untouched.

use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::emotion::{EmotionLabel, EmotionSample};

/// Capability that produces emotion samples.
pub trait EmotionSource {
    /// Next sample, if one is available.
    fn next_sample(&mut self) -> Option<EmotionSample>;
}

/// Deterministic source replaying a fixed label sequence.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    labels: Vec<EmotionLabel>,
    position: usize,
    cycle: bool,
}

impl ScriptedSource {
    pub fn new(labels: Vec<EmotionLabel>) -> Self {
        Self {
            labels,
            position: 0,
            cycle: false,
        }
    }

    /// Restart from the first label once the script is exhausted.
    pub fn cycling(mut self) -> Self {
        self.cycle = true;
        self
    }

    pub fn remaining(&self) -> usize {
        self.labels.len().saturating_sub(self.position)
    }
}

impl EmotionSource for ScriptedSource {
    fn next_sample(&mut self) -> Option<EmotionSample> {
        if self.position >= self.labels.len() {
            if !self.cycle || self.labels.is_empty() {
                return None;
            }
            self.position = 0;
        }
        let label = self.labels[self.position];
        self.position += 1;
        Some(EmotionSample::certain(label))
    }
}

/// Label weights biased toward neutral and focused.
const DEFAULT_WEIGHTS: [(EmotionLabel, f64); 8] = [
    (EmotionLabel::Happy, 0.20),
    (EmotionLabel::Sad, 0.10),
    (EmotionLabel::Angry, 0.05),
    (EmotionLabel::Surprised, 0.10),
    (EmotionLabel::Neutral, 0.30),
    (EmotionLabel::Focused, 0.15),
    (EmotionLabel::Frustrated, 0.05),
    (EmotionLabel::Bored, 0.05),
];

/// Weighted random source standing in for a real classifier.
///
/// Confidence is drawn uniformly from `[0.6, 1.0)`.
#[derive(Debug, Clone)]
pub struct WeightedSource {
    rng: Pcg64,
    weights: Vec<(EmotionLabel, f64)>,
}

impl WeightedSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
            weights: DEFAULT_WEIGHTS.to_vec(),
        }
    }

    /// Seed from the thread RNG.
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    fn pick_label(&mut self) -> EmotionLabel {
        let total: f64 = self.weights.iter().map(|(_, w)| w).sum();
        let roll = self.rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        for &(label, weight) in &self.weights {
            cumulative += weight;
            if roll < cumulative {
                return label;
            }
        }
        // Float rounding can leave roll == total.
        self.weights
            .last()
            .map(|(label, _)| *label)
            .unwrap_or_default()
    }
}

impl EmotionSource for WeightedSource {
    fn next_sample(&mut self) -> Option<EmotionSample> {
        let label = self.pick_label();
        let confidence = self.rng.gen_range(0.6_f32..1.0);
        EmotionSample::new(label, confidence, Utc::now()).ok()
    }
}
