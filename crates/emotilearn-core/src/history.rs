//! Bounded in-memory record of recent emotion samples.

use std::collections::VecDeque;

use crate::emotion::EmotionSample;

/// Default number of samples retained.
pub const HISTORY_CAPACITY: usize = 20;

/// Ring buffer of the most recent samples, oldest evicted first.
#[derive(Debug, Clone)]
pub struct EmotionHistoryLog {
    samples: VecDeque<EmotionSample>,
    capacity: usize,
}

impl EmotionHistoryLog {
    /// A capacity of zero is bumped to one. Storage grows as samples
    /// arrive, so a large bound costs nothing up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&mut self, sample: EmotionSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Last `k` samples in insertion order. `k` is clamped to what is held.
    pub fn recent(&self, k: usize) -> Vec<EmotionSample> {
        let skip = self.samples.len().saturating_sub(k);
        self.samples.iter().skip(skip).cloned().collect()
    }

    pub fn latest(&self) -> Option<&EmotionSample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EmotionHistoryLog {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::EmotionLabel;
    use proptest::prelude::*;

    fn sample(label: EmotionLabel) -> EmotionSample {
        EmotionSample::certain(label)
    }

    #[test]
    fn empty_log_returns_nothing() {
        let log = EmotionHistoryLog::default();
        assert!(log.recent(5).is_empty());
        assert!(log.latest().is_none());
    }

    #[test]
    fn evicts_oldest_past_capacity() {
        let mut log = EmotionHistoryLog::with_capacity(2);
        log.record(sample(EmotionLabel::Happy));
        log.record(sample(EmotionLabel::Sad));
        log.record(sample(EmotionLabel::Bored));

        let labels: Vec<_> = log.recent(2).iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec![EmotionLabel::Sad, EmotionLabel::Bored]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn huge_capacity_does_not_preallocate() {
        let mut log = EmotionHistoryLog::with_capacity(usize::MAX);
        log.record(sample(EmotionLabel::Happy));
        assert_eq!(log.len(), 1);
        assert_eq!(log.recent(usize::MAX).len(), 1);
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let mut log = EmotionHistoryLog::default();
        for label in [EmotionLabel::Happy, EmotionLabel::Focused, EmotionLabel::Angry] {
            log.record(sample(label));
        }
        let labels: Vec<_> = log.recent(2).iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec![EmotionLabel::Focused, EmotionLabel::Angry]);
    }

    fn any_label() -> impl Strategy<Value = EmotionLabel> {
        (0..EmotionLabel::ALL.len()).prop_map(|i| EmotionLabel::ALL[i])
    }

    proptest! {
        #[test]
        fn recent_n_is_last_n_recorded(labels in prop::collection::vec(any_label(), 0..80)) {
            let mut log = EmotionHistoryLog::default();
            for &label in &labels {
                log.record(sample(label));
            }
            let got: Vec<_> = log.recent(HISTORY_CAPACITY).iter().map(|s| s.label()).collect();
            let start = labels.len().saturating_sub(HISTORY_CAPACITY);
            prop_assert_eq!(got, labels[start..].to_vec());
            prop_assert!(log.len() <= HISTORY_CAPACITY);
        }
    }
}
