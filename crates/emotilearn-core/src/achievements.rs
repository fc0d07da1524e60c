//! Time-threshold milestones, recomputed from elapsed time on demand.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub threshold_secs: u64,
    pub label: &'static str,
}

/// Ascending by threshold.
pub const ACHIEVEMENTS: [Achievement; 4] = [
    Achievement {
        threshold_secs: 300,
        label: "5 Minute Milestone",
    },
    Achievement {
        threshold_secs: 900,
        label: "Quarter Hour Hero",
    },
    Achievement {
        threshold_secs: 1800,
        label: "30 Minute Champion",
    },
    Achievement {
        threshold_secs: 3600,
        label: "Hour of Power",
    },
];

/// Every achievement whose threshold is at or below `elapsed_secs`.
pub fn unlocked_for(elapsed_secs: u64) -> &'static [Achievement] {
    let count = ACHIEVEMENTS
        .iter()
        .take_while(|a| a.threshold_secs <= elapsed_secs)
        .count();
    &ACHIEVEMENTS[..count]
}

/// First achievement not yet reached.
pub fn next_milestone(elapsed_secs: u64) -> Option<&'static Achievement> {
    ACHIEVEMENTS
        .iter()
        .find(|a| a.threshold_secs > elapsed_secs)
}

/// Achievements crossed when time moves from `before` to `after`.
pub fn newly_unlocked(before: u64, after: u64) -> &'static [Achievement] {
    let from = unlocked_for(before).len();
    let to = unlocked_for(after).len();
    if to > from {
        &ACHIEVEMENTS[from..to]
    } else {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn thresholds(list: &[Achievement]) -> Vec<u64> {
        list.iter().map(|a| a.threshold_secs).collect()
    }

    #[test]
    fn unlocks_at_exact_thresholds() {
        assert!(unlocked_for(0).is_empty());
        assert!(unlocked_for(299).is_empty());
        assert_eq!(thresholds(unlocked_for(300)), vec![300]);
        assert_eq!(thresholds(unlocked_for(900)), vec![300, 900]);
        assert_eq!(unlocked_for(100_000).len(), 4);
    }

    #[test]
    fn next_milestone_tracks_progress() {
        assert_eq!(next_milestone(0).unwrap().threshold_secs, 300);
        assert_eq!(next_milestone(300).unwrap().threshold_secs, 900);
        assert!(next_milestone(3600).is_none());
    }

    #[test]
    fn newly_unlocked_only_on_crossing() {
        assert_eq!(thresholds(newly_unlocked(299, 300)), vec![300]);
        assert!(newly_unlocked(300, 301).is_empty());
        assert!(newly_unlocked(900, 0).is_empty());
    }

    proptest! {
        #[test]
        fn unlocking_is_monotonic(a in 0u64..10_000, b in 0u64..10_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let small = unlocked_for(lo);
            let large = unlocked_for(hi);
            prop_assert!(small.iter().all(|x| large.contains(x)));
        }
    }
}
