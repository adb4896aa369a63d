//! Mastery classification.
//!
//! A single threshold table drives both the review path and progress
//! aggregation, so the two can never disagree on what "mastered" means.

use serde::{Deserialize, Serialize};

/// Coarse progress classification of a reviewed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryLevel {
    Learning,
    Young,
    Mature,
    Mastered,
}

impl Default for MasteryLevel {
    fn default() -> Self {
        Self::Learning
    }
}

impl MasteryLevel {
    /// Get the level name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Learning => "learning",
            Self::Young => "young",
            Self::Mature => "mature",
            Self::Mastered => "mastered",
        }
    }
}

/// Minimum repetitions and interval (days) for a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasteryThreshold {
    pub level: MasteryLevel,
    pub min_repetitions: u32,
    pub min_interval: u32,
}

impl MasteryThreshold {
    pub fn is_met(&self, repetitions: u32, interval: u32) -> bool {
        repetitions >= self.min_repetitions && interval >= self.min_interval
    }
}

/// Checked top to bottom; the first satisfied entry wins. Anything that
/// satisfies none of them is `Learning`.
pub const THRESHOLDS: [MasteryThreshold; 3] = [
    MasteryThreshold {
        level: MasteryLevel::Mastered,
        min_repetitions: 8,
        min_interval: 21,
    },
    MasteryThreshold {
        level: MasteryLevel::Mature,
        min_repetitions: 4,
        min_interval: 6,
    },
    MasteryThreshold {
        level: MasteryLevel::Young,
        min_repetitions: 2,
        min_interval: 0,
    },
];

/// Classify an item from its post-review repetitions and interval.
pub fn classify(repetitions: u32, interval: u32) -> MasteryLevel {
    THRESHOLDS
        .iter()
        .find(|t| t.is_met(repetitions, interval))
        .map(|t| t.level)
        .unwrap_or(MasteryLevel::Learning)
}

/// Number of items at each mastery level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryBreakdown {
    pub learning: usize,
    pub young: usize,
    pub mature: usize,
    pub mastered: usize,
}

impl MasteryBreakdown {
    pub fn add(&mut self, level: MasteryLevel) {
        match level {
            MasteryLevel::Learning => self.learning += 1,
            MasteryLevel::Young => self.young += 1,
            MasteryLevel::Mature => self.mature += 1,
            MasteryLevel::Mastered => self.mastered += 1,
        }
    }

    pub fn count(&self, level: MasteryLevel) -> usize {
        match level {
            MasteryLevel::Learning => self.learning,
            MasteryLevel::Young => self.young,
            MasteryLevel::Mature => self.mature,
            MasteryLevel::Mastered => self.mastered,
        }
    }

    pub fn total(&self) -> usize {
        self.learning + self.young + self.mature + self.mastered
    }
}

impl FromIterator<MasteryLevel> for MasteryBreakdown {
    fn from_iter<I: IntoIterator<Item = MasteryLevel>>(iter: I) -> Self {
        let mut breakdown = Self::default();
        for level in iter {
            breakdown.add(level);
        }
        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_state_is_learning() {
        assert_eq!(classify(0, 0), MasteryLevel::Learning);
        assert_eq!(classify(1, 1), MasteryLevel::Learning);
        assert_eq!(classify(1, 400), MasteryLevel::Learning);
    }

    #[test]
    fn young_needs_two_repetitions() {
        assert_eq!(classify(2, 6), MasteryLevel::Young);
        assert_eq!(classify(3, 15), MasteryLevel::Young);
    }

    #[test]
    fn mature_needs_both_thresholds() {
        assert_eq!(classify(4, 6), MasteryLevel::Mature);
        assert_eq!(classify(4, 5), MasteryLevel::Young);
        assert_eq!(classify(3, 60), MasteryLevel::Young);
    }

    #[test]
    fn mastered_needs_both_thresholds() {
        assert_eq!(classify(8, 21), MasteryLevel::Mastered);
        assert_eq!(classify(8, 20), MasteryLevel::Mature);
        assert_eq!(classify(7, 300), MasteryLevel::Mature);
    }

    #[test]
    fn first_matching_threshold_wins() {
        // (9, 30) satisfies every row; the table order picks mastered.
        assert!(THRESHOLDS.iter().all(|t| t.is_met(9, 30)));
        assert_eq!(classify(9, 30), MasteryLevel::Mastered);
    }

    #[test]
    fn classification_is_monotone_in_both_inputs() {
        for reps in 0..12 {
            for interval in 0..40 {
                let level = classify(reps, interval);
                assert!(classify(reps + 1, interval) >= level);
                assert!(classify(reps, interval + 1) >= level);
            }
        }
    }

    #[test]
    fn breakdown_counts_levels() {
        let breakdown: MasteryBreakdown = [
            MasteryLevel::Learning,
            MasteryLevel::Young,
            MasteryLevel::Young,
            MasteryLevel::Mastered,
        ]
        .into_iter()
        .collect();

        assert_eq!(
            breakdown,
            MasteryBreakdown {
                learning: 1,
                young: 2,
                mature: 0,
                mastered: 1,
            }
        );
        assert_eq!(breakdown.count(MasteryLevel::Young), 2);
        assert_eq!(breakdown.total(), 4);
    }
}
