//! SM-2 derived review scheduler.
//!
//! Based on SuperMemo 2: the ease factor follows the classic adjustment
//! formula, the first two successful reviews use fixed 1 and 6 day
//! intervals, and later intervals grow by the updated ease factor.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::mastery::{classify, MasteryLevel};
use crate::types::Rating;

/// Ease factor of an item that has never been reviewed.
pub const INITIAL_EASE: f64 = 2.5;

/// Lower bound enforced on every ease update.
pub const MINIMUM_EASE: f64 = 1.3;

/// Qualities below this are failed reviews.
const PASSING_QUALITY: u8 = 3;

/// Scheduling parameters carried between reviews.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulingState {
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
}

impl Default for SchedulingState {
    fn default() -> Self {
        Self {
            ease_factor: INITIAL_EASE,
            interval: 0,
            repetitions: 0,
        }
    }
}

/// Result of scheduling an item after a review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledReview {
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    pub next_review_date: DateTime<Utc>,
    pub mastery_level: MasteryLevel,
}

impl ScheduledReview {
    /// Scheduling parameters to carry into the next review.
    pub fn state(&self) -> SchedulingState {
        SchedulingState {
            ease_factor: self.ease_factor,
            interval: self.interval,
            repetitions: self.repetitions,
        }
    }
}

/// Compute the next schedule for an item reviewed at `now`.
pub fn schedule(state: &SchedulingState, rating: Rating, now: DateTime<Utc>) -> ScheduledReview {
    let quality = rating.quality();
    let ease_factor = next_ease(state.ease_factor, quality);

    let (interval, repetitions) = if quality < PASSING_QUALITY {
        (1, 0)
    } else {
        let interval = match state.repetitions {
            0 => 1,
            1 => 6,
            _ => grow_interval(state.interval, ease_factor),
        };
        (interval, state.repetitions.saturating_add(1))
    };

    ScheduledReview {
        ease_factor,
        interval,
        repetitions,
        next_review_date: due_after(now, interval),
        mastery_level: classify(repetitions, interval),
    }
}

/// EF' = max(1.3, EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)))
pub fn next_ease(ease_factor: f64, quality: u8) -> f64 {
    let miss = 5.0 - f64::from(quality);
    let delta = 0.1 - miss * (0.08 + miss * 0.02);
    (ease_factor + delta).max(MINIMUM_EASE)
}

fn grow_interval(previous: u32, ease_factor: f64) -> u32 {
    // Float to int casts saturate, so runaway intervals pin at u32::MAX.
    ((f64::from(previous) * ease_factor).round() as u32).max(1)
}

fn due_after(now: DateTime<Utc>, interval: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(interval)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
