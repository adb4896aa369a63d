//! Core types for review scheduling.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ReviewError;
use crate::mastery::{classify, MasteryLevel};
use crate::scheduler::{self, ScheduledReview, SchedulingState};

/// Rating for a review, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// All ratings, worst to best.
    pub const ALL: [Rating; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    /// Quality score on the SM-2 0-5 scale.
    ///
    /// The four ratings map onto 0, 1, 3 and 4; scores 2 and 5 are never
    /// produced. Existing schedules were computed with this mapping, so it is
    /// kept as-is rather than spread over the full scale.
    pub fn quality(self) -> u8 {
        match self {
            Self::Again => 0,
            Self::Hard => 1,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Whether the review counts as a correct answer.
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Good | Self::Easy)
    }

    /// Get the rating symbol as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }
}

impl FromStr for Rating {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "again" => Ok(Self::Again),
            "hard" => Ok(Self::Hard),
            "good" => Ok(Self::Good),
            "easy" => Ok(Self::Easy),
            other => Err(ReviewError::InvalidRating {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review state of one item for one learner.
///
/// The mastery level is not stored: it is always derived from
/// `repetitions` and `interval` through [`ReviewRecord::mastery_level`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub owner: String,
    pub deck_id: String,
    pub item_id: String,
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    pub next_review_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review_rating: Option<Rating>,
    pub total_reviews: u32,
    pub correct_reviews: u32,
}

impl ReviewRecord {
    /// Zero-state record for an item that has never been reviewed.
    ///
    /// The record is due immediately.
    pub fn new(
        owner: impl Into<String>,
        deck_id: impl Into<String>,
        item_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let state = SchedulingState::default();
        Self {
            owner: owner.into(),
            deck_id: deck_id.into(),
            item_id: item_id.into(),
            ease_factor: state.ease_factor,
            interval: state.interval,
            repetitions: state.repetitions,
            next_review_date: now,
            last_review_date: None,
            last_review_rating: None,
            total_reviews: 0,
            correct_reviews: 0,
        }
    }

    /// Scheduling parameters fed to the scheduler.
    pub fn scheduling_state(&self) -> SchedulingState {
        SchedulingState {
            ease_factor: self.ease_factor,
            interval: self.interval,
            repetitions: self.repetitions,
        }
    }

    /// Mastery level derived from the current repetitions and interval.
    pub fn mastery_level(&self) -> MasteryLevel {
        classify(self.repetitions, self.interval)
    }

    /// Whether the record is due at `now` (inclusive).
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date <= now
    }

    /// Accuracy of this record's reviews as a whole percent.
    pub fn accuracy_percent(&self) -> u32 {
        crate::due::accuracy_percent(
            u64::from(self.correct_reviews),
            u64::from(self.total_reviews),
        )
    }

    /// Apply a review and return the updated record.
    ///
    /// Scheduling fields come from [`scheduler::schedule`]; the counters and
    /// last-review audit fields are advanced here.
    pub fn apply_review(&self, rating: Rating, now: DateTime<Utc>) -> Self {
        let scheduled = scheduler::schedule(&self.scheduling_state(), rating, now);
        self.with_schedule(&scheduled, rating, now)
    }

    fn with_schedule(&self, scheduled: &ScheduledReview, rating: Rating, now: DateTime<Utc>) -> Self {
        Self {
            owner: self.owner.clone(),
            deck_id: self.deck_id.clone(),
            item_id: self.item_id.clone(),
            ease_factor: scheduled.ease_factor,
            interval: scheduled.interval,
            repetitions: scheduled.repetitions,
            next_review_date: scheduled.next_review_date,
            last_review_date: Some(now),
            last_review_rating: Some(rating),
            total_reviews: self.total_reviews.saturating_add(1),
            correct_reviews: if rating.is_correct() {
                self.correct_reviews.saturating_add(1)
            } else {
                self.correct_reviews
            },
        }
    }
}
