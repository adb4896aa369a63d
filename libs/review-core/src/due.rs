//! Due-set aggregation over a deck's review records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mastery::{MasteryBreakdown, MasteryLevel};
use crate::types::ReviewRecord;

/// Aggregate review status of a deck at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueSet {
    pub total: usize,
    pub reviewed: usize,
    pub due: usize,
    pub mastered: usize,
    pub accuracy_percent: u32,
    pub mastery: MasteryBreakdown,
}

impl DueSet {
    /// Aggregate `records` against `now`.
    ///
    /// Only the records themselves are counted, so `total == reviewed` until
    /// [`DueSet::with_total_items`] supplies the deck size.
    pub fn compute(records: &[ReviewRecord], now: DateTime<Utc>) -> Self {
        let mut correct: u64 = 0;
        let mut attempts: u64 = 0;
        let mut due = 0;
        let mut reviewed = 0;
        let mut mastery = MasteryBreakdown::default();

        for record in records {
            correct += u64::from(record.correct_reviews);
            attempts += u64::from(record.total_reviews);
            if record.total_reviews > 0 {
                reviewed += 1;
            }
            if record.is_due(now) {
                due += 1;
            }
            mastery.add(record.mastery_level());
        }

        Self {
            total: reviewed,
            reviewed,
            due,
            mastered: mastery.count(MasteryLevel::Mastered),
            accuracy_percent: accuracy_percent(correct, attempts),
            mastery,
        }
    }

    /// Report `total_items` as the deck size. Never drops below the number of
    /// reviewed items.
    pub fn with_total_items(mut self, total_items: usize) -> Self {
        self.total = total_items.max(self.reviewed);
        self
    }
}

/// Correct answers as a whole percent of all answers; 0 when nothing was
/// answered.
pub fn accuracy_percent(correct: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (correct as f64 / total as f64 * 100.0).round() as u32
}

/// Split records into `(due, not_due)` at `now`.
pub fn partition_due(
    records: &[ReviewRecord],
    now: DateTime<Utc>,
) -> (Vec<&ReviewRecord>, Vec<&ReviewRecord>) {
    records.iter().partition(|r| r.is_due(now))
}

/// Due records, most overdue first, at most `limit` of them.
pub fn due_items(records: &[ReviewRecord], now: DateTime<Utc>, limit: usize) -> Vec<&ReviewRecord> {
    let (mut due, _) = partition_due(records, now);
    due.sort_by(|a, b| {
        a.next_review_date
            .cmp(&b.next_review_date)
            .then_with(|| a.item_id.cmp(&b.item_id))
    });
    due.truncate(limit);
    due
}
