//! Review scheduling library shared by the backend and its callers.
//!
//! Provides:
//! - SM-2 derived scheduler (ease factor, interval, repetitions, next due date)
//! - Mastery classification from repetitions and interval
//! - Due-set aggregation (due counts, mastery counts, accuracy)
//! - Shared types (Rating, ReviewRecord, etc.)

pub mod due;
pub mod error;
pub mod mastery;
pub mod scheduler;
pub mod types;

pub use due::{accuracy_percent, due_items, partition_due, DueSet};
pub use error::{Result, ReviewError};
pub use mastery::{classify, MasteryBreakdown, MasteryLevel, MasteryThreshold, THRESHOLDS};
pub use scheduler::{schedule, ScheduledReview, SchedulingState};
pub use types::{Rating, ReviewRecord};
