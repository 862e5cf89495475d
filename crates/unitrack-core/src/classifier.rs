//! Course result classification.
//!
//! Derives the outcome of a single course from its grade and status flags.

use serde::{Deserialize, Serialize};

use crate::model::{Category, CourseRecord, Outcome, PASSING_GRADE};

/// Classify one course.
///
/// Rules apply in order: complementary activities have no outcome, then
/// withdrawn, waived (approved), in progress, and finally the grade against
/// [`PASSING_GRADE`]. A missing grade on an otherwise finished course counts
/// as failed.
pub fn classify(
    grade: Option<f64>,
    withdrawn: bool,
    waived: bool,
    in_progress: bool,
    category: Category,
) -> Outcome {
    if category == Category::ComplementaryActivity {
        return Outcome::NotApplicable;
    }
    if withdrawn {
        return Outcome::Withdrawn;
    }
    if waived {
        return Outcome::Approved;
    }
    if in_progress {
        return Outcome::InProgress;
    }
    match grade {
        Some(g) if g >= PASSING_GRADE => Outcome::Approved,
        _ => Outcome::Failed,
    }
}

/// Classify a single record from its own fields, ignoring any stored outcome.
pub fn classify_record(record: &CourseRecord) -> Outcome {
    classify(
        record.grade,
        record.withdrawn,
        record.waived,
        record.in_progress,
        record.category,
    )
}

/// Return copies of `records` with `outcome` populated.
pub fn classify_records(records: &[CourseRecord]) -> Vec<CourseRecord> {
    records
        .iter()
        .map(|r| {
            let mut classified = r.clone();
            classified.outcome = Some(classify_record(r));
            classified
        })
        .collect()
}

/// How many records fall into each outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    pub approved: usize,
    pub failed: usize,
    pub withdrawn: usize,
    pub in_progress: usize,
    pub not_applicable: usize,
}

impl OutcomeTally {
    pub fn from_records(records: &[CourseRecord]) -> Self {
        let mut tally = Self::default();
        for record in records {
            match record.resolved_outcome() {
                Outcome::Approved => tally.approved += 1,
                Outcome::Failed => tally.failed += 1,
                Outcome::Withdrawn => tally.withdrawn += 1,
                Outcome::InProgress => tally.in_progress += 1,
                Outcome::NotApplicable => tally.not_applicable += 1,
            }
        }
        tally
    }

    /// Share of finished graded attempts that were approved, in [0, 1].
    pub fn approval_rate(&self) -> f64 {
        let decided = self.approved + self.failed;
        if decided == 0 {
            0.0
        } else {
            self.approved as f64 / decided as f64
        }
    }
}
