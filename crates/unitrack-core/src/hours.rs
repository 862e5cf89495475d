//! Category hour aggregation and hour totals.
//!
//! Aggregation runs in a fixed order: approved records are bucketed (waived
//! ones into free elective), complementary activities and externally approved
//! hours are added, optional-category overflow is redistributed into free
//! elective, and finally the mandatory ceiling is applied. The ceiling runs
//! last so discarded mandatory hours can never reach the free-elective pool.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Category, CourseRecord, CurriculumConfig, Outcome};

/// Hours per category.
pub type CategoryHours = BTreeMap<Category, u32>;

/// Aggregate approved hours into curriculum categories.
///
/// `external_hours` are already-approved complementary hours from a
/// certificate ledger and go straight into the complementary bucket.
pub fn aggregate_category_hours(
    records: &[CourseRecord],
    curriculum: &CurriculumConfig,
    external_hours: u32,
) -> CategoryHours {
    let mut hours: CategoryHours = Category::ALL.iter().map(|&c| (c, 0)).collect();

    for record in records {
        match record.resolved_outcome() {
            Outcome::Approved => {
                let bucket = if record.waived {
                    Category::FreeElective
                } else {
                    record.category
                };
                add_hours(&mut hours, bucket, record.credit_hours);
            }
            Outcome::NotApplicable if record.is_complementary() => {
                add_hours(&mut hours, Category::ComplementaryActivity, record.credit_hours);
            }
            _ => {}
        }
    }

    add_hours(&mut hours, Category::ComplementaryActivity, external_hours);

    redistribute_overflow(&mut hours, curriculum);
    apply_mandatory_ceiling(&mut hours, curriculum);

    hours
}

/// Hour totals saturate at `u32::MAX` instead of overflowing.
fn add_hours(hours: &mut CategoryHours, category: Category, amount: u32) {
    let total = hours.entry(category).or_insert(0);
    *total = total.saturating_add(amount);
}

pub(crate) fn saturating_total(values: impl Iterator<Item = u32>) -> u32 {
    values.fold(0, u32::saturating_add)
}

/// Move hours above each redistributable category's requirement into free
/// elective.
fn redistribute_overflow(hours: &mut CategoryHours, curriculum: &CurriculumConfig) {
    let mut pool = 0u32;
    for category in Category::ALL {
        // Free elective is the destination and mandatory has its own ceiling.
        if matches!(category, Category::FreeElective | Category::Mandatory)
            || !curriculum.is_redistributable(category)
        {
            continue;
        }
        let required = curriculum.required_hours(category);
        let Some(current) = hours.get_mut(&category) else {
            continue;
        };
        if *current > required {
            let excess = *current - required;
            *current = required;
            tracing::debug!(%category, excess, required, "redistributing overflow");
            pool = pool.saturating_add(excess);
        }
    }
    if pool > 0 {
        add_hours(hours, Category::FreeElective, pool);
    }
}

/// Discard mandatory hours above the curriculum ceiling.
fn apply_mandatory_ceiling(hours: &mut CategoryHours, curriculum: &CurriculumConfig) {
    let Some(ceiling) = curriculum.overflow_policy.mandatory_ceiling else {
        return;
    };
    if let Some(mandatory) = hours.get_mut(&Category::Mandatory) {
        if *mandatory > ceiling {
            tracing::debug!(
                discarded = *mandatory - ceiling,
                ceiling,
                "mandatory hours above ceiling discarded"
            );
            *mandatory = ceiling;
        }
    }
}

/// Hours of approved records, waived included. Complementary excluded.
pub fn approved_hours(records: &[CourseRecord]) -> u32 {
    saturating_total(
        records
            .iter()
            .filter(|r| r.resolved_outcome() == Outcome::Approved)
            .map(|r| r.credit_hours),
    )
}

/// Hours of courses currently in progress.
pub fn in_progress_hours(records: &[CourseRecord]) -> u32 {
    saturating_total(
        records
            .iter()
            .filter(|r| r.resolved_outcome() == Outcome::InProgress)
            .map(|r| r.credit_hours),
    )
}

/// Approved, in-progress and projected (approved + in progress) hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourTotals {
    pub approved: u32,
    pub in_progress: u32,
    pub projected: u32,
}

impl HourTotals {
    pub fn from_records(records: &[CourseRecord]) -> Self {
        let approved = approved_hours(records);
        let in_progress = in_progress_hours(records);
        Self {
            approved,
            in_progress,
            projected: approved.saturating_add(in_progress),
        }
    }
}

/// Hours counted from aggregated categories, the figure graduation is
/// judged against.
pub fn counted_hours(hours: &CategoryHours) -> u32 {
    saturating_total(hours.values().copied())
}

/// Percentage of the requirement completed, clamped to [0, 100].
pub fn progress_percent(completed: u32, total_required: u32) -> f64 {
    if total_required == 0 {
        return 100.0;
    }
    (completed as f64 / total_required as f64 * 100.0).min(100.0)
}

/// Requirement status of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProgress {
    pub category: Category,
    pub required: u32,
    pub completed: u32,
    pub remaining: u32,
}

impl CategoryProgress {
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

/// Requirement status for every category, in display order.
pub fn category_progress(
    hours: &CategoryHours,
    curriculum: &CurriculumConfig,
) -> Vec<CategoryProgress> {
    Category::ALL
        .iter()
        .map(|&category| {
            let required = curriculum.required_hours(category);
            let completed = hours.get(&category).copied().unwrap_or(0);
            CategoryProgress {
                category,
                required,
                completed,
                remaining: required.saturating_sub(completed),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curriculum() -> CurriculumConfig {
        CurriculumConfig::new("test", 1000)
            .with_requirement(Category::Mandatory, 600)
            .with_requirement(Category::Optional, 120)
            .with_requirement(Category::Elective, 60)
            .with_requirement(Category::FreeElective, 100)
            .with_requirement(Category::ComplementaryActivity, 120)
            .with_redistributable(&[Category::Optional, Category::Elective])
            .with_mandatory_ceiling(660)
    }

    fn approved(category: Category, hours: u32) -> CourseRecord {
        CourseRecord::new("2022.1", "X", category, hours).with_grade(8.0)
    }

    #[test]
    fn every_category_present_when_empty() {
        let hours = aggregate_category_hours(&[], &curriculum(), 0);
        assert_eq!(hours.len(), Category::ALL.len());
        assert!(hours.values().all(|&h| h == 0));
    }

    #[test]
    fn only_approved_records_count() {
        let records = vec![
            approved(Category::Mandatory, 60),
            CourseRecord::new("2022.1", "F", Category::Mandatory, 60).with_grade(4.0),
            CourseRecord::new("2022.1", "W", Category::Mandatory, 60).mark_withdrawn(),
            CourseRecord::new("2022.2", "P", Category::Mandatory, 60).mark_in_progress(),
        ];
        let hours = aggregate_category_hours(&records, &curriculum(), 0);
        assert_eq!(hours[&Category::Mandatory], 60);
    }

    #[test]
    fn waived_records_become_free_elective() {
        let records = vec![approved(Category::Mandatory, 60).mark_waived()];
        let hours = aggregate_category_hours(&records, &curriculum(), 0);
        assert_eq!(hours[&Category::Mandatory], 0);
        assert_eq!(hours[&Category::FreeElective], 60);
    }

    #[test]
    fn complementary_and_external_hours() {
        let records = vec![CourseRecord::new("2022.1", "AC", Category::ComplementaryActivity, 40)];
        let hours = aggregate_category_hours(&records, &curriculum(), 25);
        assert_eq!(hours[&Category::ComplementaryActivity], 65);
    }

    #[test]
    fn huge_external_hours_saturate() {
        let records = vec![CourseRecord::new("2022.1", "AC", Category::ComplementaryActivity, 20)];
        let hours = aggregate_category_hours(&records, &curriculum(), u32::MAX);
        assert_eq!(hours[&Category::ComplementaryActivity], u32::MAX);
        assert_eq!(counted_hours(&hours), u32::MAX);

        let records = vec![
            approved(Category::Mandatory, 60),
            CourseRecord::new("2023.1", "IP", Category::Mandatory, u32::MAX).mark_in_progress(),
        ];
        let derived =
            crate::report::DerivedMetrics::compute(&records, &curriculum(), u32::MAX - 10);
        assert_eq!(derived.counted_hours, u32::MAX);
        assert_eq!(derived.hours.projected, u32::MAX);
        assert_eq!(derived.progress_percent, 100.0);
        assert!(derived.forecast.can_graduate_this_term);
    }

    #[test]
    fn optional_overflow_moves_to_free_elective() {
        let records = vec![
            approved(Category::Optional, 90),
            approved(Category::Optional, 90),
            approved(Category::Elective, 90),
            approved(Category::FreeElective, 30),
        ];
        let hours = aggregate_category_hours(&records, &curriculum(), 0);
        assert_eq!(hours[&Category::Optional], 120);
        assert_eq!(hours[&Category::Elective], 60);
        // 30 own + 60 optional overflow + 30 elective overflow
        assert_eq!(hours[&Category::FreeElective], 120);
    }

    #[test]
    fn non_redistributable_category_keeps_excess() {
        let curriculum = curriculum().with_redistributable(&[Category::Optional]);
        let records = vec![approved(Category::Elective, 180)];
        let hours = aggregate_category_hours(&records, &curriculum, 0);
        assert_eq!(hours[&Category::Elective], 180);
        assert_eq!(hours[&Category::FreeElective], 0);
    }

    #[test]
    fn mandatory_ceiling_discards_without_redistributing() {
        let records: Vec<_> = (0..15).map(|_| approved(Category::Mandatory, 60)).collect();
        let hours = aggregate_category_hours(&records, &curriculum(), 0);
        assert_eq!(hours[&Category::Mandatory], 660);
        assert_eq!(hours[&Category::FreeElective], 0);
    }

    #[test]
    fn mandatory_uncapped_without_ceiling() {
        let mut curriculum = curriculum();
        curriculum.overflow_policy.mandatory_ceiling = None;
        let records: Vec<_> = (0..15).map(|_| approved(Category::Mandatory, 60)).collect();
        let hours = aggregate_category_hours(&records, &curriculum, 0);
        assert_eq!(hours[&Category::Mandatory], 900);
    }

    #[test]
    fn aggregation_is_order_independent() {
        let records = vec![
            approved(Category::Optional, 90),
            approved(Category::Mandatory, 60).mark_waived(),
            approved(Category::Elective, 75),
            CourseRecord::new("2022.1", "AC", Category::ComplementaryActivity, 10),
            approved(Category::Mandatory, 600),
            approved(Category::Optional, 45),
        ];
        let expected = aggregate_category_hours(&records, &curriculum(), 5);
        let mut reversed = records.clone();
        reversed.reverse();
        assert_eq!(aggregate_category_hours(&reversed, &curriculum(), 5), expected);
        let mut rotated = records;
        rotated.rotate_left(2);
        assert_eq!(aggregate_category_hours(&rotated, &curriculum(), 5), expected);
    }

    #[test]
    fn overflow_never_leaves_redistributable_above_requirement() {
        let curriculum = curriculum();
        for extra in [0u32, 15, 60, 300] {
            let records = vec![
                approved(Category::Optional, 120 + extra),
                approved(Category::Elective, 60 + extra),
                approved(Category::FreeElective, 10),
            ];
            let hours = aggregate_category_hours(&records, &curriculum, 0);
            assert!(hours[&Category::Optional] <= 120);
            assert!(hours[&Category::Elective] <= 60);
            assert_eq!(hours[&Category::FreeElective], 10 + 2 * extra);
        }
    }

    #[test]
    fn hour_totals_and_progress() {
        let records = vec![
            approved(Category::Mandatory, 60),
            approved(Category::Optional, 30).mark_waived(),
            CourseRecord::new("2023.1", "P", Category::Mandatory, 45).mark_in_progress(),
            CourseRecord::new("2023.1", "AC", Category::ComplementaryActivity, 20),
        ];
        let totals = HourTotals::from_records(&records);
        assert_eq!(totals.approved, 90);
        assert_eq!(totals.in_progress, 45);
        assert_eq!(totals.projected, 135);

        assert_eq!(progress_percent(250, 1000), 25.0);
        assert_eq!(progress_percent(2000, 1000), 100.0);
        assert_eq!(progress_percent(0, 0), 100.0);
    }

    #[test]
    fn category_progress_reports_remaining() {
        let records = vec![approved(Category::Mandatory, 600), approved(Category::Optional, 60)];
        let hours = aggregate_category_hours(&records, &curriculum(), 0);
        let progress = category_progress(&hours, &curriculum());
        let mandatory = progress
            .iter()
            .find(|p| p.category == Category::Mandatory)
            .unwrap();
        assert!(mandatory.is_complete());
        let optional = progress
            .iter()
            .find(|p| p.category == Category::Optional)
            .unwrap();
        assert_eq!(optional.remaining, 60);
        assert_eq!(counted_hours(&hours), 660);
    }
}
