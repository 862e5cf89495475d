//! Weighted grade metrics.
//!
//! All metrics are linear folds that yield 0 over an empty qualifying set.
//! CR, the simple average and the credit count use the graded records (see
//! [`CourseRecord::graded_value`]), so waived, withdrawn and complementary
//! activity records never contribute. PCH and PCR take every record that
//! carries a grade.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hours::saturating_total;
use crate::model::{CourseRecord, Period};

/// Decimal places used when metrics are reported.
pub const REPORT_DECIMALS: u32 = 3;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn graded(records: &[CourseRecord]) -> impl Iterator<Item = (&CourseRecord, f64)> {
    records
        .iter()
        .filter_map(|r| r.graded_value().map(|g| (r, g)))
}

fn with_grade(records: &[CourseRecord]) -> impl Iterator<Item = (&CourseRecord, f64)> {
    records.iter().filter_map(|r| r.grade.map(|g| (r, g)))
}

/// Mean grade, unweighted.
pub fn simple_average(records: &[CourseRecord]) -> f64 {
    let (sum, count) = graded(records).fold((0.0, 0usize), |(sum, n), (_, g)| (sum + g, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Credit-weighted grade ratio (CR): `Σ(grade × hours) / Σ(hours)`.
pub fn credit_weighted_ratio(records: &[CourseRecord]) -> f64 {
    let (weighted, hours) = graded(records).fold((0.0, 0u64), |(w, h), (r, g)| {
        (w + g * r.credit_hours as f64, h + r.credit_hours as u64)
    });
    if hours == 0 {
        0.0
    } else {
        weighted / hours as f64
    }
}

/// Credits earned across graded records, `Σ(hours / hours_per_credit)`.
pub fn credit_count(records: &[CourseRecord], hours_per_credit: u32) -> f64 {
    graded(records)
        .map(|(r, _)| r.credits(hours_per_credit))
        .sum()
}

/// Weighted grade-hours (PCH): `Σ(grade × hours)` over every graded record,
/// whatever its category or flags.
pub fn weighted_grade_hours(records: &[CourseRecord]) -> f64 {
    with_grade(records)
        .map(|(r, g)| g * r.credit_hours as f64)
        .sum()
}

/// Weighted credit-ratio-hours (PCR): `Σ(credits × grade)`.
pub fn weighted_credit_ratio_hours(records: &[CourseRecord], hours_per_credit: u32) -> f64 {
    with_grade(records)
        .map(|(r, g)| r.credits(hours_per_credit) * g)
        .sum()
}

/// Every weighted metric, rounded for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightedMetrics {
    pub simple_average: f64,
    /// Credit-weighted grade ratio.
    pub cr: f64,
    pub credit_count: f64,
    /// Weighted grade-hours.
    pub pch: f64,
    /// Weighted credit-ratio-hours.
    pub pcr: f64,
}

impl WeightedMetrics {
    pub fn compute(records: &[CourseRecord], hours_per_credit: u32) -> Self {
        Self {
            simple_average: round_to(simple_average(records), REPORT_DECIMALS),
            cr: round_to(credit_weighted_ratio(records), REPORT_DECIMALS),
            credit_count: round_to(credit_count(records, hours_per_credit), REPORT_DECIMALS),
            pch: round_to(weighted_grade_hours(records), REPORT_DECIMALS),
            pcr: round_to(
                weighted_credit_ratio_hours(records, hours_per_credit),
                REPORT_DECIMALS,
            ),
        }
    }
}

/// Per-term activity summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: String,
    pub courses: usize,
    /// Hours of every record in the term, withdrawn included.
    pub attempted_hours: u32,
    pub simple_average: f64,
    pub cr: f64,
}

/// Summaries in ascending period order. Unparsable periods sort first.
pub fn period_summaries(records: &[CourseRecord]) -> Vec<PeriodSummary> {
    let mut grouped: BTreeMap<(Period, &str), Vec<CourseRecord>> = BTreeMap::new();
    for record in records {
        let key = (
            record.parsed_period().unwrap_or_default(),
            record.period.as_str(),
        );
        grouped.entry(key).or_default().push(record.clone());
    }

    grouped
        .into_iter()
        .map(|((_, period), group)| PeriodSummary {
            period: period.to_string(),
            courses: group.len(),
            attempted_hours: saturating_total(group.iter().map(|r| r.credit_hours)),
            simple_average: round_to(simple_average(&group), REPORT_DECIMALS),
            cr: round_to(credit_weighted_ratio(&group), REPORT_DECIMALS),
        })
        .collect()
}
