//! Progress report bundling every derived metric, with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::OutcomeTally;
use crate::forecast::{forecast_with_load, GraduationForecast};
use crate::hours::{
    aggregate_category_hours, category_progress, counted_hours, progress_percent,
    CategoryHours, CategoryProgress, HourTotals,
};
use crate::metrics::{period_summaries, round_to, PeriodSummary, WeightedMetrics};
use crate::model::{CourseRecord, CurriculumConfig, Outcome};
use crate::status::{classify_status, StatusReport};
use crate::trend::{analyze_trend, TrendReport};

/// Every metric derived from a record list and a curriculum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub metrics: WeightedMetrics,
    pub category_hours: CategoryHours,
    pub category_progress: Vec<CategoryProgress>,
    pub hours: HourTotals,
    /// Hours counted toward graduation after category caps.
    pub counted_hours: u32,
    pub progress_percent: f64,
    pub forecast: GraduationForecast,
    pub trend: TrendReport,
    pub status: StatusReport,
    pub tally: OutcomeTally,
    pub periods: Vec<PeriodSummary>,
}

impl DerivedMetrics {
    /// Run every engine component once over `records`.
    pub fn compute(
        records: &[CourseRecord],
        curriculum: &CurriculumConfig,
        external_hours: u32,
    ) -> Self {
        let metrics = WeightedMetrics::compute(records, curriculum.hours_per_credit);
        let category_hours = aggregate_category_hours(records, curriculum, external_hours);
        let hours = HourTotals::from_records(records);
        let counted = counted_hours(&category_hours);

        let in_progress: Vec<&CourseRecord> = records
            .iter()
            .filter(|r| r.resolved_outcome() == Outcome::InProgress)
            .collect();
        let forecast = forecast_with_load(
            records,
            counted,
            counted.saturating_add(hours.in_progress),
            hours.in_progress,
            curriculum.total_required_hours,
            &in_progress,
            curriculum.courses_per_semester,
        );

        Self {
            status: classify_status(metrics.cr),
            category_progress: category_progress(&category_hours, curriculum),
            progress_percent: round_to(
                progress_percent(counted, curriculum.total_required_hours),
                1,
            ),
            counted_hours: counted,
            trend: analyze_trend(records),
            tally: OutcomeTally::from_records(records),
            periods: period_summaries(records),
            metrics,
            category_hours,
            hours,
            forecast,
        }
    }
}

/// A complete progress report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    pub curriculum_id: String,
    #[serde(default)]
    pub student: Option<String>,
    pub course_count: usize,
    pub external_hours: u32,
    pub derived: DerivedMetrics,
}

impl ProgressReport {
    pub fn compute(
        records: &[CourseRecord],
        curriculum: &CurriculumConfig,
        external_hours: u32,
    ) -> Self {
        tracing::debug!(
            courses = records.len(),
            curriculum = %curriculum.id,
            "computing progress report"
        );
        Self {
            generated_at: Utc::now(),
            curriculum_id: curriculum.id.clone(),
            student: None,
            course_count: records.len(),
            external_hours,
            derived: DerivedMetrics::compute(records, curriculum, external_hours),
        }
    }

    pub fn with_student(mut self, student: Option<String>) -> Self {
        self.student = student;
        self
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: ProgressReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use crate::status::StatusBand;
    use crate::trend::TrendDirection;

    fn curriculum() -> CurriculumConfig {
        CurriculumConfig::new("test", 600)
            .with_requirement(Category::Mandatory, 420)
            .with_requirement(Category::Optional, 60)
            .with_requirement(Category::FreeElective, 60)
            .with_requirement(Category::ComplementaryActivity, 60)
            .with_redistributable(&[Category::Optional])
            .with_mandatory_ceiling(480)
    }

    fn records() -> Vec<CourseRecord> {
        vec![
            CourseRecord::new("2021.1", "M1", Category::Mandatory, 60).with_grade(6.0),
            CourseRecord::new("2021.1", "M2", Category::Mandatory, 60).with_grade(7.0),
            CourseRecord::new("2021.2", "M3", Category::Mandatory, 60).with_grade(8.0),
            CourseRecord::new("2022.1", "O1", Category::Optional, 90).with_grade(9.0),
            CourseRecord::new("2022.1", "F1", Category::FreeElective, 30).mark_waived(),
            CourseRecord::new("2022.2", "M4", Category::Mandatory, 60).with_grade(9.5),
            CourseRecord::new("2023.1", "M5", Category::Mandatory, 60).mark_in_progress(),
            CourseRecord::new("2022.2", "AC", Category::ComplementaryActivity, 20),
        ]
    }

    #[test]
    fn derived_metrics_cover_every_component() {
        let derived = DerivedMetrics::compute(&records(), &curriculum(), 10);

        // (360 + 420 + 480 + 810 + 570) / 330
        assert_eq!(derived.metrics.cr, 8.0);
        assert_eq!(derived.status.band, StatusBand::Good);

        // M1 failed; the other three mandatory courses count.
        assert_eq!(derived.category_hours[&Category::Mandatory], 180);
        assert_eq!(derived.category_hours[&Category::Optional], 60);
        assert_eq!(derived.category_hours[&Category::FreeElective], 60);
        assert_eq!(derived.category_hours[&Category::ComplementaryActivity], 30);
        assert_eq!(derived.counted_hours, 330);
        assert_eq!(derived.progress_percent, 55.0);

        assert_eq!(derived.hours.in_progress, 60);
        assert!(!derived.forecast.can_graduate_this_term);
        assert_eq!(derived.trend.direction, TrendDirection::Improving);
        assert_eq!(derived.tally.approved, 5);
        assert_eq!(derived.tally.in_progress, 1);
        assert_eq!(derived.periods.len(), 5);
    }

    #[test]
    fn empty_records_degrade_gracefully() {
        let derived = DerivedMetrics::compute(&[], &curriculum(), 0);
        assert_eq!(derived.metrics.cr, 0.0);
        assert_eq!(derived.counted_hours, 0);
        assert_eq!(derived.trend.direction, TrendDirection::InsufficientData);
        assert!(derived.forecast.text.contains("Add your courses"));
    }

    #[test]
    fn json_roundtrip() {
        let report = ProgressReport::compute(&records(), &curriculum(), 10)
            .with_student(Some("Ana".into()));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = ProgressReport::load_json(&path).unwrap();

        assert_eq!(loaded.curriculum_id, "test");
        assert_eq!(loaded.student.as_deref(), Some("Ana"));
        assert_eq!(loaded.derived.category_hours, report.derived.category_hours);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ProgressReport::load_json(&dir.path().join("missing.json")).is_err());
    }
}
