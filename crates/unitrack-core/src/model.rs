//! Core data model types for unitrack.
//!
//! These are the types every engine component consumes: course records,
//! curricular categories, academic periods and the per-program curriculum
//! configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::classifier::classify;
use crate::error::UnitrackError;

/// Minimum grade for a course to count as approved.
pub const PASSING_GRADE: f64 = 7.0;

/// Highest grade on the grading scale.
pub const MAX_GRADE: f64 = 10.0;

/// Contact hours that make up one credit unless a curriculum says otherwise.
pub const DEFAULT_HOURS_PER_CREDIT: u32 = 15;

/// Courses a student is assumed to take per semester.
pub const DEFAULT_COURSES_PER_SEMESTER: u32 = 6;

/// Curricular hour buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Courses every student of the program must take.
    Mandatory,
    /// Optional courses chosen from the program's own list.
    Optional,
    /// Electives restricted to a set of related programs.
    Elective,
    /// Extension (outreach) activities with course-like credit.
    Extension,
    /// Any course from any program.
    FreeElective,
    /// Complementary activities: no grade, no pass/fail.
    ComplementaryActivity,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 6] = [
        Category::Mandatory,
        Category::Optional,
        Category::Elective,
        Category::Extension,
        Category::FreeElective,
        Category::ComplementaryActivity,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Mandatory => "Mandatory",
            Category::Optional => "Optional",
            Category::Elective => "Elective",
            Category::Extension => "Extension",
            Category::FreeElective => "Free elective",
            Category::ComplementaryActivity => "Complementary activity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Mandatory => write!(f, "mandatory"),
            Category::Optional => write!(f, "optional"),
            Category::Elective => write!(f, "elective"),
            Category::Extension => write!(f, "extension"),
            Category::FreeElective => write!(f, "free_elective"),
            Category::ComplementaryActivity => write!(f, "complementary_activity"),
        }
    }
}

impl FromStr for Category {
    type Err = UnitrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(&['-', ' '][..], "_").as_str() {
            "mandatory" => Ok(Category::Mandatory),
            "optional" => Ok(Category::Optional),
            "elective" => Ok(Category::Elective),
            "extension" => Ok(Category::Extension),
            "free_elective" | "free" => Ok(Category::FreeElective),
            "complementary_activity" | "complementary" => Ok(Category::ComplementaryActivity),
            _ => Err(UnitrackError::UnknownCategory(s.to_string())),
        }
    }
}

/// Derived result of a single course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Approved,
    Failed,
    Withdrawn,
    InProgress,
    /// No outcome is meaningful (complementary activities).
    #[serde(rename = "none")]
    NotApplicable,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Approved => write!(f, "approved"),
            Outcome::Failed => write!(f, "failed"),
            Outcome::Withdrawn => write!(f, "withdrawn"),
            Outcome::InProgress => write!(f, "in progress"),
            Outcome::NotApplicable => write!(f, "-"),
        }
    }
}

/// An academic term in `YYYY.S` form, ordered by year then term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: u16,
    pub term: u8,
}

impl Period {
    pub fn new(year: u16, term: u8) -> Self {
        Self { year, term }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.year, self.term)
    }
}

impl FromStr for Period {
    type Err = UnitrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || UnitrackError::InvalidPeriod(s.to_string());
        let (year, term) = s.trim().split_once('.').ok_or_else(invalid)?;
        if year.len() != 4 || term.is_empty() {
            return Err(invalid());
        }
        let year = year.parse::<u16>().map_err(|_| invalid())?;
        let term = term.parse::<u8>().map_err(|_| invalid())?;
        Ok(Period { year, term })
    }
}

/// One completed, withdrawn, waived or in-progress course instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Term identifier (`YYYY.S`).
    pub period: String,
    /// Course code (e.g. "MAT0101").
    pub code: String,
    /// Course title.
    #[serde(default)]
    pub title: String,
    /// Curricular bucket the course counts toward.
    pub category: Category,
    /// Contact hours.
    pub credit_hours: u32,
    /// Final grade in [0, 10]; absent for in-progress and ungraded records.
    #[serde(default)]
    pub grade: Option<f64>,
    #[serde(default)]
    pub withdrawn: bool,
    /// Credited from prior study without being taken here.
    #[serde(default)]
    pub waived: bool,
    #[serde(default)]
    pub in_progress: bool,
    /// Outcome as populated by [`crate::classifier::classify_records`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl CourseRecord {
    pub fn new(period: &str, code: &str, category: Category, credit_hours: u32) -> Self {
        Self {
            period: period.to_string(),
            code: code.to_string(),
            title: String::new(),
            category,
            credit_hours,
            grade: None,
            withdrawn: false,
            waived: false,
            in_progress: false,
            outcome: None,
        }
    }

    pub fn with_grade(mut self, grade: f64) -> Self {
        self.grade = Some(grade);
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn mark_withdrawn(mut self) -> Self {
        self.withdrawn = true;
        self
    }

    pub fn mark_waived(mut self) -> Self {
        self.waived = true;
        self
    }

    pub fn mark_in_progress(mut self) -> Self {
        self.in_progress = true;
        self
    }

    pub fn is_complementary(&self) -> bool {
        self.category == Category::ComplementaryActivity
    }

    /// The grade this record contributes to averages, if any.
    ///
    /// Complementary activities, waived and withdrawn records carry no
    /// grade even when the producer filled one in.
    pub fn graded_value(&self) -> Option<f64> {
        if self.is_complementary() || self.waived || self.withdrawn {
            return None;
        }
        self.grade
    }

    /// Stored outcome, or the classifier's answer when none was stored.
    pub fn resolved_outcome(&self) -> Outcome {
        self.outcome.unwrap_or_else(|| {
            classify(
                self.grade,
                self.withdrawn,
                self.waived,
                self.in_progress,
                self.category,
            )
        })
    }

    /// Parsed period, `None` when the string is not `YYYY.S`.
    pub fn parsed_period(&self) -> Option<Period> {
        self.period.parse().ok()
    }

    /// Credit units for this record given the curriculum's hours per credit.
    pub fn credits(&self, hours_per_credit: u32) -> f64 {
        if hours_per_credit == 0 {
            return 0.0;
        }
        self.credit_hours as f64 / hours_per_credit as f64
    }
}

/// How category overflow is handled by the hour aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverflowPolicy {
    /// Categories whose hours beyond their requirement move to free elective.
    #[serde(default)]
    pub redistributable: Vec<Category>,
    /// Hard cap on mandatory hours; anything above is discarded.
    #[serde(default)]
    pub mandatory_ceiling: Option<u32>,
}

/// Per-degree-program configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumConfig {
    /// Unique identifier for this curriculum.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Hours required to graduate.
    pub total_required_hours: u32,
    /// Required hours per category; missing categories require 0.
    #[serde(default)]
    pub category_requirements: BTreeMap<Category, u32>,
    #[serde(default)]
    pub overflow_policy: OverflowPolicy,
    #[serde(default = "default_hours_per_credit")]
    pub hours_per_credit: u32,
    #[serde(default = "default_courses_per_semester")]
    pub courses_per_semester: u32,
}

fn default_hours_per_credit() -> u32 {
    DEFAULT_HOURS_PER_CREDIT
}

fn default_courses_per_semester() -> u32 {
    DEFAULT_COURSES_PER_SEMESTER
}

impl CurriculumConfig {
    pub fn new(id: &str, total_required_hours: u32) -> Self {
        Self {
            id: id.to_string(),
            name: String::new(),
            total_required_hours,
            category_requirements: BTreeMap::new(),
            overflow_policy: OverflowPolicy::default(),
            hours_per_credit: DEFAULT_HOURS_PER_CREDIT,
            courses_per_semester: DEFAULT_COURSES_PER_SEMESTER,
        }
    }

    pub fn with_requirement(mut self, category: Category, hours: u32) -> Self {
        self.category_requirements.insert(category, hours);
        self
    }

    pub fn with_redistributable(mut self, categories: &[Category]) -> Self {
        self.overflow_policy.redistributable = categories.to_vec();
        self
    }

    pub fn with_mandatory_ceiling(mut self, ceiling: u32) -> Self {
        self.overflow_policy.mandatory_ceiling = Some(ceiling);
        self
    }

    /// Required hours for a category (0 when the curriculum is silent).
    pub fn required_hours(&self, category: Category) -> u32 {
        self.category_requirements
            .get(&category)
            .copied()
            .unwrap_or(0)
    }

    pub fn is_redistributable(&self, category: Category) -> bool {
        self.overflow_policy.redistributable.contains(&category)
    }
}

/// Who a transcript belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
}

/// A student's course history as handed over by a record source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub student: StudentInfo,
    #[serde(default)]
    pub courses: Vec<CourseRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_parse_and_order() {
        let a: Period = "2021.2".parse().unwrap();
        let b: Period = "2022.1".parse().unwrap();
        let c: Period = "2022.2".parse().unwrap();
        assert_eq!(a, Period::new(2021, 2));
        assert!(a < b);
        assert!(b < c);
        assert_eq!(c.to_string(), "2022.2");
    }

    #[test]
    fn period_rejects_malformed() {
        assert!("2021".parse::<Period>().is_err());
        assert!("21.1".parse::<Period>().is_err());
        assert!("2021.".parse::<Period>().is_err());
        assert!("abcd.1".parse::<Period>().is_err());
    }

    #[test]
    fn category_display_and_parse() {
        for category in Category::ALL {
            let parsed: Category = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert_eq!(
            "Free Elective".parse::<Category>().unwrap(),
            Category::FreeElective
        );
        assert!("lab".parse::<Category>().is_err());
    }

    #[test]
    fn graded_value_ignores_non_contributing_records() {
        let base = CourseRecord::new("2022.1", "MAT1", Category::Mandatory, 60).with_grade(8.0);
        assert_eq!(base.graded_value(), Some(8.0));
        assert_eq!(base.clone().mark_waived().graded_value(), None);
        assert_eq!(base.clone().mark_withdrawn().graded_value(), None);

        let mut complementary = base;
        complementary.category = Category::ComplementaryActivity;
        assert_eq!(complementary.graded_value(), None);
    }

    #[test]
    fn resolved_outcome_prefers_stored_value() {
        let mut record = CourseRecord::new("2022.1", "MAT1", Category::Mandatory, 60).with_grade(5.0);
        assert_eq!(record.resolved_outcome(), Outcome::Failed);
        record.outcome = Some(Outcome::Approved);
        assert_eq!(record.resolved_outcome(), Outcome::Approved);
    }

    #[test]
    fn curriculum_serde_defaults() {
        let json = r#"{
            "id": "cs",
            "total_required_hours": 3000,
            "category_requirements": { "mandatory": 2400, "optional": 300 }
        }"#;
        let curriculum: CurriculumConfig = serde_json::from_str(json).unwrap();
        assert_eq!(curriculum.hours_per_credit, DEFAULT_HOURS_PER_CREDIT);
        assert_eq!(curriculum.courses_per_semester, DEFAULT_COURSES_PER_SEMESTER);
        assert_eq!(curriculum.required_hours(Category::Mandatory), 2400);
        assert_eq!(curriculum.required_hours(Category::Extension), 0);
        assert!(curriculum.overflow_policy.mandatory_ceiling.is_none());
    }

    #[test]
    fn course_record_serde_roundtrip() {
        let record = CourseRecord::new("2023.1", "INF10", Category::Optional, 45)
            .with_title("Databases")
            .with_grade(9.25);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("outcome"));
        let back: CourseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
