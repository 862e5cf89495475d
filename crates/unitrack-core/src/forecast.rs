//! Graduation forecast.
//!
//! Projects how many semesters remain from the hours already counted, the
//! hours in progress and an assumed per-semester course load. The typical
//! size of a course is estimated from the student's own history.

use serde::{Deserialize, Serialize};

use crate::model::{CourseRecord, DEFAULT_COURSES_PER_SEMESTER};

/// Course size assumed when the history gives nothing to average.
pub const DEFAULT_HOURS_PER_COURSE: f64 = 60.0;

/// Outcome of a graduation forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraduationForecast {
    /// Narrative shown to the student.
    pub text: String,
    pub semesters_remaining: u32,
    pub can_graduate_this_term: bool,
    /// Courses still needed beyond those in progress, when not graduating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courses_needed: Option<u32>,
}

/// Mean hours of the courses actually taken: withdrawn and complementary
/// records are left out.
pub fn average_course_hours(records: &[CourseRecord]) -> f64 {
    let hours: Vec<u32> = records
        .iter()
        .filter(|r| !r.withdrawn && !r.is_complementary() && r.credit_hours > 0)
        .map(|r| r.credit_hours)
        .collect();
    if hours.is_empty() {
        return DEFAULT_HOURS_PER_COURSE;
    }
    hours.iter().map(|&h| h as f64).sum::<f64>() / hours.len() as f64
}

/// Forecast graduation with the default course load.
pub fn forecast(
    records: &[CourseRecord],
    approved_hours: u32,
    projected_hours: u32,
    in_progress_hours: u32,
    total_required_hours: u32,
    in_progress_records: &[&CourseRecord],
) -> GraduationForecast {
    forecast_with_load(
        records,
        approved_hours,
        projected_hours,
        in_progress_hours,
        total_required_hours,
        in_progress_records,
        DEFAULT_COURSES_PER_SEMESTER,
    )
}

/// Forecast graduation assuming `courses_per_semester` courses each term.
pub fn forecast_with_load(
    records: &[CourseRecord],
    approved_hours: u32,
    projected_hours: u32,
    in_progress_hours: u32,
    total_required_hours: u32,
    in_progress_records: &[&CourseRecord],
    courses_per_semester: u32,
) -> GraduationForecast {
    if records.is_empty() {
        return GraduationForecast {
            text: "Add your courses to see a graduation forecast.".into(),
            semesters_remaining: 0,
            can_graduate_this_term: false,
            courses_needed: None,
        };
    }

    if total_required_hours == 0 {
        return GraduationForecast {
            text: "No hour requirement is configured; nothing is left to complete.".into(),
            semesters_remaining: 0,
            can_graduate_this_term: true,
            courses_needed: None,
        };
    }

    let in_progress_count = in_progress_records.len();

    if projected_hours >= total_required_hours {
        let text = if in_progress_hours > 0 && approved_hours < total_required_hours {
            format!(
                "Completing the {in_progress_count} course(s) in progress ({in_progress_hours} h) \
                 meets the {total_required_hours} h requirement. You can graduate this term."
            )
        } else if in_progress_hours > 0 {
            format!(
                "You have met the {total_required_hours} h requirement. You can graduate; \
                 {in_progress_count} course(s) still in progress ({in_progress_hours} h) \
                 count on top of it."
            )
        } else {
            format!("You have met the {total_required_hours} h requirement. You can graduate.")
        };
        return GraduationForecast {
            text,
            semesters_remaining: 0,
            can_graduate_this_term: true,
            courses_needed: None,
        };
    }

    let remaining_hours = total_required_hours.saturating_sub(approved_hours);
    let course_hours = average_course_hours(records);
    let load = courses_per_semester.max(1);
    let hours_per_semester = course_hours * load as f64;
    let semesters_remaining = (remaining_hours as f64 / hours_per_semester).ceil() as u32;

    let after_in_progress = total_required_hours.saturating_sub(projected_hours);
    let courses_needed = (after_in_progress as f64 / course_hours).ceil() as u32;

    let mut text = format!("{remaining_hours} h of {total_required_hours} h remaining. ");
    if in_progress_hours > 0 {
        text.push_str(&format!(
            "{in_progress_count} course(s) in progress ({in_progress_hours} h) will leave \
             {after_in_progress} h, about {courses_needed} more course(s). "
        ));
    } else {
        text.push_str(&format!("That is about {courses_needed} course(s). "));
    }
    text.push_str(&format!(
        "At {load} courses per semester (~{hours_per_semester:.0} h), expect \
         {semesters_remaining} more semester(s)."
    ));

    GraduationForecast {
        text,
        semesters_remaining,
        can_graduate_this_term: false,
        courses_needed: Some(courses_needed),
    }
}
