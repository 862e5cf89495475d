//! Grade trend between the recent and older halves of a course history.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{CourseRecord, Period};

/// Mean difference beyond which a trend counts as a change.
pub const TREND_THRESHOLD: f64 = 0.5;

/// Direction of the grade trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

impl TrendDirection {
    /// Icon identifier for the direction.
    pub fn icon(&self) -> &'static str {
        match self {
            TrendDirection::Improving => "trending-up",
            TrendDirection::Declining => "trending-down",
            TrendDirection::Stable => "minus",
            TrendDirection::InsufficientData => "help-circle",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            TrendDirection::Improving => "Your grades are improving",
            TrendDirection::Declining => "Your grades are declining",
            TrendDirection::Stable => "Your grades are stable",
            TrendDirection::InsufficientData => "Insufficient data to compute a trend",
        }
    }
}

/// Trend descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub direction: TrendDirection,
    pub icon: String,
    pub text: String,
    /// Recent mean minus older mean; absent without enough data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
}

impl TrendReport {
    fn new(direction: TrendDirection, delta: Option<f64>) -> Self {
        Self {
            direction,
            icon: direction.icon().to_string(),
            text: direction.text().to_string(),
            delta,
        }
    }
}

/// Order two period strings most recent first.
///
/// Unparsable periods compare as the oldest possible term.
pub fn compare_periods_desc(a: &str, b: &str) -> Ordering {
    let parse = |s: &str| s.parse::<Period>().unwrap_or_default();
    parse(b).cmp(&parse(a))
}

/// Compare the mean grade of the most recent half of graded courses with the
/// older half.
///
/// Both halves hold `n / 2` records; with an odd count the middle record of
/// the chronological order is left out of both. Records of the same period
/// are ordered by course code, then grade, so the result does not depend on
/// input order.
pub fn analyze_trend(records: &[CourseRecord]) -> TrendReport {
    let mut graded: Vec<(&str, &str, f64)> = records
        .iter()
        .filter_map(|r| {
            r.graded_value()
                .map(|g| (r.period.as_str(), r.code.as_str(), g))
        })
        .collect();

    if graded.len() < 2 {
        return TrendReport::new(TrendDirection::InsufficientData, None);
    }

    graded.sort_by(|a, b| {
        compare_periods_desc(a.0, b.0)
            .then_with(|| a.1.cmp(b.1))
            .then_with(|| a.2.total_cmp(&b.2))
    });

    let half = graded.len() / 2;
    let recent = &graded[..half];
    let older = &graded[graded.len() - half..];

    let mean = |xs: &[(&str, &str, f64)]| {
        xs.iter().map(|(_, _, g)| g).sum::<f64>() / xs.len() as f64
    };
    let delta = mean(recent) - mean(older);

    let direction = if delta > TREND_THRESHOLD {
        TrendDirection::Improving
    } else if delta < -TREND_THRESHOLD {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    TrendReport::new(direction, Some(delta))
}
