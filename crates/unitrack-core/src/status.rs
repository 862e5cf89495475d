//! Academic standing bands for a credit-weighted ratio.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Qualitative standing band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusBand {
    Excellent,
    Good,
    Regular,
    NeedsImprovement,
}

impl StatusBand {
    /// CSS-style class name.
    pub fn class(&self) -> &'static str {
        match self {
            StatusBand::Excellent => "excellent",
            StatusBand::Good => "good",
            StatusBand::Regular => "regular",
            StatusBand::NeedsImprovement => "needs-improvement",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            StatusBand::Excellent => "Excellent",
            StatusBand::Good => "Good",
            StatusBand::Regular => "Regular",
            StatusBand::NeedsImprovement => "Needs improvement",
        }
    }
}

impl fmt::Display for StatusBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Band plus its display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub band: StatusBand,
    pub class: String,
    pub text: String,
}

/// Map a CR score to its band. Lower bounds are inclusive.
pub fn classify_status(cr: f64) -> StatusReport {
    let band = if cr >= 8.5 {
        StatusBand::Excellent
    } else if cr >= 7.0 {
        StatusBand::Good
    } else if cr >= 6.0 {
        StatusBand::Regular
    } else {
        StatusBand::NeedsImprovement
    };
    StatusReport {
        band,
        class: band.class().to_string(),
        text: band.text().to_string(),
    }
}
