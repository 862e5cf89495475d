//! Error types for parsing course data.
//!
//! The calculation engine itself is total and never returns these; they are
//! produced when turning text (periods, category names, transcript and
//! curriculum files) into model values.

use thiserror::Error;

/// Errors that can occur while reading course data.
#[derive(Debug, Error)]
pub enum UnitrackError {
    /// A period string was not in `YYYY.S` form.
    #[error("invalid period '{0}', expected YYYY.S")]
    InvalidPeriod(String),

    /// A category name did not match any known category.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// A transcript or curriculum file could not be decoded.
    #[error("failed to parse {path}: {message}")]
    Malformed { path: String, message: String },

    /// The file extension does not map to a supported format.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
}

impl UnitrackError {
    /// Returns `true` if the error came from a bad value inside otherwise
    /// well-formed input, as opposed to an undecodable file.
    pub fn is_value_error(&self) -> bool {
        matches!(
            self,
            UnitrackError::InvalidPeriod(_) | UnitrackError::UnknownCategory(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = UnitrackError::InvalidPeriod("2021-1".into());
        assert_eq!(err.to_string(), "invalid period '2021-1', expected YYYY.S");

        let err = UnitrackError::Malformed {
            path: "t.toml".into(),
            message: "missing field".into(),
        };
        assert!(err.to_string().contains("t.toml"));
    }

    #[test]
    fn value_error_classification() {
        assert!(UnitrackError::UnknownCategory("x".into()).is_value_error());
        assert!(!UnitrackError::UnsupportedFormat("csv".into()).is_value_error());
    }
}
