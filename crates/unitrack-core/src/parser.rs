//! Transcript and curriculum file loading.
//!
//! Transcripts are TOML (`[student]` header plus `[[courses]]`) or JSON with
//! the same shape. Curricula are TOML or JSON documents describing a
//! [`CurriculumConfig`]. Validation here is the producer's job; the engine
//! never calls it.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::UnitrackError;
use crate::model::{
    Category, CurriculumConfig, OverflowPolicy, Period, Transcript, DEFAULT_COURSES_PER_SEMESTER,
    DEFAULT_HOURS_PER_CREDIT, MAX_GRADE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

fn detect_format(path: &Path) -> Result<Format, UnitrackError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        other => Err(UnitrackError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

/// Parse a transcript file, picking the format from its extension.
pub fn parse_transcript(path: &Path) -> Result<Transcript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read transcript file: {}", path.display()))?;

    parse_transcript_str(&content, path)
}

/// Parse transcript text; `source_path` picks the format and labels errors.
pub fn parse_transcript_str(content: &str, source_path: &Path) -> Result<Transcript> {
    let transcript: Transcript = match detect_format(source_path)? {
        Format::Toml => toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?,
        Format::Json => serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?,
    };
    tracing::debug!(
        courses = transcript.courses.len(),
        path = %source_path.display(),
        "loaded transcript"
    );
    Ok(transcript)
}

/// Intermediate structure for curriculum files; category keys are checked
/// by name so a typo reports the offending key.
#[derive(Debug, Deserialize)]
struct CurriculumFile {
    id: String,
    #[serde(default)]
    name: String,
    total_required_hours: u32,
    #[serde(default)]
    category_requirements: BTreeMap<String, u32>,
    #[serde(default)]
    overflow_policy: Option<OverflowFile>,
    #[serde(default = "default_hours_per_credit")]
    hours_per_credit: u32,
    #[serde(default = "default_courses_per_semester")]
    courses_per_semester: u32,
}

#[derive(Debug, Deserialize)]
struct OverflowFile {
    #[serde(default)]
    redistributable: Vec<String>,
    #[serde(default)]
    mandatory_ceiling: Option<u32>,
}

fn default_hours_per_credit() -> u32 {
    DEFAULT_HOURS_PER_CREDIT
}

fn default_courses_per_semester() -> u32 {
    DEFAULT_COURSES_PER_SEMESTER
}

/// Parse a curriculum file, picking the format from its extension.
pub fn parse_curriculum(path: &Path) -> Result<CurriculumConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read curriculum file: {}", path.display()))?;

    parse_curriculum_str(&content, path)
}

/// Parse curriculum text; `source_path` picks the format and labels errors.
pub fn parse_curriculum_str(content: &str, source_path: &Path) -> Result<CurriculumConfig> {
    let parsed: CurriculumFile = match detect_format(source_path)? {
        Format::Toml => toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?,
        Format::Json => serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?,
    };

    let category_requirements = parsed
        .category_requirements
        .into_iter()
        .map(|(name, hours)| name.parse::<Category>().map(|category| (category, hours)))
        .collect::<Result<BTreeMap<_, _>, _>>()
        .with_context(|| format!("invalid category requirements in {}", source_path.display()))?;

    let overflow_policy = match parsed.overflow_policy {
        Some(overflow) => OverflowPolicy {
            redistributable: overflow
                .redistributable
                .iter()
                .map(|name| name.parse::<Category>())
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| {
                    format!("invalid overflow policy in {}", source_path.display())
                })?,
            mandatory_ceiling: overflow.mandatory_ceiling,
        },
        None => OverflowPolicy::default(),
    };

    Ok(CurriculumConfig {
        id: parsed.id,
        name: parsed.name,
        total_required_hours: parsed.total_required_hours,
        category_requirements,
        overflow_policy,
        hours_per_credit: parsed.hours_per_credit,
        courses_per_semester: parsed.courses_per_semester,
    })
}

/// Recursively load all `.toml` curricula from a directory.
pub fn load_curriculum_directory(dir: &Path) -> Result<Vec<CurriculumConfig>> {
    let mut curricula = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            curricula.extend(load_curriculum_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_curriculum(&path) {
                Ok(curriculum) => curricula.push(curriculum),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(curricula)
}

/// A warning from transcript validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The course code (if applicable).
    pub code: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a transcript for records the engine would misread.
pub fn validate_transcript(transcript: &Transcript) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for course in &transcript.courses {
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                code: Some(course.code.clone()),
                message,
            })
        };

        if course.period.parse::<Period>().is_err() {
            warn(format!("invalid period '{}', expected YYYY.S", course.period));
        }

        if !seen.insert((course.code.as_str(), course.period.as_str())) {
            warn(format!(
                "duplicate course {} in period {}",
                course.code, course.period
            ));
        }

        let flags = [course.withdrawn, course.waived, course.in_progress]
            .iter()
            .filter(|&&f| f)
            .count();
        if flags > 1 {
            warn("more than one of withdrawn, waived and in_progress is set".into());
        }

        if course.credit_hours == 0 && !course.withdrawn {
            warn("credit_hours must be positive".into());
        }

        if let Some(grade) = course.grade {
            if !(0.0..=MAX_GRADE).contains(&grade) {
                warn(format!("grade {grade} is outside 0-{MAX_GRADE}"));
            }
        } else if !course.is_complementary()
            && !course.withdrawn
            && !course.waived
            && !course.in_progress
        {
            warn("no grade recorded; the course will count as failed".into());
        }
    }

    warnings
}
