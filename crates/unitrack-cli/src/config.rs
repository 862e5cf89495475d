//! CLI settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level unitrack configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitrackConfig {
    /// Default transcript file.
    #[serde(default)]
    pub transcript: Option<String>,
    /// Default curriculum file.
    #[serde(default)]
    pub curriculum: Option<String>,
    /// Complementary hours approved outside the transcript.
    #[serde(default)]
    pub external_hours: u32,
    /// Output format for `report`.
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "table".to_string()
}

impl Default for UnitrackConfig {
    fn default() -> Self {
        Self {
            transcript: None,
            curriculum: None,
            external_hours: 0,
            format: default_format(),
        }
    }
}

impl UnitrackConfig {
    pub fn transcript_path(&self) -> Option<PathBuf> {
        self.transcript.as_deref().map(PathBuf::from)
    }

    pub fn curriculum_path(&self) -> Option<PathBuf> {
        self.curriculum.as_deref().map(PathBuf::from)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied as-is and never expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `unitrack.toml` in the current directory
/// 2. `~/.config/unitrack/config.toml`
///
/// Environment variable overrides: `UNITRACK_TRANSCRIPT`,
/// `UNITRACK_CURRICULUM`, `UNITRACK_EXTERNAL_HOURS`.
pub fn load_config_from(path: Option<&Path>) -> Result<UnitrackConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("unitrack.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<UnitrackConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => UnitrackConfig::default(),
    };

    // Apply env var overrides
    if let Ok(transcript) = std::env::var("UNITRACK_TRANSCRIPT") {
        config.transcript = Some(transcript);
    }
    if let Ok(curriculum) = std::env::var("UNITRACK_CURRICULUM") {
        config.curriculum = Some(curriculum);
    }
    if let Ok(hours) = std::env::var("UNITRACK_EXTERNAL_HOURS") {
        config.external_hours = hours
            .trim()
            .parse()
            .with_context(|| format!("invalid UNITRACK_EXTERNAL_HOURS: '{hours}'"))?;
    }

    config.transcript = config.transcript.as_deref().map(resolve_env_vars);
    config.curriculum = config.curriculum.as_deref().map(resolve_env_vars);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("unitrack"))
}
