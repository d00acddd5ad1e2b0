//! sectioner configuration: default break markers, limits, and output format.

use crate::error::{Result, SectionerError};
use crate::text::{BreakPatterns, SegmentLimits};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How sections are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable section listing
    #[default]
    Text,
    /// The whole book upload as JSON
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionerConfig {
    /// Break markers used when none are given on the command line
    #[serde(default)]
    pub break_patterns: Vec<String>,

    /// Treat break markers as plain text instead of regex
    #[serde(default)]
    pub literal_breaks: bool,

    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Section word-count envelope
    #[serde(default)]
    pub limits: SegmentLimits,
}

impl Default for SectionerConfig {
    fn default() -> Self {
        Self {
            break_patterns: Vec::new(),
            literal_breaks: false,
            format: OutputFormat::default(),
            limits: SegmentLimits::default(),
        }
    }
}

impl SectionerConfig {
    /// Get the config file path: <config dir>/cli-programs/sectioner.toml
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cli-programs")
            .join("sectioner.toml")
    }

    /// Load config from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, returning default if the file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(SectionerError::io(path))?;
        let config: SectionerConfig = toml::from_str(&content)?;
        config.limits.validate()?;
        Ok(config)
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.limits.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(SectionerError::io(parent))?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(SectionerError::io(path))?;
        Ok(())
    }

    /// Compile the configured break markers
    pub fn break_patterns(&self) -> Result<BreakPatterns> {
        if self.literal_breaks {
            BreakPatterns::literal(self.break_patterns.as_slice())
        } else {
            BreakPatterns::new(self.break_patterns.as_slice())
        }
    }
}
