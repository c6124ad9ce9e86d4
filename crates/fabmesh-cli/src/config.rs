//! TOML configuration for the CLI.

use std::path::Path;

use anyhow::{Context, Result};
use fabmesh_metrics::PLA_DENSITY;
use fabmesh_thumbnail::ThumbnailSettings;
use serde::{Deserialize, Serialize};

/// Settings for `fabmesh analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Material density in g/cm³ for mass estimates.
    pub density: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            density: PLA_DENSITY,
        }
    }
}

/// Whole config file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `[thumbnail]`: preview render settings.
    pub thumbnail: ThumbnailSettings,
    /// `[analysis]`: metrics settings.
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Parse and validate a config document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.thumbnail.validate()?;
        if !(config.analysis.density > 0.0) {
            anyhow::bail!("analysis.density must be positive");
        }
        Ok(config)
    }

    /// Load `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
