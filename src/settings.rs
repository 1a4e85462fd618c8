//! Optional settings file for the reorganizer.
//!
//! The file is YAML and every field has a default, so an empty file is
//! valid:
//!
//! ```yaml
//! padding: 0.1
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::grid::DEFAULT_PADDING;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Fraction of the average image size added to each grid cell.
    pub padding: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
        }
    }
}

/// Errors that can occur when loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("padding must be a finite number >= 0 (got {0})")]
    InvalidPadding(f64),
}

impl Settings {
    /// Load settings from a file path.
    ///
    /// Unlike an implicit default, an explicitly requested file must exist.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate settings from YAML text.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(SettingsError::InvalidPadding(self.padding));
        }
        Ok(())
    }
}
