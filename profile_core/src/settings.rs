//! # Engine Settings
//!
//! Optional TOML configuration for the selection engine. Every key has a
//! default, so an empty file (or no file at all) is a valid configuration.
//!
//! ```toml
//! [analysis]
//! gamma_m = 1.5
//!
//! [catalog]
//! path = "tables/profiles.json"
//!
//! [selection]
//! families = ["IPE", "HEA"]
//! min_inertia_cm4 = 0.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{CalcError, CalcResult};

/// Partial safety factor applied to `fyk` when none is configured
pub const DEFAULT_GAMMA_M: f64 = 1.5;

/// Top-level settings document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub analysis: AnalysisSettings,
    pub catalog: CatalogSettings,
    pub selection: SelectionSettings,
}

/// Stress check parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Partial safety factor: sigma_lim = fyk / gamma_m
    pub gamma_m: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            gamma_m: DEFAULT_GAMMA_M,
        }
    }
}

/// Where to read the section table from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// External JSON table; the built-in table is used when unset
    pub path: Option<PathBuf>,
}

/// Default filter criteria for callers that don't supply their own
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// Families to consider; empty means every family in the catalog
    pub families: Vec<String>,
    /// Minimum moment of inertia in cm⁴ (0 disables the check)
    pub min_inertia_cm4: f64,
}

impl AnalysisSettings {
    pub fn validate(&self) -> CalcResult<()> {
        if !self.gamma_m.is_finite() || self.gamma_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "analysis.gamma_m",
                self.gamma_m.to_string(),
                "Partial safety factor must be a positive number",
            ));
        }
        Ok(())
    }
}

impl EngineSettings {
    /// Parse settings from a TOML string.
    pub fn from_toml_str(content: &str) -> CalcResult<Self> {
        let settings: EngineSettings = toml::from_str(content)
            .map_err(|e| CalcError::serialization(format!("Invalid settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from disk. A missing file yields the defaults.
    pub fn load(path: &Path) -> CalcResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(EngineSettings::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            CalcError::file_error("read", path.display().to_string(), e.to_string())
        })?;
        let settings = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn validate(&self) -> CalcResult<()> {
        self.analysis.validate()?;
        let min = self.selection.min_inertia_cm4;
        if !min.is_finite() || min < 0.0 {
            return Err(CalcError::invalid_input(
                "selection.min_inertia_cm4",
                min.to_string(),
                "Minimum inertia cannot be negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.analysis.gamma_m, 1.5);
        assert!(settings.catalog.path.is_none());
        assert!(settings.selection.families.is_empty());
        assert_eq!(settings.selection.min_inertia_cm4, 0.0);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(EngineSettings::from_toml_str("").unwrap(), EngineSettings::default());
    }

    #[test]
    fn test_partial_document() {
        let settings = EngineSettings::from_toml_str(
            r#"
            [analysis]
            gamma_m = 1.1

            [selection]
            families = ["IPE", "HEB"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.analysis.gamma_m, 1.1);
        assert_eq!(settings.selection.families, vec!["IPE", "HEB"]);
        assert_eq!(settings.selection.min_inertia_cm4, 0.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = EngineSettings::from_toml_str("[analysis]\ngamma_m = 0.0").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = EngineSettings::from_toml_str("[selection]\nmin_inertia_cm4 = -5.0").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = EngineSettings::from_toml_str("[analysis]\ngamma_m = \"high\"").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = EngineSettings::load(Path::new("/nonexistent/profile.toml")).unwrap();
        assert_eq!(settings, EngineSettings::default());
    }
}
