//! Configuration for template selection

use std::path::Path;

use serde::Deserialize;

use super::error::PlanError;

/// Tunables for sizing and choosing seating templates.
///
/// Loadable from TOML with kebab-case keys; missing keys keep their defaults:
///
/// ```toml
/// min-board-share = 0.7
/// max-cell = 48.0
/// hysteresis = 1.2
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SelectorConfig {
    /// Board share the size search tries to reach before it stops shrinking cells
    pub min_board_share: f64,

    /// Preferred width/height ratio of the board
    pub preferred_aspect: f64,

    /// Smallest acceptable cell size in pixels
    pub min_cell: f64,

    /// Largest cell size in pixels; panels are measured at this size
    pub max_cell: f64,

    /// Multiplier (>= 1) on the score of the template that is already active
    pub hysteresis: f64,

    /// Gap around panels and placed boxes
    pub margin: i32,

    /// Judge the board by its largest rectangle of the preferred aspect
    /// instead of by its area weighted with aspect efficiency
    pub strict_board_size: bool,

    /// Board share used when retrying a template that produced no cell size
    pub emergency_board_share: f64,

    /// Generic templates tried after the requested template's alternates
    pub fallback: Vec<String>,

    /// Template used when nothing else produces a usable cell size
    pub default_template: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            min_board_share: 0.6,
            preferred_aspect: 1.0,
            min_cell: 10.0,
            max_cell: 60.0,
            hysteresis: 1.0,
            margin: 4,
            strict_board_size: true,
            emergency_board_share: 0.2,
            fallback: [
                "portrait",
                "across",
                "landscape",
                "landscape-2x",
                "landscape-3x",
                "portrait-2x",
                "portrait-3x",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            default_template: "across".to_string(),
        }
    }
}

impl SelectorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, PlanError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PlanError::invalid_config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Load a configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, PlanError> {
        let config: SelectorConfig =
            toml::from_str(content).map_err(|e| PlanError::invalid_config(e.message()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_min_board_share(mut self, share: f64) -> Self {
        self.min_board_share = share;
        self
    }

    pub fn with_preferred_aspect(mut self, aspect: f64) -> Self {
        self.preferred_aspect = aspect;
        self
    }

    /// Set the cell size range
    pub fn with_cell_range(mut self, min_cell: f64, max_cell: f64) -> Self {
        self.min_cell = min_cell;
        self.max_cell = max_cell;
        self
    }

    pub fn with_hysteresis(mut self, hysteresis: f64) -> Self {
        self.hysteresis = hysteresis;
        self
    }

    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_strict_board_size(mut self, strict: bool) -> Self {
        self.strict_board_size = strict;
        self
    }

    /// Replace the generic templates tried after the requested one
    pub fn with_fallback<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default_template(mut self, name: impl Into<String>) -> Self {
        self.default_template = name.into();
        self
    }

    /// Reject settings the size search cannot work with
    pub fn validate(&self) -> Result<(), PlanError> {
        if !(self.min_cell > 0.0) {
            return Err(PlanError::invalid_config("min-cell must be positive"));
        }
        if !(self.max_cell >= self.min_cell) {
            return Err(PlanError::invalid_config("max-cell must not be below min-cell"));
        }
        if !(self.hysteresis >= 1.0) {
            return Err(PlanError::invalid_config("hysteresis must be at least 1"));
        }
        if !(self.preferred_aspect > 0.0) || !self.preferred_aspect.is_finite() {
            return Err(PlanError::invalid_config("preferred-aspect must be positive"));
        }
        if self.margin < 0 {
            return Err(PlanError::invalid_config("margin must not be negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SelectorConfig::default();
        assert_eq!(config.min_board_share, 0.6);
        assert_eq!(config.default_template, "across");
        assert_eq!(config.fallback.len(), 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SelectorConfig::new()
            .with_cell_range(5.0, 30.0)
            .with_hysteresis(1.2)
            .with_strict_board_size(false)
            .with_fallback(["landscape"]);
        assert_eq!(config.min_cell, 5.0);
        assert_eq!(config.max_cell, 30.0);
        assert_eq!(config.hysteresis, 1.2);
        assert!(!config.strict_board_size);
        assert_eq!(config.fallback, vec!["landscape".to_string()]);
    }

    #[test]
    fn test_from_toml_keeps_defaults() {
        let config = SelectorConfig::from_toml_str("max-cell = 48.0\nhysteresis = 1.5\n").unwrap();
        assert_eq!(config.max_cell, 48.0);
        assert_eq!(config.hysteresis, 1.5);
        assert_eq!(config.margin, 4);
    }

    #[test]
    fn test_validation() {
        assert!(SelectorConfig::new().with_hysteresis(0.9).validate().is_err());
        assert!(SelectorConfig::new().with_cell_range(20.0, 10.0).validate().is_err());
        assert!(SelectorConfig::new().with_cell_range(0.0, 10.0).validate().is_err());
        assert!(SelectorConfig::from_toml_str("unknown-key = 1").is_err());
    }
}
