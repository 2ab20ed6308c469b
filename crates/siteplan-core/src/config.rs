//! Layout configuration
//!
//! All fields have defaults, so a TOML file only needs to name the options it
//! changes:
//!
//! ```toml
//! pixels_per_day = 32.0
//! status_date = "2025-03-14"
//! ```

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Scale and spacing options for the Gantt layout
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Horizontal scale
    pub pixels_per_day: f64,
    /// Vertical spacing between rows
    pub row_height: f64,
    /// Inset of a bar inside its row, top and bottom
    pub top_padding: f64,
    /// Smallest canvas width handed to the renderer
    pub min_canvas_width: f64,
    /// Smallest canvas height handed to the renderer
    pub min_canvas_height: f64,
    /// Empty space below the last row
    pub bottom_margin: f64,
    /// Width given to a summary bar whose children collapse below the floor
    pub summary_min_width: f64,
    /// Summary bars narrower than this are widened to `summary_min_width`
    pub summary_width_floor: f64,
    /// Status date marker ("now line"), if any
    pub status_date: Option<NaiveDate>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pixels_per_day: 50.0,
            row_height: 24.0,
            top_padding: 4.0,
            min_canvas_width: 800.0,
            min_canvas_height: 400.0,
            bottom_margin: 50.0,
            summary_min_width: 20.0,
            summary_width_floor: 10.0,
            status_date: None,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure horizontal scale
    pub fn pixels_per_day(mut self, px: f64) -> Self {
        self.pixels_per_day = px;
        self
    }

    /// Configure row height
    pub fn row_height(mut self, height: f64) -> Self {
        self.row_height = height;
        self
    }

    /// Configure bar inset
    pub fn top_padding(mut self, padding: f64) -> Self {
        self.top_padding = padding;
        self
    }

    /// Show a status date marker
    pub fn with_status_date(mut self, date: NaiveDate) -> Self {
        self.status_date = Some(date);
        self
    }

    /// Parse a TOML document and validate it
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file and validate it
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Reject values that would produce a degenerate canvas.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("pixels_per_day", self.pixels_per_day),
            ("row_height", self.row_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        let non_negative = [
            ("top_padding", self.top_padding),
            ("min_canvas_width", self.min_canvas_width),
            ("min_canvas_height", self.min_canvas_height),
            ("bottom_margin", self.bottom_margin),
            ("summary_min_width", self.summary_min_width),
            ("summary_width_floor", self.summary_width_floor),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        if self.top_padding * 2.0 >= self.row_height {
            return Err(ConfigError::Invalid(format!(
                "top_padding {} leaves no room for a bar in a {} px row",
                self.top_padding, self.row_height
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = LayoutConfig::default();
        assert_eq!(config.pixels_per_day, 50.0);
        assert_eq!(config.row_height, 24.0);
        assert_eq!(config.top_padding, 4.0);
        assert!(config.status_date.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = LayoutConfig::from_toml_str(
            r#"
            pixels_per_day = 20.0
            status_date = "2025-03-14"
            "#,
        )
        .unwrap();

        assert_eq!(config.pixels_per_day, 20.0);
        assert_eq!(config.row_height, 24.0);
        assert_eq!(config.status_date, NaiveDate::from_ymd_opt(2025, 3, 14));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = LayoutConfig::from_toml_str("pixel_per_day = 20.0").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_scale_is_invalid() {
        let err = LayoutConfig::from_toml_str("pixels_per_day = 0.0").unwrap_err();
        assert!(err.to_string().contains("pixels_per_day"));
    }

    #[test]
    fn padding_must_fit_in_row() {
        let config = LayoutConfig::new().row_height(8.0).top_padding(4.0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn builder_methods() {
        let config = LayoutConfig::new().pixels_per_day(12.5).row_height(30.0);
        assert_eq!(config.pixels_per_day, 12.5);
        assert_eq!(config.row_height, 30.0);
    }
}
