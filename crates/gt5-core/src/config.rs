//! Drawing engine configuration.

use crate::style::SerializableColor;
use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "GT5_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Export defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Output pixels per canvas unit.
    pub pixel_ratio: f64,
    /// JPEG quality, 1 to 100.
    pub jpeg_quality: u8,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            pixel_ratio: 2.0,
            jpeg_quality: 90,
        }
    }
}

/// Drawing engine configuration.
///
/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    pub default_tool: ToolKind,
    pub default_color: SerializableColor,
    pub default_brush_size: f64,
    pub min_brush_size: f64,
    pub max_brush_size: f64,
    /// Brush size change per `[` / `]` press.
    pub brush_step: f64,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub max_canvas_width: u32,
    pub max_canvas_height: u32,
    /// Space kept free around the canvas when fitting it to its container.
    pub container_margin: u32,
    /// Maximum undo entries; `None` keeps everything.
    pub history_limit: Option<usize>,
    /// Pointer slack for the eyedropper, in canvas units.
    pub hit_tolerance: f64,
    pub export: ExportSettings,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_tool: ToolKind::Brush,
            default_color: SerializableColor::new(0xFF, 0x57, 0x22, 0xFF),
            default_brush_size: 10.0,
            min_brush_size: 1.0,
            max_brush_size: 100.0,
            brush_step: 5.0,
            canvas_width: 800,
            canvas_height: 600,
            max_canvas_width: 1200,
            max_canvas_height: 800,
            container_margin: 40,
            history_limit: None,
            hit_tolerance: 2.0,
            export: ExportSettings::default(),
        }
    }
}

impl DrawingConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load from the file named by `GT5_CONFIG`, or use defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                log::info!("Loading config from {}", Path::new(&path).display());
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !(self.min_brush_size > 0.0 && self.min_brush_size <= self.max_brush_size) {
            return invalid(format!(
                "brush size range {}..={} is empty",
                self.min_brush_size, self.max_brush_size
            ));
        }
        if !(self.min_brush_size..=self.max_brush_size).contains(&self.default_brush_size) {
            return invalid(format!(
                "default brush size {} outside {}..={}",
                self.default_brush_size, self.min_brush_size, self.max_brush_size
            ));
        }
        if self.brush_step <= 0.0 {
            return invalid(format!("brush step must be positive, got {}", self.brush_step));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return invalid("canvas size must be non-zero".to_string());
        }
        if self.max_canvas_width == 0 || self.max_canvas_height == 0 {
            return invalid("maximum canvas size must be non-zero".to_string());
        }
        if self.history_limit == Some(0) {
            return invalid("history limit must be at least 1".to_string());
        }
        if self.export.pixel_ratio <= 0.0 {
            return invalid(format!("pixel ratio must be positive, got {}", self.export.pixel_ratio));
        }
        if !(1..=100).contains(&self.export.jpeg_quality) {
            return invalid(format!("JPEG quality {} outside 1..=100", self.export.jpeg_quality));
        }
        Ok(())
    }

    /// Clamp a brush size into the configured range.
    pub fn clamp_brush_size(&self, size: f64) -> f64 {
        size.clamp(self.min_brush_size, self.max_brush_size)
    }
}
