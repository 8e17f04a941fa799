//! Shared configuration for the texture brush
//!
//! This crate provides the single source of truth for the window/viewport
//! dimensions the path controller reads once at construction, and for the
//! capacity policy of the completed-stroke history.

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default window width in pixels
pub const DEFAULT_WIDTH: u32 = 1920;

/// Default window height in pixels
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Environment variable overriding the window size, formatted `<width>x<height>`
pub const WINDOW_ENV_VAR: &str = "TEXTURE_BRUSH_WINDOW";

/// Errors produced while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid window size '{0}', expected <width>x<height>")]
    InvalidWindowSize(String),

    #[error("Window dimensions must be non-zero, got {width}x{height}")]
    ZeroSized { width: u32, height: u32 },
}

/// Display configuration for the window the stroke is drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct DisplayConfig {
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl DisplayConfig {
    /// Create a new display config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Read the window size from `TEXTURE_BRUSH_WINDOW`, falling back to defaults
    pub fn from_env() -> Self {
        match std::env::var(WINDOW_ENV_VAR) {
            Ok(value) => Self::parse_window_size(&value).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Parse a `<width>x<height>` string such as `1280x720`
    pub fn parse_window_size(value: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidWindowSize(value.to_string());
        let (w, h) = value.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        let config = Self::new(width, height);
        config.validate()?;
        Ok(config)
    }

    /// Reject zero-sized windows
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroSized {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Number of pixels in the window (size of a full-window readback)
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// How many completed strokes the path history keeps.
///
/// The brush currently resolves a single curve per run, so the default keeps
/// exactly one stroke and ending a path replaces the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryCapacity {
    /// Keep at most this many strokes, evicting the oldest first
    Bounded(usize),
    /// Keep every completed stroke until the history is consumed
    Unbounded,
}

impl Default for HistoryCapacity {
    fn default() -> Self {
        HistoryCapacity::Bounded(1)
    }
}

impl HistoryCapacity {
    /// Maximum number of strokes, `None` when unbounded.
    ///
    /// A bounded capacity of zero is treated as one: the most recent stroke is
    /// always retained.
    pub fn limit(&self) -> Option<usize> {
        match *self {
            HistoryCapacity::Bounded(n) => Some(n.max(1)),
            HistoryCapacity::Unbounded => None,
        }
    }
}

/// Complete brush configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct BrushConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub history_capacity: HistoryCapacity,
}

impl BrushConfig {
    /// Parse a configuration document, e.g.
    /// `{"display": {"width": 800, "height": 600}, "history_capacity": "unbounded"}`
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.display.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DisplayConfig::default();
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.pixel_count(), 1920 * 1080);
    }

    #[test]
    fn test_parse_window_size() {
        let config = DisplayConfig::parse_window_size("1280x720").unwrap();
        assert_eq!(config, DisplayConfig::new(1280, 720));

        let config = DisplayConfig::parse_window_size(" 640 X 480 ").unwrap();
        assert_eq!((config.width, config.height), (640, 480));

        assert!(DisplayConfig::parse_window_size("1280").is_err());
        assert!(DisplayConfig::parse_window_size("axb").is_err());
        assert!(matches!(
            DisplayConfig::parse_window_size("0x720"),
            Err(ConfigError::ZeroSized { .. })
        ));
    }

    #[test]
    fn test_history_capacity_default_is_single_stroke() {
        assert_eq!(HistoryCapacity::default(), HistoryCapacity::Bounded(1));
        assert_eq!(HistoryCapacity::default().limit(), Some(1));
        assert_eq!(HistoryCapacity::Bounded(0).limit(), Some(1));
        assert_eq!(HistoryCapacity::Unbounded.limit(), None);
    }

    #[test]
    fn test_brush_config_from_json() {
        let config = BrushConfig::from_json(
            r#"{"display": {"width": 800, "height": 600}, "history_capacity": "unbounded"}"#,
        )
        .unwrap();
        assert_eq!(config.display.width, 800);
        assert_eq!(config.display.height, 600);
        assert_eq!(config.display, DisplayConfig::new(800, 600));
        assert_eq!(config.history_capacity, HistoryCapacity::Unbounded);

        let config = BrushConfig::from_json(r#"{"history_capacity": {"bounded": 3}}"#).unwrap();
        assert_eq!(config.display, DisplayConfig::default());
        assert_eq!(config.history_capacity.limit(), Some(3));

        assert!(matches!(
            BrushConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(BrushConfig::from_json(r#"{"display": {"width": 0, "height": 10}}"#).is_err());
    }
}
