#![forbid(unsafe_code)]

//! Tunables for sheet animation and stacking visuals.
//!
//! Every default matches the stock sheet look: a 100 ms stagger before the
//! slide-in, 500 ms before a closed sheet is removed, a 0.12 scrim, lower
//! sheets dimmed to 90% brightness and shifted 16 px per level.
//!
//! With the `config` feature the whole [`StackConfig`] loads from TOML or
//! JSON:
//!
//! ```toml
//! [sheet]
//! enter_delay_ms = 100
//! close_delay_ms = 500
//! scrim_opacity = 0.12
//! max_width = 720
//!
//! [stacking]
//! dim_brightness = 0.9
//! peek_offset = 16
//! ```

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use std::time::Duration;

/// Default stagger between placing a sheet off-screen and sliding it in.
pub const DEFAULT_ENTER_DELAY: Duration = Duration::from_millis(100);

/// Default time between starting a close and removing the sheet.
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(500);

/// Default scrim opacity while a sheet is shown.
pub const DEFAULT_SCRIM_OPACITY: f32 = 0.12;

/// Default brightness of sheets below the active one.
pub const DEFAULT_DIM_BRIGHTNESS: f32 = 0.9;

/// Default horizontal shift, per level, of sheets below the active one.
pub const DEFAULT_PEEK_OFFSET: u32 = 16;

// ---------------------------------------------------------------------------
// SheetConfig
// ---------------------------------------------------------------------------

/// Per-sheet animation configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SheetConfig {
    /// Delay before the panel slides from off-screen to rest.
    #[cfg_attr(feature = "config", serde(rename = "enter_delay_ms", with = "millis"))]
    pub enter_delay: Duration,
    /// Delay between starting a close and removing the sheet.
    #[cfg_attr(feature = "config", serde(rename = "close_delay_ms", with = "millis"))]
    pub close_delay: Duration,
    /// Scrim opacity while shown.
    pub scrim_opacity: f32,
    /// Optional maximum panel width; bypasses the breakpoint table.
    pub max_width: Option<u32>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            enter_delay: DEFAULT_ENTER_DELAY,
            close_delay: DEFAULT_CLOSE_DELAY,
            scrim_opacity: DEFAULT_SCRIM_OPACITY,
            max_width: None,
        }
    }
}

impl SheetConfig {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with no delays (sheets slide in on the next tick and
    /// are removed as soon as time is advanced after a close).
    pub fn instant() -> Self {
        Self {
            enter_delay: Duration::ZERO,
            close_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Set the slide-in stagger.
    pub fn enter_delay(mut self, delay: Duration) -> Self {
        self.enter_delay = delay;
        self
    }

    /// Set the close-to-removal delay.
    pub fn close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
        self
    }

    /// Set the scrim opacity.
    pub fn scrim_opacity(mut self, opacity: f32) -> Self {
        self.scrim_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Set a maximum panel width.
    pub fn max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }
}

// ---------------------------------------------------------------------------
// StackingConfig
// ---------------------------------------------------------------------------

/// Visual treatment of sheets below the active one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct StackingConfig {
    /// `filter: brightness(..)` applied to lower sheets.
    pub dim_brightness: f32,
    /// Leftward shift per level below the active sheet, in pixels.
    pub peek_offset: u32,
}

impl Default for StackingConfig {
    fn default() -> Self {
        Self {
            dim_brightness: DEFAULT_DIM_BRIGHTNESS,
            peek_offset: DEFAULT_PEEK_OFFSET,
        }
    }
}

impl StackingConfig {
    /// Set the dim brightness.
    pub fn dim_brightness(mut self, brightness: f32) -> Self {
        self.dim_brightness = brightness;
        self
    }

    /// Set the per-level peek offset.
    pub fn peek_offset(mut self, offset: u32) -> Self {
        self.peek_offset = offset;
        self
    }
}

// ---------------------------------------------------------------------------
// StackConfig
// ---------------------------------------------------------------------------

/// Full configuration of a sheet stack.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct StackConfig {
    /// Applied to every sheet the stack opens.
    pub sheet: SheetConfig,
    /// Applied across the stack.
    pub stacking: StackingConfig,
}

impl StackConfig {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the sheet configuration.
    pub fn with_sheet(mut self, sheet: SheetConfig) -> Self {
        self.sheet = sheet;
        self
    }

    /// Replace the stacking configuration.
    pub fn with_stacking(mut self, stacking: StackingConfig) -> Self {
        self.stacking = stacking;
        self
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check every parameter is in range.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let scrim = self.sheet.scrim_opacity;
        if !(0.0..=1.0).contains(&scrim) {
            errors.push(format!("sheet.scrim_opacity must be in [0, 1], got {scrim}"));
        }
        if scrim == 0.0 {
            errors.push("sheet.scrim_opacity must be > 0 for the scrim to show".into());
        }

        // Lower sheets must stay visibly dimmed and shifted.
        let brightness = self.stacking.dim_brightness;
        if !(brightness > 0.0 && brightness < 1.0) {
            errors.push(format!(
                "stacking.dim_brightness must be in (0, 1), got {brightness}"
            ));
        }
        if self.stacking.peek_offset == 0 {
            errors.push("stacking.peek_offset must be > 0".into());
        }

        if self.sheet.max_width == Some(0) {
            errors.push("sheet.max_width must be > 0 when set".into());
        }

        errors
    }

    #[cfg(feature = "config")]
    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors loading a [`StackConfig`].
#[cfg(feature = "config")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parse error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Parsed but out of range.
    #[error("invalid stack config: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(feature = "config")]
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
        s.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
