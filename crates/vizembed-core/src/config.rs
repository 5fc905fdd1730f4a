#![forbid(unsafe_code)]

//! Sizing policy shared by attribute decoding, field commits and drag resizing.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::size::{EmbedSize, EmbedWidth};

/// Smallest committed pixel width.
pub const MIN_WIDTH: u32 = 240;
/// Smallest committed pixel height.
pub const MIN_HEIGHT: u32 = 200;
/// Height used when the stored or typed height is not a number.
pub const DEFAULT_HEIGHT: u32 = 520;
/// Container width assumed when a percentage width cannot be measured.
pub const FALLBACK_CONTAINER_WIDTH: u32 = 800;

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A minimum dimension was zero.
    InvalidMinimum { field: &'static str, value: u32 },
    /// The default height is below the minimum height.
    DefaultBelowMinimum { default_height: u32, min_height: u32 },
    /// A height preset is below the minimum height.
    InvalidPreset { height: u32, min_height: u32 },
    /// Malformed configuration document.
    Json(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMinimum { field, value } => {
                write!(f, "invalid {field} value {value} (must be > 0)")
            }
            Self::DefaultBelowMinimum {
                default_height,
                min_height,
            } => write!(
                f,
                "default height {default_height} is below minimum height {min_height}"
            ),
            Self::InvalidPreset { height, min_height } => write!(
                f,
                "height preset {height} is below minimum height {min_height}"
            ),
            Self::Json(msg) => write!(f, "config parse error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Size bounds and fallbacks applied on every decode and commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SizePolicy {
    pub min_width: u32,
    pub min_height: u32,
    pub default_height: u32,
    pub fallback_container_width: u32,
}

impl Default for SizePolicy {
    fn default() -> Self {
        Self {
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
            default_height: DEFAULT_HEIGHT,
            fallback_container_width: FALLBACK_CONTAINER_WIDTH,
        }
    }
}

impl SizePolicy {
    /// Check the policy bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_width == 0 {
            return Err(ConfigError::InvalidMinimum {
                field: "min_width",
                value: self.min_width,
            });
        }
        if self.min_height == 0 {
            return Err(ConfigError::InvalidMinimum {
                field: "min_height",
                value: self.min_height,
            });
        }
        if self.fallback_container_width == 0 {
            return Err(ConfigError::InvalidMinimum {
                field: "fallback_container_width",
                value: self.fallback_container_width,
            });
        }
        if self.default_height < self.min_height {
            return Err(ConfigError::DefaultBelowMinimum {
                default_height: self.default_height,
                min_height: self.min_height,
            });
        }
        Ok(())
    }

    /// Size of a freshly inserted embed: full width, default height.
    #[must_use]
    pub const fn default_size(&self) -> EmbedSize {
        EmbedSize {
            width: EmbedWidth::FULL,
            height: self.default_height,
        }
    }

    /// Round a pixel width and raise it to the minimum width.
    #[must_use]
    pub fn clamp_width(&self, px: f64) -> u32 {
        clamp_px(px, self.min_width)
    }

    /// Round a pixel height and raise it to the minimum height.
    #[must_use]
    pub fn clamp_height(&self, px: f64) -> u32 {
        clamp_px(px, self.min_height)
    }
}

// `as` saturates for out-of-range floats; NaN has no meaningful size.
fn clamp_px(px: f64, min: u32) -> u32 {
    if px.is_nan() {
        return min;
    }
    (px.round() as u32).max(min)
}
