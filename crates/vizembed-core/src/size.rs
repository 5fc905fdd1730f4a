#![forbid(unsafe_code)]

//! Embed dimensions.
//!
//! Width is either a pixel count or a percentage of the containing block;
//! height is always pixels. Every constructor that accepts untrusted input
//! (host attributes, typed field text) clamps through a [`SizePolicy`], so a
//! value of these types always satisfies the size invariants.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SizePolicy;

/// Errors from parsing a percentage width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PercentError {
    /// Text does not end in `%`.
    MissingSuffix,
    /// Numeric prefix is not a finite number.
    InvalidNumber(String),
    /// Percentage is zero or negative.
    OutOfRange,
}

impl fmt::Display for PercentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSuffix => write!(f, "percentage must end in '%'"),
            Self::InvalidNumber(text) => write!(f, "invalid percentage: {text}"),
            Self::OutOfRange => write!(f, "percentage must be greater than zero"),
        }
    }
}

impl std::error::Error for PercentError {}

/// A positive percentage of the container width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Percent(f64);

impl Percent {
    /// `100%`.
    pub const FULL: Self = Self(100.0);

    pub fn new(value: f64) -> Result<Self, PercentError> {
        if !value.is_finite() {
            return Err(PercentError::InvalidNumber(value.to_string()));
        }
        if value <= 0.0 {
            return Err(PercentError::OutOfRange);
        }
        Ok(Self(value))
    }

    /// Parse text such as `"100%"` or `" 62.5 % "`.
    pub fn parse(text: &str) -> Result<Self, PercentError> {
        let number = text
            .trim()
            .strip_suffix('%')
            .ok_or(PercentError::MissingSuffix)?;
        let value = number
            .trim()
            .parse::<f64>()
            .map_err(|_| PercentError::InvalidNumber(text.trim().to_owned()))?;
        Self::new(value)
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Resolve against a container width in pixels.
    #[must_use]
    pub fn of(self, container_px: f64) -> f64 {
        container_px * self.0 / 100.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<String> for Percent {
    type Error = PercentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Percent> for String {
    fn from(value: Percent) -> Self {
        value.to_string()
    }
}

/// Committed embed width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbedWidth {
    Pixels(u32),
    Percent(Percent),
}

impl Default for EmbedWidth {
    fn default() -> Self {
        Self::FULL
    }
}

impl EmbedWidth {
    /// Fill the container.
    pub const FULL: Self = Self::Percent(Percent::FULL);

    /// Parse typed or stored width text.
    ///
    /// Text ending in `%` is a percentage; anything else must be a number,
    /// optionally suffixed with `px`. Pixel widths are clamped.
    #[must_use]
    pub fn parse(text: &str, policy: &SizePolicy) -> Option<Self> {
        let text = text.trim();
        if text.ends_with('%') {
            return Percent::parse(text).ok().map(Self::Percent);
        }
        parse_pixels(text).map(|px| Self::Pixels(policy.clamp_width(px)))
    }

    /// Decode a width attribute (JSON number or string).
    #[must_use]
    pub fn from_value(value: &Value, policy: &SizePolicy) -> Option<Self> {
        match value {
            Value::Number(number) => number
                .as_f64()
                .filter(|px| px.is_finite())
                .map(|px| Self::Pixels(policy.clamp_width(px))),
            Value::String(text) => Self::parse(text, policy),
            _ => None,
        }
    }

    /// Re-apply the policy minimum to pixel widths.
    #[must_use]
    pub fn clamped(self, policy: &SizePolicy) -> Self {
        match self {
            Self::Pixels(px) => Self::Pixels(px.max(policy.min_width)),
            Self::Percent(_) => self,
        }
    }

    #[must_use]
    pub const fn is_percent(self) -> bool {
        matches!(self, Self::Percent(_))
    }

    #[must_use]
    pub const fn pixels(self) -> Option<u32> {
        match self {
            Self::Pixels(px) => Some(px),
            Self::Percent(_) => None,
        }
    }

    /// CSS length for the rendered container.
    #[must_use]
    pub fn css(self) -> String {
        match self {
            Self::Pixels(px) => format!("{px}px"),
            Self::Percent(pct) => pct.to_string(),
        }
    }
}

impl fmt::Display for EmbedWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{px}"),
            Self::Percent(pct) => write!(f, "{pct}"),
        }
    }
}

/// Resolve height field text. Non-numeric input yields the default height.
#[must_use]
pub fn height_from_text(text: &str, policy: &SizePolicy) -> u32 {
    parse_pixels(text)
        .map(|px| policy.clamp_height(px))
        .unwrap_or(policy.default_height)
}

/// Decode a height attribute (JSON number or numeric string).
#[must_use]
pub fn height_from_value(value: &Value, policy: &SizePolicy) -> u32 {
    match value {
        Value::Number(number) => number
            .as_f64()
            .filter(|px| px.is_finite())
            .map(|px| policy.clamp_height(px))
            .unwrap_or(policy.default_height),
        Value::String(text) => height_from_text(text, policy),
        _ => policy.default_height,
    }
}

fn parse_pixels(text: &str) -> Option<f64> {
    let text = text.trim();
    let number = text.strip_suffix("px").unwrap_or(text).trim();
    number.parse::<f64>().ok().filter(|px| px.is_finite())
}

/// Committed width and height of one embed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbedSize {
    pub width: EmbedWidth,
    pub height: u32,
}

impl Default for EmbedSize {
    fn default() -> Self {
        SizePolicy::default().default_size()
    }
}

impl EmbedSize {
    #[must_use]
    pub fn clamped(self, policy: &SizePolicy) -> Self {
        Self {
            width: self.width.clamped(policy),
            height: self.height.max(policy.min_height),
        }
    }
}
