#![forbid(unsafe_code)]

//! Embed parameters and attribute decoding.
//!
//! The host stores node attributes as an untyped JSON object. They are
//! decoded exactly once per read by [`EmbedParameters::from_attrs`], which
//! applies every fallback, so render and commit paths only ever see values
//! that satisfy the size invariants.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::config::SizePolicy;
use crate::size::{EmbedSize, EmbedWidth, height_from_value};
use crate::url::build_view_url;

const OWNED_KEYS: &[&str] = &[
    "server",
    "workbook",
    "view",
    "width",
    "height",
    "toolbarMode",
    "toolbar",
    "inline",
    "label",
];

/// Placement of the viewer toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolbarMode {
    #[default]
    Bottom,
    Top,
    Hidden,
}

impl ToolbarMode {
    pub const ALL: [Self; 3] = [Self::Bottom, Self::Top, Self::Hidden];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bottom => "bottom",
            Self::Top => "top",
            Self::Hidden => "hidden",
        }
    }

    /// Case-insensitive parse of a toolbar name.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(text))
    }
}

impl fmt::Display for ToolbarMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of one embedded view, as persisted in node attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedParameters {
    pub server: String,
    pub workbook: String,
    pub view: String,
    pub width: EmbedWidth,
    pub height: u32,
    #[serde(rename = "toolbarMode")]
    pub toolbar: ToolbarMode,
    pub inline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl EmbedParameters {
    /// Parameters for a view with the default policy's size and the
    /// default toolbar.
    pub fn new(
        server: impl Into<String>,
        workbook: impl Into<String>,
        view: impl Into<String>,
    ) -> Self {
        Self::with_policy(server, workbook, view, &SizePolicy::default())
    }

    /// Parameters for a view sized by `policy`.
    pub fn with_policy(
        server: impl Into<String>,
        workbook: impl Into<String>,
        view: impl Into<String>,
        policy: &SizePolicy,
    ) -> Self {
        let size = policy.default_size();
        Self {
            server: server.into(),
            workbook: workbook.into(),
            view: view.into(),
            width: size.width,
            height: size.height,
            toolbar: ToolbarMode::default(),
            inline: false,
            label: None,
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: EmbedWidth) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_toolbar(mut self, toolbar: ToolbarMode) -> Self {
        self.toolbar = toolbar;
        self
    }

    #[must_use]
    pub fn with_inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = (!label.trim().is_empty()).then_some(label);
        self
    }

    /// Decode a host attribute bag, applying every fallback.
    ///
    /// Missing or malformed fields never fail: width falls back to `100%`,
    /// height to the policy default, toolbar to `bottom`, inline to `false`.
    #[must_use]
    pub fn from_attrs(attrs: &Value, policy: &SizePolicy) -> Self {
        let empty = Map::new();
        let map = attrs.as_object().unwrap_or(&empty);
        let text = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default()
                .to_owned()
        };

        let width = map
            .get("width")
            .and_then(|value| EmbedWidth::from_value(value, policy))
            .unwrap_or(EmbedWidth::FULL);
        let height = map
            .get("height")
            .map(|value| height_from_value(value, policy))
            .unwrap_or(policy.default_height);
        let toolbar = map
            .get("toolbarMode")
            .or_else(|| map.get("toolbar"))
            .and_then(Value::as_str)
            .and_then(ToolbarMode::parse)
            .unwrap_or_default();
        let inline = match map.get("inline") {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => flag.trim().eq_ignore_ascii_case("true"),
            _ => false,
        };
        let label = Some(text("label")).filter(|label| !label.is_empty());

        Self {
            server: text("server"),
            workbook: text("workbook"),
            view: text("view"),
            width,
            height,
            toolbar,
            inline,
            label,
        }
    }

    /// Encode as a host attribute bag.
    #[must_use]
    pub fn to_attrs(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Write these parameters over an existing attribute bag.
    ///
    /// Keys this plugin does not own are preserved; owned keys absent from
    /// `self` (a cleared label, the legacy `toolbar` key) are removed.
    #[must_use]
    pub fn merge_into(&self, attrs: &Value) -> Value {
        let mut merged = attrs.as_object().cloned().unwrap_or_default();
        for key in OWNED_KEYS {
            merged.remove(*key);
        }
        if let Value::Object(own) = self.to_attrs() {
            merged.extend(own);
        }
        Value::Object(merged)
    }

    #[must_use]
    pub fn size(&self) -> EmbedSize {
        EmbedSize {
            width: self.width,
            height: self.height,
        }
    }

    pub fn set_size(&mut self, size: EmbedSize, policy: &SizePolicy) {
        let size = size.clamped(policy);
        self.width = size.width;
        self.height = size.height;
    }

    /// Label shown in the embed header.
    #[must_use]
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("{} / {}", self.workbook, self.view),
        }
    }

    /// Viewer URL for these parameters.
    #[must_use]
    pub fn view_url(&self) -> String {
        build_view_url(&self.server, &self.workbook, &self.view, Some(self.toolbar))
    }
}

impl<'de> Deserialize<'de> for EmbedParameters {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let attrs = Value::deserialize(deserializer)?;
        Ok(Self::from_attrs(&attrs, &SizePolicy::default()))
    }
}
