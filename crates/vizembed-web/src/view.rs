#![forbid(unsafe_code)]

//! Render output for embed nodes.
//!
//! The widget produces an [`EmbedView`]; the host paints it with its own UI
//! toolkit, or uses [`IframeSpec::to_html`] when it paints markup.

use serde_json::Value;
use vizembed_core::EmbedWidth;

/// Rendered form of one host element.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbedView {
    /// Not an embed node: the element's children, unchanged.
    Passthrough { children: Vec<Value> },
    Embed(EmbedWidgetView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedWidgetView {
    pub header: HeaderView,
    pub iframe: IframeSpec,
    pub dragging: bool,
    /// Inline embeds: the host draws the header in its compact form.
    pub compact: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub label: String,
    pub width_field: String,
    pub height_field: String,
    pub quick_actions: Vec<QuickAction>,
    pub can_edit: bool,
    pub can_remove: bool,
}

/// One-click size buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    FitWidth,
    Height(u32),
}

impl QuickAction {
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::FitWidth => "Fit width".to_owned(),
            Self::Height(height) => format!("{height}px"),
        }
    }
}

/// The embedded viewer frame.
///
/// No `sandbox` attribute is ever emitted: the viewer performs its own
/// sign-in and embedding handshake, which sandboxing breaks.
#[derive(Debug, Clone, PartialEq)]
pub struct IframeSpec {
    pub src: String,
    pub title: String,
    pub width: EmbedWidth,
    pub height: u32,
}

impl IframeSpec {
    #[must_use]
    pub fn to_html(&self) -> String {
        format!(
            r#"<iframe src="{}" title="{}" style="width: {}; height: {}px; border: 0;" frameborder="0" loading="lazy" allowfullscreen></iframe>"#,
            htmlize::escape_attribute(self.src.as_str()),
            htmlize::escape_attribute(self.title.as_str()),
            self.width.css(),
            self.height,
        )
    }
}
