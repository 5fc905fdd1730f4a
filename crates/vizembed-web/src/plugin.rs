#![forbid(unsafe_code)]

//! Plugin registration and the insert/edit flows.

use core::fmt;

use serde::Serialize;
use vizembed_core::{ConfigError, EMBED_NODE_KIND, EmbedNode, HostElement};

use crate::config::PluginConfig;
use crate::host::{self, EditorHost, HostCapabilities, HostOutcome};
use crate::picker::{ParameterPicker, PickerHandle, PickerOutcome, PickerRequest};
use crate::widget::EmbedWidget;

/// Where the host shows the toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolbarDisplay {
    Toolbar,
    HoveringToolbar,
}

/// Toolbar button descriptor handed to the host SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarButton {
    pub title: String,
    pub icon: String,
    pub display: Vec<ToolbarDisplay>,
    pub element_type: Vec<String>,
}

/// Registration failures reported by the host SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The SDK failed to initialize.
    Sdk(String),
    /// Another plugin already owns the element type.
    DuplicateElementType(String),
    Config(ConfigError),
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sdk(msg) => write!(f, "editor SDK unavailable: {msg}"),
            Self::DuplicateElementType(kind) => {
                write!(f, "element type already registered: {kind}")
            }
            Self::Config(err) => write!(f, "invalid plugin config: {err}"),
        }
    }
}

impl std::error::Error for RegistrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for RegistrationError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Host SDK registration surface.
pub trait PluginRegistry {
    fn register_button(&mut self, button: ToolbarButton) -> Result<(), RegistrationError>;
}

/// The registered embed plugin.
#[derive(Debug, Clone)]
pub struct EmbedPlugin {
    config: PluginConfig,
    picker: ParameterPicker,
}

impl EmbedPlugin {
    pub fn new(config: PluginConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let picker = ParameterPicker::new(&config);
        Ok(Self { config, picker })
    }

    /// Register against the host SDK.
    ///
    /// Any failure is logged and yields `None`; the host then treats the
    /// plugin as absent.
    pub fn register<R: PluginRegistry + ?Sized>(
        config: PluginConfig,
        registry: &mut R,
    ) -> Option<Self> {
        match Self::try_register(config, registry) {
            Ok(plugin) => {
                #[cfg(feature = "tracing")]
                tracing::info!(kind = EMBED_NODE_KIND, "embed plugin registered");
                Some(plugin)
            }
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "embed plugin registration failed");
                None
            }
        }
    }

    fn try_register<R: PluginRegistry + ?Sized>(
        config: PluginConfig,
        registry: &mut R,
    ) -> Result<Self, RegistrationError> {
        let plugin = Self::new(config)?;
        registry.register_button(plugin.button())?;
        Ok(plugin)
    }

    #[must_use]
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    #[must_use]
    pub fn button(&self) -> ToolbarButton {
        ToolbarButton {
            title: self.config.title.clone(),
            icon: self.config.icon.clone(),
            display: vec![ToolbarDisplay::Toolbar, ToolbarDisplay::HoveringToolbar],
            element_type: vec![EMBED_NODE_KIND.to_owned()],
        }
    }

    /// `isInline` override: the node's `inline` attribute for embed
    /// elements, `None` (defer to the host) for anything else.
    #[must_use]
    pub fn is_inline(&self, element: &HostElement) -> Option<bool> {
        element
            .to_embed(&self.config.sizing)
            .map(|node| node.attrs.inline)
    }

    /// Create the widget for one mounted element.
    #[must_use]
    pub fn render(&self, element: HostElement) -> EmbedWidget {
        EmbedWidget::new(element, &self.config)
    }

    /// Picker interaction for the toolbar insert action.
    #[must_use]
    pub fn open_insert_picker(&self) -> (PickerRequest, PickerHandle) {
        self.picker.open(None)
    }

    /// Picker interaction pre-filled from `element`; `None` for foreign
    /// elements.
    #[must_use]
    pub fn open_edit_picker(&self, element: &HostElement) -> Option<(PickerRequest, PickerHandle)> {
        let node = element.to_embed(&self.config.sizing)?;
        Some(self.picker.open(Some(&node.attrs)))
    }

    /// Insert a new embed node once the picker answers. Cancel inserts
    /// nothing.
    pub async fn insert<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
        picked: PickerHandle,
    ) -> HostOutcome {
        let PickerOutcome::Picked(params) = picked.await else {
            return HostOutcome::Skipped;
        };
        host::insert_node(host, EmbedNode::new(params).to_element())
    }

    /// Update `element` with the picker's answer.
    ///
    /// Hosts without an update callback get the node replaced when they
    /// support both insert and delete: the new node is inserted first and
    /// the old one deleted only after that succeeds. Foreign elements and
    /// cancelled pickers never reach the host.
    pub async fn edit<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
        element: &HostElement,
        picked: PickerHandle,
    ) -> HostOutcome {
        if !element.is_embed() {
            return HostOutcome::Skipped;
        }
        let PickerOutcome::Picked(params) = picked.await else {
            return HostOutcome::Skipped;
        };

        let mut updated = element.clone();
        updated.attrs = params.merge_into(&element.attrs);

        let caps = host.capabilities();
        if caps.contains(HostCapabilities::UPDATE) {
            return host::update_node(host, updated);
        }
        if caps.contains(HostCapabilities::DELETE | HostCapabilities::INSERT) {
            updated.uid = None;
            let outcome = host::insert_node(host, updated);
            if !outcome.is_applied() {
                return outcome;
            }
            return host::delete_node(host, element);
        }
        HostOutcome::Unsupported(HostCapabilities::UPDATE)
    }
}
