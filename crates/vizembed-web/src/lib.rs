#![forbid(unsafe_code)]

//! Host-editor bindings for the Tableau embed plugin.
//!
//! # Role in the embed plugin
//! `vizembed-web` is the layer the host editor SDK talks to. It registers
//! the toolbar button, runs the insert/edit flows through the parameter
//! picker, and renders each `tableau_embed` node as an [`EmbedWidget`]
//! whose size changes are written back through the host's node callbacks.
//!
//! Host callbacks are optional; see [`host::EditorHost`]. A host that lacks
//! one simply does not get the corresponding action.

pub mod config;
pub mod host;
pub mod picker;
pub mod plugin;
pub mod view;
pub mod widget;

pub use config::PluginConfig;
pub use host::{
    DeleteNode, EditorHost, HostCapabilities, HostError, HostOutcome, InsertNode, OpenEditor,
    UpdateNode,
};
pub use picker::{
    CancelReason, CustomEntry, ParameterPicker, PickerChoice, PickerHandle, PickerMode,
    PickerOutcome, PickerReply, PickerRequest, SampleView,
};
pub use plugin::{EmbedPlugin, PluginRegistry, RegistrationError, ToolbarButton, ToolbarDisplay};
pub use view::{EmbedView, EmbedWidgetView, HeaderView, IframeSpec, QuickAction};
pub use widget::{EmbedWidget, ReleaseDispatch};
