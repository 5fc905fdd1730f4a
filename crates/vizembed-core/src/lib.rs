#![forbid(unsafe_code)]

//! Core: embed parameters, viewer URLs and drag-resize state.
//!
//! # Role in the embed plugin
//! `vizembed-core` holds everything that does not touch the host editor:
//! the strongly typed [`EmbedParameters`] decoded from node attributes, the
//! viewer [`build_view_url`] function, and the per-instance
//! [`ResizeController`]. `vizembed-web` binds these to the host SDK.

pub mod config;
pub mod node;
pub mod params;
pub mod resize;
pub mod size;
pub mod url;

pub use config::{ConfigError, SizePolicy};
pub use node::{EMBED_NODE_KIND, EmbedNode, HostElement};
pub use params::{EmbedParameters, ToolbarMode};
pub use resize::{
    ListenerCommand, LiveSize, PointerPosition, ResizeCommit, ResizeController, ResizeDispatch,
    ResizeIgnoredReason, ResizeLifecyclePhase, ResizeLogOutcome, ResizeState,
};
pub use size::{EmbedSize, EmbedWidth, Percent, PercentError};
pub use url::build_view_url;
