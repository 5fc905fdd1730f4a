#![forbid(unsafe_code)]

//! Host editor capability interface.
//!
//! The host SDK exposes node mutation callbacks that may or may not exist
//! depending on where the plugin is mounted. Each callback is a separate
//! trait, and [`EditorHost`] hands out an `Option` for each one, so a
//! missing capability is an explicit `None` branch at the call site.

use core::fmt;

use bitflags::bitflags;
use vizembed_core::HostElement;

bitflags! {
    /// Capabilities advertised by a host.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HostCapabilities: u8 {
        const INSERT = 1 << 0;
        const UPDATE = 1 << 1;
        const DELETE = 1 << 2;
        const EDIT = 1 << 3;
    }
}

/// Failure reported by a host callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The host no longer holds the node.
    NodeNotFound,
    /// The host refused the operation.
    Rejected(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound => write!(f, "node not found in host document"),
            Self::Rejected(msg) => write!(f, "host rejected operation: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}

pub trait InsertNode {
    fn insert_node(&mut self, node: HostElement) -> Result<(), HostError>;
}

pub trait UpdateNode {
    /// Replace the attributes of the node identified by `node`.
    fn update_node(&mut self, node: HostElement) -> Result<(), HostError>;
}

pub trait DeleteNode {
    fn delete_node(&mut self, node: &HostElement) -> Result<(), HostError>;
}

pub trait OpenEditor {
    /// Open the plugin's editor UI for `node`.
    fn open_editor(&mut self, node: &HostElement) -> Result<(), HostError>;
}

/// Host editor SDK as seen by the plugin.
///
/// Every accessor defaults to `None`; hosts override the ones they support.
pub trait EditorHost {
    fn inserter(&mut self) -> Option<&mut dyn InsertNode> {
        None
    }

    fn updater(&mut self) -> Option<&mut dyn UpdateNode> {
        None
    }

    fn deleter(&mut self) -> Option<&mut dyn DeleteNode> {
        None
    }

    fn editor(&mut self) -> Option<&mut dyn OpenEditor> {
        None
    }

    fn capabilities(&mut self) -> HostCapabilities {
        let mut caps = HostCapabilities::empty();
        caps.set(HostCapabilities::INSERT, self.inserter().is_some());
        caps.set(HostCapabilities::UPDATE, self.updater().is_some());
        caps.set(HostCapabilities::DELETE, self.deleter().is_some());
        caps.set(HostCapabilities::EDIT, self.editor().is_some());
        caps
    }
}

/// Result of relaying one action to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOutcome {
    Applied,
    /// Nothing to do: foreign node, cancelled picker or no staged commit.
    Skipped,
    /// The host lacks the capability; nothing changed.
    Unsupported(HostCapabilities),
    Failed(HostError),
}

impl HostOutcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

impl From<Result<(), HostError>> for HostOutcome {
    fn from(result: Result<(), HostError>) -> Self {
        match result {
            Ok(()) => Self::Applied,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "host callback failed");
                Self::Failed(err)
            }
        }
    }
}

pub fn insert_node<H: EditorHost + ?Sized>(host: &mut H, node: HostElement) -> HostOutcome {
    match host.inserter() {
        Some(inserter) => inserter.insert_node(node).into(),
        None => HostOutcome::Unsupported(HostCapabilities::INSERT),
    }
}

pub fn update_node<H: EditorHost + ?Sized>(host: &mut H, node: HostElement) -> HostOutcome {
    match host.updater() {
        Some(updater) => updater.update_node(node).into(),
        None => HostOutcome::Unsupported(HostCapabilities::UPDATE),
    }
}

pub fn delete_node<H: EditorHost + ?Sized>(host: &mut H, node: &HostElement) -> HostOutcome {
    match host.deleter() {
        Some(deleter) => deleter.delete_node(node).into(),
        None => HostOutcome::Unsupported(HostCapabilities::DELETE),
    }
}

pub fn open_editor<H: EditorHost + ?Sized>(host: &mut H, node: &HostElement) -> HostOutcome {
    match host.editor() {
        Some(editor) => editor.open_editor(node).into(),
        None => HostOutcome::Unsupported(HostCapabilities::EDIT),
    }
}
