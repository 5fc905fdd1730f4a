#![forbid(unsafe_code)]

//! Host document elements and the embed node shape.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::SizePolicy;
use crate::params::EmbedParameters;

/// Node kind registered by the embed plugin.
pub const EMBED_NODE_KIND: &str = "tableau_embed";

/// One element of the host document tree, as handed to the plugin.
///
/// Attributes and children are kept untyped; only elements of kind
/// [`EMBED_NODE_KIND`] are decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostElement {
    /// Host-assigned identity, if the host tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub kind: String,
    #[serde(default)]
    pub attrs: Value,
    #[serde(default)]
    pub children: Vec<Value>,
}

impl HostElement {
    #[must_use]
    pub fn is_embed(&self) -> bool {
        self.kind == EMBED_NODE_KIND
    }

    /// Decode as an embed node, or `None` for any other element kind.
    #[must_use]
    pub fn to_embed(&self, policy: &SizePolicy) -> Option<EmbedNode> {
        self.is_embed().then(|| EmbedNode {
            uid: self.uid.clone(),
            attrs: EmbedParameters::from_attrs(&self.attrs, policy),
        })
    }
}

/// A decoded embed node.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedNode {
    pub uid: Option<String>,
    pub attrs: EmbedParameters,
}

impl EmbedNode {
    /// A fresh node, not yet known to the host.
    #[must_use]
    pub fn new(attrs: EmbedParameters) -> Self {
        Self { uid: None, attrs }
    }

    /// Element shape persisted by the host. The single empty text leaf is a
    /// schema placeholder and is never rendered.
    #[must_use]
    pub fn to_element(&self) -> HostElement {
        HostElement {
            uid: self.uid.clone(),
            kind: EMBED_NODE_KIND.to_owned(),
            attrs: self.attrs.to_attrs(),
            children: vec![json!({ "text": "" })],
        }
    }
}
