#![forbid(unsafe_code)]

//! End-to-end plugin flows against an in-memory host document.

use futures::executor::block_on;
use pretty_assertions::assert_eq;
use serde_json::json;
use vizembed_core::{
    EMBED_NODE_KIND, EmbedWidth, HostElement, ListenerCommand, PointerPosition, ToolbarMode,
    build_view_url,
};
use vizembed_web::{
    CustomEntry, DeleteNode, EditorHost, EmbedPlugin, EmbedView, HostCapabilities, HostError,
    HostOutcome, InsertNode, PluginConfig, PluginRegistry, QuickAction, RegistrationError,
    ToolbarButton, UpdateNode,
};

// ============================================================================
// In-memory host
// ============================================================================

#[derive(Default)]
struct Document {
    nodes: Vec<HostElement>,
    next_uid: usize,
    calls: Vec<&'static str>,
    has_update: bool,
    reject_inserts: bool,
    reject_deletes: bool,
}

impl Document {
    fn with_update() -> Self {
        Self {
            has_update: true,
            ..Self::default()
        }
    }

    fn position(&self, node: &HostElement) -> Result<usize, HostError> {
        self.nodes
            .iter()
            .position(|candidate| candidate.uid == node.uid)
            .ok_or(HostError::NodeNotFound)
    }
}

impl InsertNode for Document {
    fn insert_node(&mut self, mut node: HostElement) -> Result<(), HostError> {
        self.calls.push("insert");
        if self.reject_inserts {
            return Err(HostError::Rejected("quota".to_owned()));
        }
        self.next_uid += 1;
        node.uid = Some(format!("n{}", self.next_uid));
        self.nodes.push(node);
        Ok(())
    }
}

impl UpdateNode for Document {
    fn update_node(&mut self, node: HostElement) -> Result<(), HostError> {
        self.calls.push("update");
        let index = self.position(&node)?;
        self.nodes[index] = node;
        Ok(())
    }
}

impl DeleteNode for Document {
    fn delete_node(&mut self, node: &HostElement) -> Result<(), HostError> {
        self.calls.push("delete");
        if self.reject_deletes {
            return Err(HostError::Rejected("locked".to_owned()));
        }
        let index = self.position(node)?;
        self.nodes.remove(index);
        Ok(())
    }
}

impl EditorHost for Document {
    fn inserter(&mut self) -> Option<&mut dyn InsertNode> {
        Some(self)
    }

    fn updater(&mut self) -> Option<&mut dyn UpdateNode> {
        if self.has_update { Some(self) } else { None }
    }

    fn deleter(&mut self) -> Option<&mut dyn DeleteNode> {
        Some(self)
    }
}

struct AcceptAll;

impl PluginRegistry for AcceptAll {
    fn register_button(&mut self, _button: ToolbarButton) -> Result<(), RegistrationError> {
        Ok(())
    }
}

struct Uninitialized;

impl PluginRegistry for Uninitialized {
    fn register_button(&mut self, _button: ToolbarButton) -> Result<(), RegistrationError> {
        Err(RegistrationError::Sdk("window.editor is undefined".to_owned()))
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn plugin() -> EmbedPlugin {
    EmbedPlugin::register(PluginConfig::default(), &mut AcceptAll).unwrap()
}

fn insert_custom(plugin: &EmbedPlugin, doc: &mut Document, entry: CustomEntry) -> HostOutcome {
    let (request, handle) = plugin.open_insert_picker();
    request.submit(entry);
    block_on(plugin.insert(doc, handle))
}

fn iframe_src(view: &EmbedView) -> &str {
    match view {
        EmbedView::Embed(embed) => &embed.iframe.src,
        EmbedView::Passthrough { .. } => panic!("expected an embed view"),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn registration_failure_leaves_plugin_absent() {
    assert!(EmbedPlugin::register(PluginConfig::default(), &mut Uninitialized).is_none());
}

#[test]
fn inserted_node_renders_viewer_url() {
    let plugin = plugin();
    let mut doc = Document::with_update();
    let mut entry = CustomEntry::new("https://tableau.example.com/", "Sales Q1", "Summary");
    entry.toolbar = "top".to_owned();
    entry.height = "640px".to_owned();

    assert_eq!(insert_custom(&plugin, &mut doc, entry), HostOutcome::Applied);
    assert_eq!(doc.nodes.len(), 1);
    let node = doc.nodes[0].clone();
    assert_eq!(node.kind, EMBED_NODE_KIND);
    assert_eq!(node.attrs["height"], json!(640));

    let widget = plugin.render(node);
    let view = widget.view(HostCapabilities::all());
    assert_eq!(
        iframe_src(&view),
        build_view_url(
            "https://tableau.example.com",
            "Sales Q1",
            "Summary",
            Some(ToolbarMode::Top)
        )
    );
    assert_eq!(
        iframe_src(&view),
        "https://tableau.example.com/views/Sales%20Q1/Summary?:embed=y&:showVizHome=no&:toolbar=top"
    );
}

#[test]
fn cancelled_insert_touches_nothing() {
    let plugin = plugin();
    let mut doc = Document::with_update();
    let (request, handle) = plugin.open_insert_picker();
    request.cancel();
    assert_eq!(block_on(plugin.insert(&mut doc, handle)), HostOutcome::Skipped);
    assert!(doc.calls.is_empty());
}

#[test]
fn incomplete_custom_entry_inserts_nothing() {
    let plugin = plugin();
    let mut doc = Document::with_update();
    let outcome = insert_custom(&plugin, &mut doc, CustomEntry::new("https://s", "", "v"));
    assert_eq!(outcome, HostOutcome::Skipped);
    assert!(doc.nodes.is_empty());
}

#[test]
fn edit_of_foreign_element_never_reaches_host() {
    let plugin = plugin();
    let mut doc = Document::with_update();
    let paragraph = HostElement {
        uid: Some("p1".to_owned()),
        kind: "paragraph".to_owned(),
        attrs: json!({}),
        children: vec![json!({ "text": "hello" })],
    };
    let (request, handle) = plugin.open_insert_picker();
    request.choose_sample(0);
    let outcome = block_on(plugin.edit(&mut doc, &paragraph, handle));
    assert_eq!(outcome, HostOutcome::Skipped);
    assert!(doc.calls.is_empty());
}

#[test]
fn edit_updates_in_place_and_keeps_foreign_attrs() {
    let plugin = plugin();
    let mut doc = Document::with_update();
    insert_custom(&plugin, &mut doc, CustomEntry::new("https://s", "wb", "v"));
    doc.nodes[0].attrs["align"] = json!("center");
    let element = doc.nodes[0].clone();

    let (request, handle) = plugin.open_edit_picker(&element).unwrap();
    let mut entry = request.prefill().clone();
    entry.view = "Detail".to_owned();
    entry.toolbar = "hidden".to_owned();
    request.submit(entry);

    let outcome = block_on(plugin.edit(&mut doc, &element, handle));
    assert_eq!(outcome, HostOutcome::Applied);
    assert_eq!(doc.calls, vec!["insert", "update"]);
    let updated = &doc.nodes[0];
    assert_eq!(updated.uid, element.uid);
    assert_eq!(updated.attrs["view"], json!("Detail"));
    assert_eq!(updated.attrs["toolbarMode"], json!("hidden"));
    assert_eq!(updated.attrs["align"], json!("center"));
}

#[test]
fn edit_without_update_replaces_node() {
    let plugin = plugin();
    let mut doc = Document::default();
    insert_custom(&plugin, &mut doc, CustomEntry::new("https://s", "wb", "v"));
    let element = doc.nodes[0].clone();

    let (request, handle) = plugin.open_edit_picker(&element).unwrap();
    let mut entry = request.prefill().clone();
    entry.workbook = "other".to_owned();
    request.submit(entry);

    let outcome = block_on(plugin.edit(&mut doc, &element, handle));
    assert_eq!(outcome, HostOutcome::Applied);
    assert_eq!(doc.calls, vec!["insert", "insert", "delete"]);
    assert_eq!(doc.nodes.len(), 1);
    assert_eq!(doc.nodes[0].attrs["workbook"], json!("other"));
    assert_ne!(doc.nodes[0].uid, element.uid);
}

#[test]
fn failed_replacement_insert_keeps_original_node() {
    let plugin = plugin();
    let mut doc = Document::default();
    insert_custom(&plugin, &mut doc, CustomEntry::new("https://s", "wb", "v"));
    doc.reject_inserts = true;
    let element = doc.nodes[0].clone();

    let (request, handle) = plugin.open_edit_picker(&element).unwrap();
    let mut entry = request.prefill().clone();
    entry.view = "other".to_owned();
    request.submit(entry);

    let outcome = block_on(plugin.edit(&mut doc, &element, handle));
    assert_eq!(
        outcome,
        HostOutcome::Failed(HostError::Rejected("quota".to_owned()))
    );
    assert_eq!(doc.calls, vec!["insert", "insert"]);
    assert_eq!(doc.nodes, vec![element]);
}

#[test]
fn failed_replacement_delete_leaves_both_nodes() {
    let plugin = plugin();
    let mut doc = Document::default();
    insert_custom(&plugin, &mut doc, CustomEntry::new("https://s", "wb", "v"));
    doc.reject_deletes = true;
    let element = doc.nodes[0].clone();

    let (request, handle) = plugin.open_edit_picker(&element).unwrap();
    let mut entry = request.prefill().clone();
    entry.view = "other".to_owned();
    request.submit(entry);

    let outcome = block_on(plugin.edit(&mut doc, &element, handle));
    assert!(matches!(outcome, HostOutcome::Failed(_)));
    assert_eq!(doc.nodes.len(), 2);
    assert_eq!(doc.nodes[0], element);
    assert_eq!(doc.nodes[1].attrs["view"], json!("other"));
}

#[test]
fn drag_then_fit_width_round_trip() {
    let plugin = plugin();
    let mut doc = Document::with_update();
    insert_custom(&plugin, &mut doc, CustomEntry::new("https://s", "wb", "v"));
    let mut widget = plugin.render(doc.nodes[0].clone());

    let down = widget
        .pointer_down(1, PointerPosition::new(0.0, 0.0), || Some(900.0))
        .unwrap();
    assert_eq!(down.listener_command, Some(ListenerCommand::Attach));
    widget
        .pointer_move(1, PointerPosition::new(-300.0, 80.0))
        .unwrap();
    let release = widget
        .pointer_up(&mut doc, 1, PointerPosition::new(-300.0, 80.0), || None)
        .unwrap();
    assert_eq!(release.resize.listener_command, Some(ListenerCommand::Detach));
    assert_eq!(release.commit, HostOutcome::Applied);
    assert_eq!(doc.nodes[0].attrs["width"], json!(600));
    assert_eq!(doc.nodes[0].attrs["height"], json!(600));

    widget.sync(doc.nodes[0].clone());
    let outcome = widget.quick_action(&mut doc, QuickAction::FitWidth);
    assert_eq!(outcome, HostOutcome::Applied);
    assert_eq!(doc.nodes[0].attrs["width"], json!("100%"));
    assert_eq!(doc.nodes[0].attrs["height"], json!(600));
    assert_eq!(widget.params().unwrap().width, EmbedWidth::FULL);
    assert_eq!(widget.teardown(), None);
}

#[test]
fn inline_embed_renders_compact_header_with_controls() {
    let plugin = plugin();
    let mut doc = Document::with_update();
    let mut entry = CustomEntry::new("https://s", "wb", "v");
    entry.inline = "true".to_owned();
    insert_custom(&plugin, &mut doc, entry);

    assert_eq!(plugin.is_inline(&doc.nodes[0]), Some(true));
    match plugin.render(doc.nodes[0].clone()).view(HostCapabilities::all()) {
        EmbedView::Embed(embed) => {
            assert!(embed.compact);
            assert!(embed.header.can_edit && embed.header.can_remove);
            assert!(embed.header.quick_actions.contains(&QuickAction::FitWidth));
        }
        EmbedView::Passthrough { .. } => panic!("expected an embed view"),
    }
}
