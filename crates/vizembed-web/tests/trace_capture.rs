#![forbid(unsafe_code)]
#![cfg(feature = "tracing")]

//! Span and event capture for the drag/commit path and registration.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use vizembed_core::{EmbedNode, EmbedParameters, HostElement, PointerPosition};
use vizembed_web::{
    EditorHost, EmbedPlugin, HostError, PluginConfig, PluginRegistry, RegistrationError,
    ToolbarButton, UpdateNode,
};

// ============================================================================
// Tracing capture infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
}

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    fields: HashMap<String, String>,
}

struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl SpanCapture {
    fn new() -> (Self, CaptureHandle) {
        let spans = Arc::new(Mutex::new(Vec::new()));
        let events = Arc::new(Mutex::new(Vec::new()));
        let handle = CaptureHandle {
            spans: spans.clone(),
            events: events.clone(),
        };
        (Self { spans, events }, handle)
    }
}

struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureHandle {
    fn spans_named(&self, name: &str) -> Vec<CapturedSpan> {
        self.spans
            .lock()
            .unwrap()
            .iter()
            .filter(|span| span.name == name)
            .cloned()
            .collect()
    }

    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }

    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_tracing<F, R>(f: F) -> (R, CaptureHandle)
where
    F: FnOnce() -> R,
{
    let (layer, handle) = SpanCapture::new();
    let subscriber = tracing_subscriber::registry().with(layer);
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, handle)
}

// ============================================================================
// Helpers
// ============================================================================

#[derive(Default)]
struct UpdateOnly {
    updates: Vec<HostElement>,
}

impl UpdateNode for UpdateOnly {
    fn update_node(&mut self, node: HostElement) -> Result<(), HostError> {
        self.updates.push(node);
        Ok(())
    }
}

impl EditorHost for UpdateOnly {
    fn updater(&mut self) -> Option<&mut dyn UpdateNode> {
        Some(self)
    }
}

struct Rejecting;

impl PluginRegistry for Rejecting {
    fn register_button(&mut self, button: ToolbarButton) -> Result<(), RegistrationError> {
        Err(RegistrationError::DuplicateElementType(
            button.element_type.join(","),
        ))
    }
}

fn embed_element() -> HostElement {
    let mut element = EmbedNode::new(EmbedParameters::new("https://s", "wb", "v")).to_element();
    element.uid = Some("n7".to_owned());
    element
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn drag_emits_dispatch_spans_and_one_commit_span() {
    let plugin = EmbedPlugin::new(PluginConfig::default()).unwrap();
    let mut host = UpdateOnly::default();

    let (_, capture) = with_captured_tracing(|| {
        let mut widget = plugin.render(embed_element());
        widget.pointer_down(3, PointerPosition::new(0.0, 0.0), || Some(1000.0));
        widget.pointer_move(3, PointerPosition::new(-100.0, 0.0));
        widget.pointer_up(&mut host, 3, PointerPosition::new(-100.0, 0.0), || Some(700.0));
    });

    let dispatches = capture.spans_named("resize.dispatch");
    let phases: Vec<&str> = dispatches
        .iter()
        .map(|span| span.fields["phase"].as_str())
        .collect();
    assert_eq!(phases, vec!["PointerDown", "PointerMove", "PointerUp"]);
    assert_eq!(dispatches[0].fields["pointer_id"], "3");

    let commits = capture.spans_named("embed.commit");
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].fields["uid"], "n7");
    assert_eq!(commits[0].fields["width"], "700");
    assert_eq!(host.updates.len(), 1);
    assert_eq!(host.updates[0].attrs["width"], json!(700));
}

#[test]
fn host_without_update_logs_nothing_and_stays_unchanged() {
    struct ReadOnly;
    impl EditorHost for ReadOnly {}

    let plugin = EmbedPlugin::new(PluginConfig::default()).unwrap();
    let (params, capture) = with_captured_tracing(|| {
        let mut widget = plugin.render(embed_element());
        widget.height_input("640");
        widget.height_blur(&mut ReadOnly);
        widget.params().cloned()
    });
    assert_eq!(params.unwrap().height, 520);
    assert!(capture.events().iter().all(|e| e.level != tracing::Level::WARN));
}

#[test]
fn registration_failure_is_logged_as_warning() {
    let (plugin, capture) =
        with_captured_tracing(|| EmbedPlugin::register(PluginConfig::default(), &mut Rejecting));
    assert!(plugin.is_none());
    let warnings: Vec<CapturedEvent> = capture
        .events()
        .into_iter()
        .filter(|event| event.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].fields["error"],
        "element type already registered: tableau_embed"
    );
}
