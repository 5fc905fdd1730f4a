#![forbid(unsafe_code)]

//! Embed widget: renders one host element and relays its controls.
//!
//! A widget instance lives as long as the host keeps the element mounted.
//! It decodes the element's attributes once per [`EmbedWidget::sync`],
//! keeps the width/height field text as local state, and owns the
//! instance's [`ResizeController`]. Every size change, whether from a drag,
//! a field blur or a quick action, is staged on the controller and written
//! back through the same commit path.
//!
//! Width/height fields show the committed size until the author types; a
//! typed value stays local until blur. Starting a drag discards any
//! uncommitted field text, so the drag baseline is always the committed
//! size.

use vizembed_core::size::height_from_text;
use vizembed_core::{
    EmbedParameters, EmbedWidth, HostElement, ListenerCommand, PointerPosition, ResizeCommit,
    ResizeController, ResizeDispatch, SizePolicy,
};

use crate::config::PluginConfig;
use crate::host::{self, EditorHost, HostCapabilities, HostOutcome};
use crate::view::{EmbedView, EmbedWidgetView, HeaderView, IframeSpec, QuickAction};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FieldState {
    text: String,
    dirty: bool,
}

impl FieldState {
    fn committed(text: String) -> Self {
        Self { text, dirty: false }
    }
}

/// Pointer release result: the controller dispatch plus the commit outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseDispatch {
    pub resize: ResizeDispatch,
    pub commit: HostOutcome,
}

#[derive(Debug, Clone)]
pub struct EmbedWidget {
    element: HostElement,
    params: Option<EmbedParameters>,
    policy: SizePolicy,
    height_presets: Vec<u32>,
    resize: ResizeController,
    width_field: FieldState,
    height_field: FieldState,
}

impl EmbedWidget {
    #[must_use]
    pub fn new(element: HostElement, config: &PluginConfig) -> Self {
        let params = element.to_embed(&config.sizing).map(|node| node.attrs);
        let mut widget = Self {
            element,
            params,
            policy: config.sizing,
            height_presets: config.height_presets.clone(),
            resize: ResizeController::new(config.sizing),
            width_field: FieldState::default(),
            height_field: FieldState::default(),
        };
        widget.reset_fields();
        widget
    }

    #[must_use]
    pub fn element(&self) -> &HostElement {
        &self.element
    }

    /// Decoded parameters, or `None` for a foreign element.
    #[must_use]
    pub fn params(&self) -> Option<&EmbedParameters> {
        self.params.as_ref()
    }

    #[must_use]
    pub fn is_embed(&self) -> bool {
        self.params.is_some()
    }

    #[must_use]
    pub fn resize(&self) -> &ResizeController {
        &self.resize
    }

    /// Re-read the element after the host re-renders it.
    ///
    /// Fields the author is editing keep their text.
    pub fn sync(&mut self, element: HostElement) {
        self.params = element.to_embed(&self.policy).map(|node| node.attrs);
        self.element = element;
        if let Some(params) = &self.params {
            if !self.width_field.dirty {
                self.width_field = FieldState::committed(params.width.to_string());
            }
            if !self.height_field.dirty {
                self.height_field = FieldState::committed(params.height.to_string());
            }
        }
    }

    /// Render the current state. `caps` decides which actions are offered.
    #[must_use]
    pub fn view(&self, caps: HostCapabilities) -> EmbedView {
        let Some(params) = &self.params else {
            return EmbedView::Passthrough {
                children: self.element.children.clone(),
            };
        };

        let live = self.resize.live_size();
        let (width, height) = match live {
            Some(live) => (EmbedWidth::Pixels(live.width), live.height),
            None => (params.width, params.height),
        };
        let (width_field, height_field) = match live {
            Some(live) => (live.width.to_string(), live.height.to_string()),
            None => (self.width_field.text.clone(), self.height_field.text.clone()),
        };
        let header = HeaderView {
            label: params.display_label(),
            width_field,
            height_field,
            quick_actions: self.quick_actions(),
            can_edit: caps.contains(HostCapabilities::EDIT),
            can_remove: caps.contains(HostCapabilities::DELETE),
        };

        EmbedView::Embed(EmbedWidgetView {
            header,
            iframe: IframeSpec {
                src: params.view_url(),
                title: params.display_label(),
                width,
                height,
            },
            dragging: live.is_some(),
            compact: params.inline,
        })
    }

    fn quick_actions(&self) -> Vec<QuickAction> {
        std::iter::once(QuickAction::FitWidth)
            .chain(self.height_presets.iter().copied().map(QuickAction::Height))
            .collect()
    }

    /// Width field edit (local only).
    pub fn width_input(&mut self, text: impl Into<String>) {
        if self.is_embed() {
            self.width_field = FieldState {
                text: text.into(),
                dirty: true,
            };
        }
    }

    /// Height field edit (local only).
    pub fn height_input(&mut self, text: impl Into<String>) {
        if self.is_embed() {
            self.height_field = FieldState {
                text: text.into(),
                dirty: true,
            };
        }
    }

    /// Commit the width field. Unparseable text keeps the committed width.
    pub fn width_blur<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> HostOutcome {
        let Some(params) = &self.params else {
            return HostOutcome::Skipped;
        };
        if !self.width_field.dirty {
            return HostOutcome::Skipped;
        }
        let width = EmbedWidth::parse(&self.width_field.text, &self.policy).unwrap_or(params.width);
        if width == params.width {
            self.width_field = FieldState::committed(width.to_string());
            return HostOutcome::Skipped;
        }
        self.stage_and_commit(host, ResizeCommit::width(width))
    }

    /// Commit the height field. Non-numeric text commits the default height.
    pub fn height_blur<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> HostOutcome {
        let Some(params) = &self.params else {
            return HostOutcome::Skipped;
        };
        if !self.height_field.dirty {
            return HostOutcome::Skipped;
        }
        let height = height_from_text(&self.height_field.text, &self.policy);
        if height == params.height {
            self.height_field = FieldState::committed(height.to_string());
            return HostOutcome::Skipped;
        }
        self.stage_and_commit(host, ResizeCommit::height(height))
    }

    pub fn quick_action<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        action: QuickAction,
    ) -> HostOutcome {
        if !self.is_embed() {
            return HostOutcome::Skipped;
        }
        let dispatch = match action {
            QuickAction::FitWidth => self.resize.fit_width(),
            QuickAction::Height(height) => self.resize.height_preset(height),
        };
        if dispatch.was_ignored() {
            return HostOutcome::Skipped;
        }
        self.commit_staged(host)
    }

    /// Ask the host to open the editor for this node.
    pub fn edit<H: EditorHost + ?Sized>(&self, host: &mut H) -> HostOutcome {
        if !self.is_embed() {
            return HostOutcome::Skipped;
        }
        host::open_editor(host, &self.element)
    }

    /// Ask the host to delete this node.
    pub fn remove<H: EditorHost + ?Sized>(&self, host: &mut H) -> HostOutcome {
        if !self.is_embed() {
            return HostOutcome::Skipped;
        }
        host::delete_node(host, &self.element)
    }

    /// Pointer-down on the resize handle. `measure` reports the rendered
    /// container width in pixels.
    pub fn pointer_down(
        &mut self,
        pointer_id: u32,
        position: PointerPosition,
        measure: impl FnOnce() -> Option<f64>,
    ) -> Option<ResizeDispatch> {
        let committed = self.params.as_ref()?.size();
        let dispatch = self
            .resize
            .pointer_down(pointer_id, position, committed, measure);
        if !dispatch.was_ignored() {
            self.reset_fields();
        }
        Some(dispatch)
    }

    pub fn pointer_move(
        &mut self,
        pointer_id: u32,
        position: PointerPosition,
    ) -> Option<ResizeDispatch> {
        self.params.as_ref()?;
        Some(self.resize.pointer_move(pointer_id, position))
    }

    /// Pointer-up from the window listener; commits the final size.
    pub fn pointer_up<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        pointer_id: u32,
        position: PointerPosition,
        measure: impl FnOnce() -> Option<f64>,
    ) -> Option<ReleaseDispatch> {
        self.params.as_ref()?;
        let resize = self.resize.pointer_up(pointer_id, position, measure);
        let commit = if resize.was_ignored() {
            HostOutcome::Skipped
        } else {
            self.commit_staged(host)
        };
        Some(ReleaseDispatch { resize, commit })
    }

    pub fn pointer_cancel(&mut self, pointer_id: Option<u32>) -> Option<ResizeDispatch> {
        self.params.as_ref()?;
        Some(self.resize.pointer_cancel(pointer_id))
    }

    pub fn blur(&mut self) -> Option<ResizeDispatch> {
        self.params.as_ref()?;
        Some(self.resize.blur())
    }

    /// Unmount. Returns the listener release the host must perform, if any.
    pub fn teardown(&mut self) -> Option<ListenerCommand> {
        self.resize.teardown().listener_command
    }

    fn stage_and_commit<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        commit: ResizeCommit,
    ) -> HostOutcome {
        if self.resize.stage_commit(commit).was_ignored() {
            return HostOutcome::Skipped;
        }
        self.commit_staged(host)
    }

    fn commit_staged<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> HostOutcome {
        let Some(commit) = self.resize.take_commit() else {
            return HostOutcome::Skipped;
        };
        let Some(params) = &self.params else {
            return HostOutcome::Skipped;
        };
        let mut next = params.clone();
        next.set_size(commit.apply(params.size(), &self.policy), &self.policy);

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "embed.commit",
            uid = self.element.uid.as_deref(),
            width = %next.width,
            height = next.height,
        )
        .entered();

        let mut element = self.element.clone();
        element.attrs = next.merge_into(&self.element.attrs);
        let outcome = host::update_node(host, element.clone());
        if outcome.is_applied() {
            self.element = element;
            self.params = Some(next);
        }
        self.reset_committed_fields(commit);
        outcome
    }

    /// Reset the fields a commit covered; the other field keeps any
    /// uncommitted text.
    fn reset_committed_fields(&mut self, commit: ResizeCommit) {
        let Some(params) = &self.params else {
            return;
        };
        if commit.width.is_some() {
            self.width_field = FieldState::committed(params.width.to_string());
        }
        if commit.height.is_some() {
            self.height_field = FieldState::committed(params.height.to_string());
        }
    }

    fn reset_fields(&mut self) {
        if let Some(params) = &self.params {
            self.width_field = FieldState::committed(params.width.to_string());
            self.height_field = FieldState::committed(params.height.to_string());
        }
    }
}
