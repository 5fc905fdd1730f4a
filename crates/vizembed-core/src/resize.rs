#![forbid(unsafe_code)]

//! Drag-resize controller for one embed instance.
//!
//! ```text
//! Idle -> Dragging -> Committing -> Idle
//!   \------------------^              (preset / field commit)
//! Dragging -> Idle                     (pointer-cancel / blur / teardown)
//! ```
//!
//! The controller owns at most one drag session. Window-level move/up
//! listeners are requested with [`ListenerCommand::Attach`] when a drag
//! starts and released with [`ListenerCommand::Detach`] when it ends or the
//! controller is torn down. The host wires these commands to the DOM, so
//! listeners never outlive the drag that needed them.
//!
//! A staged commit is held in `Committing` until the owner takes it with
//! [`ResizeController::take_commit`] and writes it to the node. Every
//! commit is clamped by the [`SizePolicy`] before it leaves the controller.

use crate::config::SizePolicy;
use crate::size::{EmbedSize, EmbedWidth};

/// Pointer position in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel size shown while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveSize {
    pub width: u32,
    pub height: u32,
}

/// Size change to write into the node. `None` leaves a dimension unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeCommit {
    pub width: Option<EmbedWidth>,
    pub height: Option<u32>,
}

impl ResizeCommit {
    #[must_use]
    pub const fn width(width: EmbedWidth) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    #[must_use]
    pub const fn height(height: u32) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }

    #[must_use]
    pub const fn size(width: EmbedWidth, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    #[must_use]
    pub fn clamped(self, policy: &SizePolicy) -> Self {
        Self {
            width: self.width.map(|width| width.clamped(policy)),
            height: self.height.map(|height| height.max(policy.min_height)),
        }
    }

    /// Apply to a committed size, re-clamping the result.
    #[must_use]
    pub fn apply(self, size: EmbedSize, policy: &SizePolicy) -> EmbedSize {
        EmbedSize {
            width: self.width.unwrap_or(size.width),
            height: self.height.unwrap_or(size.height),
        }
        .clamped(policy)
    }
}

/// Host command for the window-level pointer listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerCommand {
    Attach,
    Detach,
}

/// Public view of the controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeState {
    Idle,
    Dragging { pointer_id: u32, live: LiveSize },
    Committing,
}

/// Lifecycle phase recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeLifecyclePhase {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    Blur,
    Stage,
    Teardown,
}

/// Why an incoming signal was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeIgnoredReason {
    DragAlreadyInProgress,
    CommitPending,
    NoActiveDrag,
    PointerMismatch,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeLogOutcome {
    DragStarted,
    DragUpdated,
    CommitStaged,
    DragCanceled,
    TornDown,
    Ignored(ResizeIgnoredReason),
}

/// Structured log record for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeLogEntry {
    pub phase: ResizeLifecyclePhase,
    pub pointer_id: Option<u32>,
    pub position: Option<PointerPosition>,
    pub outcome: ResizeLogOutcome,
}

/// Result of one controller dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeDispatch {
    /// Size to paint while the drag is live.
    pub live: Option<LiveSize>,
    pub listener_command: Option<ListenerCommand>,
    pub log: ResizeLogEntry,
}

impl ResizeDispatch {
    fn ignored(
        phase: ResizeLifecyclePhase,
        reason: ResizeIgnoredReason,
        pointer_id: Option<u32>,
        position: Option<PointerPosition>,
    ) -> Self {
        Self {
            live: None,
            listener_command: None,
            log: ResizeLogEntry {
                phase,
                pointer_id,
                position,
                outcome: ResizeLogOutcome::Ignored(reason),
            },
        }
    }

    fn applied(
        phase: ResizeLifecyclePhase,
        outcome: ResizeLogOutcome,
        pointer_id: Option<u32>,
        position: Option<PointerPosition>,
    ) -> Self {
        Self {
            live: None,
            listener_command: None,
            log: ResizeLogEntry {
                phase,
                pointer_id,
                position,
                outcome,
            },
        }
    }

    #[must_use]
    pub const fn was_ignored(&self) -> bool {
        matches!(self.log.outcome, ResizeLogOutcome::Ignored(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragBaseline {
    width: f64,
    height: f64,
    width_was_percent: bool,
}

/// State of one in-progress drag. Discarded when the drag ends.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    pointer_id: u32,
    origin: PointerPosition,
    baseline: DragBaseline,
    live: LiveSize,
}

impl DragSession {
    fn size_at(&self, position: PointerPosition, policy: &SizePolicy) -> LiveSize {
        let dx = position.x - self.origin.x;
        let dy = position.y - self.origin.y;
        LiveSize {
            width: policy.clamp_width(self.baseline.width + dx),
            height: policy.clamp_height(self.baseline.height + dy),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Dragging(DragSession),
    Committing(ResizeCommit),
}

/// Per-instance resize controller.
#[derive(Debug, Clone)]
pub struct ResizeController {
    policy: SizePolicy,
    phase: Phase,
}

impl Default for ResizeController {
    fn default() -> Self {
        Self::new(SizePolicy::default())
    }
}

impl ResizeController {
    #[must_use]
    pub const fn new(policy: SizePolicy) -> Self {
        Self {
            policy,
            phase: Phase::Idle,
        }
    }

    #[must_use]
    pub const fn policy(&self) -> &SizePolicy {
        &self.policy
    }

    #[must_use]
    pub const fn state(&self) -> ResizeState {
        match self.phase {
            Phase::Idle => ResizeState::Idle,
            Phase::Dragging(session) => ResizeState::Dragging {
                pointer_id: session.pointer_id,
                live: session.live,
            },
            Phase::Committing(_) => ResizeState::Committing,
        }
    }

    /// Live size while dragging.
    #[must_use]
    pub const fn live_size(&self) -> Option<LiveSize> {
        match self.phase {
            Phase::Dragging(session) => Some(session.live),
            _ => None,
        }
    }

    /// Whether window-level listeners are currently requested.
    #[must_use]
    pub const fn listeners_attached(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    /// Begin a drag from the resize handle.
    ///
    /// `committed` is the node's committed size. A percentage width is
    /// resolved to pixels through `measure`, which reports the rendered
    /// container width; without a measurement the policy fallback width is
    /// used.
    pub fn pointer_down(
        &mut self,
        pointer_id: u32,
        position: PointerPosition,
        committed: EmbedSize,
        measure: impl FnOnce() -> Option<f64>,
    ) -> ResizeDispatch {
        let phase = ResizeLifecyclePhase::PointerDown;
        let reason = match self.phase {
            Phase::Idle => None,
            Phase::Dragging(_) => Some(ResizeIgnoredReason::DragAlreadyInProgress),
            Phase::Committing(_) => Some(ResizeIgnoredReason::CommitPending),
        };
        if let Some(reason) = reason {
            return self.finish(ResizeDispatch::ignored(
                phase,
                reason,
                Some(pointer_id),
                Some(position),
            ));
        }

        let committed = committed.clamped(&self.policy);
        let width = match committed.width {
            EmbedWidth::Pixels(px) => f64::from(px),
            EmbedWidth::Percent(_) => measured(measure)
                .unwrap_or_else(|| f64::from(self.policy.fallback_container_width)),
        };
        let baseline = DragBaseline {
            width,
            height: f64::from(committed.height),
            width_was_percent: committed.width.is_percent(),
        };
        let live = LiveSize {
            width: self.policy.clamp_width(baseline.width),
            height: self.policy.clamp_height(baseline.height),
        };
        self.phase = Phase::Dragging(DragSession {
            pointer_id,
            origin: position,
            baseline,
            live,
        });

        let mut dispatch = ResizeDispatch::applied(
            phase,
            ResizeLogOutcome::DragStarted,
            Some(pointer_id),
            Some(position),
        );
        dispatch.live = Some(live);
        dispatch.listener_command = Some(ListenerCommand::Attach);
        self.finish(dispatch)
    }

    /// Update the live size from a window-level pointer move.
    pub fn pointer_move(&mut self, pointer_id: u32, position: PointerPosition) -> ResizeDispatch {
        let phase = ResizeLifecyclePhase::PointerMove;
        let mut session = match self.active_session(pointer_id) {
            Ok(session) => session,
            Err(reason) => {
                return self.finish(ResizeDispatch::ignored(
                    phase,
                    reason,
                    Some(pointer_id),
                    Some(position),
                ));
            }
        };
        session.live = session.size_at(position, &self.policy);
        self.phase = Phase::Dragging(session);

        let mut dispatch = ResizeDispatch::applied(
            phase,
            ResizeLogOutcome::DragUpdated,
            Some(pointer_id),
            Some(position),
        );
        dispatch.live = Some(session.live);
        self.finish(dispatch)
    }

    /// End the drag and stage its final size.
    ///
    /// When the drag started from a percentage width, the final width is
    /// re-measured from the rendered container rather than taken from the
    /// live state; the live width is the fallback when no measurement is
    /// available.
    pub fn pointer_up(
        &mut self,
        pointer_id: u32,
        position: PointerPosition,
        measure: impl FnOnce() -> Option<f64>,
    ) -> ResizeDispatch {
        let phase = ResizeLifecyclePhase::PointerUp;
        let session = match self.active_session(pointer_id) {
            Ok(session) => session,
            Err(reason) => {
                return self.finish(ResizeDispatch::ignored(
                    phase,
                    reason,
                    Some(pointer_id),
                    Some(position),
                ));
            }
        };
        let live = session.size_at(position, &self.policy);
        let width = if session.baseline.width_was_percent {
            self.policy
                .clamp_width(measured(measure).unwrap_or_else(|| f64::from(live.width)))
        } else {
            live.width
        };
        let commit = ResizeCommit::size(EmbedWidth::Pixels(width), live.height);
        self.phase = Phase::Committing(commit.clamped(&self.policy));

        let mut dispatch = ResizeDispatch::applied(
            phase,
            ResizeLogOutcome::CommitStaged,
            Some(pointer_id),
            Some(position),
        );
        dispatch.live = Some(LiveSize {
            width,
            height: live.height,
        });
        dispatch.listener_command = Some(ListenerCommand::Detach);
        self.finish(dispatch)
    }

    /// Abandon the drag without committing. `None` matches any pointer.
    pub fn pointer_cancel(&mut self, pointer_id: Option<u32>) -> ResizeDispatch {
        let phase = ResizeLifecyclePhase::PointerCancel;
        let Phase::Dragging(session) = self.phase else {
            return self.finish(ResizeDispatch::ignored(
                phase,
                ResizeIgnoredReason::NoActiveDrag,
                pointer_id,
                None,
            ));
        };
        if pointer_id.is_some_and(|id| id != session.pointer_id) {
            return self.finish(ResizeDispatch::ignored(
                phase,
                ResizeIgnoredReason::PointerMismatch,
                pointer_id,
                None,
            ));
        }
        self.cancel_drag(phase, session.pointer_id)
    }

    /// Window lost focus mid-drag.
    pub fn blur(&mut self) -> ResizeDispatch {
        let phase = ResizeLifecyclePhase::Blur;
        match self.phase {
            Phase::Dragging(session) => self.cancel_drag(phase, session.pointer_id),
            _ => self.finish(ResizeDispatch::ignored(
                phase,
                ResizeIgnoredReason::NoActiveDrag,
                None,
                None,
            )),
        }
    }

    /// Stage a commit that bypasses dragging (quick actions, field blur).
    pub fn stage_commit(&mut self, commit: ResizeCommit) -> ResizeDispatch {
        let phase = ResizeLifecyclePhase::Stage;
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Committing(commit.clamped(&self.policy));
                self.finish(ResizeDispatch::applied(
                    phase,
                    ResizeLogOutcome::CommitStaged,
                    None,
                    None,
                ))
            }
            Phase::Dragging(session) => self.finish(ResizeDispatch::ignored(
                phase,
                ResizeIgnoredReason::DragAlreadyInProgress,
                Some(session.pointer_id),
                None,
            )),
            Phase::Committing(_) => self.finish(ResizeDispatch::ignored(
                phase,
                ResizeIgnoredReason::CommitPending,
                None,
                None,
            )),
        }
    }

    /// Stage `width = 100%`, leaving height unchanged.
    pub fn fit_width(&mut self) -> ResizeDispatch {
        self.stage_commit(ResizeCommit::width(EmbedWidth::FULL))
    }

    /// Stage a fixed height, leaving width unchanged.
    pub fn height_preset(&mut self, height: u32) -> ResizeDispatch {
        self.stage_commit(ResizeCommit::height(height))
    }

    /// Take the staged commit and return to `Idle`.
    pub fn take_commit(&mut self) -> Option<ResizeCommit> {
        match self.phase {
            Phase::Committing(commit) => {
                self.phase = Phase::Idle;
                Some(commit)
            }
            _ => None,
        }
    }

    /// Return to `Idle` unconditionally, releasing any attached listeners.
    pub fn teardown(&mut self) -> ResizeDispatch {
        let pointer_id = match self.phase {
            Phase::Dragging(session) => Some(session.pointer_id),
            _ => None,
        };
        let had_listeners = self.listeners_attached();
        self.phase = Phase::Idle;
        let mut dispatch = ResizeDispatch::applied(
            ResizeLifecyclePhase::Teardown,
            ResizeLogOutcome::TornDown,
            pointer_id,
            None,
        );
        dispatch.listener_command = had_listeners.then_some(ListenerCommand::Detach);
        self.finish(dispatch)
    }

    fn active_session(&self, pointer_id: u32) -> Result<DragSession, ResizeIgnoredReason> {
        match self.phase {
            Phase::Dragging(session) if session.pointer_id == pointer_id => Ok(session),
            Phase::Dragging(_) => Err(ResizeIgnoredReason::PointerMismatch),
            Phase::Committing(_) => Err(ResizeIgnoredReason::CommitPending),
            Phase::Idle => Err(ResizeIgnoredReason::NoActiveDrag),
        }
    }

    fn cancel_drag(&mut self, phase: ResizeLifecyclePhase, pointer_id: u32) -> ResizeDispatch {
        self.phase = Phase::Idle;
        let mut dispatch = ResizeDispatch::applied(
            phase,
            ResizeLogOutcome::DragCanceled,
            Some(pointer_id),
            None,
        );
        dispatch.listener_command = Some(ListenerCommand::Detach);
        self.finish(dispatch)
    }

    #[cfg_attr(not(feature = "tracing"), allow(clippy::unused_self))]
    fn finish(&self, dispatch: ResizeDispatch) -> ResizeDispatch {
        #[cfg(feature = "tracing")]
        {
            let _span = tracing::debug_span!(
                "resize.dispatch",
                phase = ?dispatch.log.phase,
                outcome = ?dispatch.log.outcome,
                pointer_id = dispatch.log.pointer_id,
                state = ?self.state(),
            )
            .entered();
        }
        dispatch
    }
}

fn measured(measure: impl FnOnce() -> Option<f64>) -> Option<f64> {
    measure().filter(|width| width.is_finite() && *width > 0.0)
}
