#![forbid(unsafe_code)]

//! Asynchronous parameter picker.
//!
//! [`ParameterPicker::open`] splits one picker interaction into a
//! [`PickerRequest`], handed to whatever dialog the host shows, and a
//! [`PickerHandle`] future that resolves once the dialog answers. Dropping
//! the request without answering counts as a cancel, so an abandoned dialog
//! can never leave a half-built node behind.

use core::pin::Pin;
use core::task::{Context, Poll};
use std::task::ready;

use futures::FutureExt;
use futures::channel::oneshot;
use serde::{Deserialize, Serialize};
use vizembed_core::size::height_from_text;
use vizembed_core::{EmbedParameters, EmbedWidth, SizePolicy, ToolbarMode};

use crate::config::PluginConfig;

const PUBLIC_SERVER: &str = "https://public.tableau.com";

/// A known-public view that needs no authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleView {
    pub label: String,
    pub server: String,
    pub workbook: String,
    pub view: String,
}

impl SampleView {
    pub fn new(
        label: impl Into<String>,
        server: impl Into<String>,
        workbook: impl Into<String>,
        view: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            server: server.into(),
            workbook: workbook.into(),
            view: view.into(),
        }
    }
}

/// Built-in sample views hosted on Tableau Public.
#[must_use]
pub fn builtin_samples() -> Vec<SampleView> {
    [
        ("Superstore: Overview", "Superstore_116", "Overview"),
        ("World Indicators: GDP per capita", "WorldIndicators", "GDPpercapita"),
        ("Regional Sample: College Admissions", "RegionalSampleWorkbook", "College"),
        ("Regional Sample: Storms", "RegionalSampleWorkbook", "Storms"),
    ]
    .into_iter()
    .map(|(label, workbook, view)| SampleView::new(label, PUBLIC_SERVER, workbook, view))
    .collect()
}

/// Free-form picker fields, as typed. Blank optional fields take defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomEntry {
    pub server: String,
    pub workbook: String,
    pub view: String,
    pub width: String,
    pub height: String,
    pub toolbar: String,
    pub inline: String,
    pub label: String,
}

impl CustomEntry {
    pub fn new(
        server: impl Into<String>,
        workbook: impl Into<String>,
        view: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            workbook: workbook.into(),
            view: view.into(),
            ..Self::default()
        }
    }

    /// Prefill from existing parameters (edit flow).
    #[must_use]
    pub fn from_params(params: &EmbedParameters) -> Self {
        Self {
            server: params.server.clone(),
            workbook: params.workbook.clone(),
            view: params.view.clone(),
            width: params.width.to_string(),
            height: params.height.to_string(),
            toolbar: params.toolbar.to_string(),
            inline: params.inline.to_string(),
            label: params.label.clone().unwrap_or_default(),
        }
    }

    /// Validate required fields and apply defaults to the rest.
    pub fn resolve(&self, policy: &SizePolicy) -> Result<EmbedParameters, CancelReason> {
        let server = required("server", &self.server)?;
        let workbook = required("workbook", &self.workbook)?;
        let view = required("view", &self.view)?;
        let server = server.strip_suffix('/').unwrap_or(server);

        let toolbar = ToolbarMode::parse(&self.toolbar).unwrap_or_default();
        let inline = matches!(
            self.inline.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        );

        let mut params = EmbedParameters::with_policy(server, workbook, view, policy)
            .with_toolbar(toolbar)
            .with_inline(inline)
            .with_label(self.label.trim());
        if let Some(width) = EmbedWidth::parse(&self.width, policy) {
            params.width = width;
        }
        if !self.height.trim().is_empty() {
            params.height = height_from_text(&self.height, policy);
        }
        Ok(params)
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, CancelReason> {
    let value = value.trim();
    if value.is_empty() {
        Err(CancelReason::MissingField(field))
    } else {
        Ok(value)
    }
}

/// What the dialog chose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerChoice {
    /// Index into [`PickerRequest::samples`].
    Sample(usize),
    Custom(CustomEntry),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerReply {
    Chosen(PickerChoice),
    Cancelled,
}

/// Why a picker interaction produced no parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The author dismissed the dialog, or it was dropped unanswered.
    Dismissed,
    /// A required free-form field was blank.
    MissingField(&'static str),
    UnknownSample(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PickerOutcome {
    Picked(EmbedParameters),
    Cancelled(CancelReason),
}

impl PickerOutcome {
    #[must_use]
    pub fn into_picked(self) -> Option<EmbedParameters> {
        match self {
            Self::Picked(params) => Some(params),
            Self::Cancelled(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerMode {
    Insert,
    Edit,
}

/// Dialog-side half of a picker interaction.
#[derive(Debug)]
pub struct PickerRequest {
    samples: Vec<SampleView>,
    prefill: CustomEntry,
    mode: PickerMode,
    reply: oneshot::Sender<PickerReply>,
}

impl PickerRequest {
    #[must_use]
    pub fn samples(&self) -> &[SampleView] {
        &self.samples
    }

    /// Free-form fields to pre-populate.
    #[must_use]
    pub fn prefill(&self) -> &CustomEntry {
        &self.prefill
    }

    #[must_use]
    pub const fn mode(&self) -> PickerMode {
        self.mode
    }

    /// Answer the request. A handle that was already dropped ignores it.
    pub fn respond(self, reply: PickerReply) {
        let _ = self.reply.send(reply);
    }

    pub fn choose_sample(self, index: usize) {
        self.respond(PickerReply::Chosen(PickerChoice::Sample(index)));
    }

    pub fn submit(self, entry: CustomEntry) {
        self.respond(PickerReply::Chosen(PickerChoice::Custom(entry)));
    }

    pub fn cancel(self) {
        self.respond(PickerReply::Cancelled);
    }
}

/// Plugin-side half of a picker interaction; resolves to the outcome.
#[derive(Debug)]
pub struct PickerHandle {
    reply: oneshot::Receiver<PickerReply>,
    samples: Vec<SampleView>,
    prefill: CustomEntry,
    policy: SizePolicy,
}

impl PickerHandle {
    fn resolve(&self, reply: PickerReply) -> PickerOutcome {
        let result = match reply {
            PickerReply::Cancelled => Err(CancelReason::Dismissed),
            PickerReply::Chosen(PickerChoice::Custom(entry)) => entry.resolve(&self.policy),
            PickerReply::Chosen(PickerChoice::Sample(index)) => match self.samples.get(index) {
                // Size, toolbar and inline carry over from the prefill.
                Some(sample) => CustomEntry {
                    server: sample.server.clone(),
                    workbook: sample.workbook.clone(),
                    view: sample.view.clone(),
                    label: sample.label.clone(),
                    ..self.prefill.clone()
                }
                .resolve(&self.policy),
                None => Err(CancelReason::UnknownSample(index)),
            },
        };
        match result {
            Ok(params) => PickerOutcome::Picked(params),
            Err(reason) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(?reason, "embed picker cancelled");
                PickerOutcome::Cancelled(reason)
            }
        }
    }
}

impl Future for PickerHandle {
    type Output = PickerOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let reply = match ready!(self.reply.poll_unpin(cx)) {
            Ok(reply) => reply,
            Err(oneshot::Canceled) => PickerReply::Cancelled,
        };
        Poll::Ready(self.resolve(reply))
    }
}

/// Opens picker interactions with the configured samples and size policy.
#[derive(Debug, Clone)]
pub struct ParameterPicker {
    samples: Vec<SampleView>,
    policy: SizePolicy,
}

impl ParameterPicker {
    #[must_use]
    pub fn new(config: &PluginConfig) -> Self {
        Self {
            samples: config.samples.clone(),
            policy: config.sizing,
        }
    }

    /// Start an interaction. `defaults` pre-fills the free-form entry and
    /// switches the request into edit mode.
    #[must_use]
    pub fn open(&self, defaults: Option<&EmbedParameters>) -> (PickerRequest, PickerHandle) {
        let (tx, rx) = oneshot::channel();
        let prefill = defaults.map(CustomEntry::from_params).unwrap_or_default();
        let mode = if defaults.is_some() {
            PickerMode::Edit
        } else {
            PickerMode::Insert
        };
        let request = PickerRequest {
            samples: self.samples.clone(),
            prefill: prefill.clone(),
            mode,
            reply: tx,
        };
        let handle = PickerHandle {
            reply: rx,
            samples: self.samples.clone(),
            prefill,
            policy: self.policy,
        };
        (request, handle)
    }
}
