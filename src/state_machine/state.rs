//! Widget state types

use crate::config::{QuickReply, ResolvedConfig};
use crate::lead::ValidationError;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Where the conversation stands, independent of window visibility
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Phase {
    /// Ready for input; `quick_replies` are the suggestions on offer
    Idle { quick_replies: Vec<QuickReply> },

    /// One chat request is in flight
    AwaitingResponse,

    /// The backend asked for a lead form
    AwaitingFormSubmit { form: PendingForm },
}

impl Phase {
    #[must_use]
    pub fn idle() -> Self {
        Phase::Idle {
            quick_replies: Vec::new(),
        }
    }
}

/// A lead form on screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingForm {
    pub form_type: String,
    /// Last rejected submission, shown under the form
    pub error: Option<ValidationError>,
}

impl PendingForm {
    #[must_use]
    pub fn new(form_type: impl Into<String>) -> Self {
        Self {
            form_type: form_type.into(),
            error: None,
        }
    }
}

/// Widget state.
///
/// Closing the window is purely visual: `Closed` keeps the phase it
/// interrupted, so an in-flight request or a pending form is still there
/// when the window reopens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvState {
    Closed { suspended: Phase },
    OpenIdle { quick_replies: Vec<QuickReply> },
    AwaitingResponse,
    AwaitingFormSubmit { form: PendingForm },
}

impl Default for ConvState {
    fn default() -> Self {
        ConvState::Closed {
            suspended: Phase::idle(),
        }
    }
}

impl ConvState {
    /// Open-window state for a phase
    #[must_use]
    pub fn open(phase: Phase) -> Self {
        match phase {
            Phase::Idle { quick_replies } => ConvState::OpenIdle { quick_replies },
            Phase::AwaitingResponse => ConvState::AwaitingResponse,
            Phase::AwaitingFormSubmit { form } => ConvState::AwaitingFormSubmit { form },
        }
    }

    #[must_use]
    pub fn idle() -> Self {
        ConvState::open(Phase::idle())
    }

    /// The conversation phase, whether or not the window is open
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            ConvState::Closed { suspended } => suspended.clone(),
            ConvState::OpenIdle { quick_replies } => Phase::Idle {
                quick_replies: quick_replies.clone(),
            },
            ConvState::AwaitingResponse => Phase::AwaitingResponse,
            ConvState::AwaitingFormSubmit { form } => Phase::AwaitingFormSubmit { form: form.clone() },
        }
    }

    /// Same visibility, different phase
    #[must_use]
    pub fn with_phase(&self, phase: Phase) -> Self {
        if self.is_open() {
            ConvState::open(phase)
        } else {
            ConvState::Closed { suspended: phase }
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self, ConvState::Closed { .. })
    }

    /// True while a chat request is outstanding, open or closed
    #[must_use]
    pub fn awaiting_response(&self) -> bool {
        matches!(
            self,
            ConvState::AwaitingResponse
                | ConvState::Closed {
                    suspended: Phase::AwaitingResponse
                }
        )
    }

    #[must_use]
    pub fn kind(&self) -> StateKind {
        match self {
            ConvState::Closed { .. } => StateKind::Closed,
            ConvState::OpenIdle { .. } => StateKind::OpenIdle,
            ConvState::AwaitingResponse => StateKind::AwaitingResponse,
            ConvState::AwaitingFormSubmit { .. } => StateKind::AwaitingFormSubmit,
        }
    }
}

/// Discriminant of `ConvState`, for logs and views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    Closed,
    OpenIdle,
    AwaitingResponse,
    AwaitingFormSubmit,
}

impl StateKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StateKind::Closed => "closed",
            StateKind::OpenIdle => "open_idle",
            StateKind::AwaitingResponse => "awaiting_response",
            StateKind::AwaitingFormSubmit => "awaiting_form_submit",
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one mounted widget in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WidgetId(Uuid);

impl WidgetId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Context for a widget (immutable configuration)
#[derive(Debug, Clone)]
pub struct WidgetContext {
    pub widget_id: WidgetId,
    pub config: Arc<ResolvedConfig>,
}

impl WidgetContext {
    #[must_use]
    pub fn new(config: Arc<ResolvedConfig>) -> Self {
        Self {
            widget_id: WidgetId::new(),
            config,
        }
    }
}
