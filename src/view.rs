//! Observable widget view
//!
//! A `View` is what a presentation layer needs to draw the widget: the
//! visible transcript, whether the typing indicator shows, and which
//! control surface sits under the messages. The runtime publishes a fresh
//! one after every processed event.

use crate::config::QuickReply;
use crate::lead::ValidationError;
use crate::state_machine::{ConvState, Phase, StateKind, WidgetId};
use crate::transcript::{Message, SessionId, Transcript};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub widget_id: WidgetId,
    pub open: bool,
    pub state: StateKind,
    pub messages: Vec<Message>,
    /// Typing indicator; only shown while the window is open
    pub typing: bool,
    pub control: ControlSurface,
    pub session_id: Option<SessionId>,
}

/// What is offered below the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlSurface {
    None,
    QuickReplies {
        replies: Vec<QuickReply>,
    },
    LeadForm {
        form_type: String,
        error: Option<ValidationError>,
    },
}

impl ControlSurface {
    fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Idle { quick_replies } if !quick_replies.is_empty() => ControlSurface::QuickReplies {
                replies: quick_replies,
            },
            Phase::Idle { .. } | Phase::AwaitingResponse => ControlSurface::None,
            Phase::AwaitingFormSubmit { form } => ControlSurface::LeadForm {
                form_type: form.form_type,
                error: form.error,
            },
        }
    }
}

impl View {
    #[must_use]
    pub fn capture(state: &ConvState, transcript: &Transcript, widget_id: WidgetId) -> Self {
        let open = state.is_open();
        Self {
            widget_id,
            open,
            state: state.kind(),
            messages: transcript.list().to_vec(),
            typing: open && state.awaiting_response(),
            control: ControlSurface::for_phase(state.phase()),
            session_id: transcript.session_id().cloned(),
        }
    }

    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
