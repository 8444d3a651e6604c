//! Events that can occur in a widget

use crate::lead::LeadInput;
use crate::protocol::{ChatReply, ProtocolError};
use crate::transcript::SessionId;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // UI events
    Toggle,
    SubmitMessage {
        text: String,
    },
    SelectQuickReply {
        index: usize,
    },
    SubmitLead {
        input: LeadInput,
    },

    // Network completions
    ChatCompleted {
        outcome: ChatOutcome,
    },
    LeadCompleted {
        outcome: LeadOutcome,
    },
}

impl Event {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Event::Toggle => "toggle",
            Event::SubmitMessage { .. } => "submit_message",
            Event::SelectQuickReply { .. } => "select_quick_reply",
            Event::SubmitLead { .. } => "submit_lead",
            Event::ChatCompleted { .. } => "chat_completed",
            Event::LeadCompleted { .. } => "lead_completed",
        }
    }
}

/// How a chat request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Reply {
        message: String,
        session_id: Option<SessionId>,
        show_form: Option<String>,
    },
    /// Backend answered `success: false`
    Rejected,
    /// Transport failure or unreadable response
    Unreachable { reason: String },
}

impl ChatOutcome {
    #[must_use]
    pub fn from_result(result: Result<ChatReply, ProtocolError>) -> Self {
        match result {
            Ok(ChatReply {
                success: true,
                message: Some(message),
                session_id,
                show_form,
            }) => ChatOutcome::Reply {
                message,
                session_id,
                show_form: show_form.filter(|form| !form.trim().is_empty()),
            },
            Ok(_) => ChatOutcome::Rejected,
            Err(e) => ChatOutcome::Unreachable { reason: e.message },
        }
    }
}

/// How a lead submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadOutcome {
    Delivered,
    Failed { reason: String },
}

impl LeadOutcome {
    #[must_use]
    pub fn from_result(result: Result<(), ProtocolError>) -> Self {
        match result {
            Ok(()) => LeadOutcome::Delivered,
            Err(e) => LeadOutcome::Failed { reason: e.message },
        }
    }
}
