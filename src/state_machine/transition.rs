//! Pure state transition function

use super::{ChatOutcome, ConvState, Effect, Event, LeadOutcome, PendingForm, Phase, WidgetContext};
use crate::lead;
use crate::protocol::ChatRequest;
use crate::transcript::Transcript;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    #[must_use]
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A chat request is already in flight")]
    RequestInFlight,
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Widget is closed")]
    WidgetClosed,
    #[error("No quick reply at index {0}")]
    UnknownQuickReply(usize),
    #[error("No lead form is pending")]
    NoFormPending,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

impl TransitionError {
    /// Rejections that are deliberate no-ops rather than problems
    #[must_use]
    pub fn is_silent(&self) -> bool {
        matches!(self, TransitionError::RequestInFlight | TransitionError::EmptyMessage)
    }
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs; it performs
/// no I/O. The transcript is read (is it empty, which session is current)
/// but only ever changed through the returned effects.
///
/// # Errors
///
/// Returns a `TransitionError` when the event does not apply in the current
/// state; the caller keeps the old state and runs no effects.
#[allow(clippy::too_many_lines)] // One arm per row of the transition table
pub fn transition(
    state: &ConvState,
    context: &WidgetContext,
    transcript: &Transcript,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let config = &context.config;

    match (state, event) {
        // ============================================================
        // Visibility
        // ============================================================

        // First open greets; later opens resume whatever was interrupted
        (ConvState::Closed { suspended }, Event::Toggle) => {
            if transcript.is_empty() {
                Ok(TransitionResult::new(ConvState::OpenIdle {
                    quick_replies: config.quick_replies.clone(),
                })
                .with_effect(Effect::bot(&config.copy.welcome)))
            } else {
                Ok(TransitionResult::new(ConvState::open(suspended.clone())))
            }
        }

        // Closing never touches an outstanding request
        (open, Event::Toggle) => Ok(TransitionResult::new(ConvState::Closed {
            suspended: open.phase(),
        })),

        // ============================================================
        // Sending
        // ============================================================
        (ConvState::Closed { .. }, Event::SubmitMessage { .. } | Event::SelectQuickReply { .. }) => {
            Err(TransitionError::WidgetClosed)
        }

        // Concurrency guard, not a queue
        (ConvState::AwaitingResponse, Event::SubmitMessage { .. } | Event::SelectQuickReply { .. }) => {
            Err(TransitionError::RequestInFlight)
        }

        (ConvState::OpenIdle { quick_replies }, Event::SelectQuickReply { index }) => {
            let reply = quick_replies
                .get(index)
                .ok_or(TransitionError::UnknownQuickReply(index))?;
            Ok(send_message(reply.label.clone(), transcript))
        }

        // Typing while a form is shown abandons the form
        (
            ConvState::OpenIdle { .. } | ConvState::AwaitingFormSubmit { .. },
            Event::SubmitMessage { text },
        ) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(TransitionError::EmptyMessage);
            }
            Ok(send_message(text.to_string(), transcript))
        }

        (ConvState::AwaitingFormSubmit { .. }, Event::SelectQuickReply { index }) => {
            Err(TransitionError::UnknownQuickReply(index))
        }

        // ============================================================
        // Chat completion (applied even if the window was closed)
        // ============================================================
        (
            ConvState::AwaitingResponse
            | ConvState::Closed {
                suspended: Phase::AwaitingResponse,
            },
            Event::ChatCompleted { outcome },
        ) => Ok(match outcome {
            ChatOutcome::Reply {
                message,
                session_id,
                show_form,
            } => {
                let phase = match show_form {
                    Some(form_type) => Phase::AwaitingFormSubmit {
                        form: PendingForm::new(form_type),
                    },
                    None => Phase::idle(),
                };
                TransitionResult::new(state.with_phase(phase))
                    .with_effect(Effect::ReplaceSession { session_id })
                    .with_effect(Effect::bot(message))
            }
            ChatOutcome::Rejected => TransitionResult::new(state.with_phase(Phase::idle()))
                .with_effect(Effect::bot(&config.copy.generic_failure)),
            ChatOutcome::Unreachable { .. } => {
                TransitionResult::new(state.with_phase(Phase::idle()))
                    .with_effect(Effect::bot(&config.copy.connectivity_failure))
            }
        }),

        // ============================================================
        // Lead capture
        // ============================================================
        (ConvState::AwaitingFormSubmit { form }, Event::SubmitLead { input }) => {
            let schema = config.form(&form.form_type);
            match lead::validate(&input, &form.form_type, schema, &config.brand_key) {
                Ok(payload) => Ok(TransitionResult::new(ConvState::idle())
                    .with_effect(Effect::SendLead { payload })),
                Err(error) => Ok(TransitionResult::new(ConvState::AwaitingFormSubmit {
                    form: PendingForm {
                        form_type: form.form_type.clone(),
                        error: Some(error),
                    },
                })),
            }
        }

        (_, Event::SubmitLead { .. }) => Err(TransitionError::NoFormPending),

        // Appending clears whatever control surface is showing
        (_, Event::LeadCompleted { outcome }) => {
            let text = match outcome {
                LeadOutcome::Delivered => &config.copy.lead_thanks,
                LeadOutcome::Failed { .. } => &config.copy.lead_fallback,
            };
            let phase = match state.phase() {
                Phase::AwaitingResponse => Phase::AwaitingResponse,
                Phase::Idle { .. } | Phase::AwaitingFormSubmit { .. } => Phase::idle(),
            };
            Ok(TransitionResult::new(state.with_phase(phase)).with_effect(Effect::bot(text)))
        }

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {} with event {}",
            state.kind(),
            event.name()
        ))),
    }
}

/// Append the user's message and fire the chat request
fn send_message(text: String, transcript: &Transcript) -> TransitionResult {
    TransitionResult::new(ConvState::AwaitingResponse)
        .with_effect(Effect::user(text.clone()))
        .with_effect(Effect::SendChat {
            request: ChatRequest {
                message: text,
                session_id: transcript.session_id().cloned(),
            },
        })
}
