//! Widget conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{ChatOutcome, Event, LeadOutcome};
pub use state::{ConvState, PendingForm, Phase, StateKind, WidgetContext, WidgetId};
pub use transition::{transition, TransitionError, TransitionResult};
