//! Property-based tests for the state machine
//!
//! A small simulator drives random user actions and network completions
//! through `transition`, applying effects the way the runtime does.

use super::state::*;
use super::transition::*;
use super::*;
use crate::config::{resolve, ticket99};
use crate::lead::LeadInput;
use crate::transcript::{Role, SessionId, Transcript};
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> WidgetContext {
    WidgetContext::new(Arc::new(resolve(&ticket99()).unwrap()))
}

/// What the simulated user or network does next
#[derive(Debug, Clone)]
enum Action {
    Toggle,
    Send(String),
    QuickReply(usize),
    Lead(LeadInput),
    /// Resolve the in-flight chat, if any
    CompleteChat(ChatOutcome),
    /// Resolve the oldest outstanding lead, if any
    CompleteLead(LeadOutcome),
}

#[derive(Default)]
struct Sim {
    state: ConvState,
    transcript: Transcript,
    in_flight_chats: usize,
    pending_leads: usize,
    leads_sent: Vec<crate::lead::LeadPayload>,
}

impl Sim {
    fn apply(&mut self, ctx: &WidgetContext, event: Event) -> Result<(), TransitionError> {
        let result = transition(&self.state, ctx, &self.transcript, event)?;
        self.state = result.new_state;
        for effect in result.effects {
            match effect {
                Effect::AppendMessage { message } => self.transcript.push(message),
                Effect::ReplaceSession { session_id } => self.transcript.replace_session(session_id),
                Effect::SendChat { .. } => self.in_flight_chats += 1,
                Effect::SendLead { payload } => {
                    self.pending_leads += 1;
                    self.leads_sent.push(payload);
                }
            }
        }
        Ok(())
    }

    fn step(&mut self, ctx: &WidgetContext, action: Action) {
        let event = match action {
            Action::Toggle => Event::Toggle,
            Action::Send(text) => Event::SubmitMessage { text },
            Action::QuickReply(index) => Event::SelectQuickReply { index },
            Action::Lead(input) => Event::SubmitLead { input },
            Action::CompleteChat(outcome) => {
                if self.in_flight_chats == 0 {
                    return;
                }
                self.in_flight_chats -= 1;
                Event::ChatCompleted { outcome }
            }
            Action::CompleteLead(outcome) => {
                if self.pending_leads == 0 {
                    return;
                }
                self.pending_leads -= 1;
                Event::LeadCompleted { outcome }
            }
        };
        // Rejections leave the simulation untouched
        let _ = self.apply(ctx, event);
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_form_type() -> impl Strategy<Value = String> {
    prop_oneof![Just("lead".to_string()), Just("partner".to_string())]
}

fn arb_chat_outcome() -> impl Strategy<Value = ChatOutcome> {
    prop_oneof![
        (
            "[a-zA-Z ]{1,20}",
            proptest::option::of("[a-z0-9]{6}"),
            proptest::option::of(arb_form_type())
        )
            .prop_map(|(message, session, show_form)| ChatOutcome::Reply {
                message,
                session_id: session.map(SessionId::new),
                show_form,
            }),
        Just(ChatOutcome::Rejected),
        "[a-z ]{1,10}".prop_map(|reason| ChatOutcome::Unreachable { reason }),
    ]
}

fn arb_lead_input() -> impl Strategy<Value = LeadInput> {
    (
        prop_oneof![Just(String::new()), "[A-Z][a-z]{2,8}"],
        prop_oneof![Just(String::new()), "[a-z]{3,6}@example\\.com"],
        prop_oneof![Just(String::new()), Just("sponsor".to_string()), Just("bogus".to_string())],
    )
        .prop_map(|(name, email, partner)| LeadInput::new(name, email).with_field("partnerType", partner))
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        2 => Just(Action::Toggle),
        3 => prop_oneof![Just(String::new()), "[a-zA-Z ]{1,20}"].prop_map(Action::Send),
        1 => (0usize..8).prop_map(Action::QuickReply),
        2 => arb_lead_input().prop_map(Action::Lead),
        3 => arb_chat_outcome().prop_map(Action::CompleteChat),
        1 => prop_oneof![
            Just(LeadOutcome::Delivered),
            Just(LeadOutcome::Failed { reason: "down".to_string() })
        ]
        .prop_map(Action::CompleteLead),
    ]
}

fn arb_actions() -> impl Strategy<Value = Vec<Action>> {
    proptest::collection::vec(arb_action(), 0..40)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: at most one chat request is ever outstanding, and it is
    // outstanding exactly when the state says so
    #[test]
    fn prop_single_chat_in_flight(actions in arb_actions()) {
        let ctx = test_context();
        let mut sim = Sim::default();
        for action in actions {
            sim.step(&ctx, action);
            prop_assert!(sim.in_flight_chats <= 1, "{} chats in flight", sim.in_flight_chats);
            prop_assert_eq!(sim.in_flight_chats == 1, sim.state.awaiting_response());
        }
    }

    // Invariant 2: the welcome message is appended exactly once, first
    #[test]
    fn prop_welcome_once(actions in arb_actions()) {
        let ctx = test_context();
        let mut sim = Sim::default();
        let mut opened = false;
        for action in actions {
            opened |= matches!(action, Action::Toggle);
            sim.step(&ctx, action);
        }
        let welcomes = sim
            .transcript
            .list()
            .iter()
            .filter(|m| m.role == Role::Bot && m.text == ctx.config.copy.welcome)
            .count();
        prop_assert_eq!(welcomes, usize::from(opened));
        if opened {
            prop_assert_eq!(&sim.transcript.list()[0].text, &ctx.config.copy.welcome);
        }
    }

    // Invariant 3: nothing is sent or appended while the widget was never opened
    #[test]
    fn prop_closed_widget_is_inert(actions in arb_actions()) {
        let ctx = test_context();
        let mut sim = Sim::default();
        for action in actions.into_iter().filter(|a| !matches!(a, Action::Toggle)) {
            sim.step(&ctx, action);
        }
        prop_assert!(sim.transcript.is_empty());
        prop_assert_eq!(sim.in_flight_chats, 0);
        prop_assert!(sim.leads_sent.is_empty());
    }

    // Invariant 4: every delivered lead carries contact details and the brand
    #[test]
    fn prop_sent_leads_are_valid(actions in arb_actions()) {
        let ctx = test_context();
        let mut sim = Sim::default();
        for action in actions {
            sim.step(&ctx, action);
        }
        for lead in &sim.leads_sent {
            prop_assert!(!lead.name.is_empty());
            prop_assert!(!lead.email.is_empty());
            prop_assert_eq!(&lead.brand, "ticket99");
        }
    }

    // Invariant 5: toggling twice returns to the same state without effects
    #[test]
    fn prop_double_toggle_is_identity(actions in arb_actions()) {
        let ctx = test_context();
        let mut sim = Sim::default();
        sim.step(&ctx, Action::Toggle);
        for action in actions {
            sim.step(&ctx, action);
        }

        let before = sim.state.clone();
        let first = transition(&before, &ctx, &sim.transcript, Event::Toggle).unwrap();
        let second = transition(&first.new_state, &ctx, &sim.transcript, Event::Toggle).unwrap();
        prop_assert!(first.effects.is_empty());
        prop_assert!(second.effects.is_empty());
        prop_assert_eq!(second.new_state, before);
    }

    // Invariant 6: the session only changes through chat replies
    #[test]
    fn prop_session_follows_last_reply(actions in arb_actions()) {
        let ctx = test_context();
        let mut sim = Sim::default();
        let mut expected: Option<SessionId> = None;
        for action in actions {
            let in_flight = sim.in_flight_chats;
            if let Action::CompleteChat(ChatOutcome::Reply { session_id, .. }) = &action {
                if in_flight == 1 {
                    expected.clone_from(session_id);
                }
            }
            sim.step(&ctx, action);
            prop_assert_eq!(sim.transcript.session_id(), expected.as_ref());
        }
    }
}
