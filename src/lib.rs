//! Lead Widget - configuration-driven chat and lead-capture widget engine
//!
//! One engine serves every brand: a `WidgetConfig` is resolved into a
//! `ResolvedConfig`, a pure state machine decides what each UI or network
//! event means, a runtime applies the resulting effects, and the render
//! layer turns the current `View` into an element tree.

pub mod config;
pub mod lead;
pub mod protocol;
pub mod render;
pub mod runtime;
pub mod state_machine;
pub mod transcript;
pub mod view;

pub use config::{resolve, ConfigError, ResolvedConfig, WidgetConfig};
pub use lead::{LeadInput, LeadPayload, ValidationError};
pub use protocol::{ChatBackend, HttpBackend, LoggingBackend, ProtocolError};
pub use runtime::{mount_http, spawn_widget, MountError, WidgetHandle};
pub use state_machine::{ConvState, Event, StateKind};
pub use transcript::{Message, Role, SessionId, Transcript};
pub use view::{ControlSurface, View};
