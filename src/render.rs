//! Presentation layer
//!
//! Pure functions from configuration and `View` to markup; nothing here
//! holds state of its own.

mod node;
mod style;
mod widget;

pub use node::{Element, Node};
pub use style::stylesheet;
pub use widget::render_widget;
