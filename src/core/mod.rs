//! Log Core Module
//!
//! The data model shared by the renderer and the redraw engine:
//! - Messages and their categories
//! - Handles and targets used to refer back to printed messages
//! - The append-only history with per-message rendered heights
//! - The fixed style palette and severity prefixes

mod history;
mod message;
mod style;

pub use history::History;
pub use message::{Category, Handle, Message, Target};
pub use style::{Color, Prefix, Style, RESET};
