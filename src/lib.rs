//! Linelog
//!
//! Line-oriented terminal log output where any previously printed message
//! can be redrawn in place: status lines that change, progress bars that
//! advance, prompts that show their answer. Messages may span several
//! wrapped rows; when a redraw changes a message's height, every message
//! printed after it is repainted.
//!
//! - `ansi`: escape sequence tokenizer, shared by everything that measures text
//! - `core`: messages, handles, the message history, styles
//! - `render`: wrapping and row counting at a fixed width
//! - `term`: cursor-control primitives and the cursor position query
//! - `session`: the serialized log stream with redraw, progress and prompts
//! - `headless`: in-memory screen for checking what a session produced
//! - `format`: positional `{}` templates
//! - `config`: session configuration

pub mod ansi;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod headless;
pub mod render;
pub mod session;
pub mod term;

pub use config::Config;
pub use core::{Category, Color, Handle, Message, Style, Target};
pub use error::{Error, Result};
pub use format::Value;
pub use session::{PromptKind, Redraw, Response, Session};
