//! Log messages
//!
//! A message is one logical unit of output. Its content is a single logical
//! line; the renderer decides how many terminal rows it takes.

use serde::{Deserialize, Serialize};

use crate::ansi::ESC;

use super::style::Prefix;

/// Kind of message. Determines the prefix, never the wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Plain output without a prefix
    Print,
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    /// A status line meant to be updated in place
    Status,
    /// A question waiting for user input
    Prompt,
    /// A progress bar
    Progress,
}

impl Category {
    /// The severity prefix for this category, if any
    pub fn prefix(self) -> Option<Prefix> {
        match self {
            Category::Fatal => Some(Prefix::FATAL),
            Category::Error => Some(Prefix::ERROR),
            Category::Warn => Some(Prefix::WARN),
            Category::Info => Some(Prefix::INFO),
            Category::Debug => Some(Prefix::DEBUG),
            Category::Print | Category::Status | Category::Prompt | Category::Progress => None,
        }
    }
}

/// A printed message and its on-screen height
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    content: String,
    category: Category,
    /// Number of terminal rows the message occupies right now
    rendered_lines: usize,
}

impl Message {
    /// Create a message that has not been drawn yet
    pub fn new(content: impl Into<String>, category: Category) -> Self {
        Self {
            content: normalize(content.into()),
            category,
            rendered_lines: 0,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn rendered_lines(&self) -> usize {
        self.rendered_lines
    }

    /// Replace the content. Height is left alone until the next draw.
    pub(crate) fn set_content(&mut self, content: impl Into<String>) {
        self.content = normalize(content.into());
    }

    pub(crate) fn set_rendered_lines(&mut self, lines: usize) {
        self.rendered_lines = lines;
    }
}

/// Flatten content to a single logical line: tabs become spaces, and every
/// other control character except ESC is removed. Line breaks, vertical
/// tabs, form feeds and backspaces would all move the cursor without the
/// renderer counting it.
fn normalize(content: String) -> String {
    if !content.contains(|c: char| c.is_control() && c != ESC) {
        return content;
    }

    content
        .chars()
        .filter_map(|c| match c {
            '\t' => Some(' '),
            ESC => Some(c),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Opaque reference to a message in a [`History`](super::History).
///
/// Handles carry the id of the history that issued them, so a handle from
/// one session never resolves in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub(crate) history: u64,
    pub(crate) index: usize,
}

impl Handle {
    /// Position of the message in print order
    pub fn index(&self) -> usize {
        self.index
    }
}

/// What an update or lookup refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A handle returned when the message was printed
    Handle(Handle),
    /// A print-order index. Negative values count from the end (`-1` is the
    /// most recent message); out-of-range values wrap around.
    Index(isize),
}

impl From<Handle> for Target {
    fn from(handle: Handle) -> Self {
        Target::Handle(handle)
    }
}

impl From<&Handle> for Target {
    fn from(handle: &Handle) -> Self {
        Target::Handle(*handle)
    }
}

impl From<isize> for Target {
    fn from(index: isize) -> Self {
        Target::Index(index)
    }
}

impl From<i32> for Target {
    fn from(index: i32) -> Self {
        Target::Index(index as isize)
    }
}
