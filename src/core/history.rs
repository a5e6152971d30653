//! Message history
//!
//! The ordered record of every message printed in a session. Print order is
//! vertical order on screen, top to bottom. Entries are never evicted: rows
//! that scrolled off the terminal keep their bookkeeping, they just can no
//! longer be reached by the cursor.

use std::sync::atomic::{AtomicU64, Ordering};

use super::message::{Category, Handle, Message, Target};

static NEXT_HISTORY_ID: AtomicU64 = AtomicU64::new(1);

/// Append-only message history
#[derive(Debug)]
pub struct History {
    id: u64,
    messages: Vec<Message>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create an empty history with a fresh id
    pub fn new() -> Self {
        Self {
            id: NEXT_HISTORY_ID.fetch_add(1, Ordering::Relaxed),
            messages: Vec::new(),
        }
    }

    /// Add a message at the end. It starts with a height of 0 until drawn.
    pub fn append(&mut self, content: impl Into<String>, category: Category) -> Handle {
        self.messages.push(Message::new(content, category));
        Handle {
            history: self.id,
            index: self.messages.len() - 1,
        }
    }

    /// Resolve a target to an index.
    ///
    /// Handles must come from this history. Integer indices wrap around:
    /// negative values count from the end and values past the end start over
    /// from the beginning, so `-1` is the last message and `len` the first.
    /// Returns `None` for foreign handles and for an empty history.
    pub fn resolve(&self, target: Target) -> Option<usize> {
        let len = self.messages.len();
        match target {
            Target::Handle(handle) => {
                (handle.history == self.id && handle.index < len).then_some(handle.index)
            }
            Target::Index(_) if len == 0 => None,
            Target::Index(index) => Some(index.rem_euclid(len as isize) as usize),
        }
    }

    /// Handle for the message at `index`
    pub fn handle(&self, index: usize) -> Option<Handle> {
        (index < self.messages.len()).then_some(Handle {
            history: self.id,
            index,
        })
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Message> {
        self.messages.get_mut(index)
    }

    /// Index of the most recent message
    pub fn last_index(&self) -> Option<usize> {
        self.messages.len().checked_sub(1)
    }

    /// Rows between the bottom of the log and the top of message `index`:
    /// the heights of that message and every message after it.
    pub fn offset_from_bottom(&self, index: usize) -> usize {
        self.messages
            .get(index..)
            .map(|tail| tail.iter().map(Message::rendered_lines).sum())
            .unwrap_or(0)
    }

    /// Rows produced by the whole log
    pub fn total_lines(&self) -> usize {
        self.offset_from_bottom(0)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }
}
