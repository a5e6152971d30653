//! Screen snapshots
//!
//! Snapshots capture what a headless screen shows in a serializable form.
//! Feeding the same output into a screen of the same size always produces
//! the same snapshot.

use serde::{Deserialize, Serialize};

use super::Screen;

/// A snapshot of the screen state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cols: usize,
    pub rows: usize,
    /// Visible rows, trailing blanks removed
    pub lines: Vec<String>,
    pub cursor: CursorSnapshot,
    /// Rows scrolled off the top, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scrollback: Vec<String>,
}

/// Snapshot of cursor state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorSnapshot {
    pub row: usize,
    pub col: usize,
    pub visible: bool,
}

impl Snapshot {
    /// Create a snapshot from the current screen state
    pub fn from_screen(screen: &Screen) -> Self {
        Snapshot {
            cols: screen.cols(),
            rows: screen.rows(),
            lines: screen.lines(),
            cursor: CursorSnapshot {
                row: screen.cursor_row(),
                col: screen.cursor_col(),
                visible: screen.cursor_visible(),
            },
            scrollback: screen.scrollback(),
        }
    }

    /// Convert snapshot to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse snapshot from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Visible rows, one per line, with trailing empty rows removed
    pub fn to_text(&self) -> String {
        let mut result = String::new();
        for line in &self.lines {
            result.push_str(line);
            result.push('\n');
        }

        while result.ends_with("\n\n") {
            result.pop();
        }
        if result == "\n" {
            result.clear();
        }
        result
    }
}
