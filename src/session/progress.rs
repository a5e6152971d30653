//! Progress bars

use std::io::{BufRead, Write};

use unicode_width::UnicodeWidthChar;

use crate::ansi;
use crate::core::{Category, Color, Handle, Style};
use crate::error::Result;

use super::{Redraw, Session};

/// Cells between the brackets of a progress bar
pub const BAR_WIDTH: usize = 40;

/// Columns used around the bar: `"  100%  "`, the brackets, and a space
const BAR_CHROME: usize = 11;

/// Build a progress line: percentage, bar, then the label truncated to
/// whatever fits in `width` columns.
pub fn progress_line(percent: usize, label: &str, width: usize) -> String {
    let percent = percent.min(100);
    let filled = (percent * BAR_WIDTH + 99) / 100;

    let mut bar = String::with_capacity(BAR_WIDTH + 2);
    bar.push('[');
    for cell in 0..BAR_WIDTH {
        bar.push(match cell {
            c if c < filled => '=',
            c if c == filled => '>',
            _ => ' ',
        });
    }
    bar.push(']');

    let mut line = format!("  {:>3}%  {}", percent, Style::fg(Color::White).paint(&bar));

    let budget = width.saturating_sub(BAR_WIDTH + BAR_CHROME);
    let label = truncate(&ansi::strip(label), budget);
    if !label.is_empty() {
        line.push(' ');
        line.push_str(&label);
    }
    line
}

/// Cut `text` to `budget` columns, marking the cut with `...`
fn truncate(text: &str, budget: usize) -> String {
    if ansi::visible_width(text) <= budget {
        return text.to_string();
    }

    let keep = budget.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > keep {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(&"..."[..budget.min(3)]);
    out
}

impl<W: Write, R: BufRead> Session<W, R> {
    /// Print a progress bar at 0%
    pub fn progress(&self, label: impl AsRef<str>) -> Result<Handle> {
        let line = progress_line(0, label.as_ref(), self.width());
        self.log(Category::Progress, line)
    }

    /// Move a progress bar to `percent` (clamped to 100) with a new label
    pub fn set_progress(&self, handle: Handle, percent: usize, label: impl AsRef<str>) -> Result<Option<Redraw>> {
        let line = progress_line(percent, label.as_ref(), self.width());
        self.update(handle, line)
    }
}
