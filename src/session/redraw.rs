//! Redraw engine
//!
//! Repaints a message that is already on screen. The cursor normally rests
//! at the bottom of the log, so the engine walks through these steps:
//!
//! 1. Locate: resolve the target, falling back to the most recent message
//! 2. Measure: rows from the bottom to the top of the target
//! 3. Reposition: save and hide the cursor, go to column 0, move up
//! 4. Repaint: draw the target with its new content
//! 5. Cascade: if its height changed, redraw every later message, since all
//!    of them moved
//! 6. Restore: put the cursor back at the bottom and show it
//!
//! Offsets can only reach rows that are still on the terminal. Rows that
//! scrolled into the terminal's own scrollback cannot be repainted; moving
//! up past the top row is clamped by the terminal.

use std::io::{self, Write};

use crate::core::Target;

use super::Inner;

/// Outcome of a redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redraw {
    /// Index of the repainted message
    pub index: usize,
    /// Rows the cursor moved up
    pub offset: usize,
    /// Height before the redraw
    pub old_lines: usize,
    /// Height after the redraw
    pub new_lines: usize,
    /// Number of later messages repainted because the height changed
    pub cascaded: usize,
}

/// Redraw steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Locate,
    Measure,
    Reposition,
    Repaint,
    Cascade,
    Restore,
}

impl<W: Write, R> Inner<W, R> {
    /// Run a redraw of `target`, replacing its content first if given
    pub(super) fn redraw(&mut self, target: Target, content: Option<String>) -> io::Result<Option<Redraw>> {
        let mut step = Step::Locate;
        let mut content = content;
        let mut report = Redraw {
            index: 0,
            offset: 0,
            old_lines: 0,
            new_lines: 0,
            cascaded: 0,
        };
        let mut old_total = 0;

        loop {
            step = match step {
                Step::Locate => {
                    let index = match self.history.resolve(target) {
                        Some(index) => index,
                        None => match self.history.last_index() {
                            Some(last) => {
                                tracing::warn!(?target, "Redraw target not found, using most recent message");
                                last
                            }
                            None => return Ok(None),
                        },
                    };
                    report.index = index;
                    Step::Measure
                }
                Step::Measure => {
                    report.offset = self.history.offset_from_bottom(report.index);
                    report.old_lines = self
                        .history
                        .get(report.index)
                        .map_or(0, |message| message.rendered_lines());
                    old_total = self.history.total_lines();
                    Step::Reposition
                }
                Step::Reposition => {
                    self.terminal.save_cursor_position()?;
                    self.terminal.hide_cursor()?;
                    self.terminal.move_to_column_zero()?;
                    self.terminal.move_up(report.offset)?;
                    Step::Repaint
                }
                Step::Repaint => {
                    if let Some(content) = content.take() {
                        if let Some(message) = self.history.get_mut(report.index) {
                            message.set_content(content);
                        }
                    }
                    // Records the new height before anything below is touched
                    report.new_lines = self.draw(report.index)?;
                    tracing::trace!(
                        index = report.index,
                        offset = report.offset,
                        old_lines = report.old_lines,
                        new_lines = report.new_lines,
                        "repainted message"
                    );

                    if report.new_lines == report.old_lines {
                        Step::Restore
                    } else {
                        Step::Cascade
                    }
                }
                Step::Cascade => {
                    for index in report.index + 1..self.history.len() {
                        self.draw(index)?;
                        report.cascaded += 1;
                    }
                    tracing::debug!(
                        index = report.index,
                        cascaded = report.cascaded,
                        "height changed, repainted following messages"
                    );

                    // The log got shorter: wipe the rows it no longer uses
                    let stale = old_total.saturating_sub(self.history.total_lines());
                    for _ in 0..stale {
                        self.terminal.clear_line()?;
                        self.terminal.move_down(1)?;
                    }
                    self.terminal.move_up(stale)?;
                    Step::Restore
                }
                Step::Restore => {
                    // After a cascade the cursor already sits at the new bottom
                    if report.new_lines == report.old_lines {
                        self.terminal.restore_cursor_position()?;
                    }
                    self.terminal.show_cursor()?;
                    self.terminal.flush()?;
                    return Ok(Some(report));
                }
            };
        }
    }
}
