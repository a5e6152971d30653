//! Terminal control
//!
//! Thin wrapper over an output stream that emits cursor, clear and
//! visibility control sequences. It keeps no state of its own; the
//! session decides when each primitive is used.

#[cfg(unix)]
mod unix;

use std::io::{self, Write};

/// Control Sequence Introducer
pub const CSI: &str = "\x1b[";

/// Clear from the cursor to the end of the line (EL 0)
pub const CLEAR_LINE: &str = "\x1b[K";

/// Hide the cursor (DECTCEM reset)
pub const HIDE_CURSOR: &str = "\x1b[?25l";

/// Show the cursor (DECTCEM set)
pub const SHOW_CURSOR: &str = "\x1b[?25h";

/// Save the cursor position (SCOSC)
pub const SAVE_CURSOR: &str = "\x1b[s";

/// Restore the cursor position (SCORC)
pub const RESTORE_CURSOR: &str = "\x1b[u";

/// Request a cursor position report (DSR 6)
pub const REPORT_CURSOR: &str = "\x1b[6n";

/// Terminal control primitives over a writer
#[derive(Debug)]
pub struct Terminal<W: Write> {
    out: W,
}

impl<W: Write> Terminal<W> {
    /// Wrap an output stream
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Get a reference to the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Get a mutable reference to the underlying writer
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Unwrap the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Clear from the cursor to the end of the current line
    pub fn clear_line(&mut self) -> io::Result<()> {
        self.out.write_all(CLEAR_LINE.as_bytes())
    }

    /// Move the cursor to column 0
    pub fn move_to_column_zero(&mut self) -> io::Result<()> {
        self.out.write_all(b"\r")
    }

    /// Move the cursor up `n` rows. A count of 0 emits nothing, since
    /// terminals treat `CSI 0 A` as a move of one row.
    pub fn move_up(&mut self, n: usize) -> io::Result<()> {
        if n == 0 {
            return Ok(());
        }
        write!(self.out, "{}{}A", CSI, n)
    }

    /// Move the cursor down `n` rows (no scrolling)
    pub fn move_down(&mut self, n: usize) -> io::Result<()> {
        if n == 0 {
            return Ok(());
        }
        write!(self.out, "{}{}B", CSI, n)
    }

    pub fn hide_cursor(&mut self) -> io::Result<()> {
        self.out.write_all(HIDE_CURSOR.as_bytes())
    }

    pub fn show_cursor(&mut self) -> io::Result<()> {
        self.out.write_all(SHOW_CURSOR.as_bytes())
    }

    pub fn save_cursor_position(&mut self) -> io::Result<()> {
        self.out.write_all(SAVE_CURSOR.as_bytes())
    }

    pub fn restore_cursor_position(&mut self) -> io::Result<()> {
        self.out.write_all(RESTORE_CURSOR.as_bytes())
    }

    /// End the current row. Relies on the tty translating LF to CR LF.
    pub fn newline(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n")
    }

    /// Write pre-rendered text verbatim
    pub fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Query the cursor position of the controlling terminal.
///
/// Returns `(row, col)`, 1-based as reported by the terminal. This is best
/// effort: when stdin is not a terminal, raw mode cannot be entered, or no
/// report arrives in time, `(0, 0)` is returned.
pub fn query_cursor_position() -> (u16, u16) {
    #[cfg(unix)]
    {
        match unix::query_cursor_position() {
            Ok(Some(position)) => position,
            Ok(None) => {
                tracing::debug!("No cursor position report received");
                (0, 0)
            }
            Err(e) => {
                tracing::debug!("Cursor position query failed: {}", e);
                (0, 0)
            }
        }
    }

    #[cfg(not(unix))]
    {
        (0, 0)
    }
}

/// Parse a cursor position report (`CSI row ; col R`) out of raw input
pub fn parse_cursor_report(reply: &str) -> Option<(u16, u16)> {
    crate::ansi::tokenize(reply).find_map(|token| match token {
        crate::ansi::Token::Escape(seq) if seq.is_csi('R') && seq.params.len() == 2 => {
            Some((seq.params[0], seq.params[1]))
        }
        _ => None,
    })
}
