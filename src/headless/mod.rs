//! Headless screen
//!
//! A minimal in-memory terminal that understands the subset of control
//! sequences a session emits: printable text with autowrap, CR, LF, BS,
//! tabs, cursor movement, erase in line and display, cursor save and
//! restore, and cursor visibility. SGR and every other sequence are
//! accepted and ignored.
//!
//! The screen behaves like a tty with output post-processing enabled, so
//! LF also returns to column 0. Rows scrolled off the top are kept in a
//! bounded scrollback buffer.

mod snapshot;

pub use snapshot::{CursorSnapshot, Snapshot};

use std::collections::VecDeque;

use unicode_width::UnicodeWidthChar;

use crate::ansi::{self, Sequence, SequenceKind, Token};

/// Default number of rows kept in scrollback
pub const DEFAULT_SCROLLBACK: usize = 1000;

/// A single character cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    c: char,
    /// 0 for the right half of a wide character
    width: u8,
}

impl Default for Cell {
    fn default() -> Self {
        Self { c: ' ', width: 1 }
    }
}

/// A row of cells
#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    cells: Vec<Cell>,
}

impl Row {
    fn new(cols: usize) -> Self {
        Self {
            cells: vec![Cell::default(); cols],
        }
    }

    fn clear_range(&mut self, range: std::ops::Range<usize>) {
        let end = range.end.min(self.cells.len());
        for cell in &mut self.cells[range.start.min(end)..end] {
            *cell = Cell::default();
        }
    }

    /// Row text with trailing blanks removed
    fn text(&self) -> String {
        let text: String = self
            .cells
            .iter()
            .filter(|cell| cell.width > 0)
            .map(|cell| cell.c)
            .collect();
        text.trim_end().to_string()
    }
}

/// Cursor state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    row: usize,
    col: usize,
    visible: bool,
    /// Set after writing the last column; the next printable wraps first
    pending_wrap: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            row: 0,
            col: 0,
            visible: true,
            pending_wrap: false,
        }
    }
}

/// In-memory terminal screen
#[derive(Debug, Clone)]
pub struct Screen {
    cols: usize,
    rows: usize,
    grid: Vec<Row>,
    cursor: Cursor,
    saved: Option<(usize, usize)>,
    scrollback: VecDeque<Row>,
    scrollback_capacity: usize,
}

impl Screen {
    /// Create a blank screen. Both dimensions are at least 1.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self::with_scrollback(cols, rows, DEFAULT_SCROLLBACK)
    }

    pub fn with_scrollback(cols: usize, rows: usize, scrollback_capacity: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            grid: (0..rows).map(|_| Row::new(cols)).collect(),
            cursor: Cursor::default(),
            saved: None,
            scrollback: VecDeque::new(),
            scrollback_capacity,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Cursor row, 0-based
    pub fn cursor_row(&self) -> usize {
        self.cursor.row
    }

    /// Cursor column, 0-based
    pub fn cursor_col(&self) -> usize {
        self.cursor.col
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor.visible
    }

    /// Text of a visible row, trailing blanks removed
    pub fn line(&self, row: usize) -> Option<String> {
        self.grid.get(row).map(Row::text)
    }

    /// Text of every visible row
    pub fn lines(&self) -> Vec<String> {
        self.grid.iter().map(Row::text).collect()
    }

    /// Rows that scrolled off the top, oldest first
    pub fn scrollback(&self) -> Vec<String> {
        self.scrollback.iter().map(Row::text).collect()
    }

    /// Visible rows joined with newlines, trailing empty rows removed
    pub fn text(&self) -> String {
        let mut lines = self.lines();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    /// Process terminal output
    pub fn feed(&mut self, output: &str) {
        for token in ansi::tokenize(output) {
            match token {
                Token::Text(c) => self.print_char(c),
                Token::Control(c) => self.control(c),
                Token::Escape(seq) => self.escape(&seq),
                Token::Unterminated(raw) => {
                    // A real terminal would swallow some of this; showing it
                    // keeps broken output visible
                    for c in raw.chars() {
                        if c == ansi::ESC {
                            continue;
                        }
                        self.print_char(c);
                    }
                }
            }
        }
    }

    /// Process raw bytes, replacing invalid UTF-8
    pub fn feed_bytes(&mut self, output: &[u8]) {
        self.feed(&String::from_utf8_lossy(output));
    }

    /// Capture the screen state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_screen(self)
    }

    fn print_char(&mut self, c: char) {
        let width = c.width().unwrap_or(0);
        if width == 0 {
            return;
        }

        if self.cursor.pending_wrap {
            self.wrap();
        }

        // A wide character does not fit in the last column
        if width == 2 && self.cursor.col + 1 >= self.cols && self.cols > 1 {
            let (row, col) = (self.cursor.row, self.cursor.col);
            self.grid[row].clear_range(col..col + 1);
            self.wrap();
        }

        let (row, col) = (self.cursor.row, self.cursor.col);
        // Overwriting half of a wide character blanks the other half
        if self.grid[row].cells[col].width == 0 && col > 0 {
            self.grid[row].clear_range(col - 1..col);
        }
        self.grid[row].cells[col] = Cell {
            c,
            width: width as u8,
        };
        if width == 2 && col + 1 < self.cols {
            self.grid[row].cells[col + 1] = Cell { c: ' ', width: 0 };
        }

        let next = col + width;
        if next >= self.cols {
            self.cursor.col = self.cols - 1;
            self.cursor.pending_wrap = true;
        } else {
            self.cursor.col = next;
        }
    }

    fn wrap(&mut self) {
        self.cursor.pending_wrap = false;
        self.cursor.col = 0;
        self.index();
    }

    /// Move down one row, scrolling at the bottom
    fn index(&mut self) {
        if self.cursor.row + 1 >= self.rows {
            self.scroll_up();
        } else {
            self.cursor.row += 1;
        }
    }

    fn scroll_up(&mut self) {
        let top = self.grid.remove(0);
        if self.scrollback_capacity > 0 {
            if self.scrollback.len() == self.scrollback_capacity {
                self.scrollback.pop_front();
            }
            self.scrollback.push_back(top);
        }
        self.grid.push(Row::new(self.cols));
    }

    fn control(&mut self, c: char) {
        match c {
            '\n' | '\x0b' | '\x0c' => {
                self.cursor.pending_wrap = false;
                self.cursor.col = 0;
                self.index();
            }
            '\r' => {
                self.cursor.pending_wrap = false;
                self.cursor.col = 0;
            }
            '\x08' => {
                self.cursor.pending_wrap = false;
                self.cursor.col = self.cursor.col.saturating_sub(1);
            }
            '\t' => {
                self.cursor.pending_wrap = false;
                let next = (self.cursor.col / 8 + 1) * 8;
                self.cursor.col = next.min(self.cols - 1);
            }
            _ => {}
        }
    }

    fn escape(&mut self, seq: &Sequence<'_>) {
        match seq.kind {
            SequenceKind::Csi => self.csi(seq),
            SequenceKind::Esc if seq.intermediates.is_empty() => match seq.final_char {
                '7' => self.save_cursor(),
                '8' => self.restore_cursor(),
                _ => {}
            },
            _ => {}
        }
    }

    fn csi(&mut self, seq: &Sequence<'_>) {
        if seq.private_marker == Some('?') {
            if seq.param(0, 0) == 25 {
                match seq.final_char {
                    'h' => self.cursor.visible = true,
                    'l' => self.cursor.visible = false,
                    _ => {}
                }
            }
            return;
        }
        if seq.private_marker.is_some() || !seq.intermediates.is_empty() {
            return;
        }

        let n = seq.param_or_default(0, 1) as usize;
        match seq.final_char {
            'A' => {
                self.cursor.pending_wrap = false;
                self.cursor.row = self.cursor.row.saturating_sub(n);
            }
            'B' => {
                self.cursor.pending_wrap = false;
                self.cursor.row = (self.cursor.row + n).min(self.rows - 1);
            }
            'C' => {
                self.cursor.pending_wrap = false;
                self.cursor.col = (self.cursor.col + n).min(self.cols - 1);
            }
            'D' => {
                self.cursor.pending_wrap = false;
                self.cursor.col = self.cursor.col.saturating_sub(n);
            }
            'G' => {
                self.cursor.pending_wrap = false;
                self.cursor.col = (n - 1).min(self.cols - 1);
            }
            'H' | 'f' => {
                let row = seq.param_or_default(0, 1) as usize;
                let col = seq.param_or_default(1, 1) as usize;
                self.cursor.pending_wrap = false;
                self.cursor.row = (row - 1).min(self.rows - 1);
                self.cursor.col = (col - 1).min(self.cols - 1);
            }
            'J' => self.erase_in_display(seq.param(0, 0)),
            'K' => self.erase_in_line(seq.param(0, 0)),
            's' => self.save_cursor(),
            'u' => self.restore_cursor(),
            _ => {}
        }
    }

    fn erase_in_line(&mut self, mode: u16) {
        let (row, col) = (self.cursor.row, self.cursor.col);
        let line = &mut self.grid[row];
        match mode {
            0 => line.clear_range(col..self.cols),
            1 => line.clear_range(0..col + 1),
            2 => line.clear_range(0..self.cols),
            _ => {}
        }
    }

    fn erase_in_display(&mut self, mode: u16) {
        let row = self.cursor.row;
        match mode {
            0 => {
                self.erase_in_line(0);
                for line in &mut self.grid[row + 1..] {
                    line.clear_range(0..self.cols);
                }
            }
            1 => {
                self.erase_in_line(1);
                for line in &mut self.grid[..row] {
                    line.clear_range(0..self.cols);
                }
            }
            2 | 3 => {
                for line in &mut self.grid {
                    line.clear_range(0..self.cols);
                }
                if mode == 3 {
                    self.scrollback.clear();
                }
            }
            _ => {}
        }
    }

    fn save_cursor(&mut self) {
        self.saved = Some((self.cursor.row, self.cursor.col));
    }

    fn restore_cursor(&mut self) {
        let (row, col) = self.saved.unwrap_or((0, 0));
        self.cursor.row = row.min(self.rows - 1);
        self.cursor.col = col.min(self.cols - 1);
        self.cursor.pending_wrap = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_new() {
        let screen = Screen::new(80, 24);
        assert_eq!(screen.cols(), 80);
        assert_eq!(screen.rows(), 24);
        assert_eq!((screen.cursor_row(), screen.cursor_col()), (0, 0));
        assert!(screen.cursor_visible());
        assert_eq!(screen.text(), "");
    }

    #[test]
    fn test_linefeed_returns_to_column_zero() {
        let mut screen = Screen::new(10, 3);
        screen.feed("ab\ncd");
        assert_eq!(screen.lines(), vec!["ab", "cd", ""]);
        assert_eq!((screen.cursor_row(), screen.cursor_col()), (1, 2));
    }

    #[test]
    fn test_autowrap() {
        let mut screen = Screen::new(5, 3);
        screen.feed("Hello World");
        assert_eq!(screen.lines(), vec!["Hello", " Worl", "d"]);
    }

    #[test]
    fn test_pending_wrap_absorbs_newline() {
        let mut screen = Screen::new(5, 3);
        screen.feed("Hello\nX");
        assert_eq!(screen.lines(), vec!["Hello", "X", ""]);
    }

    #[test]
    fn test_scroll_into_scrollback() {
        let mut screen = Screen::new(10, 2);
        screen.feed("1\n2\n3\n");
        assert_eq!(screen.lines(), vec!["3", ""]);
        assert_eq!(screen.scrollback(), vec!["1", "2"]);
    }

    #[test]
    fn test_scrollback_is_bounded() {
        let mut screen = Screen::with_scrollback(10, 1, 2);
        screen.feed("a\nb\nc\nd");
        assert_eq!(screen.scrollback(), vec!["b", "c"]);
    }

    #[test]
    fn test_cursor_movement() {
        let mut screen = Screen::new(10, 5);
        screen.feed("\x1b[3;5HX");
        assert_eq!((screen.cursor_row(), screen.cursor_col()), (2, 5));
        screen.feed("\x1b[2A\x1b[3D");
        assert_eq!((screen.cursor_row(), screen.cursor_col()), (0, 2));
        screen.feed("\x1b[9A\x1b[20C");
        assert_eq!((screen.cursor_row(), screen.cursor_col()), (0, 9));
        screen.feed("\x1b[9B\x1b[1G");
        assert_eq!((screen.cursor_row(), screen.cursor_col()), (4, 0));
    }

    #[test]
    fn test_erase_in_line() {
        let mut screen = Screen::new(10, 2);
        screen.feed("abcdef\r\x1b[2C\x1b[K");
        assert_eq!(screen.line(0).unwrap(), "ab");
        screen.feed("\rabcdef\x1b[3D\x1b[1K");
        assert_eq!(screen.line(0).unwrap(), "    ef");
        screen.feed("\x1b[2K");
        assert_eq!(screen.line(0).unwrap(), "");
    }

    #[test]
    fn test_erase_in_display() {
        let mut screen = Screen::new(5, 3);
        screen.feed("aaaaa\nbbbbb\nccccc\x1b[2;3H\x1b[J");
        assert_eq!(screen.lines(), vec!["aaaaa", "bb", ""]);
        screen.feed("\x1b[2J");
        assert_eq!(screen.text(), "");
    }

    #[test]
    fn test_save_restore_cursor() {
        let mut screen = Screen::new(10, 5);
        screen.feed("ab\x1b[s\n\nxyz\x1b[u");
        assert_eq!((screen.cursor_row(), screen.cursor_col()), (0, 2));
        screen.feed("\x1b[3;3H\x1b7\x1b[H\x1b8");
        assert_eq!((screen.cursor_row(), screen.cursor_col()), (2, 2));
    }

    #[test]
    fn test_cursor_visibility() {
        let mut screen = Screen::new(10, 2);
        screen.feed("\x1b[?25l");
        assert!(!screen.cursor_visible());
        screen.feed("\x1b[?25h");
        assert!(screen.cursor_visible());
    }

    #[test]
    fn test_sgr_is_ignored() {
        let mut screen = Screen::new(20, 2);
        screen.feed("\x1b[1;31mRed\x1b[0m Normal");
        assert_eq!(screen.line(0).unwrap(), "Red Normal");
    }

    #[test]
    fn test_wide_characters() {
        let mut screen = Screen::new(5, 2);
        screen.feed("ab日本");
        assert_eq!(screen.lines(), vec!["ab日", "本"]);
        assert_eq!(screen.cursor_col(), 2);
    }

    #[test]
    fn test_backspace_and_tab() {
        let mut screen = Screen::new(20, 1);
        screen.feed("abc\x08X\tY");
        assert_eq!(screen.line(0).unwrap(), "abX     Y");
    }
}
