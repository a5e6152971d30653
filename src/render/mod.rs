//! Message renderer
//!
//! Turns a message into the exact text written to the terminal and counts
//! the rows it occupies at the configured width.
//!
//! Wrapping works on visible columns. Escape sequences are copied whole and
//! count as zero columns, so a wrap is never inserted inside one. Control
//! characters are dropped, and so is the ESC of an unterminated sequence. Each row
//! starts with a clear-to-end-of-line so that a repaint over a longer
//! previous render leaves no stale characters behind.

use unicode_width::UnicodeWidthChar;

use crate::ansi::{self, Token};
use crate::core::{Category, Message, RESET};
use crate::term::CLEAR_LINE;

/// Default wrap column
pub const DEFAULT_WIDTH: usize = 80;

/// Output of a render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Text to write, starting at column 0 of the first row. It does not
    /// end with a newline.
    pub text: String,
    /// Number of terminal rows the text occupies, at least 1
    pub lines: usize,
}

/// Renders messages at a fixed width
#[derive(Debug, Clone)]
pub struct Renderer {
    width: usize,
    color: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH)
    }
}

impl Renderer {
    /// Create a renderer wrapping at `width` columns. A width of 0 is
    /// treated as 1.
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            color: true,
        }
    }

    /// Enable or disable escape sequences in the output. With color off,
    /// prefix styles and every escape sequence in the content are dropped.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Render a message
    pub fn render(&self, message: &Message) -> Rendered {
        self.render_parts(message.category(), message.content())
    }

    /// Render content as a message of the given category
    pub fn render_parts(&self, category: Category, content: &str) -> Rendered {
        let mut wrap = Wrap::new(self.width);
        wrap.out.push_str(CLEAR_LINE);

        if let Some(prefix) = category.prefix() {
            if self.color {
                wrap.out.push_str(&prefix.style.on());
            }
            // The label wraps like text when the row is too narrow for it
            for c in prefix.label.chars() {
                wrap.push_char(c);
            }
            if self.color {
                wrap.out.push_str(RESET);
            }
            // Continuation rows line up under the content, as long as the
            // label leaves at least one content column
            if prefix.width() < self.width {
                wrap.indent = prefix.width();
            }
        }

        let mut styled = false;
        for token in ansi::tokenize(content) {
            match token {
                Token::Text(c) => wrap.push_char(c),
                // Controls would move the cursor behind the row count's back
                Token::Control(_) => {}
                Token::Escape(seq) => {
                    if self.color {
                        wrap.out.push_str(seq.raw);
                        styled = true;
                    }
                }
                Token::Unterminated(raw) => {
                    // The rest of a broken sequence is shown as text, without
                    // the ESC that would make the terminal swallow it
                    for c in raw.chars().filter(|c| !c.is_control()) {
                        wrap.push_char(c);
                    }
                }
            }
        }

        // Keep styles from leaking into whatever is printed next
        if styled {
            wrap.out.push_str(RESET);
        }

        Rendered {
            text: wrap.out,
            lines: wrap.lines,
        }
    }
}

/// Column and row accounting for one render
struct Wrap {
    out: String,
    width: usize,
    indent: usize,
    col: usize,
    lines: usize,
}

impl Wrap {
    fn new(width: usize) -> Self {
        Self {
            out: String::new(),
            width,
            indent: 0,
            col: 0,
            lines: 1,
        }
    }

    /// Write a visible character, starting a new row first if it does not fit
    fn push_char(&mut self, c: char) {
        let w = c.width().unwrap_or(0);

        // A character wider than a whole row is written anyway
        if w > 0 && self.col + w > self.width && self.col > self.indent {
            self.break_line();
        }

        self.out.push(c);
        self.col += w;
    }

    fn break_line(&mut self) {
        self.out.push('\n');
        self.out.push_str(CLEAR_LINE);
        for _ in 0..self.indent {
            self.out.push(' ');
        }
        self.col = self.indent;
        self.lines += 1;
    }
}
