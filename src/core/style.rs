//! Text styles
//!
//! A small fixed palette of SGR attributes and colors, plus the severity
//! prefixes that the renderer places in front of prefixed categories.

use serde::{Deserialize, Serialize};

/// SGR reset
pub const RESET: &str = "\x1b[0m";

/// Standard and bright ANSI foreground colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
    DarkGray,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    White,
}

impl Color {
    /// SGR foreground code
    pub fn fg_code(self) -> u8 {
        match self {
            Color::Black => 30,
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Magenta => 35,
            Color::Cyan => 36,
            Color::Gray => 37,
            Color::DarkGray => 90,
            Color::BrightRed => 91,
            Color::BrightGreen => 92,
            Color::BrightYellow => 93,
            Color::BrightBlue => 94,
            Color::BrightMagenta => 95,
            Color::BrightCyan => 96,
            Color::White => 97,
        }
    }

    /// SGR background code
    pub fn bg_code(self) -> u8 {
        self.fg_code() + 10
    }
}

/// A set of SGR attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Style {
    /// Foreground-only style
    pub const fn fg(color: Color) -> Self {
        Self {
            fg: Some(color),
            bg: None,
            bold: false,
            italic: false,
            underline: false,
        }
    }

    /// SGR codes of this style, in emission order
    pub fn codes(&self) -> Vec<u8> {
        let mut codes = Vec::new();
        if self.bold {
            codes.push(1);
        }
        if self.italic {
            codes.push(3);
        }
        if self.underline {
            codes.push(4);
        }
        if let Some(fg) = self.fg {
            codes.push(fg.fg_code());
        }
        if let Some(bg) = self.bg {
            codes.push(bg.bg_code());
        }
        codes
    }

    /// The "style on" sequences, one per code
    pub fn on(&self) -> String {
        self.codes()
            .into_iter()
            .map(|code| format!("\x1b[{}m", code))
            .collect()
    }

    /// Wrap `text` in this style followed by a reset
    pub fn paint(&self, text: &str) -> String {
        let on = self.on();
        if on.is_empty() {
            return text.to_string();
        }
        format!("{}{}{}", on, text, RESET)
    }
}

/// A colored label printed before a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    /// Label text, padded so every prefix has the same width
    pub label: &'static str,
    pub style: Style,
}

impl Prefix {
    pub const FATAL: Prefix = Prefix::new("[FATAL] ", Color::Red);
    pub const ERROR: Prefix = Prefix::new("[ERROR] ", Color::Red);
    pub const WARN: Prefix = Prefix::new("[WARN]  ", Color::Yellow);
    pub const INFO: Prefix = Prefix::new("[INFO]  ", Color::Green);
    pub const DEBUG: Prefix = Prefix::new("[DEBUG] ", Color::Cyan);

    const fn new(label: &'static str, color: Color) -> Self {
        Self {
            label,
            style: Style::fg(color),
        }
    }

    /// Column width of the label
    pub fn width(&self) -> usize {
        unicode_width::UnicodeWidthStr::width(self.label)
    }
}
