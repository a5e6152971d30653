//! Escape sequence tokenizer
//!
//! Splits text into printable characters, C0 controls and complete escape
//! sequences. Escape sequences are always yielded whole, which is what lets
//! the renderer treat them as zero-width and never wrap inside one.
//! Based on the VT500-series parser model from <https://vt100.net/emu/dec_ansi_parser>

mod tokens;

pub use tokens::{Sequence, SequenceKind, Token, Tokens};

/// The escape character (0x1B)
pub const ESC: char = '\x1b';

/// Tokenize a string
pub fn tokenize(input: &str) -> Tokens<'_> {
    Tokens::new(input)
}

/// Remove every escape sequence from `input`, keeping text and controls.
///
/// Unterminated sequences are kept as literal text minus their ESC,
/// matching how the renderer emits them.
pub fn strip(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for token in tokenize(input) {
        match token {
            Token::Text(c) | Token::Control(c) => out.push(c),
            Token::Escape(_) => {}
            Token::Unterminated(raw) => out.extend(raw.chars().filter(|c| !c.is_control())),
        }
    }
    out
}

/// Visible column count of `input`, ignoring escape sequences
pub fn visible_width(input: &str) -> usize {
    use unicode_width::UnicodeWidthChar;

    tokenize(input)
        .map(|token| match token {
            Token::Text(c) => c.width().unwrap_or(0),
            Token::Unterminated(raw) => raw.chars().filter_map(|c| c.width()).sum(),
            _ => 0,
        })
        .sum()
}
