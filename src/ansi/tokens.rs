//! Tokenizer State Machine
//!
//! Walks a string and yields tokens. Unlike a terminal-side parser it never
//! discards input: every byte of the source ends up in exactly one token, so
//! callers can copy escape sequences through verbatim.
//!
//! States (entered after an ESC):
//! - Escape: After ESC, waiting for next char
//! - EscapeIntermediate: ESC followed by intermediate chars
//! - CsiEntry: After CSI (ESC [), private marker allowed
//! - CsiParam: Collecting CSI parameters
//! - CsiIntermediate: CSI with intermediate chars
//! - OscString: Collecting OSC payload until BEL or ST
//! - OscEscape: ESC seen inside an OSC payload, expecting `\`
//!
//! A sequence that is interrupted (by another ESC or an out-of-place
//! character) or cut off by the end of input is yielded as
//! [`Token::Unterminated`].

use super::ESC;

/// Tokenizer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Escape,
    EscapeIntermediate,
    CsiEntry,
    CsiParam,
    CsiIntermediate,
    OscString,
    OscEscape,
}

/// Family of a complete escape sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    /// ESC [ params intermediates final
    Csi,
    /// ESC ] payload (BEL | ESC \)
    Osc,
    /// ESC intermediates final
    Esc,
}

/// A complete escape sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence<'a> {
    /// The exact source text of the sequence, introducer included
    pub raw: &'a str,
    pub kind: SequenceKind,
    /// Numeric parameters (CSI only). Empty parameters are 0.
    pub params: Vec<u16>,
    /// Private marker (`?`, `>`, `<`, `=`) directly after CSI
    pub private_marker: Option<char>,
    /// Intermediate characters (0x20-0x2F)
    pub intermediates: Vec<char>,
    /// Final character; BEL or `\` for OSC
    pub final_char: char,
}

impl Sequence<'_> {
    /// Get parameter at index, or `default` if missing
    pub fn param(&self, index: usize, default: u16) -> u16 {
        self.params.get(index).copied().unwrap_or(default)
    }

    /// Get parameter at index, treating both missing and 0 as `default`
    pub fn param_or_default(&self, index: usize, default: u16) -> u16 {
        match self.params.get(index).copied() {
            None | Some(0) => default,
            Some(value) => value,
        }
    }

    /// Check for a CSI sequence with the given final character
    pub fn is_csi(&self, final_char: char) -> bool {
        self.kind == SequenceKind::Csi && self.final_char == final_char
    }
}

/// A unit of tokenized text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// A printable character
    Text(char),
    /// A control character other than ESC (C0, DEL, C1)
    Control(char),
    /// A complete escape sequence
    Escape(Sequence<'a>),
    /// An escape sequence that was interrupted or never terminated
    Unterminated(&'a str),
}

/// Iterator over the tokens of a string
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    /// Create a tokenizer over `input`
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Scan an escape sequence starting at the current position (an ESC)
    fn scan_sequence(&mut self) -> Token<'a> {
        let input = self.input;
        let start = self.pos;
        let mut state = State::Escape;
        let mut params = Vec::new();
        let mut current_param: u16 = 0;
        let mut param_has_digit = false;
        let mut private_marker = None;
        let mut intermediates = Vec::new();

        for (offset, c) in input[start..].char_indices().skip(1) {
            let at = start + offset;
            let end = at + c.len_utf8();

            let kind = match state {
                State::Escape => match c {
                    '[' => {
                        state = State::CsiEntry;
                        continue;
                    }
                    ']' => {
                        state = State::OscString;
                        continue;
                    }
                    '\x20'..='\x2f' => {
                        intermediates.push(c);
                        state = State::EscapeIntermediate;
                        continue;
                    }
                    '\x30'..='\x7e' => SequenceKind::Esc,
                    _ => return self.abort(at),
                },
                State::EscapeIntermediate => match c {
                    '\x20'..='\x2f' => {
                        intermediates.push(c);
                        continue;
                    }
                    '\x30'..='\x7e' => SequenceKind::Esc,
                    _ => return self.abort(at),
                },
                State::CsiEntry | State::CsiParam => match c {
                    '?' | '>' | '<' | '=' if state == State::CsiEntry => {
                        private_marker = Some(c);
                        state = State::CsiParam;
                        continue;
                    }
                    '0'..='9' => {
                        let digit = c as u16 - '0' as u16;
                        current_param = current_param.saturating_mul(10).saturating_add(digit);
                        param_has_digit = true;
                        state = State::CsiParam;
                        continue;
                    }
                    ';' | ':' => {
                        params.push(current_param);
                        current_param = 0;
                        param_has_digit = false;
                        state = State::CsiParam;
                        continue;
                    }
                    '\x20'..='\x2f' => {
                        intermediates.push(c);
                        state = State::CsiIntermediate;
                        continue;
                    }
                    '\x40'..='\x7e' => SequenceKind::Csi,
                    _ => return self.abort(at),
                },
                State::CsiIntermediate => match c {
                    '\x20'..='\x2f' => {
                        intermediates.push(c);
                        continue;
                    }
                    '\x40'..='\x7e' => SequenceKind::Csi,
                    _ => return self.abort(at),
                },
                State::OscString => match c {
                    '\x07' => SequenceKind::Osc,
                    ESC => {
                        state = State::OscEscape;
                        continue;
                    }
                    _ => continue,
                },
                State::OscEscape => match c {
                    '\\' => SequenceKind::Osc,
                    // The ESC starts a new sequence
                    _ => return self.abort(at - ESC.len_utf8()),
                },
            };

            if kind == SequenceKind::Csi && (param_has_digit || !params.is_empty()) {
                params.push(current_param);
            }

            self.pos = end;
            return Token::Escape(Sequence {
                raw: &input[start..end],
                kind,
                params,
                private_marker,
                intermediates,
                final_char: c,
            });
        }

        self.abort(input.len())
    }

    /// Yield everything from the sequence start up to `at` as unterminated
    fn abort(&mut self, at: usize) -> Token<'a> {
        let input = self.input;
        let start = self.pos;
        self.pos = at;
        Token::Unterminated(&input[start..at])
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let c = self.input[self.pos..].chars().next()?;

        if c == ESC {
            return Some(self.scan_sequence());
        }

        self.pos += c.len_utf8();
        if c.is_control() {
            Some(Token::Control(c))
        } else {
            Some(Token::Text(c))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Vec<Token<'_>> {
        Tokens::new(input).collect()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(collect("ab"), vec![Token::Text('a'), Token::Text('b')]);
    }

    #[test]
    fn test_controls() {
        assert_eq!(
            collect("a\rb\x07"),
            vec![
                Token::Text('a'),
                Token::Control('\r'),
                Token::Text('b'),
                Token::Control('\x07'),
            ]
        );
    }

    #[test]
    fn test_sgr_sequence() {
        let tokens = collect("\x1b[1;31mX");
        assert_eq!(tokens.len(), 2);
        match &tokens[0] {
            Token::Escape(seq) => {
                assert_eq!(seq.raw, "\x1b[1;31m");
                assert_eq!(seq.kind, SequenceKind::Csi);
                assert_eq!(seq.params, vec![1, 31]);
                assert_eq!(seq.final_char, 'm');
            }
            other => panic!("expected escape, got {:?}", other),
        }
        assert_eq!(tokens[1], Token::Text('X'));
    }

    #[test]
    fn test_csi_without_params() {
        match &collect("\x1b[K")[0] {
            Token::Escape(seq) => {
                assert!(seq.is_csi('K'));
                assert!(seq.params.is_empty());
                assert_eq!(seq.param_or_default(0, 1), 1);
            }
            other => panic!("expected escape, got {:?}", other),
        }
    }

    #[test]
    fn test_csi_empty_params() {
        match &collect("\x1b[;5H")[0] {
            Token::Escape(seq) => assert_eq!(seq.params, vec![0, 5]),
            other => panic!("expected escape, got {:?}", other),
        }
    }

    #[test]
    fn test_private_marker() {
        match &collect("\x1b[?25l")[0] {
            Token::Escape(seq) => {
                assert_eq!(seq.private_marker, Some('?'));
                assert_eq!(seq.params, vec![25]);
                assert_eq!(seq.final_char, 'l');
            }
            other => panic!("expected escape, got {:?}", other),
        }
    }

    #[test]
    fn test_esc_two_char() {
        match &collect("\x1b7")[0] {
            Token::Escape(seq) => {
                assert_eq!(seq.kind, SequenceKind::Esc);
                assert_eq!(seq.final_char, '7');
            }
            other => panic!("expected escape, got {:?}", other),
        }
    }

    #[test]
    fn test_osc_bel_and_st() {
        let tokens = collect("\x1b]0;title\x07\x1b]8;;http://x\x1b\\z");
        assert_eq!(tokens.len(), 3);
        assert!(matches!(&tokens[0], Token::Escape(s) if s.raw == "\x1b]0;title\x07"));
        assert!(matches!(&tokens[1], Token::Escape(s) if s.raw == "\x1b]8;;http://x\x1b\\"));
        assert_eq!(tokens[2], Token::Text('z'));
    }

    #[test]
    fn test_unterminated_at_end() {
        assert_eq!(
            collect("a\x1b[31"),
            vec![Token::Text('a'), Token::Unterminated("\x1b[31")]
        );
        assert_eq!(collect("\x1b"), vec![Token::Unterminated("\x1b")]);
    }

    #[test]
    fn test_interrupted_by_escape() {
        let tokens = collect("\x1b[31\x1b[0m");
        assert_eq!(tokens[0], Token::Unterminated("\x1b[31"));
        assert!(matches!(&tokens[1], Token::Escape(s) if s.raw == "\x1b[0m"));
    }

    #[test]
    fn test_interrupted_by_text() {
        let tokens = collect("\x1b[3é");
        assert_eq!(tokens, vec![Token::Unterminated("\x1b[3"), Token::Text('é')]);
    }

    #[test]
    fn test_every_char_accounted_for() {
        let input = "x\x1b[1mé\x1b]2;t\x07\x1b[9\x1b(B\x1b";
        let rebuilt: String = collect(input)
            .into_iter()
            .map(|t| match t {
                Token::Text(c) | Token::Control(c) => c.to_string(),
                Token::Escape(s) => s.raw.to_string(),
                Token::Unterminated(raw) => raw.to_string(),
            })
            .collect();
        assert_eq!(rebuilt, input);
    }
}
