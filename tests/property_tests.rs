//! Property-based tests for wrapping, escape handling and redraw.
//!
//! 1. Height is the visible width divided by the row width, rounded up, at
//!    least 1, and matches the rows a terminal actually uses.
//! 2. Escape sequences are never split across rows.
//! 3. After any mix of prints and updates, the screen shows the same thing
//!    as printing the final contents once.
//! 4. The cursor always ends up on the row below the log.
//! 5. Integer targets wrap around the history.

use std::io;

use linelog::ansi::{self, Token};
use linelog::core::History;
use linelog::headless::Screen;
use linelog::render::Renderer;
use linelog::{Category, Config, Session, Target};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Printable ASCII runs mixed with SGR sequences
fn styled_text() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        3 => "[ -~]{1,12}",
        1 => (0u8..108).prop_map(|code| format!("\x1b[{}m", code)),
        1 => Just("\x1b[1;32m".to_string()),
    ];
    prop::collection::vec(piece, 0..8).prop_map(|pieces| pieces.concat())
}

fn category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Print),
        Just(Category::Status),
        Just(Category::Info),
        Just(Category::Warn),
        Just(Category::Fatal),
        Just(Category::Error),
        Just(Category::Debug),
    ]
}

/// Styled text with stray control characters, possibly ending in a cut-off
/// sequence
fn messy_text() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        3 => styled_text(),
        1 => prop::sample::select(vec!["\x08", "\x0b", "\x0c", "\x07", "\t", "\r\n"])
            .prop_map(str::to_string),
    ];
    let tail = prop_oneof![Just(""), Just("\x1b[3"), Just("\x1b]0;ti")];
    (prop::collection::vec(piece, 0..4), tail)
        .prop_map(|(pieces, tail)| format!("{}{}", pieces.concat(), tail))
}

#[derive(Debug, Clone)]
enum Op {
    Print(Category, String),
    Update(isize, String),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (category(), messy_text()).prop_map(|(c, s)| Op::Print(c, s)),
        (-10isize..10, messy_text()).prop_map(|(i, s)| Op::Update(i, s)),
    ]
}

fn session(width: usize, color: bool) -> Session<Vec<u8>, io::Empty> {
    let config = Config {
        message_width: width,
        color,
        ..Default::default()
    };
    Session::new(Vec::new(), io::empty(), config)
}

fn screen_of(session: &Session<Vec<u8>, io::Empty>, cols: usize) -> Screen {
    let mut screen = Screen::new(cols, 1000);
    session.with_output(|out| screen.feed_bytes(out));
    screen
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Height
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn height_is_rounded_up_row_count(text in styled_text(), width in 1usize..60) {
        let rendered = Renderer::new(width).render_parts(Category::Print, &text);
        let visible = ansi::visible_width(&text);
        prop_assert_eq!(rendered.lines, ((visible + width - 1) / width).max(1));
    }

    #[test]
    fn height_matches_screen_rows(
        category in category(),
        text in messy_text(),
        width in 1usize..30,
        color in any::<bool>(),
    ) {
        let rendered = Renderer::new(width).with_color(color).render_parts(category, &text);
        let mut screen = Screen::new(width, 500);
        screen.feed(&rendered.text);
        screen.feed("\n");
        prop_assert_eq!(screen.cursor_row(), rendered.lines);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Escape atomicity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rows_never_split_escapes(text in styled_text(), width in 1usize..30) {
        let rendered = Renderer::new(width).render_parts(Category::Print, &text);
        let rows: Vec<&str> = rendered.text.split('\n').collect();
        prop_assert_eq!(rows.len(), rendered.lines);
        for row in rows {
            prop_assert!(
                ansi::tokenize(row).all(|token| !matches!(token, Token::Unterminated(_))),
                "row {:?} contains a partial escape",
                row
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3-4. Redraw converges to a fresh print
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn redraws_match_fresh_print(
        ops in prop::collection::vec(op(), 1..16),
        width in 4usize..40,
        color in any::<bool>(),
    ) {
        let live = session(width, color);
        for op in &ops {
            match op {
                Op::Print(category, text) => {
                    live.log(*category, text.as_str()).unwrap();
                }
                Op::Update(index, text) => {
                    live.update(*index, text.as_str()).unwrap();
                }
            }
        }

        let fresh = session(width, color);
        for message in live.messages() {
            fresh.log(message.category(), message.content()).unwrap();
        }

        let live_screen = screen_of(&live, width);
        let fresh_screen = screen_of(&fresh, width);
        prop_assert_eq!(live_screen.lines(), fresh_screen.lines());
        prop_assert_eq!(live_screen.cursor_row(), live.total_lines());
        prop_assert_eq!(live_screen.cursor_col(), 0);
        prop_assert_eq!(live.total_lines(), fresh.total_lines());
    }

    #[test]
    fn repaint_after_settling_does_not_cascade(
        texts in prop::collection::vec(styled_text(), 1..8),
        target in 0usize..8,
        width in 10usize..40,
    ) {
        let session = session(width, false);
        for text in &texts {
            session.print(text.as_str()).unwrap();
        }
        let before = session.total_lines();

        let report = session.repaint(target as isize).unwrap().unwrap();
        prop_assert_eq!(report.old_lines, report.new_lines);
        prop_assert_eq!(report.cascaded, 0);
        prop_assert_eq!(session.total_lines(), before);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Target resolution
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn integer_targets_wrap(len in 1usize..20, index in -100isize..100) {
        let mut history = History::new();
        for i in 0..len {
            history.append(format!("m{}", i), Category::Print);
        }

        let resolved = history.resolve(Target::Index(index));
        prop_assert_eq!(resolved, Some(index.rem_euclid(len as isize) as usize));
        prop_assert_eq!(history.resolve(Target::Index(-1)), Some(len - 1));
        prop_assert_eq!(history.resolve(Target::Index(len as isize)), Some(0));
    }

    #[test]
    fn offset_counts_rows_from_target_to_bottom(
        texts in prop::collection::vec(styled_text(), 1..10),
        width in 1usize..30,
    ) {
        let session = session(width, true);
        for text in &texts {
            session.print(text.as_str()).unwrap();
        }
        let messages = session.messages();

        for index in 0..messages.len() {
            let expected: usize = messages[index..].iter().map(|m| m.rendered_lines()).sum();
            let report = session.repaint(index as isize).unwrap().unwrap();
            prop_assert_eq!(report.offset, expected);
        }
    }
}
