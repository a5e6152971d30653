//! Prompts
//!
//! A prompt is printed like any other message but without ending its row,
//! so the answer is typed right after it. Once the answer is read, the
//! prompt is redrawn with the answer appended.

use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::core::{Category, Color, Handle, Style, Target};
use crate::error::{Error, Result};

use super::Session;

/// Kind of answer a prompt asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Free text
    Text,
    YesNo,
    YesNoCancel,
    YesNoCancelAll,
}

impl PromptKind {
    /// Text placed after the question
    pub fn suffix(self) -> String {
        let choices = match self {
            PromptKind::Text => return ": ".to_string(),
            PromptKind::YesNo => "yN",
            PromptKind::YesNoCancel => "yNc",
            PromptKind::YesNoCancelAll => "yNca",
        };
        format!(" [{}] ", Style::fg(Color::Yellow).paint(choices))
    }
}

/// A parsed answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Nothing was typed
    Empty,
    Yes,
    No,
    Cancel,
    All,
}

impl FromStr for Response {
    type Err = Error;

    fn from_str(answer: &str) -> Result<Self> {
        let answer = answer.trim();
        let is = |short: &str, long: &str| {
            answer.eq_ignore_ascii_case(short) || answer.eq_ignore_ascii_case(long)
        };

        if answer.is_empty() {
            Ok(Response::Empty)
        } else if is("y", "yes") {
            Ok(Response::Yes)
        } else if is("n", "no") {
            Ok(Response::No)
        } else if is("c", "cancel") {
            Ok(Response::Cancel)
        } else if is("a", "all") {
            Ok(Response::All)
        } else {
            Err(Error::UnrecognizedResponse(answer.to_string()))
        }
    }
}

impl<W: Write, R: BufRead> Session<W, R> {
    /// Ask a question and read one line of input.
    ///
    /// The session lock is held until the answer arrives: the cursor sits on
    /// the prompt row, and any other write would land there.
    pub fn prompt(&self, kind: PromptKind, question: impl Into<String>) -> Result<(String, Handle)> {
        let mut inner = self.lock();

        let text = format!("{}{}", question.into(), kind.suffix());
        let handle = inner.history.append(text.as_str(), Category::Prompt);

        // Drawn like any message, minus the newline that ends the row
        inner.draw_rows(handle.index(), false)?;
        inner.terminal.flush()?;

        let mut answer = String::new();
        inner.input.read_line(&mut answer)?;
        let answer = answer.trim_end_matches(&['\r', '\n'][..]).to_string();

        let answered = format!("{}{}", text, Style::fg(Color::Cyan).paint(&answer));
        let index = handle.index();
        if inner.echo {
            // The echoed answer follows the prompt and may have wrapped it
            // onto more rows; measure what is on screen before moving up
            let inner = &mut *inner;
            if let Some(message) = inner.history.get_mut(index) {
                message.set_content(answered.as_str());
                let rows = inner.renderer.render(message).lines;
                message.set_rendered_lines(rows);
            }
        } else {
            // The cursor has to end up below the prompt, as after any message
            inner.terminal.newline()?;
        }

        let content = (!inner.echo).then_some(answered);
        inner.redraw(Target::Handle(handle), content)?;

        Ok((answer, handle))
    }

    /// Ask a question and parse the answer
    pub fn ask(&self, kind: PromptKind, question: impl Into<String>) -> Result<(Response, Handle)> {
        let (answer, handle) = self.prompt(kind, question)?;
        Ok((answer.parse()?, handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use crate::ansi;
    use crate::config::Config;

    fn session(input: &str) -> Session<Vec<u8>, Cursor<Vec<u8>>> {
        let config = Config {
            message_width: 80,
            color: false,
            ..Default::default()
        };
        Session::new(Vec::new(), Cursor::new(input.as_bytes().to_vec()), config)
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(PromptKind::Text.suffix(), ": ");
        assert_eq!(ansi::strip(&PromptKind::YesNo.suffix()), " [yN] ");
        assert_eq!(ansi::strip(&PromptKind::YesNoCancelAll.suffix()), " [yNca] ");
    }

    #[test]
    fn test_parse_response() {
        assert_eq!("".parse::<Response>().unwrap(), Response::Empty);
        assert_eq!("Y".parse::<Response>().unwrap(), Response::Yes);
        assert_eq!("yes".parse::<Response>().unwrap(), Response::Yes);
        assert_eq!("No".parse::<Response>().unwrap(), Response::No);
        assert_eq!("cancel".parse::<Response>().unwrap(), Response::Cancel);
        assert_eq!("a".parse::<Response>().unwrap(), Response::All);
        assert!(matches!(
            "maybe".parse::<Response>(),
            Err(Error::UnrecognizedResponse(s)) if s == "maybe"
        ));
    }

    #[test]
    fn test_prompt_reads_answer_and_redraws() {
        let session = session("blue\n");
        let (answer, handle) = session.prompt(PromptKind::Text, "Favorite color").unwrap();
        assert_eq!(answer, "blue");
        let message = session.message(handle).unwrap();
        assert_eq!(ansi::strip(message.content()), "Favorite color: blue");
        assert_eq!(message.rendered_lines(), 1);
        assert_eq!(session.total_lines(), 1);
    }

    #[test]
    fn test_echoed_answer_wrapping_is_counted() {
        let config = Config {
            message_width: 20,
            color: false,
            input_echo: Some(true),
        };
        let answer = "abcdefghijklmnopqrstuvwxyz";
        let session = Session::new(Vec::new(), Cursor::new(format!("{}\n", answer).into_bytes()), config);

        let (_, handle) = session.prompt(PromptKind::Text, "Name").unwrap();
        assert_eq!(session.message(handle).unwrap().rendered_lines(), 2);
        assert_eq!(session.total_lines(), 2);

        let output = session.with_output(|out| String::from_utf8_lossy(out).into_owned());
        // No newline of our own: the terminal echoed the Enter key
        assert!(output.starts_with("\x1b[KName: \x1b[s"));
        assert!(output.contains("\r\x1b[2A\x1b[KName: abcdefghijklmn\n\x1b[Kopqrstuvwxyz\n\x1b[u"));
    }

    #[test]
    fn test_ask_parses() {
        let session = session("y\r\n");
        let (response, _) = session.ask(PromptKind::YesNo, "Continue?").unwrap();
        assert_eq!(response, Response::Yes);
    }

    #[test]
    fn test_ask_at_end_of_input_is_empty() {
        let session = session("");
        let (response, _) = session.ask(PromptKind::YesNoCancel, "Overwrite?").unwrap();
        assert_eq!(response, Response::Empty);
    }
}
