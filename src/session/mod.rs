//! Log sessions
//!
//! A [`Session`] owns everything a redraw needs: the history, the renderer,
//! the output stream and the prompt input. All of it sits behind a single
//! mutex, because the cursor position and the history order are one shared
//! resource: an append that slips in between measuring an offset and moving
//! the cursor would repaint the wrong rows.
//!
//! Every operation is synchronous and holds the lock for its whole
//! sequence of writes. Writes are assumed not to block indefinitely, which
//! holds for a local terminal but not necessarily for a pipe or a remote
//! stream.

mod progress;
mod prompt;
mod redraw;

pub use progress::{progress_line, BAR_WIDTH};
pub use prompt::{PromptKind, Response};
pub use redraw::Redraw;

use std::io::{self, BufRead, BufReader, IsTerminal, Stdin, Stdout, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::Config;
use crate::core::{Category, Handle, History, Message, Target};
use crate::error::{Error, Result};
use crate::format::{self, Value};
use crate::render::Renderer;
use crate::term::Terminal;

/// A log stream on one output device
#[derive(Debug)]
pub struct Session<W: Write = Stdout, R: BufRead = BufReader<Stdin>> {
    inner: Mutex<Inner<W, R>>,
}

/// State guarded by the session lock
#[derive(Debug)]
struct Inner<W: Write, R> {
    history: History,
    renderer: Renderer,
    terminal: Terminal<W>,
    input: R,
    /// Whether the input device echoes the Enter key of a prompt answer
    echo: bool,
}

impl Session {
    /// Session on stdout, reading prompt answers from stdin
    pub fn stdio(config: Config) -> Self {
        let echo = config
            .input_echo
            .unwrap_or_else(|| io::stdin().is_terminal());
        Self::with_echo(io::stdout(), BufReader::new(io::stdin()), &config, echo)
    }
}

impl<W: Write, R: BufRead> Session<W, R> {
    /// Session on arbitrary streams. Unless configured, the input is
    /// assumed not to echo.
    pub fn new(output: W, input: R, config: Config) -> Self {
        let echo = config.input_echo.unwrap_or(false);
        Self::with_echo(output, input, &config, echo)
    }

    fn with_echo(output: W, input: R, config: &Config, echo: bool) -> Self {
        let renderer = Renderer::new(config.message_width).with_color(config.color);
        Self {
            inner: Mutex::new(Inner {
                history: History::new(),
                renderer,
                terminal: Terminal::new(output),
                input,
                echo,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<W, R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Print a message at the bottom of the log
    pub fn log(&self, category: Category, content: impl Into<String>) -> Result<Handle> {
        Ok(self.lock().append(category, content.into())?)
    }

    /// Print a message built from a template and its values
    pub fn log_fmt(&self, category: Category, template: &str, values: &[Value]) -> Result<Handle> {
        let content = format::format(template, values)?;
        self.log(category, content)
    }

    /// Print plain output
    pub fn print(&self, content: impl Into<String>) -> Result<Handle> {
        self.log(Category::Print, content)
    }

    pub fn info(&self, content: impl Into<String>) -> Result<Handle> {
        self.log(Category::Info, content)
    }

    pub fn warn(&self, content: impl Into<String>) -> Result<Handle> {
        self.log(Category::Warn, content)
    }

    pub fn debug(&self, content: impl Into<String>) -> Result<Handle> {
        self.log(Category::Debug, content)
    }

    /// Print a status line, to be changed later with [`Session::update`]
    pub fn status(&self, content: impl Into<String>) -> Result<Handle> {
        self.log(Category::Status, content)
    }

    /// Print an error message and return the fault for the caller to
    /// propagate, e.g. `return Err(session.error("disk full"))`.
    ///
    /// If the message could not be written, the write error is returned
    /// instead.
    pub fn error(&self, content: impl Into<String>) -> Error {
        let mut inner = self.lock();
        match inner.append(Category::Error, content.into()) {
            Ok(handle) => Error::Reported {
                message: inner
                    .history
                    .get(handle.index())
                    .map(|m| m.content().to_string())
                    .unwrap_or_default(),
                handle,
            },
            Err(e) => e.into(),
        }
    }

    /// Print a fatal message and exit the process with status 1
    pub fn fatal(&self, content: impl Into<String>) -> ! {
        let content = content.into();
        if let Err(e) = self.log(Category::Fatal, content.as_str()) {
            tracing::error!("Failed to write fatal message: {}", e);
        }
        tracing::error!("Fatal: {}", content);
        std::process::exit(1)
    }

    /// Replace the content of a printed message and redraw it in place.
    ///
    /// A target that does not resolve falls back to the most recent
    /// message. Returns `None` when nothing has been printed yet.
    pub fn update(&self, target: impl Into<Target>, content: impl Into<String>) -> Result<Option<Redraw>> {
        Ok(self.lock().redraw(target.into(), Some(content.into()))?)
    }

    /// Redraw a printed message without changing it
    pub fn repaint(&self, target: impl Into<Target>) -> Result<Option<Redraw>> {
        Ok(self.lock().redraw(target.into(), None)?)
    }

    /// Resolve a target to a handle
    pub fn find(&self, target: impl Into<Target>) -> Option<Handle> {
        let inner = self.lock();
        inner
            .history
            .resolve(target.into())
            .and_then(|index| inner.history.handle(index))
    }

    /// Copy of a printed message
    pub fn message(&self, target: impl Into<Target>) -> Option<Message> {
        let inner = self.lock();
        inner
            .history
            .resolve(target.into())
            .and_then(|index| inner.history.get(index))
            .cloned()
    }

    /// Copy of every message, in print order
    pub fn messages(&self) -> Vec<Message> {
        self.lock().history.iter().cloned().collect()
    }

    /// Number of printed messages
    pub fn len(&self) -> usize {
        self.lock().history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().history.is_empty()
    }

    /// Rows the log occupies according to the history
    pub fn total_lines(&self) -> usize {
        self.lock().history.total_lines()
    }

    /// Wrap column
    pub fn width(&self) -> usize {
        self.lock().renderer.width()
    }

    /// Inspect the output stream
    pub fn with_output<T>(&self, f: impl FnOnce(&W) -> T) -> T {
        f(self.lock().terminal.get_ref())
    }

    /// Consume the session and return the output stream
    pub fn into_output(self) -> W {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .terminal
            .into_inner()
    }
}

impl<W: Write, R> Inner<W, R> {
    /// Append a message and draw it at the bottom
    fn append(&mut self, category: Category, content: String) -> io::Result<Handle> {
        let handle = self.history.append(content, category);
        let result = self.draw(handle.index()).and_then(|_| self.terminal.flush());
        tracing::trace!(
            index = handle.index(),
            lines = self.history.get(handle.index()).map_or(0, Message::rendered_lines),
            "appended message"
        );
        result.map(|()| handle)
    }

    /// Render message `index` at the cursor, end its last row, and record
    /// its height. The height is recorded even if the write fails.
    fn draw(&mut self, index: usize) -> io::Result<usize> {
        self.draw_rows(index, true)
    }

    fn draw_rows(&mut self, index: usize, end_row: bool) -> io::Result<usize> {
        let Some(message) = self.history.get(index) else {
            return Ok(0);
        };
        let rendered = self.renderer.render(message);

        let mut result = self.terminal.write_str(&rendered.text);
        if end_row && result.is_ok() {
            result = self.terminal.newline();
        }

        if let Some(message) = self.history.get_mut(index) {
            message.set_rendered_lines(rendered.lines);
        }

        result.map(|()| rendered.lines)
    }
}
