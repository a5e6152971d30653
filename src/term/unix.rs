//! Raw-mode cursor position query (Unix)

use std::io::{self, IsTerminal, Read, Write};

use nix::sys::termios::{self, LocalFlags, SetArg, SpecialCharacterIndices, Termios};

use super::{parse_cursor_report, REPORT_CURSOR};

/// Longest reply accepted before giving up (`ESC [ 65535 ; 65535 R` fits)
const MAX_REPLY: usize = 32;

/// Read timeout in tenths of a second (VTIME)
const READ_TIMEOUT: u8 = 5;

/// RAII guard for non-canonical, no-echo input mode
struct RawModeGuard {
    original: Termios,
}

impl RawModeGuard {
    fn new() -> io::Result<Self> {
        let original = termios::tcgetattr(io::stdin()).map_err(io::Error::from)?;

        let mut raw = original.clone();

        // Deliver bytes immediately and keep the report off the screen
        raw.local_flags.remove(LocalFlags::ICANON);
        raw.local_flags.remove(LocalFlags::ECHO);

        // Return after the first byte or once the timeout expires
        raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 0;
        raw.control_chars[SpecialCharacterIndices::VTIME as usize] = READ_TIMEOUT;

        termios::tcsetattr(io::stdin(), SetArg::TCSANOW, &raw).map_err(io::Error::from)?;

        Ok(Self { original })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = termios::tcsetattr(io::stdin(), SetArg::TCSANOW, &self.original);
    }
}

pub(super) fn query_cursor_position() -> io::Result<Option<(u16, u16)>> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(None);
    }

    let _guard = RawModeGuard::new()?;

    let mut stdout = io::stdout();
    stdout.write_all(REPORT_CURSOR.as_bytes())?;
    stdout.flush()?;

    let mut reply = Vec::with_capacity(MAX_REPLY);
    let mut byte = [0u8; 1];
    let mut input = stdin.lock();

    while reply.len() < MAX_REPLY {
        match input.read(&mut byte)? {
            0 => break,
            _ => {
                reply.push(byte[0]);
                if byte[0] == b'R' {
                    break;
                }
            }
        }
    }

    let position = parse_cursor_report(&String::from_utf8_lossy(&reply));
    tracing::debug!(?position, "Cursor position report");
    Ok(position)
}
