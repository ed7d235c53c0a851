use std::collections::VecDeque;
use std::io::{self, stdin, stdout, IsTerminal, Read, Stdout, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEvent},
    terminal,
};

use crate::console::Console;
use crate::interrupt::Interrupt;

/// Longest a blocking read waits before checking the interrupt again.
const READ_TICK: Duration = Duration::from_millis(50);

/// Similar to [`crossterm::event::KeyCode`] but only contains relevant information.
#[derive(Debug, PartialEq, Eq)]
enum Key {
    /// `Ctrl+C`.
    Interrupt,
    Char(char),
    /// Raw byte for keys without a printable character.
    Byte(u8),
}

/// Host console for one run.
///
/// If stdin is an interactive terminal, it is switched to raw mode for as long as this value
/// lives, and restored when dropped. Otherwise stdin is read as a plain byte stream by a
/// background thread, so it can be polled without blocking.
pub struct Terminal {
    input: Input,
    out: Stdout,
    /// Input bytes already read from the terminal, not yet consumed.
    pending: VecDeque<u8>,
    interrupt: Interrupt,
}

enum Input {
    Raw,
    /// Disconnects at end of input.
    Piped(Receiver<u8>),
}

impl Terminal {
    /// Start a console session. `Ctrl+C` raises `interrupt`.
    pub fn open(interrupt: Interrupt) -> io::Result<Self> {
        let input = if stdin().is_terminal() {
            terminal::enable_raw_mode()?;
            Input::Raw
        } else {
            Input::Piped(spawn_reader())
        };
        Ok(Terminal {
            input,
            out: stdout(),
            pending: VecDeque::new(),
            interrupt,
        })
    }

    pub fn is_raw(&self) -> bool {
        matches!(self.input, Input::Raw)
    }

    /// Read terminal events into `pending`.
    ///
    /// Waits up to `timeout` for the first event, or forever if `None`. Returns once no more
    /// events are immediately available.
    fn fill_pending(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        if let Some(timeout) = timeout {
            if !event::poll(timeout)? {
                return Ok(());
            }
        }
        loop {
            if let Ok(key) = Key::try_from(event::read()?) {
                match key {
                    Key::Interrupt => {
                        self.interrupt.raise();
                        return Ok(());
                    }
                    Key::Char(ch) => {
                        let mut bytes = [0u8; 4];
                        self.pending
                            .extend(ch.encode_utf8(&mut bytes).as_bytes().iter().copied());
                    }
                    Key::Byte(byte) => self.pending.push_back(byte),
                }
            }
            if !event::poll(Duration::ZERO)? {
                return Ok(());
            }
        }
    }
}

impl Console for Terminal {
    fn poll_byte(&mut self) -> Option<u8> {
        if let Input::Piped(bytes) = &self.input {
            return bytes.try_recv().ok();
        }
        if self.pending.is_empty() {
            // Terminal read failure reads as no input
            let _ = self.fill_pending(Some(Duration::ZERO));
        }
        self.pending.pop_front()
    }

    fn read_byte(&mut self) -> Option<u8> {
        if let Input::Piped(bytes) = &self.input {
            loop {
                if self.interrupt.is_raised() {
                    return None;
                }
                match bytes.recv_timeout(READ_TICK) {
                    Ok(byte) => return Some(byte),
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => return None,
                }
            }
        }
        while self.pending.is_empty() {
            if self.interrupt.is_raised() || self.fill_pending(Some(READ_TICK)).is_err() {
                return None;
            }
        }
        self.pending.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        if !self.is_raw() {
            return self.out.write_all(bytes);
        }
        // Raw mode disables output post-processing
        for line in bytes.split_inclusive(|&byte| byte == b'\n') {
            match line.split_last() {
                Some((b'\n', rest)) => {
                    self.out.write_all(rest)?;
                    self.out.write_all(b"\r\n")?;
                }
                _ => self.out.write_all(line)?,
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn poll_events(&mut self) -> io::Result<()> {
        if self.is_raw() {
            self.fill_pending(Some(Duration::ZERO))?;
        }
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.out.flush();
        if self.is_raw() {
            let _ = terminal::disable_raw_mode();
        }
    }
}

/// Forward stdin bytes over a channel until end of input.
fn spawn_reader() -> Receiver<u8> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = [0u8; 256];
        let mut input = stdin().lock();
        loop {
            match input.read(&mut buf) {
                Ok(0) => break,
                Ok(len) => {
                    if buf[..len].iter().any(|&byte| tx.send(byte).is_err()) {
                        break;
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
    });
    rx
}

impl TryFrom<Event> for Key {
    type Error = ();
    fn try_from(event: Event) -> Result<Self, Self::Error> {
        if let Event::Key(event) = event {
            if let Ok(key) = event.try_into() {
                return Ok(key);
            }
        }
        Err(())
    }
}

impl TryFrom<KeyEvent> for Key {
    type Error = ();
    fn try_from(event: KeyEvent) -> Result<Self, Self::Error> {
        use event::{KeyCode, KeyEventKind, KeyModifiers as Mod};

        if matches!(event.kind, KeyEventKind::Release) {
            return Err(());
        }

        let key = match (event.modifiers, event.code) {
            (Mod::CONTROL, KeyCode::Char('c')) => Key::Interrupt,
            // Control codes, eg. Ctrl+D -> 0x04
            (Mod::CONTROL, KeyCode::Char(ch)) if ch.is_ascii_alphabetic() => {
                Key::Byte(ch.to_ascii_lowercase() as u8 & 0x1F)
            }

            (_, KeyCode::Enter) => Key::Byte(b'\n'),
            (_, KeyCode::Tab) => Key::Byte(b'\t'),
            (_, KeyCode::Backspace) => Key::Byte(0x7F),
            (_, KeyCode::Esc) => Key::Byte(0x1B),

            (Mod::NONE | Mod::SHIFT, KeyCode::Char(ch)) => Key::Char(ch),

            _ => return Err(()),
        };

        Ok(key)
    }
}
