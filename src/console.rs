use std::collections::VecDeque;
use std::io;

/// Character device behind the keyboard registers and the I/O traps.
pub trait Console {
    /// Next pending input byte, without blocking.
    fn poll_byte(&mut self) -> Option<u8>;

    /// Block until an input byte is available.
    ///
    /// Returns `None` on end of input or if the run was cancelled while waiting.
    fn read_byte(&mut self) -> Option<u8>;

    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    /// Give the console a chance to notice cancellation while the program is not reading input.
    fn poll_events(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn write_str(&mut self, string: &str) -> io::Result<()> {
        self.write(string.as_bytes())
    }
}

/// In-memory console with scripted input and captured output.
#[derive(Debug, Default)]
pub struct BufferConsole {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: impl AsRef<[u8]>) -> Self {
        BufferConsole {
            input: input.as_ref().iter().copied().collect(),
            output: Vec::new(),
        }
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Output as text, with non-UTF-8 bytes replaced.
    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Input bytes not yet consumed.
    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl Console for BufferConsole {
    fn poll_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn buffer_console() {
        let mut console = BufferConsole::with_input("ab");
        assert_eq!(console.poll_byte(), Some(b'a'));
        assert_eq!(console.read_byte(), Some(b'b'));
        assert_eq!(console.read_byte(), None);
        assert_eq!(console.poll_byte(), None);

        console.write_str("Hi").unwrap();
        console.write(&[b'!']).unwrap();
        assert_eq!(console.output_str(), "Hi!");
    }
}
