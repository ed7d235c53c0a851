use crate::console::Console;

/// LC3 can address 128KB of memory.
pub const MEMORY_MAX: usize = 0x10000;

/// Keyboard status register. Bit 15 is set when a character is ready.
pub const KBSR: u16 = 0xFE00;
/// Keyboard data register. Low byte holds the pending character.
pub const KBDR: u16 = 0xFE02;

/// Flat 64K-word address space, with the keyboard registers overlaid.
pub struct Memory {
    words: Box<[u16]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Zeroed memory.
    pub fn new() -> Self {
        Memory {
            words: vec![0; MEMORY_MAX].into_boxed_slice(),
        }
    }

    /// Read a word as the processor does.
    ///
    /// Reading `KBSR` polls the console first: a pending character sets bit 15 of `KBSR` and is
    /// stored in `KBDR`, otherwise `KBSR` is cleared.
    pub fn read(&mut self, addr: u16, console: &mut dyn Console) -> u16 {
        if addr == KBSR {
            match console.poll_byte() {
                Some(ch) => {
                    self.write(KBSR, 1 << 15);
                    self.write(KBDR, ch as u16);
                }
                None => self.write(KBSR, 0),
            }
        }
        self.peek(addr)
    }

    /// Read a word without any device side effects.
    #[inline]
    pub fn peek(&self, addr: u16) -> u16 {
        self.words[addr as usize]
    }

    /// Plain store, including to the device addresses.
    #[inline]
    pub fn write(&mut self, addr: u16, val: u16) {
        self.words[addr as usize] = val;
    }

    /// Copy `words` into memory starting at `orig`.
    ///
    /// Caller must ensure the range fits.
    pub(crate) fn copy_from(&mut self, orig: u16, words: &[u16]) {
        let orig = orig as usize;
        self.words[orig..orig + words.len()].copy_from_slice(words);
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.words
    }
}
