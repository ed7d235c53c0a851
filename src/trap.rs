use colored::Colorize;

use crate::console::Console;
use crate::error::VmError;
use crate::memory::{Memory, MEMORY_MAX};
use crate::registers::Registers;

/// Value placed in R0 when input is exhausted.
pub const EOF: u16 = 0xFFFF;

pub const GETC: u8 = 0x20;
pub const OUT: u8 = 0x21;
pub const PUTS: u8 = 0x22;
pub const IN: u8 = 0x23;
pub const PUTSP: u8 = 0x24;
pub const HALT: u8 = 0x25;

/// Whether execution continues after a trap routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// Run the service routine for `vect`.
///
/// `R7` is not set to the return address. Unknown vectors do nothing.
pub fn trap(
    vect: u8,
    regs: &mut Registers,
    mem: &Memory,
    console: &mut dyn Console,
) -> Result<Flow, VmError> {
    match vect {
        GETC => {
            let ch = console.read_byte().map_or(EOF, u16::from);
            regs.define(0, ch);
        }
        OUT => {
            let ch = (regs.get(0) & 0xFF) as u8;
            console.write(&[ch])?;
            console.flush()?;
        }
        PUTS => {
            for chr in string(mem, regs.get(0)) {
                console.write(&[(chr & 0xFF) as u8])?;
            }
            console.flush()?;
        }
        IN => {
            console.write_str("Enter a character: ")?;
            console.flush()?;
            let ch = console.read_byte();
            if let Some(ch) = ch {
                console.write(&[ch])?;
                console.flush()?;
            }
            regs.define(0, ch.map_or(EOF, u16::from));
        }
        PUTSP => {
            for chr in string(mem, regs.get(0)) {
                console.write(&[(chr & 0xFF) as u8])?;
                let high = (chr >> 8) as u8;
                if high != 0 {
                    console.write(&[high])?;
                }
            }
            console.flush()?;
        }
        HALT => {
            console.write_str(&format!("\n{:>12}\n", "Halted".cyan()))?;
            console.flush()?;
            return Ok(Flow::Halt);
        }
        _ => (),
    }
    Ok(Flow::Continue)
}

/// Words from `start` up to the first zero word, wrapping at the end of memory.
fn string(mem: &Memory, start: u16) -> impl Iterator<Item = u16> + '_ {
    (0..MEMORY_MAX)
        .map(move |i| mem.peek(start.wrapping_add(i as u16)))
        .take_while(|&chr| chr != 0)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::console::BufferConsole;
    use crate::registers::Flag;

    fn setup(words: &[u16]) -> (Registers, Memory) {
        let mut mem = Memory::new();
        mem.copy_from(0x4000, words);
        let mut regs = Registers::new();
        regs.set(0, 0x4000);
        (regs, mem)
    }

    #[test]
    fn puts() {
        let (mut regs, mem) = setup(&[0x48, 0x69, 0x00, 0x21]);
        let mut console = BufferConsole::new();
        let flow = trap(PUTS, &mut regs, &mem, &mut console).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(console.output(), b"Hi");
        // Flags untouched
        assert_eq!(regs.flag, Flag::Z);
    }

    #[test]
    fn puts_uses_low_byte() {
        let (mut regs, mem) = setup(&[0x4148, 0x00]);
        let mut console = BufferConsole::new();
        trap(PUTS, &mut regs, &mem, &mut console).unwrap();
        assert_eq!(console.output(), b"H");
    }

    #[test]
    fn putsp() {
        // "Hello" packed low byte first
        let (mut regs, mem) = setup(&[0x6548, 0x6c6c, 0x006f, 0x0000, 0x4141]);
        let mut console = BufferConsole::new();
        trap(PUTSP, &mut regs, &mem, &mut console).unwrap();
        assert_eq!(console.output(), b"Hello");
    }

    #[test]
    fn out() {
        let mut regs = Registers::new();
        regs.set(0, 0x1241);
        let mut console = BufferConsole::new();
        trap(OUT, &mut regs, &Memory::new(), &mut console).unwrap();
        assert_eq!(console.output(), b"A");
    }

    #[test]
    fn getc() {
        let mut regs = Registers::new();
        let mut console = BufferConsole::with_input("q");
        trap(GETC, &mut regs, &Memory::new(), &mut console).unwrap();
        assert_eq!(regs.get(0), b'q' as u16);
        assert_eq!(regs.flag, Flag::P);
        // No echo
        assert!(console.output().is_empty());
    }

    #[test]
    fn getc_end_of_input() {
        let mut regs = Registers::new();
        let mut console = BufferConsole::new();
        trap(GETC, &mut regs, &Memory::new(), &mut console).unwrap();
        assert_eq!(regs.get(0), EOF);
        assert_eq!(regs.flag, Flag::N);
    }

    #[test]
    fn in_echoes() {
        let mut regs = Registers::new();
        let mut console = BufferConsole::with_input("z");
        trap(IN, &mut regs, &Memory::new(), &mut console).unwrap();
        assert_eq!(regs.get(0), b'z' as u16);
        assert_eq!(regs.flag, Flag::P);
        assert_eq!(console.output_str(), "Enter a character: z");
    }

    #[test]
    fn halt() {
        let mut regs = Registers::new();
        let mut console = BufferConsole::new();
        let flow = trap(HALT, &mut regs, &Memory::new(), &mut console).unwrap();
        assert_eq!(flow, Flow::Halt);
        assert!(console.output_str().contains("Halted"));
    }

    #[test]
    fn unknown_vector() {
        let mut regs = Registers::new();
        let mut console = BufferConsole::new();
        let flow = trap(0x30, &mut regs, &Memory::new(), &mut console).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(regs, Registers::new());
        assert!(console.output().is_empty());
    }
}
