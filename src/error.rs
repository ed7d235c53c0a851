use std::io;

use miette::Diagnostic;
use thiserror::Error;

/// Image could not be placed into memory. The run never starts.
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("Image is empty and has no origin word")]
    #[diagnostic(
        code(load::empty),
        help("an image starts with a big-endian origin word, eg. 0x3000")
    )]
    Empty,

    #[error("Image of {words} words does not fit in memory when loaded at 0x{origin:04x}")]
    #[diagnostic(
        code(load::too_long),
        help("origin + word count must not exceed 65536 words")
    )]
    TooLong { origin: u16, words: usize },
}

/// Fatal condition raised while executing.
#[derive(Debug, Error, Diagnostic)]
pub enum VmError {
    #[error("Encountered an illegal opcode 0x{opcode:x} in instruction 0x{instr:04x} at 0x{addr:04x}")]
    #[diagnostic(
        code(vm::illegal_opcode),
        help("opcodes 0x8 (RTI) and 0xD (reserved) cannot be executed")
    )]
    IllegalOpcode { opcode: u16, instr: u16, addr: u16 },

    #[error("Failed to write to console")]
    #[diagnostic(code(vm::console))]
    Io(#[from] io::Error),
}
