// Machine
mod decode;
pub use decode::{s_ext, Instruction, Operand};
mod memory;
pub use memory::{Memory, KBDR, KBSR, MEMORY_MAX};
mod registers;
pub use registers::{Flag, Registers, PC_START};
mod loader;
pub use loader::{load_image, Image};
pub mod trap;

// Running
mod runtime;
pub use runtime::{Exit, Interpreter, State};
mod interrupt;
pub use interrupt::Interrupt;

// Host
mod console;
pub use console::{BufferConsole, Console};
mod term;
pub use term::Terminal;
pub mod output;

mod error;
pub use error::{LoadError, VmError};
