use std::cell::RefCell;
use std::fmt::Write;
use std::path::Path;

use colored::Colorize;

use crate::registers::Registers;

#[derive(Clone, Copy, Debug)]
pub enum MsgColor {
    Green,
    Cyan,
    Red,
}

thread_local! {
    static IS_MINIMAL: RefCell<bool> = const { RefCell::new(false) };
}

pub fn set_minimal(new_value: bool) -> bool {
    IS_MINIMAL.with(|value| value.replace(new_value))
}

pub fn is_minimal() -> bool {
    IS_MINIMAL.with(|value| *value.borrow())
}

/// Status line, eg. `     Running emitted binary`. Silent if `--minimal`.
pub fn message(color: MsgColor, left: &str, right: &str) {
    if is_minimal() {
        return;
    }
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Red => left.red(),
    };
    println!("{left:>12} {right}");
}

pub fn file_message(color: MsgColor, left: &str, right: &Path) {
    let right = format!("target {}", right.display());
    message(color, left, &right);
}

/// Register file, formatted as a table (or plain lines if `--minimal`).
pub fn format_registers(regs: &Registers) -> String {
    let mut out = String::new();
    if is_minimal() {
        for (i, reg) in regs.all().iter().enumerate() {
            let _ = writeln!(out, "R{} {}", i, reg);
        }
        let _ = writeln!(out, "PC {}", regs.pc);
        let _ = writeln!(out, "CC {:03b}", regs.flag.bits());
        return out;
    }

    out.push_str("\x1b[2m┌────────────────────────────────────┐\x1b[0m\n");
    out.push_str("\x1b[2m│        \x1b[3mhex     int    uint    char\x1b[0m\x1b[2m │\x1b[0m\n");
    for (i, reg) in regs.all().iter().enumerate() {
        let _ = write!(out, "\x1b[2m│\x1b[0m \x1b[1mR{}\x1b[0m  ", i);
        out.push_str(&format_integer(*reg));
        out.push_str(" \x1b[2m│\x1b[0m\n");
    }
    let _ = write!(
        out,
        "\x1b[2m│\x1b[0m \x1b[1mPC\x1b[0m  0x{:04x}                 \x1b[1mCC\x1b[0m  {:03b} \x1b[2m│\x1b[0m\n",
        regs.pc,
        regs.flag.bits()
    );
    out.push_str("\x1b[2m└────────────────────────────────────┘\x1b[0m\n");
    out
}

fn format_integer(value: u16) -> String {
    format!(
        "0x{:04x}  {:-6}  {:-6}     {}",
        value,
        value as i16,
        value,
        char_display(value)
    )
}

/// Three character display of a register value.
fn char_display(value: u16) -> String {
    match value {
        // ASCII control characters which are arbitrarily considered significant
        0x00 => "NUL".into(),
        0x08 => "BS ".into(),
        0x09 => "HT ".into(),
        0x0a => "LF ".into(),
        0x0b => "VT ".into(),
        0x0c => "FF ".into(),
        0x0d => "CR ".into(),
        0x1b => "ESC".into(),
        0x7f => "DEL".into(),

        // Space
        0x20 => "[_]".into(),

        // Printable ASCII characters
        0x21..=0x7e => format!("{:<3}", value as u8 as char),

        // Any ASCII character not already matched (unimportant control characters)
        0x00..=0x7f => "\x1b[2m───\x1b[0m".into(),
        // Any non-ASCII character
        0x0080.. => "\x1b[2m┄┄┄\x1b[0m".into(),
    }
}
