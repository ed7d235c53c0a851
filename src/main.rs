use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};

use lc3vm::output::{self, MsgColor};
use lc3vm::{Exit, Interpreter, Interrupt, Terminal};

/// Exit status after the run was cancelled with `Ctrl+C` or a termination signal.
const CANCELLED: u8 = 130;

/// Run a binary LC3 object image.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// `.obj` or `.lc3` image to run
    path: PathBuf,
    /// Produce minimal output, suited for blackbox tests
    #[arg(short, long)]
    minimal: bool,
    /// Print the register file once the program stops
    #[arg(short, long)]
    registers: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    output::set_minimal(args.minimal);

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new() //
                .terminal_links(false)
                .build(),
        )
    }))?;

    let exit = run(&args.path, args.registers)?;
    match exit {
        Exit::Halted => Ok(ExitCode::SUCCESS),
        Exit::Cancelled => {
            println!();
            output::message(MsgColor::Red, "Cancelled", "interrupted by user");
            Ok(ExitCode::from(CANCELLED))
        }
    }
}

fn run(path: &Path, print_registers: bool) -> Result<Exit> {
    output::file_message(MsgColor::Green, "Loading", path);
    let bytes = fs::read(path).into_diagnostic()?;

    let mut vm = Interpreter::new();
    vm.load(&bytes)?;

    output::message(MsgColor::Cyan, "Running", "loaded image");
    let interrupt = Interrupt::new();
    interrupt.catch_signals().into_diagnostic()?;
    let result = {
        // Terminal mode is restored when `console` drops, on every exit path
        let mut console = Terminal::open(interrupt.clone()).into_diagnostic()?;
        vm.run(&mut console, &interrupt)
    };

    if print_registers {
        print!("{}", output::format_registers(vm.registers()));
    }
    let exit = result?;

    output::file_message(MsgColor::Green, "Completed", path);
    Ok(exit)
}
