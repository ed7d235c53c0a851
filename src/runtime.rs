use crate::console::Console;
use crate::decode::{Instruction, Operand};
use crate::error::{LoadError, VmError};
use crate::interrupt::Interrupt;
use crate::loader::{self, Image};
use crate::memory::Memory;
use crate::registers::Registers;
use crate::trap::{self, Flow};

/// Instructions executed between console event polls.
const EVENT_POLL_INTERVAL: u32 = 0x400;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    Halted,
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    /// `HALT` trap was executed.
    Halted,
    /// The interrupt was raised.
    Cancelled,
}

/// Represents complete program state during runtime.
pub struct Interpreter {
    regs: Registers,
    mem: Memory,
    state: State,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Zeroed memory, `PC = 0x3000`, flags `Z`.
    pub fn new() -> Self {
        Interpreter {
            regs: Registers::new(),
            mem: Memory::new(),
            state: State::Running,
        }
    }

    /// Load object image bytes into memory. Execution still starts at `0x3000`.
    pub fn load(&mut self, bytes: &[u8]) -> Result<Image, LoadError> {
        loader::load_image(bytes, &mut self.mem)
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.mem
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Run until `HALT`, an illegal opcode, or the interrupt is raised.
    pub fn run(
        &mut self,
        console: &mut dyn Console,
        interrupt: &Interrupt,
    ) -> Result<Exit, VmError> {
        let mut count: u32 = 0;
        loop {
            if interrupt.is_raised() {
                return Ok(Exit::Cancelled);
            }
            if self.step(console)? == State::Halted {
                return Ok(Exit::Halted);
            }
            count = count.wrapping_add(1);
            if count % EVENT_POLL_INTERVAL == 0 {
                console.poll_events()?;
            }
        }
    }

    /// Execute a single instruction. Does nothing once halted.
    pub fn step(&mut self, console: &mut dyn Console) -> Result<State, VmError> {
        if self.state == State::Halted {
            return Ok(State::Halted);
        }

        let addr = self.regs.pc;
        let instr = self.mem.read(addr, console);
        // PC incremented before instruction is performed
        self.regs.pc = self.regs.pc.wrapping_add(1);

        let op = match Instruction::decode(instr) {
            Ok(op) => op,
            Err(opcode) => {
                self.state = State::Halted;
                return Err(VmError::IllegalOpcode {
                    opcode,
                    instr,
                    addr,
                });
            }
        };

        if let Err(err) = self.execute(op, console) {
            self.state = State::Halted;
            return Err(err);
        }
        Ok(self.state)
    }

    fn execute(&mut self, op: Instruction, console: &mut dyn Console) -> Result<(), VmError> {
        use Instruction::*;
        match op {
            ADD { dr, sr1, src2 } => self.add(dr, sr1, src2),
            AND { dr, sr1, src2 } => self.and(dr, sr1, src2),
            NOT { dr, sr } => self.not(dr, sr),
            BR { mask, offset9 } => self.br(mask, offset9),
            JMP { base_r } => self.jmp(base_r),
            JSR { offset11 } => self.jsr(offset11),
            JSRR { base_r } => self.jsrr(base_r),
            LD { dr, offset9 } => self.ld(dr, offset9, console),
            LDI { dr, offset9 } => self.ldi(dr, offset9, console),
            LDR {
                dr,
                base_r,
                offset6,
            } => self.ldr(dr, base_r, offset6, console),
            LEA { dr, offset9 } => self.lea(dr, offset9),
            ST { sr, offset9 } => self.st(sr, offset9),
            STI { sr, offset9 } => self.sti(sr, offset9, console),
            STR {
                sr,
                base_r,
                offset6,
            } => self.str(sr, base_r, offset6),
            TRAP { vect } => {
                if trap::trap(vect, &mut self.regs, &self.mem, console)? == Flow::Halt {
                    self.state = State::Halted;
                }
            }
        }
        Ok(())
    }

    fn operand(&self, src2: Operand) -> u16 {
        match src2 {
            Operand::Reg(r) => self.regs.get(r),
            Operand::Imm(imm) => imm,
        }
    }

    /// Address relative to the incremented PC.
    fn pc_rel(&self, offset: u16) -> u16 {
        self.regs.pc.wrapping_add(offset)
    }

    fn add(&mut self, dr: u16, sr1: u16, src2: Operand) {
        let res = self.regs.get(sr1).wrapping_add(self.operand(src2));
        self.regs.define(dr, res);
    }

    fn and(&mut self, dr: u16, sr1: u16, src2: Operand) {
        let res = self.regs.get(sr1) & self.operand(src2);
        self.regs.define(dr, res);
    }

    fn not(&mut self, dr: u16, sr: u16) {
        let res = !self.regs.get(sr);
        self.regs.define(dr, res);
    }

    fn br(&mut self, mask: u16, offset9: u16) {
        if self.regs.flag.bits() & mask != 0 {
            self.regs.pc = self.pc_rel(offset9);
        }
    }

    fn jmp(&mut self, base_r: u16) {
        self.regs.pc = self.regs.get(base_r);
    }

    fn jsr(&mut self, offset11: u16) {
        self.regs.set(7, self.regs.pc);
        self.regs.pc = self.pc_rel(offset11);
    }

    fn jsrr(&mut self, base_r: u16) {
        // Base is read after linking, so `JSRR R7` falls through
        self.regs.set(7, self.regs.pc);
        self.regs.pc = self.regs.get(base_r);
    }

    fn ld(&mut self, dr: u16, offset9: u16, console: &mut dyn Console) {
        let val = self.mem.read(self.pc_rel(offset9), console);
        self.regs.define(dr, val);
    }

    fn ldi(&mut self, dr: u16, offset9: u16, console: &mut dyn Console) {
        let ptr = self.mem.read(self.pc_rel(offset9), console);
        let val = self.mem.read(ptr, console);
        self.regs.define(dr, val);
    }

    fn ldr(&mut self, dr: u16, base_r: u16, offset6: u16, console: &mut dyn Console) {
        let ptr = self.regs.get(base_r).wrapping_add(offset6);
        let val = self.mem.read(ptr, console);
        self.regs.define(dr, val);
    }

    fn lea(&mut self, dr: u16, offset9: u16) {
        let val = self.pc_rel(offset9);
        self.regs.define(dr, val);
    }

    fn st(&mut self, sr: u16, offset9: u16) {
        self.mem.write(self.pc_rel(offset9), self.regs.get(sr));
    }

    fn sti(&mut self, sr: u16, offset9: u16, console: &mut dyn Console) {
        let ptr = self.mem.read(self.pc_rel(offset9), console);
        self.mem.write(ptr, self.regs.get(sr));
    }

    fn str(&mut self, sr: u16, base_r: u16, offset6: u16) {
        let ptr = self.regs.get(base_r).wrapping_add(offset6);
        self.mem.write(ptr, self.regs.get(sr));
    }
}
