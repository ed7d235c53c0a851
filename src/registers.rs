use std::cmp::Ordering;

/// Address user programs start executing from.
pub const PC_START: u16 = 0x3000;

/// Condition code. Holds exactly one of the three values at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flag {
    N = 0b100,
    Z = 0b010,
    P = 0b001,
}

impl Flag {
    /// Condition of a register value, read as two's-complement.
    pub fn of(val: u16) -> Self {
        match (val as i16).cmp(&0) {
            Ordering::Less => Flag::N,
            Ordering::Equal => Flag::Z,
            Ordering::Greater => Flag::P,
        }
    }

    /// Mask used by `BR` condition bits.
    pub fn bits(self) -> u16 {
        self as u16
    }
}

/// 8x 16-bit general registers, program counter and condition code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registers {
    reg: [u16; 8],
    pub pc: u16,
    pub flag: Flag,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            reg: [0; 8],
            pc: PC_START,
            flag: Flag::Z,
        }
    }

    /// Read general register. Only the low 3 bits of `r` are used.
    #[inline]
    pub fn get(&self, r: u16) -> u16 {
        self.reg[(r & 0b111) as usize]
    }

    #[inline]
    pub fn set(&mut self, r: u16, val: u16) {
        self.reg[(r & 0b111) as usize] = val;
    }

    /// Set condition code from the value now held in `r`.
    ///
    /// Only called after an instruction defines a general register: never for stores, jumps or
    /// branches.
    #[inline]
    pub fn update_flags(&mut self, r: u16) {
        self.flag = Flag::of(self.get(r));
    }

    /// Write `val` to `r` and update the condition code.
    #[inline]
    pub fn define(&mut self, r: u16, val: u16) {
        self.set(r, val);
        self.update_flags(r);
    }

    pub fn all(&self) -> &[u16; 8] {
        &self.reg
    }
}
