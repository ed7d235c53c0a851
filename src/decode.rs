//! Bit-field extraction over raw instruction words.

/// Destination register, or `BR` condition mask (bits 11-9).
#[inline]
pub fn dr(instr: u16) -> u16 {
    (instr >> 9) & 0b111
}

/// First source or base register (bits 8-6).
#[inline]
pub fn sr1(instr: u16) -> u16 {
    (instr >> 6) & 0b111
}

/// Second source register (bits 2-0).
#[inline]
pub fn sr2(instr: u16) -> u16 {
    instr & 0b111
}

/// Sign-extend the low `bits` bits of `val` to 16 bits.
///
/// Higher bits of `val` are ignored, so whole instruction words can be passed in.
#[inline]
pub fn s_ext(val: u16, bits: u32) -> u16 {
    debug_assert!(bits > 0 && bits < 16);
    // Move the field's sign bit to bit 15, then shift back arithmetically
    let shift = 16 - bits;
    (((val << shift) as i16) >> shift) as u16
}

/// Second operand of `ADD` and `AND`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Reg(u16),
    /// Already sign-extended.
    Imm(u16),
}

/// A decoded instruction. Offsets are already sign-extended.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    ADD { dr: u16, sr1: u16, src2: Operand },
    AND { dr: u16, sr1: u16, src2: Operand },
    NOT { dr: u16, sr: u16 },
    BR { mask: u16, offset9: u16 },
    /// Also `RET` when `base_r` is R7.
    JMP { base_r: u16 },
    JSR { offset11: u16 },
    JSRR { base_r: u16 },
    LD { dr: u16, offset9: u16 },
    LDI { dr: u16, offset9: u16 },
    LDR { dr: u16, base_r: u16, offset6: u16 },
    LEA { dr: u16, offset9: u16 },
    ST { sr: u16, offset9: u16 },
    STI { sr: u16, offset9: u16 },
    STR { sr: u16, base_r: u16, offset6: u16 },
    TRAP { vect: u8 },
}

impl Instruction {
    /// Decode a raw word. Returns the opcode on `Err` if it is `RTI` (0x8) or reserved (0xD).
    pub fn decode(instr: u16) -> Result<Instruction, u16> {
        use Instruction::*;
        let opcode = instr >> 12;
        let src2 = || {
            if instr & 0b10_0000 == 0 {
                Operand::Reg(sr2(instr))
            } else {
                Operand::Imm(s_ext(instr, 5))
            }
        };
        let op = match opcode {
            0x0 => BR {
                mask: dr(instr),
                offset9: s_ext(instr, 9),
            },
            0x1 => ADD {
                dr: dr(instr),
                sr1: sr1(instr),
                src2: src2(),
            },
            0x2 => LD {
                dr: dr(instr),
                offset9: s_ext(instr, 9),
            },
            0x3 => ST {
                sr: dr(instr),
                offset9: s_ext(instr, 9),
            },
            0x4 if instr & 0x800 != 0 => JSR {
                offset11: s_ext(instr, 11),
            },
            0x4 => JSRR {
                base_r: sr1(instr),
            },
            0x5 => AND {
                dr: dr(instr),
                sr1: sr1(instr),
                src2: src2(),
            },
            0x6 => LDR {
                dr: dr(instr),
                base_r: sr1(instr),
                offset6: s_ext(instr, 6),
            },
            0x7 => STR {
                sr: dr(instr),
                base_r: sr1(instr),
                offset6: s_ext(instr, 6),
            },
            0x9 => NOT {
                dr: dr(instr),
                sr: sr1(instr),
            },
            0xA => LDI {
                dr: dr(instr),
                offset9: s_ext(instr, 9),
            },
            0xB => STI {
                sr: dr(instr),
                offset9: s_ext(instr, 9),
            },
            0xC => JMP {
                base_r: sr1(instr),
            },
            0xE => LEA {
                dr: dr(instr),
                offset9: s_ext(instr, 9),
            },
            0xF => TRAP {
                vect: (instr & 0xFF) as u8,
            },
            // RTI, reserved
            _ => return Err(opcode),
        };
        Ok(op)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn s_ext() {
        #[rustfmt::skip]
        let cases = [
            // (width, input, expected)
            // imm5
            (5,  0x000F, 0x000F),
            (5,  0x0010, 0xFFF0),
            (5,  0x001D, 0xFFFD),
            (5,  0x1021, 0x0001), // ADD R0, R0, #1
            (5,  0x103F, 0xFFFF), // ADD R0, R0, #-1
            // offset6
            (6,  0x001F, 0x001F),
            (6,  0x0020, 0xFFE0),
            (6,  0x643F, 0xFFFF), // LDR R2, R0, #-1
            // PCoffset9
            (9,  0x00FF, 0x00FF),
            (9,  0x0100, 0xFF00),
            (9,  0x05FF, 0xFFFF), // BRz #-1
            (9,  0x09FD, 0xFFFD), // BRn #-3
            // PCoffset11
            (11, 0x03FF, 0x03FF),
            (11, 0x0400, 0xFC00),
            (11, 0x4FFE, 0xFFFE), // JSR #-2
            (11, 0x4803, 0x0003), // JSR #3
        ];

        for (bits, input, expected) in cases {
            let actual = super::s_ext(input, bits);
            assert_eq!(
                actual, expected,
                "s_ext(0x{input:04x}, {bits}) == 0x{actual:04x}"
            );
        }
    }

    #[test]
    fn s_ext_operand_widths() {
        for bits in [5u32, 6, 9, 11] {
            let low_mask = (1u16 << bits) - 1;
            for x in 0..=low_mask {
                let ext = super::s_ext(x, bits);
                assert_eq!(ext & low_mask, x);
                if x >> (bits - 1) & 1 == 1 {
                    assert_eq!(ext | low_mask, 0xffff, "width {bits}, 0x{x:x}");
                } else {
                    assert_eq!(ext & !low_mask, 0, "width {bits}, 0x{x:x}");
                }
            }
        }
    }

    #[test]
    fn fields() {
        // ADD R3, R5, R6
        let instr = 0b0001_011_101_000_110;
        assert_eq!(dr(instr), 3);
        assert_eq!(sr1(instr), 5);
        assert_eq!(sr2(instr), 6);
    }

    #[test]
    fn decode_add() {
        // ADD R1, R2, #-3
        assert_eq!(
            Instruction::decode(0b0001_001_010_1_11101),
            Ok(Instruction::ADD {
                dr: 1,
                sr1: 2,
                src2: Operand::Imm(0xfffd),
            })
        );
        // ADD R1, R2, R3
        assert_eq!(
            Instruction::decode(0b0001_001_010_0_00_011),
            Ok(Instruction::ADD {
                dr: 1,
                sr1: 2,
                src2: Operand::Reg(3),
            })
        );
    }

    #[test]
    fn decode_jsr_modes() {
        assert_eq!(
            Instruction::decode(0x4FFF),
            Ok(Instruction::JSR { offset11: 0xffff })
        );
        assert_eq!(
            Instruction::decode(0b0100_0_00_011_000000),
            Ok(Instruction::JSRR { base_r: 3 })
        );
    }

    #[test]
    fn decode_trap_and_ret() {
        assert_eq!(
            Instruction::decode(0xF025),
            Ok(Instruction::TRAP { vect: 0x25 })
        );
        assert_eq!(
            Instruction::decode(0xC1C0),
            Ok(Instruction::JMP { base_r: 7 })
        );
    }

    #[test]
    fn decode_illegal() {
        assert_eq!(Instruction::decode(0x8000), Err(0x8));
        assert_eq!(Instruction::decode(0xDABC), Err(0xD));
    }
}
