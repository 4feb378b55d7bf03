//! Opcode decode table.
//!
//! Maps each of the 256 opcodes to an operation and an addressing mode.
//! The 151 documented opcodes decode to their real operation. The other
//! 105 decode to [`Mnemonic::Illegal`] with the addressing mode their
//! column implies on NMOS silicon, so the executor knows how many operand
//! bytes to step over.

use std::fmt;

/// Addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    /// No operand (CLC, RTS, ...).
    Implied,
    /// Operates on A (ASL A, ...).
    Accumulator,
    /// #$nn
    Immediate,
    /// $nn
    ZeroPage,
    /// $nn,X - wraps within page zero.
    ZeroPageX,
    /// $nn,Y - wraps within page zero.
    ZeroPageY,
    /// $nnnn
    Absolute,
    /// $nnnn,X
    AbsoluteX,
    /// $nnnn,Y
    AbsoluteY,
    /// ($nnnn) - JMP only.
    Indirect,
    /// ($nn,X)
    IndexedIndirect,
    /// ($nn),Y
    IndirectIndexed,
    /// Signed 8-bit branch offset.
    Relative,
}

impl AddrMode {
    /// Operand bytes following the opcode.
    #[must_use]
    pub const fn operand_len(self) -> u16 {
        match self {
            AddrMode::Implied | AddrMode::Accumulator => 0,
            AddrMode::Immediate
            | AddrMode::ZeroPage
            | AddrMode::ZeroPageX
            | AddrMode::ZeroPageY
            | AddrMode::IndexedIndirect
            | AddrMode::IndirectIndexed
            | AddrMode::Relative => 1,
            AddrMode::Absolute | AddrMode::AbsoluteX | AddrMode::AbsoluteY | AddrMode::Indirect => 2,
        }
    }
}

/// Operations of the documented NMOS instruction set.
#[allow(clippy::upper_case_acronyms)]
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    ADC, AND, ASL, BCC, BCS, BEQ, BIT, BMI, BNE, BPL, BRK, BVC, BVS, CLC,
    CLD, CLI, CLV, CMP, CPX, CPY, DEC, DEX, DEY, EOR, INC, INX, INY, JMP,
    JSR, LDA, LDX, LDY, LSR, NOP, ORA, PHA, PHP, PLA, PLP, ROL, ROR, RTI,
    RTS, SBC, SEC, SED, SEI, STA, STX, STY, TAX, TAY, TSX, TXA, TXS, TYA,
    /// Undocumented opcode, executed as a no-op.
    Illegal,
}

impl Mnemonic {
    /// True for operations that only read their operand. These pay the
    /// page-crossing cycle on indexed reads; stores and read-modify-write
    /// always pay it in their base cost.
    #[must_use]
    pub const fn is_read(self) -> bool {
        matches!(
            self,
            Mnemonic::ADC
                | Mnemonic::AND
                | Mnemonic::BIT
                | Mnemonic::CMP
                | Mnemonic::CPX
                | Mnemonic::CPY
                | Mnemonic::EOR
                | Mnemonic::LDA
                | Mnemonic::LDX
                | Mnemonic::LDY
                | Mnemonic::ORA
                | Mnemonic::SBC
        )
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mnemonic::Illegal => f.write_str("???"),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

/// A decoded opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub mnemonic: Mnemonic,
    pub mode: AddrMode,
}

impl Instruction {
    /// Total length in bytes, opcode included.
    #[must_use]
    pub const fn len(&self) -> u16 {
        1 + self.mode.operand_len()
    }

    #[must_use]
    pub const fn is_documented(&self) -> bool {
        !matches!(self.mnemonic, Mnemonic::Illegal)
    }

    /// Base cycle count from the timing table.
    #[must_use]
    pub fn base_cycles(&self) -> u8 {
        crate::CYCLES[self.opcode as usize]
    }
}

/// Decode an opcode.
#[must_use]
#[rustfmt::skip]
#[allow(clippy::enum_glob_use)]
pub const fn decode(opcode: u8) -> Instruction {
    use AddrMode::{
        Absolute as Abs, AbsoluteX as AbsX, AbsoluteY as AbsY, Accumulator as Acc,
        Immediate as Imm, Implied as Imp, IndexedIndirect as IzX, Indirect as Ind,
        IndirectIndexed as IzY, Relative as Rel, ZeroPage as Zp, ZeroPageX as ZpX,
        ZeroPageY as ZpY,
    };
    use Mnemonic::*;

    let (mnemonic, mode) = match opcode {
        0x69 => (ADC, Imm), 0x65 => (ADC, Zp), 0x75 => (ADC, ZpX), 0x6D => (ADC, Abs),
        0x7D => (ADC, AbsX), 0x79 => (ADC, AbsY), 0x61 => (ADC, IzX), 0x71 => (ADC, IzY),

        0x29 => (AND, Imm), 0x25 => (AND, Zp), 0x35 => (AND, ZpX), 0x2D => (AND, Abs),
        0x3D => (AND, AbsX), 0x39 => (AND, AbsY), 0x21 => (AND, IzX), 0x31 => (AND, IzY),

        0x0A => (ASL, Acc), 0x06 => (ASL, Zp), 0x16 => (ASL, ZpX), 0x0E => (ASL, Abs),
        0x1E => (ASL, AbsX),

        0x90 => (BCC, Rel), 0xB0 => (BCS, Rel), 0xF0 => (BEQ, Rel), 0x30 => (BMI, Rel),
        0xD0 => (BNE, Rel), 0x10 => (BPL, Rel), 0x50 => (BVC, Rel), 0x70 => (BVS, Rel),

        0x24 => (BIT, Zp), 0x2C => (BIT, Abs),

        0x00 => (BRK, Imp),

        0x18 => (CLC, Imp), 0xD8 => (CLD, Imp), 0x58 => (CLI, Imp), 0xB8 => (CLV, Imp),

        0xC9 => (CMP, Imm), 0xC5 => (CMP, Zp), 0xD5 => (CMP, ZpX), 0xCD => (CMP, Abs),
        0xDD => (CMP, AbsX), 0xD9 => (CMP, AbsY), 0xC1 => (CMP, IzX), 0xD1 => (CMP, IzY),

        0xE0 => (CPX, Imm), 0xE4 => (CPX, Zp), 0xEC => (CPX, Abs),
        0xC0 => (CPY, Imm), 0xC4 => (CPY, Zp), 0xCC => (CPY, Abs),

        0xC6 => (DEC, Zp), 0xD6 => (DEC, ZpX), 0xCE => (DEC, Abs), 0xDE => (DEC, AbsX),
        0xCA => (DEX, Imp), 0x88 => (DEY, Imp),

        0x49 => (EOR, Imm), 0x45 => (EOR, Zp), 0x55 => (EOR, ZpX), 0x4D => (EOR, Abs),
        0x5D => (EOR, AbsX), 0x59 => (EOR, AbsY), 0x41 => (EOR, IzX), 0x51 => (EOR, IzY),

        0xE6 => (INC, Zp), 0xF6 => (INC, ZpX), 0xEE => (INC, Abs), 0xFE => (INC, AbsX),
        0xE8 => (INX, Imp), 0xC8 => (INY, Imp),

        0x4C => (JMP, Abs), 0x6C => (JMP, Ind),
        0x20 => (JSR, Abs),

        0xA9 => (LDA, Imm), 0xA5 => (LDA, Zp), 0xB5 => (LDA, ZpX), 0xAD => (LDA, Abs),
        0xBD => (LDA, AbsX), 0xB9 => (LDA, AbsY), 0xA1 => (LDA, IzX), 0xB1 => (LDA, IzY),

        0xA2 => (LDX, Imm), 0xA6 => (LDX, Zp), 0xB6 => (LDX, ZpY), 0xAE => (LDX, Abs),
        0xBE => (LDX, AbsY),

        0xA0 => (LDY, Imm), 0xA4 => (LDY, Zp), 0xB4 => (LDY, ZpX), 0xAC => (LDY, Abs),
        0xBC => (LDY, AbsX),

        0x4A => (LSR, Acc), 0x46 => (LSR, Zp), 0x56 => (LSR, ZpX), 0x4E => (LSR, Abs),
        0x5E => (LSR, AbsX),

        0xEA => (NOP, Imp),

        0x09 => (ORA, Imm), 0x05 => (ORA, Zp), 0x15 => (ORA, ZpX), 0x0D => (ORA, Abs),
        0x1D => (ORA, AbsX), 0x19 => (ORA, AbsY), 0x01 => (ORA, IzX), 0x11 => (ORA, IzY),

        0x48 => (PHA, Imp), 0x08 => (PHP, Imp), 0x68 => (PLA, Imp), 0x28 => (PLP, Imp),

        0x2A => (ROL, Acc), 0x26 => (ROL, Zp), 0x36 => (ROL, ZpX), 0x2E => (ROL, Abs),
        0x3E => (ROL, AbsX),

        0x6A => (ROR, Acc), 0x66 => (ROR, Zp), 0x76 => (ROR, ZpX), 0x6E => (ROR, Abs),
        0x7E => (ROR, AbsX),

        0x40 => (RTI, Imp), 0x60 => (RTS, Imp),

        0xE9 => (SBC, Imm), 0xE5 => (SBC, Zp), 0xF5 => (SBC, ZpX), 0xED => (SBC, Abs),
        0xFD => (SBC, AbsX), 0xF9 => (SBC, AbsY), 0xE1 => (SBC, IzX), 0xF1 => (SBC, IzY),

        0x38 => (SEC, Imp), 0xF8 => (SED, Imp), 0x78 => (SEI, Imp),

        0x85 => (STA, Zp), 0x95 => (STA, ZpX), 0x8D => (STA, Abs), 0x9D => (STA, AbsX),
        0x99 => (STA, AbsY), 0x81 => (STA, IzX), 0x91 => (STA, IzY),

        0x86 => (STX, Zp), 0x96 => (STX, ZpY), 0x8E => (STX, Abs),
        0x84 => (STY, Zp), 0x94 => (STY, ZpX), 0x8C => (STY, Abs),

        0xAA => (TAX, Imp), 0xA8 => (TAY, Imp), 0xBA => (TSX, Imp),
        0x8A => (TXA, Imp), 0x9A => (TXS, Imp), 0x98 => (TYA, Imp),

        _ => (Illegal, illegal_mode(opcode)),
    };

    Instruction {
        opcode,
        mnemonic,
        mode,
    }
}

/// Operand shape of an undocumented opcode, from its column.
const fn illegal_mode(opcode: u8) -> AddrMode {
    let odd_row = opcode & 0x10 != 0;
    match opcode & 0x0F {
        // $80 NOP #
        0x0 | 0x9 => AddrMode::Immediate,
        // JAM everywhere except $82/$C2/$E2 (NOP #)
        0x2 => {
            if opcode & 0x80 != 0 && !odd_row {
                AddrMode::Immediate
            } else {
                AddrMode::Implied
            }
        }
        0x3 => {
            if odd_row {
                AddrMode::IndirectIndexed
            } else {
                AddrMode::IndexedIndirect
            }
        }
        // SAX/LAX use zp,Y
        0x7 if opcode & 0xE0 == 0x80 || opcode & 0xE0 == 0xA0 => {
            if odd_row {
                AddrMode::ZeroPageY
            } else {
                AddrMode::ZeroPage
            }
        }
        0x4 | 0x7 => {
            if odd_row {
                AddrMode::ZeroPageX
            } else {
                AddrMode::ZeroPage
            }
        }
        0xB => {
            if odd_row {
                AddrMode::AbsoluteY
            } else {
                AddrMode::Immediate
            }
        }
        0xF if opcode & 0xE0 == 0x80 || opcode & 0xE0 == 0xA0 => {
            if odd_row {
                AddrMode::AbsoluteY
            } else {
                AddrMode::Absolute
            }
        }
        0xC | 0xF => {
            if odd_row {
                AddrMode::AbsoluteX
            } else {
                AddrMode::Absolute
            }
        }
        0xE => AddrMode::AbsoluteY,
        _ => AddrMode::Implied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_opcode_count() {
        let documented = (0..=255u8).filter(|&op| decode(op).is_documented()).count();
        assert_eq!(documented, 151);
    }

    #[test]
    fn decode_spot_checks() {
        assert_eq!(decode(0xA9).mnemonic, Mnemonic::LDA);
        assert_eq!(decode(0xA9).mode, AddrMode::Immediate);
        assert_eq!(decode(0x6C).mode, AddrMode::Indirect);
        assert_eq!(decode(0xB6).mode, AddrMode::ZeroPageY);
        assert_eq!(decode(0x20).len(), 3);
        assert_eq!(decode(0x00).len(), 1);
    }

    #[test]
    fn illegal_opcodes_keep_operand_shape() {
        assert_eq!(decode(0x02).len(), 1); // JAM
        assert_eq!(decode(0x80).len(), 2); // NOP #
        assert_eq!(decode(0xE2).len(), 2); // NOP #
        assert_eq!(decode(0x04).len(), 2); // NOP zp
        assert_eq!(decode(0x0C).len(), 3); // NOP abs
        assert_eq!(decode(0x1C).len(), 3); // NOP abs,X
        assert_eq!(decode(0x1A).len(), 1); // NOP
        assert_eq!(decode(0xAB).len(), 2); // LXA #
        assert_eq!(decode(0xBB).len(), 3); // LAS abs,Y
        assert_eq!(decode(0x9E).len(), 3); // SHX abs,Y
        assert_eq!(decode(0x9C).len(), 3); // SHY abs,X
        assert_eq!(decode(0xF3).mode, AddrMode::IndirectIndexed);
        assert_eq!(decode(0xB7).mode, AddrMode::ZeroPageY);
        assert_eq!(decode(0xBF).mode, AddrMode::AbsoluteY);
    }

    #[test]
    fn mnemonic_display() {
        assert_eq!(decode(0xEA).mnemonic.to_string(), "NOP");
        assert_eq!(decode(0xFF).mnemonic.to_string(), "???");
    }
}
