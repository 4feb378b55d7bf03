//! Effective-address computation for the 13 addressing modes.
//!
//! Indexed modes issue the dummy bus accesses the NMOS chip makes while it
//! adds the index, because a read of a device register can have side
//! effects:
//! - zp,X / zp,Y / (zp,X) read the un-indexed zero-page address
//! - abs,X / abs,Y / (zp),Y read the address before the carry into the
//!   high byte is fixed; reads only do this when a page is crossed,
//!   stores and read-modify-write always do

use emu_core::Bus;

use crate::cpu::Cpu6502;
use crate::interrupt::Poll;
use crate::opcodes::{AddrMode, Mnemonic};
use crate::timing::page_crossed;

/// How the instruction uses its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Read,
    Write,
    Modify,
}

impl Access {
    /// How `mnemonic` uses a memory operand.
    pub(crate) const fn of(mnemonic: Mnemonic) -> Self {
        match mnemonic {
            Mnemonic::STA | Mnemonic::STX | Mnemonic::STY => Access::Write,
            m if m.is_read() => Access::Read,
            _ => Access::Modify,
        }
    }
}

/// A resolved operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operand {
    /// Implied: nothing to fetch.
    None,
    Accumulator,
    Immediate(u8),
    /// Effective address in memory.
    Memory(u16),
    /// Branch displacement.
    Relative(i8),
}

impl<B: Bus, P: Poll> Cpu6502<B, P> {
    /// Resolve `mode`, fetching operand bytes from the instruction stream.
    ///
    /// Returns the operand and whether an indexed read crossed a page (the
    /// +1 cycle case).
    pub(crate) fn resolve(&mut self, mode: AddrMode, access: Access) -> (Operand, bool) {
        match mode {
            AddrMode::Implied => (Operand::None, false),
            AddrMode::Accumulator => (Operand::Accumulator, false),
            AddrMode::Immediate => (Operand::Immediate(self.fetch()), false),
            AddrMode::ZeroPage => (Operand::Memory(u16::from(self.fetch())), false),
            AddrMode::ZeroPageX => {
                let addr = self.zero_page_indexed(self.regs.x);
                (Operand::Memory(addr), false)
            }
            AddrMode::ZeroPageY => {
                let addr = self.zero_page_indexed(self.regs.y);
                (Operand::Memory(addr), false)
            }
            AddrMode::Absolute => (Operand::Memory(self.fetch_word()), false),
            AddrMode::AbsoluteX => {
                let base = self.fetch_word();
                let (addr, crossed) = self.index(base, self.regs.x, access);
                (Operand::Memory(addr), crossed)
            }
            AddrMode::AbsoluteY => {
                let base = self.fetch_word();
                let (addr, crossed) = self.index(base, self.regs.y, access);
                (Operand::Memory(addr), crossed)
            }
            AddrMode::Indirect => {
                let pointer = self.fetch_word();
                (Operand::Memory(self.read_word_page_bug(pointer)), false)
            }
            AddrMode::IndexedIndirect => {
                let base = self.fetch();
                let _ = self.read(u16::from(base));
                let pointer = base.wrapping_add(self.regs.x);
                (Operand::Memory(self.read_zero_page_word(pointer)), false)
            }
            AddrMode::IndirectIndexed => {
                let pointer = self.fetch();
                let base = self.read_zero_page_word(pointer);
                let (addr, crossed) = self.index(base, self.regs.y, access);
                (Operand::Memory(addr), crossed)
            }
            AddrMode::Relative => (Operand::Relative(self.fetch() as i8), false),
        }
    }

    /// $nn,X and $nn,Y: the sum wraps within page zero.
    fn zero_page_indexed(&mut self, index: u8) -> u16 {
        let base = self.fetch();
        let _ = self.read(u16::from(base));
        u16::from(base.wrapping_add(index))
    }

    /// Add an index to a 16-bit base, issuing the fix-up read.
    fn index(&mut self, base: u16, index: u8, access: Access) -> (u16, bool) {
        let addr = base.wrapping_add(u16::from(index));
        let crossed = page_crossed(base, addr);
        if crossed || access != Access::Read {
            let partial = (base & 0xFF00) | (addr & 0x00FF);
            let _ = self.read(partial);
        }
        (addr, crossed && access == Access::Read)
    }

    /// Pointer stored in page zero; the high byte wraps from $FF to $00.
    fn read_zero_page_word(&mut self, pointer: u8) -> u16 {
        let low = self.read(u16::from(pointer));
        let high = self.read(u16::from(pointer.wrapping_add(1)));
        u16::from_le_bytes([low, high])
    }

    /// JMP ($xxFF) fetches the high byte from $xx00, not $xx00+$100.
    fn read_word_page_bug(&mut self, pointer: u16) -> u16 {
        let low = self.read(pointer);
        let high_addr = (pointer & 0xFF00) | (pointer.wrapping_add(1) & 0x00FF);
        let high = self.read(high_addr);
        u16::from_le_bytes([low, high])
    }

    /// Read the operand's value for a read-class instruction.
    pub(crate) fn load(&mut self, operand: Operand) -> u8 {
        match operand {
            Operand::Immediate(value) => value,
            Operand::Memory(addr) => self.read(addr),
            Operand::Accumulator => self.regs.a,
            Operand::None | Operand::Relative(_) => 0,
        }
    }
}
