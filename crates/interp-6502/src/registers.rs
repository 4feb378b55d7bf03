//! 6502 CPU registers.

use crate::Status;

/// Base address of the hardware stack page.
pub const STACK_PAGE: u16 = 0x0100;

/// 6502 CPU register set.
///
/// - A: 8-bit accumulator
/// - X, Y: 8-bit index registers
/// - S: 8-bit stack pointer (stack is at $0100-$01FF)
/// - PC: 16-bit program counter
/// - P: 8-bit processor status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer (points to next free location).
    pub s: u8,
    /// Program counter.
    pub pc: u16,
    /// Processor status flags.
    pub p: Status,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Registers in their reset state, PC aside.
    ///
    /// A, X and Y are undefined on real hardware; they start at 0 here.
    /// S ends up at $FD because reset runs three suppressed pushes from $00.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0xFD,
            pc: 0,
            p: Status::new(),
        }
    }

    /// Step S down for a push and return the address to write.
    pub fn push(&mut self) -> u16 {
        let addr = STACK_PAGE | u16::from(self.s);
        self.s = self.s.wrapping_sub(1);
        addr
    }

    /// Step S up for a pull and return the address to read.
    pub fn pop(&mut self) -> u16 {
        self.s = self.s.wrapping_add(1);
        STACK_PAGE | u16::from(self.s)
    }

    #[must_use]
    pub const fn pch(&self) -> u8 {
        (self.pc >> 8) as u8
    }

    #[must_use]
    pub const fn pcl(&self) -> u8 {
        (self.pc & 0x00FF) as u8
    }

    /// Load PC from its two halves.
    pub fn set_pc_bytes(&mut self, low: u8, high: u8) {
        self.pc = (u16::from(high) << 8) | u16::from(low);
    }
}
