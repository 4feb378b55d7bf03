//! 6502 processor status register (P).
//!
//! ```text
//!  7  6  5  4  3  2  1  0
//!  N  V  R  B  D  I  Z  C
//! ```
//!
//! R always reads as 1. B only exists in the copy of P pushed to the
//! stack: set by BRK and PHP, clear for IRQ and NMI.

/// Carry flag - set if operation resulted in carry/borrow.
pub const C: u8 = 0x01;

/// Zero flag - set if result is zero.
pub const Z: u8 = 0x02;

/// Interrupt disable - when set, IRQ interrupts are ignored.
pub const I: u8 = 0x04;

/// Decimal mode - enables BCD arithmetic for ADC/SBC.
pub const D: u8 = 0x08;

/// Break flag - only meaningful in a pushed status byte.
pub const B: u8 = 0x10;

/// Reserved bit - always reads as 1.
pub const R: u8 = 0x20;

/// Overflow flag - set if signed arithmetic overflowed.
pub const V: u8 = 0x40;

/// Negative flag - set if result has bit 7 set.
pub const N: u8 = 0x80;

/// Z and N bits implied by each possible result byte.
pub static ZN_FLAGS: [u8; 256] = zn_table();

const fn zn_table() -> [u8; 256] {
    let mut table = [0; 256];
    let mut value = 0;
    while value < 256 {
        table[value] = if value == 0 {
            Z
        } else if value >= 0x80 {
            N
        } else {
            0
        };
        value += 1;
    }
    table
}

/// Processor status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(pub u8);

impl Default for Status {
    fn default() -> Self {
        Self::new()
    }
}

impl Status {
    /// Status after reset: I and R set, everything else clear.
    #[must_use]
    pub const fn new() -> Self {
        Self(R | I)
    }

    /// Create status from raw value, forcing the reserved bit on.
    #[must_use]
    pub const fn from_byte(value: u8) -> Self {
        Self(value | R)
    }

    /// Status pulled by PLP/RTI. B does not exist in the register.
    #[must_use]
    pub const fn from_stack(value: u8) -> Self {
        Self((value | R) & !B)
    }

    /// Byte pushed by BRK and PHP.
    #[must_use]
    pub const fn to_byte_brk(self) -> u8 {
        self.0 | R | B
    }

    /// Byte pushed when entering an IRQ or NMI handler.
    #[must_use]
    pub const fn to_byte_irq(self) -> u8 {
        (self.0 | R) & !B
    }

    #[must_use]
    pub const fn is_set(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    pub fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    /// Set or clear a flag based on condition.
    pub fn set_if(&mut self, flag: u8, condition: bool) {
        if condition {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Update N and Z from a result byte.
    pub fn update_nz(&mut self, value: u8) {
        self.0 = (self.0 & !(N | Z)) | ZN_FLAGS[value as usize];
    }
}
