//! Arithmetic, logic, compare and shift operations.
//!
//! Decimal mode follows the NMOS part: ADC derives N and V from the
//! intermediate result after the low-nibble adjust and Z from the binary
//! sum; SBC sets every flag from the binary difference and only adjusts the
//! value written to A.

use emu_core::Bus;

use crate::cpu::Cpu6502;
use crate::flags::{C, D, N, V, Z};
use crate::interrupt::Poll;

impl<B: Bus, P: Poll> Cpu6502<B, P> {
    /// ADC - Add with Carry
    pub(crate) fn adc(&mut self, value: u8) {
        if self.regs.p.is_set(D) {
            self.adc_decimal(value);
        } else {
            self.adc_binary(value);
        }
    }

    fn adc_binary(&mut self, value: u8) {
        let a = self.regs.a;
        let sum = u16::from(a) + u16::from(value) + u16::from(self.regs.p.is_set(C));
        let result = sum as u8;

        self.regs.p.set_if(C, sum > 0xFF);
        self.regs.p.set_if(V, (a ^ result) & (value ^ result) & 0x80 != 0);
        self.regs.p.update_nz(result);
        self.regs.a = result;
    }

    fn adc_decimal(&mut self, value: u8) {
        let a = u16::from(self.regs.a);
        let v = u16::from(value);
        let carry = u16::from(self.regs.p.is_set(C));

        let mut low = (a & 0x0F) + (v & 0x0F) + carry;
        if low > 0x09 {
            low += 0x06;
        }
        let mut high = (a >> 4) + (v >> 4) + u16::from(low > 0x0F);

        self.regs.p.set_if(Z, (a + v + carry) & 0xFF == 0);
        self.regs.p.set_if(N, high & 0x08 != 0);
        self.regs
            .p
            .set_if(V, ((high << 4) ^ a) & 0x80 != 0 && (a ^ v) & 0x80 == 0);

        if high > 0x09 {
            high += 0x06;
        }
        self.regs.p.set_if(C, high > 0x0F);
        self.regs.a = ((high << 4) | (low & 0x0F)) as u8;
    }

    /// SBC - Subtract with Carry (borrow)
    pub(crate) fn sbc(&mut self, value: u8) {
        let a = self.regs.a;
        let borrow = u16::from(!self.regs.p.is_set(C));
        let diff = u16::from(a)
            .wrapping_sub(u16::from(value))
            .wrapping_sub(borrow);
        let result = diff as u8;

        self.regs.p.set_if(C, diff < 0x100);
        self.regs.p.set_if(V, (a ^ value) & (a ^ result) & 0x80 != 0);
        self.regs.p.update_nz(result);

        self.regs.a = if self.regs.p.is_set(D) {
            Self::sbc_decimal_value(a, value, borrow as i16)
        } else {
            result
        };
    }

    fn sbc_decimal_value(a: u8, value: u8, borrow: i16) -> u8 {
        let a = i16::from(a);
        let v = i16::from(value);

        let mut low = (a & 0x0F) - (v & 0x0F) - borrow;
        if low < 0 {
            low = ((low - 0x06) & 0x0F) - 0x10;
        }
        let mut high = (a >> 4) - (v >> 4) + if low < 0 { -1 } else { 0 };
        if high < 0 {
            high = (high - 0x06) & 0x0F;
        }
        ((high << 4) | (low & 0x0F)) as u8
    }

    /// CMP/CPX/CPY: flags from `register - value`, nothing stored.
    pub(crate) fn compare(&mut self, register: u8, value: u8) {
        self.regs.p.set_if(C, register >= value);
        self.regs.p.update_nz(register.wrapping_sub(value));
    }

    /// ASL - Arithmetic Shift Left
    pub(crate) fn asl(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(C, value & 0x80 != 0);
        let result = value << 1;
        self.regs.p.update_nz(result);
        result
    }

    /// LSR - Logical Shift Right
    pub(crate) fn lsr(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(C, value & 0x01 != 0);
        let result = value >> 1;
        self.regs.p.update_nz(result);
        result
    }

    /// ROL - Rotate Left through carry
    pub(crate) fn rol(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.regs.p.is_set(C));
        self.regs.p.set_if(C, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }

    /// ROR - Rotate Right through carry
    pub(crate) fn ror(&mut self, value: u8) -> u8 {
        let carry_in = if self.regs.p.is_set(C) { 0x80 } else { 0 };
        self.regs.p.set_if(C, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }

    pub(crate) fn inc(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.regs.p.update_nz(result);
        result
    }

    pub(crate) fn dec(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.regs.p.update_nz(result);
        result
    }

    /// BIT: Z from A & value, N and V copied from bits 7 and 6.
    pub(crate) fn bit(&mut self, value: u8) {
        self.regs.p.set_if(Z, self.regs.a & value == 0);
        self.regs.p.set_if(N, value & 0x80 != 0);
        self.regs.p.set_if(V, value & 0x40 != 0);
    }
}
