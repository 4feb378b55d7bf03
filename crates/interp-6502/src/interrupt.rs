//! Interrupt requests, the host poll contract, and interrupt entry.

use emu_core::Bus;

use crate::cpu::Cpu6502;
use crate::flags::I;
use crate::timing::INTERRUPT_CYCLES;

/// NMI vector.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// Reset vector.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// IRQ and BRK vector.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// A hardware interrupt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Interrupt {
    /// Maskable interrupt. Ignored while I is set.
    Irq,
    /// Non-maskable interrupt. Always serviced.
    Nmi,
}

impl Interrupt {
    #[must_use]
    pub const fn vector(self) -> u16 {
        match self {
            Interrupt::Irq => IRQ_VECTOR,
            Interrupt::Nmi => NMI_VECTOR,
        }
    }

    /// The request that wins when two arrive together.
    #[must_use]
    pub fn merge(current: Option<Self>, incoming: Option<Self>) -> Option<Self> {
        current.max(incoming)
    }
}

/// What the host answers when polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Keep running.
    Continue,
    /// Raise an IRQ now.
    Irq,
    /// Raise an NMI now.
    Nmi,
    /// Stop `run()`.
    Quit,
}

impl Signal {
    /// The interrupt this answer requests, if any.
    #[must_use]
    pub const fn interrupt(self) -> Option<Interrupt> {
        match self {
            Signal::Irq => Some(Interrupt::Irq),
            Signal::Nmi => Some(Interrupt::Nmi),
            Signal::Continue | Signal::Quit => None,
        }
    }
}

/// Host capability polled every interrupt-check period.
pub trait Poll {
    fn poll(&mut self) -> Signal;
}

impl<F: FnMut() -> Signal> Poll for F {
    fn poll(&mut self) -> Signal {
        self()
    }
}

impl<B: Bus, P: Poll> Cpu6502<B, P> {
    /// Enter an interrupt handler: push PC and P (B clear), set I, jump
    /// through the vector. Returns the cycles taken.
    pub(crate) fn enter_interrupt(&mut self, kind: Interrupt) -> u32 {
        let return_pc = self.regs.pc;
        self.push(self.regs.pch());
        self.push(self.regs.pcl());
        self.push(self.regs.p.to_byte_irq());
        self.regs.p.set(I);
        self.regs.pc = self.read_word(kind.vector());
        log::trace!(
            "{kind:?} taken at ${return_pc:04X}, handler ${:04X}",
            self.regs.pc
        );
        INTERRUPT_CYCLES
    }
}
