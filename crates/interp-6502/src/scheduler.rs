//! Run loop and interrupt scheduling.
//!
//! `run()` executes instructions and charges each against a budget of
//! `interrupt_period` cycles. When the budget reaches zero the host is
//! polled. Its answer, merged with any request recorded through
//! `interrupt()`, decides whether to keep going, enter a handler, or stop.
//!
//! An NMI recorded through `interrupt()` is taken before the next
//! instruction. An IRQ waits for the poll and is dropped there if I is set:
//! the IRQ line is level-triggered, so a host that wants service must keep
//! asserting it.

use emu_core::{Bus, Ticks};

use crate::cpu::Cpu6502;
use crate::flags::I;
use crate::interrupt::{Interrupt, Poll, Signal};

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    Running,
    /// A request from `interrupt()` waiting to be serviced.
    InterruptPending(Interrupt),
    /// The host answered Quit.
    Halted,
}

impl RunState {
    /// The request waiting to be serviced, if any.
    #[must_use]
    pub const fn pending(self) -> Option<Interrupt> {
        match self {
            RunState::InterruptPending(kind) => Some(kind),
            RunState::Running | RunState::Halted => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            RunState::Running => "running",
            RunState::InterruptPending(Interrupt::Irq) => "irq pending",
            RunState::InterruptPending(Interrupt::Nmi) => "nmi pending",
            RunState::Halted => "halted",
        }
    }
}

impl<B: Bus, P: Poll> Cpu6502<B, P> {
    /// Execute instructions until the host's poll answers Quit.
    ///
    /// Returns the cycles executed by this call, interrupt entries
    /// included. A halted interpreter resumes when `run()` is called again.
    pub fn run(&mut self) -> Ticks {
        let mut executed = Ticks::ZERO;
        if self.state == RunState::Halted {
            self.state = RunState::Running;
        }

        loop {
            if self.state == RunState::InterruptPending(Interrupt::Nmi) {
                self.state = RunState::Running;
                executed += self.service(Interrupt::Nmi);
            }

            let cycles = self.step();
            executed += self.charge(cycles);

            if self.cycles_left <= 0 {
                match self.poll_host() {
                    Some(cycles) => executed += cycles,
                    None => break,
                }
            }
        }

        log::debug!(
            "run stopped at ${:04X} after {executed}",
            self.regs.pc
        );
        executed
    }

    /// Take `cycles` off the poll budget and pass them through.
    fn charge(&mut self, cycles: u32) -> Ticks {
        self.cycles_left = self
            .cycles_left
            .saturating_sub(i32::try_from(cycles).unwrap_or(i32::MAX));
        Ticks::from(cycles)
    }

    fn service(&mut self, kind: Interrupt) -> Ticks {
        let cycles = self.enter_interrupt(kind);
        self.charge(cycles)
    }

    /// Ask the host what to do at the end of a period.
    ///
    /// Returns the cycles spent entering an interrupt handler, or `None` on
    /// Quit.
    fn poll_host(&mut self) -> Option<Ticks> {
        let signal = self.host.poll();
        if signal == Signal::Quit {
            self.state = RunState::Halted;
            return None;
        }

        self.cycles_left = self.cycles_left.saturating_add(self.config.budget());

        let pending = self.state.pending();
        self.state = RunState::Running;
        match Interrupt::merge(pending, signal.interrupt()) {
            Some(Interrupt::Nmi) => Some(self.service(Interrupt::Nmi)),
            Some(Interrupt::Irq) if !self.regs.p.is_set(I) => {
                Some(self.service(Interrupt::Irq))
            }
            Some(Interrupt::Irq) => {
                log::trace!("IRQ dropped at ${:04X}: I set", self.regs.pc);
                Some(Ticks::ZERO)
            }
            None => Some(Ticks::ZERO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use emu_core::SimpleBus;

    #[test]
    fn budget_carries_overshoot() {
        // Tight loop of 3-cycle JMPs against a 10-cycle period
        let mut bus = SimpleBus::new();
        bus.load(0x0200, &[0x4C, 0x00, 0x02]);
        let mut polls = 0;
        let host = move || {
            polls += 1;
            if polls == 3 { Signal::Quit } else { Signal::Continue }
        };
        let mut cpu = Cpu6502::new(Config::default().with_interrupt_period(10), bus, host)
            .expect("valid config");
        cpu.regs.pc = 0x0200;

        // Polls land after 12, 21 and 30 cycles
        let executed = cpu.run();
        assert_eq!(executed, Ticks::new(30));
        assert!(cpu.is_halted());
        assert_eq!(cpu.cycles_left(), 10 - 30 + 20);
    }

    #[test]
    fn run_resumes_after_halt() {
        let mut bus = SimpleBus::new();
        bus.load(0x0200, &[0xEA; 16]);
        let mut cpu = Cpu6502::new(
            Config::default().with_interrupt_period(4),
            bus,
            || Signal::Quit,
        )
        .expect("valid config");
        cpu.regs.pc = 0x0200;

        assert_eq!(cpu.run(), Ticks::new(4));
        assert_eq!(cpu.regs.pc, 0x0202);
        // Budget is spent, so the next run polls after one instruction
        assert_eq!(cpu.run(), Ticks::new(2));
        assert_eq!(cpu.regs.pc, 0x0203);
    }

    #[test]
    fn state_names() {
        assert_eq!(RunState::Running.name(), "running");
        assert_eq!(RunState::InterruptPending(Interrupt::Nmi).name(), "nmi pending");
        assert_eq!(RunState::Halted.pending(), None);
    }
}
