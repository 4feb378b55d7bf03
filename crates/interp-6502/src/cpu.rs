//! The interpreter object: register file, host capabilities, scheduler
//! state, and its public surface.

use emu_core::{Bus, Cpu, Observable, Value};

use crate::config::{Config, ConfigError};
use crate::flags::{self, C, D, I, N, V, Z};
use crate::interrupt::{Interrupt, Poll, RESET_VECTOR};
use crate::scheduler::RunState;
use crate::{Registers, Status};

/// An NMOS 6502 interpreter driving a host-supplied bus.
///
/// Executes whole instructions and charges each its documented cycle cost.
/// Every fetch, data access, stack access and vector read goes through the
/// bus, in the order the chip performs them.
pub struct Cpu6502<B, P> {
    /// CPU registers.
    pub regs: Registers,

    pub(crate) bus: B,
    pub(crate) host: P,
    pub(crate) config: Config,

    /// Scheduler state, including any interrupt request not yet serviced.
    pub(crate) state: RunState,

    /// Cycles until the next host poll. Goes negative when the last
    /// instruction overshoots the budget.
    pub(crate) cycles_left: i32,
}

impl<B: Bus, P: Poll> Cpu6502<B, P> {
    /// Create an interpreter over `bus`, polling `host` every
    /// `config.interrupt_period` cycles.
    ///
    /// Registers hold their power-on values until [`reset`](Self::reset)
    /// loads PC from the reset vector.
    pub fn new(config: Config, bus: B, host: P) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            regs: Registers::new(),
            bus,
            host,
            config,
            state: RunState::Running,
            cycles_left: config.budget(),
        })
    }

    /// Run the reset sequence.
    ///
    /// Sets I and the reserved bit, puts S at $FD, clears any pending
    /// interrupt and refills the poll budget, then loads PC from $FFFC/$FFFD.
    pub fn reset(&mut self) {
        self.regs = Registers::new();
        self.state = RunState::Running;
        self.cycles_left = self.config.budget();
        self.regs.pc = self.read_word(RESET_VECTOR);
        log::debug!("reset, PC=${:04X}", self.regs.pc);
    }

    /// Record an interrupt request for the scheduler.
    ///
    /// An NMI is taken before the next instruction. An IRQ is looked at on
    /// the next host poll and dropped there if I is set. An NMI already
    /// pending is never replaced by an IRQ.
    pub fn interrupt(&mut self, kind: Interrupt) {
        let pending = Interrupt::merge(self.state.pending(), Some(kind));
        if let Some(request) = pending {
            self.state = RunState::InterruptPending(request);
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.state == RunState::Halted
    }

    /// Cycles left before the next host poll.
    #[must_use]
    pub fn cycles_left(&self) -> i32 {
        self.cycles_left
    }

    #[must_use]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Give back the bus and the host.
    pub fn into_parts(self) -> (B, P) {
        (self.bus, self.host)
    }

    // =========================================================================
    // Register accessors
    // =========================================================================

    #[must_use]
    pub fn a(&self) -> u8 {
        self.regs.a
    }

    #[must_use]
    pub fn x(&self) -> u8 {
        self.regs.x
    }

    #[must_use]
    pub fn y(&self) -> u8 {
        self.regs.y
    }

    #[must_use]
    pub fn sp(&self) -> u8 {
        self.regs.s
    }

    #[must_use]
    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    /// P as seen from outside: reserved bit set.
    #[must_use]
    pub fn status(&self) -> u8 {
        self.regs.p.0 | flags::R
    }

    pub fn set_a(&mut self, value: u8) {
        self.regs.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.regs.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.regs.y = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.regs.s = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.regs.pc = value;
    }

    pub fn set_status(&mut self, value: u8) {
        self.regs.p = Status::from_byte(value);
    }

    /// True if every bit of `mask` is set in P.
    #[must_use]
    pub fn flag(&self, mask: u8) -> bool {
        self.regs.p.0 & mask == mask
    }

    pub fn set_flag(&mut self, mask: u8, on: bool) {
        self.regs.p.set_if(mask, on);
    }

    // =========================================================================
    // Bus access
    // =========================================================================

    pub(crate) fn read(&mut self, address: u16) -> u8 {
        self.bus.read(address)
    }

    pub(crate) fn write(&mut self, address: u16, value: u8) {
        self.bus.write(address, value);
    }

    /// Fetch the next byte at PC and increment PC.
    pub(crate) fn fetch(&mut self) -> u8 {
        let value = self.bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Fetch a little-endian word at PC.
    pub(crate) fn fetch_word(&mut self) -> u16 {
        let low = self.fetch();
        let high = self.fetch();
        u16::from_le_bytes([low, high])
    }

    /// Read a little-endian word.
    pub(crate) fn read_word(&mut self, address: u16) -> u16 {
        let low = self.bus.read(address);
        let high = self.bus.read(address.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    pub(crate) fn push(&mut self, value: u8) {
        let addr = self.regs.push();
        self.bus.write(addr, value);
    }

    pub(crate) fn pull(&mut self) -> u8 {
        let addr = self.regs.pop();
        self.bus.read(addr)
    }
}

impl<B: Bus, P: Poll> Cpu for Cpu6502<B, P> {
    type Registers = Registers;

    fn step(&mut self) -> u32 {
        Cpu6502::step(self)
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Self::Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        Cpu6502::is_halted(self)
    }

    fn irq(&mut self) {
        self.interrupt(Interrupt::Irq);
    }

    fn nmi(&mut self) {
        self.interrupt(Interrupt::Nmi);
    }

    fn reset(&mut self) {
        Cpu6502::reset(self);
    }
}

impl<B: Bus, P: Poll> Observable for Cpu6502<B, P> {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "s" | "sp" => Some(self.regs.s.into()),
            "p" | "status" => Some(self.status().into()),
            "flags.c" | "c" => Some(self.regs.p.is_set(C).into()),
            "flags.z" | "z" => Some(self.regs.p.is_set(Z).into()),
            "flags.i" | "i" => Some(self.regs.p.is_set(I).into()),
            "flags.d" | "d" => Some(self.regs.p.is_set(D).into()),
            "flags.b" | "b" => Some(self.regs.p.is_set(flags::B).into()),
            "flags.v" | "v" => Some(self.regs.p.is_set(V).into()),
            "flags.n" | "n" => Some(self.regs.p.is_set(N).into()),
            "cycles_left" => Some(self.cycles_left.into()),
            "halted" => Some(self.is_halted().into()),
            "state" => Some(self.state.name().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc",
            "a",
            "x",
            "y",
            "s",
            "p",
            "flags.c",
            "flags.z",
            "flags.i",
            "flags.d",
            "flags.b",
            "flags.v",
            "flags.n",
            "cycles_left",
            "halted",
            "state",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Signal;
    use emu_core::SimpleBus;

    fn cpu() -> Cpu6502<SimpleBus, fn() -> Signal> {
        let mut bus = SimpleBus::new();
        bus.load(RESET_VECTOR, &[0x00, 0xC0]);
        Cpu6502::new(Config::default(), bus, (|| Signal::Quit) as fn() -> Signal)
            .expect("default config is valid")
    }

    #[test]
    fn reset_loads_vector_and_power_on_state() {
        let mut cpu = cpu();
        cpu.regs.a = 0x12;
        cpu.regs.s = 0x00;
        cpu.regs.p = Status(0);
        cpu.reset();
        assert_eq!(cpu.pc(), 0xC000);
        assert_eq!(cpu.sp(), 0xFD);
        assert!(cpu.flag(I));
        assert_eq!(cpu.status() & flags::R, flags::R);
        assert_eq!(cpu.a(), 0);
    }

    #[test]
    fn new_rejects_bad_config() {
        let result = Cpu6502::new(
            Config::default().with_interrupt_period(0),
            SimpleBus::new(),
            || Signal::Continue,
        );
        assert_eq!(result.err(), Some(ConfigError::ZeroInterruptPeriod));
    }

    #[test]
    fn status_always_shows_reserved_bit() {
        let mut cpu = cpu();
        cpu.regs.p = Status(0);
        assert_eq!(cpu.status(), 0x20);
        cpu.set_status(0x00);
        assert_eq!(cpu.regs.p.0, 0x20);
    }

    #[test]
    fn observable_paths_answer() {
        let mut cpu = cpu();
        cpu.reset();
        for path in cpu.query_paths() {
            assert!(cpu.query(path).is_some(), "no answer for {path}");
        }
        assert_eq!(cpu.query("pc"), Some(Value::U16(0xC000)));
        assert_eq!(cpu.query("flags.i"), Some(Value::Bool(true)));
        assert_eq!(cpu.query("nope"), None);
    }

    #[test]
    fn pending_nmi_not_downgraded() {
        let mut cpu = cpu();
        cpu.interrupt(Interrupt::Nmi);
        cpu.interrupt(Interrupt::Irq);
        assert_eq!(cpu.state(), RunState::InterruptPending(Interrupt::Nmi));
    }
}
