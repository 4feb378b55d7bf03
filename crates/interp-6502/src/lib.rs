//! Cycle-counting NMOS 6502 interpreter.
//!
//! Executes the documented NMOS 6502 instruction set one instruction at a
//! time, charging each the cycles the real chip takes: base cost from a
//! fixed table, plus one for an indexed read that crosses a page and one or
//! two for a taken branch. Memory and devices live behind the host's
//! [`emu_core::Bus`]; the host is polled through [`Poll`] every
//! `interrupt_period` cycles and answers with a [`Signal`].
//!
//! ```
//! use emu_core::SimpleBus;
//! use interp_6502::{Config, Cpu6502, Signal};
//!
//! let mut bus = SimpleBus::new();
//! bus.load(0xFFFC, &[0x00, 0x02]); // reset vector -> $0200
//! bus.load(0x0200, &[0xA9, 0x2A, 0x4C, 0x02, 0x02]); // LDA #$2A; JMP $0202
//!
//! let mut cpu = Cpu6502::new(Config::default(), bus, || Signal::Quit)?;
//! cpu.reset();
//! let cycles = cpu.run();
//! assert_eq!(cpu.a(), 0x2A);
//! assert!(cycles.get() >= u64::from(cpu.config().interrupt_period));
//! # Ok::<(), interp_6502::ConfigError>(())
//! ```
//!
//! # Undocumented opcodes
//!
//! The 105 opcodes outside the documented set, JAM included, run as no-ops:
//! they step over the operand bytes their column implies and cost their
//! table cycles. Nothing else changes.

mod addressing;
mod alu;
mod config;
mod cpu;
mod execute;
pub mod flags;
mod interrupt;
mod opcodes;
mod registers;
mod scheduler;
mod timing;

pub use config::{Config, ConfigError, DEFAULT_CLOCK_HZ, DEFAULT_INTERRUPT_PERIOD};
pub use cpu::Cpu6502;
pub use flags::{Status, ZN_FLAGS};
pub use interrupt::{Interrupt, IRQ_VECTOR, NMI_VECTOR, Poll, RESET_VECTOR, Signal};
pub use opcodes::{AddrMode, Instruction, Mnemonic, decode};
pub use registers::{Registers, STACK_PAGE};
pub use scheduler::RunState;
pub use timing::{CYCLES, INTERRUPT_CYCLES, page_crossed};
