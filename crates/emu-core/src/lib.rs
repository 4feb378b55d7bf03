//! Core traits and types shared by CPU cores and the machines hosting them.
//!
//! A core never owns memory. Everything it touches goes through a [`Bus`]
//! supplied by the host, and every timing figure is counted in [`Ticks`]
//! of the CPU clock.

mod bus;
mod clock;
mod cpu;
mod observable;
mod ticks;

pub use bus::{Bus, FnBus, SimpleBus};
pub use clock::MasterClock;
pub use cpu::Cpu;
pub use observable::{Observable, Value};
pub use ticks::Ticks;
