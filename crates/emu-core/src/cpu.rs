//! Instruction-stepping CPU core trait.

/// A CPU core that executes whole instructions against a bus it holds.
///
/// The core owns (or borrows mutably) the bus it was constructed with, so
/// none of these methods take one. Hosts that want to inspect memory reach
/// it through the implementing type.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Execute one instruction and return the cycles it took.
    fn step(&mut self) -> u32;

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true once the core has stopped running.
    fn is_halted(&self) -> bool;

    /// Request a maskable interrupt.
    fn irq(&mut self);

    /// Request a non-maskable interrupt.
    fn nmi(&mut self);

    /// Run the reset sequence.
    fn reset(&mut self);
}
