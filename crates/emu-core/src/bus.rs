//! Memory and I/O bus interface.

/// Memory and I/O bus interface.
///
/// CPU cores reach memory and peripherals only through this trait. The host
/// decides what backs each address: RAM, ROM, mirrored regions or device
/// registers whose reads have side effects.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);
}

impl<B: Bus + ?Sized> Bus for &mut B {
    fn read(&mut self, address: u16) -> u8 {
        (**self).read(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        (**self).write(address, value);
    }
}

/// A bus built from a read closure and a write closure.
///
/// Lets a host wire a core to existing memory handling without defining a
/// type for it.
pub struct FnBus<R, W> {
    read: R,
    write: W,
}

impl<R, W> FnBus<R, W>
where
    R: FnMut(u16) -> u8,
    W: FnMut(u16, u8),
{
    #[must_use]
    pub fn new(read: R, write: W) -> Self {
        Self { read, write }
    }
}

impl<R, W> Bus for FnBus<R, W>
where
    R: FnMut(u16) -> u8,
    W: FnMut(u16, u8),
{
    fn read(&mut self, address: u16) -> u8 {
        (self.read)(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        (self.write)(address, value);
    }
}

/// Flat 64 KiB RAM with no devices mapped.
///
/// Useful for tests and for hosts that only need plain memory.
pub struct SimpleBus {
    ram: Box<[u8; 0x10000]>,
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: Box::new([0; 0x10000]),
        }
    }

    /// Copy `data` into memory starting at `address`, wrapping past $FFFF.
    pub fn load(&mut self, address: u16, data: &[u8]) {
        let mut addr = address;
        for &byte in data {
            self.ram[addr as usize] = byte;
            addr = addr.wrapping_add(1);
        }
    }

    /// Read a byte without going through the bus.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.ram[address as usize]
    }

    /// Write a byte without going through the bus.
    pub fn poke(&mut self, address: u16, value: u8) {
        self.ram[address as usize] = value;
    }
}

impl Bus for SimpleBus {
    fn read(&mut self, address: u16) -> u8 {
        self.ram[address as usize]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.ram[address as usize] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_bus_load_wraps_at_top_of_memory() {
        let mut bus = SimpleBus::new();
        bus.load(0xFFFE, &[0x11, 0x22, 0x33]);
        assert_eq!(bus.peek(0xFFFE), 0x11);
        assert_eq!(bus.peek(0xFFFF), 0x22);
        assert_eq!(bus.peek(0x0000), 0x33);
    }

    #[test]
    fn fn_bus_forwards_to_closures() {
        let mut written = Vec::new();
        {
            let mut bus = FnBus::new(|addr| (addr >> 8) as u8, |addr, value| {
                written.push((addr, value));
            });
            assert_eq!(bus.read(0x12FF), 0x12);
            bus.write(0x0200, 0xAB);
        }
        assert_eq!(written, vec![(0x0200, 0xAB)]);
    }

    #[test]
    fn borrowed_bus_is_a_bus() {
        let mut ram = SimpleBus::new();
        {
            let mut lent: &mut SimpleBus = &mut ram;
            lent.write(0x1234, 0x56);
            assert_eq!(Bus::read(&mut lent, 0x1234), 0x56);
        }
        assert_eq!(ram.peek(0x1234), 0x56);
    }
}
