//! Klaus Dormann's 6502 functional test harness.
//!
//! The functional test exercises all documented 6502 opcodes, decimal mode
//! included. The binary is assembled with load address $0000 and entered at
//! $0400. It finishes by branching to itself: $3469 on success, any other
//! trap address on failure.

use emu_core::SimpleBus;
use interp_6502::{Config, Cpu6502, Signal};

const ENTRY: u16 = 0x0400;
const SUCCESS: u16 = 0x3469;

/// Run until PC stops moving. Returns the trap address.
fn run_to_trap(binary: &[u8]) -> Option<u16> {
    let mut bus = SimpleBus::new();
    bus.load(0x0000, binary);

    let mut cpu = Cpu6502::new(Config::default(), bus, (|| Signal::Continue) as fn() -> Signal)
        .expect("default config is valid");
    cpu.set_pc(ENTRY);

    let mut cycles: u64 = 0;
    for instructions in 0..100_000_000_u64 {
        let start_pc = cpu.pc();
        cycles += u64::from(cpu.step());

        if cpu.pc() == start_pc {
            eprintln!("Trapped at ${start_pc:04X} after {instructions} instructions ({cycles} cycles)");
            return Some(start_pc);
        }
    }

    eprintln!("Test exceeded 100M instructions limit");
    None
}

#[test]
#[ignore = "requires tests/data/6502_functional_test.bin - run with --ignored"]
fn dormann_functional() {
    let binary = std::fs::read("tests/data/6502_functional_test.bin").expect(
        "tests/data/6502_functional_test.bin not found - download from Klaus Dormann's repository",
    );
    assert_eq!(
        run_to_trap(&binary),
        Some(SUCCESS),
        "Klaus Dormann 6502 functional test failed"
    );
}
