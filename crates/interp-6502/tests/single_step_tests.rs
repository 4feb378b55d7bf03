//! Integration tests using Tom Harte's `SingleStepTests` for the 6502.
//!
//! Each documented opcode file holds 10,000 cases. Every case sets up
//! registers and RAM, runs one instruction with `step()`, and compares the
//! final registers, RAM and cycle count. The undocumented opcodes run as
//! no-ops here, so their files are skipped.
//!
//! Test data lives in `test-data/65x02/6502/v1/XX.json`.

use std::fs;
use std::path::Path;

use emu_core::{Bus, SimpleBus};
use interp_6502::{Config, Cpu6502, Signal, Status, decode};
use serde::Deserialize;

type TestCpu = Cpu6502<SimpleBus, fn() -> Signal>;

/// JSON test case format.
#[derive(Deserialize)]
struct TestCase {
    name: String,
    initial: CpuState,
    #[serde(rename = "final")]
    final_state: CpuState,
    cycles: Vec<(u16, u8, String)>,
}

/// JSON CPU state format.
#[derive(Deserialize)]
struct CpuState {
    pc: u16,
    s: u8,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    ram: Vec<(u16, u8)>,
}

fn never_polled() -> Signal {
    Signal::Continue
}

fn setup(state: &CpuState) -> TestCpu {
    let mut bus = SimpleBus::new();
    for &(addr, value) in &state.ram {
        bus.write(addr, value);
    }
    let mut cpu = Cpu6502::new(Config::default(), bus, never_polled as fn() -> Signal)
        .expect("default config is valid");
    cpu.regs.pc = state.pc;
    cpu.regs.s = state.s;
    cpu.regs.a = state.a;
    cpu.regs.x = state.x;
    cpu.regs.y = state.y;
    cpu.regs.p = Status::from_byte(state.p);
    cpu
}

/// Compare the interpreter against the expected state, returning a list of
/// mismatches.
fn compare(cpu: &TestCpu, cycles: u32, test: &TestCase) -> Vec<String> {
    let expected = &test.final_state;
    let mut errors = Vec::new();

    let registers = [
        ("A", cpu.a(), expected.a),
        ("X", cpu.x(), expected.x),
        ("Y", cpu.y(), expected.y),
        ("S", cpu.sp(), expected.s),
    ];
    for (name, got, want) in registers {
        if got != want {
            errors.push(format!("{name}: got ${got:02X}, want ${want:02X}"));
        }
    }
    if cpu.pc() != expected.pc {
        errors.push(format!(
            "PC: got ${:04X}, want ${:04X}",
            cpu.pc(),
            expected.pc
        ));
    }

    // B is not a register bit; R always reads as set
    let actual_p = cpu.status();
    let expected_p = (expected.p | 0x20) & !0x10;
    if actual_p != expected_p {
        errors.push(format!(
            "P: got ${actual_p:02X} ({actual_p:08b}), want ${expected_p:02X} ({expected_p:08b})"
        ));
    }

    for &(addr, want) in &expected.ram {
        let got = cpu.bus().peek(addr);
        if got != want {
            errors.push(format!("RAM[${addr:04X}]: got ${got:02X}, want ${want:02X}"));
        }
    }

    let want_cycles = test.cycles.len();
    if usize::try_from(cycles).ok() != Some(want_cycles) {
        errors.push(format!("cycles: got {cycles}, want {want_cycles}"));
    }

    errors
}

#[test]
#[ignore = "requires test-data/65x02 - run with --ignored"]
fn run_all() {
    let test_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("parent of crate dir")
        .parent()
        .expect("workspace root")
        .join("test-data/65x02/6502/v1");

    if !test_dir.exists() {
        eprintln!("Test data not found at {}", test_dir.display());
        eprintln!("Skipping SingleStepTests.");
        return;
    }

    let mut total_pass = 0u64;
    let mut total_fail = 0u64;

    for opcode in 0..=0xFF_u8 {
        if !decode(opcode).is_documented() {
            continue;
        }
        let filename = format!("{opcode:02x}.json");
        let path = test_dir.join(&filename);
        if !path.exists() {
            continue;
        }

        let data = fs::read_to_string(&path).unwrap_or_else(|e| {
            panic!("Failed to read {}: {e}", path.display());
        });
        let tests: Vec<TestCase> = serde_json::from_str(&data).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {e}", path.display());
        });

        let mut file_pass = 0u32;
        let mut file_fail = 0u32;
        let mut first_failures = Vec::new();

        for test in &tests {
            let mut cpu = setup(&test.initial);
            let cycles = cpu.step();

            let errors = compare(&cpu, cycles, test);
            if errors.is_empty() {
                file_pass += 1;
            } else {
                file_fail += 1;
                if first_failures.len() < 5 {
                    first_failures.push(format!("  FAIL [{}]: {}", test.name, errors.join(", ")));
                }
            }
        }

        let status = if file_fail == 0 { "PASS" } else { "FAIL" };
        println!(
            "Opcode ${opcode:02X} ({}): {status} {file_pass}/{} passed",
            decode(opcode).mnemonic,
            file_pass + file_fail
        );
        for msg in &first_failures {
            println!("{msg}");
        }

        total_pass += u64::from(file_pass);
        total_fail += u64::from(file_fail);
    }

    println!();
    println!("=== SingleStepTests Summary ===");
    println!(
        "Total: {}, Pass: {total_pass}, Fail: {total_fail}",
        total_pass + total_fail
    );

    assert_eq!(total_fail, 0, "{total_fail} tests failed");
}
