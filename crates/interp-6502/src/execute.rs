//! Instruction execution.
//!
//! `step()` fetches an opcode, decodes it, resolves the operand and runs
//! the operation. The cost is the opcode's base cycles from the timing
//! table plus whatever the page-crossing and branch rules add.

use emu_core::Bus;

use crate::addressing::{Access, Operand};
use crate::cpu::Cpu6502;
use crate::flags::{C, D, I, N, V, Z};
use crate::interrupt::{IRQ_VECTOR, Poll};
use crate::opcodes::{AddrMode, Instruction, Mnemonic, decode};
use crate::timing::page_crossed;
use crate::Status;

impl<B: Bus, P: Poll> Cpu6502<B, P> {
    /// Execute one instruction and return the cycles it took.
    ///
    /// Works outside the scheduler: the poll budget is untouched and no
    /// pending interrupt is serviced.
    pub fn step(&mut self) -> u32 {
        let opcode = self.fetch();
        let instruction = decode(opcode);
        u32::from(instruction.base_cycles()) + self.execute(instruction)
    }

    /// Run a decoded instruction. Returns cycles beyond the base cost.
    fn execute(&mut self, instruction: Instruction) -> u32 {
        let mode = instruction.mode;
        match instruction.mnemonic {
            // =================================================================
            // Load/Store
            // =================================================================
            Mnemonic::LDA => self.read_op(instruction, |cpu, value| {
                cpu.regs.a = value;
                cpu.regs.p.update_nz(value);
            }),
            Mnemonic::LDX => self.read_op(instruction, |cpu, value| {
                cpu.regs.x = value;
                cpu.regs.p.update_nz(value);
            }),
            Mnemonic::LDY => self.read_op(instruction, |cpu, value| {
                cpu.regs.y = value;
                cpu.regs.p.update_nz(value);
            }),
            Mnemonic::STA => self.store(instruction, self.regs.a),
            Mnemonic::STX => self.store(instruction, self.regs.x),
            Mnemonic::STY => self.store(instruction, self.regs.y),

            // =================================================================
            // Arithmetic, logic, compare
            // =================================================================
            Mnemonic::ADC => self.read_op(instruction, Self::adc),
            Mnemonic::SBC => self.read_op(instruction, Self::sbc),
            Mnemonic::AND => self.read_op(instruction, |cpu, value| {
                cpu.regs.a &= value;
                cpu.regs.p.update_nz(cpu.regs.a);
            }),
            Mnemonic::ORA => self.read_op(instruction, |cpu, value| {
                cpu.regs.a |= value;
                cpu.regs.p.update_nz(cpu.regs.a);
            }),
            Mnemonic::EOR => self.read_op(instruction, |cpu, value| {
                cpu.regs.a ^= value;
                cpu.regs.p.update_nz(cpu.regs.a);
            }),
            Mnemonic::CMP => self.read_op(instruction, |cpu, value| cpu.compare(cpu.regs.a, value)),
            Mnemonic::CPX => self.read_op(instruction, |cpu, value| cpu.compare(cpu.regs.x, value)),
            Mnemonic::CPY => self.read_op(instruction, |cpu, value| cpu.compare(cpu.regs.y, value)),
            Mnemonic::BIT => self.read_op(instruction, Self::bit),

            // =================================================================
            // Read-modify-write
            // =================================================================
            Mnemonic::ASL => self.modify(instruction, Self::asl),
            Mnemonic::LSR => self.modify(instruction, Self::lsr),
            Mnemonic::ROL => self.modify(instruction, Self::rol),
            Mnemonic::ROR => self.modify(instruction, Self::ror),
            Mnemonic::INC => self.modify(instruction, Self::inc),
            Mnemonic::DEC => self.modify(instruction, Self::dec),

            // =================================================================
            // Register increments and transfers
            // =================================================================
            Mnemonic::INX => {
                self.regs.x = self.inc(self.regs.x);
                0
            }
            Mnemonic::INY => {
                self.regs.y = self.inc(self.regs.y);
                0
            }
            Mnemonic::DEX => {
                self.regs.x = self.dec(self.regs.x);
                0
            }
            Mnemonic::DEY => {
                self.regs.y = self.dec(self.regs.y);
                0
            }
            Mnemonic::TAX => {
                self.regs.x = self.regs.a;
                self.regs.p.update_nz(self.regs.x);
                0
            }
            Mnemonic::TAY => {
                self.regs.y = self.regs.a;
                self.regs.p.update_nz(self.regs.y);
                0
            }
            Mnemonic::TXA => {
                self.regs.a = self.regs.x;
                self.regs.p.update_nz(self.regs.a);
                0
            }
            Mnemonic::TYA => {
                self.regs.a = self.regs.y;
                self.regs.p.update_nz(self.regs.a);
                0
            }
            Mnemonic::TSX => {
                self.regs.x = self.regs.s;
                self.regs.p.update_nz(self.regs.x);
                0
            }
            // TXS is the one transfer that leaves the flags alone
            Mnemonic::TXS => {
                self.regs.s = self.regs.x;
                0
            }

            // =================================================================
            // Stack
            // =================================================================
            Mnemonic::PHA => {
                self.push(self.regs.a);
                0
            }
            Mnemonic::PHP => {
                self.push(self.regs.p.to_byte_brk());
                0
            }
            Mnemonic::PLA => {
                let value = self.pull();
                self.regs.a = value;
                self.regs.p.update_nz(value);
                0
            }
            Mnemonic::PLP => {
                let value = self.pull();
                self.regs.p = Status::from_stack(value);
                0
            }

            // =================================================================
            // Jumps, calls, returns
            // =================================================================
            Mnemonic::JMP => {
                if let (Operand::Memory(target), _) = self.resolve(mode, Access::Read) {
                    self.regs.pc = target;
                }
                0
            }
            Mnemonic::JSR => {
                let low = self.fetch();
                // Return address pushed is the last byte of the JSR
                self.push(self.regs.pch());
                self.push(self.regs.pcl());
                let high = self.fetch();
                self.regs.set_pc_bytes(low, high);
                0
            }
            Mnemonic::RTS => {
                let low = self.pull();
                let high = self.pull();
                self.regs.set_pc_bytes(low, high);
                self.regs.pc = self.regs.pc.wrapping_add(1);
                0
            }
            Mnemonic::RTI => {
                let status = self.pull();
                self.regs.p = Status::from_stack(status);
                let low = self.pull();
                let high = self.pull();
                self.regs.set_pc_bytes(low, high);
                0
            }
            Mnemonic::BRK => {
                // Signature byte after BRK is skipped
                let _ = self.fetch();
                self.push(self.regs.pch());
                self.push(self.regs.pcl());
                self.push(self.regs.p.to_byte_brk());
                self.regs.p.set(I);
                self.regs.pc = self.read_word(IRQ_VECTOR);
                0
            }

            // =================================================================
            // Branches
            // =================================================================
            Mnemonic::BPL => self.branch(mode, !self.regs.p.is_set(N)),
            Mnemonic::BMI => self.branch(mode, self.regs.p.is_set(N)),
            Mnemonic::BVC => self.branch(mode, !self.regs.p.is_set(V)),
            Mnemonic::BVS => self.branch(mode, self.regs.p.is_set(V)),
            Mnemonic::BCC => self.branch(mode, !self.regs.p.is_set(C)),
            Mnemonic::BCS => self.branch(mode, self.regs.p.is_set(C)),
            Mnemonic::BNE => self.branch(mode, !self.regs.p.is_set(Z)),
            Mnemonic::BEQ => self.branch(mode, self.regs.p.is_set(Z)),

            // =================================================================
            // Flags
            // =================================================================
            Mnemonic::CLC => self.flag_op(C, false),
            Mnemonic::SEC => self.flag_op(C, true),
            Mnemonic::CLI => self.flag_op(I, false),
            Mnemonic::SEI => self.flag_op(I, true),
            Mnemonic::CLD => self.flag_op(D, false),
            Mnemonic::SED => self.flag_op(D, true),
            Mnemonic::CLV => self.flag_op(V, false),

            Mnemonic::NOP => 0,
            Mnemonic::Illegal => self.illegal(instruction),
        }
    }

    /// Read-class instruction: resolve, load, apply. Pays the page-crossing
    /// cycle.
    fn read_op(&mut self, instruction: Instruction, op: impl FnOnce(&mut Self, u8)) -> u32 {
        let access = Access::of(instruction.mnemonic);
        let (operand, crossed) = self.resolve(instruction.mode, access);
        let value = self.load(operand);
        op(self, value);
        u32::from(crossed)
    }

    fn store(&mut self, instruction: Instruction, value: u8) -> u32 {
        let access = Access::of(instruction.mnemonic);
        if let (Operand::Memory(addr), _) = self.resolve(instruction.mode, access) {
            self.write(addr, value);
        }
        0
    }

    /// Read-modify-write. Memory forms write the unmodified value back
    /// before the result, as the NMOS chip does.
    fn modify(&mut self, instruction: Instruction, op: fn(&mut Self, u8) -> u8) -> u32 {
        let access = Access::of(instruction.mnemonic);
        match self.resolve(instruction.mode, access) {
            (Operand::Accumulator, _) => {
                let value = self.regs.a;
                self.regs.a = op(self, value);
            }
            (Operand::Memory(addr), _) => {
                let value = self.read(addr);
                self.write(addr, value);
                let result = op(self, value);
                self.write(addr, result);
            }
            _ => {}
        }
        0
    }

    /// Conditional branch. Taken: +1 cycle, +1 more if the target is on a
    /// different page from the next instruction.
    fn branch(&mut self, mode: AddrMode, condition: bool) -> u32 {
        let (Operand::Relative(offset), _) = self.resolve(mode, Access::Read) else {
            return 0;
        };
        if !condition {
            return 0;
        }
        let next = self.regs.pc;
        let target = next.wrapping_add(offset as u16);
        self.regs.pc = target;
        if page_crossed(next, target) { 2 } else { 1 }
    }

    fn flag_op(&mut self, flag: u8, on: bool) -> u32 {
        self.regs.p.set_if(flag, on);
        0
    }

    /// Undocumented opcode: step over its operand bytes, change nothing.
    fn illegal(&mut self, instruction: Instruction) -> u32 {
        for _ in 0..instruction.mode.operand_len() {
            let _ = self.fetch();
        }
        log::trace!(
            "illegal opcode ${:02X} at ${:04X} treated as NOP",
            instruction.opcode,
            self.regs.pc.wrapping_sub(instruction.len())
        );
        0
    }
}
