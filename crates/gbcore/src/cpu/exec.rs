use crate::bus::Bus;
use crate::error::{CpuError, Result};

use super::dispatch::{AluOp, DispatchTable, Instr, Op, Operand, PREFIX_CB};
use super::{Cpu, Reg, RegPair};

impl Cpu {
    /// Execute a single instruction and return the number of T-cycles taken.
    ///
    /// Fetch → Decode → Execute → Advance. An opcode without a table entry
    /// fails with [`CpuError::UnimplementedOpcode`] before anything is
    /// executed, leaving every register and the program counter as they
    /// were.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        let pc = self.pc;

        // Fetch
        let opcode = bus.read8(pc);

        // Decode
        let instr = self.decode(bus, pc, opcode)?;

        // Execute
        self.execute(bus, instr.op)?;

        // Advance
        self.pc = pc.wrapping_add(instr.len as u16);

        log::trace!(
            "PC=0x{pc:04X} op=0x{opcode:02X} {:?} cycles={} AF=0x{:04X} BC=0x{:04X} DE=0x{:04X} HL=0x{:04X}",
            instr.op,
            instr.cycles,
            self.regs.get_pair(RegPair::AF),
            self.regs.get_pair(RegPair::BC),
            self.regs.get_pair(RegPair::DE),
            self.regs.get_pair(RegPair::HL),
        );
        Ok(instr.cycles)
    }

    /// Run up to `max_steps` instructions and return the T-cycles consumed.
    ///
    /// Stops at the first failing step; instructions executed before it
    /// keep their effects.
    pub fn run<B: Bus>(&mut self, bus: &mut B, max_steps: usize) -> Result<u64> {
        let mut cycles = 0u64;
        for _ in 0..max_steps {
            cycles += self.step(bus)? as u64;
        }
        Ok(cycles)
    }

    /// Opcode table consulted by [`Cpu::step`].
    #[inline]
    pub fn dispatch_table(&self) -> &'static DispatchTable {
        self.table
    }

    fn decode<B: Bus>(&self, bus: &mut B, pc: u16, opcode: u8) -> Result<Instr> {
        let (instr, code) = if opcode == PREFIX_CB {
            let sub = bus.read8(pc.wrapping_add(1));
            (
                self.table.lookup_prefixed(sub),
                u16::from_be_bytes([PREFIX_CB, sub]),
            )
        } else {
            (self.table.lookup(opcode), opcode as u16)
        };

        match instr {
            Some(instr) => Ok(*instr),
            None => {
                log::error!(
                    "GB CPU: unimplemented opcode 0x{code:02X} at PC=0x{pc:04X} (AF=0x{af:04X} BC=0x{bc:04X} DE=0x{de:04X} HL=0x{hl:04X})",
                    af = self.regs.get_pair(RegPair::AF),
                    bc = self.regs.get_pair(RegPair::BC),
                    de = self.regs.get_pair(RegPair::DE),
                    hl = self.regs.get_pair(RegPair::HL),
                );
                Err(CpuError::UnimplementedOpcode { opcode: code, pc })
            }
        }
    }

    /// Every fallible operation checks its operands before writing, so an
    /// error here leaves the registers untouched.
    fn execute<B: Bus>(&mut self, bus: &mut B, op: Op) -> Result<()> {
        match op {
            Op::Nop => {}
            Op::Ld { dst, src } => {
                let value = self.operand(bus, src);
                self.regs.set(dst, value);
            }
            Op::LdPairImm(pair) => {
                let value = self.imm16(bus);
                self.regs.set_pair(pair, value);
            }
            Op::Alu { op, src } => {
                let value = self.operand(bus, src);
                self.exec_alu(op, value);
            }
            Op::Inc(reg) => self.inc(reg),
            Op::Dec(reg) => self.dec(reg),
            Op::IncPair(pair) => self.inc_pair(pair),
            Op::DecPair(pair) => self.dec_pair(pair),
            Op::AddHl(pair) => self.add_pair(pair, RegPair::HL),
            Op::RotateA(op) => self.rotate_a(op),
            Op::Daa => self.daa(),
            Op::Cpl => self.complement(Reg::A),
            Op::Scf => self.scf(),
            Op::Ccf => self.ccf(),
            Op::Shift { op, reg } => self.shift(op, reg),
            Op::Bit { bit, reg } => self.bit(reg, bit)?,
            Op::Res { bit, reg } => self.clear_bit(reg, bit)?,
            Op::Set { bit, reg } => self.set_bit(reg, bit)?,
        }
        Ok(())
    }

    fn exec_alu(&mut self, op: AluOp, value: u8) {
        match op {
            AluOp::Add => self.alu_add(Reg::A, value, false),
            AluOp::Adc => self.alu_add(Reg::A, value, true),
            AluOp::Sub => self.alu_sub(Reg::A, value, false),
            AluOp::Sbc => self.alu_sub(Reg::A, value, true),
            AluOp::And => self.alu_and(Reg::A, value),
            AluOp::Xor => self.alu_xor(Reg::A, value),
            AluOp::Or => self.alu_or(Reg::A, value),
            AluOp::Cp => self.alu_cp(self.regs.get(Reg::A), value),
        }
    }

    /// Immediates sit right after the opcode; `pc` still points at it.
    #[inline]
    fn operand<B: Bus>(&mut self, bus: &mut B, src: Operand) -> u8 {
        match src {
            Operand::Reg(reg) => self.regs.get(reg),
            Operand::Imm8 => bus.read8(self.pc.wrapping_add(1)),
        }
    }

    #[inline]
    fn imm16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = bus.read8(self.pc.wrapping_add(1));
        let hi = bus.read8(self.pc.wrapping_add(2));
        u16::from_le_bytes([lo, hi])
    }
}
