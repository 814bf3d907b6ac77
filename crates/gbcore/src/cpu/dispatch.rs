use lazy_static::lazy_static;

use super::bits::ShiftOp;
use super::{Reg, RegPair};

/// Opcode that selects the second (bit operation) page.
pub const PREFIX_CB: u8 = 0xCB;

lazy_static! {
    /// Process-wide opcode table, built on first use.
    pub(crate) static ref DISPATCH: DispatchTable = DispatchTable::build();
}

/// 8-bit ALU operations on A, in opcode order (`y` field of `80..BF`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    const ALL: [AluOp; 8] = [
        AluOp::Add,
        AluOp::Adc,
        AluOp::Sub,
        AluOp::Sbc,
        AluOp::And,
        AluOp::Xor,
        AluOp::Or,
        AluOp::Cp,
    ];
}

/// Source of an 8-bit operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg),
    /// Byte following the opcode.
    Imm8,
}

/// Operation kind plus its statically encoded operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Nop,
    /// LD r,r' and LD r,d8
    Ld { dst: Reg, src: Operand },
    /// LD rr,d16
    LdPairImm(RegPair),
    /// ADD/ADC/SUB/SBC/AND/XOR/OR/CP A,src
    Alu { op: AluOp, src: Operand },
    Inc(Reg),
    Dec(Reg),
    IncPair(RegPair),
    DecPair(RegPair),
    /// ADD HL,rr
    AddHl(RegPair),
    /// RLCA/RRCA/RLA/RRA
    RotateA(ShiftOp),
    Daa,
    Cpl,
    Scf,
    Ccf,
    /// CB 00..3F
    Shift { op: ShiftOp, reg: Reg },
    /// CB 40..7F
    Bit { bit: u8, reg: Reg },
    /// CB 80..BF
    Res { bit: u8, reg: Reg },
    /// CB C0..FF
    Set { bit: u8, reg: Reg },
}

/// One dispatch table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instr {
    pub op: Op,
    /// Length in bytes, including the CB prefix and any immediate.
    pub len: u8,
    /// T-cycles consumed.
    pub cycles: u32,
}

impl Instr {
    const fn new(op: Op, len: u8, cycles: u32) -> Self {
        Self { op, len, cycles }
    }
}

/// Opcode → instruction descriptor for both opcode pages.
///
/// Opcodes that address memory, the stack or SP, and control-flow or
/// interrupt opcodes have no entry.
#[derive(Clone, Debug)]
pub struct DispatchTable {
    base: [Option<Instr>; 256],
    cb: [Option<Instr>; 256],
}

impl DispatchTable {
    pub fn build() -> Self {
        let mut table = Self {
            base: [None; 256],
            cb: [None; 256],
        };
        for opcode in 0..=u8::MAX {
            table.base[opcode as usize] = decode_base(opcode);
            table.cb[opcode as usize] = decode_cb(opcode);
        }
        log::debug!(
            "GB dispatch table built: {} base, {} CB-prefixed opcodes",
            table.base.iter().flatten().count(),
            table.cb.iter().flatten().count()
        );
        table
    }

    #[inline]
    pub fn lookup(&self, opcode: u8) -> Option<&Instr> {
        self.base[opcode as usize].as_ref()
    }

    #[inline]
    pub fn lookup_prefixed(&self, opcode: u8) -> Option<&Instr> {
        self.cb[opcode as usize].as_ref()
    }
}

/// Decode an unprefixed opcode from its `x`/`y`/`z` bit fields.
fn decode_base(opcode: u8) -> Option<Instr> {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    let p = y >> 1;
    let q = y & 0x01;

    let instr = match (x, z) {
        (0, 0) if y == 0 => Instr::new(Op::Nop, 1, 4),
        (0, 1) if q == 0 => Instr::new(Op::LdPairImm(RegPair::from_index(p)?), 3, 12),
        (0, 1) => Instr::new(Op::AddHl(RegPair::from_index(p)?), 1, 8),
        (0, 3) if q == 0 => Instr::new(Op::IncPair(RegPair::from_index(p)?), 1, 8),
        (0, 3) => Instr::new(Op::DecPair(RegPair::from_index(p)?), 1, 8),
        (0, 4) => Instr::new(Op::Inc(Reg::from_index(y)?), 1, 4),
        (0, 5) => Instr::new(Op::Dec(Reg::from_index(y)?), 1, 4),
        (0, 6) => {
            let dst = Reg::from_index(y)?;
            Instr::new(
                Op::Ld {
                    dst,
                    src: Operand::Imm8,
                },
                2,
                8,
            )
        }
        (0, 7) => {
            let op = match y {
                0..=3 => Op::RotateA(ShiftOp::ALL[y as usize]),
                4 => Op::Daa,
                5 => Op::Cpl,
                6 => Op::Scf,
                _ => Op::Ccf,
            };
            Instr::new(op, 1, 4)
        }
        // 0x76 (HALT) falls out here because both fields are (HL).
        (1, _) => {
            let dst = Reg::from_index(y)?;
            let src = Operand::Reg(Reg::from_index(z)?);
            Instr::new(Op::Ld { dst, src }, 1, 4)
        }
        (2, _) => {
            let src = Operand::Reg(Reg::from_index(z)?);
            Instr::new(
                Op::Alu {
                    op: AluOp::ALL[y as usize],
                    src,
                },
                1,
                4,
            )
        }
        (3, 6) => Instr::new(
            Op::Alu {
                op: AluOp::ALL[y as usize],
                src: Operand::Imm8,
            },
            2,
            8,
        ),
        _ => return None,
    };
    Some(instr)
}

/// Decode the byte following a CB prefix.
fn decode_cb(opcode: u8) -> Option<Instr> {
    let x = opcode >> 6;
    let bit = (opcode >> 3) & 0x07;
    let reg = Reg::from_index(opcode & 0x07)?;

    let op = match x {
        0 => Op::Shift {
            op: ShiftOp::ALL[bit as usize],
            reg,
        },
        1 => Op::Bit { bit, reg },
        2 => Op::Res { bit, reg },
        _ => Op::Set { bit, reg },
    };
    Some(Instr::new(op, 2, 8))
}
