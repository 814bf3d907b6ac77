use super::{Cpu, Reg};
use crate::error::{CpuError, Result};

#[inline]
fn bit_mask(position: u8) -> Result<u8> {
    if position < 8 {
        Ok(1 << position)
    } else {
        Err(CpuError::InvalidBitPosition(position))
    }
}

/// Rotate/shift operations of the CB-prefixed page, in opcode order
/// (`y` field of `CB 00..3F`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    pub(crate) const ALL: [ShiftOp; 8] = [
        ShiftOp::Rlc,
        ShiftOp::Rrc,
        ShiftOp::Rl,
        ShiftOp::Rr,
        ShiftOp::Sla,
        ShiftOp::Sra,
        ShiftOp::Swap,
        ShiftOp::Srl,
    ];
}

impl Cpu {
    /// RLC: 8-bit rotate left, bit 7 to both C and bit 0.
    pub fn rotate_left_circular(&mut self, target: Reg) {
        self.shift(ShiftOp::Rlc, target);
    }

    /// RRC: 8-bit rotate right, bit 0 to both C and bit 7.
    pub fn rotate_right_circular(&mut self, target: Reg) {
        self.shift(ShiftOp::Rrc, target);
    }

    /// RL: 9-bit rotate left through C.
    pub fn rotate_left_through_carry(&mut self, target: Reg) {
        self.shift(ShiftOp::Rl, target);
    }

    /// RR: 9-bit rotate right through C.
    pub fn rotate_right_through_carry(&mut self, target: Reg) {
        self.shift(ShiftOp::Rr, target);
    }

    /// SLA: shift left, bit 0 cleared.
    pub fn shift_left_arithmetic(&mut self, target: Reg) {
        self.shift(ShiftOp::Sla, target);
    }

    /// SRA: shift right, bit 7 kept.
    pub fn shift_right_arithmetic(&mut self, target: Reg) {
        self.shift(ShiftOp::Sra, target);
    }

    /// SRL: shift right, bit 7 cleared.
    pub fn shift_right_logical(&mut self, target: Reg) {
        self.shift(ShiftOp::Srl, target);
    }

    pub fn swap_nibbles(&mut self, target: Reg) {
        self.shift(ShiftOp::Swap, target);
    }

    /// RLCA. Same rotation as RLC A but Z is always cleared.
    pub fn rlca(&mut self) {
        self.rotate_a(ShiftOp::Rlc);
    }

    /// RRCA. Same rotation as RRC A but Z is always cleared.
    pub fn rrca(&mut self) {
        self.rotate_a(ShiftOp::Rrc);
    }

    /// RLA. Same rotation as RL A but Z is always cleared.
    pub fn rla(&mut self) {
        self.rotate_a(ShiftOp::Rl);
    }

    /// RRA. Same rotation as RR A but Z is always cleared.
    pub fn rra(&mut self) {
        self.rotate_a(ShiftOp::Rr);
    }

    /// CPL: bitwise NOT. N and H are set, Z and C preserved.
    pub fn complement(&mut self, target: Reg) {
        let flags = self.flags();
        let result = !self.regs.get(target);
        self.regs.set(target, result);
        self.write_flags(flags.zero(), true, true, flags.carry());
    }

    /// Whether bit `position` of `target` is set. Pure read.
    ///
    /// Positions past 7 fail with [`CpuError::InvalidBitPosition`].
    #[inline]
    pub fn test_bit(&self, target: Reg, position: u8) -> Result<bool> {
        let mask = bit_mask(position)?;
        Ok((self.regs.get(target) & mask) != 0)
    }

    /// BIT b,r: Z = !bit, N=0, H=1, C preserved.
    pub fn bit(&mut self, target: Reg, position: u8) -> Result<()> {
        let bit_set = self.test_bit(target, position)?;
        let carry = self.flags().carry();
        self.write_flags(!bit_set, false, true, carry);
        Ok(())
    }

    /// SET b,r. Flags are not affected.
    pub fn set_bit(&mut self, target: Reg, position: u8) -> Result<()> {
        let mask = bit_mask(position)?;
        let value = self.regs.get(target) | mask;
        self.regs.set(target, value);
        Ok(())
    }

    /// RES b,r. Flags are not affected.
    pub fn clear_bit(&mut self, target: Reg, position: u8) -> Result<()> {
        let mask = bit_mask(position)?;
        let value = self.regs.get(target) & !mask;
        self.regs.set(target, value);
        Ok(())
    }

    /// Apply a CB-page rotate/shift to `target`.
    ///
    /// N and H are cleared, C receives the bit shifted out (SWAP clears
    /// it) and Z reflects the result.
    pub(super) fn shift(&mut self, op: ShiftOp, target: Reg) {
        let value = self.regs.get(target);
        let carry_in = self.flags().carry();

        let (result, carry_out) = match op {
            ShiftOp::Rlc => (value.rotate_left(1), (value & 0x80) != 0),
            ShiftOp::Rrc => (value.rotate_right(1), (value & 0x01) != 0),
            ShiftOp::Rl => ((value << 1) | u8::from(carry_in), (value & 0x80) != 0),
            ShiftOp::Rr => (
                (value >> 1) | if carry_in { 0x80 } else { 0 },
                (value & 0x01) != 0,
            ),
            ShiftOp::Sla => (value << 1, (value & 0x80) != 0),
            ShiftOp::Sra => ((value >> 1) | (value & 0x80), (value & 0x01) != 0),
            ShiftOp::Swap => (value.rotate_left(4), false),
            ShiftOp::Srl => (value >> 1, (value & 0x01) != 0),
        };

        self.regs.set(target, result);
        self.write_flags(result == 0, false, false, carry_out);
    }

    pub(super) fn rotate_a(&mut self, op: ShiftOp) {
        debug_assert!(matches!(
            op,
            ShiftOp::Rlc | ShiftOp::Rrc | ShiftOp::Rl | ShiftOp::Rr
        ));
        self.shift(op, Reg::A);
        let carry = self.flags().carry();
        self.write_flags(false, false, false, carry);
    }
}
