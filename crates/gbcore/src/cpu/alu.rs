use super::{Cpu, Reg, RegPair};

/// Register-level ALU operations.
///
/// `target` is the operand register and `write_to` the destination; every
/// opcode uses the accumulator (`Reg::A`) as destination. Each operation
/// samples any incoming flag before computing its result and then rewrites
/// all four flags at once.
impl Cpu {
    /// `write_to = write_to + target`.
    pub fn add(&mut self, target: Reg, write_to: Reg) {
        let value = self.regs.get(target);
        self.alu_add(write_to, value, false);
    }

    /// `write_to = write_to + target + C`.
    pub fn adc(&mut self, target: Reg, write_to: Reg) {
        let value = self.regs.get(target);
        self.alu_add(write_to, value, true);
    }

    /// `write_to = write_to - target`.
    pub fn sub(&mut self, target: Reg, write_to: Reg) {
        let value = self.regs.get(target);
        self.alu_sub(write_to, value, false);
    }

    /// `write_to = write_to - target - C`.
    pub fn sbc(&mut self, target: Reg, write_to: Reg) {
        let value = self.regs.get(target);
        self.alu_sub(write_to, value, true);
    }

    pub fn and(&mut self, target: Reg, write_to: Reg) {
        let value = self.regs.get(target);
        self.alu_and(write_to, value);
    }

    pub fn or(&mut self, target: Reg, write_to: Reg) {
        let value = self.regs.get(target);
        self.alu_or(write_to, value);
    }

    pub fn xor(&mut self, target: Reg, write_to: Reg) {
        let value = self.regs.get(target);
        self.alu_xor(write_to, value);
    }

    /// Compare `other` with `target`, setting flags as if `other - target`
    /// was performed. Neither register is modified.
    pub fn cp(&mut self, target: Reg, other: Reg) {
        let value = self.regs.get(target);
        self.alu_cp(self.regs.get(other), value);
    }

    /// Updates Z, N, H while leaving C unchanged.
    pub fn inc(&mut self, target: Reg) {
        let value = self.regs.get(target);
        let carry = self.flags().carry();
        let result = value.wrapping_add(1);
        self.regs.set(target, result);
        self.write_flags(result == 0, false, (value & 0x0F) == 0x0F, carry);
    }

    /// Updates Z, N, H while leaving C unchanged.
    pub fn dec(&mut self, target: Reg) {
        let value = self.regs.get(target);
        let carry = self.flags().carry();
        let result = value.wrapping_sub(1);
        self.regs.set(target, result);
        self.write_flags(result == 0, true, (value & 0x0F) == 0, carry);
    }

    /// 16-bit add of an 8-bit register into `pair`.
    ///
    /// The low byte's overflow propagates into the high byte. All four
    /// flags come from the 16-bit sum: Z when it wrapped to zero, N=0,
    /// H out of bit 11 and C out of bit 15.
    pub fn add_to_pair(&mut self, target: Reg, pair: RegPair) {
        let value = self.regs.get(target) as u16;
        let sum = self.alu_add16(pair, value);
        let flags = self.flags();
        self.write_flags(sum == 0, false, flags.half_carry(), flags.carry());
    }

    /// `ADD HL,rr`-style 16-bit add of `source` into `pair`.
    ///
    /// Z is unaffected; N is cleared; H is the carry out of bit 11 and C
    /// the carry out of bit 15.
    pub fn add_pair(&mut self, source: RegPair, pair: RegPair) {
        let value = self.regs.get_pair(source);
        self.alu_add16(pair, value);
    }

    /// 16-bit increment; no flags are affected.
    pub fn inc_pair(&mut self, pair: RegPair) {
        let value = self.regs.get_pair(pair).wrapping_add(1);
        self.regs.set_pair(pair, value);
    }

    /// 16-bit decrement; no flags are affected.
    pub fn dec_pair(&mut self, pair: RegPair) {
        let value = self.regs.get_pair(pair).wrapping_sub(1);
        self.regs.set_pair(pair, value);
    }

    /// Invert C. Z and N are kept, H is cleared.
    pub fn ccf(&mut self) {
        let flags = self.flags();
        self.write_flags(flags.zero(), flags.subtract(), false, !flags.carry());
    }

    /// Force C on. Z and N are kept, H is cleared.
    pub fn scf(&mut self) {
        let flags = self.flags();
        self.write_flags(flags.zero(), flags.subtract(), false, true);
    }

    /// DAA: turn the binary result of the last 8-bit add or subtract in A
    /// back into two packed BCD digits.
    ///
    /// A digit that overflowed past 9, or left H/C behind, gets 6 added
    /// (or removed after a subtract). C ends up set whenever the high
    /// digit needed that fix. H is cleared; N is kept.
    pub fn daa(&mut self) {
        let flags = self.flags();
        let after_add = !flags.subtract();
        let a = self.regs.get(Reg::A);

        let mut correction = 0u8;
        let mut carry = flags.carry();
        if flags.half_carry() || (after_add && (a & 0x0F) > 0x09) {
            correction |= 0x06;
        }
        if carry || (after_add && a > 0x99) {
            correction |= 0x60;
            carry = true;
        }

        let a = if after_add {
            a.wrapping_add(correction)
        } else {
            a.wrapping_sub(correction)
        };
        self.regs.set(Reg::A, a);
        self.write_flags(a == 0, flags.subtract(), false, carry);
    }

    /// Core 8-bit ADD/ADC into `dest`.
    ///
    /// The carry-in is bound before either sum is formed so H and C come
    /// from the full three-operand addition.
    pub(super) fn alu_add(&mut self, dest: Reg, value: u8, use_carry: bool) {
        let lhs = self.regs.get(dest);
        let carry_in = u8::from(use_carry && self.flags().carry());

        let half = (lhs & 0x0F) + (value & 0x0F) + carry_in;
        let full = lhs as u16 + value as u16 + carry_in as u16;
        let result = full as u8;

        self.regs.set(dest, result);
        self.write_flags(result == 0, false, half > 0x0F, full > 0xFF);
    }

    /// Core 8-bit SUB/SBC from `dest`.
    ///
    /// C is set only when a borrow out of bit 7 actually happened, H when
    /// the low nibble borrowed.
    pub(super) fn alu_sub(&mut self, dest: Reg, value: u8, use_carry: bool) {
        let lhs = self.regs.get(dest);
        let carry_in = i16::from(use_carry && self.flags().carry());

        let half = (lhs & 0x0F) as i16 - (value & 0x0F) as i16 - carry_in;
        let full = lhs as i16 - value as i16 - carry_in;
        let result = full as u8;

        self.regs.set(dest, result);
        self.write_flags(result == 0, true, half < 0, full < 0);
    }

    pub(super) fn alu_and(&mut self, dest: Reg, value: u8) {
        let result = self.regs.get(dest) & value;
        self.regs.set(dest, result);
        self.write_flags(result == 0, false, true, false);
    }

    pub(super) fn alu_or(&mut self, dest: Reg, value: u8) {
        let result = self.regs.get(dest) | value;
        self.regs.set(dest, result);
        self.write_flags(result == 0, false, false, false);
    }

    pub(super) fn alu_xor(&mut self, dest: Reg, value: u8) {
        let result = self.regs.get(dest) ^ value;
        self.regs.set(dest, result);
        self.write_flags(result == 0, false, false, false);
    }

    pub(super) fn alu_cp(&mut self, lhs: u8, value: u8) {
        let half = (lhs & 0x0F) as i16 - (value & 0x0F) as i16;
        let full = lhs as i16 - value as i16;
        self.write_flags(full as u8 == 0, true, half < 0, full < 0);
    }

    /// Shared 16-bit add. Z is left alone here; callers that define Z for
    /// the sum rewrite it from the returned value.
    fn alu_add16(&mut self, pair: RegPair, value: u16) -> u16 {
        let zero = self.flags().zero();
        let lhs = self.regs.get_pair(pair);
        let half = (lhs & 0x0FFF) + (value & 0x0FFF) > 0x0FFF;
        let full = lhs as u32 + value as u32;

        self.regs.set_pair(pair, full as u16);
        self.write_flags(zero, false, half, full > 0xFFFF);
        full as u16
    }
}

#[cfg(test)]
mod tests {
    use crate::cpu::{Cpu, Flags, InitialState, Reg, RegPair};

    fn cpu_with(a: u8, b: u8, f: u8) -> Cpu {
        Cpu::with_state(InitialState::builder().a(a).b(b).f(f).build())
    }

    fn flags(cpu: &Cpu) -> (bool, bool, bool, bool) {
        let f = cpu.flags();
        (f.zero(), f.subtract(), f.half_carry(), f.carry())
    }

    #[test]
    fn add_wraps_and_sets_all_carries() {
        let mut cpu = cpu_with(0xFF, 0x01, 0);
        cpu.add(Reg::B, Reg::A);
        assert_eq!(cpu.register(Reg::A), 0x00);
        assert_eq!(flags(&cpu), (true, false, true, true));
    }

    #[test]
    fn add_half_carry_comes_from_bit_3() {
        let mut cpu = cpu_with(0x0F, 0x01, 0);
        cpu.add(Reg::B, Reg::A);
        assert_eq!(cpu.register(Reg::A), 0x10);
        assert_eq!(flags(&cpu), (false, false, true, false));

        let mut cpu = cpu_with(0x80, 0x80, 0);
        cpu.add(Reg::B, Reg::A);
        assert_eq!(cpu.register(Reg::A), 0x00);
        assert_eq!(flags(&cpu), (true, false, false, true));
    }

    #[test]
    fn adc_samples_carry_before_adding() {
        let mut cpu = cpu_with(0x0F, 0x00, Flags::C.bits());
        cpu.adc(Reg::B, Reg::A);
        assert_eq!(cpu.register(Reg::A), 0x10);
        assert_eq!(flags(&cpu), (false, false, true, false));

        let mut cpu = cpu_with(0xFF, 0x00, Flags::C.bits());
        cpu.adc(Reg::B, Reg::A);
        assert_eq!(cpu.register(Reg::A), 0x00);
        assert_eq!(flags(&cpu), (true, false, true, true));

        // Without incoming carry ADC behaves like ADD.
        let mut cpu = cpu_with(0xFF, 0x00, 0);
        cpu.adc(Reg::B, Reg::A);
        assert_eq!(cpu.register(Reg::A), 0xFF);
        assert_eq!(flags(&cpu), (false, false, false, false));
    }

    #[test]
    fn sub_carry_means_borrow() {
        // b = b - a with a=0x10, b=0x01 borrows.
        let mut cpu = cpu_with(0x10, 0x01, 0);
        cpu.sub(Reg::A, Reg::B);
        assert_eq!(cpu.register(Reg::B), 0xF1);
        assert_eq!(cpu.register(Reg::A), 0x10);
        assert_eq!(flags(&cpu), (false, true, false, true));

        // a = a - b does not.
        let mut cpu = cpu_with(0x10, 0x01, 0);
        cpu.sub(Reg::B, Reg::A);
        assert_eq!(cpu.register(Reg::A), 0x0F);
        assert_eq!(flags(&cpu), (false, true, true, false));

        let mut cpu = cpu_with(0x3E, 0x3E, 0);
        cpu.sub(Reg::B, Reg::A);
        assert_eq!(cpu.register(Reg::A), 0x00);
        assert_eq!(flags(&cpu), (true, true, false, false));
    }

    #[test]
    fn sbc_includes_incoming_carry_in_the_borrow() {
        let mut cpu = cpu_with(0x10, 0x0F, Flags::C.bits());
        cpu.sbc(Reg::B, Reg::A);
        assert_eq!(cpu.register(Reg::A), 0x00);
        assert_eq!(flags(&cpu), (true, true, true, false));

        let mut cpu = cpu_with(0x00, 0x00, Flags::C.bits());
        cpu.sbc(Reg::B, Reg::A);
        assert_eq!(cpu.register(Reg::A), 0xFF);
        assert_eq!(flags(&cpu), (false, true, true, true));
    }

    #[test]
    fn logic_ops_clear_carry_and_fix_half_carry() {
        let mut cpu = cpu_with(0xF0, 0x0F, Flags::C.bits());
        cpu.and(Reg::B, Reg::A);
        assert_eq!(cpu.register(Reg::A), 0x00);
        assert_eq!(flags(&cpu), (true, false, true, false));

        let mut cpu = cpu_with(0xF0, 0x0F, Flags::all().bits());
        cpu.or(Reg::B, Reg::A);
        assert_eq!(cpu.register(Reg::A), 0xFF);
        assert_eq!(flags(&cpu), (false, false, false, false));

        let mut cpu = cpu_with(0x5A, 0x5A, Flags::C.bits());
        cpu.xor(Reg::B, Reg::A);
        assert_eq!(cpu.register(Reg::A), 0x00);
        assert_eq!(flags(&cpu), (true, false, false, false));
    }

    #[test]
    fn cp_only_touches_flags() {
        let mut cpu = cpu_with(0x3C, 0x40, 0);
        cpu.cp(Reg::B, Reg::A);
        assert_eq!(cpu.register(Reg::A), 0x3C);
        assert_eq!(cpu.register(Reg::B), 0x40);
        assert_eq!(flags(&cpu), (false, true, false, true));

        let mut cpu = cpu_with(0x3C, 0x3C, 0);
        cpu.cp(Reg::B, Reg::A);
        assert_eq!(flags(&cpu), (true, true, false, false));
    }

    #[test]
    fn inc_and_dec_preserve_carry() {
        for carry in [false, true] {
            let f = if carry { Flags::C.bits() } else { 0 };

            let mut cpu = cpu_with(0xFF, 0, f);
            cpu.inc(Reg::A);
            assert_eq!(cpu.register(Reg::A), 0x00);
            assert_eq!(flags(&cpu), (true, false, true, carry));

            let mut cpu = cpu_with(0x10, 0, f);
            cpu.dec(Reg::A);
            assert_eq!(cpu.register(Reg::A), 0x0F);
            assert_eq!(flags(&cpu), (false, true, true, carry));

            let mut cpu = cpu_with(0x01, 0, f);
            cpu.dec(Reg::A);
            assert_eq!(cpu.register(Reg::A), 0x00);
            assert_eq!(flags(&cpu), (true, true, false, carry));
        }
    }

    #[test]
    fn add_to_pair_carries_into_the_high_byte() {
        let mut cpu = Cpu::with_state(
            InitialState::builder()
                .h(0x0F)
                .l(0xFF)
                .b(0x01)
                .f(Flags::Z.bits())
                .build(),
        );
        cpu.add_to_pair(Reg::B, RegPair::HL);
        assert_eq!(cpu.pair(RegPair::HL), 0x1000);
        // A stale Z is dropped, H from bit 11, no carry out of bit 15.
        assert_eq!(flags(&cpu), (false, false, true, false));
    }

    #[test]
    fn add_to_pair_sets_zero_when_the_pair_wraps() {
        let mut cpu = Cpu::with_state(InitialState::builder().h(0xFF).l(0xFF).b(0x01).build());
        cpu.add_to_pair(Reg::B, RegPair::HL);
        assert_eq!(cpu.pair(RegPair::HL), 0x0000);
        assert_eq!(flags(&cpu), (true, false, true, true));

        // ADD HL,rr keeps whatever Z was before.
        let mut cpu = Cpu::with_state(InitialState::builder().h(0xFF).l(0xFF).c(0x01).build());
        cpu.add_pair(RegPair::BC, RegPair::HL);
        assert_eq!(cpu.pair(RegPair::HL), 0x0000);
        assert_eq!(flags(&cpu), (false, false, true, true));
    }

    #[test]
    fn add_pair_uses_the_full_16_bit_source() {
        let mut cpu = Cpu::with_state(
            InitialState::builder()
                .h(0x8A)
                .l(0x23)
                .b(0x06)
                .c(0x05)
                .build(),
        );
        cpu.add_pair(RegPair::BC, RegPair::HL);
        assert_eq!(cpu.pair(RegPair::HL), 0x9028);
        assert_eq!(flags(&cpu), (false, false, true, false));

        cpu.add_pair(RegPair::HL, RegPair::HL);
        assert_eq!(cpu.pair(RegPair::HL), 0x2050);
        assert_eq!(flags(&cpu), (false, false, false, true));
    }

    #[test]
    fn pair_inc_dec_wrap_without_flags() {
        let mut cpu = Cpu::with_state(InitialState::builder().d(0xFF).e(0xFF).f(0xA0).build());
        cpu.inc_pair(RegPair::DE);
        assert_eq!(cpu.pair(RegPair::DE), 0x0000);
        cpu.dec_pair(RegPair::DE);
        assert_eq!(cpu.pair(RegPair::DE), 0xFFFF);
        assert_eq!(cpu.register(Reg::F), 0xA0);
    }

    #[test]
    fn ccf_and_scf_keep_zero_and_subtract() {
        let mut cpu = cpu_with(0, 0, Flags::all().bits());
        cpu.ccf();
        assert_eq!(flags(&cpu), (true, true, false, false));
        cpu.ccf();
        assert_eq!(flags(&cpu), (true, true, false, true));

        let mut cpu = cpu_with(0, 0, Flags::N.bits() | Flags::H.bits());
        cpu.scf();
        assert_eq!(flags(&cpu), (false, true, false, true));
    }

    #[test]
    fn carry_flag_ops_leave_a_set_subtract_flag_alone() {
        let mut cpu = cpu_with(0, 0, Flags::N.bits());
        cpu.ccf();
        assert!(cpu.flags().subtract());
        assert!(cpu.flags().carry());

        let mut cpu = cpu_with(0, 0, Flags::N.bits());
        cpu.scf();
        assert!(cpu.flags().subtract());
        assert!(cpu.flags().carry());

        let mut cpu = cpu_with(0, 0, 0);
        cpu.scf();
        cpu.ccf();
        assert_eq!(flags(&cpu), (false, false, false, false));
    }

    #[test]
    fn daa_corrects_bcd_addition_and_subtraction() {
        let mut cpu = cpu_with(0x15, 0x27, 0);
        cpu.add(Reg::B, Reg::A);
        assert_eq!(cpu.register(Reg::A), 0x3C);
        cpu.daa();
        assert_eq!(cpu.register(Reg::A), 0x42);
        assert_eq!(flags(&cpu), (false, false, false, false));

        let mut cpu = cpu_with(0x99, 0x01, 0);
        cpu.add(Reg::B, Reg::A);
        cpu.daa();
        assert_eq!(cpu.register(Reg::A), 0x00);
        assert_eq!(flags(&cpu), (true, false, false, true));

        let mut cpu = cpu_with(0x42, 0x15, 0);
        cpu.sub(Reg::B, Reg::A);
        cpu.daa();
        assert_eq!(cpu.register(Reg::A), 0x27);
        assert_eq!(flags(&cpu), (false, true, false, false));
    }
}
