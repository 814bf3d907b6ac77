use bitflags::bitflags;

bitflags! {
    /// Condition flags held in the upper nibble of the F register.
    ///
    /// Layout (bit index in the byte, from MSB to LSB):
    /// - bit 7: Z (zero)
    /// - bit 6: N (subtract)
    /// - bit 5: H (half carry)
    /// - bit 4: C (carry)
    /// - bits 0–3 are always zero.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        const Z = 0b1000_0000;
        const N = 0b0100_0000;
        const H = 0b0010_0000;
        const C = 0b0001_0000;
    }
}

impl Flags {
    #[inline]
    pub fn new(zero: bool, subtract: bool, half_carry: bool, carry: bool) -> Self {
        let mut flags = Flags::empty();
        flags.set(Flags::Z, zero);
        flags.set(Flags::N, subtract);
        flags.set(Flags::H, half_carry);
        flags.set(Flags::C, carry);
        flags
    }

    /// Pack the four conditions into an F register value.
    #[inline]
    pub fn encode(zero: bool, subtract: bool, half_carry: bool, carry: bool) -> u8 {
        Self::new(zero, subtract, half_carry, carry).bits()
    }

    /// Unpack an F register value. The low nibble is ignored.
    #[inline]
    pub fn decode(f: u8) -> Self {
        Flags::from_bits_truncate(f)
    }

    #[inline]
    pub fn zero(self) -> bool {
        self.contains(Flags::Z)
    }

    #[inline]
    pub fn subtract(self) -> bool {
        self.contains(Flags::N)
    }

    #[inline]
    pub fn half_carry(self) -> bool {
        self.contains(Flags::H)
    }

    #[inline]
    pub fn carry(self) -> bool {
        self.contains(Flags::C)
    }
}

/// A single condition flag, for callers that test one at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flag {
    Z,
    N,
    H,
    C,
}

impl From<Flag> for Flags {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::Z => Flags::Z,
            Flag::N => Flags::N,
            Flag::H => Flags::H,
            Flag::C => Flags::C,
        }
    }
}
