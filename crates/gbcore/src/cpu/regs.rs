use std::fmt;
use std::str::FromStr;

use crate::error::{CpuError, Result};

/// 8-bit registers of the Game Boy CPU (LR35902).
///
/// The discriminant doubles as the index into [`RegisterFile`]'s storage,
/// so a `Reg` is always a valid register once it has been parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    H = 6,
    L = 7,
}

impl Reg {
    pub const ALL: [Reg; 8] = [
        Reg::A,
        Reg::B,
        Reg::C,
        Reg::D,
        Reg::E,
        Reg::F,
        Reg::H,
        Reg::L,
    ];

    /// Register selected by a 3-bit opcode field.
    ///
    /// The encoding matches the standard opcode tables:
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A. Index 6 is a memory
    /// operand and has no register.
    pub(crate) fn from_index(index: u8) -> Option<Reg> {
        match index & 0x07 {
            0 => Some(Reg::B),
            1 => Some(Reg::C),
            2 => Some(Reg::D),
            3 => Some(Reg::E),
            4 => Some(Reg::H),
            5 => Some(Reg::L),
            7 => Some(Reg::A),
            _ => None,
        }
    }

    pub fn name(self) -> char {
        match self {
            Reg::A => 'a',
            Reg::B => 'b',
            Reg::C => 'c',
            Reg::D => 'd',
            Reg::E => 'e',
            Reg::F => 'f',
            Reg::H => 'h',
            Reg::L => 'l',
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<char> for Reg {
    type Error = CpuError;

    fn try_from(name: char) -> Result<Self> {
        match name.to_ascii_lowercase() {
            'a' => Ok(Reg::A),
            'b' => Ok(Reg::B),
            'c' => Ok(Reg::C),
            'd' => Ok(Reg::D),
            'e' => Ok(Reg::E),
            'f' => Ok(Reg::F),
            'h' => Ok(Reg::H),
            'l' => Ok(Reg::L),
            _ => Err(CpuError::InvalidRegister(name.to_string())),
        }
    }
}

impl FromStr for Reg {
    type Err = CpuError;

    fn from_str(name: &str) -> Result<Self> {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Reg::try_from(c),
            _ => Err(CpuError::InvalidRegister(name.to_string())),
        }
    }
}

/// 16-bit views over two 8-bit registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegPair {
    AF,
    BC,
    DE,
    HL,
}

impl RegPair {
    pub const ALL: [RegPair; 4] = [RegPair::AF, RegPair::BC, RegPair::DE, RegPair::HL];

    /// `(high, low)` registers making up the pair.
    #[inline]
    pub const fn halves(self) -> (Reg, Reg) {
        match self {
            RegPair::AF => (Reg::A, Reg::F),
            RegPair::BC => (Reg::B, Reg::C),
            RegPair::DE => (Reg::D, Reg::E),
            RegPair::HL => (Reg::H, Reg::L),
        }
    }

    /// Pair formed by `high` and `low`, if they form one.
    pub fn from_halves(high: Reg, low: Reg) -> Result<RegPair> {
        RegPair::ALL
            .into_iter()
            .find(|pair| pair.halves() == (high, low))
            .ok_or_else(|| CpuError::InvalidRegisterPair(format!("{high}{low}")))
    }

    /// Pair selected by the 2-bit `rr` field of 16-bit opcodes.
    ///
    /// 0=BC, 1=DE, 2=HL, 3=SP. SP is not modelled.
    pub(crate) fn from_index(index: u8) -> Option<RegPair> {
        match index & 0x03 {
            0 => Some(RegPair::BC),
            1 => Some(RegPair::DE),
            2 => Some(RegPair::HL),
            _ => None,
        }
    }
}

impl fmt::Display for RegPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (high, low) = self.halves();
        write!(f, "{high}{low}")
    }
}

impl FromStr for RegPair {
    type Err = CpuError;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "af" => Ok(RegPair::AF),
            "bc" => Ok(RegPair::BC),
            "de" => Ok(RegPair::DE),
            "hl" => Ok(RegPair::HL),
            _ => Err(CpuError::InvalidRegisterPair(name.to_string())),
        }
    }
}

/// The eight 8-bit registers, indexed by [`Reg`].
///
/// Pairs are never stored; they are composed from their halves on every
/// access. The low nibble of F is always zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u8; 8],
}

impl RegisterFile {
    #[inline]
    pub fn get(&self, reg: Reg) -> u8 {
        self.regs[reg as usize]
    }

    #[inline]
    pub fn set(&mut self, reg: Reg, value: u8) {
        self.regs[reg as usize] = if reg == Reg::F { value & 0xF0 } else { value };
    }

    /// Store `value mod 256`, wrapping negative values into `0..=255`.
    #[inline]
    pub fn set_wrapped(&mut self, reg: Reg, value: i32) {
        self.set(reg, value.rem_euclid(256) as u8);
    }

    /// Compose `left * 256 + right`, valid only for af, bc, de and hl.
    pub fn pair(&self, left: Reg, right: Reg) -> Result<u16> {
        RegPair::from_halves(left, right).map(|pair| self.get_pair(pair))
    }

    #[inline]
    pub fn get_pair(&self, pair: RegPair) -> u16 {
        let (high, low) = pair.halves();
        u16::from_be_bytes([self.get(high), self.get(low)])
    }

    #[inline]
    pub fn set_pair(&mut self, pair: RegPair, value: u16) {
        let (high, low) = pair.halves();
        let [hi, lo] = value.to_be_bytes();
        self.set(high, hi);
        self.set(low, lo);
    }
}
