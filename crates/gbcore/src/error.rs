use std::fmt;

pub type Result<T> = std::result::Result<T, CpuError>;

/// Errors raised by the CPU core.
///
/// Every error is reported before any register, flag or program counter
/// state has been touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CpuError {
    /// Unknown register name.
    InvalidRegister(String),
    /// Unknown register pair name, or two registers that do not form a pair.
    InvalidRegisterPair(String),
    /// No dispatch table entry for the fetched opcode.
    ///
    /// CB-prefixed opcodes are reported as `0xCBxx`.
    UnimplementedOpcode { opcode: u16, pc: u16 },
    /// Bus address outside `0x0000..=0xFFFF`.
    OutOfRange(usize),
    /// Bit position outside `0..=7`.
    InvalidBitPosition(u8),
}

impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuError::InvalidRegister(name) => write!(f, "invalid register '{name}'"),
            CpuError::InvalidRegisterPair(name) => write!(f, "invalid register pair '{name}'"),
            CpuError::UnimplementedOpcode { opcode, pc } if *opcode > 0xFF => {
                write!(f, "unimplemented opcode 0x{opcode:04X} at PC=0x{pc:04X}")
            }
            CpuError::UnimplementedOpcode { opcode, pc } => {
                write!(f, "unimplemented opcode 0x{opcode:02X} at PC=0x{pc:04X}")
            }
            CpuError::OutOfRange(addr) => {
                write!(f, "address 0x{addr:X} is outside the 16-bit bus")
            }
            CpuError::InvalidBitPosition(position) => {
                write!(f, "bit position {position} is outside 0..=7")
            }
        }
    }
}

impl std::error::Error for CpuError {}

#[cfg(test)]
mod tests {
    use super::CpuError;

    #[test]
    fn display_formats_prefixed_opcodes_as_words() {
        let plain = CpuError::UnimplementedOpcode {
            opcode: 0xD3,
            pc: 0x0150,
        };
        let prefixed = CpuError::UnimplementedOpcode {
            opcode: 0xCB36,
            pc: 0x0150,
        };

        assert_eq!(plain.to_string(), "unimplemented opcode 0xD3 at PC=0x0150");
        assert_eq!(
            prefixed.to_string(),
            "unimplemented opcode 0xCB36 at PC=0x0150"
        );
    }

    #[test]
    fn display_names_the_bad_bit_position() {
        assert_eq!(
            CpuError::InvalidBitPosition(9).to_string(),
            "bit position 9 is outside 0..=7"
        );
    }

    #[test]
    fn errors_convert_into_anyhow() {
        let err: anyhow::Error = CpuError::OutOfRange(0x10000).into();
        assert_eq!(
            err.to_string(),
            "address 0x10000 is outside the 16-bit bus"
        );
    }
}
