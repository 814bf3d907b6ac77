use crate::error::{CpuError, Result};

/// Size of the CPU's address space in bytes.
pub const MEMORY_SIZE: usize = 0x10000;

/// Abstraction over the Game Boy bus (memory and IO).
///
/// The core only needs byte reads to fetch opcodes and immediates. Writes
/// are part of the contract so that a single caller observes its own
/// writes on the next read; implementations do not need to be `Sync`.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);
}

/// Flat 64 KiB memory with no IO routing.
///
/// Useful for tests and for embedding the core in something that maps
/// its own devices on top.
#[derive(Clone)]
pub struct Memory {
    bytes: Vec<u8>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; MEMORY_SIZE],
        }
    }

    /// Build a memory image with `program` copied to `origin`.
    pub fn with_program(origin: usize, program: &[u8]) -> Result<Self> {
        let mut memory = Self::new();
        memory.load(origin, program)?;
        Ok(memory)
    }

    /// Copy `data` into memory starting at `origin`.
    ///
    /// Fails without writing anything if the block would run past the end
    /// of the address space.
    pub fn load(&mut self, origin: usize, data: &[u8]) -> Result<()> {
        let end = origin
            .checked_add(data.len())
            .ok_or(CpuError::OutOfRange(usize::MAX))?;
        if end > MEMORY_SIZE {
            return Err(CpuError::OutOfRange(end - 1));
        }
        self.bytes[origin..end].copy_from_slice(data);
        log::debug!(
            "loaded {} bytes at 0x{origin:04X}..0x{end:04X}",
            data.len()
        );
        Ok(())
    }

    /// Checked read for callers that hold wider-than-16-bit addresses.
    pub fn read_byte(&self, addr: usize) -> Result<u8> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(CpuError::OutOfRange(addr))
    }

    /// Checked write for callers that hold wider-than-16-bit addresses.
    pub fn write_byte(&mut self, addr: usize, value: u8) -> Result<()> {
        let cell = self.bytes.get_mut(addr).ok_or(CpuError::OutOfRange(addr))?;
        *cell = value;
        Ok(())
    }
}

impl Bus for Memory {
    #[inline]
    fn read8(&mut self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_access_rejects_addresses_past_the_bus() {
        let mut memory = Memory::new();

        assert_eq!(memory.read_byte(0xFFFF), Ok(0));
        assert_eq!(memory.read_byte(0x10000), Err(CpuError::OutOfRange(0x10000)));
        assert_eq!(
            memory.write_byte(0x12345, 1),
            Err(CpuError::OutOfRange(0x12345))
        );
    }

    #[test]
    fn load_is_all_or_nothing() {
        let mut memory = Memory::new();

        let err = memory.load(0xFFFE, &[1, 2, 3]).unwrap_err();
        assert_eq!(err, CpuError::OutOfRange(0x10000));
        assert_eq!(memory.read8(0xFFFE), 0);
        assert_eq!(memory.read8(0xFFFF), 0);

        memory.load(0xFFFD, &[1, 2, 3]).unwrap();
        assert_eq!(memory.read8(0xFFFF), 3);
    }

    #[test]
    fn reads_observe_prior_writes() {
        let mut memory = Memory::new();
        memory.write8(0xC000, 0x5A);
        assert_eq!(memory.read8(0xC000), 0x5A);
        assert_eq!(memory.read_byte(0xC000), Ok(0x5A));
    }
}
