pub mod bus;
pub mod cpu;
pub mod error;

pub use bus::{Bus, Memory, MEMORY_SIZE};
pub use cpu::{Cpu, Flag, Flags, InitialState, Reg, RegPair, RegisterFile};
pub use error::{CpuError, Result};
