use typed_builder::TypedBuilder;

use super::dispatch::DISPATCH;
use super::{Cpu, Reg, RegisterFile};

/// Register and program counter values a [`Cpu`] starts from.
///
/// Every field defaults to zero:
///
/// ```
/// use gbcore::InitialState;
///
/// let state = InitialState::builder().a(0x12).pc(0x0150).build();
/// assert_eq!(state.b, 0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, TypedBuilder)]
pub struct InitialState {
    #[builder(default)]
    pub a: u8,
    /// Only the upper nibble is kept.
    #[builder(default)]
    pub f: u8,
    #[builder(default)]
    pub b: u8,
    #[builder(default)]
    pub c: u8,
    #[builder(default)]
    pub d: u8,
    #[builder(default)]
    pub e: u8,
    #[builder(default)]
    pub h: u8,
    #[builder(default)]
    pub l: u8,
    #[builder(default)]
    pub pc: u16,
}

impl InitialState {
    /// Registers as the DMG boot ROM leaves them when it hands control to
    /// cartridge code at 0x0100 (values as documented in Pan Docs).
    pub fn dmg() -> Self {
        InitialState::builder()
            .a(0x01)
            .f(0xB0) // Z, N, H, C = 1,0,1,1 (upper nibble 1011_0000)
            .b(0x00)
            .c(0x13)
            .d(0x00)
            .e(0xD8)
            .h(0x01)
            .l(0x4D)
            .pc(0x0100)
            .build()
    }

    fn register_file(&self) -> RegisterFile {
        let mut regs = RegisterFile::default();
        regs.set(Reg::A, self.a);
        regs.set(Reg::F, self.f);
        regs.set(Reg::B, self.b);
        regs.set(Reg::C, self.c);
        regs.set(Reg::D, self.d);
        regs.set(Reg::E, self.e);
        regs.set(Reg::H, self.h);
        regs.set(Reg::L, self.l);
        regs
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// CPU with every register and the program counter cleared.
    pub fn new() -> Self {
        Self::with_state(InitialState::default())
    }

    pub fn with_state(state: InitialState) -> Self {
        log::debug!("GB CPU init: {state:?}");
        Self {
            regs: state.register_file(),
            pc: state.pc,
            table: &*DISPATCH,
        }
    }

    /// Restore the registers and program counter from `state`.
    pub fn reset(&mut self, state: InitialState) {
        self.regs = state.register_file();
        self.pc = state.pc;
    }
}
