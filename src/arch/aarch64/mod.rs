//! AArch64 interrupt masking
use aarch64_cpu::registers::DAIF;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};

use crate::sync::InterruptMask;

/// Masks IRQs on the local CPU through the `DAIF.I` bit
pub struct Daif;

impl InterruptMask for Daif {
    type State = u64;

    #[inline(always)]
    fn save_and_mask() -> u64 {
        let state = DAIF.get();
        DAIF.modify(DAIF::I::SET);
        state
    }

    #[inline(always)]
    unsafe fn restore(state: u64) {
        DAIF.set(state);
    }
}

