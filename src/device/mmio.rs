//! Memory-mapped enable registers
use irq_catalog::{RegisterId, RegisterWidth};
use tock_registers::interfaces::Writeable;

use super::{RegisterBank, RegisterWord};

/// [RegisterBank] over a fixed set of memory-mapped registers. Slot `i` holds the register
/// described by entry `i` of the catalog's register table.
pub struct MmioBank<'a, W: Writeable, const N: usize>
where
    W::T: RegisterWord,
{
    registers: [&'a W; N],
}

impl<'a, W: Writeable, const N: usize> MmioBank<'a, W, N>
where
    W::T: RegisterWord,
{
    /// Wraps the register references into a bank.
    ///
    /// # Safety
    ///
    /// The caller must ensure the references point to the enable registers described by the
    /// catalog, that a store of `W::T` to each of them is a single access, and that nothing but
    /// this bank writes them.
    pub const unsafe fn new(registers: [&'a W; N]) -> Self {
        Self { registers }
    }
}

// The bank only ever stores whole register values, never reads them back
unsafe impl<'a, W: Writeable, const N: usize> Sync for MmioBank<'a, W, N> where
    W::T: RegisterWord
{
}
unsafe impl<'a, W: Writeable, const N: usize> Send for MmioBank<'a, W, N> where
    W::T: RegisterWord
{
}

impl<'a, W: Writeable, const N: usize> RegisterBank for MmioBank<'a, W, N>
where
    W::T: RegisterWord,
{
    fn write_enable_bits(&self, register: RegisterId, value: u64) {
        debug_assert!(<W::T as RegisterWord>::WIDTH.contains(value));

        match self.registers.get(register.index()) {
            Some(reg) => reg.set(<W::T as RegisterWord>::from_mask(value)),
            None => log::error!(
                "Enable register {} is outside of the {}-register bank",
                register.index(),
                N
            ),
        }
    }

    fn accepts(&self, register: RegisterId, width: RegisterWidth) -> bool {
        register.index() < N && width.bits() <= <W::T as RegisterWord>::WIDTH.bits()
    }
}

#[cfg(test)]
mod tests {
    use irq_catalog::{RegisterId, RegisterWidth};
    use tock_registers::{interfaces::Readable, registers::InMemoryRegister};

    use crate::device::RegisterBank;

    use super::MmioBank;

    #[test]
    fn test_writes_slot() {
        let r0 = InMemoryRegister::<u16>::new(0);
        let r1 = InMemoryRegister::<u16>::new(0xFFFF);
        let bank = unsafe { MmioBank::new([&r0, &r1]) };

        bank.write_enable_bits(RegisterId::new(1), 0x0041);
        assert_eq!(r0.get(), 0);
        assert_eq!(r1.get(), 0x0041);

        bank.write_enable_bits(RegisterId::new(0), 0x8000);
        assert_eq!(r0.get(), 0x8000);

        // Out-of-bank writes are dropped
        bank.write_enable_bits(RegisterId::new(2), 0x1);
        assert_eq!(r0.get(), 0x8000);
        assert_eq!(r1.get(), 0x0041);
    }

    #[test]
    fn test_accepts() {
        let r0 = InMemoryRegister::<u16>::new(0);
        let r1 = InMemoryRegister::<u16>::new(0);
        let bank = unsafe { MmioBank::new([&r0, &r1]) };

        assert!(bank.accepts(RegisterId::new(0), RegisterWidth::U8));
        assert!(bank.accepts(RegisterId::new(1), RegisterWidth::U16));
        assert!(!bank.accepts(RegisterId::new(1), RegisterWidth::U32));
        assert!(!bank.accepts(RegisterId::new(2), RegisterWidth::U8));
    }
}
