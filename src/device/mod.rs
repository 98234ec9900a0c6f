//! Hardware interface the controller programs enable registers through
use irq_catalog::{RegisterId, RegisterWidth};
use static_assertions::const_assert_eq;

pub mod mmio;

pub use mmio::MmioBank;

/// Register access layer owning the enable registers described by a catalog
pub trait RegisterBank {
    /// Stores `value` into the enable bits of `register`.
    ///
    /// # Note
    ///
    /// Must be a single store to the hardware, not a read-modify-write sequence: the caller is the
    /// only writer and always passes the complete register value.
    fn write_enable_bits(&self, register: RegisterId, value: u64);

    /// Returns `true` if the bank holds `register` and can store every bit of a `width`-wide
    /// value into it
    fn accepts(&self, register: RegisterId, width: RegisterWidth) -> bool;
}

/// Native unsigned integer type of an enable register
pub trait RegisterWord: Copy {
    /// Width of the type in register terms
    const WIDTH: RegisterWidth;

    /// Narrows a mask to the register width, dropping any bits beyond it
    fn from_mask(mask: u64) -> Self;
}

impl<B: RegisterBank + ?Sized> RegisterBank for &B {
    #[inline]
    fn write_enable_bits(&self, register: RegisterId, value: u64) {
        (**self).write_enable_bits(register, value)
    }

    #[inline]
    fn accepts(&self, register: RegisterId, width: RegisterWidth) -> bool {
        (**self).accepts(register, width)
    }
}

macro_rules! register_word_impl {
    ($t:ty, $width:ident) => {
        const_assert_eq!(core::mem::size_of::<$t>() * 8, RegisterWidth::$width.bits() as usize);

        impl RegisterWord for $t {
            const WIDTH: RegisterWidth = RegisterWidth::$width;

            #[inline(always)]
            fn from_mask(mask: u64) -> Self {
                mask as $t
            }
        }
    };
}

register_word_impl!(u8, U8);
register_word_impl!(u16, U16);
register_word_impl!(u32, U32);
register_word_impl!(u64, U64);

#[cfg(test)]
mod tests {
    use irq_catalog::RegisterWidth;

    use super::RegisterWord;

    #[test]
    fn test_from_mask_truncates() {
        assert_eq!(u8::from_mask(0x1FF), 0xFF);
        assert_eq!(u16::from_mask(0xF_0001), 0x0001);
        assert_eq!(u32::from_mask(u64::MAX), u32::MAX);
        assert_eq!(u64::from_mask(1 << 63), 1 << 63);
        assert_eq!(<u16 as RegisterWord>::WIDTH, RegisterWidth::U16);
    }
}
