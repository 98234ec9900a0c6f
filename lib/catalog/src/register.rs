//! Register and resource identities

/// Identifies one enable register of a [crate::Catalog]
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RegisterId(u16);

/// Identifies one gateable resource (power rail, clock domain, peripheral) of a
/// [crate::Catalog]
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ResourceId(u16);

/// Native width of an enable register
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RegisterWidth {
    /// 8-bit register
    U8,
    /// 16-bit register
    U16,
    /// 32-bit register
    U32,
    /// 64-bit register
    U64,
}

/// Static description of an enable register
#[derive(Clone, Copy, Debug)]
pub struct RegisterDesc {
    /// Display name of the register
    pub name: &'static str,
    /// Native width of the register
    pub width: RegisterWidth,
}

/// Static description of a resource
#[derive(Clone, Copy, Debug)]
pub struct ResourceDesc {
    /// Display name of the resource
    pub name: &'static str,
}

impl RegisterId {
    /// Wraps an index into the catalog's register table
    #[inline(always)]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the index into the catalog's register table
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl ResourceId {
    /// Wraps an index into the catalog's resource table
    #[inline(always)]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the index into the catalog's resource table
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl RegisterWidth {
    /// Returns the number of bits in the register
    pub const fn bits(self) -> u32 {
        match self {
            Self::U8 => 8,
            Self::U16 => 16,
            Self::U32 => 32,
            Self::U64 => 64,
        }
    }

    /// Returns a mask with every bit of the register set
    pub const fn all_bits(self) -> u64 {
        match self {
            Self::U64 => u64::MAX,
            _ => (1u64 << self.bits()) - 1,
        }
    }

    /// Returns `true` if `mask` fits into the register
    #[inline]
    pub const fn contains(self, mask: u64) -> bool {
        mask & !self.all_bits() == 0
    }
}

impl RegisterDesc {
    /// Describes a register
    pub const fn new(name: &'static str, width: RegisterWidth) -> Self {
        Self { name, width }
    }
}

impl ResourceDesc {
    /// Describes a resource
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}
