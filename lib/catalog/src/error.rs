//! Configuration-time catalog defects
use core::fmt;

use crate::{RegisterId, RegisterWidth, ResourceId};

/// Describes why a [crate::Catalog] was rejected
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CatalogError {
    /// An enable field points to a register the catalog doesn't declare
    UnknownRegister {
        /// Interrupt owning the field
        interrupt: &'static str,
        /// Offending register identity
        register: RegisterId,
    },
    /// An interrupt depends on a resource the catalog doesn't declare
    UnknownResource {
        /// Interrupt listing the resource
        interrupt: &'static str,
        /// Offending resource identity
        resource: ResourceId,
    },
    /// An interrupt lists the same resource more than once
    DuplicateResource {
        /// Interrupt listing the resource
        interrupt: &'static str,
        /// Resource listed twice
        resource: ResourceId,
    },
    /// An enable field has no bits set
    EmptyMask {
        /// Interrupt owning the field
        interrupt: &'static str,
    },
    /// An enable field has bits outside of its register
    MaskExceedsWidth {
        /// Interrupt owning the field
        interrupt: &'static str,
        /// Offending mask
        mask: u64,
        /// Width of the register the field is located in
        width: RegisterWidth,
    },
    /// Two enable fields in the same register share at least one bit
    OverlappingFields {
        /// Interrupt declared first
        first: &'static str,
        /// Interrupt declared later
        second: &'static str,
        /// Register both fields are located in
        register: RegisterId,
    },
    /// The catalog declares more registers or resources than can be identified
    TooManyEntries,
    /// The register bank the catalog is paired with lacks a register, or can't hold its width
    UnsupportedRegister {
        /// Register the bank can't store
        register: RegisterId,
        /// Width the catalog declares for it
        width: RegisterWidth,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::UnknownRegister {
                interrupt,
                register,
            } => write!(f, "{}: unknown register {}", interrupt, register.index()),
            Self::UnknownResource {
                interrupt,
                resource,
            } => write!(f, "{}: unknown resource {}", interrupt, resource.index()),
            Self::DuplicateResource {
                interrupt,
                resource,
            } => write!(
                f,
                "{}: resource {} listed more than once",
                interrupt,
                resource.index()
            ),
            Self::EmptyMask { interrupt } => write!(f, "{}: empty enable mask", interrupt),
            Self::MaskExceedsWidth {
                interrupt,
                mask,
                width,
            } => write!(
                f,
                "{}: mask {:#x} doesn't fit a {}-bit register",
                interrupt,
                mask,
                width.bits()
            ),
            Self::OverlappingFields {
                first,
                second,
                register,
            } => write!(
                f,
                "{} and {} overlap in register {}",
                first,
                second,
                register.index()
            ),
            Self::TooManyEntries => f.write_str("too many registers or resources"),
            Self::UnsupportedRegister { register, width } => write!(
                f,
                "register bank can't store {}-bit register {}",
                width.bits(),
                register.index()
            ),
        }
    }
}
