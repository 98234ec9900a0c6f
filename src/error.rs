//! Runtime request errors
use core::fmt;

use irq_catalog::{EnableField, RegisterId, ResourceId};

/// Describes why a request was refused. Refused requests leave the controller untouched.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Error {
    /// The resource isn't declared by the controller's catalog
    UnknownResource(ResourceId),
    /// The register isn't declared by the controller's catalog
    UnknownRegister(RegisterId),
    /// The field is empty or has bits which belong to no declared interrupt
    UndeclaredField(EnableField),
    /// The named interrupt has no enable field of its own, so it can't be enabled or disabled
    /// by class
    TopLevelUnsupported(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::UnknownResource(resource) => write!(f, "unknown resource {}", resource.index()),
            Self::UnknownRegister(register) => write!(f, "unknown register {}", register.index()),
            Self::UndeclaredField(field) => write!(
                f,
                "mask {:#x} isn't declared in register {}",
                field.mask,
                field.register.index()
            ),
            Self::TopLevelUnsupported(name) => write!(
                f,
                "{} is a top-level interrupt, enabling it by class is not supported",
                name
            ),
        }
    }
}
