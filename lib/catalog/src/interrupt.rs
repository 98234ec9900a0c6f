//! Interrupt line descriptions
use crate::{RegisterId, ResourceId};

/// Location of one interrupt's enable bit(s) within a register
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EnableField {
    /// Register the bits are located in
    pub register: RegisterId,
    /// Bits controlling the interrupt
    pub mask: u64,
}

/// Semantic group an interrupt belongs to, used for enable/disable requests by name rather than
/// by register field
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CallbackClass(&'static str);

/// Static description of one hardware interrupt line
#[derive(Clone, Copy, Debug)]
pub struct InterruptDescriptor {
    /// Display name of the interrupt
    pub name: &'static str,
    /// Software-controlled enable bit(s), `None` for lines without one (always-on or aggregated
    /// top-level interrupts)
    pub enable_field: Option<EnableField>,
    /// Resources which must be available for the interrupt to be enabled
    pub resources: &'static [ResourceId],
    /// Callback class of the interrupt
    pub class: CallbackClass,
}

impl EnableField {
    /// Describes the `mask` bits of `register`
    pub const fn new(register: RegisterId, mask: u64) -> Self {
        Self { register, mask }
    }

    /// Describes a single `bit` of `register`. Bits past 63 give an empty mask, which
    /// [crate::Catalog::validate] rejects.
    pub const fn bit(register: RegisterId, bit: u32) -> Self {
        let mask = match 1u64.checked_shl(bit) {
            Some(mask) => mask,
            None => 0,
        };

        Self::new(register, mask)
    }
}

impl CallbackClass {
    /// Constructs a callback class tag
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the name of the class
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl InterruptDescriptor {
    /// Describes an interrupt with a software-controlled enable field
    pub const fn new(
        name: &'static str,
        class: CallbackClass,
        enable_field: EnableField,
        resources: &'static [ResourceId],
    ) -> Self {
        Self {
            name,
            enable_field: Some(enable_field),
            resources,
            class,
        }
    }

    /// Describes a top-level interrupt which has no enable field of its own
    pub const fn top_level(name: &'static str, class: CallbackClass) -> Self {
        Self {
            name,
            enable_field: None,
            resources: &[],
            class,
        }
    }

    /// Returns `true` if the interrupt can only be enabled while `resource` is available
    pub fn depends_on(&self, resource: ResourceId) -> bool {
        self.resources.contains(&resource)
    }

    /// Returns `true` if the interrupt depends on any resource at all
    #[inline]
    pub fn is_resource_dependent(&self) -> bool {
        !self.resources.is_empty()
    }

    /// Returns `true` if the interrupt belongs to any of the `classes`
    pub fn matches(&self, classes: &[CallbackClass]) -> bool {
        classes.contains(&self.class)
    }
}
