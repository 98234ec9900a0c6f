//! Mutable per-controller masks and resource flags
use alloc::vec::Vec;
use irq_catalog::{Catalog, EnableField, RegisterId, ResourceId};

use crate::derive::DerivedTables;

/// Reported availability of a resource
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ResourceStatus {
    /// Resource is unavailable, interrupts depending on it must stay disabled
    Off,
    /// Resource is available
    On,
}

/// Allowed/desired masks of one register at some point in time
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RegisterSnapshot {
    /// Bits the current resource availability permits
    pub allowed: u64,
    /// Bits firmware has requested
    pub desired: u64,
}

/// The only mutable state of a controller. Every access happens with the controller's lock held.
pub(crate) struct RuntimeState {
    status: Vec<ResourceStatus>,
    allowed: Vec<u64>,
    desired: Vec<u64>,
}

impl RegisterSnapshot {
    /// Returns the value the register holds in hardware
    #[inline]
    pub const fn programmed(&self) -> u64 {
        self.allowed & self.desired
    }
}

impl RuntimeState {
    /// Every resource on, nothing constrained, nothing requested
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            status: catalog
                .resources()
                .iter()
                .map(|_| ResourceStatus::On)
                .collect(),
            allowed: catalog
                .registers()
                .iter()
                .map(|desc| desc.width.all_bits())
                .collect(),
            desired: catalog.registers().iter().map(|_| 0).collect(),
        }
    }

    #[inline]
    pub fn status(&self, resource: ResourceId) -> ResourceStatus {
        self.status[resource.index()]
    }

    #[inline]
    pub fn set_status(&mut self, resource: ResourceId, status: ResourceStatus) {
        self.status[resource.index()] = status;
    }

    #[inline]
    pub fn snapshot(&self, register: RegisterId) -> RegisterSnapshot {
        RegisterSnapshot {
            allowed: self.allowed[register.index()],
            desired: self.desired[register.index()],
        }
    }

    /// Sets or clears the field's bits in the desired mask of its register
    pub fn apply(&mut self, field: EnableField, enable: bool) {
        let desired = &mut self.desired[field.register.index()];

        if enable {
            *desired |= field.mask;
        } else {
            *desired &= !field.mask;
        }
    }

    /// Rebuilds the allowed mask of every affected register from the current resource status
    pub fn recalculate_allowed(&mut self, catalog: &Catalog, tables: &DerivedTables) {
        for &register in tables.affected_registers() {
            self.allowed[register.index()] = catalog.registers()[register.index()].width.all_bits();
        }

        for (row, &resource) in tables.all_resources().iter().enumerate() {
            if self.status(resource) == ResourceStatus::On {
                continue;
            }

            let masks = tables.allowed_row(row);
            for (&register, &mask) in tables.affected_registers().iter().zip(masks) {
                self.allowed[register.index()] &= mask;
            }
        }
    }
}
