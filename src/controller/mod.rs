//! Resource-gated interrupt enable controller.
//!
//! Every enable register governed by a [Controller] holds `allowed & desired` at all times:
//! * `allowed` is rebuilt from the derived tables whenever a resource is reported on or off;
//! * `desired` is what firmware asked for through [Controller::enable] and friends.
//!
//! All mutations of both masks, and the register writes following them, happen under a single
//! per-controller [IrqSafeSpinlock], so callers from task and interrupt context are serialized.
use irq_catalog::{CallbackClass, Catalog, CatalogError, EnableField, RegisterId, ResourceId};
use static_assertions::assert_impl_all;

use crate::{
    derive::DerivedTables,
    device::RegisterBank,
    error::Error,
    sync::{InterruptMask, IrqSafeSpinlock, NoMask},
};

use self::state::RuntimeState;

pub mod state;

pub use state::{RegisterSnapshot, ResourceStatus};

/// Arbitrates the enable registers described by one static [Catalog].
///
/// `M` selects how interrupts are masked while the controller's lock is held. A controller used
/// from interrupt context needs a strategy which actually masks them, such as
/// `arch::aarch64::Daif`: with [NoMask], an interrupt handler calling into the controller
/// while the interrupted code holds the lock spins forever.
pub struct Controller<B: RegisterBank, M: InterruptMask> {
    catalog: &'static Catalog,
    tables: DerivedTables,
    bank: B,
    state: IrqSafeSpinlock<M, RuntimeState>,
}

assert_impl_all!(DerivedTables: Send, Sync);
assert_impl_all!(IrqSafeSpinlock<NoMask, RuntimeState>: Send, Sync);

impl<B: RegisterBank, M: InterruptMask> Controller<B, M> {
    /// Derives the controller tables from `catalog`. The registers in `bank` are not written until
    /// the first request.
    ///
    /// # Errors
    ///
    /// Fails if the catalog has configuration defects, see [Catalog::validate], or if `bank`
    /// can't store one of its registers ([CatalogError::UnsupportedRegister]).
    pub fn new(catalog: &'static Catalog, bank: B) -> Result<Self, CatalogError> {
        let tables = DerivedTables::derive(catalog)?;

        for (index, desc) in catalog.registers().iter().enumerate() {
            // derive() validated the catalog, the index fits
            let register = RegisterId::new(index as u16);
            if !bank.accepts(register, desc.width) {
                log::error!("{}: not supported by the register bank", desc.name);
                return Err(CatalogError::UnsupportedRegister {
                    register,
                    width: desc.width,
                });
            }
        }
        let state = RuntimeState::new(catalog);

        Ok(Self {
            catalog,
            tables,
            bank,
            state: IrqSafeSpinlock::new(state),
        })
    }

    /// Returns the catalog the controller was derived from
    #[inline]
    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    /// Returns the tables derived from the catalog
    #[inline]
    pub fn tables(&self) -> &DerivedTables {
        &self.tables
    }

    /// Returns the register bank the controller writes to
    #[inline]
    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// Records the new availability of `resource` and reprograms every resource-affected register
    pub fn update_resource(&self, resource: ResourceId, status: ResourceStatus) -> Result<(), Error> {
        let desc = self
            .catalog
            .resource(resource)
            .ok_or(Error::UnknownResource(resource))?;

        {
            let mut state = self.state.lock();

            state.set_status(resource, status);
            state.recalculate_allowed(self.catalog, &self.tables);
            self.program(&state, self.tables.affected_registers().iter().copied());
        }

        log::trace!("Resource {:?} is now {:?}", desc.name, status);

        Ok(())
    }

    /// Reports `resource` as available
    #[inline]
    pub fn turn_on_resource(&self, resource: ResourceId) -> Result<(), Error> {
        self.update_resource(resource, ResourceStatus::On)
    }

    /// Reports `resource` as unavailable
    #[inline]
    pub fn turn_off_resource(&self, resource: ResourceId) -> Result<(), Error> {
        self.update_resource(resource, ResourceStatus::Off)
    }

    /// Requests the interrupts controlled by `fields` to be enabled.
    ///
    /// # Note
    ///
    /// Prefer [Controller::enable], this is meant for interrupts which have no callback class
    /// worth naming.
    pub fn enable_fields(&self, fields: &[EnableField]) -> Result<(), Error> {
        self.set_fields(fields.iter().copied(), true)
    }

    /// Requests the interrupts controlled by `fields` to be disabled
    pub fn disable_fields(&self, fields: &[EnableField]) -> Result<(), Error> {
        self.set_fields(fields.iter().copied(), false)
    }

    /// Requests every interrupt of the given callback `classes` to be enabled. Classes which
    /// match no interrupt are ignored.
    ///
    /// # Errors
    ///
    /// Fails with [Error::TopLevelUnsupported] if a matching interrupt has no enable field. Nothing
    /// is changed in that case.
    pub fn enable(&self, classes: &[CallbackClass]) -> Result<(), Error> {
        self.set_by_class(classes, true)
    }

    /// Requests every interrupt of the given callback `classes` to be disabled. See
    /// [Controller::enable].
    pub fn disable(&self, classes: &[CallbackClass]) -> Result<(), Error> {
        self.set_by_class(classes, false)
    }

    /// Returns the last reported availability of `resource`
    pub fn resource_status(&self, resource: ResourceId) -> Option<ResourceStatus> {
        self.catalog.resource(resource)?;
        Some(self.state.lock().status(resource))
    }

    /// Returns a consistent view of the masks of `register`
    pub fn snapshot(&self, register: RegisterId) -> Option<RegisterSnapshot> {
        self.catalog.register(register)?;
        Some(self.state.lock().snapshot(register))
    }

    fn set_by_class(&self, classes: &[CallbackClass], enable: bool) -> Result<(), Error> {
        // The catalog is immutable, lookups don't need the lock
        if let Some(irq) = self
            .catalog
            .matching(classes)
            .find(|irq| irq.enable_field.is_none())
        {
            log::error!("{}: top-level interrupts can't be controlled by class", irq.name);
            return Err(Error::TopLevelUnsupported(irq.name));
        }

        let fields = self
            .catalog
            .matching(classes)
            .filter_map(|irq| irq.enable_field);

        self.set_fields(fields, enable)
    }

    fn set_fields<I>(&self, fields: I, enable: bool) -> Result<(), Error>
    where
        I: Iterator<Item = EnableField> + Clone,
    {
        for field in fields.clone() {
            self.check_field(field)?;
        }

        if fields.clone().next().is_none() {
            return Ok(());
        }

        {
            let mut state = self.state.lock();

            for field in fields.clone() {
                state.apply(field, enable);
            }

            // Each touched register is written once, in the order it was first touched
            let touched = fields.clone().enumerate().filter_map(|(i, field)| {
                let seen = fields.clone().take(i).any(|f| f.register == field.register);
                (!seen).then_some(field.register)
            });
            self.program(&state, touched);
        }

        for field in fields {
            log::trace!(
                "{} mask {:#x} in {:?}",
                if enable { "Enabled" } else { "Disabled" },
                field.mask,
                self.catalog.registers()[field.register.index()].name
            );
        }

        Ok(())
    }

    fn check_field(&self, field: EnableField) -> Result<(), Error> {
        self.catalog
            .register(field.register)
            .ok_or(Error::UnknownRegister(field.register))?;

        if field.mask == 0 || field.mask & !self.tables.declared_mask(field.register) != 0 {
            return Err(Error::UndeclaredField(field));
        }

        Ok(())
    }

    fn program<I: Iterator<Item = RegisterId>>(&self, state: &RuntimeState, registers: I) {
        for register in registers {
            // Never enable anything resource availability doesn't allow
            let value = state.snapshot(register).programmed();
            self.bank.write_enable_bits(register, value);
        }
    }
}
