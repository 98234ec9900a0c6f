//! Static description of resource-gated interrupt lines.
//!
//! A [Catalog] lists the enable registers, the resources and every interrupt line of a device.
//! It is meant to be built in a `static` and validated once before anything consumes it.
#![no_std]
#![warn(missing_docs)]

#[cfg(test)]
extern crate std;

pub mod error;
pub(crate) mod interrupt;
pub(crate) mod register;

pub use error::CatalogError;
pub use interrupt::{CallbackClass, EnableField, InterruptDescriptor};
pub use register::{RegisterDesc, RegisterId, RegisterWidth, ResourceDesc, ResourceId};

/// Immutable table of registers, resources and interrupts of a device
#[derive(Clone, Copy, Debug)]
pub struct Catalog {
    registers: &'static [RegisterDesc],
    resources: &'static [ResourceDesc],
    interrupts: &'static [InterruptDescriptor],
}

impl Catalog {
    /// Constructs a catalog. [RegisterId] and [ResourceId] values used by `interrupts` are
    /// indices into `registers` and `resources` respectively.
    pub const fn new(
        registers: &'static [RegisterDesc],
        resources: &'static [ResourceDesc],
        interrupts: &'static [InterruptDescriptor],
    ) -> Self {
        Self {
            registers,
            resources,
            interrupts,
        }
    }

    /// Returns all the registers declared
    #[inline]
    pub fn registers(&self) -> &'static [RegisterDesc] {
        self.registers
    }

    /// Returns all the resources declared
    #[inline]
    pub fn resources(&self) -> &'static [ResourceDesc] {
        self.resources
    }

    /// Returns all the interrupts declared
    #[inline]
    pub fn interrupts(&self) -> &'static [InterruptDescriptor] {
        self.interrupts
    }

    /// Looks up a register description
    pub fn register(&self, id: RegisterId) -> Option<&'static RegisterDesc> {
        self.registers.get(id.index())
    }

    /// Looks up a resource description
    pub fn resource(&self, id: ResourceId) -> Option<&'static ResourceDesc> {
        self.resources.get(id.index())
    }

    /// Returns an iterator over the interrupts with an enable field, paired with that field
    pub fn fields(&self) -> impl Iterator<Item = (&'static InterruptDescriptor, EnableField)> + Clone {
        self.interrupts
            .iter()
            .filter_map(|irq| irq.enable_field.map(|field| (irq, field)))
    }

    /// Returns an iterator over the interrupts belonging to any of the `classes`
    pub fn matching<'a>(
        &self,
        classes: &'a [CallbackClass],
    ) -> impl Iterator<Item = &'static InterruptDescriptor> + Clone + 'a {
        self.interrupts
            .iter()
            .filter(move |irq| irq.matches(classes))
    }

    /// Returns the union of every enable field declared in `register`
    pub fn declared_mask(&self, register: RegisterId) -> u64 {
        self.fields()
            .filter(|(_, field)| field.register == register)
            .fold(0, |mask, (_, field)| mask | field.mask)
    }

    /// Checks the catalog for configuration defects.
    ///
    /// # Note
    ///
    /// Runtime users of the catalog rely on this having succeeded, so it has to be called before
    /// any of them are constructed.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.registers.len() > u16::MAX as usize + 1 || self.resources.len() > u16::MAX as usize + 1
        {
            return Err(CatalogError::TooManyEntries);
        }

        for (i, irq) in self.interrupts.iter().enumerate() {
            for (j, &resource) in irq.resources.iter().enumerate() {
                if self.resource(resource).is_none() {
                    return Err(CatalogError::UnknownResource {
                        interrupt: irq.name,
                        resource,
                    });
                }
                if irq.resources[..j].contains(&resource) {
                    return Err(CatalogError::DuplicateResource {
                        interrupt: irq.name,
                        resource,
                    });
                }
            }

            let Some(field) = irq.enable_field else {
                continue;
            };

            let Some(register) = self.register(field.register) else {
                return Err(CatalogError::UnknownRegister {
                    interrupt: irq.name,
                    register: field.register,
                });
            };
            if field.mask == 0 {
                return Err(CatalogError::EmptyMask {
                    interrupt: irq.name,
                });
            }
            if !register.width.contains(field.mask) {
                return Err(CatalogError::MaskExceedsWidth {
                    interrupt: irq.name,
                    mask: field.mask,
                    width: register.width,
                });
            }

            // Only look back, so every pair is checked exactly once
            let earlier = self.interrupts[..i]
                .iter()
                .filter_map(|other| other.enable_field.map(|f| (other, f)));
            for (other, other_field) in earlier {
                if other_field.register == field.register && other_field.mask & field.mask != 0 {
                    return Err(CatalogError::OverlappingFields {
                        first: other.name,
                        second: irq.name,
                        register: field.register,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        CallbackClass, Catalog, CatalogError, EnableField, InterruptDescriptor, RegisterDesc,
        RegisterId, RegisterWidth, ResourceDesc, ResourceId,
    };

    const CTRL: RegisterId = RegisterId::new(0);
    const STATUS: RegisterId = RegisterId::new(1);
    const POWER: ResourceId = ResourceId::new(0);
    const CLOCK: ResourceId = ResourceId::new(1);

    const TIMER: CallbackClass = CallbackClass::new("timer");
    const UART: CallbackClass = CallbackClass::new("uart");

    static REGISTERS: [RegisterDesc; 2] = [
        RegisterDesc::new("CTRL", RegisterWidth::U8),
        RegisterDesc::new("STATUS", RegisterWidth::U32),
    ];
    static RESOURCES: [ResourceDesc; 2] = [ResourceDesc::new("power"), ResourceDesc::new("clock")];

    fn catalog(interrupts: &'static [InterruptDescriptor]) -> Catalog {
        Catalog::new(&REGISTERS, &RESOURCES, interrupts)
    }

    #[test]
    fn test_valid_catalog() {
        static IRQS: [InterruptDescriptor; 4] = [
            InterruptDescriptor::new("timer0", TIMER, EnableField::bit(CTRL, 0), &[POWER]),
            InterruptDescriptor::new("timer1", TIMER, EnableField::bit(CTRL, 1), &[POWER, CLOCK]),
            InterruptDescriptor::new("uart", UART, EnableField::new(STATUS, 0xF0), &[]),
            InterruptDescriptor::top_level("aggregate", UART),
        ];
        let catalog = catalog(&IRQS);

        assert_eq!(catalog.validate(), Ok(()));
        assert_eq!(catalog.declared_mask(CTRL), 0b11);
        assert_eq!(catalog.declared_mask(STATUS), 0xF0);
        assert_eq!(catalog.fields().count(), 3);
        assert_eq!(catalog.matching(&[TIMER]).count(), 2);
        assert_eq!(catalog.matching(&[UART]).count(), 2);
        assert_eq!(catalog.matching(&[CallbackClass::new("none")]).count(), 0);
        assert!(IRQS[1].depends_on(CLOCK));
        assert!(!IRQS[0].depends_on(CLOCK));
        assert!(!IRQS[2].is_resource_dependent());
    }

    #[test]
    fn test_rejects_overlap() {
        static IRQS: [InterruptDescriptor; 3] = [
            InterruptDescriptor::new("a", TIMER, EnableField::new(CTRL, 0b0011), &[]),
            InterruptDescriptor::new("b", TIMER, EnableField::new(STATUS, 0b0011), &[]),
            InterruptDescriptor::new("c", UART, EnableField::new(CTRL, 0b0110), &[]),
        ];

        assert_eq!(
            catalog(&IRQS).validate(),
            Err(CatalogError::OverlappingFields {
                first: "a",
                second: "c",
                register: CTRL
            })
        );
    }

    #[test]
    fn test_rejects_same_field_twice() {
        static IRQS: [InterruptDescriptor; 2] = [
            InterruptDescriptor::new("a", TIMER, EnableField::bit(CTRL, 3), &[]),
            InterruptDescriptor::new("b", UART, EnableField::bit(CTRL, 3), &[POWER]),
        ];

        assert!(matches!(
            catalog(&IRQS).validate(),
            Err(CatalogError::OverlappingFields { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_fields() {
        static WIDE: [InterruptDescriptor; 1] = [InterruptDescriptor::new(
            "wide",
            TIMER,
            EnableField::bit(CTRL, 8),
            &[],
        )];
        static EMPTY: [InterruptDescriptor; 1] = [InterruptDescriptor::new(
            "empty",
            TIMER,
            EnableField::new(CTRL, 0),
            &[],
        )];
        static NOWHERE: [InterruptDescriptor; 1] = [InterruptDescriptor::new(
            "nowhere",
            TIMER,
            EnableField::bit(RegisterId::new(7), 0),
            &[],
        )];

        assert_eq!(
            catalog(&WIDE).validate(),
            Err(CatalogError::MaskExceedsWidth {
                interrupt: "wide",
                mask: 0x100,
                width: RegisterWidth::U8
            })
        );
        assert_eq!(
            catalog(&EMPTY).validate(),
            Err(CatalogError::EmptyMask { interrupt: "empty" })
        );
        assert_eq!(
            catalog(&NOWHERE).validate(),
            Err(CatalogError::UnknownRegister {
                interrupt: "nowhere",
                register: RegisterId::new(7)
            })
        );
    }

    #[test]
    fn test_bit_past_u64() {
        static FAR: [InterruptDescriptor; 1] = [InterruptDescriptor::new(
            "far",
            UART,
            EnableField::bit(STATUS, 64),
            &[],
        )];

        for bit in [64, 65, u32::MAX] {
            assert_eq!(EnableField::bit(STATUS, bit).mask, 0);
        }
        assert_eq!(EnableField::bit(STATUS, 63).mask, 1 << 63);

        assert_eq!(
            catalog(&FAR).validate(),
            Err(CatalogError::EmptyMask { interrupt: "far" })
        );
    }

    #[test]
    fn test_rejects_bad_resources() {
        static UNKNOWN: [InterruptDescriptor; 1] = [InterruptDescriptor::new(
            "unknown",
            TIMER,
            EnableField::bit(CTRL, 0),
            &[ResourceId::new(2)],
        )];
        static TWICE: [InterruptDescriptor; 1] = [InterruptDescriptor::new(
            "twice",
            TIMER,
            EnableField::bit(CTRL, 0),
            &[CLOCK, POWER, CLOCK],
        )];

        assert_eq!(
            catalog(&UNKNOWN).validate(),
            Err(CatalogError::UnknownResource {
                interrupt: "unknown",
                resource: ResourceId::new(2)
            })
        );
        assert_eq!(
            catalog(&TWICE).validate(),
            Err(CatalogError::DuplicateResource {
                interrupt: "twice",
                resource: CLOCK
            })
        );
    }
}
