//! Tables derived once from a [Catalog] before any runtime call
use alloc::vec::Vec;
use irq_catalog::{Catalog, CatalogError, RegisterId, ResourceId};

/// Resource/register tables computed from a validated [Catalog]. Immutable once derived.
pub struct DerivedTables {
    all_resources: Vec<ResourceId>,
    affected_registers: Vec<RegisterId>,
    // Row per entry of `all_resources`, column per entry of `affected_registers`
    allowed: Vec<u64>,
    // Union of the declared enable fields, per catalog register
    declared: Vec<u64>,
}

impl DerivedTables {
    /// Validates the catalog and derives the tables from it
    pub fn derive(catalog: &Catalog) -> Result<Self, CatalogError> {
        catalog.validate()?;

        let mut all_resources = Vec::new();
        for irq in catalog.interrupts() {
            for &resource in irq.resources {
                if !all_resources.contains(&resource) {
                    all_resources.push(resource);
                }
            }
        }

        let mut affected_registers = Vec::new();
        for (irq, field) in catalog.fields() {
            if irq.is_resource_dependent() && !affected_registers.contains(&field.register) {
                affected_registers.push(field.register);
            }
        }

        let mut allowed = Vec::with_capacity(all_resources.len() * affected_registers.len());
        for &resource in all_resources.iter() {
            for &register in affected_registers.iter() {
                // Bits of the interrupts which can stay enabled while `resource` is off
                let mask = catalog
                    .fields()
                    .filter(|(irq, field)| field.register == register && !irq.depends_on(resource))
                    .fold(0, |mask, (_, field)| mask | field.mask);

                allowed.push(mask);
            }
        }

        // validate() guarantees the index fits
        let declared = (0..catalog.registers().len())
            .map(|index| catalog.declared_mask(RegisterId::new(index as u16)))
            .collect();

        for (index, desc) in catalog.resources().iter().enumerate() {
            if !all_resources.iter().any(|r| r.index() == index) {
                log::warn!("Resource {:?} gates no interrupts", desc.name);
            }
        }

        log::debug!(
            "Derived allowed masks: {} interrupts, {} resources, {} affected registers",
            catalog.interrupts().len(),
            all_resources.len(),
            affected_registers.len()
        );

        Ok(Self {
            all_resources,
            affected_registers,
            allowed,
            declared,
        })
    }

    /// Returns every resource referenced by the catalog's interrupts, in order of first reference
    #[inline]
    pub fn all_resources(&self) -> &[ResourceId] {
        &self.all_resources
    }

    /// Returns every register holding an enable field of a resource-dependent interrupt, in order
    /// of first reference
    #[inline]
    pub fn affected_registers(&self) -> &[RegisterId] {
        &self.affected_registers
    }

    /// Returns `true` if resource transitions have to reprogram `register`
    pub fn is_affected(&self, register: RegisterId) -> bool {
        self.affected_registers.contains(&register)
    }

    /// Returns the bits of `register` which may stay set while `resource` is unavailable, `None`
    /// if the pair isn't part of the derived tables.
    pub fn allowed_mask(&self, resource: ResourceId, register: RegisterId) -> Option<u64> {
        let row = self.all_resources.iter().position(|&r| r == resource)?;
        let column = self
            .affected_registers
            .iter()
            .position(|&r| r == register)?;

        Some(self.allowed_row(row)[column])
    }

    /// Returns the union of every enable field declared in `register`, zero for unknown registers
    #[inline]
    pub fn declared_mask(&self, register: RegisterId) -> u64 {
        self.declared.get(register.index()).copied().unwrap_or(0)
    }

    /// Returns the allowed masks of the `row`-th referenced resource, one per affected register
    #[inline]
    pub(crate) fn allowed_row(&self, row: usize) -> &[u64] {
        let width = self.affected_registers.len();
        &self.allowed[row * width..(row + 1) * width]
    }
}

#[cfg(test)]
mod tests {
    use irq_catalog::{
        CallbackClass, Catalog, CatalogError, EnableField, InterruptDescriptor, RegisterDesc,
        RegisterId, RegisterWidth, ResourceDesc, ResourceId,
    };

    use super::DerivedTables;

    const X: RegisterId = RegisterId::new(0);
    const Y: RegisterId = RegisterId::new(1);
    const Z: RegisterId = RegisterId::new(2);

    const P: ResourceId = ResourceId::new(0);
    const Q: ResourceId = ResourceId::new(1);
    const UNUSED: ResourceId = ResourceId::new(2);

    const CLASS: CallbackClass = CallbackClass::new("irq");

    static REGISTERS: [RegisterDesc; 3] = [
        RegisterDesc::new("X", RegisterWidth::U8),
        RegisterDesc::new("Y", RegisterWidth::U16),
        RegisterDesc::new("Z", RegisterWidth::U32),
    ];
    static RESOURCES: [ResourceDesc; 3] = [
        ResourceDesc::new("P"),
        ResourceDesc::new("Q"),
        ResourceDesc::new("unused"),
    ];
    static IRQS: [InterruptDescriptor; 7] = [
        InterruptDescriptor::new("x0", CLASS, EnableField::bit(X, 0), &[Q]),
        InterruptDescriptor::new("x1", CLASS, EnableField::bit(X, 1), &[]),
        InterruptDescriptor::new("x2", CLASS, EnableField::new(X, 0b1100), &[P, Q]),
        InterruptDescriptor::new("y0", CLASS, EnableField::bit(Y, 8), &[P]),
        InterruptDescriptor::new("z0", CLASS, EnableField::bit(Z, 0), &[]),
        InterruptDescriptor::top_level("top", CLASS),
        InterruptDescriptor {
            name: "fieldless",
            enable_field: None,
            resources: &[UNUSED],
            class: CLASS,
        },
    ];
    static CATALOG: Catalog = Catalog::new(&REGISTERS, &RESOURCES, &IRQS);

    #[test]
    fn test_derived_sets() {
        let tables = DerivedTables::derive(&CATALOG).unwrap();

        // Field-less interrupts still contribute their resources
        assert_eq!(tables.all_resources(), &[Q, P, UNUSED]);
        assert_eq!(tables.affected_registers(), &[X, Y]);
        assert!(tables.is_affected(X));
        assert!(!tables.is_affected(Z));
    }

    #[test]
    fn test_allowed_masks() {
        let tables = DerivedTables::derive(&CATALOG).unwrap();

        assert_eq!(tables.allowed_mask(P, X), Some(0b0011));
        assert_eq!(tables.allowed_mask(Q, X), Some(0b0010));
        assert_eq!(tables.allowed_mask(P, Y), Some(0));
        assert_eq!(tables.allowed_mask(Q, Y), Some(1 << 8));
        // A resource gating no field keeps every declared bit
        assert_eq!(tables.allowed_mask(UNUSED, X), Some(0b1111));
        assert_eq!(tables.allowed_mask(UNUSED, Y), Some(1 << 8));

        // Not derived
        assert_eq!(tables.allowed_mask(P, Z), None);
        assert_eq!(tables.allowed_mask(ResourceId::new(9), X), None);

        assert_eq!(tables.allowed_row(0), &[0b0010, 1 << 8]);

        assert_eq!(tables.declared_mask(X), 0b1111);
        assert_eq!(tables.declared_mask(Z), 0b1);
        assert_eq!(tables.declared_mask(RegisterId::new(3)), 0);
    }

    #[test]
    fn test_rejects_invalid_catalog() {
        static BAD: [InterruptDescriptor; 2] = [
            InterruptDescriptor::new("a", CLASS, EnableField::bit(X, 0), &[P]),
            InterruptDescriptor::new("b", CLASS, EnableField::new(X, 0b11), &[]),
        ];
        static BAD_CATALOG: Catalog = Catalog::new(&REGISTERS, &RESOURCES, &BAD);

        assert!(matches!(
            DerivedTables::derive(&BAD_CATALOG),
            Err(CatalogError::OverlappingFields { .. })
        ));
    }
}
