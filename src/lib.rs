//! Resource-gated interrupt enable arbitration.
//!
//! Firmware describes its interrupt lines in a static [Catalog]: which register bits enable each
//! line, and which resources (power rails, clock domains, peripherals) must be available for the
//! line to be safely enabled. A [Controller] derived from that catalog reconciles the interrupts
//! firmware *wants* enabled with the resources currently *available*, and writes the result to
//! the enable registers through a [RegisterBank].
//!
//! ```ignore
//! static ARBITER: OneTimeInit<Controller<MmioBank<'static, ReadWrite<u32>, 2>, Daif>> =
//!     OneTimeInit::new();
//!
//! let bank = unsafe { MmioBank::new([&regs.IER0, &regs.IER1]) };
//! ARBITER.init(Controller::new(&CATALOG, bank)?).ok();
//!
//! ARBITER.get().enable(&[UART_RX])?;
//! ARBITER.get().turn_off_resource(UART_CLOCK)?;
//! ```
#![no_std]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod arch;
pub mod controller;
pub mod derive;
pub mod device;
pub mod error;
pub mod sync;
pub mod util;

pub use controller::{Controller, RegisterSnapshot, ResourceStatus};
pub use device::{MmioBank, RegisterBank, RegisterWord};
pub use error::Error;
pub use irq_catalog::{
    CallbackClass, Catalog, CatalogError, EnableField, InterruptDescriptor, RegisterDesc,
    RegisterId, RegisterWidth, ResourceDesc, ResourceId,
};
pub use sync::{InterruptMask, NoMask};
#[cfg(feature = "critical-section")]
pub use sync::CriticalSectionMask;
pub use util::OneTimeInit;
