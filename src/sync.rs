//! Synchronization primitives
use core::{
    marker::PhantomData,
    ops::{Deref, DerefMut},
};

use spinning_top::{Spinlock, SpinlockGuard};

/// Strategy used to keep interrupt handlers from running on the local CPU while a critical
/// section is held. Selected by the embedding application.
pub trait InterruptMask {
    /// Interrupt state saved by [InterruptMask::save_and_mask]
    type State: Copy;

    /// Saves the current interrupt state and masks interrupts
    fn save_and_mask() -> Self::State;

    /// Restores the interrupt state saved before.
    ///
    /// # Safety
    ///
    /// `state` must come from the matching [InterruptMask::save_and_mask] call, and restores
    /// must happen in the reverse order of the saves.
    unsafe fn restore(state: Self::State);
}

/// Strategy which doesn't touch the interrupt state at all.
///
/// # Note
///
/// Only suitable when none of the callers runs in interrupt context, e.g. hosted builds or
/// firmware which only touches the controller from tasks.
pub struct NoMask;

/// Strategy backed by the `critical-section` crate, which leaves the choice of primitive to
/// whatever implementation the final binary links in
#[cfg(feature = "critical-section")]
pub struct CriticalSectionMask;

/// Token type used to prevent IRQs from firing during some critical section. Normal IRQ operation
/// (if enabled before) is resumed when [IrqGuard]'s lifetime is over.
pub struct IrqGuard<M: InterruptMask> {
    state: M::State,
}

/// Spinlock implementation which prevents interrupts to avoid deadlocks when an interrupt handler
/// tries to acquire a lock taken before the IRQ fired.
pub struct IrqSafeSpinlock<M: InterruptMask, T> {
    inner: Spinlock<T>,
    _mask: PhantomData<fn() -> M>,
}

/// Token type allowing safe access to the underlying data of the [IrqSafeSpinlock]. Resumes normal
/// IRQ operation (if enabled before acquiring) when the lifetime is over.
pub struct IrqSafeSpinlockGuard<'a, M: InterruptMask, T> {
    // Must come first to ensure the lock is dropped first and only then IRQs are re-enabled
    inner: SpinlockGuard<'a, T>,
    _irq: IrqGuard<M>,
}

impl InterruptMask for NoMask {
    type State = ();

    #[inline(always)]
    fn save_and_mask() {}

    #[inline(always)]
    unsafe fn restore(_state: ()) {}
}

#[cfg(feature = "critical-section")]
impl InterruptMask for CriticalSectionMask {
    type State = critical_section::RestoreState;

    fn save_and_mask() -> Self::State {
        unsafe { critical_section::acquire() }
    }

    unsafe fn restore(state: Self::State) {
        critical_section::release(state);
    }
}

// IrqGuard impls
impl<M: InterruptMask> IrqGuard<M> {
    /// Saves the current IRQ state and masks them
    pub fn acquire() -> Self {
        Self {
            state: M::save_and_mask(),
        }
    }
}

impl<M: InterruptMask> Drop for IrqGuard<M> {
    fn drop(&mut self) {
        unsafe { M::restore(self.state) }
    }
}

// IrqSafeSpinlock impls
impl<M: InterruptMask, T> IrqSafeSpinlock<M, T> {
    /// Wraps the value in a spinlock primitive
    pub const fn new(value: T) -> Self {
        Self {
            inner: Spinlock::new(value),
            _mask: PhantomData,
        }
    }

    /// Attempts to acquire a lock. IRQs will be disabled until the lock is released.
    pub fn lock(&self) -> IrqSafeSpinlockGuard<M, T> {
        // Disable IRQs to avoid IRQ handler trying to acquire the same lock
        let irq_guard = IrqGuard::acquire();

        // Acquire the inner lock
        let inner = self.inner.lock();

        IrqSafeSpinlockGuard {
            inner,
            _irq: irq_guard,
        }
    }

    /// Consumes the lock, returning the wrapped value
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }

    /// Returns `true` if some context currently holds the lock
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }
}

impl<'a, M: InterruptMask, T> Deref for IrqSafeSpinlockGuard<'a, M, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.inner.deref()
    }
}

impl<'a, M: InterruptMask, T> DerefMut for IrqSafeSpinlockGuard<'a, M, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.inner.deref_mut()
    }
}
