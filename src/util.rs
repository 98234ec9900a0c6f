//! Miscellaneous helpers
use core::{cell::UnsafeCell, mem::MaybeUninit, sync::atomic::Ordering};

use atomic_enum::atomic_enum;

#[atomic_enum]
#[derive(PartialEq)]
enum InitState {
    Uninit,
    Initializing,
    Ready,
}

/// Wrapper for a value which can only be set once, e.g. a controller living in a `static` whose
/// tables are derived during boot
pub struct OneTimeInit<T> {
    value: UnsafeCell<MaybeUninit<T>>,
    state: AtomicInitState,
}

unsafe impl<T: Send + Sync> Sync for OneTimeInit<T> {}
unsafe impl<T: Send> Send for OneTimeInit<T> {}

impl<T> OneTimeInit<T> {
    /// Constructs an empty cell
    pub const fn new() -> Self {
        Self {
            value: UnsafeCell::new(MaybeUninit::uninit()),
            state: AtomicInitState::new(InitState::Uninit),
        }
    }

    /// Stores the value. If the cell has already been (or is being) initialized, `value` is
    /// handed back.
    pub fn init(&self, value: T) -> Result<&T, T> {
        if self
            .state
            .compare_exchange(
                InitState::Uninit,
                InitState::Initializing,
                Ordering::Acquire,
                Ordering::Relaxed,
            )
            .is_err()
        {
            return Err(value);
        }

        let value = unsafe { (*self.value.get()).write(value) };
        self.state.store(InitState::Ready, Ordering::Release);

        Ok(&*value)
    }

    /// Returns `true` if the value has been stored
    pub fn is_initialized(&self) -> bool {
        self.state.load(Ordering::Acquire) == InitState::Ready
    }

    /// Returns the value, if it has been stored
    pub fn try_get(&self) -> Option<&T> {
        if self.is_initialized() {
            Some(unsafe { (*self.value.get()).assume_init_ref() })
        } else {
            None
        }
    }

    /// Returns the value.
    ///
    /// # Panics
    ///
    /// Will panic if the value hasn't been stored yet.
    pub fn get(&self) -> &T {
        match self.try_get() {
            Some(value) => value,
            None => panic!("OneTimeInit value accessed before initialization"),
        }
    }
}

impl<T> Drop for OneTimeInit<T> {
    fn drop(&mut self) {
        if self.state.load(Ordering::Acquire) == InitState::Ready {
            unsafe { self.value.get_mut().assume_init_drop() }
        }
    }
}
