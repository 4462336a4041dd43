//! Platform abstraction for the channel lock.
//!
//! With the `std` feature enabled the lock is a `parking_lot::Mutex`, released
//! with a fair unlock so callers queued on a busy channel get it in turn.
//! Without it, the `lock-free` feature selects `spin::Mutex`.

#[cfg(not(any(feature = "std", feature = "lock-free")))]
compile_error!("enable either the `std` or the `lock-free` feature");

#[cfg(feature = "std")]
pub type MutexGuard<'a, T> = parking_lot::MutexGuard<'a, T>;
#[cfg(all(not(feature = "std"), feature = "lock-free"))]
pub type MutexGuard<'a, T> = spin::MutexGuard<'a, T>;

/// Platform-agnostic mutex wrapper.
pub struct Mutex<T> {
    #[cfg(feature = "std")]
    inner: parking_lot::Mutex<T>,
    #[cfg(all(not(feature = "std"), feature = "lock-free"))]
    inner: spin::Mutex<T>,
}

impl<T> Mutex<T> {
    /// Creates a new mutex protecting the given value.
    pub const fn new(value: T) -> Self {
        Self {
            #[cfg(feature = "std")]
            inner: parking_lot::Mutex::new(value),
            #[cfg(all(not(feature = "std"), feature = "lock-free"))]
            inner: spin::Mutex::new(value),
        }
    }

    /// Acquires the mutex, blocking until it becomes available.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock()
    }

    /// Runs `f` with the lock held.
    ///
    /// On normal return the lock is handed to the next waiter fairly; if `f`
    /// panics the guard is still dropped during unwinding.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        let result = f(&mut *guard);
        unlock(guard);
        result
    }
}

#[cfg(feature = "std")]
fn unlock<T>(guard: MutexGuard<'_, T>) {
    MutexGuard::unlock_fair(guard);
}

#[cfg(all(not(feature = "std"), feature = "lock-free"))]
fn unlock<T>(guard: MutexGuard<'_, T>) {
    drop(guard);
}
