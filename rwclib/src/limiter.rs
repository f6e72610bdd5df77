//! Counting semaphore that bounds how many inputs are open at once.
//!
//! Every scan unit takes one slot before it touches its input and gives it
//! back when the returned [`SlotGuard`] is dropped, so the slot is released on
//! every exit path of the unit, including early error returns and panics.

use std::num::NonZeroUsize;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Default number of inputs allowed open concurrently.
pub const MAX_OPEN_FILES: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(n) => n,
    None => unreachable!(),
};

/// Counting semaphore built from a mutex-guarded counter and a condition
/// variable.
///
/// The capacity is a [`NonZeroUsize`]: a limiter with no slots would block
/// every caller forever.
#[derive(Debug)]
pub struct Limiter {
    capacity: NonZeroUsize,
    available: Mutex<usize>,
    freed: Condvar,
}

impl Limiter {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            available: Mutex::new(capacity.get()),
            freed: Condvar::new(),
        }
    }

    /// Block until a slot is free, then take it.
    pub fn acquire(&self) -> SlotGuard<'_> {
        let available = self.lock();
        let mut available = self
            .freed
            .wait_while(available, |available| *available == 0)
            .unwrap_or_else(PoisonError::into_inner);
        *available -= 1;
        tracing::trace!(available = *available, "slot acquired");
        SlotGuard { limiter: self }
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Number of slots not currently held.
    pub fn available(&self) -> usize {
        *self.lock()
    }

    fn release(&self) {
        let mut available = self.lock();
        *available += 1;
        tracing::trace!(available = *available, "slot released");
        // One freed slot can satisfy exactly one waiter.
        self.freed.notify_one();
    }

    // The counter is a plain integer that is never left half-updated, so a
    // poisoned lock still guards a valid value.
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.available.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Limiter {
    fn default() -> Self {
        Self::new(MAX_OPEN_FILES)
    }
}

/// A held slot. Dropping it returns the slot to its [`Limiter`].
#[must_use = "the slot is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SlotGuard<'a> {
    limiter: &'a Limiter,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.limiter.release();
    }
}
