// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Extension trait for [`Mutex`] that recovers from poisoning. See [`MutexExt`] for
//! details.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Every component in this crate (parser, scheduler, timed events) guards its state
/// with a single [`Mutex`] and never holds it across a call into user code. A panic in
/// user code therefore can't leave the guarded state half updated, and a poisoned lock
/// is safe to keep using.
///
/// [`lock_recover`] hides the [`PoisonError::into_inner`] boilerplate so that callers
/// don't reach for `unwrap()`.
///
/// [`lock_recover`]: Self::lock_recover
pub trait MutexExt<T> {
    /// Acquires the lock, ignoring poisoning.
    fn lock_recover(&self) -> MutexGuard<'_, T>;
}

impl<T> MutexExt<T> for Mutex<T> {
    fn lock_recover(&self) -> MutexGuard<'_, T> {
        self.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
