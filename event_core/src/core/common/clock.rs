// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Every time dependent decision in this crate (escape timeout, throttle, staleness,
//! timer deadlines) reads the current time through a [`Clock`]. Production code uses
//! [`SystemClock`], tests use [`ManualClock`] and advance it by hand.

use crate::MutexExt as _;
use std::{fmt::Debug,
          sync::{Arc, Mutex},
          time::{Duration, Instant}};

/// Source of the current [`Instant`].
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> Instant;
}

/// Shared handle to a [`Clock`]. Components clone it instead of owning a clock.
pub type SharedClock = Arc<dyn Clock>;

/// Reads [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant { Instant::now() }
}

impl SystemClock {
    #[must_use]
    pub fn shared() -> SharedClock { Arc::new(SystemClock) }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self { Self::new() }
}

impl ManualClock {
    /// Starts at the current wall clock time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, duration: Duration) { *self.now.lock_recover() += duration; }

    pub fn set(&self, instant: Instant) { *self.now.lock_recover() = instant; }

    #[must_use]
    pub fn shared(&self) -> SharedClock { Arc::new(self.clone()) }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant { *self.now.lock_recover() }
}
