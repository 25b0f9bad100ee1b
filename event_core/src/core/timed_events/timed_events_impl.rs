// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Timeouts and idle callbacks for the main loop.
//!
//! # Timeouts
//!
//! Kept in a [`BTreeMap`] keyed by due time plus an insertion sequence number, so
//! timeouts that fall due together run in the order they were added. A zero interval
//! is backdated a little, which makes it due on the very next
//! [`TimedEvents::lock_and_run_timers`]. An interval too large to represent is clamped
//! to [`FAR_FUTURE`] from now.
//!
//! # Idles
//!
//! Run once per loop iteration, in registration order, until they return `false`.
//!
//! # Snapshots
//!
//! Both runners detach the due entries under the lock, invoke the callbacks with the
//! lock released, and then merge the results back. A callback can therefore add or
//! remove anything, including itself:
//!
//! - Work added during a run is not invoked in that same run.
//! - Work removed during a run is not invoked afterwards and not re-queued, even if it
//!   is in the detached snapshot.

use super::LoopWaker;
use crate::{MutexExt as _, SharedClock, SystemClock};
use std::{collections::{BTreeMap, HashSet},
          fmt::{Debug, Formatter},
          sync::{Arc, Mutex},
          time::{Duration, Instant}};

/// Returns `true` to run again after the same interval.
pub type TimeoutCallback = Box<dyn FnMut() -> bool + Send>;

/// Returns `true` to run again on the next iteration.
pub type IdleCallback = Box<dyn FnMut() -> bool + Send>;

/// How far a zero interval timeout is backdated.
const ZERO_INTERVAL_BACKDATE: Duration = Duration::from_nanos(100);

/// Stand in for an interval so large that `now + interval` doesn't fit an [`Instant`].
pub const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeoutToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdleToken(u64);

/// Orders by due time, then by insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct TimeoutKey {
    due: Instant,
    sequence: u64,
}

/// Result of [`TimedEvents::check_timers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerCheck {
    /// A timeout is due or an idle is pending.
    pub wake_now: bool,
    /// How long the loop may block. `None` means until input or a wakeup arrives.
    pub wait: Option<Duration>,
}

struct Timeout {
    token: TimeoutToken,
    interval: Duration,
    callback: TimeoutCallback,
}

struct Idle {
    token: IdleToken,
    callback: IdleCallback,
}

#[derive(Default)]
struct TimedEventsInner {
    next_token: u64,
    next_sequence: u64,
    timeouts: BTreeMap<TimeoutKey, Timeout>,
    idles: Vec<Idle>,
    running_timeouts: HashSet<TimeoutToken>,
    cancelled_timeouts: HashSet<TimeoutToken>,
    running_idles: HashSet<IdleToken>,
    cancelled_idles: HashSet<IdleToken>,
}

/// See the [module docs](self).
pub struct TimedEvents {
    inner: Mutex<TimedEventsInner>,
    waker: Mutex<Option<Arc<dyn LoopWaker>>>,
    clock: SharedClock,
}

impl Debug for TimedEvents {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock_recover();
        f.debug_struct("TimedEvents")
            .field("timeouts", &inner.timeouts.len())
            .field("idles", &inner.idles.len())
            .field("running_timeouts", &inner.running_timeouts.len())
            .field("running_idles", &inner.running_idles.len())
            .finish_non_exhaustive()
    }
}

impl Default for TimedEvents {
    fn default() -> Self { Self::new() }
}

impl TimedEvents {
    #[must_use]
    pub fn new() -> Self { Self::with_clock(SystemClock::shared()) }

    #[must_use]
    pub fn with_clock(clock: SharedClock) -> Self {
        Self {
            inner: Mutex::default(),
            waker: Mutex::new(None),
            clock,
        }
    }

    /// Woken every time work is added, so a blocked loop picks up the new deadline.
    pub fn set_waker(&self, waker: Arc<dyn LoopWaker>) {
        *self.waker.lock_recover() = Some(waker);
    }

    /// Schedules `callback` to run once `interval` has elapsed.
    pub fn add(
        &self,
        interval: Duration,
        callback: impl FnMut() -> bool + Send + 'static,
    ) -> TimeoutToken {
        let token = {
            let mut inner = self.inner.lock_recover();
            let token = TimeoutToken(inner.take_token());
            let now = self.clock.now();
            let due = if interval.is_zero() {
                now.checked_sub(ZERO_INTERVAL_BACKDATE).unwrap_or(now)
            } else {
                due_after(now, interval)
            };
            inner.insert_timeout(due, Timeout {
                token,
                interval,
                callback: Box::new(callback),
            });
            token
        };
        tracing::trace!(message = "timed events: added timeout", ?token, ?interval);
        self.wake();
        token
    }

    /// Returns `false` if the token is unknown, already ran to completion, or was
    /// already removed.
    pub fn remove(&self, token: TimeoutToken) -> bool {
        let mut inner = self.inner.lock_recover();
        let key = inner
            .timeouts
            .iter()
            .find(|(_, it)| it.token == token)
            .map(|(key, _)| *key);
        if let Some(key) = key {
            inner.timeouts.remove(&key);
            return true;
        }
        inner.running_timeouts.contains(&token) && inner.cancelled_timeouts.insert(token)
    }

    /// Schedules `callback` to run on every iteration until it returns `false`. Safe to
    /// call from any thread.
    pub fn add_idle(&self, callback: impl FnMut() -> bool + Send + 'static) -> IdleToken {
        let token = {
            let mut inner = self.inner.lock_recover();
            let token = IdleToken(inner.take_token());
            inner.idles.push(Idle {
                token,
                callback: Box::new(callback),
            });
            token
        };
        self.wake();
        token
    }

    pub fn remove_idle(&self, token: IdleToken) -> bool {
        let mut inner = self.inner.lock_recover();
        let before = inner.idles.len();
        inner.idles.retain(|it| it.token != token);
        if inner.idles.len() != before {
            return true;
        }
        inner.running_idles.contains(&token) && inner.cancelled_idles.insert(token)
    }

    /// Whether the loop should skip blocking, and how long it may block otherwise.
    ///
    /// | pending work          | `wake_now`     | `wait`                    |
    /// | --------------------- | -------------- | ------------------------- |
    /// | idles                 | `true`         | `Some(ZERO)`              |
    /// | timeouts only         | earliest due   | `Some(until earliest)`    |
    /// | nothing               | `false`        | `None`                    |
    #[must_use]
    pub fn check_timers(&self) -> TimerCheck {
        let inner = self.inner.lock_recover();
        let now = self.clock.now();
        if !inner.idles.is_empty() {
            return TimerCheck {
                wake_now: true,
                wait: Some(Duration::ZERO),
            };
        }
        match inner.timeouts.keys().next() {
            Some(earliest) => TimerCheck {
                wake_now: earliest.due <= now,
                wait: Some(earliest.due.saturating_duration_since(now)),
            },
            None => TimerCheck {
                wake_now: false,
                wait: None,
            },
        }
    }

    /// Runs every timeout that is due. Repeating ones are re-added `interval` after
    /// they finished running. Returns how many ran.
    pub fn lock_and_run_timers(&self) -> usize {
        let due = {
            let mut inner = self.inner.lock_recover();
            let not_due = inner.timeouts.split_off(&TimeoutKey {
                due: self.clock.now(),
                sequence: u64::MAX,
            });
            let due = std::mem::replace(&mut inner.timeouts, not_due);
            inner
                .running_timeouts
                .extend(due.values().map(|it| it.token));
            due
        };

        let count = due.len();
        for (_, mut timeout) in due {
            let again = {
                let inner = self.inner.lock_recover();
                !inner.cancelled_timeouts.contains(&timeout.token)
            } && (timeout.callback)();

            let mut inner = self.inner.lock_recover();
            inner.running_timeouts.remove(&timeout.token);
            let cancelled = inner.cancelled_timeouts.remove(&timeout.token);
            if again && !cancelled {
                let due = due_after(self.clock.now(), timeout.interval);
                inner.insert_timeout(due, timeout);
            }
        }
        count
    }

    /// Runs every idle registered before this call. Returns how many ran.
    pub fn lock_and_run_idles(&self) -> usize {
        let snapshot = {
            let mut inner = self.inner.lock_recover();
            let snapshot = std::mem::take(&mut inner.idles);
            inner.running_idles.extend(snapshot.iter().map(|it| it.token));
            snapshot
        };

        let count = snapshot.len();
        let mut survivors = Vec::with_capacity(count);
        for mut idle in snapshot {
            let again = {
                let inner = self.inner.lock_recover();
                !inner.cancelled_idles.contains(&idle.token)
            } && (idle.callback)();

            let mut inner = self.inner.lock_recover();
            inner.running_idles.remove(&idle.token);
            let cancelled = inner.cancelled_idles.remove(&idle.token);
            if again && !cancelled {
                survivors.push(idle);
            }
        }

        let mut inner = self.inner.lock_recover();
        let added_during_run = std::mem::take(&mut inner.idles);
        survivors.extend(added_during_run);
        inner.idles = survivors;
        count
    }

    #[must_use]
    pub fn timeouts_count(&self) -> usize { self.inner.lock_recover().timeouts.len() }

    #[must_use]
    pub fn idles_count(&self) -> usize { self.inner.lock_recover().idles.len() }

    fn wake(&self) {
        let waker = self.waker.lock_recover().clone();
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl TimedEventsInner {
    fn take_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    fn insert_timeout(&mut self, due: Instant, timeout: Timeout) {
        self.next_sequence += 1;
        let key = TimeoutKey {
            due,
            sequence: self.next_sequence,
        };
        self.timeouts.insert(key, timeout);
    }
}

fn due_after(now: Instant, interval: Duration) -> Instant {
    now.checked_add(interval)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

#[cfg(test)]
mod test_fixtures {
    use super::*;
    use crate::ManualClock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub fn timed_events() -> (ManualClock, Arc<TimedEvents>) {
        let clock = ManualClock::new();
        let timed_events = Arc::new(TimedEvents::with_clock(clock.shared()));
        (clock, timed_events)
    }

    /// Shared call counter.
    #[derive(Debug, Clone, Default)]
    pub struct Counter(pub Arc<AtomicUsize>);

    impl Counter {
        pub fn get(&self) -> usize { self.0.load(Ordering::SeqCst) }

        pub fn bump(&self) { self.0.fetch_add(1, Ordering::SeqCst); }
    }

    /// Records the order in which callbacks ran.
    #[derive(Debug, Clone, Default)]
    pub struct Trace(pub Arc<Mutex<Vec<&'static str>>>);

    impl Trace {
        pub fn push(&self, it: &'static str) { self.0.lock().unwrap().push(it); }

        pub fn get(&self) -> Vec<&'static str> { self.0.lock().unwrap().clone() }
    }

    #[derive(Debug, Default)]
    pub struct CountingWaker(pub Counter);

    impl LoopWaker for CountingWaker {
        fn wake(&self) { self.0.bump(); }
    }
}
