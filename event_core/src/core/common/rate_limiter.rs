// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::{Duration, Instant};

/// Status of a [`RateLimiter`] at a given instant.
/// - [`RateLimitStatus::NotStarted`]: nothing has run yet, so running now is allowed.
/// - [`RateLimitStatus::Expired`]: the minimum interval since the last run has elapsed.
/// - [`RateLimitStatus::Active`]: the last run was too recent, running now is not
///   allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitStatus {
    NotStarted,
    Expired,
    Active,
}

impl RateLimitStatus {
    #[must_use]
    pub fn can_run(self) -> bool { !matches!(self, RateLimitStatus::Active) }
}

/// Enforces a minimum spacing between runs of an operation. The
/// [`AnsiRequestScheduler`] uses one to allow at most one terminal query send per
/// throttle interval, globally.
///
/// Time is always passed in, so the limiter works with any [`Clock`].
///
/// 1. Create it with [`Self::new`] and the minimum interval.
/// 2. Before running the operation, call [`Self::get_status`]. If
///    [`RateLimitStatus::can_run`] is true, run it and then call
///    [`Self::update_last_run`].
/// 3. To sleep until the next run is allowed, ask [`Self::time_until_expired`].
///
/// [`AnsiRequestScheduler`]: crate::AnsiRequestScheduler
/// [`Clock`]: crate::Clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiter {
    pub last_run: Option<Instant>,
    pub min_interval: Duration,
}

impl RateLimiter {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_run: None,
            min_interval,
        }
    }

    /// An interval of exactly [`Self::min_interval`] counts as elapsed.
    #[must_use]
    pub fn get_status(&self, now: Instant) -> RateLimitStatus {
        match self.last_run {
            None => RateLimitStatus::NotStarted,
            Some(last_run) if now.saturating_duration_since(last_run) >= self.min_interval => {
                RateLimitStatus::Expired
            }
            Some(_) => RateLimitStatus::Active,
        }
    }

    /// How long until the limiter stops being [`RateLimitStatus::Active`]. Zero when
    /// running is already allowed.
    #[must_use]
    pub fn time_until_expired(&self, now: Instant) -> Duration {
        match self.last_run {
            None => Duration::ZERO,
            Some(last_run) => self
                .min_interval
                .saturating_sub(now.saturating_duration_since(last_run)),
        }
    }

    pub fn update_last_run(&mut self, now: Instant) { self.last_run = Some(now); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INTERVAL: Duration = Duration::from_millis(100);

    #[test]
    fn fresh_limiter_is_not_started() {
        let limiter = RateLimiter::new(INTERVAL);
        assert_eq!(limiter.get_status(Instant::now()), RateLimitStatus::NotStarted);
        assert_eq!(limiter.time_until_expired(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn active_within_interval_and_expired_after() {
        let mut limiter = RateLimiter::new(INTERVAL);
        let start = Instant::now();
        limiter.update_last_run(start);

        assert_eq!(limiter.get_status(start), RateLimitStatus::Active);
        assert_eq!(
            limiter.get_status(start + Duration::from_millis(99)),
            RateLimitStatus::Active
        );
        assert_eq!(limiter.get_status(start + INTERVAL), RateLimitStatus::Expired);
        assert_eq!(
            limiter.time_until_expired(start + Duration::from_millis(40)),
            Duration::from_millis(60)
        );
    }
}
