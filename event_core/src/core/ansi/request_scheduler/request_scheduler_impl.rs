// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Sends terminal queries without flooding the terminal or confusing replies.
//!
//! Replies are matched to requests by terminator only, so two requests that share a
//! terminator must not be in flight at the same time. Requests with different
//! terminators proceed in parallel.
//!
//! | Situation                                    | [`send_or_schedule`] |
//! | -------------------------------------------- | -------------------- |
//! | Parser already expects this terminator       | queue, `false`       |
//! | Last send was less than `throttle` ago       | queue, `false`       |
//! | Otherwise                                    | send, `true`         |
//!
//! [`run_schedule`] runs once per main loop iteration. It drops anything older than
//! `stale_timeout` (cancelling the expectation of an outstanding request so a late reply
//! is treated as unknown), then sends at most one queued request.
//!
//! [`send_or_schedule`]: AnsiRequestScheduler::send_or_schedule
//! [`run_schedule`]: AnsiRequestScheduler::run_schedule

use super::{AnsiEscapeSequenceRequest, AnsiEscapeSequenceResponse, OutputSink};
use crate::{AnsiResponse, AnsiResponseParser, Expectation, MutexExt as _, RateLimiter,
            SchedulerConfig, SharedClock};
use std::{collections::{HashMap, VecDeque},
          sync::{Arc, Mutex},
          time::{Duration, Instant}};

const STALE_WAKE_MARGIN: Duration = Duration::from_millis(1);

/// A request that could not be sent right away.
#[derive(Debug, Clone)]
pub struct QueuedRequest {
    pub request: AnsiEscapeSequenceRequest,
    pub enqueued_at: Instant,
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SchedulerError {
    #[error("Failed to send terminal request {request:?}")]
    #[diagnostic(
        code(r3bl_event_core::scheduler::output_sink),
        help("The terminal output is gone or blocked. The expectation was withdrawn.")
    )]
    OutputSink {
        request: String,
        #[source]
        source: std::io::Error,
    },
}

/// See the [module docs](self).
#[derive(Debug)]
pub struct AnsiRequestScheduler<T = ()> {
    parser: Arc<AnsiResponseParser<T>>,
    sink: Mutex<Box<dyn OutputSink>>,
    clock: SharedClock,
    config: SchedulerConfig,
    state: Mutex<SchedulerState>,
}

#[derive(Debug)]
struct SchedulerState {
    queue: VecDeque<QueuedRequest>,
    /// Terminator to send time, for requests that were sent and not answered yet.
    outstanding: HashMap<char, Instant>,
    throttle: RateLimiter,
}

impl<T: Send + 'static> AnsiRequestScheduler<T> {
    pub fn new(
        parser: Arc<AnsiResponseParser<T>>,
        sink: Box<dyn OutputSink>,
        clock: SharedClock,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            parser,
            sink: Mutex::new(sink),
            clock,
            config,
            state: Mutex::new(SchedulerState {
                queue: VecDeque::new(),
                outstanding: HashMap::new(),
                throttle: RateLimiter::new(config.throttle),
            }),
        }
    }

    /// Sends `request` now if nothing blocks it, else queues it. Returns `true` if it
    /// was sent.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::OutputSink`] if the sink failed. Nothing stays
    /// registered for the failed request.
    pub fn send_or_schedule(
        &self,
        request: AnsiEscapeSequenceRequest,
    ) -> Result<bool, SchedulerError> {
        let now = self.clock.now();
        let mut state = self.state.lock_recover();

        if self.parser.is_expecting(request.terminator)
            || !state.throttle.get_status(now).can_run()
        {
            tracing::debug!(
                message = "scheduler: queued request",
                request = ?request.request,
                terminator = ?request.terminator
            );
            state.queue.push_back(QueuedRequest {
                request,
                enqueued_at: now,
            });
            return Ok(false);
        }

        self.send(&mut state, request, now)?;
        Ok(true)
    }

    /// Evicts stale requests, then sends the oldest queued request whose terminator is
    /// free, if the throttle allows. Returns `true` if something was sent.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::OutputSink`] if the sink failed. The request is
    /// dropped.
    pub fn run_schedule(&self) -> Result<bool, SchedulerError> {
        let now = self.clock.now();
        let mut state = self.state.lock_recover();

        self.evict_stale(&mut state, now);

        if !state.throttle.get_status(now).can_run() {
            return Ok(false);
        }

        let next = state
            .queue
            .iter()
            .position(|it| !self.parser.is_expecting(it.request.terminator))
            .and_then(|index| state.queue.remove(index));

        match next {
            Some(queued) => {
                self.send(&mut state, queued.request, now)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Registers the expectation, writes the request and starts the throttle window.
    fn send(
        &self,
        state: &mut SchedulerState,
        request: AnsiEscapeSequenceRequest,
        now: Instant,
    ) -> Result<(), SchedulerError> {
        let terminator = request.terminator;
        let expected_value = request.value.clone();
        let on_response = Arc::clone(&request.on_response);

        // One shot registrations never fail.
        let _unused = self.parser.expect_response(
            Expectation::one_shot(terminator, move |response: &AnsiResponse<'_, T>| {
                let parsed = AnsiEscapeSequenceResponse::parse(
                    response.sequence,
                    terminator,
                    expected_value.as_deref(),
                );
                on_response(&parsed);
            })
            .with_metadata(request.request.clone()),
        );

        let write_result = self.sink.lock_recover().write_request(&request.request);
        if let Err(source) = write_result {
            self.parser.stop_expecting(terminator, false);
            tracing::warn!(
                message = "scheduler: failed to send request",
                request = ?request.request,
                error = %source
            );
            return Err(SchedulerError::OutputSink {
                request: request.request,
                source,
            });
        }

        tracing::debug!(
            message = "scheduler: sent request",
            request = ?request.request,
            terminator = ?terminator
        );
        state.throttle.update_last_run(now);
        state.outstanding.insert(terminator, now);
        Ok(())
    }

    fn evict_stale(&self, state: &mut SchedulerState, now: Instant) {
        let stale_timeout = self.config.stale_timeout;
        let is_stale = |since: Instant| now.saturating_duration_since(since) > stale_timeout;

        state.queue.retain(|it| {
            let keep = !is_stale(it.enqueued_at);
            if !keep {
                tracing::debug!(
                    message = "scheduler: dropped stale queued request",
                    request = ?it.request.request
                );
            }
            keep
        });

        state.outstanding.retain(|terminator, sent_at| {
            if !self.parser.is_expecting(*terminator) {
                // Answered.
                return false;
            }
            if is_stale(*sent_at) {
                self.parser.stop_expecting(*terminator, false);
                tracing::debug!(
                    message = "scheduler: evicted stale outstanding request",
                    terminator = ?terminator
                );
                return false;
            }
            true
        });
    }

    /// How long the main loop may sleep before [`Self::run_schedule`] can make progress.
    /// `None` while nothing is queued.
    ///
    /// - Some queued request has a free terminator: whatever is left of the throttle
    ///   window, zero once it has passed.
    /// - Every queued request waits for a reply: until the earliest stale eviction,
    ///   since an arriving reply wakes the loop by itself.
    #[must_use]
    pub fn time_until_next_send(&self) -> Option<Duration> {
        let now = self.clock.now();
        let state = self.state.lock_recover();
        if state.queue.is_empty() {
            return None;
        }

        let sendable = state
            .queue
            .iter()
            .any(|it| !self.parser.is_expecting(it.request.terminator));
        if sendable {
            return Some(state.throttle.time_until_expired(now));
        }

        // Eviction needs the age to exceed `stale_timeout`, so wake just past it.
        let stale_timeout = self.config.stale_timeout;
        state
            .queue
            .iter()
            .map(|it| it.enqueued_at)
            .chain(state.outstanding.values().copied())
            .map(|since| {
                (stale_timeout + STALE_WAKE_MARGIN)
                    .saturating_sub(now.saturating_duration_since(since))
            })
            .min()
    }

    #[must_use]
    pub fn queued_count(&self) -> usize { self.state.lock_recover().queue.len() }

    /// Sent requests that are neither answered nor evicted yet.
    #[must_use]
    pub fn outstanding_count(&self) -> usize {
        self.state
            .lock_recover()
            .outstanding
            .keys()
            .filter(|terminator| self.parser.is_expecting(**terminator))
            .count()
    }

    #[must_use]
    pub fn parser(&self) -> &Arc<AnsiResponseParser<T>> { &self.parser }

    #[must_use]
    pub fn config(&self) -> SchedulerConfig { self.config }
}
