// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The single consumer loop.
//!
//! Each turn of [`MainLoop::run`] first waits in [`MainLoop::events_pending`] until one
//! of these happens, then runs one [`MainLoop::run_iteration`]:
//!
//! - Raw input arrives on the channel.
//! - Someone calls [`MainLoopHandle::wakeup`] (eg: [`TimedEvents`] got new work).
//! - The earliest deadline passes: a timeout, a held escape that is about to go stale,
//!   or a queued terminal request that the throttle will let through.
//!
//! An iteration never blocks. It drains the channel, dispatches, runs the request
//! scheduler, then timeouts, then idles.
//!
//! [`MainLoopHandle::wakeup`]: crate::MainLoopHandle::wakeup
//! [`TimedEvents`]: crate::TimedEvents

use crate::{Application, ApplicationContext, CommonResult, Continuation,
            DEBUG_EVENT_CORE_SHOW_MAIN_LOOP, DispatchError, EventCoreConfig, InputEvent,
            InputProcessor, MainLoopHandle, OutputSink, RawInput, RawInputReceiver,
            SharedClock, ViewTree};
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum MainLoopError {
    #[error("Every sender of the input channel was dropped")]
    #[diagnostic(
        code(r3bl_event_core::main_loop::input_channel_closed),
        help("The main loop handle keeps a sender alive, so this means it was torn down early")
    )]
    InputChannelClosed,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Dispatch(#[from] DispatchError),
}

/// See the [module docs](self).
#[derive(Debug)]
pub struct MainLoop<V> {
    context: ApplicationContext<V>,
    receiver: RawInputReceiver,
    input_processor: InputProcessor,
}

impl<V: ViewTree + 'static> MainLoop<V> {
    /// Builds the [`ApplicationContext`] and the [`InputProcessor`]. Call
    /// [`Application::init`] (via [`Self::application_mut`]) before running.
    ///
    /// # Errors
    ///
    /// If `config` doesn't validate.
    pub fn new(
        config: EventCoreConfig,
        sink: impl OutputSink + 'static,
        clock: SharedClock,
    ) -> CommonResult<Self> {
        let (context, receiver) = ApplicationContext::new(config, sink, clock)?;
        let input_processor = InputProcessor::new(
            std::sync::Arc::clone(&context.parser),
            config.parser,
            std::sync::Arc::clone(&context.clock),
        );
        Ok(Self {
            context,
            receiver,
            input_processor,
        })
    }

    #[must_use]
    pub fn context(&self) -> &ApplicationContext<V> { &self.context }

    pub fn context_mut(&mut self) -> &mut ApplicationContext<V> { &mut self.context }

    #[must_use]
    pub fn application(&self) -> &Application<V> { &self.context.application }

    pub fn application_mut(&mut self) -> &mut Application<V> { &mut self.context.application }

    #[must_use]
    pub fn handle(&self) -> MainLoopHandle { self.context.handle.clone() }

    /// Runs until [`MainLoopHandle::request_stop`] is called or the input source ends.
    ///
    /// # Errors
    ///
    /// - [`MainLoopError::Dispatch`] if dispatch fails loudly (eg: a key binding for a
    ///   command nobody implements).
    /// - [`MainLoopError::InputChannelClosed`] if the channel goes away.
    ///
    /// [`MainLoopHandle::request_stop`]: crate::MainLoopHandle::request_stop
    pub async fn run(&mut self) -> Result<(), MainLoopError> {
        tracing::info!(message = "main loop: started");
        while !self.context.handle.is_stopped() {
            if let Some(input) = self.events_pending().await? {
                self.process_raw_input(input)?;
            }
            if self.run_iteration()? == Continuation::Stop {
                break;
            }
        }
        tracing::info!(message = "main loop: stopped");
        Ok(())
    }

    /// Waits until there is something to do. Returns the raw input that ended the wait,
    /// if that is what did.
    ///
    /// # Errors
    ///
    /// [`MainLoopError::InputChannelClosed`] if the channel goes away while waiting.
    pub async fn events_pending(&mut self) -> Result<Option<RawInput>, MainLoopError> {
        match self.receiver.try_recv() {
            Ok(input) => return Ok(Some(input)),
            Err(TryRecvError::Disconnected) => return Err(MainLoopError::InputChannelClosed),
            Err(TryRecvError::Empty) => {}
        }

        let check = self.context.timed_events.check_timers();
        if check.wake_now || self.context.handle.is_stopped() {
            return Ok(None);
        }
        let wait = [
            check.wait,
            self.input_processor.time_until_escape_release(),
            self.time_until_schedule(),
        ]
        .into_iter()
        .flatten()
        .min();

        DEBUG_EVENT_CORE_SHOW_MAIN_LOOP.then(|| {
            tracing::debug!(message = "main loop: waiting", ?wait);
        });

        let handle = &self.context.handle;
        tokio::select! {
            // Cancel safe, an unreceived message stays in the channel.
            maybe_input = self.receiver.recv() => match maybe_input {
                Some(input) => Ok(Some(input)),
                None => Err(MainLoopError::InputChannelClosed),
            },
            () = handle.woken() => Ok(None),
            () = sleep_or_forever(wait) => Ok(None),
        }
    }

    /// One non blocking turn of the loop. Returns [`Continuation::Stop`] once a stop was
    /// requested.
    ///
    /// # Errors
    ///
    /// See [`Self::run`].
    pub fn run_iteration(&mut self) -> Result<Continuation, MainLoopError> {
        loop {
            match self.receiver.try_recv() {
                Ok(input) => self.process_raw_input(input)?,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    return Err(MainLoopError::InputChannelClosed);
                }
            }
        }

        for event in self.input_processor.release_stale_escape() {
            self.context.application.dispatch(event)?;
        }

        if let Err(error) = self.context.scheduler.run_schedule() {
            tracing::warn!(message = "main loop: request scheduler failed", %error);
        }

        self.context.timed_events.lock_and_run_timers();
        self.context.timed_events.lock_and_run_idles();

        Ok(if self.context.handle.is_stopped() {
            Continuation::Stop
        } else {
            Continuation::Continue
        })
    }

    fn process_raw_input(&mut self, input: RawInput) -> Result<(), MainLoopError> {
        match input {
            RawInput::Chars(text) => {
                for event in self.input_processor.process_chars(&text) {
                    self.context.application.dispatch(event)?;
                }
            }
            RawInput::Resize(size) => {
                self.context.application.dispatch(InputEvent::Resize(size))?;
            }
            RawInput::Eof => {
                tracing::info!(message = "main loop: input reached end of file, stopping");
                self.flush_held_input()?;
                self.context.handle.request_stop();
            }
            RawInput::Error(kind) => {
                tracing::warn!(message = "main loop: input failed, stopping", ?kind);
                self.flush_held_input()?;
                self.context.handle.request_stop();
            }
        }
        Ok(())
    }

    /// No more input will complete what the parser holds, so it goes out as keys now.
    fn flush_held_input(&mut self) -> Result<(), MainLoopError> {
        for event in self.input_processor.release_held() {
            self.context.application.dispatch(event)?;
        }
        Ok(())
    }

    /// While requests are queued, wake up when the scheduler can next make progress.
    fn time_until_schedule(&self) -> Option<Duration> {
        self.context.scheduler.time_until_next_send()
    }
}

async fn sleep_or_forever(wait: Option<Duration>) {
    match wait {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod test_fixtures {
    use super::*;
    use crate::{ManualClock, VecOutputSink, test_fixtures::*};

    pub struct Fixture {
        pub clock: ManualClock,
        pub sink: VecOutputSink,
        pub main_loop: MainLoop<MockViewTree>,
    }

    impl Fixture {
        pub fn new() -> Self {
            let clock = ManualClock::new();
            let sink = VecOutputSink::default();
            let mut main_loop =
                MainLoop::new(EventCoreConfig::default(), sink.clone(), clock.shared()).unwrap();
            main_loop.application_mut().init(MockViewTree::with_top(TOP));
            Self {
                clock,
                sink,
                main_loop,
            }
        }

        pub async fn send(&self, input: RawInput) {
            self.main_loop
                .handle()
                .input_sender()
                .send(input)
                .await
                .unwrap();
        }

        pub fn tree(&self) -> &MockViewTree { self.main_loop.application().view_tree().unwrap() }
    }
}
