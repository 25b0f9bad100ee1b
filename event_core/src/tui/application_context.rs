// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{AnsiRequestScheduler, AnsiResponseParser, Application, CommonResult,
            EventCoreConfig, LoopWaker, MainLoopHandle, OutputSink, RawInputReceiver,
            SharedClock, TimedEvents, ViewTree, create_input_channel};
use std::sync::Arc;

/// Everything one running application shares, built in one place so the pieces agree on
/// the clock, the parser and the wake primitive.
///
/// ```text
/// ApplicationContext
/// ├── application    Application<V>, single threaded, owned
/// ├── parser         Arc<AnsiResponseParser>, shared with the scheduler
/// ├── scheduler      Arc<AnsiRequestScheduler>
/// ├── timed_events   Arc<TimedEvents>, wakes the loop through `handle`
/// └── handle         MainLoopHandle, cloneable into any thread
/// ```
#[derive(Debug)]
pub struct ApplicationContext<V> {
    pub application: Application<V>,
    pub parser: Arc<AnsiResponseParser>,
    pub scheduler: Arc<AnsiRequestScheduler>,
    pub timed_events: Arc<TimedEvents>,
    pub handle: MainLoopHandle,
    pub config: EventCoreConfig,
    pub clock: SharedClock,
}

impl<V: ViewTree + 'static> ApplicationContext<V> {
    /// Returns the receiving end of the input channel too, which belongs to the
    /// [`MainLoop`].
    ///
    /// # Errors
    ///
    /// If `config` doesn't validate.
    ///
    /// [`MainLoop`]: crate::MainLoop
    pub fn new(
        config: EventCoreConfig,
        sink: impl OutputSink + 'static,
        clock: SharedClock,
    ) -> CommonResult<(Self, RawInputReceiver)> {
        config.validate()?;

        let (sender, receiver) = create_input_channel(config.main_loop.input_channel_capacity);
        let handle = MainLoopHandle::new(sender);

        let parser = Arc::new(AnsiResponseParser::with_clock(Arc::clone(&clock)));
        let scheduler = Arc::new(AnsiRequestScheduler::new(
            Arc::clone(&parser),
            Box::new(sink),
            Arc::clone(&clock),
            config.scheduler,
        ));
        let timed_events = Arc::new(TimedEvents::with_clock(Arc::clone(&clock)));
        timed_events.set_waker(Arc::new(handle.clone()) as Arc<dyn LoopWaker>);

        let application = Application::new(handle.clone(), config.dispatch);

        Ok((
            Self {
                application,
                parser,
                scheduler,
                timed_events,
                handle,
                config,
                clock,
            },
            receiver,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigError, ManualClock, VecOutputSink, test_fixtures::MockViewTree};
    use std::{sync::atomic::{AtomicBool, Ordering},
              time::Duration};

    #[test]
    fn rejects_invalid_config() {
        let mut config = EventCoreConfig::default();
        config.main_loop.input_channel_capacity = 0;
        let result = ApplicationContext::<MockViewTree>::new(
            config,
            VecOutputSink::default(),
            ManualClock::new().shared(),
        );
        let report = result.unwrap_err();
        assert!(matches!(
            report.downcast_ref::<ConfigError>(),
            Some(ConfigError::ZeroChannelCapacity)
        ));
    }

    #[tokio::test]
    async fn timed_events_wake_the_loop() {
        let (context, _receiver) = ApplicationContext::<MockViewTree>::new(
            EventCoreConfig::default(),
            VecOutputSink::default(),
            ManualClock::new().shared(),
        )
        .unwrap();

        let ran = Arc::new(AtomicBool::new(false));
        context.timed_events.add_idle({
            let ran = Arc::clone(&ran);
            move || {
                ran.store(true, Ordering::SeqCst);
                false
            }
        });
        tokio::time::timeout(Duration::from_secs(1), context.handle.woken())
            .await
            .unwrap();
        assert!(!ran.load(Ordering::SeqCst));
        assert_eq!(context.timed_events.lock_and_run_idles(), 1);
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn parser_is_shared_with_scheduler() {
        let (context, _receiver) = ApplicationContext::<MockViewTree>::new(
            EventCoreConfig::default(),
            VecOutputSink::default(),
            ManualClock::new().shared(),
        )
        .unwrap();
        assert!(Arc::ptr_eq(&context.parser, context.scheduler.parser()));
    }
}
