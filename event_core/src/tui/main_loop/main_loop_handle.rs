// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DEBUG_EVENT_CORE_SHOW_MAIN_LOOP, LoopWaker, RawInputSender};
use std::sync::{Arc,
                atomic::{AtomicBool, Ordering}};
use tokio::sync::Notify;

/// Cloneable handle to a running [`MainLoop`], safe to use from any thread.
///
/// - [`Self::wakeup`] unblocks the loop if it is waiting for events. A wakeup that
///   arrives while the loop is busy is remembered, so the next wait returns at once.
/// - [`Self::request_stop`] ends the loop after the current iteration.
/// - [`Self::input_sender`] is how producers push [`RawInput`].
///
/// [`MainLoop`]: crate::MainLoop
/// [`RawInput`]: crate::RawInput
#[derive(Debug, Clone)]
pub struct MainLoopHandle {
    inner: Arc<MainLoopHandleInner>,
}

#[derive(Debug)]
struct MainLoopHandleInner {
    stop_requested: AtomicBool,
    wakeup: Notify,
    input_sender: RawInputSender,
}

impl MainLoopHandle {
    #[must_use]
    pub fn new(input_sender: RawInputSender) -> Self {
        Self {
            inner: Arc::new(MainLoopHandleInner {
                stop_requested: AtomicBool::new(false),
                wakeup: Notify::new(),
                input_sender,
            }),
        }
    }

    pub fn wakeup(&self) {
        DEBUG_EVENT_CORE_SHOW_MAIN_LOOP.then(|| {
            tracing::debug!(message = "main loop: wakeup requested");
        });
        self.inner.wakeup.notify_one();
    }

    pub fn request_stop(&self) {
        self.inner.stop_requested.store(true, Ordering::SeqCst);
        self.wakeup();
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool { self.inner.stop_requested.load(Ordering::SeqCst) }

    #[must_use]
    pub fn input_sender(&self) -> RawInputSender { self.inner.input_sender.clone() }

    /// Resolves on the next (or a pending) [`Self::wakeup`].
    pub(crate) async fn woken(&self) { self.inner.wakeup.notified().await; }
}

impl LoopWaker for MainLoopHandle {
    fn wake(&self) { self.wakeup(); }
}
