// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Handled, SubscriberList, ViewId};

/// Payload of the cancelable `grabbing_mouse` and `ungrabbing_mouse` notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrabMouseEvent {
    pub view: ViewId,
    pub cancel: bool,
}

impl Handled for GrabMouseEvent {
    fn is_handled(&self) -> bool { self.cancel }
}

/// Payload of the `grabbed_mouse` and `ungrabbed_mouse` notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseGrabChanged {
    pub view: ViewId,
}

/// Owns the single, exclusive mouse grab. While a view holds it, every mouse event goes
/// to that view regardless of what is under the pointer.
#[derive(Debug, Default)]
pub struct MouseGrabHandler {
    grab_view: Option<ViewId>,
    pub grabbing_mouse: SubscriberList<GrabMouseEvent>,
    pub ungrabbing_mouse: SubscriberList<GrabMouseEvent>,
    pub grabbed_mouse: SubscriberList<MouseGrabChanged>,
    pub ungrabbed_mouse: SubscriberList<MouseGrabChanged>,
}

impl MouseGrabHandler {
    #[must_use]
    pub fn grab_view(&self) -> Option<ViewId> { self.grab_view }

    /// Gives `view` the grab unless a `grabbing_mouse` subscriber cancels. Returns
    /// whether `view` holds the grab afterwards.
    pub fn grab_mouse(&mut self, view: ViewId) -> bool {
        let mut event = GrabMouseEvent {
            view,
            cancel: false,
        };
        if self.grabbing_mouse.raise(&mut event) {
            return self.grab_view == Some(view);
        }
        self.grabbed_mouse.notify(&mut MouseGrabChanged { view });
        self.grab_view = Some(view);
        tracing::debug!(message = "mouse grab: grabbed", %view);
        true
    }

    /// Releases the grab unless an `ungrabbing_mouse` subscriber cancels. Returns
    /// whether it was released.
    pub fn ungrab_mouse(&mut self) -> bool {
        let Some(view) = self.grab_view else {
            return false;
        };
        let mut event = GrabMouseEvent {
            view,
            cancel: false,
        };
        if self.ungrabbing_mouse.raise(&mut event) {
            return false;
        }
        self.release(view);
        true
    }

    /// Releases the grab without asking `ungrabbing_mouse`. Used when the holder went
    /// away (eg: it was hidden).
    pub fn force_ungrab_mouse(&mut self) -> bool {
        match self.grab_view {
            Some(view) => {
                self.release(view);
                true
            }
            None => false,
        }
    }

    fn release(&mut self, view: ViewId) {
        self.grab_view = None;
        self.ungrabbed_mouse.notify(&mut MouseGrabChanged { view });
        tracing::debug!(message = "mouse grab: released", %view);
    }
}
