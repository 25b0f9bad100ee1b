// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{KeyEvent, MouseEvent, Size};

/// A fully classified event, ready for [`Application::dispatch`].
///
/// [`Application::dispatch`]: crate::Application::dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Keyboard(KeyEvent),
    Mouse(MouseEvent),
    Resize(Size),
}

/// Anything that needs to know whether a subscriber or view already consumed the
/// event. [`SubscriberList::raise`] stops at the first subscriber that sets it.
///
/// [`SubscriberList::raise`]: crate::SubscriberList::raise
pub trait Handled {
    fn is_handled(&self) -> bool;
}
