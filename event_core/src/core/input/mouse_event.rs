// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{Handled, Pos, ViewId};

bitflags::bitflags! {
    /// What happened, and with which modifiers. Decoded from SGR mouse reports by
    /// [`parse_sgr_mouse`].
    ///
    /// [`parse_sgr_mouse`]: crate::parse_sgr_mouse
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseFlags: u32 {
        const BUTTON1_PRESSED       = 1 << 0;
        const BUTTON1_RELEASED      = 1 << 1;
        const BUTTON2_PRESSED       = 1 << 2;
        const BUTTON2_RELEASED      = 1 << 3;
        const BUTTON3_PRESSED       = 1 << 4;
        const BUTTON3_RELEASED      = 1 << 5;
        const WHEELED_UP            = 1 << 6;
        const WHEELED_DOWN          = 1 << 7;
        const WHEELED_LEFT          = 1 << 8;
        const WHEELED_RIGHT         = 1 << 9;
        const REPORT_MOUSE_POSITION = 1 << 10;
        const BUTTON_SHIFT          = 1 << 11;
        const BUTTON_ALT            = 1 << 12;
        const BUTTON_CTRL           = 1 << 13;

        const ANY_PRESSED = Self::BUTTON1_PRESSED.bits()
            | Self::BUTTON2_PRESSED.bits()
            | Self::BUTTON3_PRESSED.bits();
        const ANY_RELEASED = Self::BUTTON1_RELEASED.bits()
            | Self::BUTTON2_RELEASED.bits()
            | Self::BUTTON3_RELEASED.bits();
        const ANY_WHEEL = Self::WHEELED_UP.bits()
            | Self::WHEELED_DOWN.bits()
            | Self::WHEELED_LEFT.bits()
            | Self::WHEELED_RIGHT.bits();
    }
}

/// A mouse event on its way through dispatch.
///
/// - `screen_position` never changes.
/// - `position` starts out equal to `screen_position` and is rewritten into the local
///   viewport coordinates of whichever view the event is delivered to.
/// - `view` is the deepest view under the pointer, if any, even when a mouse grab sends
///   the event somewhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub screen_position: Pos,
    pub position: Pos,
    pub flags: MouseFlags,
    pub view: Option<ViewId>,
    pub handled: bool,
}

impl MouseEvent {
    #[must_use]
    pub const fn new(screen_position: Pos, flags: MouseFlags) -> Self {
        Self {
            screen_position,
            position: screen_position,
            flags,
            view: None,
            handled: false,
        }
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool { self.flags.intersects(MouseFlags::ANY_PRESSED) }

    #[must_use]
    pub fn is_released(&self) -> bool { self.flags.intersects(MouseFlags::ANY_RELEASED) }

    #[must_use]
    pub fn is_wheel(&self) -> bool { self.flags.intersects(MouseFlags::ANY_WHEEL) }

    /// Copy of this event addressed to `view`, with `position` in its local space.
    #[must_use]
    pub fn relative_to(&self, view: Option<ViewId>, position: Pos) -> Self {
        Self {
            position,
            view,
            handled: false,
            ..*self
        }
    }
}

impl Handled for MouseEvent {
    fn is_handled(&self) -> bool { self.handled }
}
