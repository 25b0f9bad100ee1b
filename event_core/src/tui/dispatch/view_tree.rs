// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Command, CommandContext, CommandOutcome, InlineVec, KeyEvent, MouseEvent,
            MouseGrabHandler, NavigationDirection, Pos, Size, TabBehavior, ViewId};

/// The view hierarchy that [`Application`] routes events into.
///
/// Layout, hit testing and drawing live on the other side of this trait. The
/// dispatcher only ever holds [`ViewId`]s and asks questions about them.
///
/// Event methods return `true` when the view handled the event, which ends routing.
///
/// [`Application`]: crate::Application
pub trait ViewTree {
    // Hierarchy.

    /// The current top-level view, if any.
    fn top(&self) -> Option<ViewId>;

    /// Every running top-level, innermost (most recently run) first.
    fn toplevels(&self) -> InlineVec<ViewId>;

    fn is_modal(&self, view: ViewId) -> bool;

    fn superview(&self, view: ViewId) -> Option<ViewId>;

    fn is_visible(&self, view: ViewId) -> bool;

    fn is_enabled(&self, view: ViewId) -> bool;

    fn set_visible(&mut self, view: ViewId, visible: bool);

    /// Views under `screen_position`, outermost first and deepest last. Views that are
    /// transparent to the mouse are already left out.
    fn views_under_location(&self, screen_position: Pos) -> InlineVec<ViewId>;

    /// Translates a screen position into `view`'s viewport. The result may lie outside
    /// the viewport.
    fn screen_to_viewport(&self, view: ViewId, screen_position: Pos) -> Pos;

    /// Whether `view` is `start` or one of its descendants.
    fn is_in_hierarchy(&self, start: ViewId, view: ViewId) -> bool {
        let mut current = Some(view);
        while let Some(it) = current {
            if it == start {
                return true;
            }
            current = self.superview(it);
        }
        false
    }

    // Events.

    fn new_key_down(&mut self, view: ViewId, event: &mut KeyEvent) -> bool;

    fn new_key_up(&mut self, _view: ViewId, _event: &mut KeyEvent) -> bool { false }

    /// A key offered to a popover that isn't active. Only hotkeys should match.
    fn new_hotkey(&mut self, _view: ViewId, _event: &mut KeyEvent) -> bool { false }

    /// `event.position` is already in `view`'s viewport. A view that wants the mouse
    /// exclusively grabs it through `mouse_grab`.
    fn new_mouse_event(
        &mut self,
        view: ViewId,
        event: &mut MouseEvent,
        mouse_grab: &mut MouseGrabHandler,
    ) -> bool;

    /// Returns `true` to cancel, which stops enter notifications for the remaining
    /// views in this dispatch.
    fn new_mouse_enter(&mut self, _view: ViewId) -> bool { false }

    fn new_mouse_leave(&mut self, _view: ViewId) {}

    // Commands.

    /// Runs a command on a view. `None` means the view doesn't support it.
    fn invoke_command(
        &mut self,
        view: ViewId,
        command: Command,
        context: &CommandContext,
    ) -> Option<CommandOutcome>;

    // Application level services used by the default commands.

    /// Moves focus. Returns `true` if focus changed.
    fn advance_focus(&mut self, _direction: NavigationDirection, _behavior: TabBehavior) -> bool {
        false
    }

    fn request_redraw(&mut self) {}

    /// Suspends the process (eg: `SIGTSTP`). Returns `true` if it did.
    fn suspend(&mut self) -> bool { false }

    fn on_resize(&mut self, _size: Size) {}
}
