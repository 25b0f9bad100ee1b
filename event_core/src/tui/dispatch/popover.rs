// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Command, CommandContext, DispatchError, KeyEvent, ViewId, ViewTree};

/// A registered popover, and the top-level it belongs to. A popover with no top-level
/// takes hotkeys whichever top-level is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopoverRegistration {
    pub popover: ViewId,
    pub toplevel: Option<ViewId>,
}

/// Registry of popovers and which one, if any, is showing.
///
/// ```text
/// key down ──▶ active popover (if visible): gets every key
///                  │ declined
///                  ▼
///              other popovers of the current top-level, in registration order:
///              hotkeys only, first to handle wins
/// ```
#[derive(Debug, Default)]
pub struct ApplicationPopover {
    popovers: Vec<PopoverRegistration>,
    active: Option<ViewId>,
}

impl ApplicationPopover {
    /// Returns `false` if it was already registered.
    pub fn register(&mut self, popover: ViewId, toplevel: Option<ViewId>) -> bool {
        if self.is_registered(popover) {
            return false;
        }
        self.popovers.push(PopoverRegistration { popover, toplevel });
        true
    }

    pub fn deregister(&mut self, popover: ViewId) -> bool {
        if !self.is_registered(popover) {
            return false;
        }
        if self.active == Some(popover) {
            self.active = None;
        }
        self.popovers.retain(|it| it.popover != popover);
        true
    }

    #[must_use]
    pub fn is_registered(&self, popover: ViewId) -> bool {
        self.popovers.iter().any(|it| it.popover == popover)
    }

    #[must_use]
    pub fn active(&self) -> Option<ViewId> { self.active }

    #[must_use]
    pub fn popovers(&self) -> &[PopoverRegistration] { &self.popovers }

    /// Hides the popover that is showing, if any, then shows `popover`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::PopoverNotRegistered`] if `popover` was never
    /// registered. Nothing changes in that case.
    pub fn show(&mut self, tree: &mut impl ViewTree, popover: ViewId) -> Result<(), DispatchError> {
        if !self.is_registered(popover) {
            return Err(DispatchError::PopoverNotRegistered { popover });
        }
        if let Some(previous) = self.active.take() {
            tree.set_visible(previous, false);
        }
        self.active = Some(popover);
        tree.set_visible(popover, true);
        tracing::debug!(message = "popover: shown", %popover);
        Ok(())
    }

    /// Hides `popover` if it is the active one. Returns whether it was.
    pub fn hide(&mut self, tree: &mut impl ViewTree, popover: ViewId) -> bool {
        if self.active != Some(popover) {
            return false;
        }
        self.active = None;
        tree.set_visible(popover, false);
        tree.request_redraw();
        true
    }

    /// Asks `popover` to close itself with [`Command::Quit`]. If it doesn't support the
    /// command, or handled it but is still visible, it is hidden directly.
    pub fn hide_with_quit_command(&mut self, tree: &mut impl ViewTree, popover: ViewId) {
        if tree.is_visible(popover) {
            let context = CommandContext {
                command: Command::Quit,
                key: None,
                target: Some(popover),
            };
            let hide = match tree.invoke_command(popover, Command::Quit, &context) {
                None => true,
                Some(outcome) => outcome.stops_dispatch() && tree.is_visible(popover),
            };
            if hide {
                tree.set_visible(popover, false);
            }
        }
        if self.active == Some(popover) && !tree.is_visible(popover) {
            self.active = None;
        }
        tracing::debug!(message = "popover: hidden with quit", %popover);
    }

    /// See the [type docs](Self).
    pub fn dispatch_key_down(&self, tree: &mut impl ViewTree, event: &mut KeyEvent) -> bool {
        if let Some(active) = self.active
            .filter(|it| tree.is_visible(*it))
        {
            if tree.new_key_down(active, event) {
                return true;
            }
        }

        let top = tree.top();
        for registration in &self.popovers {
            if Some(registration.popover) == self.active
                || registration.toplevel.is_some_and(|it| Some(it) != top)
            {
                continue;
            }
            if tree.new_hotkey(registration.popover, event) {
                return true;
            }
        }
        false
    }
}
