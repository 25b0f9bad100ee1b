// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{ApplicationPopover, Command, CommandContext, CommandImplementation, CommandOutcome,
            DispatchConfig, DispatchError, InlineVec, InputEvent, Key, KeyBindings, KeyEvent,
            MainLoopHandle, MouseEvent, MouseGrabHandler, NavigationDirection, Pos,
            SubscriberList, TabBehavior, ViewId, ViewTree};
use std::{collections::HashMap,
          fmt::{Debug, Formatter}};

/// Routes classified input into the view tree.
///
/// This is the context object that owns all dispatch state: subscriber lists, key
/// bindings, the command table, popovers, the mouse grab and the mouse enter / leave
/// cache. It is created once at startup and handed the view tree with
/// [`Self::init`].
///
/// - Keyboard: [`Self::raise_key_down`], [`Self::raise_key_up`].
/// - Mouse: [`Self::raise_mouse_event`].
/// - Everything, in the order it arrived: [`Self::dispatch`].
pub struct Application<V> {
    pub(super) view_tree: Option<V>,
    pub(super) handle: MainLoopHandle,
    pub key_down: SubscriberList<KeyEvent>,
    pub key_up: SubscriberList<KeyEvent>,
    pub mouse_event: SubscriberList<MouseEvent>,
    pub mouse_grab: MouseGrabHandler,
    pub popover: ApplicationPopover,
    pub key_bindings: KeyBindings,
    pub(super) commands: HashMap<Command, CommandImplementation<V>>,
    pub(super) last_mouse_position: Option<Pos>,
    pub(super) cached_views_under_mouse: InlineVec<ViewId>,
    pub(super) mouse_disabled: bool,
}

impl<V> Debug for Application<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("initialized", &self.view_tree.is_some())
            .field("key_bindings", &self.key_bindings.len())
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .field("popover", &self.popover)
            .field("mouse_grab", &self.mouse_grab.grab_view())
            .field("last_mouse_position", &self.last_mouse_position)
            .field("mouse_disabled", &self.mouse_disabled)
            .finish_non_exhaustive()
    }
}

impl<V: ViewTree + 'static> Application<V> {
    /// Not initialized yet. Comes with the default key bindings and command
    /// implementations.
    #[must_use]
    pub fn new(handle: MainLoopHandle, config: DispatchConfig) -> Self {
        let mut it = Self {
            view_tree: None,
            handle,
            key_down: SubscriberList::default(),
            key_up: SubscriberList::default(),
            mouse_event: SubscriberList::default(),
            mouse_grab: MouseGrabHandler::default(),
            popover: ApplicationPopover::default(),
            key_bindings: KeyBindings::with_defaults(),
            commands: HashMap::new(),
            last_mouse_position: None,
            cached_views_under_mouse: InlineVec::new(),
            mouse_disabled: config.mouse_disabled,
        };
        it.add_default_commands();
        it
    }

    fn add_default_commands(&mut self) {
        let handle = self.handle.clone();
        self.add_command(Command::Quit, move |_, _| {
            handle.request_stop();
            CommandOutcome::Handled
        });
        self.add_command(Command::Suspend, |tree, _| tree.suspend().into());
        for (command, direction, behavior) in [
            (
                Command::NextTabStop,
                NavigationDirection::Forward,
                TabBehavior::TabStop,
            ),
            (
                Command::PreviousTabStop,
                NavigationDirection::Backward,
                TabBehavior::TabStop,
            ),
            (
                Command::NextTabGroup,
                NavigationDirection::Forward,
                TabBehavior::TabGroup,
            ),
            (
                Command::PreviousTabGroup,
                NavigationDirection::Backward,
                TabBehavior::TabGroup,
            ),
        ] {
            self.add_command(command, move |tree, _| {
                tree.advance_focus(direction, behavior).into()
            });
        }
        self.add_command(Command::Refresh, |tree, _| {
            tree.request_redraw();
            CommandOutcome::Handled
        });
    }

    /// Attaches the view tree. Until this is called keyboard routing is a no-op and
    /// mouse events are dropped.
    pub fn init(&mut self, view_tree: V) {
        self.view_tree = Some(view_tree);
        tracing::info!(message = "application: initialized");
    }

    /// Detaches and returns the view tree, and forgets everything that referred to its
    /// views.
    pub fn shutdown(&mut self) -> Option<V> {
        self.mouse_grab.force_ungrab_mouse();
        self.cached_views_under_mouse.clear();
        self.last_mouse_position = None;
        tracing::info!(message = "application: shut down");
        self.view_tree.take()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool { self.view_tree.is_some() }

    #[must_use]
    pub fn view_tree(&self) -> Option<&V> { self.view_tree.as_ref() }

    pub fn view_tree_mut(&mut self) -> Option<&mut V> { self.view_tree.as_mut() }

    #[must_use]
    pub fn handle(&self) -> &MainLoopHandle { &self.handle }

    /// Stops the main loop after the current iteration.
    pub fn request_stop(&self) { self.handle.request_stop(); }

    /// Registers (or replaces) the application level implementation of `command`.
    pub fn add_command(
        &mut self,
        command: Command,
        implementation: impl FnMut(&mut V, &CommandContext) -> CommandOutcome + Send + 'static,
    ) {
        self.commands.insert(command, Box::new(implementation));
    }

    pub fn remove_command(&mut self, command: Command) -> bool {
        self.commands.remove(&command).is_some()
    }

    #[must_use]
    pub fn supports_command(&self, command: Command) -> bool {
        self.commands.contains_key(&command)
    }

    /// Runs the application level implementation of `command` as if `key` triggered it.
    /// Returns [`CommandOutcome::NoResult`] if the application is not initialized.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnsupportedCommand`] if nothing implements `command`.
    pub fn invoke_command(
        &mut self,
        command: Command,
        key: Key,
    ) -> Result<CommandOutcome, DispatchError> {
        let Self {
            view_tree,
            commands,
            ..
        } = self;
        let Some(tree) = view_tree.as_mut() else {
            return Ok(CommandOutcome::NoResult);
        };
        invoke_application_command(tree, commands, command, key)
    }

    pub fn grab_mouse(&mut self, view: ViewId) -> bool { self.mouse_grab.grab_mouse(view) }

    pub fn ungrab_mouse(&mut self) -> bool { self.mouse_grab.ungrab_mouse() }

    /// # Errors
    ///
    /// See [`ApplicationPopover::show`]. Does nothing if not initialized.
    pub fn show_popover(&mut self, popover: ViewId) -> Result<(), DispatchError> {
        match self.view_tree.as_mut() {
            Some(tree) => self.popover.show(tree, popover),
            None => Ok(()),
        }
    }

    pub fn hide_popover(&mut self, popover: ViewId) -> bool {
        match self.view_tree.as_mut() {
            Some(tree) => self.popover.hide(tree, popover),
            None => false,
        }
    }

    /// Screen position of the most recent mouse event seen while initialized.
    #[must_use]
    pub fn last_mouse_position(&self) -> Option<Pos> { self.last_mouse_position }

    /// Views the pointer was over at the last delivered mouse event, outermost first.
    #[must_use]
    pub fn cached_views_under_mouse(&self) -> &[ViewId] { &self.cached_views_under_mouse }

    pub fn set_mouse_disabled(&mut self, disabled: bool) { self.mouse_disabled = disabled; }

    #[must_use]
    pub fn is_mouse_disabled(&self) -> bool { self.mouse_disabled }

    /// Routes one event. Terminals don't report key releases, so a key press is followed
    /// by a key up for the same key.
    ///
    /// # Errors
    ///
    /// Propagates [`DispatchError`] from [`Self::raise_key_down`].
    pub fn dispatch(&mut self, event: InputEvent) -> Result<(), DispatchError> {
        match event {
            InputEvent::Keyboard(key_event) => {
                self.raise_key_down(key_event.key)?;
                self.raise_key_up(key_event.key);
            }
            InputEvent::Mouse(mouse_event) => {
                self.raise_mouse_event(mouse_event);
            }
            InputEvent::Resize(size) => {
                if let Some(tree) = self.view_tree.as_mut() {
                    tree.on_resize(size);
                }
            }
        }
        Ok(())
    }
}

/// Runs an application level command. Free function so callers can hold the view tree
/// and the command table as disjoint borrows.
pub(super) fn invoke_application_command<V>(
    tree: &mut V,
    commands: &mut HashMap<Command, CommandImplementation<V>>,
    command: Command,
    key: Key,
) -> Result<CommandOutcome, DispatchError> {
    let Some(implementation) = commands.get_mut(&command) else {
        tracing::error!(message = "application: unsupported command", %command, %key);
        return Err(DispatchError::UnsupportedCommand {
            command,
            key,
            target: None,
        });
    };
    let context = CommandContext {
        command,
        key: Some(key),
        target: None,
    };
    Ok(implementation(tree, &context))
}
