// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::application::invoke_application_command;
use crate::{Application, CommandContext, DEBUG_EVENT_CORE_SHOW_DISPATCH, DispatchError, Key,
            KeyEvent, ViewTree};

impl<V: ViewTree + 'static> Application<V> {
    /// Routes a key press. The first stage to handle it ends routing:
    ///
    /// 1. `key_down` subscribers.
    /// 2. Popovers, see [`ApplicationPopover::dispatch_key_down`].
    /// 3. Top-levels, innermost first, stopping after the first modal one.
    /// 4. The application key binding for `key`, if any.
    ///
    /// Returns `Ok(true)` without doing anything if the application isn't initialized.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnsupportedCommand`] if the binding for `key` names a
    /// command that nothing implements.
    ///
    /// [`ApplicationPopover::dispatch_key_down`]: crate::ApplicationPopover::dispatch_key_down
    pub fn raise_key_down(&mut self, key: Key) -> Result<bool, DispatchError> {
        if !self.is_initialized() {
            return Ok(true);
        }
        DEBUG_EVENT_CORE_SHOW_DISPATCH.then(|| {
            tracing::debug!(message = "key down", %key);
        });

        let mut event = KeyEvent::new(key);
        if self.key_down.raise(&mut event) {
            return Ok(true);
        }

        let Self {
            view_tree, popover, ..
        } = self;
        let Some(tree) = view_tree.as_mut() else {
            return Ok(true);
        };

        if popover.dispatch_key_down(tree, &mut event) || event.handled {
            return Ok(true);
        }

        for top in tree.toplevels() {
            if tree.new_key_down(top, &mut event) || event.handled {
                return Ok(true);
            }
            if tree.is_modal(top) {
                break;
            }
        }

        self.invoke_commands_bound_to_key(key)
    }

    /// Routes a key release through `key_up` subscribers and the top-levels only.
    /// Returns `true` if the application isn't initialized.
    pub fn raise_key_up(&mut self, key: Key) -> bool {
        let Self {
            view_tree, key_up, ..
        } = self;
        let Some(tree) = view_tree.as_mut() else {
            return true;
        };

        let mut event = KeyEvent::new(key);
        if key_up.raise(&mut event) {
            return true;
        }

        for top in tree.toplevels() {
            if tree.new_key_up(top, &mut event) || event.handled {
                return true;
            }
            if tree.is_modal(top) {
                break;
            }
        }
        false
    }

    /// Runs the commands bound to `key`, in order, until one reports
    /// [`CommandOutcome::Handled`] or [`CommandOutcome::Cancelled`]. Returns whether one
    /// did. A binding whose target view is disabled is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnsupportedCommand`] on the first command that neither
    /// the target view nor the application implements. Commands before it have already
    /// run.
    ///
    /// [`CommandOutcome::Handled`]: crate::CommandOutcome::Handled
    /// [`CommandOutcome::Cancelled`]: crate::CommandOutcome::Cancelled
    pub fn invoke_commands_bound_to_key(&mut self, key: Key) -> Result<bool, DispatchError> {
        let Self {
            view_tree,
            key_bindings,
            commands,
            ..
        } = self;
        let Some(tree) = view_tree.as_mut() else {
            return Ok(false);
        };
        let Some(binding) = key_bindings.try_get(key) else {
            return Ok(false);
        };

        match binding.target {
            Some(target) => {
                if !tree.is_enabled(target) {
                    return Ok(false);
                }
                for &command in &binding.commands {
                    let context = CommandContext {
                        command,
                        key: Some(key),
                        target: Some(target),
                    };
                    let Some(outcome) = tree.invoke_command(target, command, &context) else {
                        tracing::error!(
                            message = "key binding: command not supported by target",
                            %command, %key, %target
                        );
                        return Err(DispatchError::UnsupportedCommand {
                            command,
                            key,
                            target: Some(target),
                        });
                    };
                    if outcome.stops_dispatch() {
                        return Ok(true);
                    }
                }
            }
            None => {
                for &command in &binding.commands {
                    if invoke_application_command(tree, commands, command, key)?.stops_dispatch()
                    {
                        return Ok(true);
                    }
                }
            }
        }
        Ok(false)
    }
}


#[cfg(test)]
mod tests_targeted_bindings {
    use crate::{Command, DispatchError, Key, ViewTree, test_fixtures::*};
    use pretty_assertions::assert_eq;

    #[test]
    fn runs_on_target_view() {
        let (mut app, _receiver) = initialized_application();
        let tree = app.view_tree_mut().unwrap();
        tree.add_view(CHILD, Some(TOP));
        tree.supported_commands.insert((CHILD, Command::Accept));
        app.key_bindings
            .add(Key::ctrl('o'), &[Command::Accept], Some(CHILD))
            .unwrap();

        assert!(app.raise_key_down(Key::ctrl('o')).unwrap());
        assert_eq!(app.view_tree().unwrap().log_of("invoke_command"), vec![format!(
            "invoke_command {CHILD} Accept"
        )]);
    }

    #[test]
    fn disabled_target_is_skipped() {
        let (mut app, _receiver) = initialized_application();
        let tree = app.view_tree_mut().unwrap();
        tree.add_view(CHILD, Some(TOP));
        tree.set_enabled(CHILD, false);
        app.key_bindings
            .add(Key::ctrl('o'), &[Command::Accept], Some(CHILD))
            .unwrap();

        assert!(!app.raise_key_down(Key::ctrl('o')).unwrap());
        assert!(app.view_tree().unwrap().log_of("invoke_command").is_empty());
    }

    #[test]
    fn target_without_command_is_loud() {
        let (mut app, _receiver) = initialized_application();
        app.view_tree_mut().unwrap().add_view(CHILD, Some(TOP));
        app.key_bindings
            .add(Key::ctrl('o'), &[Command::HotKey], Some(CHILD))
            .unwrap();

        let error = app.raise_key_down(Key::ctrl('o')).unwrap_err();
        assert!(matches!(error, DispatchError::UnsupportedCommand {
            command: Command::HotKey,
            target: Some(CHILD),
            ..
        }));
        assert!(app.view_tree().unwrap().is_enabled(CHILD));
    }
}

#[cfg(test)]
mod tests_key_up {
    use crate::{Key, test_fixtures::*};
    use pretty_assertions::assert_eq;

    #[test]
    fn skips_popovers_and_bindings() {
        let (mut app, _receiver) = initialized_application();
        let tree = app.view_tree_mut().unwrap();
        tree.add_view(POPOVER_A, None);
        app.popover.register(POPOVER_A, None);
        app.show_popover(POPOVER_A).unwrap();

        assert!(!app.raise_key_up(Key::function(5)));
        let tree = app.view_tree().unwrap();
        assert_eq!(tree.log_of("new_key_up"), vec![format!("new_key_up {TOP} F5")]);
        assert!(tree.log_of("request_redraw").is_empty());
    }

    #[test]
    fn subscriber_and_toplevel() {
        let (mut app, _receiver) = initialized_application();
        app.view_tree_mut().unwrap().handles_key_up.insert(TOP);
        assert!(app.raise_key_up(Key::char('a')));

        app.key_up.subscribe(|it| it.handled = true);
        assert!(app.raise_key_up(Key::char('b')));
        assert_eq!(app.view_tree().unwrap().log_of("new_key_up").len(), 1);
    }
}
