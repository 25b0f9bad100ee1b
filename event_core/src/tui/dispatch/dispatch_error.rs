// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Command, Key, ViewId};

/// Configuration mistakes found while routing input. These are never recovered from
/// silently: a binding that points at a command nobody implements is a bug in how the
/// application was set up.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DispatchError {
    #[error(
        "A key binding was set up for the command {command} ({key}) but that command is not \
         supported by {}",
        describe_target(.target)
    )]
    #[diagnostic(
        code(r3bl_event_core::dispatch::unsupported_command),
        help("Register an implementation with Application::add_command, or remove the binding")
    )]
    UnsupportedCommand {
        command: Command,
        key: Key,
        target: Option<ViewId>,
    },

    #[error("Popover {popover} must be registered before it is shown")]
    #[diagnostic(
        code(r3bl_event_core::dispatch::popover_not_registered),
        help("Call ApplicationPopover::register first")
    )]
    PopoverNotRegistered { popover: ViewId },

    #[error("The key {key} is already bound")]
    #[diagnostic(
        code(r3bl_event_core::dispatch::key_already_bound),
        help("Use KeyBindings::replace_commands to change an existing binding")
    )]
    KeyAlreadyBound { key: Key },
}

fn describe_target(target: &Option<ViewId>) -> String {
    match target {
        Some(view) => view.to_string(),
        None => "the application".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unsupported_command_message() {
        let error = DispatchError::UnsupportedCommand {
            command: Command::Arrange,
            key: Key::function(5).with_ctrl(),
            target: None,
        };
        assert_eq!(
            error.to_string(),
            "A key binding was set up for the command Arrange (Ctrl+F5) but that command is \
             not supported by the application"
        );

        let error = DispatchError::UnsupportedCommand {
            command: Command::Accept,
            key: Key::char('a'),
            target: Some(ViewId(7)),
        };
        assert!(error.to_string().ends_with("not supported by view#7"));
    }
}
