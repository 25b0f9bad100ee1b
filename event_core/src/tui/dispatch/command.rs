// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Key, ViewId};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Something a key binding can ask the application or a view to do.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr,
)]
pub enum Command {
    Quit,
    Suspend,
    NextTabStop,
    PreviousTabStop,
    NextTabGroup,
    PreviousTabGroup,
    Refresh,
    Arrange,
    Accept,
    HotKey,
}

/// Result of running a command. Only [`Self::Handled`] and [`Self::Cancelled`] end
/// routing, the other two let the key continue to the next stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandOutcome {
    /// The command ran but has nothing to say about the key.
    #[default]
    NoResult,
    Handled,
    Cancelled,
    Unhandled,
}

impl CommandOutcome {
    #[must_use]
    pub fn stops_dispatch(self) -> bool {
        matches!(self, CommandOutcome::Handled | CommandOutcome::Cancelled)
    }
}

impl From<bool> for CommandOutcome {
    fn from(handled: bool) -> Self {
        if handled {
            CommandOutcome::Handled
        } else {
            CommandOutcome::Unhandled
        }
    }
}

/// Passed to a command implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandContext {
    pub command: Command,
    /// The key that triggered the command, if a key did.
    pub key: Option<Key>,
    /// The view the binding targets. `None` for application level bindings.
    pub target: Option<ViewId>,
}

/// An application level command. It gets the view tree, not the whole application.
pub type CommandImplementation<V> = Box<dyn FnMut(&mut V, &CommandContext) -> CommandOutcome + Send>;
