// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Command, DispatchError, InlineVec, Key, KeyCode, ViewId};
use smallvec::smallvec;
use std::collections::HashMap;

/// What a key does once nothing else handled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    /// Run in order.
    pub commands: InlineVec<Command>,
    /// `Some` runs the commands on that view (skipped while it is disabled). `None` runs
    /// the application level implementations.
    pub target: Option<ViewId>,
}

impl KeyBinding {
    #[must_use]
    pub fn new(commands: &[Command], target: Option<ViewId>) -> Self {
        Self {
            commands: commands.iter().copied().collect(),
            target,
        }
    }
}

/// Application scoped key bindings. Matching is exact: the key code and every modifier
/// must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyBindings {
    bindings: HashMap<Key, KeyBinding>,
}

impl KeyBindings {
    /// | Key               | Command            |
    /// | ----------------- | ------------------ |
    /// | Esc               | `Quit`             |
    /// | Tab, Right, Down  | `NextTabStop`      |
    /// | Shift+Tab, Left, Up | `PreviousTabStop` |
    /// | F6                | `NextTabGroup`     |
    /// | Shift+F6          | `PreviousTabGroup` |
    /// | F5                | `Refresh`          |
    /// | Ctrl+z            | `Suspend`          |
    #[must_use]
    pub fn with_defaults() -> Self {
        let defaults = [
            (Key::plain(KeyCode::Esc), Command::Quit),
            (Key::plain(KeyCode::Tab), Command::NextTabStop),
            (Key::plain(KeyCode::Tab).with_shift(), Command::PreviousTabStop),
            (Key::function(6), Command::NextTabGroup),
            (Key::function(6).with_shift(), Command::PreviousTabGroup),
            (Key::plain(KeyCode::Right), Command::NextTabStop),
            (Key::plain(KeyCode::Down), Command::NextTabStop),
            (Key::plain(KeyCode::Left), Command::PreviousTabStop),
            (Key::plain(KeyCode::Up), Command::PreviousTabStop),
            (Key::function(5), Command::Refresh),
            (Key::ctrl('z'), Command::Suspend),
        ];
        Self {
            bindings: defaults
                .into_iter()
                .map(|(key, command)| {
                    (key, KeyBinding {
                        commands: smallvec![command],
                        target: None,
                    })
                })
                .collect(),
        }
    }

    /// # Errors
    ///
    /// Returns [`DispatchError::KeyAlreadyBound`] if `key` already has a binding.
    pub fn add(
        &mut self,
        key: Key,
        commands: &[Command],
        target: Option<ViewId>,
    ) -> Result<(), DispatchError> {
        if self.bindings.contains_key(&key) {
            return Err(DispatchError::KeyAlreadyBound { key });
        }
        self.bindings.insert(key, KeyBinding::new(commands, target));
        Ok(())
    }

    /// Keeps the target. Returns `false` if `key` is not bound.
    pub fn replace_commands(&mut self, key: Key, commands: &[Command]) -> bool {
        match self.bindings.get_mut(&key) {
            Some(binding) => {
                binding.commands = commands.iter().copied().collect();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, key: Key) -> bool { self.bindings.remove(&key).is_some() }

    pub fn clear(&mut self) { self.bindings.clear(); }

    #[must_use]
    pub fn try_get(&self, key: Key) -> Option<&KeyBinding> { self.bindings.get(&key) }

    /// Every key bound to `command`, in no particular order.
    #[must_use]
    pub fn keys_for(&self, command: Command) -> Vec<Key> {
        self.bindings
            .iter()
            .filter(|(_, binding)| binding.commands.contains(&command))
            .map(|(key, _)| *key)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize { self.bindings.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.bindings.is_empty() }
}
