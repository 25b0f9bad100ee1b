// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::Handled;
use std::fmt::{Display, Formatter, Result};

bitflags::bitflags! {
    /// Modifier keys held down with a key press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

impl KeyModifiers {
    /// Decodes the xterm modifier parameter used in sequences like `ESC [ 1 ; 5 A`. The
    /// parameter is one more than a bitmask of shift (1), alt (2) and ctrl (4).
    ///
    /// | param | modifiers        |
    /// | ----- | ---------------- |
    /// | 1     | none             |
    /// | 2     | Shift            |
    /// | 3     | Alt              |
    /// | 4     | Alt+Shift        |
    /// | 5     | Ctrl             |
    /// | 6     | Ctrl+Shift       |
    /// | 7     | Ctrl+Alt         |
    /// | 8     | Ctrl+Alt+Shift   |
    #[must_use]
    pub fn from_xterm_param(param: u8) -> Option<Self> {
        match param {
            1..=8 => {
                let mask = param - 1;
                let mut it = KeyModifiers::empty();
                it.set(KeyModifiers::SHIFT, mask & 0b001 != 0);
                it.set(KeyModifiers::ALT, mask & 0b010 != 0);
                it.set(KeyModifiers::CTRL, mask & 0b100 != 0);
                Some(it)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    /// `F1` is `Function(1)`.
    Function(u8),
}

/// A key and its modifiers. This is what key bindings are keyed on, so two keys are
/// equal only if the code and every modifier match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Key {
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self { Self { code, modifiers } }

    #[must_use]
    pub const fn plain(code: KeyCode) -> Self { Self::new(code, KeyModifiers::empty()) }

    #[must_use]
    pub const fn char(ch: char) -> Self { Self::plain(KeyCode::Char(ch)) }

    #[must_use]
    pub const fn ctrl(ch: char) -> Self { Self::new(KeyCode::Char(ch), KeyModifiers::CTRL) }

    #[must_use]
    pub const fn alt(ch: char) -> Self { Self::new(KeyCode::Char(ch), KeyModifiers::ALT) }

    #[must_use]
    pub const fn function(n: u8) -> Self { Self::plain(KeyCode::Function(n)) }

    #[must_use]
    pub fn with_shift(self) -> Self { Self::new(self.code, self.modifiers | KeyModifiers::SHIFT) }

    #[must_use]
    pub fn with_alt(self) -> Self { Self::new(self.code, self.modifiers | KeyModifiers::ALT) }

    #[must_use]
    pub fn with_ctrl(self) -> Self { Self::new(self.code, self.modifiers | KeyModifiers::CTRL) }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if self.modifiers.contains(KeyModifiers::CTRL) {
            write!(f, "Ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "Alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            write!(f, "Shift+")?;
        }
        match self.code {
            KeyCode::Char(' ') => write!(f, "Space"),
            KeyCode::Char(ch) => write!(f, "{ch}"),
            KeyCode::Function(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Payload of the key down and key up notifications. Any subscriber or view may set
/// `handled` to stop further routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub handled: bool,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(key: Key) -> Self { Self { key, handled: false } }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self { Self::new(key) }
}

impl Handled for KeyEvent {
    fn is_handled(&self) -> bool { self.handled }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(1, KeyModifiers::empty())]
    #[test_case(2, KeyModifiers::SHIFT)]
    #[test_case(3, KeyModifiers::ALT)]
    #[test_case(4, KeyModifiers::ALT.union(KeyModifiers::SHIFT))]
    #[test_case(5, KeyModifiers::CTRL)]
    #[test_case(6, KeyModifiers::CTRL.union(KeyModifiers::SHIFT))]
    #[test_case(7, KeyModifiers::CTRL.union(KeyModifiers::ALT))]
    #[test_case(8, KeyModifiers::all())]
    fn xterm_modifier_param(param: u8, expected: KeyModifiers) {
        assert_eq!(KeyModifiers::from_xterm_param(param), Some(expected));
    }

    #[test]
    fn xterm_modifier_param_out_of_range() {
        assert_eq!(KeyModifiers::from_xterm_param(0), None);
        assert_eq!(KeyModifiers::from_xterm_param(9), None);
    }

    #[test]
    fn display() {
        assert_eq!(Key::ctrl('q').to_string(), "Ctrl+q");
        assert_eq!(Key::plain(KeyCode::Tab).with_shift().to_string(), "Shift+Tab");
        assert_eq!(Key::function(5).with_ctrl().to_string(), "Ctrl+F5");
        assert_eq!(Key::char(' ').to_string(), "Space");
    }
}
