// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{ESC, Key, KeyCode, KeyEvent};

/// Turns characters released by the [`AnsiResponseParser`] into key presses.
///
/// An `ESC` followed by another character in the same slice is that character with
/// Alt held, since the parser only releases them together when the `ESC` was not the
/// start of a CSI sequence. An `ESC` at the end of the slice, or followed by another
/// `ESC`, is the Esc key.
///
/// [`AnsiResponseParser`]: crate::AnsiResponseParser
#[must_use]
pub fn keys_from_released(chars: &[char]) -> Vec<KeyEvent> {
    let mut keys = Vec::with_capacity(chars.len());
    let mut iter = chars.iter().copied().peekable();
    while let Some(ch) = iter.next() {
        let key = match (ch, iter.peek().copied()) {
            (ESC, Some(next)) if next != ESC => {
                iter.next();
                key_from_char(next).with_alt()
            }
            _ => key_from_char(ch),
        };
        keys.push(KeyEvent::new(key));
    }
    keys
}

/// A single character as typed, without any escape sequence context.
#[must_use]
pub fn key_from_char(ch: char) -> Key {
    match ch {
        ESC => Key::plain(KeyCode::Esc),
        '\r' | '\n' => Key::plain(KeyCode::Enter),
        '\t' => Key::plain(KeyCode::Tab),
        '\x7f' | '\x08' => Key::plain(KeyCode::Backspace),
        '\0' => Key::ctrl(' '),
        '\x01'..='\x1a' => char::from_u32(u32::from(ch) - 1 + u32::from(b'a'))
            .map_or(Key::char(ch), Key::ctrl),
        _ => Key::char(ch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn keys(input: &str) -> Vec<Key> {
        let chars: Vec<char> = input.chars().collect();
        keys_from_released(&chars)
            .into_iter()
            .map(|it| it.key)
            .collect()
    }

    #[test_case('a', Key::char('a'))]
    #[test_case('Z', Key::char('Z'))]
    #[test_case('é', Key::char('é'))]
    #[test_case('\r', Key::plain(KeyCode::Enter))]
    #[test_case('\n', Key::plain(KeyCode::Enter))]
    #[test_case('\t', Key::plain(KeyCode::Tab))]
    #[test_case('\x7f', Key::plain(KeyCode::Backspace))]
    #[test_case('\x08', Key::plain(KeyCode::Backspace))]
    #[test_case('\x01', Key::ctrl('a'))]
    #[test_case('\x11', Key::ctrl('q'))]
    #[test_case('\x1a', Key::ctrl('z'))]
    #[test_case('\0', Key::ctrl(' '))]
    #[test_case(ESC, Key::plain(KeyCode::Esc))]
    fn single_char(ch: char, expected: Key) {
        assert_eq!(key_from_char(ch), expected);
    }

    #[test]
    fn alt_prefix() {
        assert_eq!(keys("\x1bx"), vec![Key::alt('x')]);
        assert_eq!(keys("\x1b\r"), vec![Key::plain(KeyCode::Enter).with_alt()]);
    }

    #[test]
    fn lone_and_double_escape() {
        assert_eq!(keys("\x1b"), vec![Key::plain(KeyCode::Esc)]);
        assert_eq!(keys("\x1b\x1b"), vec![
            Key::plain(KeyCode::Esc),
            Key::plain(KeyCode::Esc)
        ]);
    }

    #[test]
    fn plain_text() {
        assert_eq!(keys("hi!"), vec![
            Key::char('h'),
            Key::char('i'),
            Key::char('!')
        ]);
    }

    #[test]
    fn unclaimed_csi_sequence_becomes_alt_bracket_and_chars() {
        assert_eq!(keys("\x1b[9x"), vec![
            Key::alt('['),
            Key::char('9'),
            Key::char('x')
        ]);
    }
}
