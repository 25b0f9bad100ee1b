// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Keys that xterm sends as CSI sequences.
//!
//! | Sequence           | Key                                    |
//! | ------------------ | -------------------------------------- |
//! | `ESC [ A` .. `D`   | Up, Down, Right, Left                  |
//! | `ESC [ H`, `F`     | Home, End                              |
//! | `ESC [ 1 ; m A`    | Up with modifiers `m`                  |
//! | `ESC [ n ~`        | editing and function keys, table below |
//! | `ESC [ n ; m ~`    | the same with modifiers `m`            |
//! | `ESC [ Z`          | Shift+Tab                              |
//!
//! | n      | key        |
//! | ------ | ---------- |
//! | 1      | Home       |
//! | 2      | Insert     |
//! | 3      | Delete     |
//! | 4      | End        |
//! | 5      | PageUp     |
//! | 6      | PageDown   |
//! | 11..15 | F1..F5     |
//! | 17..21 | F6..F10    |
//! | 23, 24 | F11, F12   |
//!
//! Modifier parameters follow [`KeyModifiers::from_xterm_param`].

use crate::{CSI, Key, KeyCode, KeyModifiers};

/// Decodes a complete CSI key sequence. Returns `None` if it is not one.
#[must_use]
pub fn parse_csi_key(sequence: &str) -> Option<Key> {
    let body = sequence.strip_prefix(CSI)?;
    let terminator = body.chars().last()?;
    let params = &body[..body.len() - terminator.len_utf8()];

    match terminator {
        '~' => parse_tilde_key(params),
        'Z' if params.is_empty() => Some(Key::plain(KeyCode::Tab).with_shift()),
        'A' | 'B' | 'C' | 'D' | 'H' | 'F' => {
            let code = match terminator {
                'A' => KeyCode::Up,
                'B' => KeyCode::Down,
                'C' => KeyCode::Right,
                'D' => KeyCode::Left,
                'H' => KeyCode::Home,
                _ => KeyCode::End,
            };
            let modifiers = match params {
                "" => KeyModifiers::empty(),
                _ => {
                    let (first, modifier) = params.split_once(';')?;
                    if first != "1" {
                        return None;
                    }
                    KeyModifiers::from_xterm_param(modifier.parse().ok()?)?
                }
            };
            Some(Key::new(code, modifiers))
        }
        _ => None,
    }
}

fn parse_tilde_key(params: &str) -> Option<Key> {
    let (number, modifiers) = match params.split_once(';') {
        Some((number, modifier)) => (
            number,
            KeyModifiers::from_xterm_param(modifier.parse().ok()?)?,
        ),
        None => (params, KeyModifiers::empty()),
    };

    let code = match number.parse::<u8>().ok()? {
        1 => KeyCode::Home,
        2 => KeyCode::Insert,
        3 => KeyCode::Delete,
        4 => KeyCode::End,
        5 => KeyCode::PageUp,
        6 => KeyCode::PageDown,
        n @ 11..=15 => KeyCode::Function(n - 10),
        n @ 17..=21 => KeyCode::Function(n - 11),
        n @ 23..=24 => KeyCode::Function(n - 12),
        _ => return None,
    };
    Some(Key::new(code, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("\x1b[A", Key::plain(KeyCode::Up))]
    #[test_case("\x1b[B", Key::plain(KeyCode::Down))]
    #[test_case("\x1b[C", Key::plain(KeyCode::Right))]
    #[test_case("\x1b[D", Key::plain(KeyCode::Left))]
    #[test_case("\x1b[H", Key::plain(KeyCode::Home))]
    #[test_case("\x1b[F", Key::plain(KeyCode::End))]
    #[test_case("\x1b[1;5A", Key::plain(KeyCode::Up).with_ctrl())]
    #[test_case("\x1b[1;2D", Key::plain(KeyCode::Left).with_shift())]
    #[test_case("\x1b[1;8C", Key::new(KeyCode::Right, KeyModifiers::all()))]
    #[test_case("\x1b[Z", Key::plain(KeyCode::Tab).with_shift())]
    fn cursor_keys(sequence: &str, expected: Key) {
        assert_eq!(parse_csi_key(sequence), Some(expected));
    }

    #[test_case("\x1b[1~", KeyCode::Home)]
    #[test_case("\x1b[2~", KeyCode::Insert)]
    #[test_case("\x1b[3~", KeyCode::Delete)]
    #[test_case("\x1b[4~", KeyCode::End)]
    #[test_case("\x1b[5~", KeyCode::PageUp)]
    #[test_case("\x1b[6~", KeyCode::PageDown)]
    #[test_case("\x1b[11~", KeyCode::Function(1))]
    #[test_case("\x1b[15~", KeyCode::Function(5))]
    #[test_case("\x1b[17~", KeyCode::Function(6))]
    #[test_case("\x1b[21~", KeyCode::Function(10))]
    #[test_case("\x1b[23~", KeyCode::Function(11))]
    #[test_case("\x1b[24~", KeyCode::Function(12))]
    fn tilde_keys(sequence: &str, expected: KeyCode) {
        assert_eq!(parse_csi_key(sequence), Some(Key::plain(expected)));
    }

    #[test]
    fn tilde_key_with_modifiers() {
        assert_eq!(
            parse_csi_key("\x1b[17;2~"),
            Some(Key::function(6).with_shift())
        );
        assert_eq!(
            parse_csi_key("\x1b[3;7~"),
            Some(Key::plain(KeyCode::Delete).with_ctrl().with_alt())
        );
    }

    #[test_case("\x1b[16~"; "gap in function keys")]
    #[test_case("\x1b[25~"; "past f12")]
    #[test_case("\x1b[3;9~"; "bad modifier")]
    #[test_case("\x1b[2;5A"; "cursor key first param not one")]
    #[test_case("\x1b[5A"; "cursor key without modifier")]
    #[test_case("\x1b[1Z"; "back tab with params")]
    #[test_case("\x1b[?62c"; "device attributes reply")]
    #[test_case("\x1b[<0;1;1M"; "mouse report")]
    #[test_case("A"; "not csi")]
    fn rejects(sequence: &str) {
        assert_eq!(parse_csi_key(sequence), None);
    }
}
