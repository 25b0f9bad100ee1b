// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Characters and prefixes of the VT100 / xterm sequences that the parser and decoders
//! care about. See
//! <https://invisible-island.net/xterm/ctlseqs/ctlseqs.html#h3-Functions-using-CSI-_-ordered-by-the-final-character_s>.

pub const ESC: char = '\x1b';

/// Second character of a Control Sequence Introducer.
pub const CSI_BRACKET: char = '[';

/// Control Sequence Introducer, `ESC [`.
pub const CSI: &str = "\x1b[";

/// Prefix of an SGR (1006) mouse report, `ESC [ <`.
pub const SGR_MOUSE_PREFIX: &str = "\x1b[<";

/// Final characters that end a CSI sequence. `N` and `O` are deliberately absent:
/// nothing this crate parses ends with them.
pub const KNOWN_TERMINATORS: &[char] = &[
    '@', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', //
    'P', 'Q', 'R', 'S', 'T', 'W', 'X', 'Z', //
    '^', '`', '~', //
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', //
    'l', 'm', 'n', //
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

#[must_use]
pub fn is_known_terminator(ch: char) -> bool { KNOWN_TERMINATORS.contains(&ch) }
