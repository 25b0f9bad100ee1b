// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// State of the [`AnsiResponseParser`].
///
/// ```text
///            ESC                    [
/// Normal ──────────▶ ExpectingBracket ──────────▶ InResponse ──┐ non terminator
///   ▲                 │  ▲   │ ESC                   │    ▲     │ (keep holding)
///   │  anything else  │  └───┘ (release old ESC,     │    └─────┘
///   └─────────────────┘        hold the new one)     │
///   ▲  (release ESC + char)                          │ terminator
///   └────────────────────────────────────────────────┘ (match or unknown)
/// ```
///
/// The held buffer is non empty exactly when the state is not [`Self::Normal`].
///
/// [`AnsiResponseParser`]: crate::AnsiResponseParser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum_macros::Display)]
pub enum AnsiResponseParserState {
    /// Characters pass straight through.
    #[default]
    Normal,
    /// An `ESC` is held. The next character decides if it starts a sequence.
    ExpectingBracket,
    /// `ESC [` and possibly parameters are held, waiting for a terminator.
    InResponse,
}
