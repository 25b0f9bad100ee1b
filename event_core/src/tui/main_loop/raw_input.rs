// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::Size;

/// What the background producers push onto the input channel. Nothing here is
/// classified yet, that happens on the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    /// Decoded text, in arrival order. Chunk boundaries carry no meaning.
    Chars(String),
    /// The terminal was resized (eg: `SIGWINCH`).
    Resize(Size),
    /// The input source reached end of file.
    Eof,
    /// The input source failed and its reader has exited.
    Error(std::io::ErrorKind),
}

/// Held by every producer (reader threads, signal handlers, tests).
pub type RawInputSender = tokio::sync::mpsc::Sender<RawInput>;

/// Held by the [`MainLoop`] only.
///
/// [`MainLoop`]: crate::MainLoop
pub type RawInputReceiver = tokio::sync::mpsc::Receiver<RawInput>;

/// Bounded, so a stalled main loop applies back pressure to the readers instead of
/// growing without limit.
///
/// # Panics
///
/// If `capacity` is zero. [`EventCoreConfig::validate`] rejects that.
///
/// [`EventCoreConfig::validate`]: crate::EventCoreConfig::validate
#[must_use]
pub fn create_input_channel(capacity: usize) -> (RawInputSender, RawInputReceiver) {
    tokio::sync::mpsc::channel(capacity)
}
