// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Dedicated blocking reader thread for a terminal input source.
//!
//! ```text
//! ┌─────────────────────────┐        ┌──────────────────────────────┐
//! │ "input-reader" thread   │        │ MainLoop                     │
//! │                         │        │                              │
//! │ loop {                  │───────▶│ select! {                    │
//! │   reader.read()         │ mpsc   │   input = receiver.recv()    │
//! │   decode utf-8          │bounded │   _ = handle.woken()         │
//! │   blocking_send(chars)  │        │   _ = sleep(next deadline)   │
//! │ }                       │        │ }                            │
//! └─────────────────────────┘        └──────────────────────────────┘
//! ```
//!
//! A blocking read can't be cancelled, so it never happens on the async side. The thread
//! owns the reader and exits on its own when:
//!
//! | Event                 | What is sent                   |
//! | --------------------- | ------------------------------ |
//! | `read()` returns 0    | [`RawInput::Eof`]              |
//! | I/O error (not EINTR) | [`RawInput::Error`]            |
//! | receiver dropped      | nothing, the send just fails   |

use crate::{Continuation, DEBUG_EVENT_CORE_SHOW_MAIN_LOOP, DEFAULT_READ_BUFFER_SIZE, RawInput,
            RawInputSender};
use std::{io::{self, Read},
          thread::JoinHandle};

// cspell:words EINTR

/// Spawns the reader thread for `reader`, which is usually stdin.
///
/// # Errors
///
/// If the OS refuses to create the thread.
pub fn spawn_input_reader_thread(
    reader: impl Read + Send + 'static,
    sender: RawInputSender,
) -> io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("input-reader".into())
        .spawn(move || input_reader_loop(reader, &sender))
}

fn input_reader_loop(mut reader: impl Read, sender: &RawInputSender) {
    let mut buffer = [0u8; DEFAULT_READ_BUFFER_SIZE];
    let mut decoder = Utf8ChunkDecoder::default();
    loop {
        let continuation = read_once(&mut reader, &mut buffer, &mut decoder, sender);
        if continuation == Continuation::Stop {
            break;
        }
    }
    DEBUG_EVENT_CORE_SHOW_MAIN_LOOP.then(|| {
        tracing::debug!(message = "input-reader-thread: exiting");
    });
}

fn read_once(
    reader: &mut impl Read,
    buffer: &mut [u8],
    decoder: &mut Utf8ChunkDecoder,
    sender: &RawInputSender,
) -> Continuation {
    match reader.read(buffer) {
        Ok(0) => {
            let tail = decoder.finish();
            if !tail.is_empty() {
                drop(sender.blocking_send(RawInput::Chars(tail)));
            }
            drop(sender.blocking_send(RawInput::Eof));
            Continuation::Stop
        }
        Ok(n) => {
            DEBUG_EVENT_CORE_SHOW_MAIN_LOOP.then(|| {
                tracing::debug!(message = "input-reader-thread: read bytes", bytes_read = n);
            });
            let text = decoder.decode(&buffer[..n]);
            if text.is_empty() {
                return Continuation::Continue;
            }
            match sender.blocking_send(RawInput::Chars(text)) {
                Ok(()) => Continuation::Continue,
                // Receiver dropped.
                Err(_) => Continuation::Stop,
            }
        }
        Err(error) if error.kind() == io::ErrorKind::Interrupted => Continuation::Continue,
        Err(error) => {
            tracing::warn!(message = "input-reader-thread: read failed", ?error);
            drop(sender.blocking_send(RawInput::Error(error.kind())));
            Continuation::Stop
        }
    }
}

/// Decodes UTF-8 that may be split anywhere across reads. An incomplete code point at
/// the end of a chunk waits for the next one. Invalid bytes become U+FFFD.
#[derive(Debug, Default)]
struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let mut output = String::with_capacity(self.pending.len());
        let mut rest = self.pending.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    output.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(error) => {
                    let (valid, after) = rest.split_at(error.valid_up_to());
                    // Everything up to `valid_up_to` was just checked.
                    output.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match error.error_len() {
                        Some(invalid_len) => {
                            output.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[invalid_len..];
                        }
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }
        self.pending = rest.to_vec();
        output
    }

    /// Whatever is left can never complete.
    fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        self.pending.clear();
        char::REPLACEMENT_CHARACTER.to_string()
    }
}

#[cfg(test)]
mod tests_utf8_decoder {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn code_point_split_across_chunks() {
        let bytes = "a€b".as_bytes();
        let mut decoder = Utf8ChunkDecoder::default();
        assert_eq!(decoder.decode(&bytes[..2]), "a");
        assert_eq!(decoder.decode(&bytes[2..3]), "");
        assert_eq!(decoder.decode(&bytes[3..]), "€b");
    }

    #[test]
    fn invalid_bytes_are_replaced() {
        let mut decoder = Utf8ChunkDecoder::default();
        assert_eq!(decoder.decode(b"a\xffb"), "a\u{FFFD}b");
    }

    #[test]
    fn incomplete_tail_at_eof() {
        let mut decoder = Utf8ChunkDecoder::default();
        assert_eq!(decoder.decode(&"€".as_bytes()[..1]), "");
        assert_eq!(decoder.finish(), "\u{FFFD}");
        assert_eq!(decoder.finish(), "");
    }
}
