// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Incremental classifier for the terminal input stream.
//!
//! The terminal sends keystrokes, mouse reports and responses to our own queries down
//! the same stream, all starting with `ESC`. The [`AnsiResponseParser`] looks at one
//! character at a time and decides, without ever blocking, whether it is ordinary input
//! (released immediately) or possibly part of an escape sequence (held). Once a held
//! sequence completes it is either consumed by a matching [`Expectation`], offered to
//! the [`UnknownResponseHandler`], or released verbatim.
//!
//! # Chunk boundaries
//!
//! Input may arrive one character at a time or all at once. Every decision is made per
//! character, and callbacks fire on the character that completes a sequence, so the
//! released output and the callback payloads don't depend on how the stream was split.
//!
//! # Lone `ESC`
//!
//! A user pressing `Esc` produces an `ESC` with nothing after it. The parser can't tell
//! that apart from the first byte of a slow sequence, so it keeps holding it. The owner
//! calls [`AnsiResponseParser::release`] once [`state_changed_at`] is older than the
//! escape timeout. See [`InputProcessor`].
//!
//! # Locking
//!
//! State lives behind one [`Mutex`]. Callbacks and the unknown response handler are
//! always invoked after the lock is released, so they may call back into the parser
//! (eg: to register the next expectation).
//!
//! [`state_changed_at`]: AnsiResponseParser::state_changed_at
//! [`InputProcessor`]: crate::InputProcessor

use super::{AnsiResponse, AnsiResponseParserState, Expectation, ExpectationError,
            ExpectationMetadata, ResponseCallback, UnknownResponseHandler};
use crate::{CSI_BRACKET, Clock, DEBUG_EVENT_CORE_SHOW_PARSER, ESC, MutexExt as _,
            SharedClock, SystemClock, is_known_terminator};
use std::{collections::VecDeque,
          fmt::{Debug, Formatter},
          sync::{Arc, Mutex},
          time::Instant};

/// See the [module docs](self).
///
/// `T` is an opaque tag carried alongside each character (eg: the original platform
/// event it was decoded from). Use `()` and [`Self::process_str`] when there is none.
pub struct AnsiResponseParser<T = ()> {
    inner: Mutex<ParserInner<T>>,
    clock: SharedClock,
}

struct ParserInner<T> {
    state: AnsiResponseParserState,
    state_changed_at: Instant,
    held: Vec<(char, T)>,
    /// One shot expectations, oldest first.
    expected: VecDeque<Expectation<T>>,
    persistent: Vec<Expectation<T>>,
    unknown_response_handler: Option<UnknownResponseHandler<T>>,
}

/// What has to happen, outside the lock, after a character was consumed.
enum StepOutcome<T> {
    Pending,
    Matched {
        callback: ResponseCallback<T>,
        metadata: Option<ExpectationMetadata>,
        held: Vec<(char, T)>,
    },
    Unknown {
        handler: Option<UnknownResponseHandler<T>>,
        held: Vec<(char, T)>,
    },
}

impl<T> Default for AnsiResponseParser<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Debug for AnsiResponseParser<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock_recover();
        f.debug_struct("AnsiResponseParser")
            .field("state", &inner.state)
            .field("held_len", &inner.held.len())
            .field("expected", &inner.expected)
            .field("persistent", &inner.persistent)
            .finish_non_exhaustive()
    }
}

impl<T> AnsiResponseParser<T> {
    #[must_use]
    pub fn new() -> Self { Self::with_clock(SystemClock::shared()) }

    #[must_use]
    pub fn with_clock(clock: SharedClock) -> Self {
        let now = clock.now();
        Self {
            inner: Mutex::new(ParserInner {
                state: AnsiResponseParserState::Normal,
                state_changed_at: now,
                held: Vec::new(),
                expected: VecDeque::new(),
                persistent: Vec::new(),
                unknown_response_handler: None,
            }),
            clock,
        }
    }

    /// Consumes `input` in order and returns everything that is not part of an escape
    /// sequence, plus the verbatim text of any completed sequence that nobody claimed.
    /// Incomplete sequences stay held for the next call.
    pub fn process_input(&self, input: impl IntoIterator<Item = (char, T)>) -> Vec<(char, T)> {
        let mut output = Vec::new();
        for (ch, tag) in input {
            let outcome =
                self.inner
                    .lock_recover()
                    .advance(ch, tag, &mut output, self.clock.as_ref());
            Self::finish(outcome, &mut output);
        }
        output
    }

    /// Invokes the callback or handler for a completed sequence. Never called with the
    /// lock held.
    fn finish(outcome: StepOutcome<T>, output: &mut Vec<(char, T)>) {
        match outcome {
            StepOutcome::Pending => {}
            StepOutcome::Matched {
                callback,
                metadata,
                held,
            } => {
                let sequence = held_to_string(&held);
                callback(&AnsiResponse {
                    sequence: &sequence,
                    held: &held,
                    metadata: metadata.as_ref(),
                });
            }
            StepOutcome::Unknown { handler, held } => {
                let sequence = held_to_string(&held);
                let swallowed = handler.is_some_and(|handler| {
                    handler(&AnsiResponse {
                        sequence: &sequence,
                        held: &held,
                        metadata: None,
                    })
                });
                DEBUG_EVENT_CORE_SHOW_PARSER.then(|| {
                    tracing::debug!(
                        message = "parser: unknown response",
                        sequence = ?sequence,
                        swallowed
                    );
                });
                if !swallowed {
                    output.extend(held);
                }
            }
        }
    }

    /// Flushes whatever is held and resets to [`AnsiResponseParserState::Normal`].
    pub fn release(&self) -> Vec<(char, T)> {
        let mut inner = self.inner.lock_recover();
        let now = self.clock.now();
        inner.set_state(AnsiResponseParserState::Normal, now);
        std::mem::take(&mut inner.held)
    }

    /// Registers an expectation. One shot registrations for a terminator that is
    /// already expected queue up behind it: each completed sequence goes to the oldest.
    ///
    /// # Errors
    ///
    /// Returns [`ExpectationError::DuplicatePersistent`] if a persistent expectation for
    /// the same terminator already exists.
    pub fn expect_response(&self, expectation: Expectation<T>) -> Result<(), ExpectationError> {
        let mut inner = self.inner.lock_recover();
        if expectation.persistent {
            if inner
                .persistent
                .iter()
                .any(|it| it.terminator == expectation.terminator)
            {
                return Err(ExpectationError::DuplicatePersistent {
                    terminator: expectation.terminator,
                });
            }
            inner.persistent.push(expectation);
        } else {
            inner.expected.push_back(expectation);
        }
        Ok(())
    }

    /// Whether a one shot expectation for `terminator` is outstanding. Persistent
    /// expectations are not counted, see [`Self::is_expecting_persistent`].
    #[must_use]
    pub fn is_expecting(&self, terminator: char) -> bool {
        self.inner
            .lock_recover()
            .expected
            .iter()
            .any(|it| it.terminator == terminator)
    }

    #[must_use]
    pub fn is_expecting_persistent(&self, terminator: char) -> bool {
        self.inner
            .lock_recover()
            .persistent
            .iter()
            .any(|it| it.terminator == terminator)
    }

    /// Number of one shot expectations queued for `terminator`.
    #[must_use]
    pub fn expecting_count(&self, terminator: char) -> usize {
        self.inner
            .lock_recover()
            .expected
            .iter()
            .filter(|it| it.terminator == terminator)
            .count()
    }

    /// Cancels the oldest one shot expectation for `terminator` (all of them when
    /// `also_cancel_queued_duplicates` is set) without invoking any callback. A response
    /// that arrives afterwards is unknown. Returns how many were removed.
    pub fn stop_expecting(&self, terminator: char, also_cancel_queued_duplicates: bool) -> usize {
        let mut inner = self.inner.lock_recover();
        if also_cancel_queued_duplicates {
            let before = inner.expected.len();
            inner.expected.retain(|it| it.terminator != terminator);
            before - inner.expected.len()
        } else {
            match inner.expected.iter().position(|it| it.terminator == terminator) {
                Some(index) => usize::from(inner.expected.remove(index).is_some()),
                None => 0,
            }
        }
    }

    pub fn stop_expecting_persistent(&self, terminator: char) -> bool {
        let mut inner = self.inner.lock_recover();
        let before = inner.persistent.len();
        inner.persistent.retain(|it| it.terminator != terminator);
        before != inner.persistent.len()
    }

    /// Replaces the handler for completed sequences that no expectation claimed.
    pub fn set_unknown_response_handler(
        &self,
        handler: impl Fn(&AnsiResponse<'_, T>) -> bool + Send + Sync + 'static,
    ) {
        self.inner.lock_recover().unknown_response_handler = Some(Arc::new(handler));
    }

    pub fn clear_unknown_response_handler(&self) {
        self.inner.lock_recover().unknown_response_handler = None;
    }

    #[must_use]
    pub fn state(&self) -> AnsiResponseParserState { self.inner.lock_recover().state }

    /// When [`Self::state`] last changed.
    #[must_use]
    pub fn state_changed_at(&self) -> Instant { self.inner.lock_recover().state_changed_at }

    #[must_use]
    pub fn held_len(&self) -> usize { self.inner.lock_recover().held.len() }
}

impl AnsiResponseParser<()> {
    /// [`Self::process_input`] for untagged text.
    pub fn process_str(&self, input: &str) -> String {
        self.process_input(input.chars().map(|ch| (ch, ())))
            .into_iter()
            .map(|(ch, ())| ch)
            .collect()
    }

    /// [`Self::release`] for untagged text.
    pub fn release_str(&self) -> String {
        self.release().into_iter().map(|(ch, ())| ch).collect()
    }
}

impl<T> ParserInner<T> {
    fn set_state(&mut self, state: AnsiResponseParserState, now: Instant) {
        DEBUG_EVENT_CORE_SHOW_PARSER.then(|| {
            tracing::debug!(message = "parser: state", from = %self.state, to = %state);
        });
        self.state = state;
        self.state_changed_at = now;
    }

    fn advance(
        &mut self,
        ch: char,
        tag: T,
        output: &mut Vec<(char, T)>,
        clock: &dyn Clock,
    ) -> StepOutcome<T> {
        match self.state {
            AnsiResponseParserState::Normal => {
                if ch == ESC {
                    self.held.push((ch, tag));
                    self.set_state(AnsiResponseParserState::ExpectingBracket, clock.now());
                } else {
                    output.push((ch, tag));
                }
                StepOutcome::Pending
            }

            AnsiResponseParserState::ExpectingBracket => {
                if ch == ESC {
                    // The held ESC was a key press of its own. Hold the new one instead.
                    output.append(&mut self.held);
                    self.held.push((ch, tag));
                    self.set_state(AnsiResponseParserState::ExpectingBracket, clock.now());
                } else if ch == CSI_BRACKET {
                    self.held.push((ch, tag));
                    self.set_state(AnsiResponseParserState::InResponse, clock.now());
                } else {
                    output.append(&mut self.held);
                    output.push((ch, tag));
                    self.set_state(AnsiResponseParserState::Normal, clock.now());
                }
                StepOutcome::Pending
            }

            AnsiResponseParserState::InResponse => {
                self.held.push((ch, tag));
                self.complete_sequence(ch, clock)
            }
        }
    }

    /// Called with the latest character already held. One shot expectations win over
    /// persistent ones, and a registered terminator is valid even if it is not a known
    /// CSI final character.
    fn complete_sequence(&mut self, ch: char, clock: &dyn Clock) -> StepOutcome<T> {
        let one_shot = self
            .expected
            .iter()
            .position(|it| it.terminator == ch)
            .and_then(|index| self.expected.remove(index));

        let matched = match one_shot {
            Some(expectation) => Some((expectation.callback, expectation.metadata)),
            None => self
                .persistent
                .iter()
                .find(|it| it.terminator == ch)
                .map(|it| (Arc::clone(&it.callback), it.metadata.clone())),
        };

        if let Some((callback, metadata)) = matched {
            self.set_state(AnsiResponseParserState::Normal, clock.now());
            return StepOutcome::Matched {
                callback,
                metadata,
                held: std::mem::take(&mut self.held),
            };
        }

        if is_known_terminator(ch) {
            self.set_state(AnsiResponseParserState::Normal, clock.now());
            return StepOutcome::Unknown {
                handler: self.unknown_response_handler.clone(),
                held: std::mem::take(&mut self.held),
            };
        }

        StepOutcome::Pending
    }
}

fn held_to_string<T>(held: &[(char, T)]) -> String { held.iter().map(|(ch, _)| *ch).collect() }


#[cfg(test)]
mod tests_state_machine {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ordinary_text_passes_through() {
        let parser = AnsiResponseParser::new();
        assert_eq!(parser.process_str("hello world"), "hello world");
        assert_eq!(parser.state(), AnsiResponseParserState::Normal);
        assert_eq!(parser.held_len(), 0);
    }

    #[test]
    fn lone_esc_is_held() {
        let parser = AnsiResponseParser::new();
        assert_eq!(parser.process_str("a\x1b"), "a");
        assert_eq!(parser.state(), AnsiResponseParserState::ExpectingBracket);
        assert_eq!(parser.held_len(), 1);
    }

    #[test]
    fn esc_then_non_bracket_releases_both() {
        let parser = AnsiResponseParser::new();
        assert_eq!(parser.process_str("\x1bx"), "\x1bx");
        assert_eq!(parser.state(), AnsiResponseParserState::Normal);
        assert_eq!(parser.held_len(), 0);
    }

    #[test]
    fn esc_esc_releases_the_first_and_holds_the_second() {
        let parser = AnsiResponseParser::new();
        assert_eq!(parser.process_str("\x1b\x1b"), "\x1b");
        assert_eq!(parser.state(), AnsiResponseParserState::ExpectingBracket);
        assert_eq!(parser.held_len(), 1);
    }

    #[test]
    fn csi_prefix_is_held_until_terminator() {
        let parser = AnsiResponseParser::new();
        assert_eq!(parser.process_str("\x1b[<0;10;20"), "");
        assert_eq!(parser.state(), AnsiResponseParserState::InResponse);
        assert_eq!(parser.held_len(), 10);
    }

    #[test]
    fn state_changed_at_tracks_transitions() {
        let clock = crate::ManualClock::new();
        let parser = AnsiResponseParser::with_clock(clock.shared());
        let start = clock.now();

        clock.advance(std::time::Duration::from_millis(10));
        parser.process_str("\x1b");
        assert_eq!(
            parser.state_changed_at(),
            start + std::time::Duration::from_millis(10)
        );

        clock.advance(std::time::Duration::from_millis(10));
        parser.process_str("[");
        assert_eq!(
            parser.state_changed_at(),
            start + std::time::Duration::from_millis(20)
        );
    }

    #[test]
    fn release_flushes_and_resets() {
        let parser = AnsiResponseParser::new();
        parser.process_str("\x1b[1;5");
        assert_eq!(parser.release_str(), "\x1b[1;5");
        assert_eq!(parser.state(), AnsiResponseParserState::Normal);
        assert_eq!(parser.held_len(), 0);
        assert_eq!(parser.release_str(), "");
    }

    #[test]
    fn partial_sequence_is_never_dropped() {
        let parser = AnsiResponseParser::new();
        assert_eq!(parser.process_str("ab\x1b[12"), "ab");
        assert_eq!(parser.process_str("3"), "");
        // `;` is not a terminator, `~` is.
        assert_eq!(parser.process_str(";2~z"), "\x1b[123;2~z");
    }
}

#[cfg(test)]
mod tests_expectations {
    use super::{test_fixtures::*, *};
    use pretty_assertions::assert_eq;

    #[test]
    fn one_shot_consumes_and_is_removed() {
        let parser = AnsiResponseParser::new();
        let recorder = Recorder::default();
        parser.expect_response(recorder.one_shot('c')).unwrap();
        assert!(parser.is_expecting('c'));

        assert_eq!(parser.process_str("\x1b[?1;2c"), "");
        assert_eq!(recorder.seen(), vec!["\x1b[?1;2c".to_string()]);
        assert!(!parser.is_expecting('c'));

        // Same sequence again is now unknown, so it is released.
        assert_eq!(parser.process_str("\x1b[?1;2c"), "\x1b[?1;2c");
        assert_eq!(recorder.seen().len(), 1);
    }

    #[test]
    fn persistent_fires_every_time() {
        let parser = AnsiResponseParser::new();
        let recorder = Recorder::default();
        parser.expect_response(recorder.persistent('M')).unwrap();

        let input = "\x1b[<0;1;1M\x1b[<0;2;2M\x1b[<0;3;3M";
        assert_eq!(parser.process_str(input), "");
        assert_eq!(recorder.seen().len(), 3);
        assert!(parser.is_expecting_persistent('M'));
        assert!(!parser.is_expecting('M'));
    }

    #[test]
    fn duplicate_persistent_is_rejected() {
        let parser = AnsiResponseParser::new();
        let recorder = Recorder::default();
        parser.expect_response(recorder.persistent('M')).unwrap();
        let result = parser.expect_response(recorder.persistent('M'));
        assert!(matches!(
            result,
            Err(ExpectationError::DuplicatePersistent { terminator: 'M' })
        ));

        assert!(parser.stop_expecting_persistent('M'));
        assert!(!parser.stop_expecting_persistent('M'));
        parser.expect_response(recorder.persistent('M')).unwrap();
    }

    #[test]
    fn stop_expecting_turns_late_response_into_unknown() {
        let parser = AnsiResponseParser::new();
        let recorder = Recorder::default();
        parser.expect_response(recorder.one_shot('R')).unwrap();

        assert_eq!(parser.stop_expecting('R', false), 1);
        assert!(!parser.is_expecting('R'));

        assert_eq!(parser.process_str("\x1b[12;40R"), "\x1b[12;40R");
        assert!(recorder.seen().is_empty());
    }

    #[test]
    fn one_shot_duplicates_queue_in_order() {
        let parser = AnsiResponseParser::new();
        let first = Recorder::default();
        let second = Recorder::default();
        parser.expect_response(first.one_shot('t')).unwrap();
        parser.expect_response(second.one_shot('t')).unwrap();
        assert_eq!(parser.expecting_count('t'), 2);

        parser.process_str("\x1b[8;24;80t");
        assert_eq!(first.seen(), vec!["\x1b[8;24;80t".to_string()]);
        assert!(second.seen().is_empty());

        parser.process_str("\x1b[8;25;81t");
        assert_eq!(second.seen(), vec!["\x1b[8;25;81t".to_string()]);
    }

    #[test]
    fn stop_expecting_with_duplicates() {
        let parser = AnsiResponseParser::new();
        let recorder = Recorder::default();
        for _ in 0..3 {
            parser.expect_response(recorder.one_shot('c')).unwrap();
        }
        assert_eq!(parser.stop_expecting('c', false), 1);
        assert_eq!(parser.expecting_count('c'), 2);
        assert_eq!(parser.stop_expecting('c', true), 2);
        assert_eq!(parser.stop_expecting('c', true), 0);
    }

    #[test]
    fn one_shot_wins_over_persistent() {
        let parser = AnsiResponseParser::new();
        let one_shot = Recorder::default();
        let persistent = Recorder::default();
        parser.expect_response(persistent.persistent('c')).unwrap();
        parser.expect_response(one_shot.one_shot('c')).unwrap();

        parser.process_str("\x1b[0c\x1b[1c");
        assert_eq!(one_shot.seen(), vec!["\x1b[0c".to_string()]);
        assert_eq!(persistent.seen(), vec!["\x1b[1c".to_string()]);
    }

    #[test]
    fn metadata_is_handed_back() {
        let parser = AnsiResponseParser::new();
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = Arc::clone(&seen);
        parser
            .expect_response(
                Expectation::one_shot('c', move |response: &AnsiResponse<'_, ()>| {
                    *seen_clone.lock().unwrap() = response.metadata_as::<&str>().copied();
                })
                .with_metadata("device attributes"),
            )
            .unwrap();

        parser.process_str("\x1b[0c");
        assert_eq!(*seen.lock().unwrap(), Some("device attributes"));
    }

    #[test]
    fn registered_terminator_outside_known_set_matches() {
        let parser = AnsiResponseParser::new();
        let recorder = Recorder::default();
        parser.expect_response(recorder.one_shot('N')).unwrap();
        assert_eq!(parser.process_str("\x1b[5N"), "");
        assert_eq!(recorder.seen(), vec!["\x1b[5N".to_string()]);
    }

    #[test]
    fn callback_may_reenter_parser() {
        let parser = Arc::new(AnsiResponseParser::new());
        let recorder = Recorder::default();
        let parser_clone = Arc::clone(&parser);
        let recorder_clone = recorder.clone();
        parser
            .expect_response(Expectation::one_shot('c', move |_| {
                parser_clone
                    .expect_response(recorder_clone.one_shot('R'))
                    .unwrap();
            }))
            .unwrap();

        parser.process_str("\x1b[0c\x1b[3;4R");
        assert_eq!(recorder.seen(), vec!["\x1b[3;4R".to_string()]);
    }
}
