// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{AnsiResponseParser, AnsiResponseParserState, Clock as _, ESC, InputEvent, Key,
            KeyCode, KeyEvent, MouseEvent, MutexExt as _, ParserConfig, SharedClock,
            keys_from_released, parse_csi_key, parse_sgr_mouse};
use std::{collections::VecDeque,
          sync::{Arc, Mutex},
          time::Duration};

/// Turns raw terminal text into [`InputEvent`]s, in arrival order.
///
/// Every character goes through the shared [`AnsiResponseParser`] first, so responses
/// to our own queries are claimed by their [`Expectation`]s before anything else sees
/// them. Complete sequences that nobody expected reach this processor's unknown
/// response handler, which decodes SGR mouse reports and CSI keys. Anything it can't
/// decode is released and typed out as ordinary keys.
///
/// Characters are fed one at a time so a decoded sequence lands between the keys that
/// surround it.
///
/// [`Expectation`]: crate::Expectation
#[derive(Debug)]
pub struct InputProcessor {
    parser: Arc<AnsiResponseParser>,
    decoded: Arc<Mutex<DecodedInput>>,
    escape_timeout: Duration,
    clock: SharedClock,
}

#[derive(Debug, Default)]
struct DecodedInput {
    events: VecDeque<InputEvent>,
    /// An `ESC` that was released on its own because another `ESC` arrived right after
    /// it. If the second one starts a key sequence, the pair is Alt plus that key.
    pending_escape: bool,
}

impl DecodedInput {
    fn flush_pending_escape(&mut self) {
        if std::mem::take(&mut self.pending_escape) {
            self.events
                .push_back(InputEvent::Keyboard(KeyEvent::new(Key::plain(KeyCode::Esc))));
        }
    }

    fn push_released(&mut self, chars: &[char]) {
        self.flush_pending_escape();
        self.events
            .extend(keys_from_released(chars).into_iter().map(InputEvent::Keyboard));
    }

    fn push_decoded_key(&mut self, key: Key) {
        let key = if std::mem::take(&mut self.pending_escape) {
            key.with_alt()
        } else {
            key
        };
        self.events.push_back(InputEvent::Keyboard(KeyEvent::new(key)));
    }

    fn push_mouse(&mut self, event: MouseEvent) {
        self.flush_pending_escape();
        self.events.push_back(InputEvent::Mouse(event));
    }
}

impl InputProcessor {
    /// Installs the decoding unknown response handler on `parser`, replacing any other.
    #[must_use]
    pub fn new(parser: Arc<AnsiResponseParser>, config: ParserConfig, clock: SharedClock) -> Self {
        let decoded = Arc::new(Mutex::new(DecodedInput::default()));
        parser.set_unknown_response_handler({
            let decoded = Arc::clone(&decoded);
            move |response| {
                let sequence = response.sequence;
                if let Some(mouse) = parse_sgr_mouse(sequence) {
                    decoded.lock_recover().push_mouse(mouse);
                    return true;
                }
                if let Some(key) = parse_csi_key(sequence) {
                    decoded.lock_recover().push_decoded_key(key);
                    return true;
                }
                tracing::debug!(
                    message = "input processor: undecodable sequence released as keys",
                    ?sequence
                );
                false
            }
        });
        Self {
            parser,
            decoded,
            escape_timeout: config.escape_timeout,
            clock,
        }
    }

    #[must_use]
    pub fn parser(&self) -> &Arc<AnsiResponseParser> { &self.parser }

    /// Classifies `text`. A trailing incomplete sequence stays held in the parser until
    /// more text arrives or [`Self::release_stale_escape`] gives up on it.
    pub fn process_chars(&self, text: &str) -> Vec<InputEvent> {
        for ch in text.chars() {
            let released: Vec<char> = self
                .parser
                .process_input([(ch, ())])
                .into_iter()
                .map(|(ch, ())| ch)
                .collect();
            let state = self.parser.state();
            let mut decoded = self.decoded.lock_recover();
            if released.is_empty() {
                // An expectation consumed the sequence that followed a held back `ESC`.
                if state == AnsiResponseParserState::Normal {
                    decoded.flush_pending_escape();
                }
                continue;
            }
            let lone_escape_before_another =
                released == [ESC] && state == AnsiResponseParserState::ExpectingBracket;

            if lone_escape_before_another {
                decoded.flush_pending_escape();
                decoded.pending_escape = true;
            } else {
                decoded.push_released(&released);
            }
        }
        self.drain()
    }

    /// Releases whatever the parser has been holding for longer than the escape
    /// timeout, as ordinary keys. This is how a lone `Esc` key press gets through.
    pub fn release_stale_escape(&self) -> Vec<InputEvent> {
        if self.time_until_escape_release() != Some(Duration::ZERO) {
            return vec![];
        }
        self.release_held()
    }

    /// Releases everything held right away, timeout or not. Used once the input source
    /// has ended and nothing can complete a held sequence any more.
    pub fn release_held(&self) -> Vec<InputEvent> {
        let released: Vec<char> = self
            .parser
            .release()
            .into_iter()
            .map(|(ch, ())| ch)
            .collect();
        tracing::debug!(message = "input processor: released held input", held = ?released);
        self.decoded.lock_recover().push_released(&released);
        self.drain()
    }

    /// `None` while nothing is held. Otherwise how long until
    /// [`Self::release_stale_escape`] will act, which is zero once it is overdue.
    #[must_use]
    pub fn time_until_escape_release(&self) -> Option<Duration> {
        if self.parser.state() == AnsiResponseParserState::Normal {
            return None;
        }
        let held_for = self
            .clock
            .now()
            .saturating_duration_since(self.parser.state_changed_at());
        if held_for > self.escape_timeout {
            Some(Duration::ZERO)
        } else {
            // Never zero here, so only an overdue hold reports zero.
            Some((self.escape_timeout - held_for).max(Duration::from_millis(1)))
        }
    }

    fn drain(&self) -> Vec<InputEvent> { self.decoded.lock_recover().events.drain(..).collect() }
}


#[cfg(test)]
mod tests_decoding {
    use super::{test_fixtures::*, *};
    use crate::{Expectation, MouseFlags, Pos};
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_and_control_keys() {
        let (_clock, processor) = input_processor();
        assert_eq!(keys(&processor.process_chars("ab\r\t\x01")), vec![
            "a", "b", "Enter", "Tab", "Ctrl+a"
        ]);
    }

    #[test]
    fn csi_key_between_plain_keys() {
        let (_clock, processor) = input_processor();
        assert_eq!(keys(&processor.process_chars("a\x1b[Ab\x1b[1;5C")), vec![
            "a", "Up", "b", "Ctrl+Right"
        ]);
    }

    #[test]
    fn chunk_boundaries_dont_matter() {
        let (_clock, processor) = input_processor();
        let mut events = processor.process_chars("x\x1b[");
        assert_eq!(processor.parser().held_len(), 2);
        events.extend(processor.process_chars("3~"));
        assert_eq!(keys(&events), vec!["x", "Delete"]);
    }

    #[test]
    fn sgr_mouse_report() {
        let (_clock, processor) = input_processor();
        let events = processor.process_chars("\x1b[<0;5;3M");
        assert_eq!(events, vec![InputEvent::Mouse(MouseEvent::new(
            Pos::new(4, 2),
            MouseFlags::BUTTON1_PRESSED
        ))]);
    }

    #[test]
    fn alt_letter() {
        let (_clock, processor) = input_processor();
        assert_eq!(keys(&processor.process_chars("\x1bx")), vec!["Alt+x"]);
    }

    #[test]
    fn escape_escape_csi_is_alt_key() {
        let (_clock, processor) = input_processor();
        assert_eq!(keys(&processor.process_chars("\x1b\x1b[A")), vec!["Alt+Up"]);
    }

    #[test]
    fn escape_before_mouse_report_stays_a_key() {
        let (_clock, processor) = input_processor();
        assert_eq!(keys(&processor.process_chars("\x1b\x1b[<0;1;1m")), vec![
            "Esc".to_string(),
            format!("mouse 0,0 {:?}", MouseFlags::BUTTON1_RELEASED),
        ]);
    }

    #[test]
    fn escape_before_expected_response_is_kept() {
        let (_clock, processor) = input_processor();
        processor
            .parser()
            .expect_response(Expectation::one_shot('c', |_| {}))
            .unwrap();

        assert_eq!(keys(&processor.process_chars("\x1b\x1b[?1;2c")), vec!["Esc"]);
        assert_eq!(processor.parser().state(), AnsiResponseParserState::Normal);
        assert_eq!(processor.time_until_escape_release(), None);
    }

    #[test]
    fn escape_before_persistent_mouse_expectation_is_kept() {
        let (_clock, processor) = input_processor();
        processor
            .parser()
            .expect_response(Expectation::persistent('M', |_| {}))
            .unwrap();

        assert_eq!(keys(&processor.process_chars("\x1b")), Vec::<String>::new());
        assert_eq!(keys(&processor.process_chars("\x1b[<0;1;1Mz")), vec!["Esc", "z"]);
    }

    #[test]
    fn undecodable_sequence_becomes_keys() {
        let (_clock, processor) = input_processor();
        assert_eq!(keys(&processor.process_chars("\x1b[99X")), vec![
            "Alt+[", "9", "9", "X"
        ]);
    }

    #[test]
    fn expected_response_is_not_input() {
        let (_clock, processor) = input_processor();
        let seen = Arc::new(Mutex::new(vec![]));
        processor
            .parser()
            .expect_response(Expectation::one_shot('c', {
                let seen = Arc::clone(&seen);
                move |response| seen.lock().unwrap().push(response.sequence.to_string())
            }))
            .unwrap();

        assert_eq!(keys(&processor.process_chars("q\x1b[?1;2cw")), vec!["q", "w"]);
        assert_eq!(*seen.lock().unwrap(), vec!["\x1b[?1;2c"]);
    }
}
