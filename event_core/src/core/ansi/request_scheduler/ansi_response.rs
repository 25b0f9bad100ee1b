// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::CSI;

/// Characters that may follow `ESC [` before the parameters, eg: the `?` in a primary
/// device attributes reply `ESC [ ? 62 ; 4 c`.
const PRIVATE_MARKERS: &[char] = &['?', '>', '<', '=', '!'];

/// A terminal reply to an [`AnsiEscapeSequenceRequest`], split into its parameters.
///
/// ```text
/// ESC [ ? 62 ; 4 c
/// ╰─┬─╯ │ ╰──┬─╯ ╰── terminator
///   │   │    ╰────── values: ["62", "4"]
///   │   ╰─────────── private_marker
///   ╰─────────────── CSI
/// ```
///
/// A reply that doesn't parse, or whose first value differs from the request's
/// expected value, is still delivered, with `is_valid == false` and an `error`.
///
/// [`AnsiEscapeSequenceRequest`]: crate::AnsiEscapeSequenceRequest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiEscapeSequenceResponse {
    pub raw: String,
    pub terminator: char,
    pub private_marker: Option<char>,
    pub values: Vec<String>,
    pub is_valid: bool,
    pub error: Option<String>,
}

impl AnsiEscapeSequenceResponse {
    #[must_use]
    pub fn parse(raw: &str, terminator: char, expected_value: Option<&str>) -> Self {
        let mut it = Self {
            raw: raw.to_string(),
            terminator,
            private_marker: None,
            values: vec![],
            is_valid: false,
            error: None,
        };

        let Some(body) = raw.strip_prefix(CSI) else {
            it.error = Some("Response does not start with CSI".to_string());
            return it;
        };

        let Some(mut body) = body.strip_suffix(terminator) else {
            it.error = Some(format!("Response does not end with {terminator:?}"));
            return it;
        };

        if let Some(marker) = body.chars().next().filter(|ch| PRIVATE_MARKERS.contains(ch)) {
            it.private_marker = Some(marker);
            body = &body[marker.len_utf8()..];
        }

        if !body.is_empty() {
            it.values = body.split(';').map(str::to_string).collect();
        }

        match expected_value {
            Some(expected) if it.first_value() != Some(expected) => {
                it.error = Some(format!(
                    "Expected first value {expected:?}, got {:?}",
                    it.first_value()
                ));
            }
            _ => it.is_valid = true,
        }

        it
    }

    #[must_use]
    pub fn first_value(&self) -> Option<&str> { self.values.first().map(String::as_str) }

    /// Parses the value at `index` as a number.
    #[must_use]
    pub fn value_as_u16(&self, index: usize) -> Option<u16> {
        self.values.get(index).and_then(|it| it.parse().ok())
    }
}
