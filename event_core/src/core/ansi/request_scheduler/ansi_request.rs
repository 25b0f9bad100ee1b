// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::AnsiEscapeSequenceResponse;
use std::{fmt::{Debug, Formatter},
          sync::Arc};

/// Invoked with the parsed reply. Never invoked for a request that went stale.
pub type RequestResponseCallback = Arc<dyn Fn(&AnsiEscapeSequenceResponse) + Send + Sync>;

/// A query to send to the terminal, and what to do with its reply.
#[derive(Clone)]
pub struct AnsiEscapeSequenceRequest {
    /// The bytes to transmit, eg: `ESC [ 0 c`.
    pub request: String,
    /// Final character of the reply.
    pub terminator: char,
    /// Expected first parameter of the reply, if the protocol fixes one.
    pub value: Option<String>,
    pub on_response: RequestResponseCallback,
}

impl Debug for AnsiEscapeSequenceRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnsiEscapeSequenceRequest")
            .field("request", &self.request)
            .field("terminator", &self.terminator)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl AnsiEscapeSequenceRequest {
    pub fn new(
        request: impl Into<String>,
        terminator: char,
        on_response: impl Fn(&AnsiEscapeSequenceResponse) + Send + Sync + 'static,
    ) -> Self {
        Self {
            request: request.into(),
            terminator,
            value: None,
            on_response: Arc::new(on_response),
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// `ESC [ 0 c`, primary device attributes. Reply: `ESC [ ? Ps ; ... c`.
    pub fn send_device_attributes(
        on_response: impl Fn(&AnsiEscapeSequenceResponse) + Send + Sync + 'static,
    ) -> Self {
        Self::new("\x1b[0c", 'c', on_response)
    }

    /// `ESC [ ? 6 n`, cursor position report. Reply: `ESC [ ? row ; col R`.
    pub fn request_cursor_position(
        on_response: impl Fn(&AnsiEscapeSequenceResponse) + Send + Sync + 'static,
    ) -> Self {
        Self::new("\x1b[?6n", 'R', on_response)
    }

    /// `ESC [ 18 t`, text area size in characters. Reply: `ESC [ 8 ; rows ; cols t`.
    pub fn report_terminal_size_in_chars(
        on_response: impl Fn(&AnsiEscapeSequenceResponse) + Send + Sync + 'static,
    ) -> Self {
        Self::new("\x1b[18t", 't', on_response).with_value("8")
    }
}
