// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{any::Any,
          fmt::{Debug, Formatter},
          sync::Arc};

/// Opaque payload attached to an [`Expectation`] and handed back to its callback.
pub type ExpectationMetadata = Arc<dyn Any + Send + Sync>;

/// Invoked with the complete sequence when an [`Expectation`] matches.
pub type ResponseCallback<T> = Arc<dyn Fn(&AnsiResponse<'_, T>) + Send + Sync>;

/// Offered every complete sequence that no [`Expectation`] claimed. Return `true` to
/// swallow it, `false` to have the parser release it as ordinary output.
pub type UnknownResponseHandler<T> = Arc<dyn Fn(&AnsiResponse<'_, T>) -> bool + Send + Sync>;

/// A completed escape sequence, as seen by a [`ResponseCallback`] or an
/// [`UnknownResponseHandler`].
#[derive(Debug)]
pub struct AnsiResponse<'a, T> {
    /// The full text, from the leading `ESC` up to and including the terminator.
    pub sequence: &'a str,
    /// The same characters with the tags they arrived with.
    pub held: &'a [(char, T)],
    /// Whatever the registering caller attached. Always `None` for unknown responses.
    pub metadata: Option<&'a ExpectationMetadata>,
}

impl<T> AnsiResponse<'_, T> {
    #[must_use]
    pub fn terminator(&self) -> Option<char> { self.sequence.chars().last() }

    /// Downcasts the metadata.
    #[must_use]
    pub fn metadata_as<M: Any>(&self) -> Option<&M> {
        self.metadata.and_then(|it| (**it).downcast_ref::<M>())
    }
}

/// A registration asking the parser to intercept sequences ending in `terminator`
/// instead of releasing them as ordinary output.
///
/// A one shot expectation is removed after its first match. A persistent one (eg: for
/// mouse reports ending in `M` and `m`) stays until [`stop_expecting_persistent`] is
/// called.
///
/// [`stop_expecting_persistent`]: crate::AnsiResponseParser::stop_expecting_persistent
pub struct Expectation<T> {
    pub terminator: char,
    pub callback: ResponseCallback<T>,
    pub metadata: Option<ExpectationMetadata>,
    pub persistent: bool,
}

impl<T> Expectation<T> {
    pub fn one_shot(
        terminator: char,
        callback: impl Fn(&AnsiResponse<'_, T>) + Send + Sync + 'static,
    ) -> Self {
        Self {
            terminator,
            callback: Arc::new(callback),
            metadata: None,
            persistent: false,
        }
    }

    pub fn persistent(
        terminator: char,
        callback: impl Fn(&AnsiResponse<'_, T>) + Send + Sync + 'static,
    ) -> Self {
        Self {
            persistent: true,
            ..Self::one_shot(terminator, callback)
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: impl Any + Send + Sync) -> Self {
        self.metadata = Some(Arc::new(metadata));
        self
    }
}

impl<T> Debug for Expectation<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expectation")
            .field("terminator", &self.terminator)
            .field("persistent", &self.persistent)
            .field("has_metadata", &self.metadata.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ExpectationError {
    #[error("A persistent expectation for terminator {terminator:?} is already registered")]
    #[diagnostic(
        code(r3bl_event_core::parser::duplicate_persistent),
        help("Call stop_expecting_persistent() first, or reuse the existing registration")
    )]
    DuplicatePersistent { terminator: char },
}
