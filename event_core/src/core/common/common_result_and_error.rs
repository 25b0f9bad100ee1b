// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Typed errors live next to the component that raises them ([`ExpectationError`],
//! [`SchedulerError`], [`DispatchError`], [`MainLoopError`]). Each one derives
//! [`thiserror::Error`] and [`miette::Diagnostic`] so it converts into a
//! [`miette::Report`] with `?` wherever a [`CommonResult`] is returned.
//!
//! For more information on error types, see:
//!
//! 1. [Article](https://developerlife.com/2024/06/10/rust-miette-error-handling/)
//! 2. [Video](https://youtu.be/TmLF7vI8lKk)
//!
//! [`ExpectationError`]: crate::ExpectationError
//! [`SchedulerError`]: crate::SchedulerError
//! [`DispatchError`]: crate::DispatchError
//! [`MainLoopError`]: crate::MainLoopError

/// Type alias to make it easy to work with:
/// 1. [`core::result::Result`]
/// 2. [`miette::Result`] and [`miette::Report`], which are [`std::error::Error`]
///    wrappers.
///
/// It is basically `miette::Result<T, miette::Report>`.
pub type CommonResult<T> = miette::Result<T>;

/// Errors that come from building or parsing an [`EventCoreConfig`].
///
/// [`EventCoreConfig`]: crate::EventCoreConfig
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    #[error("Invalid event core configuration: {0}")]
    #[diagnostic(
        code(r3bl_event_core::config::invalid_json),
        help("Durations are integer milliseconds, eg: {{\"scheduler\": {{\"throttle\": 100}}}}")
    )]
    InvalidJson(#[from] serde_json::Error),

    #[error("Input channel capacity must be greater than zero")]
    #[diagnostic(code(r3bl_event_core::config::zero_channel_capacity))]
    ZeroChannelCapacity,
}
