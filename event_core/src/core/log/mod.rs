// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use rolling_file_appender_impl::*;
pub use tracing_config::*;
pub use tracing_init::*;

/// Per-character parser state transitions. Very noisy, off by default.
pub const DEBUG_EVENT_CORE_SHOW_PARSER: bool = false;

/// Main loop iterations, wakeups and reader thread activity.
pub const DEBUG_EVENT_CORE_SHOW_MAIN_LOOP: bool = false;

/// Every key and mouse event routed by the dispatcher.
pub const DEBUG_EVENT_CORE_SHOW_DISPATCH: bool = false;
