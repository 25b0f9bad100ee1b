// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod ansi;
pub mod common;
pub mod input;
pub mod log;
pub mod timed_events;

// Re-export.
pub use ansi::*;
pub use common::*;
pub use input::*;
pub use log::*;
pub use timed_events::*;
