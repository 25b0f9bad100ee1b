// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod loop_waker;
pub mod timed_events_impl;

// Re-export.
pub use loop_waker::*;
pub use timed_events_impl::*;
