// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::Debug;

/// Interrupts a main loop that is blocked waiting for input, so that it recomputes its
/// timer deadline. Must be callable from any thread.
pub trait LoopWaker: Debug + Send + Sync {
    fn wake(&self);
}
