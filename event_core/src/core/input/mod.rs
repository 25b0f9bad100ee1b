// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod geometry;
pub mod input_event;
pub mod key;
pub mod mouse_event;

// Re-export.
pub use geometry::*;
pub use input_event::*;
pub use key::*;
pub use mouse_event::*;
