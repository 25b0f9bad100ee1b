// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod application_context;
pub mod dispatch;
pub mod main_loop;

// Re-export.
pub use application_context::*;
pub use dispatch::*;
pub use main_loop::*;
