// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod input_processor;
pub mod input_reader_thread;
pub mod main_loop_handle;
pub mod main_loop_impl;
pub mod raw_input;

// Re-export.
pub use input_processor::*;
pub use input_reader_thread::*;
pub use main_loop_handle::*;
pub use main_loop_impl::*;
pub use raw_input::*;
