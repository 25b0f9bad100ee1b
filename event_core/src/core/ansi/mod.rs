// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod ansi_constants;
pub mod input_decoder;
pub mod request_scheduler;
pub mod response_parser;

// Re-export.
pub use ansi_constants::*;
pub use input_decoder::*;
pub use request_scheduler::*;
pub use response_parser::*;
