// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod expectation;
pub mod parser_state;
pub mod response_parser_impl;

// Re-export.
pub use expectation::*;
pub use parser_state::*;
pub use response_parser_impl::*;
