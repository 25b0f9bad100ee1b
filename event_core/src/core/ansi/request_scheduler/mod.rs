// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod ansi_request;
pub mod ansi_response;
pub mod output_sink;
pub mod request_scheduler_impl;

// Re-export.
pub use ansi_request::*;
pub use ansi_response::*;
pub use output_sink::*;
pub use request_scheduler_impl::*;
