// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod clock;
pub mod common_enums;
pub mod common_mutex;
pub mod common_result_and_error;
pub mod event_core_config;
pub mod rate_limiter;
pub mod sizes;

// Re-export.
pub use clock::*;
pub use common_enums::*;
pub use common_mutex::*;
pub use common_result_and_error::*;
pub use event_core_config::*;
pub use rate_limiter::*;
pub use sizes::*;
