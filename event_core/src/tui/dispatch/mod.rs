// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod application;
pub mod command;
pub mod dispatch_error;
pub mod key_bindings;
pub mod keyboard_dispatch;
pub mod mouse_dispatch;
pub mod mouse_grab;
pub mod popover;
pub mod subscriber_list;
pub mod view_tree;

#[cfg(test)]
pub mod test_fixtures;

// Re-export.
pub use application::*;
pub use command::*;
pub use dispatch_error::*;
pub use key_bindings::*;
pub use mouse_grab::*;
pub use popover::*;
pub use subscriber_list::*;
pub use view_tree::*;
