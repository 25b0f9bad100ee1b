// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod char_to_key;
pub mod csi_key_parser;
pub mod sgr_mouse_parser;

// Re-export.
pub use char_to_key::*;
pub use csi_key_parser::*;
pub use sgr_mouse_parser::*;
