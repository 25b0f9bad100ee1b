// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{Display, Formatter, Result};

/// A cell position. Screen positions are always non negative, but positions translated
/// into a view's viewport can be negative when the point is above or left of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos {
    pub col: i32,
    pub row: i32,
}

impl Pos {
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self { Self { col, row } }
}

impl Display for Pos {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[col: {}, row: {}]", self.col, self.row)
    }
}

/// Terminal size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self { Self { cols, rows } }
}

/// Handle to a view in the external view tree. The tree hands these out, this crate
/// only stores and compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u32);

impl Display for ViewId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result { write!(f, "view#{}", self.0) }
}
