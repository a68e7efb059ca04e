//! Geometry values carried by input events and terminal state.

use serde::{Deserialize, Serialize};

/// Point on the terminal surface (column, row).
///
/// Coordinates are signed: they come from untrusted remote input and a
/// hostile terminal can report positions left of or above the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0).
    pub fn origin() -> Self {
        Self { x: 0, y: 0 }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Dimensions of a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Number of columns
    pub cols: u16,
    /// Number of rows
    pub rows: u16,
}

impl Dimensions {
    /// Create new dimensions.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Build dimensions from a 1-based cursor position report.
    ///
    /// After moving the cursor to the far bottom-right corner, the reported
    /// position is the terminal size. Returns `None` for positions that
    /// cannot be a size.
    pub fn from_report(position: Point) -> Option<Self> {
        let cols = u16::try_from(position.x).ok().filter(|c| *c > 0)?;
        let rows = u16::try_from(position.y).ok().filter(|r| *r > 0)?;
        Some(Self { cols, rows })
    }

    /// Total cell count (cols * rows).
    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(80, 24)
    }
}
