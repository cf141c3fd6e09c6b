//! Layout data types for imposition
//!
//! These types sit between page ordering and PDF rendering.

use crate::types::Rotation;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which physical side of the printed sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SheetSide {
    /// Front of the sheet (printed first in duplex)
    Front,
    /// Back of the sheet (printed second in duplex)
    Back,
}

/// Columns and rows of the cell grid on one sheet side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridShape {
    pub cols: usize,
    pub rows: usize,
}

impl GridShape {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    /// Total number of cells in the grid
    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    pub fn transposed(self) -> Self {
        Self {
            cols: self.rows,
            rows: self.cols,
        }
    }

    /// Row-major cell index; row 0 is the top row
    pub fn cell_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// (row, col) of a row-major cell index
    pub fn position(&self, cell_index: usize) -> (usize, usize) {
        (cell_index / self.cols, cell_index % self.cols)
    }
}

/// One slot of the imposed output: which source page lands in which cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageAssignment {
    /// 0-based output sheet
    pub sheet_index: usize,
    pub side: SheetSide,
    /// Row-major cell index on that side
    pub cell_index: usize,
    /// 1-based source page; `None` is a blank filler
    pub source_page: Option<u32>,
    pub rotation: Rotation,
}

impl PageAssignment {
    pub fn is_blank(&self) -> bool {
        self.source_page.is_none()
    }
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from PDF box corners `[llx lly urx ury]`, normalizing flipped corners.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(x0.min(x1), y0.min(y1), (x1 - x0).abs(), (y1 - y0).abs())
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Shrinks the rectangle by `amount` on every side.
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            self.width - 2.0 * amount,
            self.height - 2.0 * amount,
        )
    }
}
