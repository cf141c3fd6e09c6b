//! Grid layout calculation
//!
//! Grid shapes per layout, cell geometry on the sheet, and the fill order
//! of plain N-up cells.

use crate::types::{CellOrder, Orientation};

use super::{Fold, GridShape, Rect};

// =============================================================================
// Grid Shapes
// =============================================================================

/// N-up values accepted for plain layouts, with their portrait grid (cols, rows)
const PLAIN_GRIDS: &[(usize, usize, usize)] = &[
    (2, 1, 2),
    (4, 2, 2),
    (6, 2, 3),
    (8, 2, 4),
    (9, 3, 3),
    (12, 3, 4),
    (16, 4, 4),
];

/// N-up values accepted for booklets
pub const BOOKLET_NUP_VALUES: &[usize] = &[2, 4, 6, 8];

/// Plain N-up grid for a sheet orientation; landscape sheets transpose the portrait grid.
pub fn plain_grid(n: usize, orientation: Orientation) -> Option<GridShape> {
    let (_, cols, rows) = PLAIN_GRIDS.iter().find(|(nup, _, _)| *nup == n)?;
    let grid = GridShape::new(*cols, *rows);
    Some(match orientation {
        Orientation::Portrait => grid,
        Orientation::Landscape => grid.transposed(),
    })
}

/// Booklet grid: a side fold stacks `n/2` two-cell rows, a top fold lines up
/// `n/2` two-cell columns.
pub fn booklet_grid(n: usize, fold: Fold) -> Option<GridShape> {
    if !BOOKLET_NUP_VALUES.contains(&n) {
        return None;
    }
    match fold {
        Fold::Side => Some(GridShape::new(2, n / 2)),
        Fold::Top => Some(GridShape::new(n / 2, 2)),
        Fold::Plain => None,
    }
}

pub fn supported_plain_nup() -> impl Iterator<Item = usize> {
    PLAIN_GRIDS.iter().map(|(n, _, _)| *n)
}

// =============================================================================
// Cell Geometry
// =============================================================================

/// Cell tiling of one sheet side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub grid: GridShape,
    pub sheet_width: f32,
    pub sheet_height: f32,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl CellGeometry {
    pub fn new(grid: GridShape, sheet_width: f32, sheet_height: f32) -> Self {
        Self {
            grid,
            sheet_width,
            sheet_height,
            cell_width: sheet_width / grid.cols as f32,
            cell_height: sheet_height / grid.rows as f32,
        }
    }

    /// Bounds of a row-major cell. Row 0 is at the top of the sheet.
    pub fn cell_rect(&self, cell_index: usize) -> Rect {
        let (row, col) = self.grid.position(cell_index);
        let x = col as f32 * self.cell_width;
        let y = (self.grid.rows - row - 1) as f32 * self.cell_height;
        Rect::new(x, y, self.cell_width, self.cell_height)
    }
}

// =============================================================================
// Fill Order
// =============================================================================

/// Row-major cell index receiving the `slot`-th page of a plain N-up sheet.
pub fn fill_cell(grid: GridShape, order: CellOrder, slot: usize) -> usize {
    let (row, col) = match order {
        CellOrder::RightDown => (slot / grid.cols, slot % grid.cols),
        CellOrder::LeftDown => (slot / grid.cols, grid.cols - 1 - slot % grid.cols),
        CellOrder::DownRight => (slot % grid.rows, slot / grid.rows),
        CellOrder::DownLeft => (slot % grid.rows, grid.cols - 1 - slot / grid.rows),
    };
    grid.cell_index(row, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_grid_cells_match_nup() {
        for n in supported_plain_nup() {
            let grid = plain_grid(n, Orientation::Portrait).unwrap();
            assert_eq!(grid.cell_count(), n);
            assert!(grid.rows >= grid.cols, "{n}-up portrait grid should be tall");
        }
        assert!(plain_grid(3, Orientation::Portrait).is_none());
    }

    #[test]
    fn test_landscape_transposes() {
        let grid = plain_grid(6, Orientation::Landscape).unwrap();
        assert_eq!(grid, GridShape::new(3, 2));
    }

    #[test]
    fn test_booklet_grids() {
        assert_eq!(booklet_grid(4, Fold::Side), Some(GridShape::new(2, 2)));
        assert_eq!(booklet_grid(6, Fold::Side), Some(GridShape::new(2, 3)));
        assert_eq!(booklet_grid(8, Fold::Top), Some(GridShape::new(4, 2)));
        assert_eq!(booklet_grid(9, Fold::Side), None);
        assert_eq!(booklet_grid(4, Fold::Plain), None);
    }

    #[test]
    fn test_cell_rect_row_zero_is_top() {
        let geometry = CellGeometry::new(GridShape::new(2, 2), 400.0, 600.0);
        assert_eq!(geometry.cell_rect(0), Rect::new(0.0, 300.0, 200.0, 300.0));
        assert_eq!(geometry.cell_rect(3), Rect::new(200.0, 0.0, 200.0, 300.0));
    }

    #[test]
    fn test_fill_orders() {
        let grid = GridShape::new(2, 2);
        let cells = |order| (0..4).map(|s| fill_cell(grid, order, s)).collect::<Vec<_>>();
        assert_eq!(cells(CellOrder::RightDown), vec![0, 1, 2, 3]);
        assert_eq!(cells(CellOrder::DownRight), vec![0, 2, 1, 3]);
        assert_eq!(cells(CellOrder::LeftDown), vec![1, 0, 3, 2]);
        assert_eq!(cells(CellOrder::DownLeft), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_fill_order_on_wide_grid() {
        let grid = GridShape::new(3, 2);
        let cells: Vec<_> = (0..6)
            .map(|s| fill_cell(grid, CellOrder::DownRight, s))
            .collect();
        assert_eq!(cells, vec![0, 3, 1, 4, 2, 5]);
    }
}
