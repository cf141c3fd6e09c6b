//! Page ordering for N-up and booklet layouts
//!
//! ## Booklets
//!
//! A booklet is built from *leaves*: one folded strip of paper carrying four
//! pages. Counting leaves from the outside of a signature of `P` pages, leaf
//! `k` carries
//!
//! - outside: `P - 2k` (high) and `1 + 2k` (low)
//! - inside:  `2 + 2k` (low) and `P - 1 - 2k` (high)
//!
//! Each leaf occupies a *strip* of two adjacent cells on the front of a
//! sheet; sheet `s` carries leaves `s·n/2 .. (s+1)·n/2`. A side fold stacks
//! strips as rows, a top fold lines them up as columns. When a sheet carries
//! an even number of strips, every second strip is laid head to head with
//! its neighbour. The back of each cell carries the partner face of the
//! mirrored front cell, so duplex printing lands page `p` behind `p ± 1`.
//!
//! 4-up on A5 portrait, long edge (side fold):
//!
//! ```text
//!   front          back
//!   [ 8 | 1 ]      [ 2 | 7 ]
//!   [ 5↓| 4↓]      [ 3↓| 6↓]
//! ```
//!
//! 4-up on A5 portrait, short edge (top fold):
//!
//! ```text
//!   front          back
//!   [ 8↓| 3↓]      [ 4↓| 7↓]
//!   [ 1 | 6 ]      [ 5 | 2 ]
//! ```

use crate::options::ImpositionConfig;
use crate::types::{Binding, LayoutKind, Orientation, Rotation};

use super::{GridShape, PageAssignment, SheetSide, fill_cell};

// =============================================================================
// Fold Plans
// =============================================================================

/// How the sheet is folded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fold {
    /// No fold: plain N-up
    Plain,
    /// Fold along the sheet's vertical axis; strips are rows
    Side,
    /// Fold along the sheet's horizontal axis; strips are columns
    Top,
}

/// Fold plus the treatment of the back side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldPlan {
    pub fold: Fold,
    /// The back side is turned 180° (reversed listing, rotations flipped)
    pub turned_back: bool,
}

impl FoldPlan {
    const PLAIN: FoldPlan = FoldPlan::new(Fold::Plain, false);

    const fn new(fold: Fold, turned_back: bool) -> Self {
        Self { fold, turned_back }
    }

    /// Fold plan lookup.
    ///
    /// A binding along the sheet's natural edge (long on portrait, short on
    /// landscape) folds at the side; the other edge folds at the top.
    /// Landscape sheets are fed turned, which turns every back side.
    pub fn select(kind: LayoutKind, binding: Binding, orientation: Orientation) -> Self {
        if kind == LayoutKind::PlainNUp {
            return Self::PLAIN;
        }
        let fold = if kind == LayoutKind::Booklet && binding == Binding::natural_for(orientation) {
            Fold::Side
        } else {
            Fold::Top
        };
        Self::new(fold, orientation == Orientation::Landscape)
    }
}

// =============================================================================
// Page Order
// =============================================================================

/// Page order for source pages `1..=page_count`.
pub fn compute_page_order(page_count: u32, config: &ImpositionConfig) -> Vec<PageAssignment> {
    let pages: Vec<u32> = (1..=page_count).collect();
    compute_page_order_for(&pages, config)
}

/// Page order for an arbitrary selection of source pages, taken in the given
/// order. Blanks pad the end of the selection.
pub fn compute_page_order_for(pages: &[u32], config: &ImpositionConfig) -> Vec<PageAssignment> {
    if pages.is_empty() {
        return Vec::new();
    }

    let plan = config.fold_plan();
    log::debug!(
        "ordering {} pages as {}-up {:?} with {:?}",
        pages.len(),
        config.n,
        config.kind,
        plan
    );

    match plan.fold {
        Fold::Plain => plain_order(pages, config),
        Fold::Side | Fold::Top => booklet_order(pages, config, plan),
    }
}

/// Pages padded to a whole number of sheets
pub fn padded_page_count(page_count: usize, config: &ImpositionConfig) -> usize {
    let unit = if config.kind.is_booklet() {
        2 * config.n
    } else {
        config.n
    };
    page_count.div_ceil(unit) * unit
}

/// Lengths of the signatures a padded booklet is split into
pub fn signature_lengths(padded: usize, config: &ImpositionConfig) -> Vec<usize> {
    if padded == 0 {
        return Vec::new();
    }
    if !config.multi_folio {
        return vec![padded];
    }
    let per_signature = config
        .folio_size
        .saturating_mul(2 * config.n)
        .clamp(1, padded);
    let mut lengths = vec![per_signature; padded / per_signature];
    if padded % per_signature != 0 {
        lengths.push(padded % per_signature);
    }
    lengths
}

fn plain_order(pages: &[u32], config: &ImpositionConfig) -> Vec<PageAssignment> {
    let grid = config.grid;
    let mut assignments = Vec::with_capacity(padded_page_count(pages.len(), config));

    for (sheet_index, chunk) in pages.chunks(config.n).enumerate() {
        let mut cells: Vec<Option<u32>> = vec![None; grid.cell_count()];
        for (slot, &page) in chunk.iter().enumerate() {
            cells[fill_cell(grid, config.cell_order, slot)] = Some(page);
        }
        assignments.extend(
            cells
                .into_iter()
                .enumerate()
                .map(|(cell_index, source_page)| PageAssignment {
                    sheet_index,
                    side: SheetSide::Front,
                    cell_index,
                    source_page,
                    rotation: Rotation::None,
                }),
        );
    }

    assignments
}

/// A cell on one side of a sheet, numbered within its signature (1-based)
#[derive(Debug, Clone, Copy)]
struct Face {
    page: usize,
    rotation: Rotation,
}

impl Face {
    fn upright(page: usize) -> Self {
        Self {
            page,
            rotation: Rotation::None,
        }
    }

    fn inverted(page: usize) -> Self {
        Self {
            page,
            rotation: Rotation::Clockwise180,
        }
    }
}

/// The four faces of leaf `k` in a signature of `size` pages
struct Leaf {
    outside_high: usize,
    outside_low: usize,
    inside_low: usize,
    inside_high: usize,
}

impl Leaf {
    fn new(size: usize, k: usize) -> Self {
        Self {
            outside_high: size - 2 * k,
            outside_low: 1 + 2 * k,
            inside_low: 2 + 2 * k,
            inside_high: size - 1 - 2 * k,
        }
    }
}

/// The page printed behind `page` on the same leaf
fn partner(page: usize) -> usize {
    if page % 2 == 1 { page + 1 } else { page - 1 }
}

fn booklet_order(pages: &[u32], config: &ImpositionConfig, plan: FoldPlan) -> Vec<PageAssignment> {
    let grid = config.grid;
    let padded = padded_page_count(pages.len(), config);
    let mut assignments = Vec::with_capacity(padded);
    let mut offset = 0;
    let mut sheet_index = 0;

    for size in signature_lengths(padded, config) {
        let source = |local: usize| pages.get(offset + local - 1).copied();

        for sheet in 0..size / (2 * config.n) {
            let front = front_faces(grid, plan.fold, size, sheet);
            let back = back_faces(grid, &front, plan.turned_back);

            for (side, faces) in [(SheetSide::Front, front), (SheetSide::Back, back)] {
                assignments.extend(faces.into_iter().enumerate().map(|(cell_index, face)| {
                    PageAssignment {
                        sheet_index,
                        side,
                        cell_index,
                        source_page: source(face.page),
                        rotation: face.rotation,
                    }
                }));
            }
            sheet_index += 1;
        }

        offset += size;
    }

    assignments
}

/// Row-major front faces of one sheet
fn front_faces(grid: GridShape, fold: Fold, size: usize, sheet: usize) -> Vec<Face> {
    let mut faces = vec![Face::upright(0); grid.cell_count()];

    match fold {
        Fold::Side => {
            let head_to_head = grid.rows % 2 == 0;
            for row in 0..grid.rows {
                let leaf = Leaf::new(size, sheet * grid.rows + row);
                let (left, right) = if head_to_head && row % 2 == 1 {
                    (
                        Face::inverted(leaf.inside_high),
                        Face::inverted(leaf.inside_low),
                    )
                } else {
                    (
                        Face::upright(leaf.outside_high),
                        Face::upright(leaf.outside_low),
                    )
                };
                faces[grid.cell_index(row, 0)] = left;
                faces[grid.cell_index(row, 1)] = right;
            }
        }
        Fold::Top => {
            let alternate = grid.cols % 2 == 0;
            for col in 0..grid.cols {
                let leaf = Leaf::new(size, sheet * grid.cols + col);
                let (top, bottom) = if alternate && col % 2 == 1 {
                    (leaf.outside_low, leaf.outside_high)
                } else {
                    (leaf.outside_high, leaf.outside_low)
                };
                faces[grid.cell_index(0, col)] = Face::inverted(top);
                faces[grid.cell_index(1, col)] = Face::upright(bottom);
            }
        }
        Fold::Plain => {}
    }

    faces
}

/// Row-major back faces: each cell backs the horizontally mirrored front cell.
fn back_faces(grid: GridShape, front: &[Face], turned: bool) -> Vec<Face> {
    let mut faces: Vec<Face> = (0..grid.cell_count())
        .map(|cell| {
            let (row, col) = grid.position(cell);
            let mirror = front[grid.cell_index(row, grid.cols - 1 - col)];
            Face {
                page: partner(mirror.page),
                rotation: mirror.rotation,
            }
        })
        .collect();

    if turned {
        faces.reverse();
        for face in &mut faces {
            face.rotation = face.rotation.half_turned();
        }
    }

    faces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(n: usize, options: &str) -> ImpositionConfig {
        ImpositionConfig::booklet(n, options).unwrap()
    }

    fn pages(assignments: &[PageAssignment]) -> Vec<u32> {
        assignments
            .iter()
            .map(|a| a.source_page.unwrap_or(0))
            .collect()
    }

    #[test]
    fn test_fold_plan_table() {
        use Binding::*;
        use LayoutKind::*;
        use Orientation::*;

        assert_eq!(
            FoldPlan::select(Booklet, Long, Portrait),
            FoldPlan::new(Fold::Side, false)
        );
        assert_eq!(
            FoldPlan::select(Booklet, Short, Landscape),
            FoldPlan::new(Fold::Side, true)
        );
        assert_eq!(
            FoldPlan::select(Booklet, Short, Portrait),
            FoldPlan::new(Fold::Top, false)
        );
        assert_eq!(
            FoldPlan::select(BookletTopfold, Long, Landscape),
            FoldPlan::new(Fold::Top, true)
        );
        assert_eq!(FoldPlan::select(PlainNUp, Short, Landscape).fold, Fold::Plain);
    }

    #[test]
    fn test_side_fold_follows_natural_binding() {
        for orientation in [Orientation::Portrait, Orientation::Landscape] {
            for binding in [Binding::Long, Binding::Short] {
                let plan = FoldPlan::select(LayoutKind::Booklet, binding, orientation);
                assert_eq!(
                    plan.fold == Fold::Side,
                    binding == Binding::natural_for(orientation),
                    "{binding:?} on {orientation:?}"
                );
                assert_eq!(plan.turned_back, orientation == Orientation::Landscape);
            }
        }
    }

    #[test]
    fn test_leaf_faces() {
        let leaf = Leaf::new(16, 1);
        assert_eq!(
            (leaf.outside_high, leaf.outside_low, leaf.inside_low, leaf.inside_high),
            (14, 3, 4, 13)
        );
        assert_eq!(partner(14), 13);
        assert_eq!(partner(3), 4);
    }

    #[test]
    fn test_side_fold_rotations() {
        let order = compute_page_order(8, &config(4, "papersize:A5"));
        let rotations: Vec<i32> = order.iter().map(|a| a.rotation.degrees()).collect();
        assert_eq!(rotations, vec![0, 0, 180, 180, 0, 0, 180, 180]);
    }

    #[test]
    fn test_top_fold_inverts_top_row() {
        let order = compute_page_order(8, &config(4, "papersize:A5, btype:booklet-topfold"));
        let rotations: Vec<i32> = order.iter().map(|a| a.rotation.degrees()).collect();
        assert_eq!(rotations, vec![180, 180, 0, 0, 180, 180, 0, 0]);
    }

    #[test]
    fn test_turned_back_flips_rotation() {
        let order = compute_page_order(8, &config(4, "papersize:A5L, binding:short"));
        let back: Vec<i32> = order[4..].iter().map(|a| a.rotation.degrees()).collect();
        assert_eq!(back, vec![0, 0, 180, 180]);
        assert_eq!(pages(&order[4..]), vec![6, 3, 7, 2]);
    }

    #[test]
    fn test_folio_two_up() {
        let order = compute_page_order(4, &config(2, "papersize:A4L, binding:short"));
        assert_eq!(pages(&order), vec![4, 1, 3, 2]);
    }

    #[test]
    fn test_short_document_is_padded_with_blanks() {
        let order = compute_page_order(5, &config(4, "papersize:A5"));
        assert_eq!(order.len(), 8);
        assert_eq!(order.iter().filter(|a| a.is_blank()).count(), 3);
        // blanks take the highest positions 6..=8
        assert_eq!(order[0].source_page, None);
        assert_eq!(order[1].source_page, Some(1));
    }

    #[test]
    fn test_signature_lengths() {
        let single = config(4, "papersize:A5");
        assert_eq!(signature_lengths(24, &single), vec![24]);

        let folios = config(4, "papersize:A5, multifolio:on, foliosize:2");
        assert_eq!(signature_lengths(40, &folios), vec![16, 16, 8]);
    }

    #[test]
    fn test_multifolio_nests_each_signature() {
        let order = compute_page_order(16, &config(4, "papersize:A5, multifolio:on, foliosize:1"));
        assert_eq!(
            pages(&order),
            vec![8, 1, 5, 4, 2, 7, 3, 6, 16, 9, 13, 12, 10, 15, 11, 14]
        );
        assert_eq!(order[8].sheet_index, 1);
    }

    #[test]
    fn test_plain_nup_order() {
        let config = ImpositionConfig::nup(4, "papersize:A4, order:dr").unwrap();
        let order = compute_page_order(6, &config);
        assert_eq!(pages(&order), vec![1, 3, 2, 4, 5, 0, 6, 0]);
        assert!(order.iter().all(|a| a.side == SheetSide::Front));
        assert_eq!(order[4].sheet_index, 1);
    }

    #[test]
    fn test_empty_document() {
        assert!(compute_page_order(0, &config(4, "papersize:A5")).is_empty());
    }

    #[test]
    fn test_selection_keeps_given_pages() {
        let order = compute_page_order_for(
            &[3, 4, 7, 9],
            &config(2, "papersize:A4L, binding:short"),
        );
        // local pages 4,1 | 3,2 map onto the selection
        assert_eq!(pages(&order), vec![9, 3, 7, 4]);
    }
}
