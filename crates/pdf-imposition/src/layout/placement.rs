//! Content placement within cells
//!
//! Computes the matrix that maps a source page's box into a destination
//! cell: rotate, then scale into the cell minus margin and border, then
//! translate so the result is centered in the cell.

use crate::matrix::AffineMatrix;
use crate::types::{GeometryError, Orientation, Rotation, ScalingMode};

use super::Rect;

/// How content is fitted into a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Space kept clear on every side of the cell (margin plus border)
    pub inset: f32,
    pub scaling: ScalingMode,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            inset: 0.0,
            scaling: ScalingMode::Fit,
        }
    }
}

/// Placement transform for `source_bbox` drawn into `cell` with `rotation`.
pub fn placement_matrix(
    cell: &Rect,
    rotation: Rotation,
    source_bbox: &Rect,
    fit: &FitOptions,
) -> Result<AffineMatrix, GeometryError> {
    if source_bbox.is_degenerate() {
        return Err(GeometryError::DegenerateBounds(format!(
            "source box {}x{}",
            source_bbox.width, source_bbox.height
        )));
    }
    if cell.is_degenerate() {
        return Err(GeometryError::DegenerateBounds(format!(
            "cell {}x{}",
            cell.width, cell.height
        )));
    }

    let available = cell.inset(fit.inset);
    if available.is_degenerate() {
        return Err(GeometryError::DegenerateBounds(format!(
            "cell {}x{} has no room inside an inset of {}",
            cell.width, cell.height, fit.inset
        )));
    }

    // Rotate about the source origin
    let rotate = AffineMatrix::translate(-source_bbox.x, -source_bbox.y)
        .multiply(&AffineMatrix::rotation(rotation));
    let rotated = transformed_bounds(&rotate, source_bbox);

    let (sx, sy) = calculate_scale(
        rotated.width,
        rotated.height,
        available.width,
        available.height,
        fit.scaling,
    );
    let scaled = rotate.multiply(&AffineMatrix::scale(sx, sy));

    let tx = cell.center_x() - (rotated.x + rotated.width / 2.0) * sx;
    let ty = cell.center_y() - (rotated.y + rotated.height / 2.0) * sy;

    Ok(scaled.multiply(&AffineMatrix::translate(tx, ty)))
}

/// Rotation that turns a source page to match the cell orientation.
pub fn best_fit_rotation(source_bbox: &Rect, cell: &Rect) -> Rotation {
    let source = Orientation::of(source_bbox.width, source_bbox.height);
    let target = Orientation::of(cell.width, cell.height);
    if source == target || source_bbox.width == source_bbox.height || cell.width == cell.height {
        Rotation::None
    } else {
        Rotation::Clockwise90
    }
}

/// Axis-aligned bounds of `rect` after applying `m`
pub fn transformed_bounds(m: &AffineMatrix, rect: &Rect) -> Rect {
    let corners = [
        m.transform_point(rect.x, rect.y),
        m.transform_point(rect.right(), rect.y),
        m.transform_point(rect.x, rect.top()),
        m.transform_point(rect.right(), rect.top()),
    ];
    let (mut x0, mut y0) = corners[0];
    let (mut x1, mut y1) = corners[0];
    for &(x, y) in &corners[1..] {
        x0 = x0.min(x);
        y0 = y0.min(y);
        x1 = x1.max(x);
        y1 = y1.max(y);
    }
    Rect::from_corners(x0, y0, x1, y1)
}

/// Calculate (x, y) scale factors for fitting source to target dimensions.
fn calculate_scale(
    src_width: f32,
    src_height: f32,
    target_width: f32,
    target_height: f32,
    mode: ScalingMode,
) -> (f32, f32) {
    let scale_w = target_width / src_width;
    let scale_h = target_height / src_height;
    match mode {
        ScalingMode::Fit => {
            let s = scale_w.min(scale_h);
            (s, s)
        }
        ScalingMode::Fill => {
            let s = scale_w.max(scale_h);
            (s, s)
        }
        ScalingMode::None => (1.0, 1.0),
        ScalingMode::Stretch => (scale_w, scale_h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit() -> FitOptions {
        FitOptions::default()
    }

    fn assert_close(actual: (f32, f32), expected: (f32, f32)) {
        assert!(
            (actual.0 - expected.0).abs() < 1e-3 && (actual.1 - expected.1).abs() < 1e-3,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_scale_fit() {
        // Source is 800x600, target is 400x400: width-limited
        assert_eq!(calculate_scale(800.0, 600.0, 400.0, 400.0, ScalingMode::Fit), (0.5, 0.5));
        // Source is 400x800, target is 400x400: height-limited
        assert_eq!(calculate_scale(400.0, 800.0, 400.0, 400.0, ScalingMode::Fit), (0.5, 0.5));
    }

    #[test]
    fn test_scale_fill_and_stretch() {
        assert_eq!(calculate_scale(800.0, 600.0, 400.0, 400.0, ScalingMode::Fill), (2.0 / 3.0, 2.0 / 3.0));
        assert_eq!(calculate_scale(800.0, 600.0, 400.0, 300.0, ScalingMode::Stretch), (0.5, 0.5));
        assert_eq!(calculate_scale(800.0, 600.0, 400.0, 600.0, ScalingMode::Stretch), (0.5, 1.0));
        assert_eq!(calculate_scale(800.0, 600.0, 1.0, 1.0, ScalingMode::None), (1.0, 1.0));
    }

    #[test]
    fn test_identity_when_source_matches_cell() {
        let cell = Rect::new(0.0, 0.0, 612.0, 792.0);
        let m = placement_matrix(&cell, Rotation::None, &cell, &fit()).unwrap();
        assert!(m.approx_eq(&AffineMatrix::identity()));
    }

    #[test]
    fn test_fit_is_centered() {
        // 612x792 into a 300x300 cell at (100, 50)
        let cell = Rect::new(100.0, 50.0, 300.0, 300.0);
        let source = Rect::new(0.0, 0.0, 612.0, 792.0);
        let m = placement_matrix(&cell, Rotation::None, &source, &fit()).unwrap();

        let s = 300.0 / 792.0;
        let placed = transformed_bounds(&m, &source);
        assert!((placed.height - 300.0).abs() < 1e-3);
        assert!((placed.width - 612.0 * s).abs() < 1e-3);
        assert_close((placed.center_x(), placed.center_y()), (250.0, 200.0));
    }

    #[test]
    fn test_half_turn_maps_corners() {
        let cell = Rect::new(0.0, 0.0, 200.0, 300.0);
        let source = Rect::new(0.0, 0.0, 200.0, 300.0);
        let m = placement_matrix(&cell, Rotation::Clockwise180, &source, &fit()).unwrap();
        assert!(m.approx_eq(&AffineMatrix::new(-1.0, 0.0, 0.0, -1.0, 200.0, 300.0)));
        assert_close(m.transform_point(0.0, 0.0), (200.0, 300.0));
    }

    #[test]
    fn test_quarter_turn_swaps_extent() {
        // Landscape source into a portrait cell of the same proportions
        let cell = Rect::new(0.0, 0.0, 300.0, 400.0);
        let source = Rect::new(0.0, 0.0, 400.0, 300.0);
        let m = placement_matrix(&cell, Rotation::Clockwise90, &source, &fit()).unwrap();
        let placed = transformed_bounds(&m, &source);
        assert_close((placed.width, placed.height), (300.0, 400.0));
        assert_close((placed.x, placed.y), (0.0, 0.0));
        // The source's top-left corner ends at the cell's top-right
        assert_close(m.transform_point(0.0, 300.0), (300.0, 400.0));
    }

    #[test]
    fn test_offset_source_box() {
        let cell = Rect::new(0.0, 0.0, 100.0, 100.0);
        let source = Rect::new(50.0, 50.0, 100.0, 100.0);
        let m = placement_matrix(&cell, Rotation::None, &source, &fit()).unwrap();
        assert_close(m.transform_point(50.0, 50.0), (0.0, 0.0));
        assert_close(m.transform_point(150.0, 150.0), (100.0, 100.0));
    }

    #[test]
    fn test_inset_shrinks_content() {
        let cell = Rect::new(0.0, 0.0, 100.0, 100.0);
        let options = FitOptions {
            inset: 10.0,
            scaling: ScalingMode::Fit,
        };
        let m = placement_matrix(&cell, Rotation::None, &cell, &options).unwrap();
        assert_close(m.transform_point(0.0, 0.0), (10.0, 10.0));
        assert_close(m.transform_point(100.0, 100.0), (90.0, 90.0));
    }

    #[test]
    fn test_degenerate_bounds() {
        let cell = Rect::new(0.0, 0.0, 100.0, 100.0);
        let empty = Rect::new(0.0, 0.0, 0.0, 100.0);
        assert!(placement_matrix(&cell, Rotation::None, &empty, &fit()).is_err());
        assert!(placement_matrix(&empty, Rotation::None, &cell, &fit()).is_err());

        let crowded = FitOptions {
            inset: 50.0,
            scaling: ScalingMode::Fit,
        };
        assert!(matches!(
            placement_matrix(&cell, Rotation::None, &cell, &crowded),
            Err(GeometryError::DegenerateBounds(_))
        ));
    }

    #[test]
    fn test_best_fit_rotation() {
        let portrait = Rect::new(0.0, 0.0, 100.0, 200.0);
        let landscape = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(best_fit_rotation(&portrait, &portrait), Rotation::None);
        assert_eq!(best_fit_rotation(&landscape, &portrait), Rotation::Clockwise90);
    }
}
