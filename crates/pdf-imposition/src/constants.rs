//! Shared constants for imposition and content interpretation

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Imposition Defaults
// =============================================================================

/// Frame width used when `border:on` is given without an explicit width
pub const DEFAULT_BORDER_WIDTH: f32 = 1.0;

/// Sheets per signature in multi-folio mode when `foliosize` is not given
pub const DEFAULT_FOLIO_SIZE: usize = 8;

// =============================================================================
// Content Interpretation
// =============================================================================

/// Maximum nesting of form XObjects followed while resolving positions
pub const MAX_FORM_DEPTH: usize = 32;

/// Maximum number of form XObjects entered while resolving one page
pub const MAX_FORM_VISITS: usize = 4096;

/// Tolerance for treating matrix coefficients as equal
pub const MATRIX_EPSILON: f32 = 1e-4;
