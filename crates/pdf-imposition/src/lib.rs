pub mod constants;
pub mod content;
pub mod impose;
pub mod layout;
mod matrix;
mod options;
mod paper;
mod render;
mod stats;
mod types;

pub use content::{
    ContentSource, FileImages, ImageInfo, ImagePositionResult, LopdfScope, PageImages,
    TargetNames, XObjectRef, alter_image, image_stream_from_bytes, list_images,
    list_images_in_files, list_page_images, resolve_positions,
};
pub use impose::{impose, load_multiple_pdfs, load_pdf, save_pdf};
pub use layout::{
    FoldPlan, PageAssignment, Rect, SheetSide, compute_page_order, compute_page_order_for,
    placement_matrix,
};
pub use matrix::AffineMatrix;
pub use options::*;
pub use paper::{PaperSize, known_paper_sizes, lookup_paper_size};
pub use stats::calculate_statistics;
pub use types::*;
