//! Reading geometry back out of existing pages
//!
//! - `ContentSource`: the document-model boundary (tokens, resources, boxes)
//! - The CTM interpreter that resolves where XObjects are painted
//! - A lopdf-backed source, image listing and image replacement

mod images;
mod interpreter;
mod lopdf_source;
mod source;

pub use images::{
    FileImages, ImageInfo, PageImages, alter_image, image_stream_from_bytes, list_images,
    list_images_in_files, list_page_images,
};
pub use interpreter::{ImagePositionResult, TargetNames, resolve_positions};
pub use lopdf_source::LopdfScope;
pub use source::{ContentSource, XObjectRef};

pub(crate) use lopdf_source::{page_box, page_content, page_resources};
