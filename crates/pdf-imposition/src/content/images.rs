//! Image XObject listing and replacement

use crate::types::{ImposeError, Result};
use image::{ColorType, ImageFormat};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::lopdf_source::{page_id, page_resources, resolve};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An image XObject reachable from a page
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageInfo {
    /// Resource name the image is registered under
    pub name: String,
    pub object_id: ObjectId,
    pub width: i64,
    pub height: i64,
    pub bits_per_component: Option<i64>,
    pub color_space: Option<String>,
    pub filter: Option<String>,
}

/// List image XObjects on a 1-based page, including those inside forms.
///
/// Each image object is listed once, under the first name that reaches it.
pub fn list_page_images(doc: &Document, page: u32) -> Result<Vec<ImageInfo>> {
    let id = page_id(doc, page)?;
    let mut images = Vec::new();
    let mut seen = HashSet::new();

    if let Some(resources) = page_resources(doc, id) {
        collect_images(doc, resources, &mut seen, &mut images);
    }

    Ok(images)
}

/// Images of one page
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageImages {
    pub page: u32,
    pub images: Vec<ImageInfo>,
}

/// List images on each selected page, in the given order.
///
/// An empty selection lists every page of the document.
pub fn list_images(doc: &Document, pages: &[u32]) -> Result<Vec<PageImages>> {
    let selection: Vec<u32> = if pages.is_empty() {
        doc.get_pages().keys().copied().collect()
    } else {
        pages.to_vec()
    };

    selection
        .into_iter()
        .map(|page| list_page_images(doc, page).map(|images| PageImages { page, images }))
        .collect()
}

/// Image listing of one input file
#[derive(Debug)]
pub struct FileImages {
    pub path: PathBuf,
    pub pages: Result<Vec<PageImages>>,
}

/// List images across several files.
///
/// With more than one file a file that fails to load or list is reported in
/// its entry and the remaining files are still listed. A single file's
/// failure is returned as the error.
pub async fn list_images_in_files(
    paths: &[impl AsRef<Path>],
    pages: &[u32],
) -> Result<Vec<FileImages>> {
    let mut listings = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let listing = match crate::impose::load_pdf(path).await {
            Ok(doc) => list_images(&doc, pages),
            Err(e) => Err(e),
        };

        match listing {
            Err(e) if paths.len() == 1 => return Err(e),
            Err(e) => {
                log::warn!("problem processing {}: {e}", path.display());
                listings.push(FileImages {
                    path: path.to_owned(),
                    pages: Err(e),
                });
            }
            Ok(found) => listings.push(FileImages {
                path: path.to_owned(),
                pages: Ok(found),
            }),
        }
    }

    Ok(listings)
}

/// Replace the image object `object_id` painted on a 1-based page.
///
/// The object keeps its id, so every resource dictionary naming it picks up
/// the replacement. `Type` and `Subtype` are forced to an image XObject.
pub fn alter_image(
    doc: &mut Document,
    page: u32,
    object_id: ObjectId,
    mut replacement: Stream,
) -> Result<()> {
    let on_page = list_page_images(doc, page)?
        .iter()
        .any(|image| image.object_id == object_id);
    if !on_page {
        return Err(ImposeError::ImageNotFound { page, object_id });
    }

    replacement.dict.set("Type", Object::Name(b"XObject".to_vec()));
    replacement.dict.set("Subtype", Object::Name(b"Image".to_vec()));
    doc.objects.insert(object_id, Object::Stream(replacement));

    log::info!(
        "replaced image {} {} R on page {page}",
        object_id.0,
        object_id.1
    );
    Ok(())
}

/// Build an image XObject stream from encoded JPEG or PNG bytes.
///
/// JPEG data is embedded as-is with `DCTDecode`; other formats are decoded
/// to 8-bit gray or RGB samples.
pub fn image_stream_from_bytes(bytes: &[u8]) -> Result<Stream> {
    let format = image::guess_format(bytes)?;
    let decoded = image::load_from_memory_with_format(bytes, format)?;
    let gray = matches!(
        decoded.color(),
        ColorType::L8 | ColorType::L16 | ColorType::La8 | ColorType::La16
    );

    let mut dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(i64::from(decoded.width()))),
        ("Height", Object::Integer(i64::from(decoded.height()))),
        ("BitsPerComponent", Object::Integer(8)),
    ]);
    let color_space: &[u8] = if gray { b"DeviceGray" } else { b"DeviceRGB" };
    dict.set("ColorSpace", Object::Name(color_space.to_vec()));

    if format == ImageFormat::Jpeg {
        dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
        return Ok(Stream::new(dict, bytes.to_vec()).with_compression(false));
    }

    let samples = if gray {
        decoded.to_luma8().into_raw()
    } else {
        decoded.to_rgb8().into_raw()
    };
    Ok(Stream::new(dict, samples))
}

fn collect_images(
    doc: &Document,
    resources: &Dictionary,
    seen: &mut HashSet<ObjectId>,
    images: &mut Vec<ImageInfo>,
) {
    let Some(xobjects) = resources
        .get(b"XObject")
        .ok()
        .and_then(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_dict().ok())
    else {
        return;
    };

    for (name, value) in xobjects.iter() {
        let Ok(id) = value.as_reference() else {
            continue;
        };
        if !seen.insert(id) {
            continue;
        }
        let Ok(stream) = doc.get_object(id).and_then(Object::as_stream) else {
            continue;
        };

        match stream.dict.get(b"Subtype").and_then(Object::as_name) {
            Ok(b"Image") => images.push(image_info(doc, name, id, &stream.dict)),
            Ok(b"Form") => {
                if let Some(nested) = stream
                    .dict
                    .get(b"Resources")
                    .ok()
                    .and_then(|obj| resolve(doc, obj))
                    .and_then(|obj| obj.as_dict().ok())
                {
                    collect_images(doc, nested, seen, images);
                }
            }
            _ => {}
        }
    }
}

fn image_info(doc: &Document, name: &[u8], object_id: ObjectId, dict: &Dictionary) -> ImageInfo {
    let integer = |key: &[u8]| {
        dict.get(key)
            .ok()
            .and_then(|obj| resolve(doc, obj))
            .and_then(|obj| obj.as_i64().ok())
    };

    ImageInfo {
        name: String::from_utf8_lossy(name).into_owned(),
        object_id,
        width: integer(b"Width").unwrap_or(0),
        height: integer(b"Height").unwrap_or(0),
        bits_per_component: integer(b"BitsPerComponent"),
        color_space: dict
            .get(b"ColorSpace")
            .ok()
            .and_then(|obj| resolve(doc, obj))
            .and_then(describe_name),
        filter: dict
            .get(b"Filter")
            .ok()
            .and_then(|obj| resolve(doc, obj))
            .and_then(describe_name),
    }
}

/// A name, or the first name of an array such as `[/ICCBased 12 0 R]`
fn describe_name(obj: &Object) -> Option<String> {
    match obj {
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        Object::Array(items) => items.first().and_then(describe_name),
        _ => None,
    }
}
