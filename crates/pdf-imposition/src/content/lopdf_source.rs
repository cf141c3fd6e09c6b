//! [`ContentSource`] over a `lopdf::Document`

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::layout::Rect;
use crate::types::{ImposeError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId};

use super::interpreter::{matrix_operands, number};
use super::{ContentSource, XObjectRef};

/// Token scopes of a lopdf document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LopdfScope {
    Page(ObjectId),
    /// A form XObject whose names resolve against the `/Resources` of
    /// `resources`: the form itself, or the nearest enclosing page or form
    /// that has them.
    Form { id: ObjectId, resources: ObjectId },
}

impl LopdfScope {
    /// Object whose `/Resources` this scope's names resolve against
    pub fn resources_owner(&self) -> ObjectId {
        match *self {
            LopdfScope::Page(id) => id,
            LopdfScope::Form { resources, .. } => resources,
        }
    }
}

/// Page-tree depth at which attribute inheritance gives up
const MAX_INHERITANCE_DEPTH: usize = 64;

impl ContentSource for Document {
    type Scope = LopdfScope;

    fn page_scope(&self, page: u32) -> Result<LopdfScope> {
        page_id(self, page).map(LopdfScope::Page)
    }

    fn content_tokens(&self, scope: &LopdfScope) -> Result<Vec<Operation>> {
        let bytes = match *scope {
            LopdfScope::Page(id) => page_content(self, self.get_dictionary(id)?)?,
            LopdfScope::Form { id, .. } => {
                let stream = self.get_object(id)?.as_stream()?;
                stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone())
            }
        };
        Ok(Content::decode(&bytes)?.operations)
    }

    fn resolve_xobject(&self, scope: &LopdfScope, name: &[u8]) -> Option<XObjectRef<LopdfScope>> {
        let resources = owned_resources(self, scope.resources_owner())?;
        let xobjects = resolve(self, resources.get(b"XObject").ok()?)?
            .as_dict()
            .ok()?;
        let id = xobjects.get(name).ok()?.as_reference().ok()?;
        let stream = self.get_object(id).ok()?.as_stream().ok()?;

        match stream.dict.get(b"Subtype").ok()?.as_name().ok()? {
            b"Image" => Some(XObjectRef::Image),
            b"Form" => {
                let matrix = stream
                    .dict
                    .get(b"Matrix")
                    .ok()
                    .and_then(|m| resolve(self, m))
                    .and_then(|m| m.as_array().ok())
                    .and_then(|m| matrix_operands(m))
                    .unwrap_or_default();
                let resources = if stream.dict.has(b"Resources") {
                    id
                } else {
                    scope.resources_owner()
                };
                Some(XObjectRef::Form {
                    scope: LopdfScope::Form { id, resources },
                    matrix,
                })
            }
            _ => None,
        }
    }

    fn page_bounding_box(&self, page: u32) -> Result<Rect> {
        let id = page_id(self, page)?;
        Ok(page_box(self, id))
    }
}

// =============================================================================
// Page Helpers
// =============================================================================

pub(crate) fn page_id(doc: &Document, page: u32) -> Result<ObjectId> {
    doc.get_pages()
        .get(&page)
        .copied()
        .ok_or(ImposeError::PageNotFound(page))
}

/// Follow a reference, if `obj` is one
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Look up a page attribute, walking up the page tree for inherited ones.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return resolve(doc, value);
        }
        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

pub(crate) fn page_resources(doc: &Document, page_id: ObjectId) -> Option<&Dictionary> {
    inherited_attribute(doc, page_id, b"Resources")?
        .as_dict()
        .ok()
}

/// `/Resources` of a form stream, or the inherited resources of a page
fn owned_resources(doc: &Document, owner: ObjectId) -> Option<&Dictionary> {
    match doc.get_object(owner).ok()? {
        Object::Stream(stream) => resolve(doc, stream.dict.get(b"Resources").ok()?)?
            .as_dict()
            .ok(),
        _ => page_resources(doc, owner),
    }
}

/// The page's MediaBox, US Letter when absent or malformed
pub(crate) fn page_box(doc: &Document, page_id: ObjectId) -> Rect {
    inherited_attribute(doc, page_id, b"MediaBox")
        .and_then(|obj| obj.as_array().ok())
        .and_then(|values| {
            let coords: Vec<f32> = values
                .iter()
                .filter_map(|v| resolve(doc, v).and_then(number))
                .collect();
            match coords.as_slice() {
                [x0, y0, x1, y1] => Some(Rect::from_corners(*x0, *y0, *x1, *y1)),
                _ => None,
            }
        })
        .unwrap_or_else(|| {
            Rect::new(0.0, 0.0, DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1)
        })
}

/// Get the content stream data from a page.
pub(crate) fn page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // No content = blank page
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Array(parts) => concatenated_streams(doc, parts),
            Object::Stream(stream) => Ok(stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone())),
            _ => Ok(Vec::new()),
        },
        Object::Array(parts) => concatenated_streams(doc, parts),
        _ => Ok(Vec::new()),
    }
}

/// Concatenate multiple content streams
fn concatenated_streams(doc: &Document, refs: &[Object]) -> Result<Vec<u8>> {
    let mut result = Vec::new();

    for obj in refs {
        if let Object::Reference(id) = obj {
            if let Ok(stream) = doc.get_object(*id)?.as_stream() {
                let content = stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone());
                result.extend_from_slice(&content);
                result.push(b'\n');
            }
        }
    }

    Ok(result)
}
