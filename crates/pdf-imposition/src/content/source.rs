//! The document-model boundary used by the interpreter

use crate::layout::Rect;
use crate::matrix::AffineMatrix;
use crate::types::Result;
use lopdf::content::Operation;
use std::fmt::Debug;
use std::hash::Hash;

/// What a `Do` operand names
#[derive(Debug, Clone, PartialEq)]
pub enum XObjectRef<S> {
    Image,
    /// A form whose content is walked with its own tokens scope
    Form { scope: S, matrix: AffineMatrix },
}

/// Read access to page content streams and their named resources.
///
/// A scope identifies one token stream together with the resources its
/// names resolve against: a page, or a form XObject.
pub trait ContentSource {
    type Scope: Clone + Eq + Hash + Debug;

    /// Scope of a 1-based page number
    fn page_scope(&self, page: u32) -> Result<Self::Scope>;

    /// Decoded operator/operand records of a scope
    fn content_tokens(&self, scope: &Self::Scope) -> Result<Vec<Operation>>;

    /// Resolve a `Do` name within a scope; `None` when the name is unknown
    fn resolve_xobject(&self, scope: &Self::Scope, name: &[u8]) -> Option<XObjectRef<Self::Scope>>;

    /// Natural bounding box of a page
    fn page_bounding_box(&self, page: u32) -> Result<Rect>;
}
