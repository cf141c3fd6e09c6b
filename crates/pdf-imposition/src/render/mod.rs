//! PDF rendering for imposition
//!
//! - Creating Form XObjects from source pages
//! - Deep copying PDF objects between documents

mod xobject;

pub use xobject::create_page_xobject;
