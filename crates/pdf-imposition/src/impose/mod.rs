//! PDF imposition
//!
//! This module drives the imposition of whole documents:
//! 1. Collect source pages across the input documents
//! 2. Compute the page order for the configured layout
//! 3. Render each sheet side, placing pages with their placement matrices

mod io;
mod sheet;

pub use io::{load_multiple_pdfs, load_pdf, save_pdf};

use crate::content::page_box;
use crate::layout::{CellGeometry, compute_page_order};
use crate::options::ImpositionConfig;
use crate::types::*;
use lopdf::{Dictionary, Document, Object};
use sheet::{RenderCache, SheetContext, SourcePage, render_sheet_side};

/// Impose the pages of `documents`, in order, onto sheets described by `config`.
pub async fn impose(documents: &[Document], config: &ImpositionConfig) -> Result<Document> {
    config.validate()?;

    let documents = documents.to_vec();
    let config = config.clone();

    tokio::task::spawn_blocking(move || impose_sync(&documents, &config)).await?
}

fn impose_sync(documents: &[Document], config: &ImpositionConfig) -> Result<Document> {
    let sources: Vec<SourcePage> = documents
        .iter()
        .enumerate()
        .flat_map(|(doc, document)| {
            document.get_pages().into_values().map(move |page_id| SourcePage {
                doc,
                page_id,
                bbox: page_box(document, page_id),
            })
        })
        .collect();

    if sources.is_empty() {
        return Err(ImposeError::NoPages);
    }

    let assignments = compute_page_order(sources.len() as u32, config);

    let mut output = Document::with_version("1.7");
    let pages_id = output.new_object_id();
    let ctx = SheetContext {
        documents,
        sources: &sources,
        config,
        geometry: CellGeometry::new(config.grid, config.paper.width, config.paper.height),
        parent_pages_id: pages_id,
    };
    let mut cache = RenderCache::new(documents.len());

    let mut kids = Vec::new();
    for side in assignments.chunk_by(|a, b| a.sheet_index == b.sheet_index && a.side == b.side) {
        let page_id = render_sheet_side(&mut output, &ctx, side, &mut cache)?;
        kids.push(Object::Reference(page_id));
    }

    log::info!(
        "imposed {} source pages onto {} output pages ({}-up {:?} on {})",
        sources.len(),
        kids.len(),
        config.n,
        config.kind,
        config.paper.name
    );

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(kids.len() as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    output.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    output.trailer.set("Root", catalog_id);

    Ok(output)
}
