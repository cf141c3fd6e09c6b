use crate::layout::{padded_page_count, signature_lengths};
use crate::options::ImpositionConfig;
use crate::types::*;

/// Calculate statistics for imposing `source_pages` pages
pub fn calculate_statistics(
    source_pages: usize,
    config: &ImpositionConfig,
) -> Result<ImpositionStatistics> {
    if source_pages == 0 {
        return Err(ImposeError::NoPages);
    }

    let padded_count = padded_page_count(source_pages, config);
    let blank_pages_added = padded_count - source_pages;

    if config.kind.is_booklet() {
        let lengths = signature_lengths(padded_count, config);
        let output_sheets = padded_count / (2 * config.n);
        Ok(ImpositionStatistics {
            source_pages,
            output_sheets,
            signatures: Some(lengths.len()),
            pages_per_signature: Some(lengths),
            // Front and back of each sheet
            output_pages: output_sheets * 2,
            blank_pages_added,
        })
    } else {
        let output_sheets = padded_count / config.n;
        Ok(ImpositionStatistics {
            source_pages,
            output_sheets,
            signatures: None,
            pages_per_signature: None,
            output_pages: output_sheets,
            blank_pages_added,
        })
    }
}
