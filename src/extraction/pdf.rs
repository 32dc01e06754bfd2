//! Per-page PDF text extraction
//!
//! Converts a raw PDF byte stream into [`PageText`], one best-effort plain
//! text entry per page in page order. A page with no extractable text (for
//! example a scanned image) becomes an empty string rather than an error;
//! only a malformed document container fails extraction.

use crate::extraction::types::PageText;
use lopdf::Document;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while parsing the document container.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The byte stream is not a valid PDF document.
    #[error("Malformed PDF document: {0}")]
    Malformed(String),

    /// The document opened but contains no pages.
    #[error("PDF document contains no pages")]
    Empty,
}

/// Extracts per-page plain text from PDF bytes.
///
/// Page order follows the document's page tree. Extraction failures on a
/// single page are downgraded to an empty entry so that page indices stay
/// aligned with the document.
pub fn extract_pages(bytes: &[u8]) -> Result<PageText, DocumentError> {
    let doc = Document::load_mem(bytes).map_err(|e| DocumentError::Malformed(e.to_string()))?;

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Err(DocumentError::Empty);
    }

    let mut pages = Vec::with_capacity(page_numbers.len());
    for page_num in page_numbers {
        match doc.extract_text(&[page_num]) {
            Ok(text) => pages.push(text),
            Err(e) => {
                warn!("Text extraction failed for page {}: {}", page_num, e);
                pages.push(String::new());
            }
        }
    }

    debug!("Extracted text from {} pages", pages.len());
    Ok(PageText::new(pages))
}
