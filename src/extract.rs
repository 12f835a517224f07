//! PDF text extraction.
//!
//! A thin wrapper over the `pdf-extract` crate: pages are extracted individually and joined
//! with `\n` in document order. Any parser failure, including a panic inside the parser on
//! hostile input, is reported as an [`ExtractionError`] so callers can skip the document.

use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

const PDF_MAGIC: &[u8] = b"%PDF-";
/// Bytes searched for the header; readers tolerate a BOM or junk before it.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Errors raised while turning a PDF payload into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The payload contained no bytes.
    #[error("PDF payload is empty")]
    Empty,
    /// The payload carries no PDF header near its start.
    #[error("payload is not a PDF document")]
    NotPdf,
    /// The parser rejected the document.
    #[error("failed to parse PDF: {0}")]
    Malformed(String),
}

/// Returns true when the `%PDF-` header appears within the first 1024 bytes.
pub fn is_pdf(head: &[u8]) -> bool {
    let window = &head[..head.len().min(HEADER_SEARCH_WINDOW)];
    window
        .windows(PDF_MAGIC.len())
        .any(|candidate| candidate == PDF_MAGIC)
}

/// Extract the text of every page, joined with `\n` in page order.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    extract_pages(bytes).map(join_pages)
}

/// Extract the text of each page separately, in page order.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::Empty);
    }
    if !is_pdf(bytes) {
        return Err(ExtractionError::NotPdf);
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));

    match outcome {
        Ok(Ok(pages)) => {
            tracing::debug!(pages = pages.len(), "Extracted PDF pages");
            Ok(pages.into_iter().map(trim_page_breaks).collect())
        }
        Ok(Err(err)) => Err(ExtractionError::Malformed(err.to_string())),
        Err(payload) => Err(ExtractionError::Malformed(panic_message(payload.as_ref()))),
    }
}

/// The parser pads each page with layout line breaks; only the page text is kept.
fn trim_page_breaks(page: String) -> String {
    page.trim_matches(|c| c == '\n' || c == '\r').to_string()
}

/// Concatenate page texts with a single newline between consecutive pages.
pub fn join_pages(pages: Vec<String>) -> String {
    pages.join("\n")
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("parser panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("parser panicked: {message}")
    } else {
        "parser panicked".to_string()
    }
}
