//! PDF text extraction.
//!
//! Uses pdf-extract page by page and keeps only the leading pages.

use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("failed to read PDF: {0}")]
    Io(#[from] std::io::Error),
    #[error("error extracting text from PDF: {0}")]
    Extract(String),
    #[error("no extractable text found in PDF")]
    NoText,
}

/// Text pulled from the leading pages of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfExtraction {
    pub full_text: String,
    pub total_pages: usize,
    pub pages_processed: usize,
    pub total_words: usize,
}

impl PdfExtraction {
    /// Build from per-page text, keeping at most `max_pages` pages.
    ///
    /// `max_pages == 0` keeps every page.
    pub fn from_pages(pages: &[String], max_pages: usize) -> Self {
        let total_pages = pages.len();
        let pages_processed = if max_pages == 0 {
            total_pages
        } else {
            max_pages.min(total_pages)
        };

        let mut full_text = String::new();
        for page in &pages[..pages_processed] {
            if !page.is_empty() {
                full_text.push_str(page);
                full_text.push('\n');
            }
        }

        let total_words = full_text.split_whitespace().count();

        Self {
            full_text: full_text.trim().to_string(),
            total_pages,
            pages_processed,
            total_words,
        }
    }

    pub fn char_count(&self) -> usize {
        self.full_text.chars().count()
    }
}

/// Extract text from the file at `path`
pub fn extract(path: &Path, max_pages: usize) -> Result<PdfExtraction, PdfError> {
    let bytes = std::fs::read(path)?;
    extract_from_mem(&bytes, max_pages)
}

/// Extract text from an in-memory PDF
pub fn extract_from_mem(bytes: &[u8], max_pages: usize) -> Result<PdfExtraction, PdfError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| PdfError::Extract(e.to_string()))?;

    let extraction = PdfExtraction::from_pages(&pages, max_pages);
    debug!(
        total_pages = extraction.total_pages,
        pages_processed = extraction.pages_processed,
        words = extraction.total_words,
        "extracted PDF text"
    );

    if extraction.full_text.is_empty() {
        return Err(PdfError::NoText);
    }
    Ok(extraction)
}

/// First `limit` characters of `text`, with "..." appended when cut
pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
