//! The structured-markdown strategy: converter collaborator plus
//! per-page (title, body) splitting.
//!
//! Structured extraction itself is someone else's job. This module defines
//! the [`MarkdownConverter`] seam — document path in, one markdown string
//! per page out, no cross-page merging — and ships a default backend built
//! on the `unpdf` crate. Tests and alternative backends inject their own
//! implementation through
//! [`crate::config::ExtractionConfig::converter`].
//!
//! What *is* ours: turning each page's markdown into a record. The first
//! line, shorn of its `#` markers, is the title; the rest is the body.

use crate::output::SlideRecord;
use std::path::Path;
use tracing::debug;

/// Boxed error for converter backends; the selector treats any failure as
/// a degradation signal, not a fatal error, so precision matters less than
/// portability across backends.
pub type ConverterError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A structured-markdown extraction backend.
///
/// Contract: given a document path, return one markdown string per page,
/// in page order (page-chunks semantics). Implementations open their own
/// document handle and must not share state between calls.
pub trait MarkdownConverter: Send + Sync {
    /// Short backend label used in logs.
    fn name(&self) -> &str;

    /// Extract per-page markdown from the document at `path`.
    fn page_markdown(&self, path: &Path) -> Result<Vec<String>, ConverterError>;
}

/// Default converter backend: the `unpdf` structured extractor.
///
/// Parses the document once, then renders each page individually through a
/// single-page [`unpdf::PageSelection`] so page boundaries survive.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnpdfConverter;

impl MarkdownConverter for UnpdfConverter {
    fn name(&self) -> &str {
        "unpdf"
    }

    fn page_markdown(&self, path: &Path) -> Result<Vec<String>, ConverterError> {
        let options = unpdf::ParseOptions::new().lenient();
        let document = unpdf::parse_file_with_options(path, options)?;

        let page_count = document.page_count();
        let mut pages = Vec::with_capacity(page_count as usize);
        for page_num in 1..=page_count {
            let render = unpdf::RenderOptions::new()
                .with_pages(unpdf::PageSelection::Range(page_num..=page_num));
            pages.push(unpdf::render::to_markdown(&document, &render)?);
        }
        debug!(pages = pages.len(), "unpdf produced per-page markdown");
        Ok(pages)
    }
}

/// Split one page's markdown into its record: first line (leading `#`
/// markers stripped, whitespace trimmed) becomes the title, the remainder
/// (trimmed) the body. An empty first line falls back to `"Slide N"`.
pub fn split_page_markdown(markdown: &str, page_index: usize) -> SlideRecord {
    let (first, rest) = match markdown.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (markdown, ""),
    };
    let title = first.trim().trim_start_matches('#').trim();
    SlideRecord::new(page_index, title, rest.trim())
}
