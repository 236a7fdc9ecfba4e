//! Document loading: open a PDF via pdfium and snapshot it into owned
//! descriptors.
//!
//! ## Why snapshot?
//!
//! pdfium handles are `!Send` and hold the document open. Every strategy
//! decision downstream is a pure function, so the loader reads everything
//! once — metadata, page geometry, text spans with font name/size, image
//! block positions — into [`DocumentSnapshot`] and drops the handle before
//! returning. The handle therefore lives for the duration of exactly one
//! function call on every exit path, including errors.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a dedicated
//! blocking-pool thread so Tokio workers never stall on document I/O.
//!
//! ## Line and block reconstruction
//!
//! pdfium exposes a flat list of page objects in content-stream order.
//! Spans are regrouped geometrically: objects whose baselines sit within
//! [`LINE_Y_TOLERANCE`] points share a line; a vertical gap larger than
//! [`BLOCK_GAP_FACTOR`] times the previous line's font size starts a new
//! block. Both groupings sort by position only, so repeated loads of the
//! same file produce identical snapshots.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::layout::{Block, DocumentSnapshot, Line, PageLayout, TextSpan};
use crate::output::DocumentMetadata;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Two spans whose baseline Y coordinates differ by no more than this are
/// treated as belonging to the same line.
const LINE_Y_TOLERANCE: f32 = 2.0;

/// A vertical gap larger than this multiple of the previous line's font
/// size starts a new block.
const BLOCK_GAP_FACTOR: f32 = 1.4;

/// Fallback font size used for gap comparison when a line somehow carries
/// no sized spans.
const FALLBACK_FONT_SIZE: f32 = 12.0;

/// Load the full document snapshot off the async runtime.
pub async fn load_document(
    pdf_path: &Path,
    config: &ExtractionConfig,
) -> Result<DocumentSnapshot, ExtractError> {
    let path = pdf_path.to_path_buf();
    let password = config.password.clone();

    tokio::task::spawn_blocking(move || load_document_blocking(&path, password.as_deref()))
        .await
        .map_err(|e| ExtractError::Internal(format!("Loader task panicked: {e}")))?
}

/// Blocking implementation of [`load_document`].
pub fn load_document_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentSnapshot, ExtractError> {
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, pdf_path, password)?;

    let metadata = read_metadata_from(&document);
    info!("PDF loaded: {} pages", metadata.page_count);

    let mut pages = Vec::with_capacity(metadata.page_count);
    for (index, page) in document.pages().iter().enumerate() {
        let layout = load_page(&page, index);
        debug!(
            "Page {}: {}x{} pt, {} blocks",
            index + 1,
            layout.width.round(),
            layout.height.round(),
            layout.blocks.len()
        );
        pages.push(layout);
    }

    // `document` (and the pdfium handle) drops here, before the snapshot
    // crosses the stage boundary.
    Ok(DocumentSnapshot { metadata, pages })
}

/// Read document metadata without snapshotting page content.
pub async fn read_metadata(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, ExtractError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(|s| s.to_string());

    tokio::task::spawn_blocking(move || read_metadata_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| ExtractError::Internal(format!("Metadata task panicked: {e}")))?
}

/// Blocking implementation of [`read_metadata`].
pub fn read_metadata_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, ExtractError> {
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, pdf_path, password)?;
    Ok(read_metadata_from(&document))
}

// ── Pdfium plumbing ──────────────────────────────────────────────────────

/// Bind to a pdfium library: `PDFIUM_LIB_PATH` env override first (either
/// the library file itself or a directory containing it), then the system
/// library.
fn bind_pdfium() -> Result<Pdfium, ExtractError> {
    if let Ok(raw) = std::env::var("PDFIUM_LIB_PATH") {
        let pb = PathBuf::from(raw);
        let lib_path = if pb.is_dir() {
            Pdfium::pdfium_platform_library_name_at_path(&pb)
        } else {
            pb
        };
        return Pdfium::bind_to_library(&lib_path)
            .map(Pdfium::new)
            .map_err(|e| ExtractError::PdfiumBindingFailed(format!("{e:?}")));
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| ExtractError::PdfiumBindingFailed(format!("{e:?}")))
}

fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, ExtractError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{e:?}");
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                ExtractError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                ExtractError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            ExtractError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

fn read_metadata_from(document: &PdfDocument<'_>) -> DocumentMetadata {
    let metadata = document.metadata();
    let pages = document.pages();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: pages.len() as usize,
        pdf_version: format!("{:?}", document.version()),
    }
}

// ── Page snapshotting ────────────────────────────────────────────────────

/// A span with its page position, before line/block grouping.
struct RawSpan {
    text: String,
    font_name: String,
    font_size: f32,
    top: f32,
    left: f32,
}

/// A grouped line, before block assembly.
struct RawLine {
    top: f32,
    max_font: f32,
    spans: Vec<RawSpan>,
}

fn load_page(page: &PdfPage<'_>, index: usize) -> PageLayout {
    let width = page.width().value;
    let height = page.height().value;

    let mut spans: Vec<RawSpan> = Vec::new();
    let mut image_tops: Vec<f32> = Vec::new();

    for object in page.objects().iter() {
        match object {
            PdfPageObject::Text(ref text_object) => {
                let text = text_object.text();
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let Ok(bounds) = text_object.bounds() else {
                    continue;
                };
                spans.push(RawSpan {
                    text: trimmed.to_string(),
                    font_name: text_object.font().family(),
                    font_size: text_object.scaled_font_size().value,
                    top: bounds.top().value,
                    left: bounds.left().value,
                });
            }
            PdfPageObject::Image(ref image_object) => {
                let top = image_object.bounds().map(|b| b.top().value).unwrap_or(0.0);
                image_tops.push(top);
            }
            _ => {}
        }
    }

    let lines = group_spans_into_lines(spans);
    let blocks = assemble_blocks(lines, image_tops);

    PageLayout::new(index, width, height, blocks)
}

/// Group positioned spans into lines. Sorts top-down then left-to-right;
/// spans within [`LINE_Y_TOLERANCE`] of a line's anchor baseline join it.
fn group_spans_into_lines(mut spans: Vec<RawSpan>) -> Vec<RawLine> {
    // PDF user space has Y increasing upward, so top-down order is
    // descending Y.
    spans.sort_by(|a, b| {
        b.top
            .total_cmp(&a.top)
            .then_with(|| a.left.total_cmp(&b.left))
    });

    let mut lines: Vec<RawLine> = Vec::new();
    for span in spans {
        match lines.last_mut() {
            Some(line) if (line.top - span.top).abs() <= LINE_Y_TOLERANCE => {
                line.max_font = line.max_font.max(span.font_size);
                line.spans.push(span);
            }
            _ => lines.push(RawLine {
                top: span.top,
                max_font: span.font_size,
                spans: vec![span],
            }),
        }
    }

    // The top-then-left sort can interleave spans of one line when their
    // tops differ slightly; restore strict left order within each line.
    for line in &mut lines {
        line.spans.sort_by(|a, b| a.left.total_cmp(&b.left));
    }

    lines
}

/// Assemble lines and image positions into top-down ordered blocks.
fn assemble_blocks(lines: Vec<RawLine>, image_tops: Vec<f32>) -> Vec<Block> {
    // (top, block) pairs so text and image blocks can be interleaved by
    // position afterwards.
    let mut positioned: Vec<(f32, Block)> = Vec::new();

    let mut current: Vec<Line> = Vec::new();
    let mut current_top = 0.0_f32;
    let mut prev_top = 0.0_f32;
    let mut prev_font = FALLBACK_FONT_SIZE;

    for line in lines {
        let gap = prev_top - line.top;
        if !current.is_empty() && gap > BLOCK_GAP_FACTOR * prev_font {
            positioned.push((current_top, Block::Text {
                lines: std::mem::take(&mut current),
            }));
        }
        if current.is_empty() {
            current_top = line.top;
        }
        prev_top = line.top;
        prev_font = if line.max_font > 0.0 {
            line.max_font
        } else {
            FALLBACK_FONT_SIZE
        };
        current.push(Line::new(
            line.spans
                .into_iter()
                .map(|s| TextSpan::new(s.text, s.font_name, s.font_size))
                .collect(),
        ));
    }
    if !current.is_empty() {
        positioned.push((current_top, Block::Text { lines: current }));
    }

    for top in image_tops {
        positioned.push((top, Block::Image));
    }

    // Top-down; text wins position ties so a full-page background image
    // never displaces the headline block.
    positioned.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then_with(|| a.1.is_image().cmp(&b.1.is_image()))
    });

    positioned.into_iter().map(|(_, block)| block).collect()
}
