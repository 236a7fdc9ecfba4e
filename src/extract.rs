//! Extraction entry points and the strategy selector.
//!
//! ## The decision tree
//!
//! Every document flows through one single-pass decision tree — no cycles,
//! no retries, at most two strategy attempts:
//!
//! ```text
//! inspect signals ──presentation/scan──▶ font-geometry        (terminal)
//!        │
//!        └─native──▶ structured markdown
//!                        │── sparse (<30 chars/page) ──▶ font-geometry
//!                        │── low score (<0.35) ────────▶ font-geometry
//!                        └── accepted ─────────────────▶ structured
//! ```
//!
//! Fallbacks are quality signals, not errors: the only `Err` this module
//! produces is a document that cannot be opened or an output file that
//! cannot be written.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::layout::{DocumentProfile, DocumentSnapshot};
use crate::output::{
    DocumentMetadata, ExtractionOutput, ExtractionStats, ExtractionStrategy, SelectionReason,
    SlideRecord, StrategyDecision,
};
use crate::pipeline::markdown::{MarkdownConverter, UnpdfConverter};
use crate::pipeline::{geometry, input, inspect, loader, markdown, quality};
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extract per-slide records from a PDF file.
///
/// This is the primary entry point for the library. The blocking pdfium
/// work runs on the tokio blocking pool.
///
/// # Errors
/// Returns `Err(ExtractError)` only for fatal conditions: the file cannot
/// be found, read, or opened as a PDF. Content-quality problems degrade to
/// the font-geometry fallback and still return `Ok`.
pub async fn extract(
    input: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let path = input.as_ref().to_path_buf();
    let config = config.clone();
    tokio::task::spawn_blocking(move || extract_sync(&path, &config))
        .await
        .map_err(|e| ExtractError::Internal(format!("Extraction task panicked: {e}")))?
}

/// Synchronous extraction core.
///
/// Safe to call concurrently from independent threads: every call opens
/// (and closes) its own document handle and shares no mutable state.
pub fn extract_sync(
    pdf_path: &Path,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let total_start = Instant::now();
    info!("Starting extraction: {}", pdf_path.display());

    input::validate_pdf_path(pdf_path)?;

    let load_start = Instant::now();
    let snapshot = loader::load_document_blocking(pdf_path, config.password.as_deref())?;
    let load_duration_ms = load_start.elapsed().as_millis() as u64;
    let page_count = snapshot.pages.len();

    let profile = snapshot.profile(config.inspect_sample_pages);
    let hint = inspect::choose_strategy(&profile, config);

    let (slides, decision, quality_score, strategy_attempts) = match hint.strategy {
        ExtractionStrategy::FontGeometry => {
            info!(reason = ?hint.reason, "signal inspector chose font-geometry");
            (
                geometry::extract_slides(&snapshot.pages, config),
                hint,
                None,
                1,
            )
        }
        ExtractionStrategy::StructuredMarkdown => run_structured(pdf_path, &snapshot, config),
    };

    debug_assert_eq!(slides.len(), page_count, "one record per page");

    let stats = ExtractionStats {
        page_count,
        strategy_attempts,
        load_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        strategy = %decision.strategy,
        reason = ?decision.reason,
        pages = page_count,
        duration_ms = stats.total_duration_ms,
        "Extraction complete"
    );

    Ok(ExtractionOutput {
        slides,
        decision,
        quality_score,
        metadata: snapshot.metadata,
        stats,
    })
}

/// Attempt the structured-markdown strategy, falling back to font geometry
/// when the converter fails or its output flunks either quality gate.
fn run_structured(
    pdf_path: &Path,
    snapshot: &DocumentSnapshot,
    config: &ExtractionConfig,
) -> (Vec<SlideRecord>, StrategyDecision, Option<f32>, u32) {
    let converter: Arc<dyn MarkdownConverter> = config
        .converter
        .clone()
        .unwrap_or_else(|| Arc::new(UnpdfConverter));

    let md_pages = match converter.page_markdown(pdf_path) {
        Ok(pages) => normalize_page_count(pages, snapshot.pages.len()),
        Err(e) => {
            warn!(
                converter = converter.name(),
                error = %e,
                "converter failed; falling back to font-geometry"
            );
            return (
                geometry::extract_slides(&snapshot.pages, config),
                fell_back(SelectionReason::ConverterUnavailable),
                None,
                2,
            );
        }
    };

    match evaluate_structured(&md_pages, config) {
        StructuredVerdict::Accepted { slides, score } => {
            debug!(score, "structured markdown accepted");
            (
                slides,
                StrategyDecision {
                    strategy: ExtractionStrategy::StructuredMarkdown,
                    reason: SelectionReason::StructuredAccepted,
                },
                Some(score),
                1,
            )
        }
        StructuredVerdict::Sparse { avg_chars } => {
            warn!(avg_chars, "structured output too sparse; falling back to font-geometry");
            (
                geometry::extract_slides(&snapshot.pages, config),
                fell_back(SelectionReason::SparseStructuredOutput),
                None,
                2,
            )
        }
        StructuredVerdict::LowQuality { score } => {
            warn!(score, "structured output scored below floor; falling back to font-geometry");
            (
                geometry::extract_slides(&snapshot.pages, config),
                fell_back(SelectionReason::LowQualityScore),
                Some(score),
                2,
            )
        }
    }
}

fn fell_back(reason: SelectionReason) -> StrategyDecision {
    StrategyDecision {
        strategy: ExtractionStrategy::FontGeometry,
        reason,
    }
}

/// Verdict on a structured-markdown attempt.
///
/// Pure over the markdown pages so both gates are testable (and reusable
/// by callers running their own converter) without touching a document.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredVerdict {
    /// Both gates passed; the parsed records and their score.
    Accepted { slides: Vec<SlideRecord>, score: f32 },
    /// Average (title+body) length fell under the per-page floor.
    Sparse { avg_chars: f32 },
    /// The quality score fell under the acceptance floor.
    LowQuality { score: f32 },
}

/// Apply the two acceptance gates, in order: the sparse-output floor on
/// parsed (title+body) length, then the quality score on the raw markdown.
pub fn evaluate_structured(md_pages: &[String], config: &ExtractionConfig) -> StructuredVerdict {
    let slides: Vec<SlideRecord> = md_pages
        .iter()
        .enumerate()
        .map(|(index, md)| markdown::split_page_markdown(md, index))
        .collect();

    let total_chars: usize = slides
        .iter()
        .map(|s| s.title.chars().count() + s.body.chars().count())
        .sum();
    let avg_chars = if slides.is_empty() {
        0.0
    } else {
        total_chars as f32 / slides.len() as f32
    };
    if avg_chars < config.min_chars_per_page {
        return StructuredVerdict::Sparse { avg_chars };
    }

    let score = quality::score_markdown(md_pages);
    if score < config.min_quality_score {
        return StructuredVerdict::LowQuality { score };
    }

    StructuredVerdict::Accepted { slides, score }
}

/// Pad or truncate converter output to one markdown string per page.
///
/// The converter contract promises page-chunks semantics, but a backend
/// that drops trailing blank pages would otherwise break the one-record-
/// per-page invariant downstream.
fn normalize_page_count(mut pages: Vec<String>, expected: usize) -> Vec<String> {
    if pages.len() != expected {
        warn!(
            got = pages.len(),
            expected, "converter page count mismatch; padding/truncating"
        );
        pages.resize(expected, String::new());
    }
    pages
}

/// Extract a PDF and write the records to `output_path` in the downstream
/// slides.md format.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn extract_to_file(
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, ExtractError> {
    let output = extract(input, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ExtractError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, output.to_slides_markdown())
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Extract PDF bytes in memory.
///
/// Internally writes `bytes` to a managed [`tempfile`] (pdfium requires a
/// filesystem path) and cleans it up on return or panic.
pub async fn extract_from_bytes(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| ExtractError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| ExtractError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_path_buf();
    // `tmp` is dropped (and the file deleted) when `extract` returns
    extract(&path, config).await
}

/// Extract many documents concurrently.
///
/// The core itself stays synchronous per document; this helper only fans
/// independent documents out over the blocking pool, `concurrency` at a
/// time. Results come back in input order.
pub async fn extract_all<I, P>(
    inputs: I,
    config: &ExtractionConfig,
    concurrency: usize,
) -> Vec<Result<ExtractionOutput, ExtractError>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let tasks: Vec<_> = inputs
        .into_iter()
        .enumerate()
        .map(|(index, p)| {
            let path = p.as_ref().to_path_buf();
            let config = config.clone();
            async move { (index, extract(&path, &config).await) }
        })
        .collect();

    let mut results: Vec<(usize, Result<ExtractionOutput, ExtractError>)> = stream::iter(tasks)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, r)| r).collect()
}

/// Read document metadata without extracting content.
pub async fn inspect(input: impl AsRef<Path>) -> Result<DocumentMetadata, ExtractError> {
    let path = input.as_ref();
    input::validate_pdf_path(path)?;
    loader::read_metadata(path, None).await
}

/// Build the signal-inspector profile for a document and report the
/// strategy it implies, without extracting anything.
pub async fn profile(
    input: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<(DocumentProfile, StrategyDecision), ExtractError> {
    let path = input.as_ref();
    input::validate_pdf_path(path)?;
    let snapshot = loader::load_document(path, config).await?;
    let profile = snapshot.profile(config.inspect_sample_pages);
    let decision = inspect::choose_strategy(&profile, config);
    Ok((profile, decision))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExtractionConfig {
        ExtractionConfig::default()
    }

    fn page(md: &str) -> String {
        md.to_string()
    }

    #[test]
    fn sparse_output_is_rejected_before_scoring() {
        // Well-formed headings, but under 30 chars/page on average.
        let pages = vec![page("# Hi\nok"), page("# Yo\nno")];
        match evaluate_structured(&pages, &config()) {
            StructuredVerdict::Sparse { avg_chars } => {
                assert!(avg_chars < 30.0, "got {avg_chars}")
            }
            _ => panic!("expected sparse verdict"),
        }
    }

    #[test]
    fn good_markdown_is_accepted_with_score() {
        let body = "A line of body text long enough to sit in the band.";
        let pages: Vec<String> = (0..4)
            .map(|i| format!("# Section {i}\n{body}\n{body}"))
            .collect();
        match evaluate_structured(&pages, &config()) {
            StructuredVerdict::Accepted { slides, score } => {
                assert_eq!(slides.len(), 4);
                assert!(score >= 0.35, "got {score}");
                assert_eq!(slides[2].title, "Section 2");
            }
            _ => panic!("expected accepted verdict"),
        }
    }

    #[test]
    fn dense_but_shapeless_markdown_is_rejected_on_score() {
        // Plenty of characters per page (passes the sparse gate) but every
        // page is one kilometre line with no headings: len_score 0,
        // heading 0 → 0.35 weight on coverage only → below a raised floor.
        let config = ExtractionConfig::builder()
            .min_quality_score(0.5)
            .build()
            .unwrap();
        let pages = vec![page(&"x".repeat(400)), page(&"y".repeat(400))];
        match evaluate_structured(&pages, &config) {
            StructuredVerdict::LowQuality { score } => assert!(score < 0.5, "got {score}"),
            _ => panic!("expected low-quality verdict"),
        }
    }

    #[test]
    fn empty_page_set_is_sparse() {
        match evaluate_structured(&[], &config()) {
            StructuredVerdict::Sparse { avg_chars } => assert_eq!(avg_chars, 0.0),
            _ => panic!("expected sparse verdict"),
        }
    }

    #[test]
    fn normalize_pads_missing_pages() {
        let pages = normalize_page_count(vec!["# one".into()], 3);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1], "");
    }

    #[test]
    fn normalize_truncates_extra_pages() {
        let pages = normalize_page_count(vec!["a".into(), "b".into(), "c".into()], 2);
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn normalize_leaves_matching_counts_alone() {
        let pages = normalize_page_count(vec!["a".into(), "b".into()], 2);
        assert_eq!(pages, vec!["a".to_string(), "b".to_string()]);
    }
}
