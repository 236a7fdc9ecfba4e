//! Output types crossing the extraction core's boundary.
//!
//! [`SlideRecord`] is the unit of output: exactly one per page, in page
//! order, regardless of which strategy produced it. Everything else here is
//! reporting — which strategy ran, why, and how long things took — so
//! callers can log or debug strategy selection without re-running it.

use serde::{Deserialize, Serialize};

/// One extracted slide: the `(title, body)` pair for a single page.
///
/// Constructed through [`SlideRecord::new`], which enforces the two output
/// invariants: the title is never empty (falling back to `"Slide N"`) and
/// never contains a newline (the downstream serializer renders it on a
/// `# ` heading line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    /// 0-based page index.
    pub index: usize,
    /// Slide title; non-empty, single line.
    pub title: String,
    /// Markdown/paragraph body text; may be empty.
    pub body: String,
}

impl SlideRecord {
    /// Build a record for the page at `index`, applying the title fallback
    /// and flattening any embedded newlines out of the title.
    pub fn new(index: usize, title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        let flat = title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let title = if flat.is_empty() {
            Self::default_title(index)
        } else {
            flat
        };
        Self {
            index,
            title,
            body: body.into(),
        }
    }

    /// The fallback title for the page at 0-based `index`: `"Slide N"`
    /// with N 1-based.
    pub fn default_title(index: usize) -> String {
        format!("Slide {}", index + 1)
    }
}

/// Render records in the flat markdown format the downstream lecture
/// pipeline parses:
///
/// ```text
/// # {title}
///
/// {body}
///
/// ---
///
/// ```
///
/// one record per page, in order. This exact shape is a compatibility
/// contract; do not reformat it.
pub fn slides_to_markdown(slides: &[SlideRecord]) -> String {
    let mut out = String::new();
    for slide in slides {
        out.push_str(&format!("# {}\n\n", slide.title));
        out.push_str(&format!("{}\n\n", slide.body));
        out.push_str("---\n\n");
    }
    out
}

/// Which extraction strategy produced (or would produce) the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Per-page markdown from the structured-markdown converter, split on
    /// the first heading line.
    StructuredMarkdown,
    /// Heuristic title/body reconstruction from span font geometry.
    FontGeometry,
}

impl std::fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionStrategy::StructuredMarkdown => write!(f, "structured-markdown"),
            ExtractionStrategy::FontGeometry => write!(f, "font-geometry"),
        }
    }
}

/// Why the selector settled on a strategy.
///
/// The first three come from the document signal inspector (pre-extraction
/// signals); the last three are verdicts on the structured-markdown
/// attempt. `NoPresentationSignals` only appears in [`crate::profile`]
/// output — a finished extraction always resolves it to one of the
/// terminal reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionReason {
    /// Creator/producer metadata names a presentation tool.
    PresentationMetadata,
    /// Uniform landscape pages — the shape of an exported slide deck.
    UniformSlideGeometry,
    /// Image blocks dominate the sampled pages (scan or graphic deck).
    ImageHeavyLayout,
    /// No presentation signal found; structured markdown is worth a try.
    NoPresentationSignals,
    /// Converter output averaged too few characters per page.
    SparseStructuredOutput,
    /// Converter output scored below the quality floor.
    LowQualityScore,
    /// The converter itself failed; geometry extraction took over.
    ConverterUnavailable,
    /// Structured markdown passed both gates and was accepted.
    StructuredAccepted,
}

/// The selector's verdict: a strategy plus the reason it was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyDecision {
    pub strategy: ExtractionStrategy,
    pub reason: SelectionReason,
}

/// Document metadata read from the PDF information dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

/// Timing and attempt counters for one extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub page_count: usize,
    /// 1 when the first strategy was terminal, 2 when the selector fell
    /// back to font geometry after a structured attempt.
    pub strategy_attempts: u32,
    pub load_duration_ms: u64,
    pub total_duration_ms: u64,
}

impl ExtractionStats {
    /// True when the structured attempt was discarded for a fallback.
    pub fn fell_back(&self) -> bool {
        self.strategy_attempts > 1
    }
}

/// Everything `extract` returns: the records plus the selection audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// One record per page, in page order.
    pub slides: Vec<SlideRecord>,
    pub decision: StrategyDecision,
    /// Quality score of the structured-markdown attempt, when one ran far
    /// enough to be scored.
    pub quality_score: Option<f32>,
    pub metadata: DocumentMetadata,
    pub stats: ExtractionStats,
}

impl ExtractionOutput {
    /// Serialize the records in the downstream slides.md format.
    pub fn to_slides_markdown(&self) -> String {
        slides_to_markdown(&self.slides)
    }
}
