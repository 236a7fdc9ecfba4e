//! # pdf2slides
//!
//! Extract per-slide `(title, body)` records from PDF slide decks.
//!
//! ## Why this crate?
//!
//! Lecture decks arrive as PDFs of wildly different provenance: native
//! exports with a clean text layer, LibreOffice/PowerPoint conversions
//! with fonts standing in for structure, and scans with no text at all.
//! No single extraction method survives all three. This crate inspects
//! each document's signals (metadata, page geometry, image density),
//! picks a strategy, scores the result, and falls back when the quality
//! is not good enough — so every page always comes back as a usable
//! `(title, body)` pair.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    validate path + magic bytes
//!  ├─ 2. Load     snapshot metadata, geometry, spans via pdfium
//!  ├─ 3. Inspect  classify origin (presentation export / scan / native)
//!  ├─ 4. Extract  structured markdown  ──or──  font-geometry splitter
//!  ├─ 5. Gate     sparse-output floor, quality score → fallback
//!  └─ 6. Output   one SlideRecord per page + selection audit trail
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2slides::{extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let output = extract("lecture07.pdf", &config).await?;
//!     for slide in &output.slides {
//!         println!("# {}", slide.title);
//!     }
//!     eprintln!(
//!         "strategy: {} ({:?})",
//!         output.decision.strategy, output.decision.reason
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2slides` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2slides = { version = "0.3", default-features = false }
//! ```
//!
//! ## Strategy selection at a glance
//!
//! | Signal | Strategy |
//! |--------|----------|
//! | Creator/producer names a presentation tool | font-geometry |
//! | ≥2 uniform landscape pages | font-geometry |
//! | >40 % image blocks in the first 5 pages | font-geometry |
//! | Structured output <30 chars/page | font-geometry (fallback) |
//! | Quality score <0.35 | font-geometry (fallback) |
//! | Otherwise | structured markdown |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod layout;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::ExtractError;
pub use extract::{
    evaluate_structured, extract, extract_all, extract_from_bytes, extract_sync, extract_to_file,
    inspect, profile, StructuredVerdict,
};
pub use layout::{Block, DocumentProfile, DocumentSnapshot, Line, PageLayout, TextSpan};
pub use output::{
    slides_to_markdown, DocumentMetadata, ExtractionOutput, ExtractionStats, ExtractionStrategy,
    SelectionReason, SlideRecord, StrategyDecision,
};
pub use pipeline::markdown::{ConverterError, MarkdownConverter, UnpdfConverter};
