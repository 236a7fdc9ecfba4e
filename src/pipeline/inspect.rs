//! Document signal inspection: guess a PDF's provenance before extracting.
//!
//! A PDF arrives with no declared origin, but three cheap signals separate
//! presentation exports and scans (where the structured-markdown converter
//! wastes a pass producing junk) from native documents (where it shines):
//!
//! 1. **Metadata** — export tools stamp themselves into creator/producer.
//! 2. **Page geometry** — slide decks are uniform landscape pages; mixed or
//!    portrait page sizes suggest a report or paper.
//! 3. **Image density** — scans and graphic-heavy decks carry far more
//!    image blocks than text blocks.
//!
//! The checks run in strict priority order and the first match wins; later
//! checks are not consulted once one fires. The whole inspection is a pure
//! function over [`DocumentProfile`] — no I/O, no mutation — so each rule
//! is unit-testable with hand-built profiles.

use crate::config::ExtractionConfig;
use crate::layout::DocumentProfile;
use crate::output::{ExtractionStrategy, SelectionReason, StrategyDecision};
use tracing::debug;

/// Lower-cased substrings that identify a presentation tool in the
/// creator/producer metadata strings.
const PRESENTATION_MARKERS: [&str; 6] = [
    "impress",
    "powerpoint",
    "keynote",
    "google slides",
    "libreoffice",
    "openoffice",
];

/// Classify the document and pick the opening extraction strategy.
///
/// Returns [`ExtractionStrategy::FontGeometry`] with the matching reason
/// when any presentation signal fires, otherwise
/// [`ExtractionStrategy::StructuredMarkdown`] with
/// [`SelectionReason::NoPresentationSignals`].
pub fn choose_strategy(
    profile: &DocumentProfile,
    config: &ExtractionConfig,
) -> StrategyDecision {
    if has_presentation_metadata(profile) {
        debug!(
            creator = profile.creator.as_deref().unwrap_or(""),
            producer = profile.producer.as_deref().unwrap_or(""),
            "presentation tool named in metadata"
        );
        return geometry(SelectionReason::PresentationMetadata);
    }

    if has_slide_geometry(profile) {
        debug!(
            pages = profile.page_count,
            size = ?profile.page_sizes.first(),
            "uniform landscape pages"
        );
        return geometry(SelectionReason::UniformSlideGeometry);
    }

    let ratio = profile.image_block_ratio();
    if ratio > config.image_ratio_threshold {
        debug!(ratio, "image blocks dominate sampled pages");
        return geometry(SelectionReason::ImageHeavyLayout);
    }

    StrategyDecision {
        strategy: ExtractionStrategy::StructuredMarkdown,
        reason: SelectionReason::NoPresentationSignals,
    }
}

fn geometry(reason: SelectionReason) -> StrategyDecision {
    StrategyDecision {
        strategy: ExtractionStrategy::FontGeometry,
        reason,
    }
}

fn has_presentation_metadata(profile: &DocumentProfile) -> bool {
    [&profile.creator, &profile.producer]
        .into_iter()
        .flatten()
        .any(|field| {
            let lowered = field.to_lowercase();
            PRESENTATION_MARKERS.iter().any(|m| lowered.contains(m))
        })
}

fn has_slide_geometry(profile: &DocumentProfile) -> bool {
    profile.page_count >= 2 && profile.uniform_page_size() && profile.first_page_landscape
}
