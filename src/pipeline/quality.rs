//! Quality scoring for a structured-markdown extraction attempt.
//!
//! The converter always returns *something* — the question is whether what
//! it returned is a faithful rendering of the text layer or structural
//! noise. Three measurable proxies separate the two:
//!
//! * **Coverage** — a good extraction leaves few pages blank.
//! * **Heading density** — slide-shaped content yields roughly one heading
//!   per page; none at all means the converter saw no structure.
//! * **Line length** — real prose lines average a few dozen characters;
//!   shattered extractions produce single-character confetti and glued-
//!   together extractions produce kilometre lines.
//!
//! The weighted blend lands in [0, 1] and is compared against
//! [`crate::config::ExtractionConfig::min_quality_score`] by the strategy
//! selector. The score is transient — computed, compared, discarded.

/// Weight of the non-empty page ratio in the final score.
pub const WEIGHT_NONEMPTY: f32 = 0.35;

/// Weight of the heading density in the final score.
pub const WEIGHT_HEADINGS: f32 = 0.30;

/// Weight of the line-length score in the final score.
pub const WEIGHT_LINE_LEN: f32 = 0.35;

/// Average line lengths inside this band score a full 1.0.
const LINE_LEN_IDEAL_MIN: f32 = 20.0;
const LINE_LEN_IDEAL_MAX: f32 = 120.0;

/// Centre and slope of the penalty ramp outside the ideal band.
const LINE_LEN_TARGET: f32 = 70.0;
const LINE_LEN_PENALTY_RANGE: f32 = 200.0;

/// Score an ordered set of per-page markdown strings.
///
/// Returns 0.0 for an empty page set or one with no non-blank lines at
/// all; otherwise a value in [0, 1].
pub fn score_markdown(pages: &[String]) -> f32 {
    if pages.is_empty() {
        return 0.0;
    }

    let page_count = pages.len() as f32;

    let nonempty_pages = pages.iter().filter(|p| !p.trim().is_empty()).count();
    let nonempty_ratio = nonempty_pages as f32 / page_count;

    let heading_lines: usize = pages
        .iter()
        .flat_map(|p| p.lines())
        .filter(|l| l.starts_with('#'))
        .count();
    // Target is about one heading per page; more is not better.
    let heading_ratio = (heading_lines as f32 / page_count).min(1.0);

    let mut total_lines = 0usize;
    let mut total_chars = 0usize;
    for line in pages.iter().flat_map(|p| p.lines()) {
        let stripped = line.trim();
        if stripped.is_empty() {
            continue;
        }
        total_lines += 1;
        total_chars += stripped.chars().count();
    }
    if total_lines == 0 {
        return 0.0;
    }
    let avg_line_len = total_chars as f32 / total_lines as f32;
    let len_score = line_length_score(avg_line_len);

    WEIGHT_NONEMPTY * nonempty_ratio + WEIGHT_HEADINGS * heading_ratio + WEIGHT_LINE_LEN * len_score
}

/// 1.0 inside the ideal band; outside, a linear ramp down from the target
/// centre reaching 0 at ±[`LINE_LEN_PENALTY_RANGE`].
fn line_length_score(avg_line_len: f32) -> f32 {
    if (LINE_LEN_IDEAL_MIN..=LINE_LEN_IDEAL_MAX).contains(&avg_line_len) {
        1.0
    } else {
        (1.0 - (avg_line_len - LINE_LEN_TARGET).abs() / LINE_LEN_PENALTY_RANGE).max(0.0)
    }
}
