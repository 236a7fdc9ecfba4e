//! Integration tests for the extraction core.
//!
//! Everything here drives the public API with synthetic page descriptors
//! and hand-built markdown — no PDF fixtures, no pdfium binding — because
//! every decision in the core is a pure function over those values. The
//! gated end-to-end run against a real document lives in `tests/e2e.rs`.

use pdf2slides::pipeline::{geometry, inspect, markdown, quality};
use pdf2slides::{
    evaluate_structured, slides_to_markdown, Block, DocumentProfile, ExtractionConfig,
    ExtractionStrategy, Line, PageLayout, SelectionReason, StructuredVerdict, TextSpan,
};

// ── Helpers ──────────────────────────────────────────────────────────────

fn config() -> ExtractionConfig {
    ExtractionConfig::default()
}

fn span(text: &str, size: f32) -> TextSpan {
    TextSpan::new(text, "Helvetica", size)
}

fn text_block(lines: Vec<Vec<TextSpan>>) -> Block {
    Block::Text {
        lines: lines.into_iter().map(Line::new).collect(),
    }
}

fn slide_page(index: usize, title: &str, body_lines: &[&str]) -> PageLayout {
    let mut blocks = vec![text_block(vec![vec![span(title, 28.0)]])];
    if !body_lines.is_empty() {
        blocks.push(text_block(
            body_lines.iter().map(|l| vec![span(l, 14.0)]).collect(),
        ));
    }
    PageLayout::new(index, 960.0, 540.0, blocks)
}

fn base_profile() -> DocumentProfile {
    DocumentProfile {
        creator: None,
        producer: None,
        page_count: 3,
        page_sizes: vec![(612, 792); 3],
        first_page_landscape: false,
        sampled_image_blocks: 0,
        sampled_total_blocks: 12,
    }
}

// ── Page count invariant ─────────────────────────────────────────────

#[test]
fn geometry_returns_one_record_per_page() {
    let pages: Vec<PageLayout> = (0..9)
        .map(|i| {
            if i % 3 == 0 {
                // every third page empty
                PageLayout::new(i, 960.0, 540.0, vec![])
            } else {
                slide_page(i, "Heading", &["body line."])
            }
        })
        .collect();
    let records = geometry::extract_slides(&pages, &config());
    assert_eq!(records.len(), 9);
    for (i, r) in records.iter().enumerate() {
        assert_eq!(r.index, i);
    }
}

#[test]
fn markdown_split_returns_one_record_per_page() {
    let md_pages = ["# A\nbody", "", "no heading here"];
    let records: Vec<_> = md_pages
        .iter()
        .enumerate()
        .map(|(i, md)| markdown::split_page_markdown(md, i))
        .collect();
    assert_eq!(records.len(), 3);
}

// ── Non-empty titles ──────────────────────────────────────────────────

#[test]
fn titles_are_never_empty() {
    let empty = PageLayout::new(6, 960.0, 540.0, vec![]);
    let record = geometry::extract_page(&empty, &config());
    assert_eq!(record.title, "Slide 7");

    let record = markdown::split_page_markdown("", 6);
    assert_eq!(record.title, "Slide 7");

    let record = markdown::split_page_markdown("##  \nonly body", 0);
    assert_eq!(record.title, "Slide 1");
}

// ── Metadata short-circuit ───────────────────────────────────────────

#[test]
fn libreoffice_producer_short_circuits() {
    let mut profile = base_profile();
    profile.producer = Some("LibreOffice 24.2 Impress".into());
    // Make the downstream checks contradictory on purpose: portrait,
    // non-uniform, image-free. Only the metadata rule explains the result.
    profile.page_sizes = vec![(612, 792), (595, 842), (612, 792)];

    let decision = inspect::choose_strategy(&profile, &config());
    assert_eq!(decision.strategy, ExtractionStrategy::FontGeometry);
    assert_eq!(decision.reason, SelectionReason::PresentationMetadata);
}

#[test]
fn metadata_match_is_case_insensitive() {
    for value in ["LIBREOFFICE", "libreoffice", "LibreOffice Writer"] {
        let mut profile = base_profile();
        profile.producer = Some(value.into());
        let decision = inspect::choose_strategy(&profile, &config());
        assert_eq!(
            decision.reason,
            SelectionReason::PresentationMetadata,
            "failed for {value:?}"
        );
    }
}

// ── Landscape + uniform geometry ─────────────────────────────────────

#[test]
fn uniform_landscape_deck_selects_font_geometry() {
    let mut profile = base_profile();
    profile.creator = Some("Some Unknown Tool".into());
    profile.page_sizes = vec![(1920, 1080); 3];
    profile.first_page_landscape = true;

    let decision = inspect::choose_strategy(&profile, &config());
    assert_eq!(decision.strategy, ExtractionStrategy::FontGeometry);
    assert_eq!(decision.reason, SelectionReason::UniformSlideGeometry);
}

// ── Quality-score boundary ───────────────────────────────────────────

#[test]
fn headingless_target_length_pages_score_point_seven() {
    let line = "m".repeat(70);
    let pages: Vec<String> = (0..10).map(|_| format!("{line}\n{line}\n{line}")).collect();
    let score = quality::score_markdown(&pages);
    assert!(
        (score - 0.70).abs() < 1e-6,
        "0.35·1.0 + 0.30·0.0 + 0.35·1.0 should be 0.70, got {score}"
    );

    // 0.70 clears the acceptance floor: no fallback.
    match evaluate_structured(&pages, &config()) {
        StructuredVerdict::Accepted { score, .. } => {
            assert!((score - 0.70).abs() < 1e-6)
        }
        other => panic!("expected acceptance, got {other:?}"),
    }
}

// ── Sparse output falls back regardless of score ─────────────────────

#[test]
fn sparse_output_falls_back_even_when_well_shaped() {
    // One tidy heading and a short line per page: high quality score,
    // but far under 30 characters per page.
    let pages: Vec<String> = (0..5).map(|i| format!("# S{i}\nok")).collect();
    let score = quality::score_markdown(&pages);
    assert!(score >= 0.35, "precondition: shape alone passes, got {score}");

    match evaluate_structured(&pages, &config()) {
        StructuredVerdict::Sparse { avg_chars } => {
            assert!(avg_chars < 30.0, "got {avg_chars}")
        }
        other => panic!("sparse gate must fire before scoring, got {other:?}"),
    }
}

// ── Font-threshold title grouping ────────────────────────────────────

#[test]
fn same_block_large_spans_form_the_title() {
    let page = PageLayout::new(
        0,
        960.0,
        540.0,
        vec![
            text_block(vec![vec![span("Concurrency", 24.0), span("in Rust", 24.0)]]),
            text_block(vec![vec![span("fearless, they said.", 12.0)]]),
        ],
    );
    let record = geometry::extract_page(&page, &config());
    assert_eq!(record.title, "Concurrency in Rust");
    assert_eq!(record.body, "fearless, they said.");
}

// ── Icon filtering ───────────────────────────────────────────────────

#[test]
fn wingdings_spans_never_appear_in_output() {
    let page = PageLayout::new(
        0,
        960.0,
        540.0,
        vec![
            text_block(vec![vec![TextSpan::new("\u{f0e0}", "Wingdings", 36.0)]]),
            text_block(vec![vec![span("Plain Title", 20.0)]]),
            text_block(vec![vec![
                TextSpan::new("\u{f0a7}", "Wingdings", 12.0),
                span("bullet text.", 12.0),
            ]]),
        ],
    );
    let record = geometry::extract_page(&page, &config());
    assert_eq!(record.title, "Plain Title");
    assert_eq!(record.body, "bullet text.");
    assert!(!record.body.contains('\u{f0a7}'));
}

// ── Idempotence ──────────────────────────────────────────────────────

#[test]
fn repeated_extraction_is_byte_identical() {
    let pages: Vec<PageLayout> = (0..4)
        .map(|i| {
            slide_page(
                i,
                "Iterators",
                &["lazy adapters compose,", "then collect drives them."],
            )
        })
        .collect();

    let first = geometry::extract_slides(&pages, &config());
    let second = geometry::extract_slides(&pages, &config());
    assert_eq!(first, second);
    assert_eq!(
        slides_to_markdown(&first),
        slides_to_markdown(&second),
        "serialized output must be byte-identical"
    );

    let md_pages: Vec<String> = vec!["# T\nbody text of sensible length here.".into(); 4];
    assert_eq!(
        evaluate_structured(&md_pages, &config()),
        evaluate_structured(&md_pages, &config()),
    );
}

// ── Downstream serialization contract ────────────────────────────────────

#[test]
fn slides_markdown_matches_downstream_record_format() {
    let pages = vec![
        slide_page(0, "Intro", &["Welcome to the course."]),
        PageLayout::new(1, 960.0, 540.0, vec![]),
    ];
    let records = geometry::extract_slides(&pages, &config());
    let md = slides_to_markdown(&records);
    assert_eq!(
        md,
        "# Intro\n\nWelcome to the course.\n\n---\n\n# Slide 2\n\n\n\n---\n\n"
    );
}

#[test]
fn titles_with_newlines_cannot_break_the_heading_line() {
    let record = pdf2slides::SlideRecord::new(0, "Two\nLines", "body");
    let md = slides_to_markdown(&[record]);
    assert!(md.starts_with("# Two Lines\n"));
}

// ── Fallback chain: merged-line behaviour survives the whole strategy ────

#[test]
fn wrapped_bullet_lines_merge_but_sentences_do_not() {
    let page = PageLayout::new(
        0,
        960.0,
        540.0,
        vec![
            text_block(vec![vec![span("Error Handling", 26.0)]]),
            text_block(vec![
                vec![span("Result propagates with the", 13.0)],
                vec![span("question-mark operator.", 13.0)],
                vec![span("Panics are for bugs.", 13.0)],
            ]),
        ],
    );
    let record = geometry::extract_page(&page, &config());
    assert_eq!(
        record.body,
        "Result propagates with the question-mark operator.\nPanics are for bugs."
    );
}

#[test]
fn thresholds_are_tunable_through_the_builder() {
    // Raising the sparse floor flips a previously accepted attempt.
    let pages: Vec<String> = (0..3)
        .map(|_| "# Topic\na body line of comfortable length here".to_string())
        .collect();
    assert!(matches!(
        evaluate_structured(&pages, &config()),
        StructuredVerdict::Accepted { .. }
    ));

    let strict = ExtractionConfig::builder()
        .min_chars_per_page(500.0)
        .build()
        .unwrap();
    assert!(matches!(
        evaluate_structured(&pages, &strict),
        StructuredVerdict::Sparse { .. }
    ));
}
