//! Font-geometry extraction: heuristic (title, body) reconstruction.
//!
//! Presentation exports and scans carry no usable heading markup, but they
//! do carry typography: the title is set in the page's largest font. This
//! module classifies spans (dropping icon-font junk and footer page
//! numbers), locks onto the first block that reaches the title size
//! threshold, and assembles everything else into body paragraphs.
//!
//! Two rules here look arbitrary and are not:
//!
//! * **Title-block lock-in** — the first span to reach the threshold fixes
//!   the title block; large spans in *other* blocks are demoted to body.
//!   Decks love oversized pull-quotes and section numbers; without the
//!   lock-in they would concatenate into a franken-title.
//! * **Punctuation-gated line merging** — a line is glued onto its
//!   predecessor unless the predecessor already ends in sentence-terminal
//!   punctuation. Wrapped sentences rejoin; bullet lists keep their breaks.
//!   A heuristic, not a grammar: [`merge_lines`] stays a pure function so
//!   it can be tested to death in isolation.

use crate::config::ExtractionConfig;
use crate::layout::PageLayout;
use crate::output::SlideRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Substrings identifying decorative icon fonts whose spans are never
/// content (bullet glyphs, arrows, dingbats).
const ICON_FONT_MARKERS: [&str; 5] = [
    "Wingdings",
    "Wingdings2",
    "Wingdings3",
    "Symbol",
    "ZapfDingbats",
];

/// Trailing characters that end a merged line: anything else means the
/// line wrapped mid-sentence and the next entry continues it.
const SENTENCE_TERMINALS: [char; 9] = ['.', '!', '?', ':', ';', ',', ')', ']', '}'];

/// 1–3 digit spans are footer page numbers when set below the size floor.
static PAGE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,3}$").unwrap());

/// A span flattened out of the block/line nesting, keeping its position
/// for title lock-in and line grouping.
struct FlatSpan<'a> {
    block: usize,
    line: usize,
    text: &'a str,
    font_name: &'a str,
    font_size: f32,
}

/// Extract every page of the snapshot. One record per page, in page order.
pub fn extract_slides(pages: &[PageLayout], config: &ExtractionConfig) -> Vec<SlideRecord> {
    pages.iter().map(|p| extract_page(p, config)).collect()
}

/// Extract a single page into its `(title, body)` record.
pub fn extract_page(page: &PageLayout, config: &ExtractionConfig) -> SlideRecord {
    let survivors = classify_spans(page, config);
    if survivors.is_empty() {
        return SlideRecord::new(page.index, "", "");
    }

    let max_size = survivors
        .iter()
        .map(|s| s.font_size)
        .fold(f32::MIN, f32::max);
    let title_threshold = max_size - config.title_font_gap;

    let mut title_block: Option<usize> = None;
    let mut title_parts: Vec<&str> = Vec::new();
    // block index → ordered (line index, accumulated text) entries
    let mut body_blocks: BTreeMap<usize, Vec<(usize, String)>> = BTreeMap::new();

    for span in &survivors {
        let joins_title = span.font_size >= title_threshold
            && match title_block {
                None => {
                    title_block = Some(span.block);
                    true
                }
                Some(owner) => owner == span.block,
            };

        if joins_title {
            title_parts.push(span.text);
        } else {
            let entries = body_blocks.entry(span.block).or_default();
            match entries.last_mut() {
                // Same (block, line) key: the span continues the line.
                Some((line, text)) if *line == span.line => {
                    text.push(' ');
                    text.push_str(span.text);
                }
                _ => entries.push((span.line, span.text.to_string())),
            }
        }
    }

    let title = title_parts.join(" ").trim().to_string();
    let body = assemble_body(body_blocks);
    SlideRecord::new(page.index, title, body)
}

/// Flatten a page's text blocks into spans, dropping empty spans, icon-font
/// spans, and small digit-only footer page numbers.
fn classify_spans<'a>(page: &'a PageLayout, config: &ExtractionConfig) -> Vec<FlatSpan<'a>> {
    let mut out = Vec::new();
    for (block_index, block) in page.blocks.iter().enumerate() {
        for (line_index, line) in block.lines().iter().enumerate() {
            for span in &line.spans {
                let text = span.text.trim();
                if text.is_empty() {
                    continue;
                }
                if is_icon_font(&span.font_name) {
                    continue;
                }
                if is_page_number(text, span.font_size, config) {
                    continue;
                }
                out.push(FlatSpan {
                    block: block_index,
                    line: line_index,
                    text,
                    font_name: &span.font_name,
                    font_size: span.font_size,
                });
            }
        }
    }
    out
}

fn is_icon_font(font_name: &str) -> bool {
    ICON_FONT_MARKERS.iter().any(|m| font_name.contains(m))
}

fn is_page_number(text: &str, font_size: f32, config: &ExtractionConfig) -> bool {
    font_size < config.page_number_max_size && PAGE_NUMBER_RE.is_match(text)
}

/// Merge a block's line entries into display lines: an entry is appended to
/// its predecessor (space-joined) unless the predecessor already ends in
/// sentence-terminal punctuation.
pub fn merge_lines(entries: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for entry in entries {
        match merged.last_mut() {
            Some(prev) if !ends_in_terminal(prev) => {
                prev.push(' ');
                prev.push_str(entry);
            }
            _ => merged.push(entry.clone()),
        }
    }
    merged
}

fn ends_in_terminal(line: &str) -> bool {
    line.chars()
        .next_back()
        .map(|c| SENTENCE_TERMINALS.contains(&c))
        .unwrap_or(true)
}

/// One paragraph per block (lines joined by '\n'), paragraphs separated by
/// a blank line, runaway newline runs collapsed to a single blank line.
fn assemble_body(body_blocks: BTreeMap<usize, Vec<(usize, String)>>) -> String {
    let paragraphs: Vec<String> = body_blocks
        .into_values()
        .map(|entries| {
            let lines: Vec<String> = entries.into_iter().map(|(_, text)| text).collect();
            merge_lines(&lines).join("\n")
        })
        .collect();
    collapse_newlines(&paragraphs.join("\n\n"))
}

static NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_newlines(text: &str) -> String {
    NEWLINE_RUNS.replace_all(text, "\n\n").to_string()
}
