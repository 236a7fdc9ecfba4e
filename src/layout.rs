//! Immutable page descriptors: the document model the extraction core
//! reasons about.
//!
//! The pdfium handle never leaves [`crate::pipeline::loader`]; everything
//! downstream of the loader works on the owned, read-only snapshot defined
//! here. That keeps the decision logic (signal inspection, span
//! classification, title/body splitting) pure and testable with synthetic
//! pages — no PDF fixture required — and guarantees the document handle is
//! closed before any strategy runs.
//!
//! The hierarchy mirrors what a PDF text layer actually provides:
//!
//! ```text
//! DocumentSnapshot ─▶ PageLayout ─▶ Block ─▶ Line ─▶ TextSpan
//!                                   (text | image)
//! ```

use serde::{Deserialize, Serialize};

/// Smallest styled text unit: one run of characters sharing a font and size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// Text content, whitespace-trimmed at load time.
    pub text: String,
    /// Font name as reported by the document (e.g. "Helvetica-Bold",
    /// "Wingdings"). May be empty when the font is unnamed.
    pub font_name: String,
    /// Effective (rendered) font size in points.
    pub font_size: f32,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, font_name: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_name: font_name.into(),
            font_size,
        }
    }
}

/// A horizontal line: spans sharing (approximately) one baseline, in
/// left-to-right order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub spans: Vec<TextSpan>,
}

impl Line {
    pub fn new(spans: Vec<TextSpan>) -> Self {
        Self { spans }
    }
}

/// A layout region: either a group of text lines or a placed image.
///
/// Image blocks carry no content — they exist so the signal inspector can
/// measure the image-to-text block ratio of scanned or graphic-heavy decks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Text { lines: Vec<Line> },
    Image,
}

impl Block {
    pub fn is_image(&self) -> bool {
        matches!(self, Block::Image)
    }

    /// Lines of a text block; empty slice for image blocks.
    pub fn lines(&self) -> &[Line] {
        match self {
            Block::Text { lines } => lines,
            Block::Image => &[],
        }
    }
}

/// One page of the document: geometry plus blocks in top-to-bottom order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// 0-based page index.
    pub index: usize,
    /// Page width in points.
    pub width: f32,
    /// Page height in points.
    pub height: f32,
    pub blocks: Vec<Block>,
}

impl PageLayout {
    pub fn new(index: usize, width: f32, height: f32, blocks: Vec<Block>) -> Self {
        Self {
            index,
            width,
            height,
            blocks,
        }
    }

    /// Rounded (width, height) used for the page-uniformity check. Rounding
    /// absorbs sub-point jitter between pages of the same nominal size.
    pub fn rounded_size(&self) -> (u32, u32) {
        (self.width.round() as u32, self.height.round() as u32)
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// The full read-only snapshot of an opened document: everything both
/// extraction strategies and the signal inspector ever need.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    pub metadata: crate::output::DocumentMetadata,
    pub pages: Vec<PageLayout>,
}

impl DocumentSnapshot {
    /// Condense the snapshot into the descriptor the signal inspector
    /// consumes, sampling block counts from the first `sample_pages` pages.
    pub fn profile(&self, sample_pages: usize) -> DocumentProfile {
        let mut image_blocks = 0;
        let mut total_blocks = 0;
        for page in self.pages.iter().take(sample_pages) {
            for block in &page.blocks {
                total_blocks += 1;
                if block.is_image() {
                    image_blocks += 1;
                }
            }
        }
        DocumentProfile {
            creator: self.metadata.creator.clone(),
            producer: self.metadata.producer.clone(),
            page_count: self.pages.len(),
            page_sizes: self.pages.iter().map(PageLayout::rounded_size).collect(),
            first_page_landscape: self.pages.first().map(PageLayout::is_landscape).unwrap_or(false),
            sampled_image_blocks: image_blocks,
            sampled_total_blocks: total_blocks,
        }
    }
}

/// Document-level signals, condensed from a [`DocumentSnapshot`].
///
/// This is the value the [`crate::pipeline::inspect`] decision function
/// operates on. It is deliberately detached from pdfium types so tests can
/// construct arbitrary profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentProfile {
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
    /// Rounded (width, height) per page, in page order.
    pub page_sizes: Vec<(u32, u32)>,
    pub first_page_landscape: bool,
    /// Image blocks among the sampled leading pages.
    pub sampled_image_blocks: usize,
    /// All blocks among the sampled leading pages.
    pub sampled_total_blocks: usize,
}

impl DocumentProfile {
    /// True when every page shares the same rounded dimensions.
    pub fn uniform_page_size(&self) -> bool {
        match self.page_sizes.first() {
            Some(first) => self.page_sizes.iter().all(|s| s == first),
            None => true,
        }
    }

    /// Image-to-total block ratio over the sampled pages; 0 when nothing
    /// was sampled.
    pub fn image_block_ratio(&self) -> f32 {
        if self.sampled_total_blocks == 0 {
            0.0
        } else {
            self.sampled_image_blocks as f32 / self.sampled_total_blocks as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str) -> TextSpan {
        TextSpan::new(text, "Helvetica", 12.0)
    }

    #[test]
    fn rounded_size_absorbs_jitter() {
        let a = PageLayout::new(0, 960.02, 539.98, vec![]);
        let b = PageLayout::new(1, 959.97, 540.01, vec![]);
        assert_eq!(a.rounded_size(), b.rounded_size());
    }

    #[test]
    fn image_block_has_no_lines() {
        assert!(Block::Image.lines().is_empty());
        let text = Block::Text {
            lines: vec![Line::new(vec![span("hi")])],
        };
        assert_eq!(text.lines().len(), 1);
    }

    #[test]
    fn profile_samples_only_leading_pages() {
        let image_page = |i| PageLayout::new(i, 960.0, 540.0, vec![Block::Image, Block::Image]);
        let text_page = |i| {
            PageLayout::new(
                i,
                960.0,
                540.0,
                vec![Block::Text {
                    lines: vec![Line::new(vec![span("body")])],
                }],
            )
        };
        let snapshot = DocumentSnapshot {
            metadata: crate::output::DocumentMetadata::default(),
            pages: vec![
                text_page(0),
                text_page(1),
                image_page(2), // beyond the 2-page sample window
            ],
        };
        let profile = snapshot.profile(2);
        assert_eq!(profile.sampled_total_blocks, 2);
        assert_eq!(profile.sampled_image_blocks, 0);
        assert_eq!(profile.page_count, 3);
    }

    #[test]
    fn image_ratio_zero_without_blocks() {
        let profile = DocumentProfile {
            creator: None,
            producer: None,
            page_count: 1,
            page_sizes: vec![(612, 792)],
            first_page_landscape: false,
            sampled_image_blocks: 0,
            sampled_total_blocks: 0,
        };
        assert_eq!(profile.image_block_ratio(), 0.0);
    }

    #[test]
    fn uniform_size_detects_mismatch() {
        let profile = DocumentProfile {
            creator: None,
            producer: None,
            page_count: 2,
            page_sizes: vec![(960, 540), (612, 792)],
            first_page_landscape: true,
            sampled_image_blocks: 0,
            sampled_total_blocks: 0,
        };
        assert!(!profile.uniform_page_size());
    }
}
