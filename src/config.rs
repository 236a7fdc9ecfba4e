//! Configuration for slide extraction.
//!
//! All behaviour is controlled through [`ExtractionConfig`], built via its
//! [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across threads, serialise them for logging, and
//! diff two runs to understand why their outputs differ.
//!
//! Every threshold below is an empirically chosen constant carried over
//! from production runs on real lecture decks. They are tunable, not
//! load-bearing correctness constraints — adjust per corpus if the defaults
//! misfire, but do not expect a derivation.

use crate::error::ExtractError;
use crate::pipeline::markdown::MarkdownConverter;
use std::fmt;
use std::sync::Arc;

/// Default gap, in points, below the page's largest font size within which
/// a span still counts as title text.
pub const DEFAULT_TITLE_FONT_GAP: f32 = 2.0;

/// Default font-size ceiling for the page-number filter: 1–3 digit spans
/// smaller than this are treated as footer page numbers and dropped.
pub const DEFAULT_PAGE_NUMBER_MAX_SIZE: f32 = 20.0;

/// Default sparse-output floor: average (title+body) characters per page
/// below which a structured-markdown attempt is discarded outright.
pub const DEFAULT_MIN_CHARS_PER_PAGE: f32 = 30.0;

/// Default quality-score floor for accepting a structured-markdown attempt.
pub const DEFAULT_MIN_QUALITY_SCORE: f32 = 0.35;

/// Default image-to-total block ratio above which a document is treated as
/// a scan or graphic-heavy deck.
pub const DEFAULT_IMAGE_RATIO_THRESHOLD: f32 = 0.4;

/// Default number of leading pages the signal inspector samples for the
/// image-density check.
pub const DEFAULT_INSPECT_SAMPLE_PAGES: usize = 5;

/// Configuration for a PDF-to-slides extraction.
///
/// Built via [`ExtractionConfig::builder()`] or
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2slides::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .min_quality_score(0.5)
///     .title_font_gap(3.0)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Title threshold gap in points. A span qualifies as title text when
    /// its size reaches `max_page_font_size - title_font_gap`. Default: 2.0.
    ///
    /// Slide titles are routinely set in two or three runs whose sizes
    /// differ by a point (bold keyword, trailing colon in regular weight);
    /// the 2pt slack keeps such runs together without pulling in body text.
    pub title_font_gap: f32,

    /// Page-number filter ceiling in points. Default: 20.0.
    ///
    /// Footer page numbers on slides are small; headline numerals ("2024",
    /// a big "3" on an agenda slide) are not. Filtering digit-only spans
    /// below this size drops the former and keeps the latter.
    pub page_number_max_size: f32,

    /// Sparse-output floor in average characters per page. Default: 30.0.
    ///
    /// Scanned decks have no text layer, so the structured converter
    /// returns a handful of stray characters per page. Anything under this
    /// floor is not worth quality-scoring.
    pub min_chars_per_page: f32,

    /// Quality-score floor in [0, 1]. Default: 0.35.
    pub min_quality_score: f32,

    /// Image-block ratio threshold in [0, 1]. Default: 0.4.
    pub image_ratio_threshold: f32,

    /// Leading pages sampled for the image-density check. Default: 5.
    pub inspect_sample_pages: usize,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Structured-markdown converter. When `None`, the built-in
    /// [`crate::pipeline::markdown::UnpdfConverter`] is used. Inject a
    /// custom converter in tests or to swap the extraction backend.
    pub converter: Option<Arc<dyn MarkdownConverter>>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            title_font_gap: DEFAULT_TITLE_FONT_GAP,
            page_number_max_size: DEFAULT_PAGE_NUMBER_MAX_SIZE,
            min_chars_per_page: DEFAULT_MIN_CHARS_PER_PAGE,
            min_quality_score: DEFAULT_MIN_QUALITY_SCORE,
            image_ratio_threshold: DEFAULT_IMAGE_RATIO_THRESHOLD,
            inspect_sample_pages: DEFAULT_INSPECT_SAMPLE_PAGES,
            password: None,
            converter: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("title_font_gap", &self.title_font_gap)
            .field("page_number_max_size", &self.page_number_max_size)
            .field("min_chars_per_page", &self.min_chars_per_page)
            .field("min_quality_score", &self.min_quality_score)
            .field("image_ratio_threshold", &self.image_ratio_threshold)
            .field("inspect_sample_pages", &self.inspect_sample_pages)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "converter",
                &self.converter.as_ref().map(|_| "<dyn MarkdownConverter>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn title_font_gap(mut self, points: f32) -> Self {
        self.config.title_font_gap = points.max(0.0);
        self
    }

    pub fn page_number_max_size(mut self, points: f32) -> Self {
        self.config.page_number_max_size = points.max(0.0);
        self
    }

    pub fn min_chars_per_page(mut self, chars: f32) -> Self {
        self.config.min_chars_per_page = chars.max(0.0);
        self
    }

    pub fn min_quality_score(mut self, score: f32) -> Self {
        self.config.min_quality_score = score;
        self
    }

    pub fn image_ratio_threshold(mut self, ratio: f32) -> Self {
        self.config.image_ratio_threshold = ratio;
        self
    }

    pub fn inspect_sample_pages(mut self, pages: usize) -> Self {
        self.config.inspect_sample_pages = pages.max(1);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn converter(mut self, converter: Arc<dyn MarkdownConverter>) -> Self {
        self.config.converter = Some(converter);
        self
    }

    /// Build the configuration, validating ratio/score ranges.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if !(0.0..=1.0).contains(&c.min_quality_score) {
            return Err(ExtractError::InvalidConfig(format!(
                "min_quality_score must be in [0, 1], got {}",
                c.min_quality_score
            )));
        }
        if !(0.0..=1.0).contains(&c.image_ratio_threshold) {
            return Err(ExtractError::InvalidConfig(format!(
                "image_ratio_threshold must be in [0, 1], got {}",
                c.image_ratio_threshold
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_named_constants() {
        let c = ExtractionConfig::default();
        assert_eq!(c.title_font_gap, DEFAULT_TITLE_FONT_GAP);
        assert_eq!(c.min_quality_score, DEFAULT_MIN_QUALITY_SCORE);
        assert_eq!(c.inspect_sample_pages, DEFAULT_INSPECT_SAMPLE_PAGES);
    }

    #[test]
    fn builder_rejects_out_of_range_score() {
        let err = ExtractionConfig::builder()
            .min_quality_score(1.5)
            .build()
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidConfig(_)));
    }

    #[test]
    fn builder_clamps_negative_gap() {
        let c = ExtractionConfig::builder()
            .title_font_gap(-1.0)
            .build()
            .unwrap();
        assert_eq!(c.title_font_gap, 0.0);
    }

    #[test]
    fn debug_redacts_password() {
        let c = ExtractionConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
    }
}
