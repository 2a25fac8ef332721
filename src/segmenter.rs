//! End-to-end segmentation: normalize, detect (through the cache), export.

use std::path::Path;
use std::sync::Arc;

use crate::normalize::prepare_for_detection;
use crate::sink::{export, ChapterSink};
use crate::{Chapter, ChapterCache, ChapterDetector, Result};

/// Ties a detector to a shared result cache.
///
/// ```rust
/// use std::sync::Arc;
///
/// use chapterize::{ChapterCache, ChapterDetector, DetectorConfig, Segmenter};
///
/// let cache = Arc::new(ChapterCache::default());
/// let detector = ChapterDetector::new(DetectorConfig::default().with_workers(1).unwrap());
/// let segmenter = Segmenter::new(detector, Arc::clone(&cache));
///
/// let text = format!("Chapter 1: Only\n{}", "ocean tide ".repeat(60));
/// let first = segmenter.segment(&text);
/// let second = segmenter.segment(&text);
///
/// assert_eq!(first, second);
/// assert_eq!(cache.stats().hits, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Segmenter {
    detector: ChapterDetector,
    cache: Arc<ChapterCache>,
}

impl Segmenter {
    /// Create a segmenter.
    #[must_use]
    pub fn new(detector: ChapterDetector, cache: Arc<ChapterCache>) -> Self {
        Self { detector, cache }
    }

    /// The detector in use.
    #[must_use]
    pub fn detector(&self) -> &ChapterDetector {
        &self.detector
    }

    /// The shared cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<ChapterCache> {
        &self.cache
    }

    /// Clean `raw` and detect its chapters, consulting the cache first.
    ///
    /// An empty result is cached like any other.
    #[must_use]
    pub fn segment(&self, raw: &str) -> Vec<Chapter> {
        let prepared = prepare_for_detection(raw);

        if let Some(chapters) = self.cache.get(&prepared) {
            tracing::info!(chapters = chapters.len(), cached = true, "segmented document");
            return chapters;
        }

        let chapters = self.detector.detect(&prepared);
        self.cache.put(&prepared, chapters.clone());
        tracing::info!(chapters = chapters.len(), cached = false, "segmented document");
        chapters
    }

    /// Segment `raw` and write every chapter to `sink` under `location`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Sink`] for the first chapter the sink refuses.
    /// Earlier chapters remain written.
    pub fn segment_and_save(
        &self,
        raw: &str,
        sink: &dyn ChapterSink,
        location: &Path,
    ) -> Result<Vec<Chapter>> {
        let chapters = self.segment(raw);
        if chapters.is_empty() {
            tracing::warn!("no chapters detected; nothing to export");
            return Ok(chapters);
        }
        export(&chapters, sink, location)?;
        Ok(chapters)
    }
}
