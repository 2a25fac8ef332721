//! Candidate chapter validation.
//!
//! Two filters guard against the matcher's false positives:
//!
//! 1. **Length**: a body shorter than the configured minimum is almost
//!    always a numbered list item or a stray heading-like line inside a
//!    chapter, not a chapter of its own.
//! 2. **Duplication**: a body whose word set overlaps an already accepted
//!    chapter beyond the threshold is the same physical chapter detected
//!    twice (running headers, a table of contents echoing headings).
//!
//! Overlap is the Jaccard index over whitespace-separated tokens:
//!
//! ```text
//! J(A, B) = |A ∩ B| / |A ∪ B|
//! ```

use std::collections::HashSet;

use crate::{Chapter, DetectorConfig};

/// Word-set Jaccard similarity of two texts, tokenized on whitespace.
///
/// Returns `0.0` when both texts are empty.
///
/// ```rust
/// use chapterize::jaccard_similarity;
///
/// assert_eq!(jaccard_similarity("a b c", "a b c"), 1.0);
/// assert_eq!(jaccard_similarity("a b", "c d"), 0.0);
/// assert_eq!(jaccard_similarity("a b c", "b c d"), 0.5);
/// ```
#[must_use]
pub fn jaccard_similarity(a: &str, b: &str) -> f32 {
    let left: HashSet<&str> = a.split_whitespace().collect();
    let right: HashSet<&str> = b.split_whitespace().collect();

    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    let common = left.intersection(&right).count();
    common as f32 / union as f32
}

/// Length and duplicate filter for candidate chapters.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    min_length: usize,
    max_similarity: f32,
}

impl Validator {
    /// Create a validator with explicit thresholds.
    #[must_use]
    pub fn new(min_length: usize, max_similarity: f32) -> Self {
        Self {
            min_length,
            max_similarity,
        }
    }

    /// Whether `candidate` should join `accepted`.
    #[must_use]
    pub fn accepts(&self, candidate: &Chapter, accepted: &[Chapter]) -> bool {
        if candidate.content_length < self.min_length {
            tracing::trace!(
                number = candidate.number,
                length = candidate.content_length,
                "rejected short chapter"
            );
            return false;
        }

        let duplicate = accepted.iter().find(|existing| {
            jaccard_similarity(&candidate.content, &existing.content) > self.max_similarity
        });
        if let Some(existing) = duplicate {
            tracing::trace!(
                number = candidate.number,
                duplicate_of = existing.number,
                "rejected duplicate chapter"
            );
            return false;
        }
        true
    }
}

impl From<&DetectorConfig> for Validator {
    fn from(config: &DetectorConfig) -> Self {
        Self::new(config.min_chapter_length(), config.max_similarity())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::from(&DetectorConfig::default())
    }
}
