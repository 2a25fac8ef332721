//! Parallel chapter detection over line chunks.
//!
//! ## Fork-Join
//!
//! ```text
//! document lines: [0 .................................. n)
//! chunks:         [0..k) [k..2k) [2k..3k) ... [(w-1)k..n)   k = n / w
//!                    |      |       |             |
//!                 scan   scan    scan          scan        (rayon, no shared state)
//!                    \______|_______|_____________/
//!                                  |
//!                        merge by number, sort         (single-threaded)
//! ```
//!
//! ## Chunks Do Not Talk to Each Other
//!
//! A chapter whose heading falls in chunk *k* gets only the body lines that
//! are also in chunk *k*. Lines at the top of chunk *k + 1* that precede its
//! first heading are dropped. This approximation keeps every worker
//! independent; the minimum-length filter discards chapters truncated below
//! usefulness.
//!
//! ## Merge
//!
//! Results are folded chunk by chunk into one list. When an incoming chapter
//! shares a number with one already merged, the higher confidence survives
//! and ties keep the earlier one. Because sub-chapters live in the same
//! number space (`3.2` is `302`), a sub-chapter and an unrelated top-level
//! chapter 302 from another chunk collide here, and one of them is lost.
//!
//! After the fold the list is sorted by number and sub-chapters whose parent
//! did not survive are pruned, so every `parent_chapter` in the result refers
//! to a chapter in the same result.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::chunk::ChunkProcessor;
use crate::pattern::BoundaryMatcher;
use crate::validate::Validator;
use crate::{Chapter, DetectorConfig};

/// Heuristic chapter detector.
///
/// ## Example
///
/// ```rust
/// use chapterize::{ChapterDetector, DetectorConfig};
///
/// let body = |word: &str| format!("{word} ").repeat(120);
/// let text = format!(
///     "Chapter 1: Intro\n{}\nChapter 2: Next\n{}\n",
///     body("alpha"),
///     body("omega"),
/// );
///
/// let detector = ChapterDetector::new(DetectorConfig::default().with_workers(1).unwrap());
/// let chapters = detector.detect(&text);
///
/// assert_eq!(chapters.len(), 2);
/// assert_eq!(chapters[0].title, "Intro");
/// assert_eq!(chapters[1].title, "Next");
/// ```
#[derive(Debug, Clone)]
pub struct ChapterDetector {
    matcher: BoundaryMatcher,
    validator: Validator,
    workers: usize,
}

impl ChapterDetector {
    /// Create a detector with the built-in boundary grammars.
    #[must_use]
    pub fn new(config: DetectorConfig) -> Self {
        Self::with_matcher(config, BoundaryMatcher::standard())
    }

    /// Create a detector with a custom pattern table.
    #[must_use]
    pub fn with_matcher(config: DetectorConfig, matcher: BoundaryMatcher) -> Self {
        Self {
            matcher,
            validator: Validator::from(&config),
            workers: config.workers().max(1),
        }
    }

    /// The pattern table in use.
    #[must_use]
    pub fn matcher(&self) -> &BoundaryMatcher {
        &self.matcher
    }

    /// Number of chunks the document is split into.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Detect chapters in `content`.
    ///
    /// The result is sorted by strictly ascending, unique `number`. Empty
    /// input, or input without any accepted boundary, yields an empty list.
    #[must_use]
    pub fn detect(&self, content: &str) -> Vec<Chapter> {
        if content.is_empty() {
            return Vec::new();
        }

        let lines: Vec<&str> = content.lines().collect();
        let chunks = partition(&lines, self.workers);
        let processor = ChunkProcessor::new(&self.matcher, self.validator);

        let partials: Vec<Vec<Chapter>> = chunks
            .par_iter()
            .map(|&(offset, chunk)| processor.process(chunk, offset))
            .collect();

        let mut merged = Vec::new();
        for partial in partials {
            merge_into(&mut merged, partial);
        }
        merged.sort_by_key(|c| c.number);
        prune_orphans(&mut merged);

        tracing::debug!(
            lines = lines.len(),
            chunks = chunks.len(),
            chapters = merged.len(),
            "detection finished"
        );
        merged
    }
}

impl Default for ChapterDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

/// Split `lines` into at most `count` contiguous chunks.
///
/// Every chunk but the last holds `lines.len() / count` lines; the last
/// absorbs the remainder. Fewer lines than chunks yields a single chunk.
/// Each entry is `(offset of first line, lines)`.
#[must_use]
pub fn partition<'l, 'a>(lines: &'l [&'a str], count: usize) -> Vec<(usize, &'l [&'a str])> {
    let count = count.max(1);
    if lines.is_empty() {
        return Vec::new();
    }
    if lines.len() < count {
        return vec![(0, lines)];
    }

    let per_chunk = (lines.len() / count).max(1);
    let mut chunks = Vec::with_capacity(count);
    let mut start = 0;
    for _ in 0..count - 1 {
        chunks.push((start, &lines[start..start + per_chunk]));
        start += per_chunk;
    }
    chunks.push((start, &lines[start..]));
    chunks
}

/// Fold `incoming` into `merged`, resolving number collisions by confidence.
pub fn merge_into(merged: &mut Vec<Chapter>, incoming: Vec<Chapter>) {
    for candidate in incoming {
        match merged.iter_mut().find(|c| c.number == candidate.number) {
            Some(existing) => {
                tracing::debug!(
                    number = candidate.number,
                    kept = existing.confidence.max(candidate.confidence),
                    "chapter number collision"
                );
                if candidate.confidence > existing.confidence {
                    *existing = candidate;
                }
            }
            None => merged.push(candidate),
        }
    }
}

/// Remove sub-chapters whose parent is not in `chapters`.
fn prune_orphans(chapters: &mut Vec<Chapter>) {
    let top_level: HashSet<u32> = chapters
        .iter()
        .filter(|c| !c.is_subchapter)
        .map(|c| c.number)
        .collect();

    let before = chapters.len();
    chapters.retain(|c| !c.is_subchapter || top_level.contains(&c.parent_chapter));
    if chapters.len() < before {
        tracing::debug!(pruned = before - chapters.len(), "dropped orphaned sub-chapters");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_even() {
        let lines = ["a", "b", "c", "d", "e", "f"];
        let chunks = partition(&lines, 3);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], (0, &lines[0..2]));
        assert_eq!(chunks[2], (4, &lines[4..6]));
    }

    #[test]
    fn test_partition_remainder_goes_last() {
        let lines = ["a", "b", "c", "d", "e", "f", "g"];
        let chunks = partition(&lines, 3);
        let sizes: Vec<usize> = chunks.iter().map(|(_, c)| c.len()).collect();
        assert_eq!(sizes, vec![2, 2, 3]);
    }

    #[test]
    fn test_partition_fewer_lines_than_chunks() {
        let lines = ["a", "b"];
        let chunks = partition(&lines, 8);
        assert_eq!(chunks, vec![(0, &lines[..])]);
        assert!(partition(&[], 4).is_empty());
    }

    #[test]
    fn test_merge_keeps_higher_confidence() {
        let mut merged = vec![Chapter::new(2, "Weak", "a", 0.6)];
        merge_into(
            &mut merged,
            vec![Chapter::new(2, "Strong", "b", 0.9), Chapter::new(5, "Other", "c", 0.5)],
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].title, "Strong");
    }

    #[test]
    fn test_merge_tie_keeps_existing() {
        let mut merged = vec![Chapter::new(2, "First", "a", 0.8)];
        merge_into(&mut merged, vec![Chapter::new(2, "Second", "b", 0.8)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "First");
    }

    #[test]
    fn test_subchapter_collides_with_top_level_number() {
        // A top-level "302." from one chunk beats sub-chapter 3.2 (0.9) only
        // when more confident; here the sub-chapter wins.
        let mut merged = vec![Chapter::subchapter(3, 2, "Sub", "a")];
        merge_into(&mut merged, vec![Chapter::new(302, "List item", "b", 0.8)]);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].is_subchapter);
    }

    #[test]
    fn test_top_level_number_replaces_subchapter() {
        // "Chapter 302" from another chunk outranks sub-chapter 3.2 and the
        // sub-chapter is lost
        let mut merged = vec![
            Chapter::new(3, "Main", "a", 1.0),
            Chapter::subchapter(3, 2, "Sub", "b"),
        ];
        merge_into(&mut merged, vec![Chapter::new(302, "X", "c", 1.0)]);
        assert_eq!(merged.len(), 2);

        let at_302 = merged.iter().find(|c| c.number == 302).unwrap();
        assert!(!at_302.is_subchapter);
        assert_eq!(at_302.title, "X");
    }

    #[test]
    fn test_orphans_pruned() {
        let mut chapters = vec![
            Chapter::new(1, "One", "a", 1.0),
            Chapter::subchapter(1, 1, "Kept", "b"),
            Chapter::subchapter(4, 1, "Orphan", "c"),
        ];
        prune_orphans(&mut chapters);
        assert_eq!(chapters.len(), 2);
        assert!(chapters.iter().all(|c| c.number != 401));
    }

    #[test]
    fn test_empty_input() {
        assert!(ChapterDetector::default().detect("").is_empty());
    }
}
