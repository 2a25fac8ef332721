//! Property-based tests for chapter detection and normalization.
//!
//! These tests verify the invariants that hold for any input:
//! - Ordering: detected chapters are strictly ascending and unique by number
//! - Hierarchy: every sub-chapter's parent is in the same result
//! - Numerals: Roman decoding agrees with a reference encoder
//! - Normalization: artifact removal yields ASCII, whitespace collapse is idempotent

use proptest::prelude::*;

use chapterize::normalize::{collapse_whitespace, normalize, remove_artifacts};
use chapterize::numeral::decode_roman;
use chapterize::{
    jaccard_similarity, Chapter, ChapterCache, ChapterDetector, DetectorConfig,
};

// =============================================================================
// Test Generators
// =============================================================================

/// One line of a synthetic book: a heading of some grammar, or prose.
fn book_line() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u32..30).prop_map(|n| format!("Chapter {n}: Title {n}")),
        (1u32..30).prop_map(|n| format!("{n}. Heading")),
        (1u32..10, 1u32..10).prop_map(|(p, s)| format!("{p}.{s} Section")),
        (1u32..10).prop_map(|n| format!("Part {n} - Movement")),
        prop::string::string_regex("[a-z]{3,9}( [a-z]{3,9}){4,20}").unwrap(),
    ]
}

fn book() -> impl Strategy<Value = String> {
    prop::collection::vec(book_line(), 0..80).prop_map(|lines| lines.join("\n"))
}

/// Reference Roman encoder in standard subtractive notation.
fn to_roman(mut n: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (value, symbol) in TABLE {
        while n >= value {
            out.push_str(symbol);
            n -= value;
        }
    }
    out
}

fn detector(workers: usize, min_length: usize) -> ChapterDetector {
    ChapterDetector::new(
        DetectorConfig::default()
            .with_min_chapter_length(min_length)
            .with_workers(workers)
            .unwrap(),
    )
}

// =============================================================================
// Invariant Helpers
// =============================================================================

fn strictly_ascending(chapters: &[Chapter]) -> bool {
    chapters.windows(2).all(|w| w[0].number < w[1].number)
}

fn parents_present(chapters: &[Chapter]) -> bool {
    chapters.iter().filter(|c| c.is_subchapter).all(|sub| {
        chapters
            .iter()
            .any(|c| !c.is_subchapter && c.number == sub.parent_chapter)
    })
}

// =============================================================================
// Detection
// =============================================================================

proptest! {
    #[test]
    fn detected_numbers_strictly_ascending(
        text in book(),
        workers in 1usize..8,
        min_length in 0usize..200,
    ) {
        let chapters = detector(workers, min_length).detect(&text);
        prop_assert!(strictly_ascending(&chapters));
    }

    #[test]
    fn subchapter_parents_present(text in book(), workers in 1usize..8) {
        let chapters = detector(workers, 0).detect(&text);
        prop_assert!(parents_present(&chapters));
    }

    #[test]
    fn confidence_in_unit_interval(text in book(), workers in 1usize..4) {
        for chapter in detector(workers, 0).detect(&text) {
            prop_assert!((0.0..=1.0).contains(&chapter.confidence));
            prop_assert_eq!(chapter.content_length, chapter.content.len());
        }
    }

    #[test]
    fn detection_is_deterministic(text in book(), workers in 1usize..8) {
        let detector = detector(workers, 0);
        prop_assert_eq!(detector.detect(&text), detector.detect(&text));
    }
}

// =============================================================================
// Numerals and Similarity
// =============================================================================

proptest! {
    #[test]
    fn roman_decode_matches_reference(n in 1u32..=100) {
        prop_assert_eq!(decode_roman(&to_roman(n)), Some(n));
        prop_assert_eq!(decode_roman(&to_roman(n).to_lowercase()), Some(n));
    }

    #[test]
    fn jaccard_bounded_and_symmetric(
        a in "[a-d ]{0,40}",
        b in "[a-d ]{0,40}",
    ) {
        let ab = jaccard_similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert!((ab - jaccard_similarity(&b, &a)).abs() < f32::EPSILON);
    }
}

// =============================================================================
// Normalization
// =============================================================================

proptest! {
    #[test]
    fn artifacts_removed_leaves_ascii(text in "\\PC{0,200}") {
        let cleaned = remove_artifacts(&text);
        prop_assert!(cleaned.is_ascii());
        prop_assert!(cleaned.chars().all(|c| c == '\n' || !c.is_ascii_control()));
    }

    #[test]
    fn collapse_is_idempotent(text in "[a-z \\t\\n]{0,200}") {
        let once = collapse_whitespace(&text);
        prop_assert_eq!(collapse_whitespace(&once), once.clone());
        prop_assert!(!once.contains("  "));
    }

    #[test]
    fn normalize_never_panics(text in "\\PC{0,300}") {
        let _ = normalize(&text);
    }
}

// =============================================================================
// Cache
// =============================================================================

proptest! {
    #[test]
    fn cache_returns_what_was_put(content in "\\PC{0,100}", number in 1u32..1000) {
        let cache = ChapterCache::default();
        let chapters = vec![Chapter::new(number, "Title", "body", 0.5)];
        cache.put(&content, chapters.clone());
        prop_assert_eq!(cache.get(&content), Some(chapters));
    }
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn roman_fixed_table() {
    for (token, value) in [("IV", 4), ("IX", 9), ("XL", 40), ("MCMXCIX", 1999)] {
        assert_eq!(decode_roman(token), Some(value), "{token}");
    }
}

#[test]
fn empty_document_yields_nothing() {
    for workers in 1..4 {
        assert!(detector(workers, 0).detect("").is_empty());
    }
}
