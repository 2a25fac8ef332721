//! # chapterize
//!
//! Chapter segmentation for scanned and extracted book text.
//!
//! ## The Problem
//!
//! A book that went through OCR arrives as one long string. The chapter
//! structure is still in there, but only as heading lines, and the headings
//! are inconsistent (`Chapter 3`, `III.`, `Part Two`) and damaged by
//! recognition errors (`Chapter l` for `Chapter I`). Running headers, lists
//! and table-of-contents pages look like headings too.
//!
//! The job is to find the real boundaries, number them, and hand each
//! chapter's text to storage.
//!
//! ## Pipeline
//!
//! ```text
//! raw text
//!    |  normalize::prepare_for_detection   (artifacts, glyph confusions)
//!    v
//! cache lookup ---- hit ---------------------------------+
//!    | miss                                               |
//!    v                                                    |
//! ChapterDetector::detect                                 |
//!    |  partition lines -> scan chunks in parallel        |
//!    |  -> merge by number -> sort                        |
//!    v                                                    |
//! cache put <--------------------------------------------+
//!    |
//!    v
//! export: reflow each chapter, ChapterSink::save
//! ```
//!
//! ## Recognizing Boundaries
//!
//! Each line is tried against a ranked list of heading grammars. The first
//! one that matches with a resolvable number wins. Numbers may be decimal,
//! Roman (`XIV`) or a few English words (`two`, `third`). `N.M Title` lines
//! inside a chapter become sub-chapters numbered `N * 100 + M`.
//!
//! ## Rejecting False Positives
//!
//! A candidate chapter is kept only if its body is long enough (500
//! characters by default) and its vocabulary is not a near copy of a chapter
//! already accepted (word-set Jaccard similarity above 0.8). Running headers
//! and repeated table-of-contents blocks fail one test or the other.
//!
//! ## Quick Start
//!
//! ```rust
//! use chapterize::{ChapterDetector, DetectorConfig};
//!
//! let text = format!(
//!     "Chapter 1: Intro\n{}\nChapter 2: Next\n{}\n",
//!     "harbor gull salt ".repeat(40),
//!     "meadow clover bee ".repeat(40),
//! );
//!
//! let detector = ChapterDetector::new(DetectorConfig::default().with_workers(1)?);
//! let chapters = detector.detect(&text);
//!
//! assert_eq!(chapters.len(), 2);
//! assert_eq!(chapters[1].title, "Next");
//! # Ok::<(), chapterize::Error>(())
//! ```
//!
//! ## Parallelism
//!
//! Detection splits the document into one chunk of lines per worker and scans
//! the chunks independently on the rayon pool. Chunks never see each other's
//! lines, so a chapter's body is cut at its chunk boundary. Pass
//! `with_workers(1)` when exact bodies matter more than throughput.

mod cache;
mod chapter;
mod chunk;
mod config;
mod detector;
mod error;
pub mod normalize;
pub mod numeral;
mod pattern;
mod recognize;
mod segmenter;
mod sink;
mod source;
mod validate;

pub use cache::{fingerprint, CacheStats, ChapterCache};
pub use chapter::{Chapter, SUBCHAPTER_CONFIDENCE};
pub use chunk::ChunkProcessor;
pub use config::{
    default_workers, CacheConfig, ConfigError, DetectorConfig, DEFAULT_CACHE_CAPACITY,
    DEFAULT_CACHE_EXPIRATION, DEFAULT_MAX_SIMILARITY, DEFAULT_MIN_CHAPTER_LENGTH,
};
pub use detector::{merge_into, partition, ChapterDetector};
pub use error::{Error, Result};
pub use pattern::{
    clean_title, refine_confidence, Boundary, BoundaryMatcher, BoundaryPattern, Grammar, Heading,
    SubHeading,
};
pub use recognize::{collect_page_text, PageRecognizer, RecognitionResult};
pub use segmenter::Segmenter;
pub use sink::{export, ChapterSink, DirectorySink};
pub use source::{read_document, DocumentKind};
pub use validate::{jaccard_similarity, Validator};
