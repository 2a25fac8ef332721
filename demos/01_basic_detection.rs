//! Basic Chapter Detection
//!
//! The minimal example: find chapters in a short OCR-damaged text.
//!
//! ```bash
//! cargo run --example 01_basic_detection
//! ```

use chapterize::normalize::prepare_for_detection;
use chapterize::{ChapterDetector, DetectorConfig};

fn paragraph(seed: &str) -> String {
    (0..40)
        .map(|i| format!("{seed}{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> chapterize::Result<()> {
    // "Chapter l" is the usual OCR reading of "Chapter I"
    let raw = format!(
        "Chapter l: The Harbor\n{}\n\
         Chapter II: The Storm\n{}\n\
         2.1 Aftermath\n{}\n",
        paragraph("harbor"),
        paragraph("storm"),
        paragraph("calm"),
    );

    let text = prepare_for_detection(&raw);
    let detector = ChapterDetector::new(DetectorConfig::default().with_min_chapter_length(100));
    let chapters = detector.detect(&text);

    println!("Document: {} bytes", raw.len());
    println!("Chapters: {}\n", chapters.len());

    for chapter in &chapters {
        let indent = if chapter.is_subchapter { "    " } else { "" };
        println!(
            "{indent}{chapter}  ({} bytes, confidence {:.2})",
            chapter.content_length, chapter.confidence
        );
    }

    Ok(())
}
