//! Split a plain-text book into one file per chapter.
//!
//! ```bash
//! RUST_LOG=chapterize=debug cargo run --example split_book -- book.txt out/
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use chapterize::{
    read_document, ChapterCache, ChapterDetector, DetectorConfig, DirectorySink, Segmenter,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        eprintln!("usage: split_book <book.txt> <output-dir>");
        std::process::exit(2);
    };
    let (input, output) = (PathBuf::from(input), PathBuf::from(output));

    let raw = read_document(&input)?;
    let segmenter = Segmenter::new(
        ChapterDetector::new(DetectorConfig::default()),
        Arc::new(ChapterCache::default()),
    );

    let chapters = segmenter.segment_and_save(&raw, &DirectorySink, &output)?;
    if chapters.is_empty() {
        eprintln!("no chapters found in {}", input.display());
        std::process::exit(1);
    }

    for chapter in &chapters {
        println!("{chapter}");
    }
    println!(
        "\nwrote {} chapters to {}",
        chapters.len(),
        output.display()
    );
    Ok(())
}
