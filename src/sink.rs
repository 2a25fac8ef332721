//! Chapter persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::normalize::reflow;
use crate::{Chapter, Error, Result};

/// Destination for finished chapters.
///
/// Implementations store one chapter's text under its number. Any error
/// aborts the export run it belongs to; the caller does not retry.
///
/// ```rust
/// use std::cell::RefCell;
/// use std::io;
/// use std::path::Path;
///
/// use chapterize::ChapterSink;
///
/// #[derive(Default)]
/// struct Memory(RefCell<Vec<(u32, String)>>);
///
/// impl ChapterSink for Memory {
///     fn save(&self, content: &str, _location: &Path, number: u32) -> io::Result<()> {
///         self.0.borrow_mut().push((number, content.to_string()));
///         Ok(())
///     }
/// }
///
/// let sink = Memory::default();
/// sink.save("text", Path::new("out"), 1).unwrap();
/// assert_eq!(sink.0.borrow().len(), 1);
/// ```
pub trait ChapterSink {
    /// Store `content` as chapter `number` under `location`.
    ///
    /// # Errors
    ///
    /// Returns the underlying error when the chapter could not be stored.
    fn save(&self, content: &str, location: &Path, number: u32) -> io::Result<()>;
}

/// Writes each chapter to `<location>/chapter_<number>.txt`, creating the
/// directory when missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectorySink;

impl DirectorySink {
    /// The file a chapter is written to.
    #[must_use]
    pub fn chapter_path(location: &Path, number: u32) -> PathBuf {
        location.join(format!("chapter_{number}.txt"))
    }
}

impl ChapterSink for DirectorySink {
    fn save(&self, content: &str, location: &Path, number: u32) -> io::Result<()> {
        fs::create_dir_all(location)?;
        fs::write(Self::chapter_path(location, number), content)
    }
}

/// Hand every chapter to `sink` in order, as reflowed presentation text.
///
/// Stops at the first chapter the sink refuses; chapters saved before it
/// stay saved. Returns the number of chapters written.
///
/// # Errors
///
/// Returns [`Error::Sink`] naming the chapter that failed.
pub fn export(chapters: &[Chapter], sink: &dyn ChapterSink, location: &Path) -> Result<usize> {
    for chapter in chapters {
        let text = reflow(&chapter.content);
        if let Err(source) = sink.save(&text, location, chapter.number) {
            tracing::warn!(
                number = chapter.number,
                title = %chapter.title,
                error = %source,
                "export aborted"
            );
            return Err(Error::Sink {
                number: chapter.number,
                title: chapter.title.clone(),
                source,
            });
        }
        tracing::trace!(number = chapter.number, bytes = text.len(), "chapter saved");
    }
    Ok(chapters.len())
}
