//! Document input.
//!
//! Decoding PDF content streams, unpacking EPUB archives and rasterizing
//! pages belong to other tools. This module classifies a path and reads the
//! formats that are already plain text.

use std::path::Path;

use crate::{Error, Result};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "bmp"];

/// Document format, judged by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `.pdf`
    Pdf,
    /// `.epub`
    Epub,
    /// `.txt`
    Text,
    /// A scanned page image.
    Image,
    /// Anything else.
    Unknown,
}

impl DocumentKind {
    /// Classify `path` by its (case-insensitive) extension.
    ///
    /// ```rust
    /// use chapterize::DocumentKind;
    ///
    /// assert_eq!(DocumentKind::from_path("book.PDF".as_ref()), DocumentKind::Pdf);
    /// assert_eq!(DocumentKind::from_path("scan.jpeg".as_ref()), DocumentKind::Image);
    /// assert_eq!(DocumentKind::from_path("notes".as_ref()), DocumentKind::Unknown);
    /// ```
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Unknown;
        };
        let ext = ext.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Self::Pdf,
            "epub" => Self::Epub,
            "txt" => Self::Text,
            e if IMAGE_EXTENSIONS.contains(&e) => Self::Image,
            _ => Self::Unknown,
        }
    }

    /// Whether pages of this kind need a recognizer to yield text.
    #[must_use]
    pub fn needs_recognition(self) -> bool {
        matches!(self, Self::Image | Self::Pdf)
    }
}

/// Read a plain-text document.
///
/// Invalid UTF-8 is replaced rather than rejected; the normalizer strips the
/// replacement characters later.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for anything but `.txt`, and
/// [`Error::Io`] when the file cannot be read.
pub fn read_document(path: &Path) -> Result<String> {
    if DocumentKind::from_path(path) != DocumentKind::Text {
        return Err(Error::UnsupportedFormat(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.txt");
        std::fs::write(&path, b"Chapter 1: A\n\xffbody").unwrap();

        let text = read_document(&path).unwrap();
        assert!(text.starts_with("Chapter 1: A\n"));
        assert!(text.ends_with("body"));
    }

    #[test]
    fn test_unsupported_kinds() {
        assert!(matches!(
            read_document(Path::new("book.epub")),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(DocumentKind::Pdf.needs_recognition());
        assert!(!DocumentKind::Text.needs_recognition());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_document(Path::new("/nonexistent/book.txt")),
            Err(Error::Io { .. })
        ));
    }
}
