//! OCR and OMR collaborators.
//!
//! Recognition engines live outside this crate. They hand back text, and
//! the segmenter treats that text exactly like a plain-text document.

use std::path::Path;

use crate::{Error, Result};

/// Outcome of recognizing one document page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognitionResult {
    /// Whether recognition ran to completion.
    pub success: bool,
    /// Whether music notation was found on the page.
    pub has_music: bool,
    /// Recognized prose.
    pub text: String,
    /// MusicXML for any notation found.
    pub music_xml: Option<String>,
    /// MIDI rendering of that notation.
    pub midi: Option<Vec<u8>>,
    /// Failure description when `success` is false.
    pub error: Option<String>,
}

/// An OCR/OMR engine.
pub trait PageRecognizer: Send + Sync {
    /// Extract text from a page image.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine fails on the image.
    fn recognize_image(&self, image: &Path) -> Result<String>;

    /// Recognize page `page` (1-based) of `document`.
    fn recognize_page(&self, document: &Path, page: u32) -> RecognitionResult;
}

/// Concatenate the text of `pages`, separated by blank lines.
///
/// # Errors
///
/// Fails with the first page the recognizer could not process.
pub fn collect_page_text(
    recognizer: &dyn PageRecognizer,
    document: &Path,
    pages: impl IntoIterator<Item = u32>,
) -> Result<String> {
    let mut text = String::new();
    for page in pages {
        let result = recognizer.recognize_page(document, page);
        if !result.success {
            let reason = result.error.unwrap_or_else(|| "unknown error".to_string());
            return Err(Error::Recognition(format!("page {page}: {reason}")));
        }
        if result.has_music {
            tracing::debug!(page, "page contains music notation");
        }
        if !text.is_empty() {
            text.push_str("\n\n");
        }
        text.push_str(&result.text);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted;

    impl PageRecognizer for Scripted {
        fn recognize_image(&self, _image: &Path) -> Result<String> {
            Ok(String::new())
        }

        fn recognize_page(&self, _document: &Path, page: u32) -> RecognitionResult {
            if page == 3 {
                return RecognitionResult {
                    error: Some("blank scan".into()),
                    ..Default::default()
                };
            }
            RecognitionResult {
                success: true,
                text: format!("page {page} text"),
                ..Default::default()
            }
        }
    }

    #[test]
    fn test_pages_joined() {
        let text = collect_page_text(&Scripted, Path::new("book.pdf"), 1..=2).unwrap();
        assert_eq!(text, "page 1 text\n\npage 2 text");
    }

    #[test]
    fn test_first_failure_reported() {
        let err = collect_page_text(&Scripted, Path::new("book.pdf"), 1..=4).unwrap_err();
        assert!(err.to_string().contains("page 3: blank scan"));
    }
}
