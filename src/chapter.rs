//! The Chapter type: one detected unit of a document.

/// A detected chapter or sub-chapter with its body text.
///
/// ## Numbering
///
/// Top-level and sub-chapters share one flat, ordered namespace. A
/// sub-chapter's number encodes its parent:
///
/// ```text
/// Chapter 3: Main        -> number 3
/// 3.2 Second Section     -> number 302  (3 * 100 + 2), parent_chapter 3
/// ```
///
/// ```rust
/// use chapterize::Chapter;
///
/// let sub = Chapter::subchapter(3, 2, "Second Section", "body");
/// assert_eq!(sub.number, 302);
/// assert_eq!(sub.parent_chapter, 3);
/// assert!(sub.is_subchapter);
/// ```
///
/// A chapter is only built once its body is complete, i.e. when the next
/// boundary (or the end of its chunk) has been reached.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chapter {
    /// Ordering key; `parent * 100 + sub` for sub-chapters.
    pub number: u32,
    /// Heading text with separator punctuation stripped.
    pub title: String,
    /// Body text between this boundary and the next.
    pub content: String,
    /// Heuristic certainty in `[0, 1]` that the boundary is genuine.
    pub confidence: f32,
    /// Whether this is a numbered section inside a chapter.
    pub is_subchapter: bool,
    /// Enclosing chapter number, `0` for top-level chapters.
    pub parent_chapter: u32,
    /// Byte length of `content`.
    pub content_length: usize,
}

/// Fixed confidence assigned to sub-chapter boundaries.
pub const SUBCHAPTER_CONFIDENCE: f32 = 0.9;

impl Chapter {
    /// Create a top-level chapter.
    #[must_use]
    pub fn new(
        number: u32,
        title: impl Into<String>,
        content: impl Into<String>,
        confidence: f32,
    ) -> Self {
        let content = content.into();
        Self {
            number,
            title: title.into(),
            content_length: content.len(),
            content,
            confidence,
            is_subchapter: false,
            parent_chapter: 0,
        }
    }

    /// Create a sub-chapter of `parent`, numbered `parent * 100 + sub`.
    #[must_use]
    pub fn subchapter(
        parent: u32,
        sub: u32,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let number = parent.saturating_mul(100).saturating_add(sub);
        Self::subchapter_numbered(parent, number, title, content)
    }

    /// Create a sub-chapter with an already encoded number.
    #[must_use]
    pub(crate) fn subchapter_numbered(
        parent: u32,
        number: u32,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            is_subchapter: true,
            parent_chapter: parent,
            ..Self::new(number, title, content, SUBCHAPTER_CONFIDENCE)
        }
    }

    /// The body length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content_length
    }

    /// Whether the body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content_length == 0
    }

    /// The enclosing chapter number, if this is a sub-chapter.
    #[must_use]
    pub fn parent(&self) -> Option<u32> {
        self.is_subchapter.then_some(self.parent_chapter)
    }
}

impl std::fmt::Display for Chapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_subchapter {
            // the heading's own N.M, which need not match parent_chapter
            write!(f, "{}.{} {}", self.number / 100, self.number % 100, self.title)
        } else {
            write!(f, "Chapter {}: {}", self.number, self.title)
        }
    }
}
