//! Heuristic boundary patterns.
//!
//! A boundary is a line that opens a chapter. Books announce them in many
//! ways, and OCR output garbles all of them a little, so matching is a
//! ranked list of grammars rather than a single expression:
//!
//! ```text
//! priority  grammar     example                   base weight
//! 1         Chapter     "Chapter 3: The Delta"    1.0
//! 2         Numbered    "3. The Delta"            0.8
//! 3         Part        "Part II - Uplands"       0.7
//! 4         Roman       "IV. The Delta"           0.6
//! 5+        Custom      caller supplied           caller supplied
//! ```
//!
//! ## First Match Wins
//!
//! Grammars are tried in list order and the first one that matches *and*
//! yields a resolvable number decides the boundary. Confidence does not take
//! part in selection; it is carried along so the merge step can rank two
//! detections of the same chapter number.
//!
//! ## Sub-chapters
//!
//! `"3.2 Tributaries"` is checked separately, and only when no top-level
//! grammar matched the line. Its number is encoded as `3 * 100 + 2 = 302`.
//!
//! ## Confidence
//!
//! ```text
//! confidence = base
//!            * 0.7  if the captured title is shorter than 3 chars
//!            * 0.8  if the numeral token is longer than 3 chars
//!            * 1.2  if the line contains the word "Chapter"
//! clamped to at most 1.0
//! ```

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::{numeral, Error, Result};

static CHAPTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*chapter\s+([0-9]+|[a-z]+)\b(?:\s*[:.\-]\s*|\s*)(.*)$")
        .expect("valid chapter regex")
});
static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([0-9]+)\.\s+(.*)$").expect("valid numbered regex"));
static PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*part\s+([0-9]+|[a-z]+)\b(?:\s*[:.\-]\s*|\s*)(.*)$")
        .expect("valid part regex")
});
static ROMAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*([ivxlcdm]+)\.\s+(.*)$").expect("valid roman regex")
});
static SUBCHAPTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]+)\.([0-9]+)\s+(.*)$").expect("valid subchapter regex")
});

/// Characters trimmed from both ends of a title.
const TITLE_SEPARATORS: &[char] = &[':', ',', '-', ' ', '\t', '\n', '\r'];

/// One heading grammar.
#[derive(Debug, Clone)]
pub enum Grammar {
    /// `Chapter N: Title`
    Chapter,
    /// `N. Title`
    Numbered,
    /// `Part N: Title`
    Part,
    /// `IV. Title`
    Roman,
    /// Caller-supplied expression; group 1 is the numeral, group 2 the title.
    Custom(Regex),
}

impl Grammar {
    fn regex(&self) -> &Regex {
        match self {
            Self::Chapter => &CHAPTER,
            Self::Numbered => &NUMBERED,
            Self::Part => &PART,
            Self::Roman => &ROMAN,
            Self::Custom(re) => re,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Numbered => "numbered",
            Self::Part => "part",
            Self::Roman => "roman",
            Self::Custom(_) => "custom",
        }
    }
}

/// A stateless boundary rule: a grammar and its base confidence.
#[derive(Debug, Clone)]
pub struct BoundaryPattern {
    grammar: Grammar,
    weight: f32,
}

impl BoundaryPattern {
    /// Create a pattern from a built-in grammar.
    #[must_use]
    pub fn new(grammar: Grammar, weight: f32) -> Self {
        Self {
            grammar,
            weight: weight.clamp(0.0, 1.0),
        }
    }

    /// Compile a custom pattern.
    ///
    /// The expression must capture the numeral token in group 1 and the
    /// title in group 2.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression does not compile or has fewer than
    /// two capture groups.
    pub fn custom(pattern: &str, weight: f32) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        // captures_len counts the implicit whole-match group
        if regex.captures_len() < 3 {
            return Err(Error::MissingCaptureGroups(pattern.to_string()));
        }
        Ok(Self::new(Grammar::Custom(regex), weight))
    }

    /// The grammar this pattern applies.
    #[must_use]
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// The base confidence.
    #[must_use]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    fn apply(&self, line: &str) -> Option<Heading> {
        let caps = self.grammar.regex().captures(line)?;
        let token = caps.get(1)?.as_str();
        let raw_title = caps.get(2).map_or("", |m| m.as_str());
        let number = numeral::resolve(token)?;

        Some(Heading {
            number,
            title: clean_title(raw_title),
            confidence: refine_confidence(self.weight, raw_title, token, line),
            grammar: self.grammar.name(),
        })
    }
}

/// A matched top-level heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// Resolved chapter number.
    pub number: u32,
    /// Cleaned title.
    pub title: String,
    /// Refined confidence.
    pub confidence: f32,
    /// Name of the grammar that matched.
    pub grammar: &'static str,
}

/// A matched sub-chapter heading (`N.M Title`).
#[derive(Debug, Clone, PartialEq)]
pub struct SubHeading {
    /// Encoded number, `N * 100 + M`.
    pub number: u32,
    /// Cleaned title.
    pub title: String,
}

/// What a line turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    /// Opens a top-level chapter.
    Chapter(Heading),
    /// Opens a numbered section inside the current chapter.
    Subchapter(SubHeading),
}

/// Ordered boundary rules. List order is evaluation priority.
///
/// ```rust
/// use chapterize::{Boundary, BoundaryMatcher};
///
/// let matcher = BoundaryMatcher::standard();
/// match matcher.classify("Chapter XIV: Deltas") {
///     Some(Boundary::Chapter(h)) => {
///         assert_eq!(h.number, 14);
///         assert_eq!(h.title, "Deltas");
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BoundaryMatcher {
    patterns: Vec<BoundaryPattern>,
}

impl BoundaryMatcher {
    /// The built-in grammars in priority order.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            patterns: vec![
                BoundaryPattern::new(Grammar::Chapter, 1.0),
                BoundaryPattern::new(Grammar::Numbered, 0.8),
                BoundaryPattern::new(Grammar::Part, 0.7),
                BoundaryPattern::new(Grammar::Roman, 0.6),
            ],
        }
    }

    /// Append a pattern at the lowest priority.
    #[must_use]
    pub fn with_pattern(mut self, pattern: BoundaryPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// The patterns in evaluation order.
    #[must_use]
    pub fn patterns(&self) -> &[BoundaryPattern] {
        &self.patterns
    }

    /// Match a line against the top-level grammars.
    #[must_use]
    pub fn match_heading(&self, line: &str) -> Option<Heading> {
        self.patterns.iter().find_map(|p| p.apply(line))
    }

    /// Match a line against the sub-chapter grammar.
    #[must_use]
    pub fn match_subheading(&self, line: &str) -> Option<SubHeading> {
        let caps = SUBCHAPTER.captures(line)?;
        let number = encode_subchapter(&caps)?;
        Some(SubHeading {
            number,
            title: clean_title(caps.get(3).map_or("", |m| m.as_str())),
        })
    }

    /// Classify a line; top-level grammars take precedence.
    #[must_use]
    pub fn classify(&self, line: &str) -> Option<Boundary> {
        if let Some(heading) = self.match_heading(line) {
            return Some(Boundary::Chapter(heading));
        }
        self.match_subheading(line).map(Boundary::Subchapter)
    }
}

impl Default for BoundaryMatcher {
    fn default() -> Self {
        Self::standard()
    }
}

fn encode_subchapter(caps: &Captures<'_>) -> Option<u32> {
    let parent: u32 = caps.get(1)?.as_str().parse().ok()?;
    let sub: u32 = caps.get(2)?.as_str().parse().ok()?;
    parent.checked_mul(100)?.checked_add(sub)
}

/// Strip whitespace and separator punctuation from both ends of a title.
#[must_use]
pub fn clean_title(raw: &str) -> String {
    raw.trim_matches(|c: char| c.is_whitespace() || TITLE_SEPARATORS.contains(&c))
        .to_string()
}

/// Adjust a base weight by how heading-like the match looks.
#[must_use]
pub fn refine_confidence(base: f32, raw_title: &str, token: &str, line: &str) -> f32 {
    let mut confidence = base;
    if raw_title.chars().count() < 3 {
        confidence *= 0.7;
    }
    if token.chars().count() > 3 {
        confidence *= 0.8;
    }
    if line.contains("Chapter") {
        confidence *= 1.2;
    }
    confidence.min(1.0)
}
