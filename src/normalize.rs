//! Text normalization for OCR-derived input.
//!
//! Extracted text arrives with form feeds, stray control bytes, typographic
//! symbols the recognizer could not map, and classic glyph confusions
//! (`l`/`I`, `0`/`O`, `rn`/`m`). The pipeline cleans it in five stages:
//!
//! ```text
//! 1. scan_formulas          note `$ ... $` regions (delimiters kept)
//! 2. remove_artifacts       form feed -> "\n ", non-ASCII/control -> one space
//! 3. fix_recognition_errors ordered regex substitutions
//! 4. collapse_whitespace    every whitespace run -> " ", trimmed
//! 5. reflow                 rebuild paragraphs, captions, headings
//! ```
//!
//! Stage 4 flattens the text onto one line, so anything line-oriented has to
//! look at the text before it. Chapter detection therefore runs on
//! [`prepare_for_detection`] (stages 1-3), while [`normalize`] runs the whole
//! pipeline.
//!
//! None of these functions fail; arbitrary input degrades to heavily
//! space-replaced output.

use std::sync::LazyLock;

use regex::Regex;

/// Substitutions for common recognition confusions, applied in order. Each
/// runs on the output of the previous one.
static CORRECTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\bl\b", "I"),
        (r"rn[O0]use", "mouse"),
        (r"rnouse", "mouse"),
        (r"rn\b", "m"),
        (r"\b0\b", "O"),
        (r"\|", "I"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (Regex::new(pattern).expect("valid correction regex"), replacement)
    })
    .collect()
});

static CAPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Table|Figure)\s+\d+[.:].*$").expect("valid caption regex")
});
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Chapter\s+[IVXLCDM]+:$").expect("valid heading regex"));
static EXCESS_BLANKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank-line regex"));

/// Result of scanning for `$`-delimited formula regions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormulaScan {
    /// Number of `$` delimiters seen.
    pub delimiters: usize,
    /// Whether the text ends inside an unclosed formula.
    pub unclosed: bool,
}

impl FormulaScan {
    /// Whether the text contains any formula delimiter.
    #[must_use]
    pub fn has_formula(&self) -> bool {
        self.delimiters > 0
    }
}

/// Track formula regions: the in-formula state flips on every `$`.
#[must_use]
pub fn scan_formulas(text: &str) -> FormulaScan {
    let mut scan = FormulaScan::default();
    for c in text.chars() {
        if c == '$' {
            scan.delimiters += 1;
            scan.unclosed = !scan.unclosed;
        }
    }
    scan
}

fn is_artifact(c: char) -> bool {
    !c.is_ascii() || ((c as u32) < 0x20 && c != '\n' && c != '\t')
}

/// Strip recognition artifacts.
///
/// Form feeds become a newline followed by a space. Characters outside
/// 7-bit ASCII and C0 control characters other than newline and tab become
/// at most one space; a run of artifacts and blanks never produces more than
/// one separator. Newlines are kept.
///
/// ```rust
/// use chapterize::normalize::remove_artifacts;
///
/// assert_eq!(remove_artifacts("Hello© World™ \x0C Test®"), "Hello World \n Test");
/// ```
#[must_use]
pub fn remove_artifacts(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;
    let mut pending_space = false;

    for c in text.chars() {
        match c {
            '\x0C' => {
                out.push_str("\n ");
                last_was_space = true;
                pending_space = false;
            }
            '\n' => {
                out.push('\n');
                last_was_space = true;
                pending_space = false;
            }
            c if is_artifact(c) => pending_space = !last_was_space,
            c if c.is_ascii_whitespace() => {
                if !last_was_space {
                    out.push(' ');
                }
                last_was_space = true;
                pending_space = false;
            }
            c => {
                if pending_space {
                    out.push(' ');
                }
                out.push(c);
                last_was_space = false;
                pending_space = false;
            }
        }
    }
    out
}

/// Apply the ordered recognition-error substitutions.
///
/// ```rust
/// use chapterize::normalize::fix_recognition_errors;
///
/// assert_eq!(
///     fix_recognition_errors("l am reading. The rn0use ran."),
///     "I am reading. The mouse ran."
/// );
/// ```
#[must_use]
pub fn fix_recognition_errors(text: &str) -> String {
    CORRECTIONS
        .iter()
        .fold(text.to_string(), |acc, (pattern, replacement)| {
            pattern.replace_all(&acc, *replacement).into_owned()
        })
}

/// Collapse every whitespace run, newlines included, to one space and trim.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineClass {
    Caption,
    Heading,
    Ordinary,
}

fn classify(line: &str) -> LineClass {
    if CAPTION.is_match(line) {
        LineClass::Caption
    } else if HEADING.is_match(line) {
        LineClass::Heading
    } else {
        LineClass::Ordinary
    }
}

/// Rebuild paragraph structure.
///
/// - consecutive ordinary lines join with one space
/// - a blank line starts a new paragraph (`"\n\n"`)
/// - table/figure captions (`Table 3: ...`) stand alone between blank lines
/// - `Chapter IV:` heading lines keep their own line
///
/// Plain narrative output carries no trailing newline. Output with a caption
/// or heading ends in one newline unless it contains a `$` formula, which
/// leaves the ending untouched.
///
/// ```rust
/// use chapterize::normalize::reflow;
///
/// assert_eq!(
///     reflow("First line.\nSecond line.\n\nNew paragraph.\nContinued."),
///     "First line. Second line.\n\nNew paragraph. Continued."
/// );
/// ```
#[must_use]
pub fn reflow(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<LineClass> = None;
    let mut paragraph_break = false;
    let mut structural = false;

    for raw in text.split('\n') {
        let line = raw.trim();
        if line.is_empty() {
            paragraph_break = prev.is_some();
            continue;
        }

        let class = classify(line);
        structural |= class != LineClass::Ordinary;
        if let Some(prev) = prev {
            let separator = match (prev, class) {
                (LineClass::Caption, _) | (_, LineClass::Caption) => "\n\n",
                _ if paragraph_break => "\n\n",
                (LineClass::Heading, _) | (_, LineClass::Heading) => "\n",
                _ => " ",
            };
            out.push_str(separator);
        }
        out.push_str(line);
        prev = Some(class);
        paragraph_break = false;
    }

    let mut out = EXCESS_BLANKS.replace_all(&out, "\n\n").into_owned();

    let has_formula = scan_formulas(text).has_formula();
    if !has_formula && !out.ends_with('\n') {
        out.push('\n');
    }
    if !has_formula && !structural {
        out.truncate(out.trim_end_matches('\n').len());
    }
    out
}

/// Stages 1-3: clean artifacts and glyph confusions, keep line structure.
#[must_use]
pub fn prepare_for_detection(raw: &str) -> String {
    fix_recognition_errors(&remove_artifacts(raw))
}

/// Stages 1-4: the flattened clean text.
///
/// ```rust
/// use chapterize::normalize::clean;
///
/// assert_eq!(clean("Hello    World\t\t\nTest    Example"), "Hello World Test Example");
/// ```
#[must_use]
pub fn clean(raw: &str) -> String {
    collapse_whitespace(&prepare_for_detection(raw))
}

/// The full pipeline, stages 1-5.
#[must_use]
pub fn normalize(raw: &str) -> String {
    reflow(&clean(raw))
}
