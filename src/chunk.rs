//! Single-chunk chapter scanning.
//!
//! A chunk is a contiguous run of lines. Scanning it is a two-state machine
//! with one growable body buffer:
//!
//! ```text
//!              heading                       heading
//!  NoChapter ----------> InChapter(open) -----------> finalize(open), InChapter(new)
//!                            |   ^
//!                 sub-heading|   |  (buffer non-empty: emit sub-chapter from
//!                            |   |   the buffer, clear it, stay in `open`)
//!                            +---+
//!                 other line: append to buffer
//! ```
//!
//! Lines before the first heading are not part of any chapter. At the end of
//! the chunk the open chapter is finalized with whatever body it has; a
//! chunk never looks past its own last line.
//!
//! Every finalized chapter passes through the [`Validator`] against the
//! chapters this chunk already accepted.

use crate::pattern::{Boundary, BoundaryMatcher, Heading};
use crate::validate::Validator;
use crate::Chapter;

/// Scanner for one chunk of lines.
#[derive(Debug, Clone, Copy)]
pub struct ChunkProcessor<'a> {
    matcher: &'a BoundaryMatcher,
    validator: Validator,
}

impl<'a> ChunkProcessor<'a> {
    /// Create a processor borrowing the shared pattern table.
    #[must_use]
    pub fn new(matcher: &'a BoundaryMatcher, validator: Validator) -> Self {
        Self { matcher, validator }
    }

    /// Scan `lines` and return the accepted chapters in encounter order.
    ///
    /// `offset` is the index of the chunk's first line in the whole document
    /// and is only used for diagnostics.
    #[must_use]
    pub fn process(&self, lines: &[&str], offset: usize) -> Vec<Chapter> {
        let mut acc = Accumulator::new(self.validator);
        for line in lines {
            acc.feed(line, self.matcher.classify(line));
        }
        let chapters = acc.finish();

        tracing::debug!(
            offset,
            lines = lines.len(),
            chapters = chapters.len(),
            "chunk scanned"
        );
        chapters
    }
}

#[derive(Debug)]
enum State {
    NoChapter,
    InChapter(Heading),
}

#[derive(Debug)]
struct Accumulator {
    state: State,
    body: String,
    accepted: Vec<Chapter>,
    validator: Validator,
}

impl Accumulator {
    fn new(validator: Validator) -> Self {
        Self {
            state: State::NoChapter,
            body: String::new(),
            accepted: Vec::new(),
            validator,
        }
    }

    fn feed(&mut self, line: &str, boundary: Option<Boundary>) {
        match boundary {
            Some(Boundary::Chapter(heading)) => {
                self.close();
                self.state = State::InChapter(heading);
            }
            Some(Boundary::Subchapter(sub)) => {
                let State::InChapter(open) = &self.state else {
                    return;
                };
                if self.body.is_empty() {
                    return;
                }
                let parent = open.number;
                let body = std::mem::take(&mut self.body);
                self.offer(Chapter::subchapter_numbered(parent, sub.number, sub.title, body));
            }
            None => {
                if matches!(self.state, State::InChapter(_)) {
                    self.body.push_str(line);
                    self.body.push('\n');
                }
            }
        }
    }

    /// Finalize the open chapter, if any, and reset the buffer.
    fn close(&mut self) {
        let body = std::mem::take(&mut self.body);
        if let State::InChapter(open) = std::mem::replace(&mut self.state, State::NoChapter) {
            // chapter 0 would be indistinguishable from "no parent"
            if open.number > 0 {
                let candidate = Chapter::new(open.number, open.title, body, open.confidence);
                self.offer(candidate);
            }
        }
    }

    fn offer(&mut self, candidate: Chapter) {
        if self.validator.accepts(&candidate, &self.accepted) {
            self.accepted.push(candidate);
        }
    }

    fn finish(mut self) -> Vec<Chapter> {
        self.close();
        self.accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filler(tag: &str, lines: usize) -> Vec<String> {
        (0..lines)
            .map(|i| format!("{tag}{i} {tag}-stone {tag}-wood {tag}-fire {tag}-wind"))
            .collect()
    }

    fn scan(lines: &[String], min_length: usize) -> Vec<Chapter> {
        let matcher = BoundaryMatcher::standard();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        ChunkProcessor::new(&matcher, Validator::new(min_length, 0.8)).process(&refs, 0)
    }

    #[test]
    fn test_two_chapters() {
        let mut lines = vec!["Chapter 1: Intro".to_string()];
        lines.extend(filler("ocean", 3));
        lines.push("Chapter 2: Next".to_string());
        lines.extend(filler("forest", 3));

        let chapters = scan(&lines, 10);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].number, 1);
        assert_eq!(chapters[0].title, "Intro");
        assert!(chapters[0].content.starts_with("ocean0 "));
        assert!(chapters[0].content.ends_with('\n'));
        assert_eq!(chapters[1].title, "Next");
    }

    #[test]
    fn test_preamble_is_dropped() {
        let mut lines = filler("preface", 2);
        lines.push("Chapter 1: Start".to_string());
        lines.extend(filler("desert", 2));

        let chapters = scan(&lines, 10);
        assert_eq!(chapters.len(), 1);
        assert!(!chapters[0].content.contains("preface"));
    }

    #[test]
    fn test_subchapter_takes_buffered_body() {
        let mut lines = vec!["Chapter 3: Main".to_string()];
        lines.extend(filler("river", 2));
        lines.push("3.1 Sub Title".to_string());
        lines.extend(filler("delta", 2));

        let chapters = scan(&lines, 10);
        assert_eq!(chapters.len(), 2);

        let sub = &chapters[0];
        assert_eq!(sub.number, 301);
        assert_eq!(sub.parent_chapter, 3);
        assert!(sub.is_subchapter);
        assert!(sub.content.contains("river"));

        let parent = &chapters[1];
        assert_eq!(parent.number, 3);
        assert!(parent.content.contains("delta"));
        assert!(!parent.content.contains("river"));
    }

    #[test]
    fn test_subchapter_without_body_is_skipped() {
        let lines = vec![
            "Chapter 3: Main".to_string(),
            "3.1 Sub Title".to_string(),
            "plain words that belong to the parent".to_string(),
        ];
        let chapters = scan(&lines, 1);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].number, 3);
    }

    #[test]
    fn test_short_bodies_filtered() {
        let lines = vec![
            "Chapter 1: Tiny".to_string(),
            "too short".to_string(),
        ];
        assert!(scan(&lines, 500).is_empty());
    }

    #[test]
    fn test_no_headings() {
        assert!(scan(&filler("plain", 5), 1).is_empty());
    }
}
