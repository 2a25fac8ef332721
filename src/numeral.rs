//! Resolving heading numeral tokens to integers.
//!
//! A heading can number itself three ways:
//!
//! ```text
//! "Chapter 12"     -> decimal      -> 12
//! "Chapter XIV"    -> roman        -> 14
//! "Chapter Two"    -> number word  -> 2
//! ```
//!
//! Resolution tries them in that order of specificity: roman first (a token
//! made only of `IVXLCDM`), then the word table, then decimal. A token that
//! resolves under none of them yields `None`, and the matcher moves on to
//! the next pattern.

/// Number words recognized in headings.
const NUMBER_WORDS: &[(&str, u32)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("first", 1),
    ("second", 2),
    ("third", 3),
];

fn roman_value(c: char) -> Option<u32> {
    match c.to_ascii_uppercase() {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        'D' => Some(500),
        'M' => Some(1000),
        _ => None,
    }
}

/// Whether `token` consists solely of roman numeral symbols (any case).
#[must_use]
pub fn is_roman(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| roman_value(c).is_some())
}

/// Decode a roman numeral using subtractive notation.
///
/// Each symbol is subtracted when it is smaller than its successor and added
/// otherwise. Non-canonical forms such as `IIII` decode additively; the
/// decoder does not validate canonical spelling.
///
/// ```rust
/// use chapterize::numeral::decode_roman;
///
/// assert_eq!(decode_roman("IV"), Some(4));
/// assert_eq!(decode_roman("MCMXCIX"), Some(1999));
/// assert_eq!(decode_roman("xl"), Some(40));
/// assert_eq!(decode_roman("XQ"), None);
/// ```
#[must_use]
pub fn decode_roman(token: &str) -> Option<u32> {
    let values = token.chars().map(roman_value).collect::<Option<Vec<_>>>()?;
    if values.is_empty() {
        return None;
    }

    let mut total: i64 = 0;
    for (i, &value) in values.iter().enumerate() {
        match values.get(i + 1) {
            Some(&next) if value < next => total -= i64::from(value),
            _ => total += i64::from(value),
        }
    }
    u32::try_from(total).ok()
}

/// Map a number word (`"one"`, `"second"`, ...) to its value.
#[must_use]
pub fn word_number(token: &str) -> Option<u32> {
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| word.eq_ignore_ascii_case(token))
        .map(|&(_, n)| n)
}

/// Resolve a captured numeral token: roman, then number word, then decimal.
#[must_use]
pub fn resolve(token: &str) -> Option<u32> {
    if is_roman(token) {
        return decode_roman(token);
    }
    word_number(token).or_else(|| token.parse().ok())
}
