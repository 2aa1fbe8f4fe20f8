//! Delimiter-based splitting and the matching join used by decode.

use regex::{Matches, Regex};
use std::sync::LazyLock;

/// Single-character delimiters. Each one is kept as a token of its own.
pub const PUNCTUATION: [char; 11] = [',', '.', ':', ';', '?', '_', '!', '"', '(', ')', '\''];
/// Characters that [`join`] glues back onto the preceding token.
pub const ATTACHED: [char; 10] = [',', '.', ':', ';', '?', '!', '"', '(', ')', '\''];
/// Two-character dash delimiter.
pub const DASH: &str = "--";

static DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| build_pattern([char_class(&PUNCTUATION), regex::escape(DASH), r"\s".into()]));

static DETACHED: LazyLock<Regex> =
    LazyLock::new(|| build_pattern([format!(r"\s+({})", char_class(&ATTACHED))]));

/// Splits `text` into tokens.
///
/// Punctuation and `--` become tokens, whitespace separates tokens, and no empty or
/// whitespace-only piece is ever returned.
pub fn split(text: &str) -> Vec<&str> {
    pieces(text).collect()
}

/// Lazy form of [`split`].
pub fn pieces(text: &str) -> Pieces<'_> {
    Pieces {
        text,
        matches: DELIMITER.find_iter(text),
        last: 0,
        delimiter: None,
        finished: false,
    }
}

/// Joins tokens with single spaces, then re-attaches [`ATTACHED`] punctuation to the
/// preceding word.
pub fn join<T: AsRef<str>>(tokens: impl IntoIterator<Item = T>) -> String {
    let mut text = String::new();
    for (i, token) in tokens.into_iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        text.push_str(token.as_ref());
    }
    DETACHED.replace_all(&text, "$1").into_owned()
}

/// `true` if `c` splits text, either as punctuation or as whitespace.
pub fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || PUNCTUATION.contains(&c)
}

/// Iterator returned by [`pieces`].
pub struct Pieces<'t> {
    text: &'t str,
    matches: Matches<'static, 't>,
    last: usize,
    delimiter: Option<&'t str>,
    finished: bool,
}

impl<'t> Iterator for Pieces<'t> {
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        loop {
            let piece = if let Some(delimiter) = self.delimiter.take() {
                delimiter
            } else if let Some(m) = self.matches.next() {
                let before = &self.text[self.last..m.start()];
                self.last = m.end();
                self.delimiter = Some(m.as_str());
                before
            } else if !self.finished {
                self.finished = true;
                &self.text[self.last..]
            } else {
                return None;
            };

            let piece = piece.trim();
            if !piece.is_empty() {
                return Some(piece);
            }
        }
    }
}

fn char_class(chars: &[char]) -> String {
    let mut class = String::from("[");
    for c in chars {
        class.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
    }
    class.push(']');
    class
}

fn build_pattern<T: AsRef<str>>(alternatives: impl IntoIterator<Item = T>) -> Regex {
    let mut pattern = String::new();
    let mut iter = alternatives.into_iter();
    if let Some(p) = iter.next() {
        pattern.push_str(p.as_ref());
    }
    for p in iter {
        pattern.push('|');
        pattern.push_str(p.as_ref());
    }
    Regex::new(&pattern).expect("delimiter patterns are built from escaped literals")
}
