//! Newline- and code-point-aware text arithmetic
//!
//! `\r\n`, `\r` and `\n` each count as a single line break. A `\n` that
//! directly follows a `\r` belongs to the same break and is not counted
//! again. Columns advance by one per code point.

use crate::syntax::location::Location;
use memchr::memchr2;

/// Enumerates the characters of a string while tracking the line/column
/// reached so far
///
/// Remembers the previously scanned character so that a `\n` following a
/// `\r` does not advance the line a second time.
#[derive(Debug, Clone)]
pub struct CharCursor<'a> {
    chars: std::str::Chars<'a>,
    previous: Option<char>,
    location: Location,
    offset: usize,
}

impl<'a> CharCursor<'a> {
    #[must_use]
    pub fn new(text: &'a str, start: Location) -> Self {
        Self {
            chars: text.chars(),
            previous: None,
            location: start,
            offset: 0,
        }
    }

    /// The location just past the last character returned by `next`.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// The byte offset just past the last character returned by `next`.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for CharCursor<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\r' || (c == '\n' && self.previous != Some('\r')) {
            self.location.line += 1;
            self.location.column = 0;
        } else if c != '\n' {
            self.location.column += 1;
        }
        self.previous = Some(c);
        self.offset += c.len_utf8();
        Some(c)
    }
}

/// Returns the location reached after scanning `text` starting at `from`.
///
/// If `text` contains a line break the column is the number of characters
/// after the last break; otherwise it is `from.column` plus the character
/// count.
#[must_use]
pub fn advance(from: Location, text: &str) -> Location {
    let mut cursor = CharCursor::new(text, from);
    cursor.by_ref().for_each(drop);
    cursor.location()
}

/// Number of code points in `text`.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte length of the first `count` code points of `text` (or of all of
/// `text` if it is shorter).
#[must_use]
pub fn strip_chars(text: &str, count: usize) -> usize {
    text.char_indices()
        .nth(count)
        .map_or(text.len(), |(offset, _)| offset)
}

/// Byte length of `text` up to and including its first line break, or
/// `None` if it has none.
#[must_use]
pub fn strip_line(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let at = memchr2(b'\r', b'\n', bytes)?;
    if bytes[at] == b'\r' && bytes.get(at + 1) == Some(&b'\n') {
        Some(at + 2)
    } else {
        Some(at + 1)
    }
}

/// Byte length of the prefix of `remainder` that lies between `from` and
/// `to`, where `remainder` starts at `from`.
///
/// When `to` is on a later line, whole lines are stripped first and then
/// `to.column` characters of the final line. Otherwise only the column
/// delta is stripped. A `to` that is not past `from` consumes nothing.
#[must_use]
pub fn consumed_len(remainder: &str, from: Location, to: Location) -> usize {
    if to <= from {
        return 0;
    }
    if to.line > from.line {
        let mut consumed = 0;
        for _ in from.line..to.line {
            match strip_line(&remainder[consumed..]) {
                Some(len) => consumed += len,
                None => return remainder.len(),
            }
        }
        consumed + strip_chars(&remainder[consumed..], to.column)
    } else {
        strip_chars(remainder, to.column - from.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_counts_each_newline_convention_once() {
        let origin = Location::default();
        assert_eq!(advance(origin, "hello\r\nworld"), Location::new(1, 5));
        assert_eq!(advance(origin, "hello\r"), Location::new(1, 0));
        assert_eq!(advance(origin, "hello\n"), Location::new(1, 0));
        assert_eq!(advance(origin, "a\n\rb"), Location::new(2, 1));
        assert_eq!(advance(origin, "\r\r\n"), Location::new(2, 0));
    }

    #[test]
    fn test_advance_without_newline_adds_to_column() {
        assert_eq!(advance(Location::new(3, 4), "abc"), Location::new(3, 7));
    }

    #[test]
    fn test_advance_counts_code_points() {
        assert_eq!(advance(Location::default(), "日本語"), Location::new(0, 3));
        assert_eq!(advance(Location::new(0, 2), "ü\nß"), Location::new(1, 1));
    }

    #[test]
    fn test_cursor_counts_crlf_once() {
        let mut cursor = CharCursor::new("\r\nx", Location::default());
        assert_eq!(cursor.next(), Some('\r'));
        assert_eq!(cursor.location(), Location::new(1, 0));
        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!(cursor.location(), Location::new(1, 0));
        assert_eq!(cursor.next(), Some('x'));
        assert_eq!(cursor.offset(), 3);
    }

    #[test]
    fn test_strip_helpers() {
        assert_eq!(strip_chars("日本語", 2), "日本".len());
        assert_eq!(strip_chars("ab", 5), 2);
        assert_eq!(strip_line("ab\r\ncd"), Some(4));
        assert_eq!(strip_line("ab\rcd"), Some(3));
        assert_eq!(strip_line("abcd"), None);
    }

    #[test]
    fn test_consumed_len_strips_lines_then_columns() {
        let text = "123\n456 789";
        assert_eq!(
            consumed_len(text, Location::new(0, 0), Location::new(1, 3)),
            "123\n456".len()
        );
        assert_eq!(consumed_len("456 789", Location::new(1, 0), Location::new(1, 3)), 3);
        assert_eq!(consumed_len(text, Location::new(0, 2), Location::new(0, 2)), 0);
    }
}
