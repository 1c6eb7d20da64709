//! Line and column positions
//!
//! Every value produced by a parse carries a [`Span`] made of two
//! [`Location`]s plus the source text it covers. Lines and columns are
//! zero-based; columns count Unicode code points, not bytes.

use compact_str::CompactString;
use serde::Serialize;
use std::fmt;

/// A zero-based line/column position in source text
///
/// Ordering is line-major, so the "rightmost" of two locations is simply
/// the greater one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    /// Zero-based line number
    pub line: usize,
    /// Zero-based column number (in code points)
    pub column: usize,
}

impl Location {
    /// Create a new line/column position
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Returns whichever location lies further into the input.
    #[must_use]
    pub fn rightmost(self, other: Self) -> Self {
        self.max(other)
    }

    /// Returns true if `self` is at least as far right as `other`.
    #[must_use]
    pub fn is_rightmost_of(self, other: Self) -> bool {
        self >= other
    }
}

impl fmt::Display for Location {
    /// Displays the location 1-based, the way editors number lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A location together with the byte offset it corresponds to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// Byte offset into the full input
    pub offset: usize,
    /// Line/column of the same point
    pub location: Location,
}

impl Position {
    #[must_use]
    pub const fn new(offset: usize, location: Location) -> Self {
        Self { offset, location }
    }
}

/// The extent of a parsed value: where it starts, where it ends and the
/// text in between
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: Location,
    pub end: Location,
    pub source_text: CompactString,
}

impl Span {
    #[must_use]
    pub fn new(start: Location, end: Location, source_text: impl Into<CompactString>) -> Self {
        Self {
            start,
            end,
            source_text: source_text.into(),
        }
    }

    /// A zero-width span at `location`
    #[must_use]
    pub fn empty(location: Location) -> Self {
        Self::new(location, location, CompactString::default())
    }

    /// Returns true if the span covers no input.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
