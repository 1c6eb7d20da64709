//! Accumulation of results while a compound parslet consumes input.

use crate::engine::context::Scope;
use crate::syntax::text;
use crate::syntax::{Location, Position, Span, Value};

/// Returns the position `to`, reached by scanning forward from `from`.
///
/// Locations at or before `from` leave the position unchanged.
pub(crate) fn seek(input: &str, from: Position, to: Location) -> Position {
    if to <= from.location {
        return from;
    }
    let consumed = text::consumed_len(&input[from.offset..], from.location, to);
    Position::new(from.offset + consumed, to)
}

/// The running state of a sequence, merge or repetition
///
/// `start` and `end` bound the input accounted for by the collected
/// results. `cursor` is where the next element is tried, which may lie past
/// `end` when inter-token skipping consumed trailing input.
#[derive(Debug, Clone)]
pub(crate) struct ParserState {
    start: Position,
    end: Position,
    cursor: Position,
    touched: bool,
    results: Vec<Value>,
}

impl ParserState {
    pub(crate) const fn new(origin: Position) -> Self {
        Self {
            start: origin,
            end: origin,
            cursor: origin,
            touched: false,
            results: Vec::new(),
        }
    }

    pub(crate) const fn start(&self) -> Position {
        self.start
    }

    pub(crate) const fn cursor(&self) -> Position {
        self.cursor
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The scope in which the next element is parsed.
    pub(crate) fn scope(&self, enclosing: &Scope) -> Scope {
        enclosing.at(self.cursor)
    }

    /// Records a result and moves past the input it accounts for.
    pub(crate) fn accept(&mut self, input: &str, value: Value) {
        let extent = value.extent();
        if !self.touched {
            self.start = seek(input, self.cursor, extent.start);
        }
        let end = extent.end;
        self.advance(input, end);
        self.results.push(value);
    }

    /// Moves past input that produced no result.
    pub(crate) fn discard(&mut self, input: &str, end: Location) {
        self.advance(input, end);
    }

    /// Moves the cursor past inter-token input.
    ///
    /// Skipped input before the first result is excluded from the bounds;
    /// skipped input after it is not included either.
    pub(crate) fn auto_skip(&mut self, input: &str, end: Location) {
        self.cursor = seek(input, self.cursor, end);
        if !self.touched {
            self.start = self.cursor;
            self.end = self.cursor;
        }
    }

    fn advance(&mut self, input: &str, end: Location) {
        self.touched = true;
        self.cursor = seek(input, self.cursor, end);
        if self.cursor.location > self.end.location {
            self.end = self.cursor;
        }
    }

    /// The span bounding everything accepted or discarded so far.
    pub(crate) fn bounds(&self, input: &str) -> Span {
        Span::new(
            self.start.location,
            self.end.location,
            &input[self.start.offset..self.end.offset],
        )
    }

    /// Collapses the collected results into a single value.
    ///
    /// No results give an empty list, a single result is promoted out of
    /// the list (remembering the bounds as its outer span), and several
    /// results give a list.
    pub(crate) fn finalize(mut self, input: &str) -> Value {
        let span = self.bounds(input);
        match self.results.len() {
            0 => Value::list(Vec::new(), span),
            1 => match self.results.pop() {
                Some(value) => value.with_outer(span),
                None => Value::list(Vec::new(), span),
            },
            _ => Value::list(self.results, span),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_across_lines() {
        let input = "ab\ncd";
        let to = seek(input, Position::default(), Location::new(1, 1));
        assert_eq!(to, Position::new(4, Location::new(1, 1)));
        let back = seek(input, to, Location::new(0, 1));
        assert_eq!(back, to);
    }

    #[test]
    fn test_single_result_is_promoted_with_bounds() {
        let input = "(x)";
        let mut state = ParserState::new(Position::default());
        state.discard(input, Location::new(0, 1));
        state.accept(input, Value::spanning("x", Location::new(0, 1)));
        state.discard(input, Location::new(0, 3));

        let value = state.finalize(input);
        assert_eq!(value, "x");
        assert_eq!(value.span().start, Location::new(0, 1));
        assert_eq!(value.extent().start, Location::new(0, 0));
        assert_eq!(value.extent().end, Location::new(0, 3));
        assert_eq!(value.extent().source_text, "(x)");
    }

    #[test]
    fn test_leading_skip_is_excluded_from_bounds() {
        let input = "   foo";
        let mut state = ParserState::new(Position::default());
        state.auto_skip(input, Location::new(0, 3));
        state.accept(input, Value::spanning("foo", Location::new(0, 3)));
        state.accept(input, Value::spanning("", Location::new(0, 6)));

        let value = state.finalize(input);
        assert_eq!(value.span().start, Location::new(0, 3));
        assert_eq!(value.span().source_text, "foo");
    }

    #[test]
    fn test_empty_state_finalizes_to_empty_list() {
        let state = ParserState::new(Position::new(2, Location::new(0, 2)));
        assert!(state.is_empty());
        let value = state.finalize("abcd");
        assert!(value.is_empty_list());
        assert!(value.span().is_empty());
    }
}
