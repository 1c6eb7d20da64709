//! Parslets that match input directly.

use crate::engine::context::{ParseContext, Scope};
use crate::engine::outcome::Outcome;
use crate::error::ParseError;
use crate::grammar::parslet::{Pattern, ProcParslet};
use crate::syntax::text::{self, CharCursor};
use crate::syntax::{RegexMatch, Span, Value};

/// Matches `expected` character by character.
///
/// On a mismatch the error is located just past the last character that did
/// match.
pub(crate) fn parse_literal(cx: &ParseContext<'_>, expected: &str, scope: &Scope) -> Outcome {
    let remainder = scope.remainder(cx.input);
    let mut actual = CharCursor::new(remainder, scope.location());
    for wanted in expected.chars() {
        let reached = actual.location();
        match actual.next() {
            None => {
                return Outcome::Failure(ParseError::unexpected_end_of_input(wanted, expected, reached));
            }
            Some(found) if found != wanted => {
                return Outcome::Failure(ParseError::unexpected_character(found, wanted, expected, reached));
            }
            Some(_) => {}
        }
    }
    let matched = &remainder[..actual.offset()];
    Outcome::Success(Value::text(
        matched,
        Span::new(scope.location(), actual.location(), matched),
    ))
}

/// Matches a pattern anchored at the current position.
pub(crate) fn parse_regex(cx: &ParseContext<'_>, pattern: &Pattern, scope: &Scope) -> Outcome {
    let remainder = scope.remainder(cx.input);
    let Some(captures) = pattern.regex().captures(remainder) else {
        return Outcome::Failure(ParseError::pattern_mismatch(
            remainder,
            pattern.source(),
            scope.location(),
        ));
    };
    let matched = captures.get(0).map_or("", |m| m.as_str());
    let end = text::advance(scope.location(), matched);
    Outcome::Success(Value::regex_match(
        RegexMatch::from_captures(&captures),
        Span::new(scope.location(), end, matched),
    ))
}

/// Hands the remaining input to a user-supplied matcher.
pub(crate) fn parse_proc(cx: &ParseContext<'_>, proc: &ProcParslet, scope: &Scope) -> Outcome {
    match proc.call(scope.remainder(cx.input), scope.location()) {
        Ok(value) => Outcome::Success(value),
        Err(error) => Outcome::Failure(error),
    }
}
