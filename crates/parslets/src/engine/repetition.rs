use crate::engine::context::{ParseContext, Scope};
use crate::engine::outcome::{Escape, Outcome, Skipped};
use crate::engine::state::ParserState;
use crate::engine::{memoizing_parse, skip_intertoken};
use crate::error::ParseError;
use crate::grammar::Parslet;
use crate::syntax::{Span, Value};

/// Applies `parslet` between `min` and `max` times.
///
/// Zero matches with a `min` of zero is a zero-width success, which
/// `default` (if given) turns into a value. Omitted matches count towards
/// the bounds but contribute no results.
pub(crate) fn parse_repetition(
    cx: &mut ParseContext<'_>,
    parslet: &Parslet,
    min: usize,
    max: Option<usize>,
    default: Option<&Value>,
    scope: &Scope,
) -> Outcome {
    let mut state = ParserState::new(scope.position);
    let mut matches = 0;

    while max.is_none_or(|max| matches < max) {
        let cursor = state.cursor();
        match memoizing_parse(cx, parslet, &state.scope(scope)) {
            Outcome::Success(value) => {
                let stalled = value.extent().end <= cursor.location;
                state.accept(cx.input, value);
                matches += 1;
                if stalled {
                    break;
                }
            }
            Outcome::Skipped(skipped) => {
                if skipped.span.end <= cursor.location {
                    break;
                }
                state.discard(cx.input, skipped.span.end);
                matches += 1;
            }
            Outcome::Escape(Escape::ZeroWidth) => break,
            outcome @ Outcome::Escape(_) => return outcome,
            Outcome::Failure(_) => match skip_intertoken(cx, scope, &mut state) {
                Ok(true) => {}
                Ok(false) => break,
                Err(error) => return Outcome::Fatal(error),
            },
            Outcome::LeftRecursion(_) => return Outcome::LeftRecursion(None),
            outcome @ Outcome::Fatal(_) => return outcome,
        }
    }

    if matches == 0 && min == 0 {
        return match default {
            Some(default) => Outcome::Success(default.clone().stamped(Span::empty(scope.location()))),
            None => Outcome::Escape(Escape::ZeroWidth),
        };
    }
    if matches < min {
        let cursor = state.cursor();
        return Outcome::Failure(ParseError::too_few_matches(
            min,
            matches,
            &cx.input[cursor.offset..],
            cursor.location,
        ));
    }
    if state.is_empty() {
        return Outcome::Skipped(Skipped::new(state.bounds(cx.input)));
    }
    Outcome::Success(state.finalize(cx.input))
}
