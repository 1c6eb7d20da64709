//! Lookahead predicates and omission.
//!
//! Predicates never consume input: success is signalled as an escape that
//! enclosing sequences pass over. An omission consumes input but asks its
//! enclosing sequence to leave the result out.

use crate::engine::context::{ParseContext, Scope};
use crate::engine::memoizing_parse;
use crate::engine::outcome::{Escape, Outcome, Skipped};
use crate::engine::state::seek;
use crate::error::ParseError;
use crate::grammar::Parslet;
use crate::syntax::Span;

/// Positive lookahead
pub(crate) fn parse_and(cx: &mut ParseContext<'_>, inner: &Parslet, scope: &Scope) -> Outcome {
    match memoizing_parse(cx, inner, scope) {
        Outcome::Success(_) | Outcome::Escape(_) | Outcome::Skipped(_) => Outcome::Escape(Escape::AndPredicate),
        Outcome::Failure(_) => Outcome::Failure(ParseError::predicate_not_satisfied(
            &inner.to_string(),
            scope.remainder(cx.input),
            scope.location(),
        )),
        Outcome::LeftRecursion(_) => Outcome::LeftRecursion(None),
        outcome @ Outcome::Fatal(_) => outcome,
    }
}

/// Negative lookahead
pub(crate) fn parse_not(cx: &mut ParseContext<'_>, inner: &Parslet, scope: &Scope) -> Outcome {
    match memoizing_parse(cx, inner, scope) {
        Outcome::Success(_) | Outcome::Escape(_) | Outcome::Skipped(_) => {
            Outcome::Failure(ParseError::predicate_not_allowed(
                &inner.to_string(),
                scope.remainder(cx.input),
                scope.location(),
            ))
        }
        Outcome::Failure(_) => Outcome::Escape(Escape::NotPredicate),
        Outcome::LeftRecursion(_) => Outcome::LeftRecursion(None),
        outcome @ Outcome::Fatal(_) => outcome,
    }
}

/// Parses `inner` and reports the input it consumed as skipped.
pub(crate) fn parse_omission(cx: &mut ParseContext<'_>, inner: &Parslet, scope: &Scope) -> Outcome {
    match memoizing_parse(cx, inner, scope) {
        Outcome::Success(value) => {
            let end = seek(cx.input, scope.position, value.extent().end);
            let span = Span::new(
                scope.location(),
                end.location,
                &cx.input[scope.position.offset..end.offset],
            );
            Outcome::Skipped(Skipped::new(span))
        }
        Outcome::Escape(Escape::ZeroWidth) => Outcome::Skipped(Skipped::new(Span::empty(scope.location()))),
        Outcome::LeftRecursion(_) => Outcome::LeftRecursion(None),
        outcome => outcome,
    }
}
