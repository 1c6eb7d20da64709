use crate::engine::context::{ParseContext, Scope};
use crate::engine::continuation::Continuation;
use crate::engine::events::ParseEvent;
use crate::engine::memoizing_parse;
use crate::engine::outcome::Outcome;
use crate::error::{ParseError, ParseErrorKind};
use crate::grammar::Parslet;
use crate::syntax::Value;

/// Tries each alternative in order and commits to the first that succeeds.
///
/// Failures are remembered so that exhaustion can report the one that got
/// furthest. An alternative that signals left recursion is remembered too:
/// when a later alternative succeeds, its value seeds the suspended
/// computation.
pub(crate) fn parse_choice(cx: &mut ParseContext<'_>, alternatives: &[Parslet], scope: &Scope) -> Outcome {
    let mut rightmost: Option<ParseError> = None;
    let mut left_recursion: Option<Option<Box<Continuation>>> = None;

    for alternative in alternatives {
        match memoizing_parse(cx, alternative, scope) {
            Outcome::Success(value) => {
                return match left_recursion {
                    Some(Some(continuation)) => resume(cx, *continuation, value),
                    _ => Outcome::Success(value),
                };
            }
            Outcome::Failure(error) => {
                let from = error.location();
                cx.emit(|| ParseEvent::Backtrack {
                    from,
                    to: scope.location(),
                });
                cx.record(|stats| stats.backtracks += 1);
                if rightmost.as_ref().is_none_or(|best| error.is_rightmost_of(best)) {
                    rightmost = Some(error);
                }
            }
            Outcome::LeftRecursion(continuation) => left_recursion = Some(continuation),
            outcome => return outcome,
        }
    }

    match (rightmost, left_recursion) {
        (Some(error), _) => Outcome::Failure(ParseError::no_valid_alternatives(
            scope.remainder(cx.input),
            &error,
        )),
        (None, Some(continuation)) => Outcome::LeftRecursion(continuation),
        (None, None) => Outcome::Failure(ParseError::new(
            ParseErrorKind::NoValidAlternatives,
            "no alternatives to choose from",
            scope.location(),
        )),
    }
}

/// Resumes a suspended left-recursive computation with a base-case value,
/// falling back to the base case if the resumed computation fails.
fn resume(cx: &mut ParseContext<'_>, continuation: Continuation, base: Value) -> Outcome {
    let location = base.extent().end;
    log::debug!(
        "resuming {} suspended frame(s) with base case ending at {location}",
        continuation.depth()
    );
    cx.emit(|| ParseEvent::Resume { location });
    cx.record(|stats| stats.resumptions += 1);

    match continuation.resume(cx, base.clone()) {
        outcome @ (Outcome::Success(_) | Outcome::Escape(_) | Outcome::Skipped(_) | Outcome::Fatal(_)) => outcome,
        Outcome::Failure(_) | Outcome::LeftRecursion(_) => Outcome::Success(base),
    }
}
