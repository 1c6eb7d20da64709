//! The result of attempting a parse.

use crate::engine::continuation::Continuation;
use crate::error::{GrammarError, ParseError};
use crate::syntax::{Span, Value};

/// What happened when a parslet was applied at a position
///
/// Besides plain success and failure, a parse can end in one of several
/// signals that enclosing combinators must either handle or pass upward.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// Matched, producing a value
    Success(Value),
    /// Succeeded without producing a value
    Escape(Escape),
    /// An omission consumed input that must be left out of the result
    Skipped(Skipped),
    /// Did not match
    Failure(ParseError),
    /// A rule recursed into itself at the same position. The continuation,
    /// when present, resumes the suspended sequence once a base case has
    /// produced a value.
    LeftRecursion(Option<Box<Continuation>>),
    /// The grammar turned out to be malformed while parsing
    Fatal(GrammarError),
}

/// Successes that carry no value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Escape {
    /// Matched without consuming input
    ZeroWidth,
    /// A positive lookahead held
    AndPredicate,
    /// A negative lookahead held
    NotPredicate,
}

/// Input consumed by an omission
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Skipped {
    pub(crate) span: Span,
}

impl Skipped {
    #[must_use]
    pub(crate) const fn new(span: Span) -> Self {
        Self { span }
    }
}

impl Outcome {
    #[must_use]
    pub(crate) const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Escape(_) | Self::Skipped(_))
    }
}
