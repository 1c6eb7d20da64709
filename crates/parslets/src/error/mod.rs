//! # Error Types
//!
//! Parse failures and grammar configuration errors.
//!
//! ## Overview
//!
//! - [`ParseError`]: the input does not match the grammar. Always carries
//!   the location where matching stopped. Recoverable: combinators backtrack
//!   over these, and ordered choice reports the rightmost one.
//! - [`GrammarError`]: the grammar itself is malformed (duplicate rules,
//!   references to undefined rules, productions of the wrong arity). These
//!   are programmer errors and never depend on the input.
//! - [`Error`]: what [`Grammar::parse`](crate::Grammar::parse) returns,
//!   including the distinct left-recursion failure for a recursive rule with
//!   no base case.
//!
//! ## Diagnostics Support
//!
//! When the `diagnostics` feature is enabled, errors integrate with
//! [`miette`] for rich error reporting.

pub mod diagnostics;

use crate::syntax::Location;
use compact_str::CompactString;
use std::borrow::Cow;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Result alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Number of characters of input quoted in error messages
const EXCERPT_CHARS: usize = 40;

/// The input does not match the grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[cfg_attr(feature = "diagnostics", diagnostic(code(parslets::parse)))]
#[error("{message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    /// Where matching stopped
    pub end: Location,
}

/// Classification of a [`ParseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected character")]
    UnexpectedCharacter,

    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("pattern did not match")]
    PatternMismatch,

    #[error("required {required} matches but obtained {obtained}")]
    TooFewMatches { required: usize, obtained: usize },

    #[error("no valid alternatives")]
    NoValidAlternatives,

    #[error("predicate not satisfied")]
    PredicateNotSatisfied,

    #[error("predicate not satisfied (not allowed)")]
    PredicateNotAllowed,

    #[error("custom parslet failed")]
    Custom,

    #[error("maximum nesting depth exceeded")]
    DepthExceeded,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, end: Location) -> Self {
        Self {
            kind,
            message: message.into(),
            end,
        }
    }

    /// Where matching stopped
    #[must_use]
    pub const fn location(&self) -> Location {
        self.end
    }

    /// Returns true if `self` got at least as far into the input as `other`.
    #[must_use]
    pub fn is_rightmost_of(&self, other: &Self) -> bool {
        self.end.is_rightmost_of(other.end)
    }

    #[must_use]
    pub fn unexpected_character(found: char, expected: char, literal: &str, end: Location) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedCharacter,
            format!("unexpected character {found:?} (expected {expected:?}) while parsing {literal:?}"),
            end,
        )
    }

    #[must_use]
    pub fn unexpected_end_of_input(expected: char, literal: &str, end: Location) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEndOfInput,
            format!("unexpected end-of-string (expected {expected:?}) while parsing {literal:?}"),
            end,
        )
    }

    #[must_use]
    pub fn pattern_mismatch(input: &str, pattern: &str, end: Location) -> Self {
        Self::new(
            ParseErrorKind::PatternMismatch,
            format!(
                "non-matching characters {:?} while parsing regular expression /{pattern}/",
                excerpt(input)
            ),
            end,
        )
    }

    #[must_use]
    pub fn too_few_matches(required: usize, obtained: usize, input: &str, end: Location) -> Self {
        Self::new(
            ParseErrorKind::TooFewMatches { required, obtained },
            format!(
                "required {required} matches but obtained {obtained} while parsing {:?}",
                excerpt(input)
            ),
            end,
        )
    }

    /// Failure of an ordered choice, reported at its rightmost inner error.
    #[must_use]
    pub fn no_valid_alternatives(input: &str, rightmost: &Self) -> Self {
        Self::new(
            ParseErrorKind::NoValidAlternatives,
            format!(
                "no valid alternatives while parsing {:?} ({rightmost})",
                excerpt(input)
            ),
            rightmost.end,
        )
    }

    #[must_use]
    pub fn predicate_not_satisfied(expected: &str, input: &str, end: Location) -> Self {
        Self::new(
            ParseErrorKind::PredicateNotSatisfied,
            format!(
                "predicate not satisfied (expected {expected:?}) while parsing {:?}",
                excerpt(input)
            ),
            end,
        )
    }

    #[must_use]
    pub fn predicate_not_allowed(forbidden: &str, input: &str, end: Location) -> Self {
        Self::new(
            ParseErrorKind::PredicateNotAllowed,
            format!(
                "predicate not satisfied ({forbidden:?} not allowed) while parsing {:?}",
                excerpt(input)
            ),
            end,
        )
    }

    /// A failure reported by a closure-backed parslet.
    #[must_use]
    pub fn custom(message: impl Into<String>, end: Location) -> Self {
        Self::new(ParseErrorKind::Custom, message, end)
    }

    #[must_use]
    pub fn depth_exceeded(max_depth: usize, end: Location) -> Self {
        Self::new(
            ParseErrorKind::DepthExceeded,
            format!("maximum nesting depth of {max_depth} exceeded"),
            end,
        )
    }
}

/// The grammar is malformed
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum GrammarError {
    #[error("rule '{0}' already defined")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parslets::grammar::duplicate_rule)))]
    RuleAlreadyDefined(CompactString),

    #[error("undefined rule '{0}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parslets::grammar::undefined_rule)))]
    UndefinedRule(CompactString),

    #[error("production already defined for rule '{0}'")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(code(parslets::grammar::duplicate_production))
    )]
    ProductionAlreadyDefined(CompactString),

    #[error("production for non-existent rule '{0}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parslets::grammar::undefined_rule)))]
    ProductionForUnknownRule(CompactString),

    #[error("node '{0}' already defined")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parslets::grammar::duplicate_node)))]
    NodeAlreadyDefined(CompactString),

    #[error("node '{node}' has non-existent parent '{parent}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parslets::grammar::unknown_node)))]
    UnknownParentNode {
        node: CompactString,
        parent: CompactString,
    },

    #[error("no node declared for production '{0}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parslets::grammar::unknown_node)))]
    UnknownNode(CompactString),

    #[error("default skipping parslet already set")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parslets::grammar::duplicate_skipping)))]
    DefaultSkippingAlreadySet,

    #[error("skipping override already set for rule '{0}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parslets::grammar::duplicate_skipping)))]
    SkippingOverrideAlreadySet(CompactString),

    #[error("skipping override for non-existent rule '{0}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parslets::grammar::undefined_rule)))]
    SkippingOverrideForUnknownRule(CompactString),

    #[error("starting symbol already set")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parslets::grammar::duplicate_start)))]
    StartRuleAlreadySet,

    #[error("starting symbol not defined")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parslets::grammar::missing_start)))]
    MissingStartRule,

    #[error("invalid regular expression /{pattern}/")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parslets::grammar::invalid_pattern)))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("production '{rule}' takes {expected} fields but the rule produced {found}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parslets::grammar::production_arity)))]
    ProductionArity {
        rule: CompactString,
        expected: usize,
        found: usize,
    },
}

/// Errors returned by a top-level parse
#[derive(Debug, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum Error {
    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Grammar(#[from] GrammarError),

    #[error("left-recursive rule '{rule}' has no base case")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parslets::left_recursion)))]
    LeftRecursion { rule: CompactString },
}

impl Error {
    /// Where parsing stopped, for parse failures.
    #[must_use]
    pub const fn location(&self) -> Option<Location> {
        match self {
            Self::Parse(error) => Some(error.end),
            Self::Grammar(_) | Self::LeftRecursion { .. } => None,
        }
    }

    #[must_use]
    pub const fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(error) => Some(error),
            _ => None,
        }
    }
}

/// Shortens `input` for quoting inside an error message.
pub(crate) fn excerpt(input: &str) -> Cow<'_, str> {
    match input.char_indices().nth(EXCERPT_CHARS) {
        Some((offset, _)) => Cow::Owned(format!("{}...", &input[..offset])),
        None => Cow::Borrowed(input),
    }
}
