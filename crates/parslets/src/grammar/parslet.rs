//! Parsing units
//!
//! A [`Parslet`] is an immutable, cheaply clonable parsing unit. Combinators
//! capture their children at construction time. Parslets are used as map
//! keys by the memoization cache, so equality is structural and the hash is
//! computed once, from a per-kind offset plus the children's hashes.
//!
//! ```rust
//! use parslets::Parslet;
//!
//! let digits = Parslet::regex("[0-9]+").expect("valid pattern");
//! let list = digits.clone().then(Parslet::literal(",").skip().then(digits).zero_or_more());
//! assert_eq!(list.to_string(), r#"(/[0-9]+/ & (",".skip & /[0-9]+/){0,})"#);
//! ```

use crate::error::{GrammarError, ParseError, Result};
use crate::syntax::{Location, Value};
use compact_str::CompactString;
use regex::Regex;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

/// A composable parsing unit
#[derive(Clone)]
pub struct Parslet(Arc<Inner>);

struct Inner {
    kind: ParsletKind,
    hash: u64,
}

/// The variants of [`Parslet`]
#[derive(Debug, PartialEq)]
pub enum ParsletKind {
    /// Exact literal text
    Literal(CompactString),
    /// A regular expression anchored at the current position
    Regex(Pattern),
    /// A reference to a named rule, resolved at parse time
    Rule(CompactString),
    Sequence(Vec<Parslet>),
    /// A sequence whose list results are flattened into the parent
    Merge(Vec<Parslet>),
    /// Ordered choice
    Choice(Vec<Parslet>),
    Repetition {
        parslet: Parslet,
        min: usize,
        max: Option<usize>,
    },
    /// A repetition that yields `default` instead of a zero-width success
    RepetitionWithDefault {
        parslet: Parslet,
        min: usize,
        max: Option<usize>,
        default: Value,
    },
    /// Positive lookahead
    And(Parslet),
    /// Negative lookahead
    Not(Parslet),
    /// Consume but discard
    Omission(Parslet),
    /// A user closure
    Proc(ProcParslet),
}

impl ParsletKind {
    /// Fixed per-kind offset mixed into the hash so that different kinds
    /// built from identical children do not collide
    const fn hash_offset(&self) -> u64 {
        match self {
            Self::Not(_) => 11,
            Self::And(_) => 12,
            Self::Regex(_) => 15,
            Self::Literal(_) => 20,
            Self::Rule(_) => 25,
            Self::Choice(_) => 30,
            Self::Sequence(_) => 40,
            Self::Omission(_) => 46,
            Self::Merge(_) => 53,
            Self::RepetitionWithDefault { .. } => 69,
            Self::Repetition { .. } => 87,
            Self::Proc(_) => 105,
        }
    }

    fn compute_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        hasher.write_u64(self.hash_offset());
        match self {
            Self::Literal(text) | Self::Rule(text) => text.hash(&mut hasher),
            Self::Regex(pattern) => pattern.source.hash(&mut hasher),
            Self::Sequence(parts) | Self::Merge(parts) | Self::Choice(parts) => {
                for part in parts {
                    hasher.write_u64(part.0.hash);
                }
            }
            Self::Repetition { parslet, min, max } => {
                hasher.write_u64(parslet.0.hash);
                min.hash(&mut hasher);
                max.hash(&mut hasher);
            }
            Self::RepetitionWithDefault {
                parslet,
                min,
                max,
                default,
            } => {
                hasher.write_u64(parslet.0.hash);
                min.hash(&mut hasher);
                max.hash(&mut hasher);
                default.hash(&mut hasher);
            }
            Self::And(inner) | Self::Not(inner) | Self::Omission(inner) => {
                hasher.write_u64(inner.0.hash);
            }
            Self::Proc(proc) => proc.address().hash(&mut hasher),
        }
        hasher.finish()
    }
}

/// A compiled regular expression together with the source it was built from
pub struct Pattern {
    source: CompactString,
    anchored: Regex,
}

impl Pattern {
    /// Compiles `source` anchored to the start of the input.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::InvalidPattern`] if `source` does not compile.
    pub fn new(source: &str) -> Result<Self, GrammarError> {
        let anchored =
            Regex::new(&format!(r"\A(?:{source})")).map_err(|source_error| GrammarError::InvalidPattern {
                pattern: source.to_string(),
                source: source_error,
            })?;
        Ok(Self {
            source: source.into(),
            anchored,
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub const fn regex(&self) -> &Regex {
        &self.anchored
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source)
    }
}

type ProcFn = dyn Fn(&str, Location) -> Result<Value, ParseError> + Send + Sync;

/// A parsing unit backed by a closure
///
/// The closure receives the remaining input and the location it starts at,
/// and returns either a value (with its span) or a parse error. Two
/// closure-backed parslets are equal only if they share the same closure
/// instance; behaviourally identical closures are still distinct.
#[derive(Clone)]
pub struct ProcParslet(Arc<ProcFn>);

impl ProcParslet {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, Location) -> Result<Value, ParseError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invokes the closure.
    ///
    /// # Errors
    ///
    /// Whatever error the closure reports.
    pub fn call(&self, input: &str, start: Location) -> Result<Value, ParseError> {
        (self.0)(input, start)
    }

    fn address(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl PartialEq for ProcParslet {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl fmt::Debug for ProcParslet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcParslet({:#x})", self.address())
    }
}

impl Parslet {
    fn from_kind(kind: ParsletKind) -> Self {
        let hash = kind.compute_hash();
        Self(Arc::new(Inner { kind, hash }))
    }

    #[must_use]
    pub fn kind(&self) -> &ParsletKind {
        &self.0.kind
    }

    /// The precomputed structural hash.
    #[must_use]
    pub fn hash_value(&self) -> u64 {
        self.0.hash
    }

    /// The referenced rule name, if this is a rule reference.
    #[must_use]
    pub fn rule_name(&self) -> Option<&str> {
        match self.kind() {
            ParsletKind::Rule(name) => Some(name),
            _ => None,
        }
    }

    /// Matches `text` exactly.
    #[must_use]
    pub fn literal(text: impl Into<CompactString>) -> Self {
        Self::from_kind(ParsletKind::Literal(text.into()))
    }

    /// Matches the regular expression `pattern` at the current position.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::InvalidPattern`] if the pattern does not compile.
    pub fn regex(pattern: &str) -> Result<Self, GrammarError> {
        Ok(Self::from_kind(ParsletKind::Regex(Pattern::new(pattern)?)))
    }

    /// A reference to the rule `name`, looked up when parsing.
    #[must_use]
    pub fn rule(name: impl Into<CompactString>) -> Self {
        Self::from_kind(ParsletKind::Rule(name.into()))
    }

    /// A sequence of `parts`; a single part is returned as is.
    #[must_use]
    pub fn sequence<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        Self::combination(parts, ParsletKind::Sequence)
    }

    /// A merging sequence of `parts`; a single part is returned as is.
    #[must_use]
    pub fn merge<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        Self::combination(parts, ParsletKind::Merge)
    }

    /// An ordered choice between `alternatives`; a single alternative is
    /// returned as is.
    #[must_use]
    pub fn choice<I>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        Self::combination(alternatives, ParsletKind::Choice)
    }

    fn combination<I>(parts: I, make: fn(Vec<Self>) -> ParsletKind) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let mut parts: Vec<_> = parts.into_iter().collect();
        if parts.len() == 1 {
            if let Some(only) = parts.pop() {
                return only;
            }
        }
        Self::from_kind(make(parts))
    }

    #[must_use]
    pub fn repetition(parslet: Self, min: usize, max: Option<usize>) -> Self {
        Self::from_kind(ParsletKind::Repetition { parslet, min, max })
    }

    #[must_use]
    pub fn repetition_with_default(parslet: Self, min: usize, max: Option<usize>, default: Value) -> Self {
        Self::from_kind(ParsletKind::RepetitionWithDefault {
            parslet,
            min,
            max,
            default,
        })
    }

    /// A parslet backed by a closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str, Location) -> Result<Value, ParseError> + Send + Sync + 'static,
    {
        Self::from_kind(ParsletKind::Proc(ProcParslet::new(f)))
    }

    /// `self` followed by `next`. Appends to an existing sequence instead of
    /// nesting, so `a.then(b).then(c)` is a single three-part sequence.
    #[must_use]
    pub fn then(self, next: impl Into<Self>) -> Self {
        self.append(next.into(), ParsletKind::Sequence)
    }

    /// `self` followed by `next`, flattening list results into one list.
    #[must_use]
    pub fn merge_with(self, next: impl Into<Self>) -> Self {
        self.append(next.into(), ParsletKind::Merge)
    }

    /// `self`, or else `alternative`. Appends to an existing choice.
    #[must_use]
    pub fn or(self, alternative: impl Into<Self>) -> Self {
        self.append(alternative.into(), ParsletKind::Choice)
    }

    fn append(self, next: Self, make: fn(Vec<Self>) -> ParsletKind) -> Self {
        let probe = make(Vec::new());
        let existing = match (self.kind(), &probe) {
            (ParsletKind::Sequence(parts), ParsletKind::Sequence(_))
            | (ParsletKind::Merge(parts), ParsletKind::Merge(_))
            | (ParsletKind::Choice(parts), ParsletKind::Choice(_)) => Some(parts.clone()),
            _ => None,
        };
        let mut parts = existing.unwrap_or_else(|| vec![self]);
        parts.push(next);
        Self::from_kind(make(parts))
    }

    #[must_use]
    pub fn repeat(self, min: usize, max: Option<usize>) -> Self {
        Self::repetition(self, min, max)
    }

    #[must_use]
    pub fn repeat_with_default(self, min: usize, max: Option<usize>, default: Value) -> Self {
        Self::repetition_with_default(self, min, max, default)
    }

    /// Zero or one occurrence.
    #[must_use]
    pub fn optional(self) -> Self {
        self.repeat(0, Some(1))
    }

    /// Zero or one occurrence, yielding `default` when absent.
    #[must_use]
    pub fn optional_with_default(self, default: Value) -> Self {
        self.repeat_with_default(0, Some(1), default)
    }

    #[must_use]
    pub fn zero_or_more(self) -> Self {
        self.repeat(0, None)
    }

    /// Zero or more occurrences, yielding `default` when there are none.
    #[must_use]
    pub fn zero_or_more_with_default(self, default: Value) -> Self {
        self.repeat_with_default(0, None, default)
    }

    #[must_use]
    pub fn one_or_more(self) -> Self {
        self.repeat(1, None)
    }

    /// Succeeds without consuming input if `self` matches here.
    #[must_use]
    pub fn and_predicate(self) -> Self {
        Self::from_kind(ParsletKind::And(self))
    }

    /// Succeeds without consuming input if `self` does not match here.
    #[must_use]
    pub fn not_predicate(self) -> Self {
        Self::from_kind(ParsletKind::Not(self))
    }

    /// Consumes whatever `self` matches but leaves it out of the result.
    #[must_use]
    pub fn skip(self) -> Self {
        Self::from_kind(ParsletKind::Omission(self))
    }

    /// Returns true if both handles point at the same parslet.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Parses `input` with this parslet alone, outside of any grammar.
    ///
    /// No inter-token skipping applies, and rule references fail with
    /// [`GrammarError::UndefinedRule`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`](crate::Error::Parse) if the input does not
    /// match.
    pub fn parse(&self, input: &str) -> Result<Value> {
        crate::engine::parse_standalone(self, input)
    }
}

impl PartialEq for Parslet {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.0.hash == other.0.hash && self.0.kind == other.0.kind)
    }
}

impl Eq for Parslet {}

impl Hash for Parslet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl From<&str> for Parslet {
    fn from(text: &str) -> Self {
        Self::literal(text)
    }
}

impl From<String> for Parslet {
    fn from(text: String) -> Self {
        Self::literal(text)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, parts: &[Parslet], separator: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{part}")?;
    }
    f.write_str(")")
}

fn write_bounds(f: &mut fmt::Formatter<'_>, min: usize, max: Option<usize>) -> fmt::Result {
    match max {
        Some(max) => write!(f, "{{{min},{max}}}"),
        None => write!(f, "{{{min},}}"),
    }
}

impl fmt::Display for Parslet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ParsletKind::Literal(text) => write!(f, "{:?}", text.as_str()),
            ParsletKind::Regex(pattern) => write!(f, "/{}/", pattern.source()),
            ParsletKind::Rule(name) => write!(f, "rule: {name}"),
            ParsletKind::Sequence(parts) => write_joined(f, parts, " & "),
            ParsletKind::Merge(parts) => write_joined(f, parts, " >> "),
            ParsletKind::Choice(parts) => write_joined(f, parts, " | "),
            ParsletKind::Repetition { parslet, min, max }
            | ParsletKind::RepetitionWithDefault {
                parslet, min, max, ..
            } => {
                write!(f, "{parslet}")?;
                write_bounds(f, *min, *max)
            }
            ParsletKind::And(inner) => write!(f, "{inner}.and?"),
            ParsletKind::Not(inner) => write!(f, "{inner}.not!"),
            ParsletKind::Omission(inner) => write!(f, "{inner}.skip"),
            ParsletKind::Proc(_) => f.write_str("<proc>"),
        }
    }
}

impl fmt::Debug for Parslet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parslet({self})")
    }
}
