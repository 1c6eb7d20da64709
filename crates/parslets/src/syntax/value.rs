//! Values produced by successful parses
//!
//! A [`Value`] is text, a regular expression match, an ordered list of
//! values or an AST [`Node`]. Every value carries the [`Span`] it was parsed
//! from. A value promoted out of a list context may additionally carry an
//! *outer* span: the bounds of the list it was the sole member of. The outer
//! span never replaces the value's own span.
//!
//! Equality and hashing look only at content. Spans are ignored, and text
//! compares equal to a regex match with the same matched string.

use crate::syntax::location::{Location, Span};
use crate::syntax::text;
use compact_str::CompactString;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A parse result
#[derive(Debug, Clone)]
pub struct Value {
    kind: ValueKind,
    span: Span,
    outer: Option<Box<Span>>,
}

/// What a [`Value`] holds
#[derive(Debug, Clone)]
pub enum ValueKind {
    /// Literal text
    Text(CompactString),
    /// A regular expression match with its capture groups
    Match(RegexMatch),
    /// An ordered collection of results
    List(Vec<Value>),
    /// An AST node built by a production
    Node(Node),
}

impl Value {
    #[must_use]
    pub fn text(text: impl Into<CompactString>, span: Span) -> Self {
        Self::with_kind(ValueKind::Text(text.into()), span)
    }

    /// Text starting at `start`, with its end computed from the text itself.
    #[must_use]
    pub fn spanning(text: &str, start: Location) -> Self {
        let end = text::advance(start, text);
        Self::text(text, Span::new(start, end, text))
    }

    #[must_use]
    pub fn regex_match(found: RegexMatch, span: Span) -> Self {
        Self::with_kind(ValueKind::Match(found), span)
    }

    #[must_use]
    pub fn list(items: Vec<Value>, span: Span) -> Self {
        Self::with_kind(ValueKind::List(items), span)
    }

    /// An empty list at no particular position.
    #[must_use]
    pub fn empty() -> Self {
        Self::list(Vec::new(), Span::default())
    }

    #[must_use]
    pub fn node(node: Node, span: Span) -> Self {
        Self::with_kind(ValueKind::Node(node), span)
    }

    const fn with_kind(kind: ValueKind, span: Span) -> Self {
        Self {
            kind,
            span,
            outer: None,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &ValueKind {
        &self.kind
    }

    #[must_use]
    pub fn into_kind(self) -> ValueKind {
        self.kind
    }

    /// The value's own span.
    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }

    /// The span of the list context this value was promoted out of, if it
    /// differs from the value's own span.
    #[must_use]
    pub fn outer_span(&self) -> Option<&Span> {
        self.outer.as_deref()
    }

    /// The outer span if present, else the value's own span.
    ///
    /// This is the stretch of input the value accounts for when it is
    /// accepted into an enclosing result.
    #[must_use]
    pub fn extent(&self) -> &Span {
        self.outer.as_deref().unwrap_or(&self.span)
    }

    /// The matched text of a text or match value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Text(text) => Some(text),
            ValueKind::Match(found) => Some(found.as_str()),
            ValueKind::List(_) | ValueKind::Node(_) => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match &self.kind {
            ValueKind::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_match(&self) -> Option<&RegexMatch> {
        match &self.kind {
            ValueKind::Match(found) => Some(found),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_node(&self) -> Option<&Node> {
        match &self.kind {
            ValueKind::Node(node) => Some(node),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty_list(&self) -> bool {
        self.as_list().is_some_and(<[Value]>::is_empty)
    }

    /// Attaches `outer` unless it equals the value's own span.
    #[must_use]
    pub(crate) fn with_outer(mut self, outer: Span) -> Self {
        self.outer = (outer != self.span).then(|| Box::new(outer));
        self
    }

    /// Replaces the own span with the outer span, if any.
    #[must_use]
    pub(crate) fn absorb_outer(mut self) -> Self {
        if let Some(outer) = self.outer.take() {
            self.span = *outer;
        }
        self
    }

    /// Replaces both spans with `span`.
    #[must_use]
    pub(crate) fn stamped(mut self, span: Span) -> Self {
        self.span = span;
        self.outer = None;
        self
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (ValueKind::List(a), ValueKind::List(b)) => a == b,
            (ValueKind::Node(a), ValueKind::Node(b)) => a == b,
            (ValueKind::List(_) | ValueKind::Node(_), _)
            | (_, ValueKind::List(_) | ValueKind::Node(_)) => false,
            _ => self.as_str() == other.as_str(),
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.kind {
            ValueKind::Text(_) | ValueKind::Match(_) => {
                state.write_u8(0);
                self.as_str().hash(state);
            }
            ValueKind::List(items) => {
                state.write_u8(1);
                items.hash(state);
            }
            ValueKind::Node(node) => {
                state.write_u8(2);
                node.hash(state);
            }
        }
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.kind {
            ValueKind::Text(text) => serializer.serialize_str(text),
            ValueKind::Match(found) => serializer.serialize_str(found.as_str()),
            ValueKind::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ValueKind::Node(node) => node.serialize(serializer),
        }
    }
}

/// The owned result of a regular expression match
///
/// Group 0 is the whole match. Groups that did not participate are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegexMatch {
    groups: SmallVec<[Option<CompactString>; 4]>,
}

impl RegexMatch {
    #[must_use]
    pub fn from_captures(captures: &regex::Captures<'_>) -> Self {
        Self {
            groups: captures
                .iter()
                .map(|group| group.map(|m| CompactString::from(m.as_str())))
                .collect(),
        }
    }

    /// The whole matched text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.group(0).unwrap_or_default()
    }

    /// The text of capture group `index`.
    #[must_use]
    pub fn group(&self, index: usize) -> Option<&str> {
        self.groups.get(index)?.as_deref()
    }

    /// Number of groups, including the whole match.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// An AST node built from a rule's result by its production
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    kind: CompactString,
    /// The kind itself followed by its ancestors, nearest first
    lineage: Arc<[CompactString]>,
    fields: Vec<(CompactString, Value)>,
}

impl Node {
    #[must_use]
    pub fn new(lineage: Arc<[CompactString]>, fields: Vec<(CompactString, Value)>) -> Self {
        Self {
            kind: lineage.first().cloned().unwrap_or_default(),
            lineage,
            fields,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns true if the node's kind is `kind` or descends from it.
    #[must_use]
    pub fn is_a(&self, kind: &str) -> bool {
        self.lineage.iter().any(|k| k == kind)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(field, value)| (field == name).then_some(value))
    }

    /// Shorthand for the default single field.
    #[must_use]
    pub fn lexeme(&self) -> Option<&Value> {
        self.field("lexeme")
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("node", self.kind.as_str())?;
        for (name, value) in &self.fields {
            map.serialize_entry(name.as_str(), value)?;
        }
        map.end()
    }
}
