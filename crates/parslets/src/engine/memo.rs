use crate::engine::context::{ParseContext, Skipping};
use crate::engine::continuation::Frame;
use crate::engine::outcome::{Escape, Outcome, Skipped};
use crate::error::ParseError;
use crate::grammar::Parslet;
use crate::syntax::{Location, Value};
use hashbrown::HashMap;

/// Memoization cache for packrat parsing.
///
/// Outcomes are stored per (`parslet`, `location`, `skipping`). Left
/// recursion signals and grammar errors are never stored: the former depend
/// on the rules currently being evaluated, the latter end the parse.
///
/// The cache also holds the left-recursion marker: the rule reference most
/// recently entered, together with the location it was entered at.
#[derive(Debug)]
pub(crate) struct MemoCache {
    entries: HashMap<MemoKey, MemoEntry, ahash::RandomState>,
    marker: Option<Marker>,
}

/// Key for memoization cache entries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct MemoKey {
    parslet: Parslet,
    location: Location,
    skipping: Skipping,
}

impl MemoKey {
    /// Create a new memo key
    #[must_use]
    pub(crate) const fn new(parslet: Parslet, location: Location, skipping: Skipping) -> Self {
        Self {
            parslet,
            location,
            skipping,
        }
    }
}

/// Memoized outcome
#[derive(Debug, Clone)]
pub(crate) enum MemoEntry {
    Success(Value),
    Escape(Escape),
    Skipped(Skipped),
    Failure(ParseError),
}

impl MemoEntry {
    fn from_outcome(outcome: &Outcome) -> Option<Self> {
        match outcome {
            Outcome::Success(value) => Some(Self::Success(value.clone())),
            Outcome::Escape(escape) => Some(Self::Escape(*escape)),
            Outcome::Skipped(skipped) => Some(Self::Skipped(skipped.clone())),
            Outcome::Failure(error) => Some(Self::Failure(error.clone())),
            Outcome::LeftRecursion(_) | Outcome::Fatal(_) => None,
        }
    }

    /// Produces the stored outcome again.
    pub(crate) fn replay(&self) -> Outcome {
        match self {
            Self::Success(value) => Outcome::Success(value.clone()),
            Self::Escape(escape) => Outcome::Escape(*escape),
            Self::Skipped(skipped) => Outcome::Skipped(skipped.clone()),
            Self::Failure(error) => Outcome::Failure(error.clone()),
        }
    }
}

/// A rule reference and the location it was entered at
#[derive(Debug, Clone)]
pub(crate) struct Marker {
    rule: Parslet,
    location: Location,
}

impl MemoCache {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::with_hasher(ahash::RandomState::new()),
            marker: None,
        }
    }

    pub(crate) fn get(&self, key: &MemoKey) -> Option<&MemoEntry> {
        self.entries.get(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if `parslet` is the rule reference most recently
    /// entered at `location`.
    pub(crate) fn is_left_recursive(&self, parslet: &Parslet, location: Location) -> bool {
        self.marker
            .as_ref()
            .is_some_and(|marker| marker.location == location && marker.rule == *parslet)
    }

    /// Sets the marker, returning the one it replaces.
    pub(crate) fn mark(&mut self, rule: Parslet, location: Location) -> Option<Marker> {
        self.marker.replace(Marker { rule, location })
    }

    pub(crate) fn restore(&mut self, previous: Option<Marker>) {
        self.marker = previous;
    }

    /// Stores `outcome` under `key`, or extends a left-recursion
    /// continuation so that resuming it stores the eventual outcome.
    pub(crate) fn finish(cx: &mut ParseContext<'_>, key: MemoKey, outcome: Outcome) -> Outcome {
        match outcome {
            Outcome::LeftRecursion(Some(mut continuation)) => {
                if cx.config.memoize {
                    continuation.push(Frame::Memo(key));
                }
                Outcome::LeftRecursion(Some(continuation))
            }
            outcome => {
                if cx.config.memoize {
                    if let Some(entry) = MemoEntry::from_outcome(&outcome) {
                        cx.cache.entries.insert(key, entry);
                    }
                }
                outcome
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_matches_rule_and_location() {
        let mut cache = MemoCache::new();
        let rule = Parslet::rule("expr");
        assert!(!cache.is_left_recursive(&rule, Location::new(0, 0)));

        let previous = cache.mark(rule.clone(), Location::new(0, 0));
        assert!(previous.is_none());
        assert!(cache.is_left_recursive(&Parslet::rule("expr"), Location::new(0, 0)));
        assert!(!cache.is_left_recursive(&rule, Location::new(0, 1)));
        assert!(!cache.is_left_recursive(&Parslet::rule("term"), Location::new(0, 0)));

        let inner = cache.mark(Parslet::rule("term"), Location::new(0, 0));
        assert!(cache.is_left_recursive(&Parslet::rule("term"), Location::new(0, 0)));
        cache.restore(inner);
        assert!(cache.is_left_recursive(&rule, Location::new(0, 0)));
    }

    #[test]
    fn test_entry_replays_outcome() {
        let entry = MemoEntry::Escape(Escape::ZeroWidth);
        assert!(matches!(entry.replay(), Outcome::Escape(Escape::ZeroWidth)));
        assert!(MemoEntry::from_outcome(&Outcome::LeftRecursion(None)).is_none());
    }
}
