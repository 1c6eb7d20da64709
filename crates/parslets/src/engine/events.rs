//! Parse events and statistics, for debugging and tracing.

use crate::syntax::Location;
use compact_str::CompactString;

/// Statistics collected during parsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Number of rule references evaluated
    pub rule_invocations: usize,
    /// Memoized outcomes replayed
    pub cache_hits: usize,
    /// Outcomes computed and offered to the cache
    pub cache_misses: usize,
    /// Alternatives of an ordered choice that failed
    pub backtracks: usize,
    /// Times a rule was found recursing into itself at the same position
    pub left_recursions: usize,
    /// Suspended sequences resumed with a base-case value
    pub resumptions: usize,
    /// Iterations of the seed-and-grow loop that extended a result
    pub growths: usize,
    /// Maximum nesting of parslet invocations
    pub max_depth: usize,
}

impl ParseStats {
    /// Create new empty stats
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rule_invocations: 0,
            cache_hits: 0,
            cache_misses: 0,
            backtracks: 0,
            left_recursions: 0,
            resumptions: 0,
            growths: 0,
            max_depth: 0,
        }
    }

    /// Merge stats from another instance
    pub fn merge(&mut self, other: &Self) {
        self.rule_invocations += other.rule_invocations;
        self.cache_hits += other.cache_hits;
        self.cache_misses += other.cache_misses;
        self.backtracks += other.backtracks;
        self.left_recursions += other.left_recursions;
        self.resumptions += other.resumptions;
        self.growths += other.growths;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

/// A parsing event for debugging/tracing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    /// Started evaluating a rule
    EnterRule {
        rule: CompactString,
        location: Location,
    },
    /// Finished evaluating a rule
    ExitRule { rule: CompactString, success: bool },
    /// Replayed a memoized outcome
    CacheHit { location: Location },
    /// A rule recursed into itself without consuming input
    LeftRecursion {
        rule: CompactString,
        location: Location,
    },
    /// Resumed a suspended left-recursive sequence
    Resume { location: Location },
    /// An alternative failed and the choice moved on
    Backtrack { from: Location, to: Location },
}

/// Trait for receiving parse events
pub trait ParseEventHandler {
    /// Handle a parse event
    fn handle(&mut self, event: ParseEvent);
}

/// A no-op event handler
pub struct NullEventHandler;

impl ParseEventHandler for NullEventHandler {
    fn handle(&mut self, _event: ParseEvent) {}
}

impl ParseEventHandler for Vec<ParseEvent> {
    fn handle(&mut self, event: ParseEvent) {
        self.push(event);
    }
}
