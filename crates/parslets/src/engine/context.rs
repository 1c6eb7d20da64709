use crate::engine::config::ParseConfig;
use crate::engine::events::{ParseEvent, ParseEventHandler, ParseStats};
use crate::engine::memo::MemoCache;
use crate::grammar::{Grammar, Parslet};
use crate::syntax::{Location, Position};
use compact_str::CompactString;

/// Which inter-token skipper applies
///
/// Part of every memo key: the same parslet at the same location may parse
/// differently under a different skipper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub(crate) enum Skipping {
    /// The grammar's default skipping parslet, if it has one
    #[default]
    Default,
    /// A per-rule override
    Override(Parslet),
    /// Skipping turned off by a per-rule override
    Disabled,
}

/// Where a parslet is applied and under which rule and skipper
#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
    pub(crate) position: Position,
    pub(crate) rule: Option<CompactString>,
    pub(crate) skipping: Skipping,
}

impl Scope {
    /// The same scope moved to `position`.
    pub(crate) fn at(&self, position: Position) -> Self {
        Self {
            position,
            rule: self.rule.clone(),
            skipping: self.skipping.clone(),
        }
    }

    pub(crate) const fn location(&self) -> Location {
        self.position.location
    }

    /// The unconsumed input.
    pub(crate) fn remainder<'i>(&self, input: &'i str) -> &'i str {
        &input[self.position.offset..]
    }
}

/// Context for a single parse
pub(crate) struct ParseContext<'a> {
    pub(crate) input: &'a str,
    pub(crate) grammar: &'a Grammar,
    pub(crate) config: &'a ParseConfig,
    pub(crate) cache: MemoCache,
    pub(crate) stats: ParseStats,
    /// Current nesting of parslet invocations
    pub(crate) depth: usize,
    events: &'a mut dyn ParseEventHandler,
}

impl<'a> ParseContext<'a> {
    pub(crate) fn new(
        input: &'a str,
        grammar: &'a Grammar,
        config: &'a ParseConfig,
        events: &'a mut dyn ParseEventHandler,
    ) -> Self {
        Self {
            input,
            grammar,
            config,
            cache: MemoCache::new(),
            stats: ParseStats::new(),
            depth: 0,
            events,
        }
    }

    /// Delivers an event if tracing is enabled.
    pub(crate) fn emit(&mut self, event: impl FnOnce() -> ParseEvent) {
        if self.config.trace_events {
            self.events.handle(event());
        }
    }

    /// Updates the statistics if they are being collected.
    pub(crate) fn record(&mut self, update: impl FnOnce(&mut ParseStats)) {
        if self.config.collect_stats {
            update(&mut self.stats);
        }
    }

    /// The skipping parslet in effect for `scope`.
    pub(crate) fn skipper(&self, scope: &Scope) -> Option<Parslet> {
        match &scope.skipping {
            Skipping::Default => self.grammar.default_skipping().cloned(),
            Skipping::Override(parslet) => Some(parslet.clone()),
            Skipping::Disabled => None,
        }
    }

    pub(crate) fn into_stats(self) -> ParseStats {
        log::trace!("parse finished with {} memoized outcomes", self.cache.len());
        self.stats
    }
}
