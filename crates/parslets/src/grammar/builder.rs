use crate::engine::{self, NullEventHandler, ParseConfig, ParseEventHandler, ParseStats, Skipping};
use crate::error::{GrammarError, Result};
use crate::grammar::parslet::{Parslet, ParsletKind};
use crate::grammar::production::{NodeRegistry, Production};
use crate::syntax::Value;
use compact_str::CompactString;
use hashbrown::HashMap;

type NameMap<V> = HashMap<CompactString, V, ahash::RandomState>;

/// An immutable PEG grammar.
///
/// A `Grammar` holds named rules, the rule parsing starts from, optional
/// inter-token skipping (a grammar-wide default plus per-rule overrides) and
/// the productions that turn rule results into AST nodes. It is built with
/// [`GrammarBuilder`] and is read-only afterwards, so it can be shared
/// between concurrent parses; every parse gets its own memoization cache.
///
/// # Example
///
/// ```rust
/// use parslets::{GrammarBuilder, Parslet};
///
/// let grammar = GrammarBuilder::new()
///     .start_rule("list")
///     .rule("list", Parslet::rule("word").zero_or_more())
///     .rule("word", Parslet::regex("[a-z]+").expect("valid pattern"))
///     .skipping(Parslet::regex(r"\s+").expect("valid pattern"))
///     .build()
///     .expect("Failed to build grammar");
///
/// let words = grammar.parse("foo bar").expect("parses");
/// assert_eq!(serde_json::to_value(&words).unwrap(), serde_json::json!(["foo", "bar"]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    rules: NameMap<Parslet>,
    rule_order: Vec<CompactString>,
    start_rule: CompactString,
    default_skipping: Option<Parslet>,
    /// `None` disables skipping for the rule
    skipping_overrides: NameMap<Option<Parslet>>,
    productions: NameMap<Production>,
    nodes: NodeRegistry,
}

impl Grammar {
    /// The body of the rule `name`.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Parslet> {
        self.rules.get(name)
    }

    /// Rules in the order they were defined.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &Parslet)> {
        self.rule_order
            .iter()
            .filter_map(|name| Some((name.as_str(), self.rules.get(name)?)))
    }

    #[must_use]
    pub fn start_rule(&self) -> &str {
        &self.start_rule
    }

    /// The grammar-wide inter-token skipping parslet.
    #[must_use]
    pub const fn default_skipping(&self) -> Option<&Parslet> {
        self.default_skipping.as_ref()
    }

    /// The skipping override for `rule`: `Some(None)` means skipping is
    /// disabled for it, `None` means it has no override.
    #[must_use]
    pub fn skipping_override(&self, rule: &str) -> Option<Option<&Parslet>> {
        self.skipping_overrides.get(rule).map(Option::as_ref)
    }

    pub(crate) fn skipping_for(&self, rule: &str) -> Option<Skipping> {
        self.skipping_overrides.get(rule).map(|skipper| match skipper {
            Some(parslet) => Skipping::Override(parslet.clone()),
            None => Skipping::Disabled,
        })
    }

    #[must_use]
    pub fn production(&self, rule: &str) -> Option<&Production> {
        self.productions.get(rule)
    }

    /// Returns true if `kind` was declared as a node kind.
    #[must_use]
    pub fn has_node(&self, kind: &str) -> bool {
        self.nodes.contains(kind)
    }

    /// Applies the production of `rule` to its raw value.
    ///
    /// Without a production the value passes through, taking its outer span
    /// as its own so the rule's result accounts for everything the rule
    /// consumed.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::ProductionArity`] if the value does not have
    /// one item per production field.
    pub fn wrap(&self, value: Value, rule: &str) -> Result<Value, GrammarError> {
        match self.productions.get(rule) {
            Some(production) => production.build(rule, value),
            None => Ok(value.absorb_outer()),
        }
    }

    /// Parse `input` from the start rule with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`](crate::Error::Parse) with the rightmost
    /// failure if the input does not match,
    /// [`Error::LeftRecursion`](crate::Error::LeftRecursion) if a recursive
    /// rule has no base case, and [`Error::Grammar`](crate::Error::Grammar)
    /// if the grammar turns out to be malformed.
    pub fn parse(&self, input: &str) -> Result<Value> {
        self.parse_with(input, &ParseConfig::default())
    }

    /// Parse `input` with the given configuration.
    ///
    /// # Errors
    ///
    /// See [`Grammar::parse`].
    pub fn parse_with(&self, input: &str, config: &ParseConfig) -> Result<Value> {
        self.parse_with_stats(input, config).0
    }

    /// Parse `input`, also returning statistics about the parse.
    pub fn parse_with_stats(&self, input: &str, config: &ParseConfig) -> (Result<Value>, ParseStats) {
        self.parse_with_handler(input, config, &mut NullEventHandler)
    }

    /// Parse `input`, delivering [`ParseEvent`](crate::ParseEvent)s to
    /// `handler` when `config.trace_events` is set.
    pub fn parse_with_handler(
        &self,
        input: &str,
        config: &ParseConfig,
        handler: &mut dyn ParseEventHandler,
    ) -> (Result<Value>, ParseStats) {
        let start = Parslet::rule(self.start_rule.clone());
        engine::run(self, &start, input, config, handler)
    }
}

/// Builder for [`Grammar`]
///
/// Methods consume and return the builder so definitions chain. The first
/// configuration error is kept and reported by [`GrammarBuilder::build`].
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    grammar: Grammar,
    start_rule: Option<CompactString>,
    error: Option<GrammarError>,
}

impl GrammarBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(mut self, error: GrammarError) -> Self {
        self.error.get_or_insert(error);
        self
    }

    /// Set the rule parsing starts from.
    #[must_use]
    pub fn start_rule(mut self, name: impl Into<CompactString>) -> Self {
        if self.start_rule.is_some() {
            return self.fail(GrammarError::StartRuleAlreadySet);
        }
        self.start_rule = Some(name.into());
        self
    }

    /// Define the rule `name`.
    #[must_use]
    pub fn rule(mut self, name: impl Into<CompactString>, body: impl Into<Parslet>) -> Self {
        let name = name.into();
        if self.grammar.rules.contains_key(&name) {
            return self.fail(GrammarError::RuleAlreadyDefined(name));
        }
        self.grammar.rule_order.push(name.clone());
        self.grammar.rules.insert(name, body.into());
        self
    }

    /// Set the grammar-wide inter-token skipping parslet.
    #[must_use]
    pub fn skipping(mut self, skipper: impl Into<Parslet>) -> Self {
        if self.grammar.default_skipping.is_some() {
            return self.fail(GrammarError::DefaultSkippingAlreadySet);
        }
        self.grammar.default_skipping = Some(skipper.into());
        self
    }

    /// Override skipping while parsing `rule` and the rules it references.
    /// `None` disables skipping.
    ///
    /// The rule must already be defined.
    #[must_use]
    pub fn skipping_override(mut self, rule: impl Into<CompactString>, skipper: Option<Parslet>) -> Self {
        let rule = rule.into();
        if !self.grammar.rules.contains_key(&rule) {
            return self.fail(GrammarError::SkippingOverrideForUnknownRule(rule));
        }
        if self.grammar.skipping_overrides.contains_key(&rule) {
            return self.fail(GrammarError::SkippingOverrideAlreadySet(rule));
        }
        self.grammar.skipping_overrides.insert(rule, skipper);
        self
    }

    /// Declare the node kind `name`, optionally as a subkind of `parent`.
    #[must_use]
    pub fn node(mut self, name: &str, parent: Option<&str>) -> Self {
        match self.grammar.nodes.declare(name, parent) {
            Ok(()) => self,
            Err(error) => self.fail(error),
        }
    }

    /// Build nodes of the kind named after `rule` from its results, spread
    /// over `fields` (a single `lexeme` field if empty).
    ///
    /// The rule and the node kind must already be defined.
    #[must_use]
    pub fn production(mut self, rule: &str, fields: &[&str]) -> Self {
        if !self.grammar.rules.contains_key(rule) {
            return self.fail(GrammarError::ProductionForUnknownRule(rule.into()));
        }
        if self.grammar.productions.contains_key(rule) {
            return self.fail(GrammarError::ProductionAlreadyDefined(rule.into()));
        }
        let Some(lineage) = self.grammar.nodes.lineage(rule) else {
            return self.fail(GrammarError::UnknownNode(rule.into()));
        };
        self.grammar
            .productions
            .insert(rule.into(), Production::new(lineage, fields));
        self
    }

    /// Build the grammar.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error, [`GrammarError::MissingStartRule`]
    /// if no start rule was set, or [`GrammarError::UndefinedRule`] if any
    /// rule, skipper or the start rule refers to a rule that was never
    /// defined.
    pub fn build(mut self) -> Result<Grammar, GrammarError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let start_rule = self.start_rule.ok_or(GrammarError::MissingStartRule)?;
        self.grammar.start_rule = start_rule;
        validate_references(&self.grammar)?;
        log::debug!(
            "built grammar with {} rules starting at '{}'",
            self.grammar.rules.len(),
            self.grammar.start_rule
        );
        Ok(self.grammar)
    }
}

fn validate_references(grammar: &Grammar) -> Result<(), GrammarError> {
    let mut referenced = vec![grammar.start_rule.clone()];
    for (_, body) in grammar.rules() {
        collect_references(body, &mut referenced);
    }
    let skippers = grammar
        .default_skipping
        .iter()
        .chain(grammar.skipping_overrides.values().flatten());
    for skipper in skippers {
        collect_references(skipper, &mut referenced);
    }
    match referenced.into_iter().find(|name| !grammar.rules.contains_key(name)) {
        Some(name) => Err(GrammarError::UndefinedRule(name)),
        None => Ok(()),
    }
}

fn collect_references(parslet: &Parslet, out: &mut Vec<CompactString>) {
    match parslet.kind() {
        ParsletKind::Rule(name) => out.push(name.clone()),
        ParsletKind::Sequence(parts) | ParsletKind::Merge(parts) | ParsletKind::Choice(parts) => {
            for part in parts {
                collect_references(part, out);
            }
        }
        ParsletKind::Repetition { parslet, .. } | ParsletKind::RepetitionWithDefault { parslet, .. } => {
            collect_references(parslet, out);
        }
        ParsletKind::And(inner) | ParsletKind::Not(inner) | ParsletKind::Omission(inner) => {
            collect_references(inner, out);
        }
        ParsletKind::Literal(_) | ParsletKind::Regex(_) | ParsletKind::Proc(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_start_rule() {
        let result = GrammarBuilder::new().rule("a", "a").build();
        assert!(matches!(result, Err(GrammarError::MissingStartRule)));
    }

    #[test]
    fn test_duplicate_rule_is_reported() {
        let result = GrammarBuilder::new()
            .start_rule("a")
            .rule("a", "x")
            .rule("a", "y")
            .build();
        assert!(matches!(result, Err(GrammarError::RuleAlreadyDefined(name)) if name == "a"));
    }

    #[test]
    fn test_first_error_wins() {
        let result = GrammarBuilder::new()
            .start_rule("a")
            .start_rule("b")
            .skipping("x")
            .skipping("y")
            .build();
        assert!(matches!(result, Err(GrammarError::StartRuleAlreadySet)));
    }

    #[test]
    fn test_undefined_references_are_reported() {
        let result = GrammarBuilder::new()
            .start_rule("a")
            .rule("a", Parslet::literal("x").then(Parslet::rule("missing")))
            .build();
        assert!(matches!(result, Err(GrammarError::UndefinedRule(name)) if name == "missing"));

        let result = GrammarBuilder::new().start_rule("nowhere").rule("a", "x").build();
        assert!(matches!(result, Err(GrammarError::UndefinedRule(name)) if name == "nowhere"));
    }

    #[test]
    fn test_skipping_override_requires_rule() {
        let result = GrammarBuilder::new()
            .start_rule("a")
            .skipping_override("a", None)
            .rule("a", "x")
            .build();
        assert!(matches!(result, Err(GrammarError::SkippingOverrideForUnknownRule(_))));

        let grammar = GrammarBuilder::new()
            .start_rule("a")
            .rule("a", "x")
            .skipping_override("a", None)
            .build()
            .expect("valid grammar");
        assert_eq!(grammar.skipping_override("a"), Some(None));
        assert_eq!(grammar.skipping_override("b"), None);
    }

    #[test]
    fn test_production_requires_rule_and_node() {
        let result = GrammarBuilder::new()
            .start_rule("a")
            .rule("a", "x")
            .production("a", &[])
            .build();
        assert!(matches!(result, Err(GrammarError::UnknownNode(_))));

        let result = GrammarBuilder::new()
            .start_rule("a")
            .node("a", None)
            .production("a", &[])
            .rule("a", "x")
            .build();
        assert!(matches!(result, Err(GrammarError::ProductionForUnknownRule(_))));

        let result = GrammarBuilder::new()
            .start_rule("a")
            .rule("a", "x")
            .node("a", None)
            .production("a", &[])
            .production("a", &["value"])
            .build();
        assert!(matches!(result, Err(GrammarError::ProductionAlreadyDefined(_))));
    }

    #[test]
    fn test_rules_iterate_in_definition_order() {
        let grammar = GrammarBuilder::new()
            .start_rule("c")
            .rule("c", Parslet::rule("b"))
            .rule("b", Parslet::rule("a"))
            .rule("a", "x")
            .build()
            .expect("valid grammar");
        let names: Vec<_> = grammar.rules().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
        assert_eq!(grammar.start_rule(), "c");
    }
}
