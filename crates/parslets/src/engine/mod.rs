//! # Parsing Engine
//!
//! A packrat engine over [`Parslet`] trees. Every application of a parslet
//! goes through [`memoizing_parse`], which bounds the nesting depth, replays
//! memoized outcomes, and detects a rule recursing into itself at the same
//! position. Direct left recursion is handled by suspending the recursive
//! sequence and growing its result once an ordered choice has found a base
//! case.

pub mod config;
pub mod events;

mod choice;
mod context;
mod continuation;
mod memo;
mod outcome;
mod predicate;
mod repetition;
mod sequence;
mod state;
mod terminal;

pub use config::ParseConfig;
pub use events::{NullEventHandler, ParseEvent, ParseEventHandler, ParseStats};

pub(crate) use context::Skipping;

use crate::engine::context::{ParseContext, Scope};
use crate::engine::continuation::Frame;
use crate::engine::memo::{MemoCache, MemoKey};
use crate::engine::outcome::Outcome;
use crate::engine::state::ParserState;
use crate::error::{Error, GrammarError, ParseError, Result};
use crate::grammar::{Grammar, Parslet, ParsletKind};
use crate::syntax::{Location, Span, Value};

/// Parses `input` starting from `root` and converts the final outcome.
pub(crate) fn run(
    grammar: &Grammar,
    root: &Parslet,
    input: &str,
    config: &ParseConfig,
    events: &mut dyn ParseEventHandler,
) -> (Result<Value>, ParseStats) {
    let mut cx = ParseContext::new(input, grammar, config, events);
    let outcome = memoizing_parse(&mut cx, root, &Scope::default());
    log::debug!("parse of {} bytes with {root} finished", input.len());

    let result = match outcome {
        Outcome::Success(value) => Ok(value),
        Outcome::Escape(_) => Ok(Value::list(Vec::new(), Span::empty(Location::default()))),
        Outcome::Skipped(skipped) => Ok(Value::list(Vec::new(), skipped.span)),
        Outcome::Failure(error) => Err(Error::Parse(error)),
        Outcome::LeftRecursion(_) => Err(Error::LeftRecursion {
            rule: root
                .rule_name()
                .map_or_else(|| root.to_string().into(), Into::into),
        }),
        Outcome::Fatal(error) => Err(Error::Grammar(error)),
    };
    (result, cx.into_stats())
}

pub(crate) fn parse_standalone(parslet: &Parslet, input: &str) -> Result<Value> {
    let grammar = Grammar::default();
    run(&grammar, parslet, input, &ParseConfig::default(), &mut NullEventHandler).0
}

/// Applies `parslet` in `scope`, consulting and filling the memo cache.
pub(crate) fn memoizing_parse(cx: &mut ParseContext<'_>, parslet: &Parslet, scope: &Scope) -> Outcome {
    let location = scope.location();
    if cx.depth >= cx.config.max_depth {
        return Outcome::Failure(ParseError::depth_exceeded(cx.config.max_depth, location));
    }

    let key = MemoKey::new(parslet.clone(), location, scope.skipping.clone());
    if cx.config.memoize {
        if let Some(entry) = cx.cache.get(&key) {
            let outcome = entry.replay();
            cx.record(|stats| stats.cache_hits += 1);
            cx.emit(|| ParseEvent::CacheHit { location });
            return outcome;
        }
        cx.record(|stats| stats.cache_misses += 1);
    }

    let is_rule = parslet.rule_name().is_some();
    if is_rule && cx.cache.is_left_recursive(parslet, location) {
        note_left_recursion(cx, parslet, location);
        return Outcome::LeftRecursion(None);
    }

    cx.depth += 1;
    let depth = cx.depth;
    cx.record(|stats| stats.max_depth = stats.max_depth.max(depth));
    let previous = is_rule.then(|| cx.cache.mark(parslet.clone(), location));

    let outcome = parse(cx, parslet, scope);

    if let Some(previous) = previous {
        cx.cache.restore(previous);
    }
    cx.depth -= 1;
    MemoCache::finish(cx, key, outcome)
}

fn parse(cx: &mut ParseContext<'_>, parslet: &Parslet, scope: &Scope) -> Outcome {
    match parslet.kind() {
        ParsletKind::Literal(text) => terminal::parse_literal(cx, text, scope),
        ParsletKind::Regex(pattern) => terminal::parse_regex(cx, pattern, scope),
        ParsletKind::Proc(proc) => terminal::parse_proc(cx, proc, scope),
        ParsletKind::Rule(name) => parse_rule(cx, name, scope),
        ParsletKind::Sequence(_) | ParsletKind::Merge(_) => sequence::parse_sequence(cx, parslet, scope),
        ParsletKind::Choice(alternatives) => choice::parse_choice(cx, alternatives, scope),
        ParsletKind::Repetition { parslet, min, max } => {
            repetition::parse_repetition(cx, parslet, *min, *max, None, scope)
        }
        ParsletKind::RepetitionWithDefault {
            parslet,
            min,
            max,
            default,
        } => repetition::parse_repetition(cx, parslet, *min, *max, Some(default), scope),
        ParsletKind::And(inner) => predicate::parse_and(cx, inner, scope),
        ParsletKind::Not(inner) => predicate::parse_not(cx, inner, scope),
        ParsletKind::Omission(inner) => predicate::parse_omission(cx, inner, scope),
    }
}

/// Evaluates the body of the rule `name` and wraps its value.
fn parse_rule(cx: &mut ParseContext<'_>, name: &str, scope: &Scope) -> Outcome {
    let grammar = cx.grammar;
    let Some(body) = grammar.rule(name) else {
        return Outcome::Fatal(GrammarError::UndefinedRule(name.into()));
    };
    let rule_scope = Scope {
        position: scope.position,
        rule: Some(name.into()),
        skipping: grammar
            .skipping_for(name)
            .unwrap_or_else(|| scope.skipping.clone()),
    };

    let location = scope.location();
    cx.emit(|| ParseEvent::EnterRule {
        rule: name.into(),
        location,
    });
    cx.record(|stats| stats.rule_invocations += 1);

    let outcome = memoizing_parse(cx, body, &rule_scope);
    let outcome = finish_rule(cx, name, outcome);

    let success = outcome.is_success();
    cx.emit(|| ParseEvent::ExitRule {
        rule: name.into(),
        success,
    });
    outcome
}

/// Wraps a successful rule value, or records the rule in a left-recursion
/// continuation so that resuming it wraps the eventual value.
pub(crate) fn finish_rule(cx: &mut ParseContext<'_>, name: &str, outcome: Outcome) -> Outcome {
    match outcome {
        Outcome::Success(value) => match cx.grammar.wrap(value, name) {
            Ok(value) => Outcome::Success(value),
            Err(error) => Outcome::Fatal(error),
        },
        Outcome::LeftRecursion(Some(mut continuation)) => {
            continuation.push(Frame::Rule(name.into()));
            Outcome::LeftRecursion(Some(continuation))
        }
        outcome => outcome,
    }
}

/// Tries the skipper in effect for `scope` at the cursor of `state`.
///
/// Returns true if it consumed input, in which case the cursor has moved
/// past it.
pub(crate) fn skip_intertoken(
    cx: &mut ParseContext<'_>,
    scope: &Scope,
    state: &mut ParserState,
) -> Result<bool, GrammarError> {
    let Some(skipper) = cx.skipper(scope) else {
        return Ok(false);
    };
    let cursor = state.cursor();
    let end = match memoizing_parse(cx, &skipper, &state.scope(scope)) {
        Outcome::Success(value) => value.extent().end,
        Outcome::Skipped(skipped) => skipped.span.end,
        Outcome::Fatal(error) => return Err(error),
        _ => return Ok(false),
    };
    if end <= cursor.location {
        return Ok(false);
    }
    state.auto_skip(cx.input, end);
    Ok(true)
}

pub(crate) fn note_left_recursion(cx: &mut ParseContext<'_>, rule: &Parslet, location: Location) {
    log::debug!("left recursion in {rule} at {location}");
    cx.record(|stats| stats.left_recursions += 1);
    cx.emit(|| ParseEvent::LeftRecursion {
        rule: rule.rule_name().unwrap_or_default().into(),
        location,
    });
}
