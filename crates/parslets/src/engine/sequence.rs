//! Sequences and merges, including suspension and growth under left
//! recursion.
//!
//! A sequence whose first element is the rule currently being entered at
//! the same position cannot make progress on its own. Instead of recursing
//! it suspends itself. Once an enclosing choice has found a base case, the
//! sequence is resumed with that value as its first element, completes, and
//! then keeps re-applying its remaining elements to the input that follows,
//! pairing each new result with everything accumulated so far. For
//! `a := a & b | b` over `b b b` that yields `[[b, b], b]`.

use crate::engine::context::{ParseContext, Scope};
use crate::engine::continuation::{Continuation, Frame};
use crate::engine::outcome::{Escape, Outcome};
use crate::engine::state::{ParserState, seek};
use crate::engine::{memoizing_parse, note_left_recursion, skip_intertoken};
use crate::grammar::{Parslet, ParsletKind};
use crate::syntax::{Span, Value, ValueKind};

/// An in-progress sequence or merge
///
/// Kept as a value so that it can be suspended inside a [`Continuation`]
/// and picked up again where it left off.
#[derive(Debug)]
pub(crate) struct SequenceRun {
    parslet: Parslet,
    scope: Scope,
    state: ParserState,
    index: usize,
    last_caught: Option<Escape>,
    /// Suspended at its first element; grows its result on completion.
    recursing: bool,
    /// The next resumed value is a base case for the enclosing rule.
    awaiting_seed: bool,
}

pub(crate) fn parse_sequence(cx: &mut ParseContext<'_>, parslet: &Parslet, scope: &Scope) -> Outcome {
    SequenceRun::new(parslet.clone(), scope.clone(), 0).run(cx, None)
}

impl SequenceRun {
    fn new(parslet: Parslet, scope: Scope, index: usize) -> Self {
        let state = ParserState::new(scope.position);
        Self {
            parslet,
            scope,
            state,
            index,
            last_caught: None,
            recursing: false,
            awaiting_seed: false,
        }
    }

    /// Continues a suspended run with the outcome of the element it was
    /// waiting on.
    pub(crate) fn resume(mut self, cx: &mut ParseContext<'_>, outcome: Outcome) -> Outcome {
        let outcome = match outcome {
            Outcome::Success(seed) if self.awaiting_seed => match &self.scope.rule {
                Some(rule) => match cx.grammar.wrap(seed, rule) {
                    Ok(seed) => Outcome::Success(seed),
                    Err(error) => Outcome::Fatal(error),
                },
                None => Outcome::Success(seed),
            },
            outcome => outcome,
        };
        self.awaiting_seed = false;
        self.run(cx, Some(outcome))
    }

    fn run(mut self, cx: &mut ParseContext<'_>, mut pending: Option<Outcome>) -> Outcome {
        let parslet = self.parslet.clone();
        let (elements, flatten) = match parslet.kind() {
            ParsletKind::Sequence(elements) => (elements.as_slice(), false),
            ParsletKind::Merge(elements) => (elements.as_slice(), true),
            _ => (&[][..], false),
        };

        while let Some(element) = elements.get(self.index) {
            let outcome = match pending.take() {
                Some(outcome) => outcome,
                None => {
                    let location = self.state.cursor().location;
                    if self.index == 0 && cx.cache.is_left_recursive(element, location) {
                        note_left_recursion(cx, element, location);
                        self.recursing = true;
                        self.awaiting_seed = true;
                        return Outcome::LeftRecursion(Some(Continuation::new(Frame::Sequence(self))));
                    }
                    memoizing_parse(cx, element, &self.state.scope(&self.scope))
                }
            };

            match outcome {
                Outcome::Success(value) => {
                    self.accept(cx.input, value, flatten);
                    self.last_caught = None;
                    self.index += 1;
                }
                Outcome::Skipped(skipped) => {
                    self.state.discard(cx.input, skipped.span.end);
                    self.last_caught = None;
                    self.index += 1;
                }
                Outcome::Escape(escape) => {
                    self.last_caught = Some(escape);
                    self.index += 1;
                }
                Outcome::Failure(error) => match skip_intertoken(cx, &self.scope, &mut self.state) {
                    Ok(true) => {}
                    Ok(false) => return Outcome::Failure(error),
                    Err(error) => return Outcome::Fatal(error),
                },
                Outcome::LeftRecursion(Some(mut continuation)) => {
                    continuation.push(Frame::Sequence(self));
                    return Outcome::LeftRecursion(Some(continuation));
                }
                outcome @ (Outcome::LeftRecursion(None) | Outcome::Fatal(_)) => return outcome,
            }
        }

        if self.recursing {
            return grow(cx, &parslet, &self.scope, self.state);
        }
        let value = self.state.finalize(cx.input);
        match self.last_caught {
            Some(escape) if value.is_empty_list() => Outcome::Escape(escape),
            _ => Outcome::Success(value),
        }
    }

    fn accept(&mut self, input: &str, value: Value, flatten: bool) {
        if !flatten || value.as_list().is_none() {
            self.state.accept(input, value);
            return;
        }
        let end = value.extent().end;
        if let ValueKind::List(items) = value.into_kind() {
            for item in items {
                self.state.accept(input, item);
            }
        }
        self.state.discard(input, end);
    }
}

/// Repeatedly applies everything after the first element, pairing each new
/// result with the accumulated one, until no further progress is made.
fn grow(cx: &mut ParseContext<'_>, parslet: &Parslet, scope: &Scope, state: ParserState) -> Outcome {
    let start = state.start();
    let mut cursor = state.cursor();
    let mut accumulated = state.finalize(cx.input);

    while cursor.offset < cx.input.len() {
        let run = SequenceRun::new(parslet.clone(), scope.at(cursor), 1);
        let increment = match run.run(cx, None) {
            Outcome::Success(value) => value,
            Outcome::Fatal(error) => return Outcome::Fatal(error),
            _ => break,
        };
        let end = increment.extent().end;
        if end <= cursor.location {
            break;
        }
        cursor = seek(cx.input, cursor, end);
        let span = Span::new(
            start.location,
            cursor.location,
            &cx.input[start.offset..cursor.offset],
        );
        accumulated = Value::list(vec![accumulated, increment], span);
        cx.record(|stats| stats.growths += 1);
        log::trace!("grew left-recursive result to {}", cursor.location);
    }

    Outcome::Success(accumulated)
}
