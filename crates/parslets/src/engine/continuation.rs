//! Suspended computations captured when left recursion is detected.
//!
//! When a sequence finds that its first element is the rule currently being
//! entered at the same position, it suspends itself and the suspension
//! travels outward as [`Outcome::LeftRecursion`]. Every memoizing call and
//! rule evaluation it passes through adds a frame, so that resuming replays
//! their remaining work in order. The enclosing ordered choice resumes the
//! continuation once one of its later alternatives has produced a base-case
//! value.

use crate::engine::context::ParseContext;
use crate::engine::memo::{MemoCache, MemoKey};
use crate::engine::outcome::Outcome;
use crate::engine::sequence::SequenceRun;
use crate::engine::finish_rule;
use crate::syntax::Value;
use compact_str::CompactString;

/// The remaining work of a suspended left-recursive parse
#[derive(Debug)]
pub(crate) struct Continuation {
    /// Innermost first
    frames: Vec<Frame>,
}

#[derive(Debug)]
pub(crate) enum Frame {
    /// A sequence or merge waiting for the value of its first element
    Sequence(SequenceRun),
    /// A memoizing call waiting to store its outcome
    Memo(MemoKey),
    /// A rule evaluation waiting to wrap its value
    Rule(CompactString),
}

impl Continuation {
    pub(crate) fn new(frame: Frame) -> Box<Self> {
        Box::new(Self {
            frames: vec![frame],
        })
    }

    /// Adds a frame outside all existing ones.
    pub(crate) fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Number of suspended frames
    #[must_use]
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Feeds `value` to the innermost frame and the result of each frame to
    /// the next.
    ///
    /// If a frame recurses again, the frames not yet resumed are moved onto
    /// the new continuation and it is returned.
    pub(crate) fn resume(self, cx: &mut ParseContext<'_>, value: Value) -> Outcome {
        let mut outcome = Outcome::Success(value);
        let mut frames = self.frames.into_iter();
        while let Some(frame) = frames.next() {
            outcome = frame.resume(cx, outcome);
            if let Outcome::LeftRecursion(Some(continuation)) = &mut outcome {
                continuation.frames.extend(frames.by_ref());
                break;
            }
        }
        outcome
    }
}

impl Frame {
    fn resume(self, cx: &mut ParseContext<'_>, outcome: Outcome) -> Outcome {
        match self {
            Self::Sequence(run) => run.resume(cx, outcome),
            Self::Memo(key) => MemoCache::finish(cx, key, outcome),
            Self::Rule(name) => finish_rule(cx, &name, outcome),
        }
    }
}
