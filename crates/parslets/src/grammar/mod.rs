//! # Grammar Definition
//!
//! [`Parslet`]s are the building blocks: literals, regular expressions and
//! rule references combined into sequences, choices, repetitions and
//! predicates. A [`Grammar`] names parslets as rules, configures
//! inter-token skipping and declares the productions that turn rule results
//! into AST nodes.

pub mod builder;
pub mod parslet;
pub mod production;

pub use builder::{Grammar, GrammarBuilder};
pub use parslet::{Parslet, ParsletKind, Pattern, ProcParslet};
pub use production::{DEFAULT_FIELD, NodeRegistry, Production};
