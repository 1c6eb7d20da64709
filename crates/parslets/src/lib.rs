//! # Parslets
//!
//! A packrat parsing expression grammar (PEG) library built from small,
//! composable parsing units.
//!
//! ## Overview
//!
//! - **Combinators**: sequences, merges, ordered choice, bounded repetition,
//!   lookahead predicates and omission, all themselves [`Parslet`]s
//! - **Memoization**: outcomes are cached per parslet and position, giving
//!   linear-time parses for most grammars
//! - **Left recursion**: a rule such as `expr := expr '+' term | term` is
//!   parsed by suspending the recursive branch and growing its result from
//!   the base case, instead of looping forever
//! - **Inter-token skipping**: a grammar-wide skipping parslet (typically
//!   whitespace) with per-rule overrides
//! - **Precise positions**: every [`Value`] carries line/column [`Span`]s
//!   that count `\r\n`, `\r` and `\n` as one line break and columns in code
//!   points
//! - **AST productions**: rule results can be turned into named [`Node`]s
//!
//! ## Quick Start
//!
//! ```rust
//! use parslets::{GrammarBuilder, Parslet};
//!
//! // sum := sum '+' number | number
//! let number = Parslet::regex("[0-9]+").expect("valid pattern");
//! let grammar = GrammarBuilder::new()
//!     .start_rule("sum")
//!     .rule(
//!         "sum",
//!         Parslet::rule("sum")
//!             .then(Parslet::literal("+").skip())
//!             .then(Parslet::rule("number"))
//!             .or(Parslet::rule("number")),
//!     )
//!     .rule("number", number)
//!     .build()
//!     .expect("Failed to build grammar");
//!
//! let value = grammar.parse("1+2+3").expect("parses");
//! assert_eq!(
//!     serde_json::to_value(&value).unwrap(),
//!     serde_json::json!([["1", "2"], "3"]),
//! );
//! assert_eq!(value.span().source_text, "1+2+3");
//! ```
//!
//! ## Modules
//!
//! - [`syntax`] - Positions, spans and parse values
//! - [`grammar`] - Parslets, grammars and productions
//! - [`engine`] - Parse configuration, events and statistics
//! - [`error`] - Error types and diagnostics

pub mod engine;
pub mod error;
pub mod grammar;
pub mod syntax;

// Re-export commonly used types
pub use engine::{NullEventHandler, ParseConfig, ParseEvent, ParseEventHandler, ParseStats};
pub use error::{Error, GrammarError, ParseError, ParseErrorKind, Result};
pub use grammar::{Grammar, GrammarBuilder, Parslet, ParsletKind, Production};
pub use syntax::{Location, Node, Position, RegexMatch, Span, Value, ValueKind};
