//! Source positions, text arithmetic and parse values.

pub mod location;
pub mod text;
pub mod value;

pub use location::{Location, Position, Span};
pub use value::{Node, RegexMatch, Value, ValueKind};
