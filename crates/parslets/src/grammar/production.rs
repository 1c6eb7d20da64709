//! AST productions
//!
//! A production turns the raw value of a rule into a [`Node`]. Node kinds
//! are declared up front with an optional parent kind, and a production
//! names the ordered fields the raw value is spread across.

use crate::error::GrammarError;
use crate::syntax::{Node, Value};
use compact_str::CompactString;
use hashbrown::HashMap;
use smallvec::SmallVec;
use std::sync::Arc;

/// The field a production stores its value in when none are named
pub const DEFAULT_FIELD: &str = "lexeme";

/// Declared node kinds and their parents
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    parents: HashMap<CompactString, Option<CompactString>, ahash::RandomState>,
}

impl NodeRegistry {
    /// Declare the node kind `name`, optionally as a subkind of `parent`.
    ///
    /// # Errors
    ///
    /// Fails if `name` is already declared or `parent` is not.
    pub fn declare(&mut self, name: &str, parent: Option<&str>) -> Result<(), GrammarError> {
        if self.parents.contains_key(name) {
            return Err(GrammarError::NodeAlreadyDefined(name.into()));
        }
        if let Some(parent) = parent {
            if !self.parents.contains_key(parent) {
                return Err(GrammarError::UnknownParentNode {
                    node: name.into(),
                    parent: parent.into(),
                });
            }
        }
        self.parents.insert(name.into(), parent.map(Into::into));
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.parents.contains_key(name)
    }

    /// The kind followed by its ancestors, nearest first.
    #[must_use]
    pub fn lineage(&self, name: &str) -> Option<Arc<[CompactString]>> {
        let mut lineage = Vec::new();
        let mut current = Some(CompactString::from(name));
        while let Some(kind) = current {
            current = self.parents.get(&kind)?.clone();
            lineage.push(kind);
        }
        Some(lineage.into())
    }
}

/// How to build a node from the raw value of a rule
#[derive(Debug, Clone)]
pub struct Production {
    lineage: Arc<[CompactString]>,
    fields: SmallVec<[CompactString; 4]>,
}

impl Production {
    pub(crate) fn new(lineage: Arc<[CompactString]>, fields: &[&str]) -> Self {
        let fields = if fields.is_empty() {
            SmallVec::from_iter([CompactString::from(DEFAULT_FIELD)])
        } else {
            fields.iter().copied().map(CompactString::from).collect()
        };
        Self { lineage, fields }
    }

    /// The kind of node this production builds.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.lineage.first().map_or("", CompactString::as_str)
    }

    #[must_use]
    pub fn fields(&self) -> &[CompactString] {
        &self.fields
    }

    /// Builds a node from the raw value of `rule`.
    ///
    /// A single-field production stores the whole value. Otherwise the value
    /// must be a list with one item per field. The node spans the value's
    /// outer span if it has one.
    pub(crate) fn build(&self, rule: &str, value: Value) -> Result<Value, GrammarError> {
        let span = value.extent().clone();
        let fields = if let [field] = self.fields.as_slice() {
            vec![(field.clone(), value)]
        } else {
            let items = value.as_list().unwrap_or_default();
            if items.len() != self.fields.len() {
                return Err(GrammarError::ProductionArity {
                    rule: rule.into(),
                    expected: self.fields.len(),
                    found: value.as_list().map_or(1, <[Value]>::len),
                });
            }
            self.fields.iter().cloned().zip(items.iter().cloned()).collect()
        };
        Ok(Value::node(Node::new(Arc::clone(&self.lineage), fields), span))
    }
}
