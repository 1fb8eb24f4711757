//! Test support: a minimal in-memory configuration tree.
//!
//! Real embedders bring their own tree; this one exists so the expansion
//! core can be exercised without one. Keys are stored by their split
//! segments, so the same tree works under any path separator.

use std::collections::HashMap;

use crate::ast::RefPath;
use crate::eval::EvalError;
use crate::tree::{Node, Options, TreeValue};

/// A value in a [`MapNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestValue {
    Str(String),
    Int(i64),
    /// A present key with no value (lookup succeeds, yields nothing).
    NoValue,
    /// A value with no string representation.
    Opaque,
}

impl TestValue {
    /// Shorthand for `TestValue::Str`.
    pub fn str(s: impl Into<String>) -> Self {
        TestValue::Str(s.into())
    }
}

impl TreeValue for TestValue {
    fn to_string_value(&self, _opts: &Options<'_>) -> Result<String, EvalError> {
        match self {
            TestValue::Str(s) => Ok(s.clone()),
            TestValue::Int(n) => Ok(n.to_string()),
            TestValue::NoValue => Err(EvalError::Conversion("absent value".into())),
            TestValue::Opaque => Err(EvalError::Conversion("opaque test value".into())),
        }
    }
}

/// A flat in-memory tree; always its own root.
#[derive(Debug, Default)]
pub struct MapNode {
    entries: HashMap<Vec<String>, TestValue>,
}

impl MapNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under a dotted key like `"a.b"`.
    pub fn set(&mut self, dotted: &str, value: TestValue) {
        let key = dotted.split('.').map(str::to_string).collect();
        self.entries.insert(key, value);
    }
}

impl Node for MapNode {
    fn parent(&self) -> Option<&dyn Node> {
        None
    }

    fn lookup(
        &self,
        path: &RefPath,
        _opts: &Options<'_>,
    ) -> Result<Option<Box<dyn TreeValue>>, EvalError> {
        match self.entries.get(path.segments()) {
            Some(TestValue::NoValue) => Ok(None),
            Some(value) => Ok(Some(Box::new(value.clone()))),
            None => Err(EvalError::Missing(path.to_string())),
        }
    }
}

/// A leaf node that defers everything to its parent; exercises the
/// root-ancestor walk.
#[derive(Debug)]
pub struct ChildNode<'a> {
    parent: &'a MapNode,
}

impl<'a> ChildNode<'a> {
    pub fn new(parent: &'a MapNode) -> Self {
        Self { parent }
    }
}

impl Node for ChildNode<'_> {
    fn parent(&self) -> Option<&dyn Node> {
        Some(self.parent)
    }

    fn lookup(
        &self,
        path: &RefPath,
        _opts: &Options<'_>,
    ) -> Result<Option<Box<dyn TreeValue>>, EvalError> {
        Err(EvalError::Missing(path.to_string()))
    }
}
