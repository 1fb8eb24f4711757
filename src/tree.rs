//! Collaborator traits for the configuration tree.
//!
//! The expansion core walks a hierarchical key/value tree but does not own
//! its storage, typing, or path-lookup mechanics. Embedders implement [`Node`]
//! and [`TreeValue`] to adapt their configuration layer, and bundle lookup
//! state into [`Options`], which is passed through unmodified to every lookup
//! and resolution call.

use std::cell::Cell;
use std::fmt;

use crate::ast::RefPath;
use crate::eval::EvalError;

/// Hard cap on reentrant `expand` calls through one `Options` bundle.
///
/// A key whose value expands to a reference to itself would otherwise recurse
/// until the stack runs out; nothing else in the algorithm bounds it.
pub const MAX_EXPAND_DEPTH: usize = 64;

/// A node in a hierarchical configuration tree.
pub trait Node {
    /// The parent node, or `None` at the tree root.
    fn parent(&self) -> Option<&dyn Node>;

    /// Look up `path` relative to this node.
    ///
    /// - `Ok(Some(value))` — the path resolved to a value.
    /// - `Ok(None)` — the path names a present key with no value; resolution
    ///   stops searching trees and moves on to resolver callbacks.
    /// - `Err(_)` — the path was not found; resolution tries the next
    ///   fallback root.
    fn lookup(
        &self,
        path: &RefPath,
        opts: &Options<'_>,
    ) -> Result<Option<Box<dyn TreeValue>>, EvalError>;
}

/// A typed value produced by a tree lookup.
pub trait TreeValue {
    /// Render the value as a string. Fails for values with no string form
    /// (structured nodes, for instance).
    fn to_string_value(&self, opts: &Options<'_>) -> Result<String, EvalError>;
}

/// A plain string value.
///
/// Resolver-callback results are wrapped in this so they flow through the
/// same [`TreeValue`] channel as tree lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringValue(pub String);

impl TreeValue for StringValue {
    fn to_string_value(&self, _opts: &Options<'_>) -> Result<String, EvalError> {
        Ok(self.0.clone())
    }
}

/// An external resolver callback: given the string form of a path, produce
/// a value for it or fail.
pub type ResolverFn = dyn Fn(&str) -> Result<String, EvalError>;

/// Lookup options threaded through expansion.
///
/// Carries the path separator, the fallback roots (searched last-first after
/// the primary tree), the resolver callbacks (called last-first after all
/// trees), and the reentrancy depth counter.
pub struct Options<'a> {
    path_sep: String,
    roots: Vec<&'a dyn Node>,
    resolvers: Vec<Box<ResolverFn>>,
    depth: Cell<usize>,
}

impl<'a> Options<'a> {
    /// Options with the default `.` path separator and no fallbacks.
    pub fn new() -> Self {
        Self {
            path_sep: ".".to_string(),
            roots: Vec::new(),
            resolvers: Vec::new(),
            depth: Cell::new(0),
        }
    }

    /// Replace the path separator.
    pub fn with_path_sep(mut self, sep: impl Into<String>) -> Self {
        self.path_sep = sep.into();
        self
    }

    /// Register a fallback root. Later registrations are searched first.
    pub fn push_fallback_root(&mut self, root: &'a dyn Node) {
        self.roots.push(root);
    }

    /// Register a resolver callback. Later registrations are called first.
    pub fn push_resolver<F>(&mut self, resolver: F)
    where
        F: Fn(&str) -> Result<String, EvalError> + 'static,
    {
        self.resolvers.push(Box::new(resolver));
    }

    /// The separator reference paths are split on.
    pub fn path_sep(&self) -> &str {
        &self.path_sep
    }

    pub(crate) fn fallback_roots(&self) -> &[&'a dyn Node] {
        &self.roots
    }

    pub(crate) fn resolvers(&self) -> &[Box<ResolverFn>] {
        &self.resolvers
    }

    /// Enter one level of expansion, failing past [`MAX_EXPAND_DEPTH`].
    ///
    /// The guard leaves the level again on drop. Reentrant `expand` calls
    /// made by collaborators share this counter because they share the
    /// options bundle.
    pub fn enter(&self) -> Result<DepthGuard<'_>, EvalError> {
        let depth = self.depth.get();
        if depth >= MAX_EXPAND_DEPTH {
            return Err(EvalError::RecursionLimit(MAX_EXPAND_DEPTH));
        }
        self.depth.set(depth + 1);
        Ok(DepthGuard { depth: &self.depth })
    }
}

impl Default for Options<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Options<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("path_sep", &self.path_sep)
            .field("fallback_roots", &self.roots.len())
            .field("resolvers", &self.resolvers.len())
            .field("depth", &self.depth.get())
            .finish()
    }
}

/// Active expansion level; decrements the counter when dropped.
pub struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get() - 1);
    }
}
