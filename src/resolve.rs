//! Reference resolution against trees and resolver callbacks.
//!
//! Search order: the primary tree's root ancestor first, then each fallback
//! root most-recently-registered first, then resolver callbacks
//! most-recently-registered first. The order decides precedence when a key
//! is answerable through more than one channel.

use tracing::trace;

use crate::ast::RefPath;
use crate::eval::EvalError;
use crate::tree::{Node, Options, StringValue, TreeValue};

/// Walk parent links up to the tree root.
fn root_ancestor<'a>(mut node: &'a dyn Node) -> &'a dyn Node {
    while let Some(parent) = node.parent() {
        node = parent;
    }
    node
}

/// Resolve `path` to a value, or `Ok(None)` when a tree reported the key as
/// present with no value and no callback answered.
pub fn resolve(
    path: &RefPath,
    node: Option<&dyn Node>,
    opts: &Options<'_>,
) -> Result<Option<Box<dyn TreeValue>>, EvalError> {
    let fallbacks = opts.fallback_roots();
    let mut remaining = fallbacks.len();
    let mut current = node;

    // Tree tier: primary root, then fallback roots last-first.
    let mut last_err = loop {
        let Some(cfg) = current else {
            return Err(EvalError::Missing(path.to_string()));
        };
        match root_ancestor(cfg).lookup(path, opts) {
            Ok(Some(value)) => return Ok(Some(value)),
            // Present key with no value: stop searching trees.
            Ok(None) => break None,
            Err(err) => {
                if remaining == 0 {
                    break Some(err);
                }
                remaining -= 1;
                current = Some(fallbacks[remaining]);
                trace!(path = %path, "lookup missed, trying fallback root");
            }
        }
    };

    // Callback tier, in reverse registration order.
    let key = path.to_string();
    for resolver in opts.resolvers().iter().rev() {
        match resolver(&key) {
            Ok(value) => {
                trace!(path = %key, "resolved via callback");
                return Ok(Some(Box::new(StringValue(value))));
            }
            Err(err) => last_err = Some(err),
        }
    }

    match last_err {
        Some(err) => Err(err),
        None => Ok(None),
    }
}
