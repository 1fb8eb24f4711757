//! Expression evaluation.
//!
//! Reduces an [`Expr`] to a string against a configuration node and the
//! lookup options. Evaluation is a pure read: the tree is never mutated and
//! separate evaluations are independent.
//!
//! The `:` and `:+` operators deliberately swallow left-side failures; that
//! is their contract, not generic error recovery. Everything else
//! short-circuits on the first failure.

use thiserror::Error;

use crate::ast::{Expr, ExpansionOp, RefPath};
use crate::resolve::resolve;
use crate::tree::{Node, Options};

/// Errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The path was not found in any tree or resolver.
    #[error("missing configuration value: {0}")]
    Missing(String),
    /// The reference evaluated but yielded no value at all.
    #[error("can not resolve reference: {0}")]
    UnresolvedReference(String),
    /// A value was found but has no string representation.
    #[error("can not represent {0} as a string")]
    Conversion(String),
    /// Raised by the `:?` operator with the caller-supplied message.
    #[error("{0}")]
    User(String),
    /// Expansion reentered itself past the depth limit.
    #[error("expansion recursed past depth limit ({0})")]
    RecursionLimit(usize),
}

impl Expr {
    /// Evaluate this expression to a string.
    pub fn eval(&self, node: Option<&dyn Node>, opts: &Options<'_>) -> Result<String, EvalError> {
        match self {
            Expr::Literal(text) => Ok(text.clone()),
            Expr::Reference(path) => eval_reference(path, node, opts),
            Expr::Concat(pieces) => {
                let mut out = String::new();
                for piece in pieces {
                    out.push_str(&piece.eval(node, opts)?);
                }
                Ok(out)
            }
            Expr::Expansion { left, op } => eval_expansion(left, op, node, opts),
        }
    }
}

/// Resolve a reference and render its value.
fn eval_reference(
    path: &RefPath,
    node: Option<&dyn Node>,
    opts: &Options<'_>,
) -> Result<String, EvalError> {
    match resolve(path, node, opts)? {
        Some(value) => value.to_string_value(opts),
        None => Err(EvalError::UnresolvedReference(path.to_string())),
    }
}

fn eval_expansion(
    left: &Expr,
    op: &ExpansionOp,
    node: Option<&dyn Node>,
    opts: &Options<'_>,
) -> Result<String, EvalError> {
    match op {
        // ${path} with a computed path: failures propagate as-is.
        ExpansionOp::Computed => {
            let raw = left.eval(node, opts)?;
            eval_reference(&RefPath::parse(&raw, opts.path_sep()), node, opts)
        }

        // ${path:default}: the default masks a failing or empty left side
        // and a failing or empty reference.
        ExpansionOp::Default(right) => {
            let raw = match left.eval(node, opts) {
                Ok(raw) if !raw.is_empty() => raw,
                _ => return right.eval(node, opts),
            };
            match eval_reference(&RefPath::parse(&raw, opts.path_sep()), node, opts) {
                Ok(value) if !value.is_empty() => Ok(value),
                _ => right.eval(node, opts),
            }
        }

        // ${path:+alt}: empty string unless the reference resolves to some
        // value; the value itself is discarded, the right side substitutes.
        ExpansionOp::Alternative(right) => {
            let raw = match left.eval(node, opts) {
                Ok(raw) if !raw.is_empty() => raw,
                _ => return Ok(String::new()),
            };
            match resolve(&RefPath::parse(&raw, opts.path_sep()), node, opts) {
                Ok(Some(_)) => right.eval(node, opts),
                _ => Ok(String::new()),
            }
        }

        // ${path:?message}: pass the value through when present and
        // non-empty, otherwise fail with the evaluated message.
        ExpansionOp::Error(right) => {
            if let Ok(raw) = left.eval(node, opts) {
                if !raw.is_empty() {
                    if let Ok(value) =
                        eval_reference(&RefPath::parse(&raw, opts.path_sep()), node, opts)
                    {
                        if !value.is_empty() {
                            return Ok(value);
                        }
                    }
                }
            }
            let message = right.eval(node, opts)?;
            Err(EvalError::User(message))
        }
    }
}
