//! varexp: Shell-style variable expansion for hierarchical configuration.
//!
//! Resolves `${...}` placeholders embedded in configuration values against a
//! key/value tree, an ordered list of fallback root trees, and an ordered
//! list of resolver callbacks. The operators mirror shell parameter
//! expansion:
//!
//! - **`${a.b}`**: substitute the value at path `a.b`
//! - **`${a.b:default}`**: substitute `default` if the path is missing or empty
//! - **`${a.b:+alt}`**: substitute `alt` if the path resolves, `""` otherwise
//! - **`${a.b:?msg}`**: fail with `msg` if the path is missing or empty
//! - **`$$`**: a literal `$`
//!
//! Paths may themselves be computed: `${${which}.host}` first resolves
//! `${which}`, then looks up the resulting path.
//!
//! This crate provides:
//!
//! - **Lexer**: streaming tokenizer for `${...}` syntax ([`lexer`])
//! - **Parser**: frame-stack parser producing an expression tree ([`parser`])
//! - **Evaluator**: the four substitution operators ([`eval`])
//! - **Resolution**: tree walk, fallback roots, resolver callbacks ([`resolve`])
//! - **Seams**: [`Node`] and [`TreeValue`] traits to adapt your own
//!   configuration layer ([`tree`])
//!
//! Everything is synchronous and allocation-light; separate `expand` calls
//! are independent as long as the tree is read-only during evaluation.
//!
//! # Example
//!
//! ```
//! use varexp::testing::{MapNode, TestValue};
//! use varexp::{expand, Options};
//!
//! let mut tree = MapNode::new();
//! tree.set("db.host", TestValue::str("localhost"));
//!
//! let opts = Options::new();
//! let out = expand("postgres://${db.host}:${db.port:5432}", Some(&tree), &opts).unwrap();
//! assert_eq!(out, "postgres://localhost:5432");
//! ```

pub mod ast;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod resolve;
pub mod testing;
pub mod tree;

pub use ast::{Expr, ExpansionOp, RefPath};
pub use eval::EvalError;
pub use lexer::{Lexer, Separator, Token};
pub use parser::{parse, ParseError};
pub use tree::{Node, Options, ResolverFn, StringValue, TreeValue, MAX_EXPAND_DEPTH};

use thiserror::Error;
use tracing::trace;

/// Failure from [`expand`]: either the input did not parse, or an embedded
/// expansion did not evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Expand every `${...}` in `input` against `node` and `opts`.
///
/// `node` may be any node of the primary tree; resolution starts from its
/// root ancestor. Pass `None` to resolve with no primary tree at all (every
/// reference then fails with [`EvalError::Missing`]).
///
/// Reentrant calls through the same `opts` (a tree whose values expand other
/// values) are bounded by [`MAX_EXPAND_DEPTH`].
pub fn expand(
    input: &str,
    node: Option<&dyn Node>,
    opts: &Options<'_>,
) -> Result<String, ExpandError> {
    let _guard = opts.enter().map_err(ExpandError::Eval)?;
    let expr = parser::parse(Lexer::new(input), opts.path_sep())?;
    trace!(input, "expanding");
    Ok(expr.eval(node, opts)?)
}
