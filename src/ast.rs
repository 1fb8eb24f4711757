//! Expression tree for variable expansion.
//!
//! The parser reduces a token stream to a single [`Expr`]. The variant set is
//! closed: constant text, a reference into the configuration tree, a
//! concatenation of pieces, and the `${...}` expansion construct itself.
//! Trees are built once per input and never mutated; evaluation is a pure
//! read.

use std::fmt;

/// A dotted lookup path into the configuration tree.
///
/// Splitting happens when the path is built: at parse time for static paths
/// (`${a.b}`) and at evaluation time for computed ones. The separator is kept
/// so the path can render itself back and serve as a resolver-callback key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefPath {
    segments: Vec<String>,
    sep: String,
}

impl RefPath {
    /// Split `raw` on `sep` into path segments.
    pub fn parse(raw: &str, sep: &str) -> Self {
        Self {
            segments: raw.split(sep).map(str::to_string).collect(),
            sep: sep.to_string(),
        }
    }

    /// The path segments, in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The separator this path was split on.
    pub fn sep(&self) -> &str {
        &self.sep
    }
}

impl fmt::Display for RefPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join(&self.sep))
    }
}

/// An evaluable expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constant text. Evaluates to itself, never fails.
    Literal(String),
    /// A static reference to a configuration path.
    Reference(RefPath),
    /// Ordered pieces concatenated in order; fails on the first failing piece.
    ///
    /// The parser never builds this with fewer than two pieces.
    Concat(Vec<Expr>),
    /// A `${left}` / `${left<op>right}` substitution.
    Expansion { left: Box<Expr>, op: ExpansionOp },
}

/// The operator of an [`Expr::Expansion`], carrying its right side.
///
/// Encoding the right side in the operator makes the invariant structural:
/// a computed reference has no right side, the three separator operators
/// always have one.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpansionOp {
    /// `${left}` where the path itself is computed at evaluation time.
    Computed,
    /// `${left:right}` — use `right` if the reference is missing or empty.
    Default(Box<Expr>),
    /// `${left:+right}` — use `right` if the reference resolves at all,
    /// empty string otherwise.
    Alternative(Box<Expr>),
    /// `${left:?right}` — fail with `right` as the message if the reference
    /// is missing or empty.
    Error(Box<Expr>),
}

impl ExpansionOp {
    /// The separator spelling of this operator, empty for computed paths.
    fn symbol(&self) -> &'static str {
        match self {
            ExpansionOp::Computed => "",
            ExpansionOp::Default(_) => ":",
            ExpansionOp::Alternative(_) => ":+",
            ExpansionOp::Error(_) => ":?",
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(s) => f.write_str(s),
            Expr::Reference(path) => write!(f, "${{{path}}}"),
            Expr::Concat(pieces) => {
                for piece in pieces {
                    write!(f, "{piece}")?;
                }
                Ok(())
            }
            Expr::Expansion { left, op } => match op {
                ExpansionOp::Computed => write!(f, "${{{left}}}"),
                ExpansionOp::Default(right)
                | ExpansionOp::Alternative(right)
                | ExpansionOp::Error(right) => {
                    write!(f, "${{{left}{}{right}}}", op.symbol())
                }
            },
        }
    }
}
