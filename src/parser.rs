//! Parser for variable-expansion token streams.
//!
//! Consumes tokens from the lexer with an explicit stack of frames, one per
//! open `${...}` plus an implicit root frame, and produces a single [`Expr`].
//! The reified stack keeps parser state inspectable and bounds depth by the
//! input's nesting depth rather than call depth.

use thiserror::Error;

use crate::ast::{Expr, ExpansionOp, RefPath};
use crate::lexer::{Separator, Token};

/// Errors the parser can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A separator outside any expansion, or a second one inside the same.
    #[error("unexpected ':' separator")]
    UnexpectedSeparator,
    /// `${}` or `${:...}` — an expansion with nothing on its left side.
    #[error("empty expansion")]
    EmptyExpansion,
    /// A close token with no matching open.
    #[error("unmatched '}}'")]
    UnmatchedClose,
    /// End of input with a `${` still open.
    #[error("unterminated expansion, missing '}}'")]
    UnterminatedExpansion,
}

/// Which side of the separator a frame is collecting pieces for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Parse state for one open `${...}` (or the root).
#[derive(Debug)]
struct Frame {
    side: Side,
    /// False only for the implicit root frame.
    is_expansion: bool,
    /// The separator seen, once `side` has switched to `Right`.
    op: Option<Separator>,
    left: Vec<Expr>,
    right: Vec<Expr>,
}

impl Frame {
    fn root() -> Self {
        Self {
            side: Side::Left,
            is_expansion: false,
            op: None,
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    fn expansion() -> Self {
        Self {
            is_expansion: true,
            ..Self::root()
        }
    }

    fn active_mut(&mut self) -> &mut Vec<Expr> {
        match self.side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Reduce a popped expansion frame to a single node.
    fn finalize(self, path_sep: &str) -> Result<Expr, ParseError> {
        if self.left.is_empty() {
            return Err(ParseError::EmptyExpansion);
        }

        if self.side == Side::Left {
            // No separator seen. A lone literal is the common static-path
            // case; anything else means the path is computed at eval time.
            if self.left.len() == 1 {
                if let Expr::Literal(text) = &self.left[0] {
                    return Ok(Expr::Reference(RefPath::parse(text, path_sep)));
                }
            }
            return Ok(Expr::Expansion {
                left: Box::new(collapse(self.left)),
                op: ExpansionOp::Computed,
            });
        }

        let sep = self.op.expect("side is Right only after a separator");
        let right = Box::new(collapse(self.right));
        let op = match sep {
            Separator::Default => ExpansionOp::Default(right),
            Separator::Alternative => ExpansionOp::Alternative(right),
            Separator::Error => ExpansionOp::Error(right),
        };
        Ok(Expr::Expansion {
            left: Box::new(collapse(self.left)),
            op,
        })
    }
}

/// Collapse a piece sequence into one node.
fn collapse(mut pieces: Vec<Expr>) -> Expr {
    match pieces.len() {
        0 => Expr::Literal(String::new()),
        1 => pieces.remove(0),
        _ => Expr::Concat(pieces),
    }
}

/// Parse a token stream into a single expression.
///
/// `path_sep` is the separator static reference paths are split on.
pub fn parse<I>(tokens: I, path_sep: &str) -> Result<Expr, ParseError>
where
    I: IntoIterator<Item = Token>,
{
    let mut stack = vec![Frame::root()];

    for token in tokens {
        match token {
            Token::Open => stack.push(Frame::expansion()),
            Token::Literal(text) => {
                top(&mut stack).active_mut().push(Expr::Literal(text));
            }
            Token::Sep(sep) => {
                let frame = top(&mut stack);
                if !frame.is_expansion || frame.side == Side::Right {
                    return Err(ParseError::UnexpectedSeparator);
                }
                frame.side = Side::Right;
                frame.op = Some(sep);
            }
            Token::Close => {
                if stack.len() == 1 {
                    return Err(ParseError::UnmatchedClose);
                }
                let frame = stack.pop().expect("stack length checked above");
                let piece = frame.finalize(path_sep)?;
                top(&mut stack).active_mut().push(piece);
            }
        }
    }

    if stack.len() > 1 {
        return Err(ParseError::UnterminatedExpansion);
    }
    let root = stack.pop().expect("root frame is never popped");
    Ok(collapse(root.left))
}

fn top(stack: &mut [Frame]) -> &mut Frame {
    stack.last_mut().expect("root frame is never popped")
}
