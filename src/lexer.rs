//! Lexer for `${...}` variable expansions.
//!
//! Scans raw input text into a stream of tokens: open-brace, close-brace,
//! separator, and literal text. Tokens are produced lazily, one `next()` at
//! a time, so callers never materialize the full sequence unless they want to.
//!
//! The trigger set is depth-sensitive: outside an expansion only `$` is
//! special; inside one, `:` and `}` become special too. `$$` collapses to a
//! single literal `$` without opening an expansion.
//!
//! Lexing cannot fail. A trailing lone `$` or `:` degrades to literal text,
//! and an unmatched `${` is detected later by the parser via leftover stack
//! depth, not here.

use std::collections::VecDeque;
use std::mem;

/// Separator operators recognized inside an expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `:` — default value if the reference is missing or empty.
    Default,
    /// `:+` — alternative value if the reference is present.
    Alternative,
    /// `:?` — fail with a message if the reference is missing or empty.
    Error,
}

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `${` — opens an expansion.
    Open,
    /// `}` — closes the innermost open expansion.
    Close,
    /// `:`, `:+`, or `:?` inside an expansion.
    Sep(Separator),
    /// A run of plain text.
    Literal(String),
}

/// Streaming lexer over an input string.
///
/// Implements `Iterator<Item = Token>`; the sequence is finite and bounded
/// by the input length.
#[derive(Debug)]
pub struct Lexer<'a> {
    /// Unscanned remainder of the input.
    rest: &'a str,
    /// Literal text accumulated but not yet emitted. Non-contiguous with
    /// `rest` once a `$$` has been collapsed, hence owned.
    pending: String,
    /// Count of unmatched `${`.
    depth: usize,
    /// Tokens ready to hand out (a single step can produce two).
    queue: VecDeque<Token>,
    done: bool,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            rest: input,
            pending: String::new(),
            depth: 0,
            queue: VecDeque::new(),
            done: false,
        }
    }

    /// Emit `before` plus any pending text as a `Literal` token, if non-empty.
    fn flush_literal(&mut self, before: &str) {
        self.pending.push_str(before);
        if !self.pending.is_empty() {
            self.queue.push_back(Token::Literal(mem::take(&mut self.pending)));
        }
    }

    /// Stop scanning and flush whatever text remains as a trailing literal.
    fn finish(&mut self) {
        self.pending.push_str(self.rest);
        self.rest = "";
        self.done = true;
        if !self.pending.is_empty() {
            self.queue.push_back(Token::Literal(mem::take(&mut self.pending)));
        }
    }

    /// Scan up to the next trigger character and queue the tokens it yields.
    fn step(&mut self) {
        let trigger = if self.depth == 0 {
            self.rest.find('$')
        } else {
            self.rest.find(['$', ':', '}'])
        };

        let Some(idx) = trigger else {
            self.finish();
            return;
        };

        let (before, at) = self.rest.split_at(idx);
        match at.as_bytes()[0] {
            b':' => {
                // ':' with nothing after it: trailing text stays literal.
                if at.len() == 1 {
                    self.finish();
                    return;
                }
                self.flush_literal(before);
                match at.as_bytes()[1] {
                    b'+' => {
                        self.queue.push_back(Token::Sep(Separator::Alternative));
                        self.rest = &at[2..];
                    }
                    b'?' => {
                        self.queue.push_back(Token::Sep(Separator::Error));
                        self.rest = &at[2..];
                    }
                    _ => {
                        self.queue.push_back(Token::Sep(Separator::Default));
                        self.rest = &at[1..];
                    }
                }
            }
            b'}' => {
                self.flush_literal(before);
                self.queue.push_back(Token::Close);
                self.depth -= 1;
                self.rest = &at[1..];
            }
            b'$' => match at.as_bytes().get(1) {
                // '$' at end of input: trailing text stays literal.
                None => self.finish(),
                // '$$' escapes a literal dollar: keep one, drop the other.
                Some(b'$') => {
                    self.pending.push_str(before);
                    self.pending.push('$');
                    self.rest = &at[2..];
                }
                Some(b'{') => {
                    self.flush_literal(before);
                    self.queue.push_back(Token::Open);
                    self.depth += 1;
                    self.rest = &at[2..];
                }
                // '$' followed by an ordinary character: the scan consumes
                // the text up to and including the '$' without emitting it.
                Some(_) => {
                    self.pending.clear();
                    self.rest = &at[1..];
                }
            },
            _ => unreachable!("find() only matches trigger characters"),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(tok) = self.queue.pop_front() {
                return Some(tok);
            }
            if self.done {
                return None;
            }
            self.step();
        }
    }
}
