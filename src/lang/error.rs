//! Syntax errors produced while lexing and parsing a command line.

use thiserror::Error;

/// A recoverable syntax error.
///
/// Syntax errors are values, not control flow: the parser embeds them in the
/// tree as [`Expr::Error`](super::Expr::Error) and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    /// 1-based column of the offending token.
    pub col: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, col: usize) -> Self {
        Self {
            message: message.into(),
            col,
        }
    }
}
