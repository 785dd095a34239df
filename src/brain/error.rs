//! Errors reported by the evaluator.

use thiserror::Error;

use crate::lang::{Identifier, SyntaxError};

/// A statement-level failure. Each one aborts only the statement that
/// raised it; `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BrainError {
    #[error("{0}")]
    Syntax(#[from] SyntaxError),
    #[error("unrecognized command")]
    Unrecognized,
    #[error("unknown variable '{0}'")]
    UnknownVariable(Identifier),
    /// Carries the textual form of the expression.
    #[error("could not evaluate {0} to literal")]
    NotALiteral(String),
    #[error("evaluation of '{name}' exceeded depth {limit}")]
    DepthExceeded { name: Identifier, limit: usize },
    #[error("variable '{0}' refers to itself")]
    Cycle(Identifier),
    #[error("statement exceeded {limit} evaluation steps")]
    StepLimit { limit: usize },
}
