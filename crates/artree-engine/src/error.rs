//! Error types for the evaluation engine.

use artree_lang::LangError;
use thiserror::Error;

/// Result type alias for engine operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors produced while evaluating a snippet under a deadline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The snippet failed to parse or evaluate.
    #[error(transparent)]
    Lang(#[from] LangError),

    /// The deadline elapsed before the evaluation finished.
    #[error("evaluation deadline exceeded")]
    DeadlineExceeded,

    /// The evaluation unit faulted (panicked) and was recovered.
    #[error("evaluation fault: {0}")]
    Fault(String),

    /// The snippet's final value was not numeric.
    #[error("snippet returned a non-numeric value: {0}")]
    ReturnType(String),
}

impl EvalError {
    /// Whether this error came from parsing, as opposed to evaluation.
    pub fn is_parse(&self) -> bool {
        matches!(self, EvalError::Lang(LangError::Parse { .. }))
    }
}
