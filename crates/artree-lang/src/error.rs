//! Error types for parsing and evaluating snippets.

use thiserror::Error;

/// Result type alias for language operations.
pub type LangResult<T> = Result<T, LangError>;

/// Errors produced while parsing or evaluating a snippet.
///
/// Parse failures and evaluation failures are distinct variants so callers
/// can tell a malformed snippet apart from one that failed at runtime.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LangError {
    /// The snippet is not syntactically valid.
    #[error("parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// A symbol was looked up that the scope does not bind.
    #[error("unbound symbol: {0}")]
    UnboundSymbol(String),

    /// A builtin received the wrong number of arguments.
    #[error("{function} expects {expected}, got {got} argument(s)")]
    Arity {
        function: &'static str,
        expected: &'static str,
        got: usize,
    },

    /// A builtin received (or a call produced) a value of the wrong type.
    #[error("{function} cannot operate on {value}")]
    TypeMismatch {
        function: &'static str,
        value: String,
    },

    /// An arithmetic operation has no defined result.
    #[error("arithmetic error in {function}: {message}")]
    Arithmetic {
        function: &'static str,
        message: &'static str,
    },

    /// The evaluation was told to stop before it finished.
    #[error("evaluation interrupted")]
    Interrupted,
}

impl LangError {
    /// Build a parse error at the given byte offset.
    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }
}
