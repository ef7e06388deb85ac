//! Error types for evaluation.
//!
//! `EvalErrorKind` carries the structured category; `EvalError` adds the
//! source position. Factory functions (e.g. `undefined_variable()`) are the
//! preferred way to build errors so the message text stays in one place.

use lox_ir::{Span, Token};
use thiserror::Error;

use crate::value::Value;

/// Result of evaluation. Defaults to producing a `Value`.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    /// A name was read or assigned but no scope on the chain binds it.
    #[error("Undefined variable '{name}'.")]
    UndefinedVariable { name: String },

    /// Catch-all for evaluator errors without a structured kind.
    #[error("{message}")]
    Custom { message: String },
}

/// Runtime error with the position of the token that caused it.
///
/// Displays in the Lox runtime error format: the message, a newline, and
/// `[line N]`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}\n[line {line}]")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// 1-based line of the offending token.
    pub line: u32,
    pub span: Span,
}

impl EvalError {
    /// Create an uncategorized error positioned at `token`.
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        EvalError::at(
            EvalErrorKind::Custom {
                message: message.into(),
            },
            token,
        )
    }

    /// Create an error of `kind` positioned at `token`.
    pub fn at(kind: EvalErrorKind, token: &Token) -> Self {
        EvalError {
            kind,
            line: token.line,
            span: token.span,
        }
    }
}

/// Lookup or assignment of a name that no scope defines.
#[cold]
pub fn undefined_variable(token: &Token) -> EvalError {
    EvalError::at(
        EvalErrorKind::UndefinedVariable {
            name: token.lexeme.clone(),
        },
        token,
    )
}
