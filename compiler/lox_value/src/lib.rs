//! Lox Value - runtime values and the evaluation error type.
//!
//! Both the scope chain and the evaluator build on these types, so they
//! live below either of them. `EvalError` is the one error type for runtime
//! failures: the environment raises `UndefinedVariable` through it and the
//! evaluator reuses it for everything else.

pub mod errors;
mod value;

pub use errors::{undefined_variable, EvalError, EvalErrorKind, EvalResult};
pub use value::Value;
