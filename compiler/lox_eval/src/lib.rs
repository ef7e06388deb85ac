//! Lox Eval - variable environment for the Lox tree-walking interpreter.
//!
//! # Architecture
//!
//! - `Scope`: bindings for one lexical region plus a handle to its parent
//! - `ScopeRef`: shared handle to a scope (`Rc<RefCell<Scope>>`), what
//!   closures capture
//! - `Environment`: stack of active scopes the evaluator pushes and pops
//! - `ScopedEnvironment`: guard that pops a pushed scope on drop
//!
//! `define` always binds in the current scope. `get` and `assign` resolve
//! to the nearest scope on the chain that already binds the name, and fail
//! with `UndefinedVariable` when none does.
//!
//! # Re-exports
//!
//! `Value`, `EvalError`, `EvalErrorKind` and `EvalResult` come from
//! `lox_value`; `Token` from `lox_ir`.

mod environment;
mod scope_guard;
mod tracing_setup;

pub use environment::{Environment, LocalScope, Scope, ScopeRef};
pub use scope_guard::ScopedEnvironment;
pub use tracing_setup::init_tracing;

pub use lox_ir::{Span, Token};
pub use lox_value::{undefined_variable, EvalError, EvalErrorKind, EvalResult, Value};
