//! Lox IR - source-level types shared across the interpreter.
//!
//! This crate holds the pieces of the front end that the runtime needs to
//! report errors:
//! - `Span` for byte ranges in the source
//! - `Token` for identifier occurrences (lexeme plus position)

mod span;
mod token;

pub use span::Span;
pub use token::Token;
