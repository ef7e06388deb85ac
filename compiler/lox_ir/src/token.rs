//! Identifier tokens as seen by the runtime.
//!
//! The lexer owns the full token vocabulary. The runtime only ever needs
//! the text of a name and where it came from, so that is all this carries.

use super::Span;
use std::fmt;

/// An identifier occurrence in the source.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Token {
    /// The identifier text exactly as written.
    pub lexeme: String,
    /// 1-based source line.
    pub line: u32,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(lexeme: impl Into<String>, line: u32, span: Span) -> Self {
        Token {
            lexeme: lexeme.into(),
            line,
            span,
        }
    }

    /// Create an identifier token with no byte span, for generated code and tests.
    pub fn identifier(lexeme: impl Into<String>, line: u32) -> Self {
        Token::new(lexeme, line, Span::DUMMY)
    }

    #[inline]
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ line {} ({})", self.lexeme, self.line, self.span)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lexeme)
    }
}
