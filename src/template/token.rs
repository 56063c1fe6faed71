//! Source position of a lexed template token

use std::fmt;

/// A token as handed over by the lexer
///
/// Only the position is of interest to the scope layer; the token value is
/// kept so diagnostics can point at the offending text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// File the token was read from
    pub filename: String,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Raw token text
    pub value: String,
}

impl Token {
    /// Create a token at the given position
    pub fn new(filename: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            filename: filename.into(),
            line,
            column,
            value: String::new(),
        }
    }

    /// Attach the raw token text
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)?;
        if !self.value.is_empty() {
            write!(f, " near '{}'", self.value)?;
        }
        Ok(())
    }
}
