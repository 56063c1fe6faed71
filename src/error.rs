//! Error types for scope construction and template execution

use crate::template::{Template, Token};
use std::fmt;
use std::sync::Arc;

/// Result type for scope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Stage of the engine that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    /// Identifier validation while loading user data
    Validation,
    /// Template execution (tags, filters, variable resolution)
    Execution,
}

impl Sender {
    /// Fixed tag identifying the sender
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::Validation => "check_identifiers",
            Sender::Execution => "execution",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Underlying reason for an [`Error`]
#[derive(thiserror::Error, Debug)]
pub enum ErrorCause {
    /// A context key is not made of `[A-Za-z0-9_]`
    #[error("context-key '{0}' is not a valid identifier")]
    InvalidIdentifier(String),

    /// Free-form message supplied by tag or filter code
    #[error("{0}")]
    Message(String),

    /// Macro invocations nested deeper than the configured limit
    #[error("maximum recursive macro call depth reached (max is {limit})")]
    MacroDepthExceeded {
        /// Configured limit
        limit: usize,
    },

    /// User data could not be turned into a context
    #[error("context data must serialize to a map, got {0}")]
    NotAMap(&'static str),

    /// Any other failure wrapped by the reporter
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Structured error carrying the template and best-effort source location
///
/// Line and column are zero when no token was available. That is a valid
/// state and never a reason to fail on its own. The display form leaves
/// out whatever location parts are unknown:
///
/// ```text
/// [Error (where: execution) in base.html | Line 3 Col 7 near 'user'] message
/// [Error (where: check_identifiers)] context-key 'a-1' is not a valid identifier
/// ```
#[derive(Debug)]
pub struct Error {
    /// Owning template, absent for validation errors
    pub template: Option<Arc<Template>>,
    /// Source file of the token, or the template name
    pub filename: String,
    /// Line number (1-based), zero when unknown
    pub line: usize,
    /// Column number (1-based), zero when unknown
    pub column: usize,
    /// Token the error was raised at
    pub token: Option<Token>,
    /// Stage that raised the error
    pub sender: Sender,
    /// What actually went wrong
    pub cause: ErrorCause,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Error (where: {})", self.sender)?;
        if !self.filename.is_empty() {
            write!(f, " in {}", self.filename)?;
        }
        if self.line > 0 {
            write!(f, " | Line {} Col {}", self.line, self.column)?;
            if let Some(token) = self.token.as_ref().filter(|t| !t.value.is_empty()) {
                write!(f, " near '{}'", token.value)?;
            }
        }
        write!(f, "] {}", self.cause)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

impl Error {
    /// Build a validation-stage error without template or location
    pub fn validation(cause: ErrorCause) -> Self {
        Self {
            template: None,
            filename: String::new(),
            line: 0,
            column: 0,
            token: None,
            sender: Sender::Validation,
            cause,
        }
    }

    /// Check whether a token position is attached
    pub fn has_location(&self) -> bool {
        self.token.is_some()
    }
}
