//! Compiler error types.
//!
//! A hand-rolled enum rather than a macro-derived one: the taxonomy is
//! small and fixed (lexical / syntax / semantic / I/O), and each variant
//! needs its own fields rather than a uniform wrapper.

use std::fmt;

#[derive(Debug)]
pub enum CompileError {
    /// Unterminated string/comment, out-of-range integer, stray byte.
    Lexical {
        message: String,
        line: usize,
        column: usize,
    },
    /// Token kind/value mismatch against the grammar.
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },
    /// Identifier used before it was defined, or redefined in the same scope.
    Semantic {
        message: String,
        line: usize,
        column: usize,
    },
    /// Could not open input or output.
    Io(std::io::Error),
}

impl CompileError {
    pub fn lexical(message: impl Into<String>, line: usize, column: usize) -> Self {
        CompileError::Lexical {
            message: message.into(),
            line,
            column,
        }
    }

    pub fn syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        CompileError::Syntax {
            message: message.into(),
            line,
            column,
        }
    }

    pub fn semantic(message: impl Into<String>, line: usize, column: usize) -> Self {
        CompileError::Semantic {
            message: message.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Lexical {
                message,
                line,
                column,
            } => write!(f, "lexical error at {line}:{column}: {message}"),
            CompileError::Syntax {
                message,
                line,
                column,
            } => write!(f, "syntax error at {line}:{column}: {message}"),
            CompileError::Semantic {
                message,
                line,
                column,
            } => write!(f, "semantic error at {line}:{column}: {message}"),
            CompileError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CompileError {
    fn from(e: std::io::Error) -> Self {
        CompileError::Io(e)
    }
}
