//! Error types for filter compilation.

use crate::value::Affinity;
use thiserror::Error;

/// Class of a compilation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Type,
}

/// Errors that can occur while compiling a filter expression.
///
/// Every variant points at the offending token and its character offset in
/// the filter text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Unrecognized character sequence for its token class
    #[error("Lexical error at position {position} '{token}': {reason}")]
    Lexical {
        token: String,
        position: usize,
        reason: String,
    },

    /// Structural problem: missing operand, bad terminator, wrong arity
    #[error("Syntax error at position {position} '{token}': {reason}")]
    Syntax {
        token: String,
        position: usize,
        reason: String,
    },

    /// Affinity conflict or a literal that does not convert
    #[error("Type error at position {position} '{token}': {reason}")]
    Type {
        token: String,
        position: usize,
        reason: String,
    },
}

impl ParseError {
    pub fn lexical(token: impl Into<String>, position: usize, reason: impl Into<String>) -> Self {
        ParseError::Lexical {
            token: token.into(),
            position,
            reason: reason.into(),
        }
    }

    pub fn syntax(token: impl Into<String>, position: usize, reason: impl Into<String>) -> Self {
        ParseError::Syntax {
            token: token.into(),
            position,
            reason: reason.into(),
        }
    }

    pub fn type_error(token: impl Into<String>, position: usize, reason: impl Into<String>) -> Self {
        ParseError::Type {
            token: token.into(),
            position,
            reason: reason.into(),
        }
    }

    /// A node whose affinity is already fixed was asked to become something else
    pub fn affinity_conflict(
        token: impl Into<String>,
        position: usize,
        expected: Affinity,
        current: Affinity,
    ) -> Self {
        Self::type_error(
            token,
            position,
            format!(
                "Expecting a '{}' but current operator is a '{}'",
                expected, current
            ),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Lexical { .. } => ErrorKind::Lexical,
            ParseError::Syntax { .. } => ErrorKind::Syntax,
            ParseError::Type { .. } => ErrorKind::Type,
        }
    }

    pub fn token(&self) -> &str {
        match self {
            ParseError::Lexical { token, .. }
            | ParseError::Syntax { token, .. }
            | ParseError::Type { token, .. } => token,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            ParseError::Lexical { position, .. }
            | ParseError::Syntax { position, .. }
            | ParseError::Type { position, .. } => *position,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            ParseError::Lexical { reason, .. }
            | ParseError::Syntax { reason, .. }
            | ParseError::Type { reason, .. } => reason,
        }
    }
}

/// Result type for filter compilation
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParseError::lexical("=>", 4, "Unknown operator");
        assert_eq!(
            err.to_string(),
            "Lexical error at position 4 '=>': Unknown operator"
        );

        let err = ParseError::syntax("and", 0, "Left hand side of operator is empty");
        assert_eq!(
            err.to_string(),
            "Syntax error at position 0 'and': Left hand side of operator is empty"
        );

        let err = ParseError::affinity_conflict("x", 2, Affinity::Boolean, Affinity::Double);
        assert_eq!(
            err.to_string(),
            "Type error at position 2 'x': Expecting a 'BOOLEAN' but current operator is a 'DOUBLE'"
        );
    }

    #[test]
    fn test_accessors() {
        let err = ParseError::type_error("abc", 7, "Cannot convert");
        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(err.token(), "abc");
        assert_eq!(err.position(), 7);
        assert_eq!(err.reason(), "Cannot convert");
    }
}
