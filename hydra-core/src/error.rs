//! Error types for the hydra tokenizer, parser and interpreter.

use std::fmt;

// ---------------------------------------------------------------------------
// Error severity
// ---------------------------------------------------------------------------

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational message (usage hints).
    Info,
    /// Warning (execution continues).
    Warning,
    /// Error (the statement is abandoned).
    Error,
    /// Fatal error (execution stops).
    Fatal,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// A diagnostic produced while reading or running a hydra program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydraError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// One-based source line, if known.
    pub line: Option<usize>,
    /// Raw text of that line, if known.
    pub source: Option<String>,
    /// Severity.
    pub severity: Severity,
}

impl HydraError {
    /// Create a new error.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
            source: None,
            severity: Severity::Error,
        }
    }

    /// Create an informational diagnostic.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Note, message).with_severity(Severity::Info)
    }

    /// Attach a source line number.
    #[must_use]
    pub const fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Attach the raw text of the source line.
    #[must_use]
    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source = Some(text.into());
        self
    }

    /// Set severity.
    #[must_use]
    pub const fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Fill in the location unless the error already has one.
    #[must_use]
    pub fn located(mut self, line: Option<usize>, text: Option<&str>) -> Self {
        if self.line.is_none() {
            self.line = line;
            self.source = text.map(str::to_owned);
        }
        self
    }

    /// Whether this diagnostic aborts the statement it belongs to.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error | Severity::Fatal)
    }
}

impl fmt::Display for HydraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, &self.source) {
            (Some(line), Some(text)) => {
                write!(f, "Error in line {line}: '{text}'.\n> {}", self.message)
            }
            (Some(line), None) => write!(f, "Error in line {line}: {}", self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for HydraError {}

// ---------------------------------------------------------------------------
// Error kinds
// ---------------------------------------------------------------------------

/// Categories of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    // -- Lexical errors --
    /// `(` or `[` without its partner, or a stray `)` / `]`.
    UnbalancedBracket,
    /// `"` without a closing quote.
    UnterminatedString,
    /// `\()` with nothing inside.
    EmptyEscape,

    // -- Syntax errors --
    /// A statement whose tokens do not form any construct.
    InvalidSyntax,
    /// A malformed argument list.
    InvalidArguments,
    /// A malformed loop header or misplaced brace.
    InvalidLoop,

    // -- Structural errors --
    /// A loop that was never closed, or a `}` without a loop.
    UnbalancedLoop,

    // -- Semantic / runtime errors --
    /// A variable declared twice in one scope.
    Redefinition,
    /// Use of, or assignment to, an undeclared variable.
    UndefinedVariable,
    /// Assignment to a reserved `_` name.
    ReservedName,
    /// A right-hand side or argument that produced no value.
    NoValue,
    /// A value of the wrong type.
    TypeError,
    /// A function or initializer without a definition.
    UnknownFunction,
    /// An argument outside the allowed range.
    InvalidArgument,
    /// Division by zero or a numerically undefined result.
    ArithmeticError,
    /// Reading or writing a file failed.
    IoError,

    // -- Diagnostics --
    /// An informational note attached to another diagnostic.
    Note,
    /// Internal error (should not happen).
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnbalancedBracket => write!(f, "unbalanced bracket"),
            Self::UnterminatedString => write!(f, "unterminated string"),
            Self::EmptyEscape => write!(f, "empty escape sequence"),
            Self::InvalidSyntax => write!(f, "invalid syntax"),
            Self::InvalidArguments => write!(f, "invalid arguments"),
            Self::InvalidLoop => write!(f, "invalid loop"),
            Self::UnbalancedLoop => write!(f, "unbalanced loop"),
            Self::Redefinition => write!(f, "redefinition"),
            Self::UndefinedVariable => write!(f, "undefined variable"),
            Self::ReservedName => write!(f, "reserved name"),
            Self::NoValue => write!(f, "no value"),
            Self::TypeError => write!(f, "type error"),
            Self::UnknownFunction => write!(f, "unknown function"),
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::ArithmeticError => write!(f, "arithmetic error"),
            Self::IoError => write!(f, "I/O error"),
            Self::Note => write!(f, "note"),
            Self::Internal => write!(f, "internal error"),
        }
    }
}

/// Convenience type alias for results using [`HydraError`].
pub type InterpResult<T> = Result<T, HydraError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_line_and_source() {
        let err = HydraError::new(ErrorKind::Redefinition, "Redefinition of 'a'.")
            .with_line(3)
            .with_source("var a = 1.0");
        assert_eq!(
            err.to_string(),
            "Error in line 3: 'var a = 1.0'.\n> Redefinition of 'a'."
        );
    }

    #[test]
    fn display_with_line_only() {
        let err = HydraError::new(ErrorKind::UnbalancedLoop, "Loop never closed.").with_line(7);
        assert_eq!(err.to_string(), "Error in line 7: Loop never closed.");
    }

    #[test]
    fn display_without_location() {
        let err = HydraError::new(ErrorKind::ArithmeticError, "Division by zero.");
        let s = format!("{err}");
        assert!(!s.contains("line"), "should not have location: {s}");
        assert_eq!(s, "Division by zero.");
    }

    #[test]
    fn located_keeps_existing_location() {
        let err = HydraError::new(ErrorKind::TypeError, "bad")
            .with_line(2)
            .located(Some(9), Some("x"));
        assert_eq!(err.line, Some(2));
        assert_eq!(err.source, None);

        let fresh = HydraError::new(ErrorKind::TypeError, "bad").located(Some(9), Some("x"));
        assert_eq!(fresh.line, Some(9));
        assert_eq!(fresh.source.as_deref(), Some("x"));
    }

    #[test]
    fn info_is_not_an_error() {
        let note = HydraError::info("Usage of 'sin': sin(x)");
        assert_eq!(note.severity, Severity::Info);
        assert!(!note.is_error());
        assert!(HydraError::new(ErrorKind::Internal, "x").is_error());
    }
}
