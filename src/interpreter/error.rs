use crate::diagnostic::{Diagnostic, Label, Span};

/// Everything that can go wrong while executing a parsed program. Every
/// variant aborts the run immediately; there is no statement-level
/// recovery.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    UndefinedVariable { name: String, span: Span },
    UndefinedFunction { name: String, span: Span },
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },
    DivisionByZero { span: Span },
    RecursionLimitExceeded { limit: usize, span: Span },
    Cancelled,
}

impl RuntimeError {
    /// Get the span associated with this error
    pub fn span(&self) -> Span {
        match self {
            Self::UndefinedVariable { span, .. } => *span,
            Self::UndefinedFunction { span, .. } => *span,
            Self::ArityMismatch { span, .. } => *span,
            Self::DivisionByZero { span } => *span,
            Self::RecursionLimitExceeded { span, .. } => *span,
            Self::Cancelled => Span::dummy(),
        }
    }

    /// Convert to a diagnostic for pretty printing
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::UndefinedVariable { name, span } => {
                Diagnostic::error(format!("undefined variable `{}`", name))
                    .with_code("E0201")
                    .with_label(Label::primary(*span, "not found in this environment"))
            }
            Self::UndefinedFunction { name, span } => {
                Diagnostic::error(format!("undefined function `{}`", name))
                    .with_code("E0202")
                    .with_label(Label::primary(*span, "no definition executed before this call"))
                    .with_note("functions must be defined earlier in the program; definitions are not hoisted")
            }
            Self::ArityMismatch {
                name,
                expected,
                found,
                span,
            } => Diagnostic::error(format!(
                "function `{}` expects {} argument{}, got {}",
                name,
                expected,
                if *expected == 1 { "" } else { "s" },
                found
            ))
            .with_code("E0203")
            .with_label(Label::primary(*span, "wrong number of arguments")),
            Self::DivisionByZero { span } => Diagnostic::error("division by zero")
                .with_code("E0204")
                .with_label(Label::primary(*span, "the divisor evaluated to zero")),
            Self::RecursionLimitExceeded { limit, span } => {
                Diagnostic::error(format!("call depth limit of {} exceeded", limit))
                    .with_code("E0205")
                    .with_label(Label::primary(*span, "this call went too deep"))
            }
            Self::Cancelled => {
                Diagnostic::error("execution cancelled by host").with_code("E0206")
            }
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::UndefinedVariable { name, .. } => {
                write!(f, "Undefined variable: {}", name)
            }
            RuntimeError::UndefinedFunction { name, .. } => {
                write!(f, "Undefined function: {}", name)
            }
            RuntimeError::ArityMismatch {
                name,
                expected,
                found,
                ..
            } => write!(
                f,
                "Function {} expects {} argument(s), got {}",
                name, expected, found
            ),
            RuntimeError::DivisionByZero { .. } => write!(f, "Division by zero"),
            RuntimeError::RecursionLimitExceeded { limit, .. } => {
                write!(f, "Call depth limit of {} exceeded", limit)
            }
            RuntimeError::Cancelled => write!(f, "Execution cancelled"),
        }
    }
}

impl std::error::Error for RuntimeError {}
