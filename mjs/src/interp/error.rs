//! Runtime errors for the executor

use crate::ast::Span;
use std::fmt;

/// Runtime error during execution
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    /// Location of the failing node, when the executor knows it
    pub span: Option<Span>,
}

/// Kinds of runtime errors
#[derive(Debug, Clone)]
pub enum ErrorKind {
    /// Identifier with no binding anywhere in the scope chain. Recoverable:
    /// the permissive safe-read path substitutes undefined instead.
    ReferenceMissing,
    /// Call target is not a function value
    NotCallable,
    /// Recursion depth guard tripped
    StackOverflow,
    /// Control flow: early return from a function (with value). Caught at
    /// the call boundary, never user-visible.
    Return(Box<crate::interp::Value>),
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        // Return is control flow, not a real error; discriminant is enough
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl RuntimeError {
    pub fn reference_missing(name: &str, suggestion: Option<&str>) -> Self {
        let message = match suggestion {
            Some(s) => format!("{name} is not defined (did you mean '{s}'?)"),
            None => format!("{name} is not defined"),
        };
        RuntimeError {
            kind: ErrorKind::ReferenceMissing,
            message,
            span: None,
        }
    }

    pub fn not_callable(type_name: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::NotCallable,
            message: format!("{type_name} is not a function"),
            span: None,
        }
    }

    pub fn stack_overflow() -> Self {
        RuntimeError {
            kind: ErrorKind::StackOverflow,
            message: "stack overflow: too deep recursion".to_string(),
            span: None,
        }
    }

    /// Return-statement control flow carrier
    pub fn returning(value: crate::interp::Value) -> Self {
        RuntimeError {
            kind: ErrorKind::Return(Box::new(value)),
            message: String::new(),
            span: None,
        }
    }

    /// Attach a span if none is set yet, so the innermost location wins
    /// while the error propagates outward.
    pub fn at(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error: {}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for executor operations
pub type InterpResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::Value;

    #[test]
    fn test_reference_missing_message() {
        let err = RuntimeError::reference_missing("foo", None);
        assert_eq!(err.kind, ErrorKind::ReferenceMissing);
        assert_eq!(err.message, "foo is not defined");
    }

    #[test]
    fn test_reference_missing_with_suggestion() {
        let err = RuntimeError::reference_missing("twnety", Some("twenty"));
        assert_eq!(err.message, "twnety is not defined (did you mean 'twenty'?)");
    }

    #[test]
    fn test_not_callable_message() {
        let err = RuntimeError::not_callable("number");
        assert_eq!(err.kind, ErrorKind::NotCallable);
        assert_eq!(err.message, "number is not a function");
    }

    #[test]
    fn test_return_compares_by_discriminant() {
        let a = ErrorKind::Return(Box::new(Value::Int(1)));
        let b = ErrorKind::Return(Box::new(Value::Null));
        assert_eq!(a, b);
        assert_ne!(a, ErrorKind::ReferenceMissing);
    }

    #[test]
    fn test_at_keeps_innermost_span() {
        let err = RuntimeError::reference_missing("x", None)
            .at(Span::new(3, 4))
            .at(Span::new(0, 10));
        assert_eq!(err.span, Some(Span::new(3, 4)));
    }

    #[test]
    fn test_display() {
        let err = RuntimeError::stack_overflow();
        assert!(format!("{err}").starts_with("Runtime error:"));
    }
}
