//! Error types for the Antler system.
//!
//! Uses `thiserror` for ergonomic error definition.

use thiserror::Error;

use crate::value::{Kind, Operator};

/// Result type alias using the crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Antler operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// The rule the error was raised for, when one is in scope.
    pub rule: Option<String>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, rule: None }
    }

    /// Annotates this error with the rule it was raised for.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Creates a kind-mismatch error for an ordered comparison.
    #[must_use]
    pub fn kind_mismatch(left: Kind, op: Operator, right: Kind) -> Self {
        Self::new(ErrorKind::KindMismatch { left, op, right })
    }

    /// Creates an error for an ordered comparison against an absent value.
    #[must_use]
    pub fn absent_comparison(op: Operator) -> Self {
        Self::new(ErrorKind::AbsentComparison(op))
    }

    /// Creates a rule-compilation error.
    #[must_use]
    pub fn compile(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Compile(message.into()))
    }

    /// Creates an inference-resolution error.
    #[must_use]
    pub fn inference(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Inference(message.into()))
    }

    /// Creates an internal invariant-violation error.
    #[must_use]
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invariant(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// An ordered operator was applied to values of differing kinds.
    #[error("cannot compare {left} to {right} using {op}")]
    KindMismatch {
        /// Kind of the left operand.
        left: Kind,
        /// The ordered operator.
        op: Operator,
        /// Kind of the right operand.
        right: Kind,
    },

    /// An ordered operator was applied to an absent value.
    #[error("cannot compare absent values using {0}")]
    AbsentComparison(Operator),

    /// A rule failed to compile.
    #[error("rule compile error: {0}")]
    Compile(String),

    /// An inference template could not be resolved against a token.
    #[error("inference failure: {0}")]
    Inference(String),

    /// Internal invariant violation (should not happen).
    #[error("invariant violation: {0}")]
    Invariant(String),
}
