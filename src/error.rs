//! Error types for optics and hook operations.
//!
//! Every fallible operation in this crate returns [`OpticError`]. Errors are
//! raised synchronously and never retried: because writes always build new
//! values, a failure part-way through a rebuild leaves the original state
//! untouched and the caller simply receives no result.

use thiserror::Error;

use crate::optics::Kind;

/// A specialised `Result` type for optic operations.
pub type Result<T> = std::result::Result<T, OpticError>;

/// Represents errors that can occur while building or running optics.
///
/// # Examples
///
/// ```rust
/// use lensing::OpticError;
/// use lensing::optics::Kind;
///
/// let error = OpticError::capability("set", Kind::Fold);
/// assert_eq!(error.to_string(), "cannot set with an optic of kind Fold");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpticError {
    /// A read expected at least one focus but the state yielded none.
    #[error("no focus to view")]
    NoFocus,

    /// An operation was invoked on an optic whose kind lacks the capability.
    #[error("cannot {operation} with an optic of kind {kind}")]
    Capability {
        /// The operation that was attempted.
        operation: &'static str,
        /// The kind of the optic it was attempted on.
        kind: Kind,
    },

    /// Two optics whose capabilities do not intersect were composed.
    #[error("optic of kind {left} cannot be composed with optic of kind {right}")]
    NoComposition {
        /// The kind accumulated so far on the left-hand side.
        left: Kind,
        /// The kind of the optic appended on the right-hand side.
        right: Kind,
    },

    /// A rebuild received a different number of foci than iteration produced.
    #[error("expected {expected} foci to rebuild from but received {actual}")]
    FocusCountMismatch {
        /// The number of foci the state holds.
        expected: usize,
        /// The number of replacement foci supplied.
        actual: usize,
    },

    /// No hook strategy covers the operation for the value's type.
    #[error("{operation} is not supported for values of type {type_name}")]
    UnsupportedOperation {
        /// The hook operation that was requested.
        operation: String,
        /// The runtime type of the value.
        type_name: String,
    },

    /// An index or key does not exist in the container.
    #[error("key {key} not found in value of type {type_name}")]
    MissingKey {
        /// Debug rendering of the key.
        key: String,
        /// The runtime type of the container.
        type_name: String,
    },

    /// A strategy received a value of the wrong shape.
    #[error("expected {expected} but found {found}")]
    TypeMismatch {
        /// Description of the expected shape.
        expected: String,
        /// The runtime type that was found.
        found: String,
    },

    /// A regular expression handed to a regex traversal failed to compile.
    #[error("invalid pattern {pattern}: {message}")]
    InvalidPattern {
        /// The pattern as written.
        pattern: String,
        /// Why the pattern was rejected.
        message: String,
    },

    /// An error raised on purpose by an error iso.
    #[error("{message}")]
    Raised {
        /// The formatted message.
        message: String,
    },
}

impl OpticError {
    /// Creates a [`OpticError::Capability`] error.
    #[must_use]
    pub const fn capability(operation: &'static str, kind: Kind) -> Self {
        Self::Capability { operation, kind }
    }

    /// Creates an [`OpticError::UnsupportedOperation`] error.
    #[must_use]
    pub fn unsupported(operation: impl Into<String>, type_name: impl ToString) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            type_name: type_name.to_string(),
        }
    }

    /// Creates an [`OpticError::TypeMismatch`] error.
    #[must_use]
    pub fn type_mismatch(expected: impl Into<String>, found: impl ToString) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_no_focus_display() {
        assert_eq!(OpticError::NoFocus.to_string(), "no focus to view");
    }

    #[rstest]
    fn test_no_composition_display() {
        let error = OpticError::NoComposition {
            left: Kind::Fold,
            right: Kind::Setter,
        };
        assert_eq!(
            error.to_string(),
            "optic of kind Fold cannot be composed with optic of kind Setter"
        );
    }

    #[rstest]
    fn test_focus_count_mismatch_display() {
        let error = OpticError::FocusCountMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            error.to_string(),
            "expected 3 foci to rebuild from but received 2"
        );
    }

    #[rstest]
    fn test_unsupported_display() {
        let error = OpticError::unsupported("set_attr", "object Socket");
        assert_eq!(
            error.to_string(),
            "set_attr is not supported for values of type object Socket"
        );
    }

    #[rstest]
    fn test_invalid_pattern_display() {
        let error = OpticError::InvalidPattern {
            pattern: "(".to_string(),
            message: "unclosed group".to_string(),
        };
        assert_eq!(error.to_string(), "invalid pattern (: unclosed group");
    }

    #[rstest]
    fn test_error_trait() {
        let error = OpticError::NoFocus;
        let _: &dyn std::error::Error = &error;
    }
}
