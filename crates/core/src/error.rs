//! Error types for the Vireo runtime
//!
//! Every fault the runtime can raise is a variant of [`Error`]. Faults are
//! structured and lossless: detail fields are plain strings so that a fault
//! can be cloned into every subscriber of a failed [`Future`](crate::Future)
//! and routed between futures without being re-wrapped.
//!
//! # Categories
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | `BindingFailure` | A value is incompatible with a contract |
//! | `VoidReference` | An operation reaches an absent value where one is required |
//! | `UnsupportedOperation` | The operand variant has no implementation for the operation |
//! | `ArityError` | A callable is invoked with too few arguments |
//! | `WrappedExternalFault` | A lower-level failure (overflow, panic, ...) is surfaced uniformly |
//! | `Config` | The runtime configuration cannot be read or parsed |

use thiserror::Error;

/// Result type alias for runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Runtime fault.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Value incompatible with the contract it was bound against
    #[error("binding failure: expected {expected}, got {actual}")]
    BindingFailure {
        /// Rendered target contract
        expected: String,
        /// Rendered contract of the offending value
        actual: String,
    },

    /// Operation on an absent value where one is required
    #[error("void reference: {reason}")]
    VoidReference {
        /// What was absent
        reason: String,
    },

    /// Operand variant has no implementation for the requested operation
    #[error("unsupported operation: {operation} on {operand}")]
    UnsupportedOperation {
        /// Operation name
        operation: String,
        /// Operand kind (or kinds) the operation was attempted on
        operand: String,
    },

    /// Invocation with too few arguments
    #[error("arity error: expected {expected} arguments, got {actual}")]
    ArityError {
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },

    /// Lower-level failure captured and surfaced uniformly
    #[error("external fault: {reason}")]
    WrappedExternalFault {
        /// Message of the captured failure
        reason: String,
    },

    /// Runtime configuration could not be loaded
    #[error("configuration error: {reason}")]
    Config {
        /// What went wrong
        reason: String,
    },
}

impl Error {
    /// Binding failure between a target contract and an actual one.
    pub fn binding(expected: impl ToString, actual: impl ToString) -> Self {
        Error::BindingFailure {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Void reference with a reason.
    pub fn void_reference(reason: impl Into<String>) -> Self {
        Error::VoidReference {
            reason: reason.into(),
        }
    }

    /// Unsupported operation on an operand kind.
    pub fn unsupported(operation: impl Into<String>, operand: impl Into<String>) -> Self {
        Error::UnsupportedOperation {
            operation: operation.into(),
            operand: operand.into(),
        }
    }

    /// Too few arguments for a callable.
    pub fn arity(expected: usize, actual: usize) -> Self {
        Error::ArityError { expected, actual }
    }

    /// Wrap a lower-level failure.
    pub fn external(reason: impl ToString) -> Self {
        Error::WrappedExternalFault {
            reason: reason.to_string(),
        }
    }

    /// Configuration failure.
    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }

    /// Convert a caught panic payload into a fault.
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "(non-string panic)".to_string());
        Error::external(format!("continuation panicked: {}", message))
    }

    /// Whether unchecked evaluation replaces this fault with a void result.
    pub fn is_lenient_suppressible(&self) -> bool {
        matches!(
            self,
            Error::BindingFailure { .. } | Error::VoidReference { .. }
        )
    }
}
