//! # Error Types
//!
//! Errors raised while interpreting pipeline configuration values. All
//! errors use `thiserror` for derive-based `Display` and `Error`.

use thiserror::Error;

/// Error in the pipeline type model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A textual duration could not be parsed.
    #[error("invalid duration {input:?}: {reason}")]
    InvalidDuration {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A step identifying key did not name a known step kind.
    #[error("unknown step kind: {0:?}")]
    UnknownStepKind(String),

    /// A property name did not name a known hook or modifier.
    #[error("unknown hook or modifier: {0:?}")]
    UnknownHook(String),
}
