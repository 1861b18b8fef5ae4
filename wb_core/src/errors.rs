//! # Error Types
//!
//! Structured error types for wb_core. Every variant carries enough context
//! for the outer optimization driver to report what went wrong without
//! parsing message strings.
//!
//! ## Example
//!
//! ```rust
//! use wb_core::errors::{CalcError, CalcResult};
//!
//! fn check_fraction(value: f64) -> CalcResult<()> {
//!     if !(0.0..=1.0).contains(&value) {
//!         return Err(CalcError::invalid_input(
//!             "fuel_fraction",
//!             value.to_string(),
//!             "Fraction must lie in [0, 1]",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_fraction(0.4).is_ok());
//! assert!(check_fraction(1.4).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for wb_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for registry, assembler and file operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A registration call received something other than one entity or a
    /// sequence of entities
    #[error("Invalid argument to {operation}: {reason}")]
    InvalidArgument { operation: String, reason: String },

    /// A design variable was requested for a parameter the owner does not expose
    #[error("The DV '{key}' could not be added. The list of possible DVs are: {allowed:?}")]
    InvalidParameter { key: String, allowed: Vec<String> },

    /// An input value is invalid (unknown unit system, missing axis, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Definition file is locked by another process
    #[error("File locked: '{path}' is locked by {locked_by}")]
    FileLocked { path: String, locked_by: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidArgument error
    pub fn invalid_argument(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidArgument {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidParameter error listing the permitted keys
    pub fn invalid_parameter<S: AsRef<str>>(key: impl Into<String>, allowed: &[S]) -> Self {
        CalcError::InvalidParameter {
            key: key.into(),
            allowed: allowed.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError { reason: reason.into() }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            CalcError::InvalidParameter { .. } => "INVALID_PARAMETER",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
