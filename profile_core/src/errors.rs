//! # Error Types
//!
//! Structured error types for profile_core. Every variant carries enough
//! context to tell the caller which input was rejected and why.
//!
//! Note what is *not* an error here: a catalog entry that fails to parse is
//! dropped and recorded in a [`LoadReport`](crate::catalog::LoadReport), an
//! empty candidate set is a "no match" outcome, and a selection with no
//! adequate profile is a degraded outcome. None of those reach this enum.
//!
//! ## Example
//!
//! ```rust
//! use profile_core::errors::{CalcError, CalcResult};
//!
//! fn validate_fyk(fyk_mpa: f64) -> CalcResult<()> {
//!     if fyk_mpa <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "fyk",
//!             fyk_mpa.to_string(),
//!             "Yield strength must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for profile_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for catalog and selection operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, not finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A profile without usable section properties reached the stress analysis.
    ///
    /// This is a contract violation: the candidate filter never lets such a
    /// profile through.
    #[error("Invalid profile '{profile}': {reason}")]
    InvalidProfile { profile: String, reason: String },

    /// Profile not found in the catalog
    #[error("Profile not found: {name}")]
    ProfileNotFound { name: String },

    /// The catalog document as a whole could not be read
    #[error("Catalog error: {reason}")]
    CatalogError { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an InvalidProfile error
    pub fn invalid_profile(profile: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidProfile {
            profile: profile.into(),
            reason: reason.into(),
        }
    }

    /// Create a ProfileNotFound error
    pub fn profile_not_found(name: impl Into<String>) -> Self {
        CalcError::ProfileNotFound { name: name.into() }
    }

    /// Create a CatalogError
    pub fn catalog_error(reason: impl Into<String>) -> Self {
        CalcError::CatalogError {
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

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// True when the caller fed bad input, as opposed to a broken catalog.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. } | CalcError::MissingField { .. } | CalcError::ProfileNotFound { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::InvalidProfile { .. } => "INVALID_PROFILE",
            CalcError::ProfileNotFound { .. } => "PROFILE_NOT_FOUND",
            CalcError::CatalogError { .. } => "CATALOG_ERROR",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}
