//! Error types and classification for rebatch.
//!
//! This crate provides:
//! - [`RbError`] - Top-level error enum for all pipeline errors
//! - Domain-specific errors ([`ConfigError`], [`TransformError`])
//! - [`ErrorCategory`] for continue/abort decision making
//! - Error classification logic based on error type

use thiserror::Error;

/// Top-level error type for rebatch.
#[derive(Error, Debug)]
pub enum RbError {
    /// Configuration errors (invalid or contradictory parameters)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Transform errors (schema mismatch, lifecycle misuse)
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration-related errors.
///
/// All configuration errors are fatal at startup: the run does not proceed.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A parameter was supplied that the transform does not declare
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// A declared parameter carries a value outside its domain
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },

    /// Mutually exclusive parameters are both set
    #[error("Conflicting parameters: {0}")]
    Conflicting(String),

    /// A required parameter (or parameter group) is absent
    #[error("Missing parameter: {0}")]
    Missing(String),
}

/// Transform-related errors.
#[derive(Error, Debug)]
pub enum TransformError {
    /// Buffered and incoming batches carry incompatible schemas
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The caller broke the transform lifecycle (transform after flush,
    /// double flush)
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// Transform execution failed on otherwise well-formed input
    #[error("Execution failed: {0}")]
    Execution(String),
}

/// Error classification for partition-continuation decisions.
///
/// Used by the runner to decide whether a partition keeps processing
/// subsequent batches or aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Data-shape error on one input - report it, keep the partition alive
    ///
    /// Examples: schema mismatch between buffered and incoming batches
    Recoverable,

    /// Caller bug or startup misconfiguration - abort
    ///
    /// Examples: transform called after flush, contradictory parameters
    Fatal,
}

/// Classifies an error to determine whether the partition continues.
pub fn classify_error(error: &RbError) -> ErrorCategory {
    match error {
        RbError::Config(_) => ErrorCategory::Fatal,
        RbError::Transform(e) => classify_transform_error(e),
        RbError::Other(_) => ErrorCategory::Fatal,
    }
}

fn classify_transform_error(error: &TransformError) -> ErrorCategory {
    match error {
        TransformError::SchemaMismatch(_) => ErrorCategory::Recoverable,
        TransformError::ContractViolation(_) => ErrorCategory::Fatal,
        TransformError::Execution(_) => ErrorCategory::Recoverable,
    }
}

/// Result type alias using RbError.
pub type Result<T> = std::result::Result<T, RbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_is_recoverable() {
        let err = RbError::from(TransformError::SchemaMismatch("fields differ".into()));
        assert_eq!(classify_error(&err), ErrorCategory::Recoverable);
    }

    #[test]
    fn test_contract_violation_is_fatal() {
        let err = RbError::from(TransformError::ContractViolation(
            "flush called twice".into(),
        ));
        assert_eq!(classify_error(&err), ErrorCategory::Fatal);
    }

    #[test]
    fn test_config_errors_are_fatal() {
        let err = RbError::from(ConfigError::Missing("max_rows_per_table".into()));
        assert_eq!(classify_error(&err), ErrorCategory::Fatal);

        let err = RbError::from(ConfigError::Conflicting(
            "max_rows_per_table and max_mbytes_per_table are both set".into(),
        ));
        assert_eq!(classify_error(&err), ErrorCategory::Fatal);
    }

    #[test]
    fn test_error_display() {
        let err = RbError::from(ConfigError::InvalidValue {
            name: "size_type".into(),
            reason: "expected \"disk\" or \"memory\"".into(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid value for size_type: expected \"disk\" or \"memory\""
        );
    }
}
