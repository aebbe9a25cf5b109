//! Runtime error types for the CUSTODIA append pipeline.
//!
//! All fallible operations return `CustodiaResult<T>`.  Integrity faults
//! are deliberately NOT here — they are findings carried in
//! `ChainVerificationResult`, not errors a caller could retry away.

use thiserror::Error;

/// The unified error type for the CUSTODIA audit trail.
#[derive(Debug, Error)]
pub enum CustodiaError {
    /// The caller supplied a malformed append request.
    ///
    /// Non-retryable — this is a caller bug, rejected before any chain
    /// state is touched.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Another append for the same tenant held the chain tail beyond the
    /// retry budget.  Retryable with backoff.
    #[error("timed out waiting for the chain tail of tenant '{tenant_id}'")]
    TenantLockTimeout { tenant_id: String },

    /// The persistence layer is unreachable or rejected the write.
    ///
    /// Retryable; no partial entry is ever visible after this error.
    #[error("storage unavailable: {reason}")]
    StorageUnavailable { reason: String },

    /// A conditional append found the chain tail already advanced.
    ///
    /// Surfaces only if per-tenant serialization was bypassed; the store
    /// refuses to fork the chain rather than corrupt it.
    #[error("sequence conflict for tenant '{tenant_id}': tail is no longer {expected}")]
    SequenceConflict { tenant_id: String, expected: u64 },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the CUSTODIA crates.
pub type CustodiaResult<T> = Result<T, CustodiaError>;
