//! DevPayr error types.

use thiserror::Error;

/// Errors that can occur during validation or injectable processing.
#[derive(Debug, Error)]
pub enum DevpayrError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// No license key provided for runtime validation.
    #[error("License key is required for runtime validation")]
    MissingLicense,

    /// The remote service reports the project as unpaid or unauthorized.
    #[error("Project is unpaid or unauthorized")]
    Unpaid,

    /// Malformed base64 or encrypted token format.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Cipher operation failed (wrong key, corrupt data, padding mismatch).
    #[error("Decryption failed, possibly incorrect key or corrupt data")]
    DecryptionError,

    /// Keyed-hash signature did not match the payload.
    #[error("Signature verification failed for injectable: {slug}")]
    SignatureError {
        /// Slug of the injectable whose signature mismatched.
        slug: String,
    },

    /// Injectable is missing a required field.
    #[error("Invalid injectable '{slug}': {reason}")]
    InvalidInjectable {
        /// Slug of the offending injectable (empty if the slug itself is missing).
        slug: String,
        /// What was missing or malformed.
        reason: String,
    },

    /// A server-supplied target path would resolve outside the base directory.
    #[error("Injectable target path escapes base directory: {path}")]
    PathTraversal {
        /// The offending target path.
        path: String,
    },

    /// Directory or file operation failed.
    #[error("I/O error at {path}: {message}")]
    Io {
        /// Path of the file or directory that failed.
        path: String,
        /// Description of the failed operation.
        message: String,
    },

    /// A processor override was already bound for this pipeline.
    #[error("Injectable processor already registered; reset before rebinding")]
    ProcessorRegistration,

    /// HTTP transport error communicating with the DevPayr API.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The API returned an error status with a structured payload.
    #[error("API error (status {status}): {message}")]
    ApiResponse {
        /// HTTP status code returned by the API.
        status: u16,
        /// Error message extracted from the response.
        message: String,
    },

    /// Failed to parse an API response.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Validation cache I/O error.
    #[error("Cache I/O error: {0}")]
    CacheIo(String),
}
