//! Error types and error code constants for tugaccess.
//!
//! This module provides a unified error type (`AccessError`) that bridges
//! domain-specific errors from the advisor, the modifier decoder, and the
//! declaration tree into a common format suitable for JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Resolution errors (node not found, malformed declaration context)
//! - `4`: Apply errors (stale action, level not offered, failed write)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! ## Design
//!
//! - **Unified type**: `AccessError` is the single error type for CLI output
//! - **Bridging**: `impl From<X> for AccessError` lives next to each domain error
//! - **Code mapping**: `OutputErrorCode` provides stable integer codes for JSON

use std::fmt;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed request).
    InvalidArguments = 2,
    /// Resolution errors (node not found, malformed declaration context).
    ResolutionError = 3,
    /// Apply errors (stale action, level not offered, failed write).
    ApplyError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
///
/// Every subsystem error is converted to this type before being rendered as
/// JSON. Each variant carries enough context for a helpful message and an
/// optional `details` field.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// No declaration with the given node id.
    #[error("no declaration with node id {node}")]
    NodeNotFound { node: u32 },

    /// The declaration context violates the advisor's input contract.
    #[error("malformed declaration context for node {node}: {reason}")]
    MalformedContext { node: u32, reason: String },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Failed to apply a rewrite.
    #[error("apply error: {message}")]
    ApplyError { message: String, node: Option<u32> },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&AccessError> for OutputErrorCode {
    fn from(err: &AccessError) -> Self {
        match err {
            AccessError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            AccessError::NodeNotFound { .. } => OutputErrorCode::ResolutionError,
            AccessError::MalformedContext { .. } => OutputErrorCode::ResolutionError,
            AccessError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            AccessError::ApplyError { .. } => OutputErrorCode::ApplyError,
            AccessError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<AccessError> for OutputErrorCode {
    fn from(err: AccessError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl AccessError {
    /// Create an invalid arguments error with JSON details.
    pub fn invalid_args_with_details(
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        AccessError::InvalidArguments {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        AccessError::FileNotFound { path: path.into() }
    }

    /// Create an apply error for a node.
    pub fn apply(message: impl Into<String>, node: Option<u32>) -> Self {
        AccessError::ApplyError {
            message: message.into(),
            node,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AccessError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
