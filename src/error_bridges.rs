//! Error bridge implementations for C#-specific errors.
//!
//! This module provides `impl From<X> for AccessError` conversions from the
//! advisor, host and tree error types to the unified `AccessError` type.
//!
//! These bridges live in the root crate rather than `tugaccess-core` because
//! they depend on language-specific types that are not part of core.

use tugaccess_core::error::AccessError;

use crate::csharp::host::HostError;
use crate::csharp::ops::change_access::AdvisorError;
use crate::csharp::tree::TreeError;

// ============================================================================
// Bridge: AdvisorError -> AccessError
// ============================================================================

impl From<AdvisorError> for AccessError {
    fn from(err: AdvisorError) -> Self {
        AccessError::MalformedContext {
            node: err.node().0,
            reason: err.to_string(),
        }
    }
}

// ============================================================================
// Bridge: HostError -> AccessError
// ============================================================================

impl From<HostError> for AccessError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::NodeNotFound { node } => AccessError::NodeNotFound { node: node.0 },
            HostError::Modifiers { node, ref source } => AccessError::MalformedContext {
                node: node.0,
                reason: source.to_string(),
            },
            HostError::AccessorOwnedByAccessor { node, .. }
            | HostError::ParentChainTooDeep { node } => AccessError::MalformedContext {
                node: node.0,
                reason: err.to_string(),
            },
            HostError::StaleAction { node, .. } => AccessError::ApplyError {
                message: err.to_string(),
                node: Some(node.0),
            },
        }
    }
}

// ============================================================================
// Bridge: TreeError -> AccessError
// ============================================================================

impl From<TreeError> for AccessError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::Io(io_err) => AccessError::internal(format!("IO error: {}", io_err)),
            other => AccessError::invalid_args_with_details(
                "invalid declaration tree",
                serde_json::json!({ "reason": other.to_string() }),
            ),
        }
    }
}
