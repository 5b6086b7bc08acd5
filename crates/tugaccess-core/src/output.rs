//! JSON output types and serialization for CLI responses.
//!
//! These types form the **agent contract** of the `tugaccess` binary.
//!
//! ## Design Principles
//!
//! 1. **Status first:** Every response has `status` as first field
//! 2. **Deterministic:** Same input -> same output (field order, array ordering)
//! 3. **Nullable vs absent:** Explicit `null` for "no value"; absent field means "not applicable"
//! 4. **Versioned:** Schema version in response enables forward compatibility

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{AccessError, OutputErrorCode};
use crate::visibility::Visibility;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Suggest
// ============================================================================

/// One offerable visibility change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInfo {
    /// Human-readable choice, e.g. "To protected internal".
    pub label: String,
    /// Level the declaration would be changed to.
    pub target: Visibility,
    /// Node the action rewrites.
    pub node: u32,
}

/// Response for `tugaccess suggest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version.
    pub schema_version: String,
    /// Node the suggestions were computed for.
    pub node: u32,
    /// Declaration name, when the host knows one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Resolved (actual) visibility of the declaration.
    ///
    /// `null` when the declaration carries no accessibility at all
    /// (enum members, interface members, explicit implementations).
    pub current: Option<Visibility>,
    /// Offerable changes, in enumeration order.
    pub actions: Vec<ActionInfo>,
}

impl SuggestResponse {
    /// Create a successful suggest response.
    pub fn new(
        node: u32,
        name: Option<String>,
        current: Option<Visibility>,
        actions: Vec<ActionInfo>,
    ) -> Self {
        SuggestResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            node,
            name,
            current,
            actions,
        }
    }
}

// ============================================================================
// Apply
// ============================================================================

/// Response for `tugaccess apply`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version.
    pub schema_version: String,
    /// Node that was rewritten.
    pub node: u32,
    /// Explicit visibility before the rewrite (`null` if it was implicit).
    pub from: Option<Visibility>,
    /// Visibility after the rewrite.
    pub to: Visibility,
    /// Full modifier keyword list after the rewrite.
    pub modifiers: Vec<String>,
    /// Whether the tree file was written back.
    pub written: bool,
}

impl ApplyResponse {
    /// Create a successful apply response.
    pub fn new(
        node: u32,
        from: Option<Visibility>,
        to: Visibility,
        modifiers: Vec<String>,
        written: bool,
    ) -> Self {
        ApplyResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            node,
            from,
            to,
            modifiers,
            written,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error information for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Node the error refers to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<u32>,
}

impl ErrorInfo {
    /// Create from an AccessError.
    pub fn from_error(err: &AccessError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let message = err.to_string();

        let (details, node) = match err {
            AccessError::InvalidArguments { details, .. } => (details.clone(), None),
            AccessError::NodeNotFound { node } => (None, Some(*node)),
            AccessError::MalformedContext { node, reason } => (
                Some(serde_json::json!({ "reason": reason })),
                Some(*node),
            ),
            AccessError::ApplyError { node, .. } => (None, *node),
            AccessError::FileNotFound { path } => {
                (Some(serde_json::json!({ "path": path })), None)
            }
            AccessError::InternalError { .. } => (None, None),
        };

        ErrorInfo {
            code,
            message,
            details,
            node,
        }
    }
}

/// Error response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from an AccessError.
    pub fn from_error(err: &AccessError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
