//! Visibility lattice: the closed set of accessibility levels and the
//! "stricter-than" relation over them.
//!
//! # Ordering
//!
//! The levels do not form a total order. `Protected` and `Internal` sit on the
//! same tier and neither is stricter than the other:
//!
//! ```text
//!                Public
//!                  |
//!          ProtectedInternal
//!             /          \
//!       Protected      Internal
//!             \          /
//!               Private
//! ```
//!
//! [`Visibility::is_stricter_than`] is defined by exhaustive matching over the
//! variant pair, not by a numeric rank.
//!
//! # Examples
//!
//! ```
//! use tugaccess_core::visibility::Visibility;
//!
//! assert!(Visibility::Private.is_stricter_than(Visibility::Protected));
//! assert!(Visibility::Internal.is_stricter_than(Visibility::ProtectedInternal));
//! assert!(!Visibility::Protected.is_stricter_than(Visibility::Internal));
//! assert!(!Visibility::Internal.is_stricter_than(Visibility::Protected));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Accessibility level of a declaration.
///
/// The implicit "unspecified" state is not a variant: it is `Option::None`
/// wherever a declaration may omit its visibility keywords.
///
/// # Serialization
///
/// ```
/// use tugaccess_core::visibility::Visibility;
///
/// let vis = Visibility::ProtectedInternal;
/// assert_eq!(serde_json::to_string(&vis).unwrap(), "\"protected_internal\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// `private`: accessible only within the declaring type.
    Private,
    /// `protected`: declaring type and derived types.
    Protected,
    /// `internal`: anywhere in the same assembly.
    Internal,
    /// `protected internal`: same assembly, or derived types anywhere.
    ProtectedInternal,
    /// `public`: anywhere.
    Public,
}

impl Visibility {
    /// All levels, in the order suggestions are offered.
    pub const ALL: [Visibility; 5] = [
        Visibility::Private,
        Visibility::Protected,
        Visibility::ProtectedInternal,
        Visibility::Internal,
        Visibility::Public,
    ];

    /// Returns true if `self` grants strictly less access than `other`.
    ///
    /// Irreflexive, and false in both directions for `Protected`/`Internal`.
    pub fn is_stricter_than(self, other: Visibility) -> bool {
        use Visibility::*;

        match (self, other) {
            (Private, Private) => false,
            (Private, _) => true,
            (_, Private) => false,

            (Public, _) => false,
            (_, Public) => true,

            (Protected, ProtectedInternal) | (Internal, ProtectedInternal) => true,

            (Protected, Protected)
            | (Internal, Internal)
            | (ProtectedInternal, ProtectedInternal)
            | (Protected, Internal)
            | (Internal, Protected)
            | (ProtectedInternal, Protected)
            | (ProtectedInternal, Internal) => false,
        }
    }

    /// Source keyword(s) for this level, as written in a declaration.
    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Protected => "protected",
            Visibility::Internal => "internal",
            Visibility::ProtectedInternal => "protected internal",
            Visibility::Public => "public",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// `a < b` iff `a` is stricter than `b`; incomparable pairs yield `None`.
impl PartialOrd for Visibility {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if self.is_stricter_than(*other) {
            Some(Ordering::Less)
        } else if other.is_stricter_than(*self) {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

/// Error returned when a string names no visibility level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown visibility '{input}' (expected private, protected, internal, protected internal, or public)")]
pub struct ParseVisibilityError {
    pub input: String,
}

impl FromStr for Visibility {
    type Err = ParseVisibilityError;

    /// Accepts the source keyword, with `protected internal` also spelled
    /// `protected-internal` or `protected_internal`. Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        match normalized.as_str() {
            "private" => Ok(Visibility::Private),
            "protected" => Ok(Visibility::Protected),
            "internal" => Ok(Visibility::Internal),
            "protected internal" | "internal protected" => Ok(Visibility::ProtectedInternal),
            "public" => Ok(Visibility::Public),
            _ => Err(ParseVisibilityError {
                input: s.to_string(),
            }),
        }
    }
}
