//! C# declaration modifiers.
//!
//! A [`Modifiers`] value is the raw keyword set read off a declaration node:
//! visibility keywords (`private`, `protected`, `internal`, `public`) mixed
//! with everything else (`static`, `override`, `readonly`, ...). The
//! visibility keywords form a mask that decodes to at most one
//! [`Visibility`]; `protected internal` is the only legal two-keyword
//! combination.
//!
//! ```
//! use tugaccess::csharp::modifiers::{Modifier, Modifiers};
//! use tugaccess::visibility::Visibility;
//!
//! let mods: Modifiers = [Modifier::Public, Modifier::Static].into_iter().collect();
//! assert_eq!(mods.visibility().unwrap(), Some(Visibility::Public));
//!
//! let narrowed = mods.with_visibility(Visibility::ProtectedInternal);
//! assert_eq!(narrowed.keywords(), vec!["protected", "internal", "static"]);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tugaccess_core::visibility::Visibility;

// ============================================================================
// Modifier
// ============================================================================

/// A single C# modifier keyword.
///
/// Variant order is canonical source order: visibility keywords first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Private,
    Protected,
    Internal,
    Public,
    New,
    Abstract,
    Virtual,
    Override,
    Sealed,
    Static,
    Readonly,
    Const,
    Extern,
    Volatile,
    Unsafe,
    Async,
    Partial,
}

impl Modifier {
    /// Every modifier, in canonical order.
    pub const ALL: [Modifier; 17] = [
        Modifier::Private,
        Modifier::Protected,
        Modifier::Internal,
        Modifier::Public,
        Modifier::New,
        Modifier::Abstract,
        Modifier::Virtual,
        Modifier::Override,
        Modifier::Sealed,
        Modifier::Static,
        Modifier::Readonly,
        Modifier::Const,
        Modifier::Extern,
        Modifier::Volatile,
        Modifier::Unsafe,
        Modifier::Async,
        Modifier::Partial,
    ];

    const fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// Source keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Internal => "internal",
            Modifier::Public => "public",
            Modifier::New => "new",
            Modifier::Abstract => "abstract",
            Modifier::Virtual => "virtual",
            Modifier::Override => "override",
            Modifier::Sealed => "sealed",
            Modifier::Static => "static",
            Modifier::Readonly => "readonly",
            Modifier::Const => "const",
            Modifier::Extern => "extern",
            Modifier::Volatile => "volatile",
            Modifier::Unsafe => "unsafe",
            Modifier::Async => "async",
            Modifier::Partial => "partial",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Modifier {
    type Err = ModifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Modifier::ALL
            .into_iter()
            .find(|m| m.keyword() == s)
            .ok_or_else(|| ModifierError::UnknownKeyword {
                keyword: s.to_string(),
            })
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors decoding modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModifierError {
    /// The visibility keywords do not form a valid level (e.g. `public private`).
    #[error("conflicting visibility modifiers: {keywords}")]
    ConflictingVisibility { keywords: String },

    /// Not a C# modifier keyword.
    #[error("unknown modifier keyword '{keyword}'")]
    UnknownKeyword { keyword: String },
}

// ============================================================================
// Modifiers
// ============================================================================

/// A set of [`Modifier`]s.
///
/// Serializes as a list of keywords in canonical order. Deserializes from
/// either a list or source text such as `"protected internal static"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Vec<Modifier>", try_from = "ModifierSpelling")]
pub struct Modifiers(u32);

#[derive(Deserialize)]
#[serde(untagged)]
enum ModifierSpelling {
    List(Vec<Modifier>),
    Text(String),
}

impl TryFrom<ModifierSpelling> for Modifiers {
    type Error = ModifierError;

    fn try_from(spelling: ModifierSpelling) -> Result<Self, Self::Error> {
        match spelling {
            ModifierSpelling::List(list) => Ok(list.into()),
            ModifierSpelling::Text(text) => Modifiers::parse_keywords(&text),
        }
    }
}

impl Modifiers {
    /// The empty set.
    pub const NONE: Modifiers = Modifiers(0);

    /// All visibility keywords.
    pub const VISIBILITY_MASK: Modifiers = Modifiers(
        Modifier::Private.bit()
            | Modifier::Protected.bit()
            | Modifier::Internal.bit()
            | Modifier::Public.bit(),
    );

    /// Modifiers that tie a member to an inheritance contract.
    pub const INHERITANCE: Modifiers = Modifiers(
        Modifier::Override.bit()
            | Modifier::Virtual.bit()
            | Modifier::New.bit()
            | Modifier::Abstract.bit(),
    );

    /// Returns true if no modifier is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if `modifier` is in the set.
    pub fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    /// Returns true if the two sets share any modifier.
    pub fn intersects(self, other: Modifiers) -> bool {
        self.0 & other.0 != 0
    }

    /// Add a modifier.
    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    /// Copy of this set with `modifier` added.
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.insert(modifier);
        self
    }

    /// Iterate modifiers in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        Modifier::ALL.into_iter().filter(move |m| self.contains(*m))
    }

    /// Keywords in canonical order.
    pub fn keywords(self) -> Vec<&'static str> {
        self.iter().map(Modifier::keyword).collect()
    }

    /// Decode the visibility mask.
    ///
    /// `Ok(None)` means no visibility keyword is present.
    pub fn visibility(self) -> Result<Option<Visibility>, ModifierError> {
        let has = |m: Modifier| self.contains(m);
        let vis = (
            has(Modifier::Private),
            has(Modifier::Protected),
            has(Modifier::Internal),
            has(Modifier::Public),
        );

        match vis {
            (false, false, false, false) => Ok(None),
            (true, false, false, false) => Ok(Some(Visibility::Private)),
            (false, true, false, false) => Ok(Some(Visibility::Protected)),
            (false, false, true, false) => Ok(Some(Visibility::Internal)),
            (false, true, true, false) => Ok(Some(Visibility::ProtectedInternal)),
            (false, false, false, true) => Ok(Some(Visibility::Public)),
            _ => Err(ModifierError::ConflictingVisibility {
                keywords: Modifiers(self.0 & Self::VISIBILITY_MASK.0)
                    .keywords()
                    .join(" "),
            }),
        }
    }

    /// This set with every visibility keyword removed.
    pub fn without_visibility(self) -> Self {
        Modifiers(self.0 & !Self::VISIBILITY_MASK.0)
    }

    /// This set with its visibility replaced by `visibility`.
    ///
    /// All visibility bits are cleared first, so the result always decodes
    /// to exactly `visibility`.
    pub fn with_visibility(self, visibility: Visibility) -> Self {
        let base = self.without_visibility();
        let bits = match visibility {
            Visibility::Private => Modifier::Private.bit(),
            Visibility::Protected => Modifier::Protected.bit(),
            Visibility::Internal => Modifier::Internal.bit(),
            Visibility::ProtectedInternal => {
                Modifier::Protected.bit() | Modifier::Internal.bit()
            }
            Visibility::Public => Modifier::Public.bit(),
        };
        Modifiers(base.0 | bits)
    }

    /// Parse a whitespace-separated keyword list, e.g. `"protected internal static"`.
    pub fn parse_keywords(text: &str) -> Result<Self, ModifierError> {
        text.split_whitespace()
            .map(str::parse::<Modifier>)
            .collect()
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keywords().join(" "))
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        let mut mods = Modifiers::NONE;
        for m in iter {
            mods.insert(m);
        }
        mods
    }
}

impl From<Vec<Modifier>> for Modifiers {
    fn from(list: Vec<Modifier>) -> Self {
        list.into_iter().collect()
    }
}

impl From<Modifiers> for Vec<Modifier> {
    fn from(mods: Modifiers) -> Self {
        mods.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mods(text: &str) -> Modifiers {
        Modifiers::parse_keywords(text).unwrap()
    }

    mod visibility_decode_tests {
        use super::*;

        #[test]
        fn no_visibility_keyword_decodes_to_none() {
            assert_eq!(mods("static readonly").visibility(), Ok(None));
            assert_eq!(Modifiers::NONE.visibility(), Ok(None));
        }

        #[test]
        fn single_keywords_decode() {
            assert_eq!(mods("private").visibility(), Ok(Some(Visibility::Private)));
            assert_eq!(
                mods("protected").visibility(),
                Ok(Some(Visibility::Protected))
            );
            assert_eq!(mods("internal").visibility(), Ok(Some(Visibility::Internal)));
            assert_eq!(mods("public static").visibility(), Ok(Some(Visibility::Public)));
        }

        #[test]
        fn protected_internal_in_either_order() {
            assert_eq!(
                mods("protected internal").visibility(),
                Ok(Some(Visibility::ProtectedInternal))
            );
            assert_eq!(
                mods("internal protected").visibility(),
                Ok(Some(Visibility::ProtectedInternal))
            );
        }

        #[test]
        fn conflicting_keywords_are_rejected() {
            let err = mods("public private").visibility().unwrap_err();
            assert_eq!(
                err,
                ModifierError::ConflictingVisibility {
                    keywords: "private public".to_string()
                }
            );
            assert!(mods("public internal").visibility().is_err());
            assert!(mods("private protected").visibility().is_err());
        }
    }

    mod rewrite_tests {
        use super::*;

        #[test]
        fn with_visibility_clears_old_bits() {
            let before = mods("protected internal static");
            let after = before.with_visibility(Visibility::Private);
            assert_eq!(after, mods("private static"));
            assert_eq!(after.visibility(), Ok(Some(Visibility::Private)));
        }

        #[test]
        fn with_visibility_preserves_other_modifiers() {
            for target in Visibility::ALL {
                let after = mods("public sealed unsafe").with_visibility(target);
                assert_eq!(after.visibility(), Ok(Some(target)));
                assert!(after.contains(Modifier::Sealed));
                assert!(after.contains(Modifier::Unsafe));
            }
        }

        #[test]
        fn with_visibility_repairs_conflicting_mask() {
            let after = mods("public private").with_visibility(Visibility::Internal);
            assert_eq!(after, mods("internal"));
        }

        #[test]
        fn without_visibility_drops_only_visibility() {
            assert_eq!(
                mods("protected internal override").without_visibility(),
                mods("override")
            );
        }
    }

    mod set_tests {
        use super::*;

        #[test]
        fn inheritance_mask_matches_contract_modifiers() {
            for m in [
                Modifier::Override,
                Modifier::Virtual,
                Modifier::New,
                Modifier::Abstract,
            ] {
                assert!(Modifiers::NONE.with(m).intersects(Modifiers::INHERITANCE));
            }
            assert!(!mods("public static sealed").intersects(Modifiers::INHERITANCE));
        }

        #[test]
        fn insert_sets_membership() {
            let mut m = Modifiers::NONE;
            assert!(m.is_empty());
            m.insert(Modifier::Static);
            assert!(m.contains(Modifier::Static));
            assert!(!m.contains(Modifier::Sealed));
        }

        #[test]
        fn keywords_are_canonically_ordered() {
            assert_eq!(
                mods("static public override").keywords(),
                vec!["public", "override", "static"]
            );
            assert_eq!(mods("internal protected").to_string(), "protected internal");
        }

        #[test]
        fn unknown_keyword_is_rejected() {
            assert_eq!(
                Modifiers::parse_keywords("public friend"),
                Err(ModifierError::UnknownKeyword {
                    keyword: "friend".to_string()
                })
            );
        }

        #[test]
        fn serde_as_keyword_list() {
            let m = mods("protected internal virtual");
            let json = serde_json::to_string(&m).unwrap();
            assert_eq!(json, r#"["protected","internal","virtual"]"#);
            let back: Modifiers = serde_json::from_str(&json).unwrap();
            assert_eq!(back, m);
        }

        #[test]
        fn serde_accepts_source_text() {
            let m: Modifiers = serde_json::from_str("\"static  protected internal\"").unwrap();
            assert_eq!(m, mods("protected internal static"));
            let empty: Modifiers = serde_json::from_str("\"\"").unwrap();
            assert!(empty.is_empty());
        }

        #[test]
        fn serde_rejects_unknown_keyword_in_text() {
            assert!(serde_json::from_str::<Modifiers>("\"public friend\"").is_err());
        }
    }
}
