//! Declaration views: the read-only projection of a node that the advisor
//! consumes.
//!
//! A [`DeclarationView`] is built fresh per request, either by a host through
//! [`project_view`](crate::csharp::host::project_view) or directly in code
//! with the builder methods below.

use std::fmt;

use serde::{Deserialize, Serialize};

use tugaccess_core::visibility::Visibility;

use crate::csharp::modifiers::Modifiers;

/// Opaque handle of a declaration node in the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

/// Kind of declaration.
///
/// Constructors, indexers, operators and delegates map to `Other`
/// (indexers may own accessors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Method,
    Property,
    /// `get`/`set`/`init`/`add`/`remove` of a property, indexer or event.
    Accessor,
    Field,
    Event,
    /// Class, struct, interface, enum, or delegate.
    Type,
    EnumMember,
    Other,
}

impl DeclarationKind {
    /// Returns true if this kind may own accessors.
    pub fn owns_accessors(self) -> bool {
        matches!(
            self,
            DeclarationKind::Property | DeclarationKind::Event | DeclarationKind::Other
        )
    }
}

/// The type enclosing a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TypeContext {
    pub is_interface: bool,
}

impl TypeContext {
    /// A class, struct, or other non-interface type.
    pub fn class() -> Self {
        TypeContext {
            is_interface: false,
        }
    }

    /// An interface.
    pub fn interface() -> Self {
        TypeContext { is_interface: true }
    }
}

/// Read-only projection of a declaration node and its context.
///
/// `explicit_visibility` is what the node's own modifiers say; no defaults or
/// inheritance are applied. `flags` holds the remaining modifiers.
///
/// # Invariant
///
/// `enclosing_member` is `Some` exactly when `kind` is
/// [`DeclarationKind::Accessor`]. See [`DeclarationView::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationView {
    pub node: NodeId,
    pub kind: DeclarationKind,
    pub explicit_visibility: Option<Visibility>,
    pub has_explicit_interface_target: bool,
    pub flags: Modifiers,
    /// `None` for top-level declarations.
    pub enclosing_type: Option<TypeContext>,
    /// Owning property, indexer or event of an accessor.
    pub enclosing_member: Option<Box<DeclarationView>>,
}

/// How a view breaks the accessor/owner invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewDefect {
    /// An accessor without its owning member.
    MissingEnclosingMember,
    /// A non-accessor that names an owning member.
    UnexpectedEnclosingMember,
}

impl DeclarationView {
    /// A top-level declaration with no modifiers.
    pub fn new(node: NodeId, kind: DeclarationKind) -> Self {
        DeclarationView {
            node,
            kind,
            explicit_visibility: None,
            has_explicit_interface_target: false,
            flags: Modifiers::NONE,
            enclosing_type: None,
            enclosing_member: None,
        }
    }

    /// An accessor owned by `owner`, inheriting the owner's enclosing type.
    pub fn accessor(node: NodeId, owner: DeclarationView) -> Self {
        let enclosing_type = owner.enclosing_type;
        DeclarationView {
            enclosing_type,
            enclosing_member: Some(Box::new(owner)),
            ..DeclarationView::new(node, DeclarationKind::Accessor)
        }
    }

    /// Set the explicit visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.explicit_visibility = Some(visibility);
        self
    }

    /// Set the non-visibility modifiers.
    pub fn with_flags(mut self, flags: Modifiers) -> Self {
        self.flags = flags.without_visibility();
        self
    }

    /// Place the declaration inside a type.
    pub fn in_type(mut self, context: TypeContext) -> Self {
        self.enclosing_type = Some(context);
        self
    }

    /// Mark the declaration as an explicit interface implementation.
    pub fn implementing_interface(mut self) -> Self {
        self.has_explicit_interface_target = true;
        self
    }

    /// Returns true if there is no enclosing type.
    pub fn is_top_level(&self) -> bool {
        self.enclosing_type.is_none()
    }

    /// Check the accessor/owner invariant.
    pub fn validate(&self) -> Result<(), ViewDefect> {
        match (self.kind, &self.enclosing_member) {
            (DeclarationKind::Accessor, None) => Err(ViewDefect::MissingEnclosingMember),
            (DeclarationKind::Accessor, Some(_)) => Ok(()),
            (_, Some(_)) => Err(ViewDefect::UnexpectedEnclosingMember),
            (_, None) => Ok(()),
        }
    }
}
