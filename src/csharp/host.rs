//! Host integration: how the advisor reads a syntax tree and how its actions
//! are written back.
//!
//! The advisor never touches a concrete tree. A host exposes two narrow
//! capabilities:
//!
//! - [`DeclarationContext`]: per-node facts (kind, raw modifiers, explicit
//!   interface target, is-interface) and the parent link;
//! - [`RewriteSink`]: replace a node's modifiers.
//!
//! [`project_view`] turns a context into a [`DeclarationView`];
//! [`apply_action`] performs a [`RewriteAction`] against a host that
//! implements both traits.

use thiserror::Error;
use tracing::debug;

use tugaccess_core::visibility::Visibility;

use crate::csharp::decl::{DeclarationKind, DeclarationView, NodeId, TypeContext};
use crate::csharp::modifiers::{ModifierError, Modifiers};
use crate::csharp::ops::change_access::RewriteAction;

/// Upper bound on parent-chain length walked while locating an enclosing type.
pub const MAX_NESTING_DEPTH: usize = 1024;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while reading from or writing to a host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host has no node with this id.
    #[error("no declaration with id {node}")]
    NodeNotFound { node: NodeId },

    /// The node's modifiers cannot be decoded.
    #[error("{node}: {source}")]
    Modifiers {
        node: NodeId,
        #[source]
        source: ModifierError,
    },

    /// An accessor whose parent is itself an accessor.
    #[error("accessor {node} is owned by accessor {owner}")]
    AccessorOwnedByAccessor { node: NodeId, owner: NodeId },

    /// The parent chain does not terminate.
    #[error("parent chain of {node} exceeds {} levels", MAX_NESTING_DEPTH)]
    ParentChainTooDeep { node: NodeId },

    /// The node no longer carries the visibility the action was computed for.
    #[error("stale action for {node}: expected {}, found {}", describe(.expected), describe(.found))]
    StaleAction {
        node: NodeId,
        expected: Option<Visibility>,
        found: Option<Visibility>,
    },
}

fn describe(visibility: &Option<Visibility>) -> &'static str {
    visibility.map_or("no visibility", Visibility::keyword)
}

// ============================================================================
// Traits
// ============================================================================

/// Facts about one declaration node, as the host reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeFacts {
    pub kind: DeclarationKind,
    /// Raw modifiers, visibility keywords included.
    pub modifiers: Modifiers,
    pub explicit_interface_target: bool,
    /// Meaningful for `Type` nodes only.
    pub is_interface: bool,
}

/// Read side of a host tree.
pub trait DeclarationContext {
    /// Facts for `node`.
    fn facts(&self, node: NodeId) -> Result<NodeFacts, HostError>;

    /// Nearest enclosing declaration of `node`, if any.
    fn parent(&self, node: NodeId) -> Result<Option<NodeId>, HostError>;
}

/// Write side of a host tree.
pub trait RewriteSink {
    /// Replace the modifiers of `node`, leaving the rest of the node unchanged.
    fn replace_modifiers(&mut self, node: NodeId, modifiers: Modifiers) -> Result<(), HostError>;
}

// ============================================================================
// Projection
// ============================================================================

/// Nearest enclosing type of `node`, or `None` for a top-level declaration.
pub fn enclosing_type<C: DeclarationContext + ?Sized>(
    ctx: &C,
    node: NodeId,
) -> Result<Option<TypeContext>, HostError> {
    let mut current = ctx.parent(node)?;
    let mut depth = 0;
    while let Some(ancestor) = current {
        depth += 1;
        if depth > MAX_NESTING_DEPTH {
            return Err(HostError::ParentChainTooDeep { node });
        }
        let facts = ctx.facts(ancestor)?;
        if facts.kind == DeclarationKind::Type {
            return Ok(Some(TypeContext {
                is_interface: facts.is_interface,
            }));
        }
        current = ctx.parent(ancestor)?;
    }
    Ok(None)
}

/// Build the advisor's view of `node`.
///
/// For an accessor, the owning member is the accessor's parent, which must
/// not be an accessor itself. An accessor without a parent is projected
/// as-is; the advisor rejects it.
pub fn project_view<C: DeclarationContext + ?Sized>(
    ctx: &C,
    node: NodeId,
) -> Result<DeclarationView, HostError> {
    let facts = ctx.facts(node)?;
    let explicit_visibility = facts
        .modifiers
        .visibility()
        .map_err(|source| HostError::Modifiers { node, source })?;

    let enclosing_member = match facts.kind {
        DeclarationKind::Accessor => match ctx.parent(node)? {
            Some(owner) => {
                if ctx.facts(owner)?.kind == DeclarationKind::Accessor {
                    return Err(HostError::AccessorOwnedByAccessor { node, owner });
                }
                // A non-accessor owner has no enclosing member of its own.
                Some(Box::new(project_view(ctx, owner)?))
            }
            None => None,
        },
        _ => None,
    };

    Ok(DeclarationView {
        node,
        kind: facts.kind,
        explicit_visibility,
        has_explicit_interface_target: facts.explicit_interface_target,
        flags: facts.modifiers.without_visibility(),
        enclosing_type: enclosing_type(ctx, node)?,
        enclosing_member,
    })
}

// ============================================================================
// Apply
// ============================================================================

/// Apply `action` to a host: clear the node's visibility keywords, set the
/// target's, and hand the new modifier set to the sink.
///
/// Fails with [`HostError::StaleAction`] if the node's explicit visibility
/// changed since the action was computed. Returns the new modifiers.
#[tracing::instrument(skip_all, fields(node = %action.node, target = %action.target))]
pub fn apply_action<H>(host: &mut H, action: &RewriteAction) -> Result<Modifiers, HostError>
where
    H: DeclarationContext + RewriteSink + ?Sized,
{
    let node = action.node;
    let current = host.facts(node)?.modifiers;
    let found = current
        .visibility()
        .map_err(|source| HostError::Modifiers { node, source })?;

    if found != action.expected {
        return Err(HostError::StaleAction {
            node,
            expected: action.expected,
            found,
        });
    }

    let rewritten = action.rewrite(current);
    host.replace_modifiers(node, rewritten)?;
    debug!("{}: modifiers '{}' -> '{}'", node, current, rewritten);
    Ok(rewritten)
}
