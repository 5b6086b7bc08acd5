//! Change-access-modifier operation.
//!
//! Given a [`DeclarationView`], computes every visibility level the
//! declaration may legally be changed to, and describes each change as a
//! [`RewriteAction`]:
//!
//! 1. Check the accessor/owner contract of the view
//! 2. Exclude declarations that carry no accessibility, or whose visibility
//!    is tied to an inheritance contract
//! 3. Resolve the actual (possibly implicit) visibility
//! 4. Enumerate levels in fixed order, skipping illegal and no-op targets
//!
//! The operation is pure: it reads the view and returns actions. Applying an
//! action is the host's job (see [`apply_action`](crate::csharp::host::apply_action)).
//!
//! See [`suggest_visibility_changes`] for the main entry point.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use tugaccess_core::output::ActionInfo;
use tugaccess_core::visibility::Visibility;

use crate::csharp::decl::{DeclarationKind, DeclarationView, NodeId, ViewDefect};
use crate::csharp::modifiers::Modifiers;

// ============================================================================
// Error Types
// ============================================================================

/// Contract violations in the view handed to the advisor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisorError {
    /// An accessor view without its owning property, indexer or event.
    #[error("accessor {node} has no enclosing member")]
    MissingEnclosingMember { node: NodeId },

    /// A non-accessor view that names an owning member.
    #[error("{node} is not an accessor but has an enclosing member")]
    UnexpectedEnclosingMember { node: NodeId },
}

impl AdvisorError {
    /// Node the violation was found on.
    pub fn node(&self) -> NodeId {
        match self {
            AdvisorError::MissingEnclosingMember { node }
            | AdvisorError::UnexpectedEnclosingMember { node } => *node,
        }
    }
}

/// Result type for the advisor.
pub type AdvisorResult<T> = Result<T, AdvisorError>;

// ============================================================================
// Options
// ============================================================================

/// Advisor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvisorOptions {
    /// Offer `protected internal` to top-level declarations.
    ///
    /// At top level it means the same as `internal`, so it is off by default.
    pub top_level_protected_internal: bool,
}

// ============================================================================
// Rewrite Action
// ============================================================================

/// One offerable visibility change.
///
/// Applying it replaces the node with a copy whose visibility keywords are
/// exactly those of `target`; every other modifier is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteAction {
    /// Human-readable choice, e.g. "To protected internal".
    pub label: String,
    /// Level the declaration is changed to.
    pub target: Visibility,
    /// Node to rewrite.
    pub node: NodeId,
    /// Explicit visibility the node carried when the action was computed.
    pub expected: Option<Visibility>,
}

impl RewriteAction {
    fn for_view(view: &DeclarationView, target: Visibility) -> Self {
        RewriteAction {
            label: label_for(target),
            target,
            node: view.node,
            expected: view.explicit_visibility,
        }
    }

    /// Modifiers of the rewritten node, given the node's current modifiers.
    pub fn rewrite(&self, modifiers: Modifiers) -> Modifiers {
        modifiers.with_visibility(self.target)
    }

    /// Output form for JSON responses.
    pub fn to_info(&self) -> ActionInfo {
        ActionInfo {
            label: self.label.clone(),
            target: self.target,
            node: self.node.0,
        }
    }
}

/// Label shown to the user for a target level.
pub fn label_for(target: Visibility) -> String {
    format!("To {}", target.keyword())
}

// ============================================================================
// Exclusions
// ============================================================================

/// Why a declaration is never offered a visibility change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    EnumMember,
    InterfaceMember,
    ExplicitInterfaceImplementation,
    /// `override`, `virtual`, `new` or `abstract`.
    InheritanceModifier,
}

impl Exclusion {
    pub fn reason(self) -> &'static str {
        match self {
            Exclusion::EnumMember => "enum members have no access modifiers",
            Exclusion::InterfaceMember => "interface members have no access modifiers",
            Exclusion::ExplicitInterfaceImplementation => {
                "explicit interface implementations have no access modifiers"
            }
            Exclusion::InheritanceModifier => {
                "visibility is tied to an override, virtual, new or abstract contract"
            }
        }
    }

    /// Returns true if the excluded declaration still has a visibility.
    pub fn carries_accessibility(self) -> bool {
        matches!(self, Exclusion::InheritanceModifier)
    }
}

/// First exclusion rule that applies to `view`, if any.
pub fn exclusion(view: &DeclarationView) -> Option<Exclusion> {
    if view.kind == DeclarationKind::EnumMember {
        return Some(Exclusion::EnumMember);
    }
    if view.enclosing_type.is_some_and(|t| t.is_interface) {
        return Some(Exclusion::InterfaceMember);
    }
    if view.has_explicit_interface_target {
        return Some(Exclusion::ExplicitInterfaceImplementation);
    }
    if view.flags.intersects(Modifiers::INHERITANCE) {
        return Some(Exclusion::InheritanceModifier);
    }
    None
}

// ============================================================================
// Resolution
// ============================================================================

fn check_contract(view: &DeclarationView) -> AdvisorResult<()> {
    view.validate().map_err(|defect| match defect {
        ViewDefect::MissingEnclosingMember => AdvisorError::MissingEnclosingMember { node: view.node },
        ViewDefect::UnexpectedEnclosingMember => {
            AdvisorError::UnexpectedEnclosingMember { node: view.node }
        }
    })?;
    match &view.enclosing_member {
        Some(owner) => check_contract(owner),
        None => Ok(()),
    }
}

fn owner_of(view: &DeclarationView) -> AdvisorResult<&DeclarationView> {
    view.enclosing_member
        .as_deref()
        .ok_or(AdvisorError::MissingEnclosingMember { node: view.node })
}

/// Resolve the actual visibility of a declaration.
///
/// - explicit visibility, if the node has one;
/// - for an accessor, the resolved visibility of its owning member;
/// - `internal` for a top-level declaration;
/// - `private` otherwise.
pub fn resolve_actual(view: &DeclarationView) -> AdvisorResult<Visibility> {
    if let Some(explicit) = view.explicit_visibility {
        return Ok(explicit);
    }
    if view.kind == DeclarationKind::Accessor {
        return resolve_actual(owner_of(view)?);
    }
    if view.is_top_level() {
        Ok(Visibility::Internal)
    } else {
        Ok(Visibility::Private)
    }
}

/// Visibility to report for a declaration.
///
/// `None` for declarations that carry no accessibility at all (enum members,
/// interface members, explicit interface implementations).
pub fn current_visibility(view: &DeclarationView) -> AdvisorResult<Option<Visibility>> {
    check_contract(view)?;
    match exclusion(view) {
        Some(e) if !e.carries_accessibility() => Ok(None),
        _ => resolve_actual(view).map(Some),
    }
}

// ============================================================================
// Main Implementation
// ============================================================================

/// Compute the visibility changes that may be offered for `view`, with
/// default options.
///
/// Returns at most five actions, ordered private, protected,
/// protected internal, internal, public. Malformed views are rejected with
/// an [`AdvisorError`].
pub fn suggest_visibility_changes(view: &DeclarationView) -> AdvisorResult<Vec<RewriteAction>> {
    suggest_visibility_changes_with(view, &AdvisorOptions::default())
}

/// Compute the visibility changes that may be offered for `view`.
#[tracing::instrument(skip_all, fields(node = %view.node))]
pub fn suggest_visibility_changes_with(
    view: &DeclarationView,
    options: &AdvisorOptions,
) -> AdvisorResult<Vec<RewriteAction>> {
    check_contract(view)?;

    if let Some(excluded) = exclusion(view) {
        debug!("{}: {}; no changes offered", view.node, excluded.reason());
        return Ok(Vec::new());
    }

    let actual = resolve_actual(view)?;
    // Accessors may only narrow their owner's visibility.
    let ceiling = match view.kind {
        DeclarationKind::Accessor => Some(resolve_actual(owner_of(view)?)?),
        _ => None,
    };

    let actions: Vec<RewriteAction> = Visibility::ALL
        .into_iter()
        .filter(|&level| {
            let skip = skip_reason(view, level, actual, ceiling, options);
            if let Some(reason) = skip {
                trace!("{}: skipping {}: {}", view.node, level, reason);
            }
            skip.is_none()
        })
        .map(|level| RewriteAction::for_view(view, level))
        .collect();

    debug!(
        "{}: actual visibility {}, {} change(s) offered",
        view.node,
        actual,
        actions.len()
    );
    Ok(actions)
}

fn skip_reason(
    view: &DeclarationView,
    level: Visibility,
    actual: Visibility,
    ceiling: Option<Visibility>,
    options: &AdvisorOptions,
) -> Option<&'static str> {
    if view.is_top_level() {
        match level {
            Visibility::Private | Visibility::Protected => {
                return Some("top-level declarations can only be public or internal");
            }
            Visibility::ProtectedInternal if !options.top_level_protected_internal => {
                return Some("protected internal is internal at top level");
            }
            _ => {}
        }
    }
    if let Some(owner) = ceiling {
        if !level.is_stricter_than(owner) {
            return Some("accessors may only be stricter than their owner");
        }
    }
    if level == actual {
        return Some("already the actual visibility");
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
