//! CLI front door for agent integration.
//!
//! Provides the command-line helpers for tugaccess operations:
//! - `suggest` - List the visibility changes offered for a declaration
//! - `apply` - Change a declaration's visibility to an offered level
//!
//! Both operate on a declaration tree file (see [`crate::csharp::tree`]).
//!
//! ## Error Handling
//!
//! All functions return `Result<T, AccessError>`. The `AccessError` type
//! provides stable error codes for JSON output.

use std::path::Path;

use tracing::info;

use tugaccess_core::error::AccessError;
use tugaccess_core::output::{ApplyResponse, SuggestResponse};
use tugaccess_core::visibility::Visibility;

use crate::csharp::decl::NodeId;
use crate::csharp::ops::change_access::{current_visibility, AdvisorOptions};
use crate::csharp::tree::DeclarationTree;

/// Load a declaration tree, reporting a missing file as `FileNotFound`.
pub fn load_tree(path: &Path) -> Result<DeclarationTree, AccessError> {
    if !path.is_file() {
        return Err(AccessError::file_not_found(path.display().to_string()));
    }
    Ok(DeclarationTree::from_path(path)?)
}

/// Compute the visibility changes offered for `node`.
///
/// # Arguments
///
/// * `tree` - Declaration tree to read
/// * `node` - Id of the declaration
/// * `options` - Advisor configuration
pub fn suggest(
    tree: &DeclarationTree,
    node: u32,
    options: &AdvisorOptions,
) -> Result<SuggestResponse, AccessError> {
    let id = NodeId(node);
    let current = current_visibility(&tree.view(id)?)?;
    let actions = tree.suggest(id, options)?;

    let name = tree.get(id).and_then(|d| d.name.clone());
    Ok(SuggestResponse::new(
        node,
        name,
        current,
        actions.iter().map(|a| a.to_info()).collect(),
    ))
}

/// Change the visibility of `node` to `to`.
///
/// The advisor is re-run first; `to` must be one of the offered levels.
///
/// # Returns
///
/// The apply response. The tree is modified in place; writing it back is
/// the caller's decision.
pub fn apply(
    tree: &mut DeclarationTree,
    node: u32,
    to: Visibility,
    options: &AdvisorOptions,
) -> Result<ApplyResponse, AccessError> {
    let id = NodeId(node);
    let action = tree
        .suggest(id, options)?
        .into_iter()
        .find(|a| a.target == to)
        .ok_or_else(|| {
            AccessError::apply(
                format!("changing {} to {} is not offered", id, to),
                Some(node),
            )
        })?;

    let modifiers = tree.apply(&action)?;
    info!("{}: {} applied", id, action.label);

    Ok(ApplyResponse::new(
        node,
        action.expected,
        to,
        modifiers.keywords().into_iter().map(String::from).collect(),
        false,
    ))
}

/// Run `suggest` against a tree file.
pub fn run_suggest(
    tree_path: &Path,
    node: u32,
    options: &AdvisorOptions,
) -> Result<SuggestResponse, AccessError> {
    let tree = load_tree(tree_path)?;
    suggest(&tree, node, options)
}

/// Run `apply` against a tree file, optionally writing the result back.
pub fn run_apply(
    tree_path: &Path,
    node: u32,
    to: Visibility,
    options: &AdvisorOptions,
    write: bool,
) -> Result<ApplyResponse, AccessError> {
    let mut tree = load_tree(tree_path)?;
    let mut response = apply(&mut tree, node, to, options)?;
    if write {
        tree.write_to(tree_path)?;
        response.written = true;
    }
    Ok(response)
}
