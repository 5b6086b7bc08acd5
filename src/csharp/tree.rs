//! In-memory declaration outline.
//!
//! A [`DeclarationTree`] is the smallest host the advisor can run against: a
//! flat list of declarations linked by parent ids, loaded from JSON. It
//! implements both [`DeclarationContext`] and [`RewriteSink`].
//!
//! # File Format
//!
//! ```json
//! {
//!   "declarations": [
//!     { "id": 0, "name": "Widget", "kind": "type", "modifiers": ["public"] },
//!     { "id": 1, "name": "Count", "kind": "property", "modifiers": ["public"], "parent": 0 },
//!     { "id": 2, "name": "set", "kind": "accessor", "parent": 1 }
//!   ]
//! }
//! ```
//!
//! `modifiers`, `parent`, `explicit_interface` and `is_interface` are
//! optional. `modifiers` may also be source text (`"protected internal
//! static"`); it is written back as a list. Declaration order is preserved
//! on write.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use tugaccess_core::error::AccessError;

use crate::csharp::decl::{DeclarationKind, DeclarationView, NodeId};
use crate::csharp::host::{
    apply_action, project_view, DeclarationContext, HostError, NodeFacts, RewriteSink,
};
use crate::csharp::modifiers::Modifiers;
use crate::csharp::ops::change_access::{
    suggest_visibility_changes_with, AdvisorOptions, RewriteAction,
};

// ============================================================================
// Error Types
// ============================================================================

/// Errors loading or saving a declaration tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON.
    #[error("invalid tree JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Two declarations share an id.
    #[error("duplicate declaration id {node}")]
    DuplicateId { node: NodeId },

    /// A declaration names a parent that does not exist.
    #[error("{node} has unknown parent {parent}")]
    UnknownParent { node: NodeId, parent: NodeId },

    /// A parent chain loops back on itself.
    #[error("parent cycle through {node}")]
    ParentCycle { node: NodeId },

    /// An accessor whose parent is missing or cannot own accessors.
    #[error("accessor {node} must be nested in a property, indexer or event")]
    InvalidAccessorParent { node: NodeId },

    /// `is_interface` set on something other than a type.
    #[error("{node} is marked as an interface but is not a type")]
    InterfaceFlagOnMember { node: NodeId },
}

// ============================================================================
// Declarations
// ============================================================================

/// One declaration in the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: DeclarationKind,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    /// Interface named in an explicit implementation (`void IDisposable.Dispose()`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_interface: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_interface: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Declaration {
    /// Create a declaration with no modifiers and no parent.
    pub fn new(id: u32, kind: DeclarationKind) -> Self {
        Declaration {
            id: NodeId(id),
            name: None,
            kind,
            modifiers: Modifiers::NONE,
            parent: None,
            explicit_interface: None,
            is_interface: false,
        }
    }

    /// Set the name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the parent.
    pub fn child_of(mut self, parent: u32) -> Self {
        self.parent = Some(NodeId(parent));
        self
    }

    /// Mark as an explicit implementation of `interface`.
    pub fn implementing(mut self, interface: impl Into<String>) -> Self {
        self.explicit_interface = Some(interface.into());
        self
    }

    /// Mark a type declaration as an interface.
    pub fn interface(mut self) -> Self {
        self.is_interface = true;
        self
    }

    fn facts(&self) -> NodeFacts {
        NodeFacts {
            kind: self.kind,
            modifiers: self.modifiers,
            explicit_interface_target: self.explicit_interface.is_some(),
            is_interface: self.is_interface,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TreeFile {
    declarations: Vec<Declaration>,
}

// ============================================================================
// Tree
// ============================================================================

/// Declarations indexed by id.
#[derive(Debug, Clone, Default)]
pub struct DeclarationTree {
    declarations: Vec<Declaration>,
    index: HashMap<NodeId, usize>,
}

impl DeclarationTree {
    /// Build and validate a tree.
    pub fn from_declarations(declarations: Vec<Declaration>) -> Result<Self, TreeError> {
        let mut index = HashMap::with_capacity(declarations.len());
        for (i, decl) in declarations.iter().enumerate() {
            if index.insert(decl.id, i).is_some() {
                return Err(TreeError::DuplicateId { node: decl.id });
            }
        }

        let tree = DeclarationTree {
            declarations,
            index,
        };
        tree.validate()?;
        debug!("loaded declaration tree with {} nodes", tree.len());
        Ok(tree)
    }

    /// Parse a tree from JSON.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let file: TreeFile = serde_json::from_str(json)?;
        Self::from_declarations(file.declarations)
    }

    /// Read a tree from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, TreeError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, TreeError> {
        let file = TreeFile {
            declarations: self.declarations.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Write the tree to a JSON file.
    pub fn write_to(&self, path: &Path) -> Result<(), TreeError> {
        let mut json = self.to_json()?;
        json.push('\n');
        fs::write(path, json)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), TreeError> {
        for decl in &self.declarations {
            if let Some(parent) = decl.parent {
                if !self.index.contains_key(&parent) {
                    return Err(TreeError::UnknownParent {
                        node: decl.id,
                        parent,
                    });
                }
            }
            if decl.is_interface && decl.kind != DeclarationKind::Type {
                return Err(TreeError::InterfaceFlagOnMember { node: decl.id });
            }
            if decl.kind == DeclarationKind::Accessor {
                let owns = decl
                    .parent
                    .and_then(|p| self.get(p))
                    .is_some_and(|p| p.kind.owns_accessors());
                if !owns {
                    return Err(TreeError::InvalidAccessorParent { node: decl.id });
                }
            }
        }

        // Any chain longer than the node count must revisit a node.
        for decl in &self.declarations {
            let mut current = decl.parent;
            let mut steps = 0;
            while let Some(id) = current {
                steps += 1;
                if steps > self.declarations.len() {
                    return Err(TreeError::ParentCycle { node: decl.id });
                }
                current = self.get(id).and_then(|d| d.parent);
            }
        }
        Ok(())
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns true if the tree has no declarations.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Look up a declaration.
    pub fn get(&self, id: NodeId) -> Option<&Declaration> {
        self.index.get(&id).map(|&i| &self.declarations[i])
    }

    /// Declarations in file order.
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Advisor view of a node.
    pub fn view(&self, id: NodeId) -> Result<DeclarationView, HostError> {
        project_view(self, id)
    }

    /// Visibility changes offered for a node.
    pub fn suggest(
        &self,
        id: NodeId,
        options: &AdvisorOptions,
    ) -> Result<Vec<RewriteAction>, AccessError> {
        let view = self.view(id)?;
        Ok(suggest_visibility_changes_with(&view, options)?)
    }

    /// Apply a rewrite action to this tree.
    pub fn apply(&mut self, action: &RewriteAction) -> Result<Modifiers, HostError> {
        apply_action(self, action)
    }
}

impl DeclarationContext for DeclarationTree {
    fn facts(&self, node: NodeId) -> Result<NodeFacts, HostError> {
        self.get(node)
            .map(Declaration::facts)
            .ok_or(HostError::NodeNotFound { node })
    }

    fn parent(&self, node: NodeId) -> Result<Option<NodeId>, HostError> {
        self.get(node)
            .map(|d| d.parent)
            .ok_or(HostError::NodeNotFound { node })
    }
}

impl RewriteSink for DeclarationTree {
    fn replace_modifiers(&mut self, node: NodeId, modifiers: Modifiers) -> Result<(), HostError> {
        let i = *self
            .index
            .get(&node)
            .ok_or(HostError::NodeNotFound { node })?;
        self.declarations[i].modifiers = modifiers;
        Ok(())
    }
}
