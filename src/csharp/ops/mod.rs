//! C# refactoring operations.

pub mod change_access;

pub use change_access::{
    suggest_visibility_changes, suggest_visibility_changes_with, AdvisorError, AdvisorOptions,
    RewriteAction,
};
