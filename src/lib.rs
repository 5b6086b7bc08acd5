//! Tugaccess: visibility refactoring for C# declarations
//!
//! Given a declaration and its surrounding context, computes the set of
//! accessibility changes that are valid for it and applies the chosen one
//! as a modifier rewrite.

// Core infrastructure - re-exported from tugaccess-core
pub use tugaccess_core::error;
pub use tugaccess_core::output;
pub use tugaccess_core::visibility;

// Front door for agents
pub mod cli;

// Language adapter
pub mod csharp;

// Error bridges - converts C#-specific errors to AccessError
mod error_bridges;
