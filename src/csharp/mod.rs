//! C# language support.
//!
//! - [`modifiers`]: the raw modifier keyword set of a declaration
//! - [`decl`]: the advisor's read-only view of a declaration
//! - [`host`]: traits a syntax tree implements to drive the advisor
//! - [`tree`]: a JSON-backed declaration outline implementing those traits
//! - [`ops`]: refactoring operations (change access modifier)

pub mod decl;
pub mod host;
pub mod modifiers;
pub mod ops;
pub mod tree;
