//! Core infrastructure for tugaccess.
//!
//! This crate provides language-agnostic infrastructure:
//! - Visibility lattice (accessibility levels and the stricter-than order)
//! - Error types and error codes
//! - JSON output types for CLI responses

pub mod error;
pub mod output;
pub mod visibility;
