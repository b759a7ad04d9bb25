//! SATD comment extraction.
//!
//! Parses Java sources with tree-sitter, attributes each comment to its
//! enclosing class and method, and classifies comments by keyword to find
//! self-admitted technical debt.

pub mod classify;
pub mod extract;
