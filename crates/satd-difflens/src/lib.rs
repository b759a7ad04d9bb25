//! Diff parsing, source filtering, and hunk-based SATD inference.
//!
//! Turns `git diff` output into [`satd_core::FileDelta`] entries, selects
//! the source files that take part in mining, and decides from edit hunks
//! whether an unaligned SATD comment was added, removed, or rewritten.

pub mod extractor;
pub mod filter;
pub mod parser;
