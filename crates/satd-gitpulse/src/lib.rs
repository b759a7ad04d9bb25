//! Git access for SATD mining.
//!
//! Opens repositories with git2, turns revisions into [`satd_core::CommitRef`]s,
//! computes zero-context tree diffs, and walks history breadth-first into
//! (parent, child) revision pairs.

pub mod history;
pub mod repo;
