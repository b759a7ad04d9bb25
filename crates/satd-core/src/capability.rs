//! Collaborator interfaces consumed by the alignment engine.
//!
//! The engine never touches git, a parser, or a model directly. Production
//! code plugs in the git2 / tree-sitter implementations; tests plug in
//! in-memory stubs.

use std::collections::BTreeMap;

use crate::types::{Comment, CommitRef, DebtCategory, FileDelta};
use crate::Result;

/// Read access to a repository's commit graph and trees.
pub trait GitAccess {
    /// Direct parents of `commit`, in commit order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SatdError::Git`] if the object store cannot be read.
    fn parents_of(&self, commit: &CommitRef) -> Result<Vec<CommitRef>>;

    /// Changed files between the trees of `old` and `new`, with edit hunks.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SatdError::Git`] if either tree cannot be read.
    fn changed_files(&self, old: &CommitRef, new: &CommitRef) -> Result<Vec<FileDelta>>;

    /// Every blob path in the tree of `commit`, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SatdError::Git`] if the tree cannot be walked.
    fn list_files(&self, commit: &CommitRef) -> Result<Vec<String>>;

    /// Contents of `path` as of `commit`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SatdError::Git`] if the blob is missing or unreadable,
    /// or [`crate::SatdError::Parse`] if it is not valid UTF-8.
    fn read_file(&self, commit: &CommitRef, path: &str) -> Result<String>;
}

/// Turns a revision expression (tag, branch, hash) into a commit.
pub trait RevisionResolver {
    /// # Errors
    ///
    /// Returns [`crate::SatdError::Git`] if `rev` does not name a commit.
    fn resolve(&self, rev: &str) -> Result<CommitRef>;
}

/// Decides whether a comment admits technical debt.
///
/// Must be deterministic for identical text within one comparison run.
pub trait SatdClassifier {
    /// `Ok(Some(category))` for SATD, `Ok(None)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SatdError::Classifier`] if the comment could not be
    /// classified. Callers treat this as "not SATD".
    fn classify(&self, text: &str) -> Result<Option<DebtCategory>>;
}

/// SATD comments of one revision, grouped by file, plus the files that failed.
///
/// Files iterate in path order and comments in source order, which is the
/// encounter order duplicate disambiguation relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub files: BTreeMap<String, Vec<Comment>>,
    pub errored_files: Vec<String>,
}

impl Extraction {
    /// Total number of comments across all files.
    pub fn comment_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }
}

/// Produces the SATD comments present in a revision.
pub trait CommentExtractor {
    /// Extract SATD comments from `files` of `commit`; an empty slice means
    /// every source file of the tree.
    ///
    /// Per-file failures are reported through [`Extraction::errored_files`],
    /// never as `Err`.
    ///
    /// # Errors
    ///
    /// Returns an error only when the revision itself cannot be read.
    fn extract(&self, commit: &CommitRef, files: &[String]) -> Result<Extraction>;
}
