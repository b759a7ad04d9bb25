//! Breadth-first traversal of the commit graph into (parent, child) pairs.

use std::collections::{HashSet, VecDeque};

use satd_core::{CommitRef, GitAccess, MiningConfig};
use tracing::warn;

/// Options for walking history.
///
/// # Examples
///
/// ```
/// use satd_gitpulse::history::WalkOptions;
///
/// let opts = WalkOptions::default();
/// assert_eq!(opts.max_commits, 0);
/// assert!(!opts.first_parent_only);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Expand at most this many commits; 0 means unlimited.
    pub max_commits: usize,
    /// Only follow the first parent of merge commits.
    pub first_parent_only: bool,
}

impl From<&MiningConfig> for WalkOptions {
    fn from(config: &MiningConfig) -> Self {
        Self {
            max_commits: config.max_commits,
            first_parent_only: config.first_parent_only,
        }
    }
}

/// A commit and one of its direct parents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPair {
    pub parent: CommitRef,
    pub child: CommitRef,
}

/// Iterator over every (parent, child) edge reachable from a start commit.
///
/// Each commit is expanded once, so a merge yields one pair per parent and
/// shared ancestors are not revisited. A commit whose parents cannot be read
/// is logged and skipped; the walk continues with the rest of the queue.
pub struct HistoryWalk<'a, G: GitAccess + ?Sized> {
    git: &'a G,
    options: WalkOptions,
    queue: VecDeque<CommitRef>,
    visited: HashSet<CommitRef>,
    pending: VecDeque<CommitPair>,
    expanded: usize,
}

impl<'a, G: GitAccess + ?Sized> HistoryWalk<'a, G> {
    /// Start a walk at `head`.
    pub fn new(git: &'a G, head: CommitRef, options: WalkOptions) -> Self {
        let mut visited = HashSet::new();
        visited.insert(head.clone());
        Self {
            git,
            options,
            queue: VecDeque::from([head]),
            visited,
            pending: VecDeque::new(),
            expanded: 0,
        }
    }

    fn limit_reached(&self) -> bool {
        self.options.max_commits > 0 && self.expanded >= self.options.max_commits
    }

    fn expand_next(&mut self) -> bool {
        while let Some(child) = self.queue.pop_front() {
            if self.limit_reached() {
                self.queue.clear();
                return false;
            }
            self.expanded += 1;

            let mut parents = match child.parents(self.git) {
                Ok(parents) => parents,
                Err(e) => {
                    warn!(commit = %child, error = %e, "skipping commit with unreadable parents");
                    continue;
                }
            };
            if self.options.first_parent_only {
                parents.truncate(1);
            }
            if parents.is_empty() {
                continue;
            }

            for parent in parents {
                if self.visited.insert(parent.clone()) {
                    self.queue.push_back(parent.clone());
                }
                self.pending.push_back(CommitPair {
                    parent,
                    child: child.clone(),
                });
            }
            return true;
        }
        false
    }
}

impl<G: GitAccess + ?Sized> Iterator for HistoryWalk<'_, G> {
    type Item = CommitPair;

    fn next(&mut self) -> Option<CommitPair> {
        loop {
            if let Some(pair) = self.pending.pop_front() {
                return Some(pair);
            }
            if !self.expand_next() {
                return None;
            }
        }
    }
}
