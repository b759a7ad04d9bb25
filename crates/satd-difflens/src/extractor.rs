//! File-level delta between two revisions and hunk-based add/remove inference.
//!
//! [`CommitDiff`] holds the source-file entries of one revision pair. Given
//! a SATD comment that could not be aligned by content or location, it
//! decides from the edit hunks whether the comment was introduced, removed,
//! or rewritten at this boundary.

use std::collections::HashSet;

use satd_core::{DeltaStatus, DiffHunk, FileDelta, Resolution, SatdInFile, SatdInstance};
use tracing::debug;

use crate::filter::SourceFilter;

/// The changed source files between an old and a new revision.
///
/// # Examples
///
/// ```
/// use satd_difflens::extractor::CommitDiff;
/// use satd_difflens::filter::SourceFilter;
/// use satd_difflens::parser::parse_unified_diff;
///
/// let patch = "\
/// diff --git a/src/Foo.java b/src/Foo.java
/// --- a/src/Foo.java
/// +++ b/src/Foo.java
/// @@ -1 +1,2 @@
///  class Foo {}
/// +// TODO
/// diff --git a/README.md b/README.md
/// --- a/README.md
/// +++ b/README.md
/// @@ -1 +1 @@
/// -a
/// +b
/// ";
/// let diff = CommitDiff::new(parse_unified_diff(patch).unwrap(), &SourceFilter::default_filter());
/// assert_eq!(diff.modified_files_new(), vec!["src/Foo.java"]);
/// ```
#[derive(Debug, Clone)]
pub struct CommitDiff {
    entries: Vec<FileDelta>,
    filter: SourceFilter,
}

impl CommitDiff {
    /// Keep the entries where either side is a source file.
    pub fn new(entries: Vec<FileDelta>, filter: &SourceFilter) -> Self {
        let entries = entries
            .into_iter()
            .filter(|e| {
                e.old_path.as_deref().is_some_and(|p| filter.is_source(p))
                    || e.new_path.as_deref().is_some_and(|p| filter.is_source(p))
            })
            .collect();
        Self {
            entries,
            filter: filter.clone(),
        }
    }

    /// All retained entries.
    pub fn entries(&self) -> &[FileDelta] {
        &self.entries
    }

    /// Old-side paths of changed entries, test code excluded.
    pub fn modified_files_old(&self) -> Vec<String> {
        self.modified_paths(|e| e.old_path.as_deref())
    }

    /// New-side paths of changed entries, test code excluded.
    pub fn modified_files_new(&self) -> Vec<String> {
        self.modified_paths(|e| e.new_path.as_deref())
    }

    fn modified_paths<'a>(&'a self, side: impl Fn(&'a FileDelta) -> Option<&'a str>) -> Vec<String> {
        let mut seen = HashSet::new();
        let paths = self
            .entries
            .iter()
            .filter_map(side)
            .filter(|p| seen.insert(*p))
            .map(String::from)
            .collect();
        let result = self.filter.filter(paths);
        for skipped in &result.skipped {
            debug!(path = %skipped.path, reason = %skipped.reason, "not mined");
        }
        result.kept
    }

    fn entry_for_old(&self, path: &str) -> Option<&FileDelta> {
        self.entries
            .iter()
            .find(|e| e.old_path.as_deref() == Some(path))
    }

    fn entry_for_new(&self, path: &str) -> Option<&FileDelta> {
        self.entries
            .iter()
            .find(|e| e.new_path.as_deref() == Some(path))
    }

    /// Infer what happened to an unaligned old-side comment in `path`.
    ///
    /// - file deleted: `REMOVED`
    /// - comment lines overlap a hunk: `CHANGED` against the first of
    ///   `candidates` (unaligned new-side comments) in the entry's new file
    ///   that overlaps the hunk's replacement lines, otherwise `REMOVED`
    /// - file untouched, or comment outside every hunk: empty
    ///
    /// The empty result tells the caller the diff says nothing about this
    /// comment. At most one instance is returned.
    pub fn instances_for_old_file(
        &self,
        path: &str,
        old: &SatdInFile,
        candidates: &[&SatdInFile],
    ) -> Vec<SatdInstance> {
        let Some(entry) = self.entry_for_old(path) else {
            return Vec::new();
        };

        if entry.status == DeltaStatus::Deleted {
            return vec![SatdInstance::removed(old.clone())];
        }

        let Some(hunk) = first_overlapping(&entry.hunks, old, DiffHunk::old_range) else {
            return Vec::new();
        };

        let replacement = entry.new_path.as_deref().and_then(|new_path| {
            let (start, end) = hunk.new_range()?;
            candidates
                .iter()
                .find(|c| c.file == new_path && c.comment.overlaps(start, end))
        });

        match replacement {
            Some(new) => vec![SatdInstance::paired(
                old.clone(),
                (*new).clone(),
                Resolution::Changed,
            )],
            None => vec![SatdInstance::removed(old.clone())],
        }
    }

    /// Infer whether an unaligned new-side comment in `path` was introduced.
    ///
    /// `ADDED` when the file is new or the comment overlaps an inserted or
    /// replaced region; empty when the diff does not cover it.
    pub fn instances_for_new_file(&self, path: &str, new: &SatdInFile) -> Vec<SatdInstance> {
        let Some(entry) = self.entry_for_new(path) else {
            return Vec::new();
        };

        let introduced = entry.status == DeltaStatus::Added
            || first_overlapping(&entry.hunks, new, DiffHunk::new_range).is_some();

        if introduced {
            vec![SatdInstance::added(new.clone())]
        } else {
            Vec::new()
        }
    }
}

fn first_overlapping<'a>(
    hunks: &'a [DiffHunk],
    located: &SatdInFile,
    range: fn(&DiffHunk) -> Option<(u32, u32)>,
) -> Option<&'a DiffHunk> {
    hunks.iter().find(|h| {
        range(h).is_some_and(|(start, end)| located.comment.overlaps(start, end))
    })
}
