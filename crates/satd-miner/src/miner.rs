//! One revision-pair comparison, end to end.
//!
//! [`DiffMiner::mine_diff`] extracts SATD on both sides, aligns the two
//! comment sets, infers the leftovers from the diff, resolves every pair,
//! and aggregates the instances into a [`SatdDifference`].

use std::collections::{BTreeSet, HashSet};

use satd_core::{
    CommentExtractor, CommitRef, ComparisonMode, Extraction, GitAccess, Resolution,
    RevisionResolver, SatdClassifier, SatdDifference, SatdInFile, SatdInstance, SatdSnapshot,
    SnapshotEntry,
};
use satd_difflens::extractor::CommitDiff;
use satd_difflens::filter::SourceFilter;
use tracing::{debug, info};

use crate::align::{build_mappings, Alignment, MatchState};
use crate::resolve::resolve_pair;

/// Direct-parent mode when either commit is a direct parent of the other,
/// release mode otherwise.
pub fn comparison_mode(old: &CommitRef, new: &CommitRef) -> ComparisonMode {
    if CommitRef::is_ancestor_relationship(new, old) || CommitRef::is_ancestor_relationship(old, new)
    {
        ComparisonMode::DirectParent
    } else {
        ComparisonMode::Release
    }
}

/// Compares revisions using injected git, extraction and classification.
pub struct DiffMiner<'a, G, E, C>
where
    G: GitAccess + ?Sized,
    E: CommentExtractor + ?Sized,
    C: SatdClassifier + ?Sized,
{
    git: &'a G,
    extractor: &'a E,
    classifier: &'a C,
    filter: SourceFilter,
}

impl<'a, G, E, C> DiffMiner<'a, G, E, C>
where
    G: GitAccess + ?Sized,
    E: CommentExtractor + ?Sized,
    C: SatdClassifier + ?Sized,
{
    pub fn new(git: &'a G, extractor: &'a E, classifier: &'a C, filter: SourceFilter) -> Self {
        Self {
            git,
            extractor,
            classifier,
            filter,
        }
    }

    /// The git access this miner reads from.
    pub fn git(&self) -> &'a G {
        self.git
    }

    /// Compute every SATD change between `old` and `new`.
    ///
    /// Files that fail extraction on either side are listed in
    /// [`SatdDifference::errored_files`] and produce no instances.
    ///
    /// # Errors
    ///
    /// Returns [`satd_core::SatdError::Git`] if either tree or the diff
    /// between them cannot be read.
    pub fn mine_diff(&self, old: &CommitRef, new: &CommitRef) -> satd_core::Result<SatdDifference> {
        let mode = comparison_mode(old, new);
        let diff = CommitDiff::new(self.git.changed_files(old, new)?, &self.filter);

        let (old_extraction, new_extraction) = match mode {
            ComparisonMode::DirectParent => (
                self.extract_files(old, &diff.modified_files_old())?,
                self.extract_files(new, &diff.modified_files_new())?,
            ),
            ComparisonMode::Release => (
                self.extractor.extract(old, &[])?,
                self.extractor.extract(new, &[])?,
            ),
        };

        let errored_files: Vec<String> = old_extraction
            .errored_files
            .iter()
            .chain(&new_extraction.errored_files)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut alignment = Alignment::new(
            build_mappings(&old_extraction),
            build_mappings(&new_extraction),
        );
        let errored: HashSet<&str> = errored_files.iter().map(String::as_str).collect();
        alignment.exclude_files(&errored);
        alignment.align_by_content();
        if mode == ComparisonMode::Release {
            alignment.align_by_location();
        }

        let old_inferred = infer_old(&mut alignment, &diff);
        absorb_inferred(&mut alignment, &old_inferred);
        let new_inferred = infer_new(&mut alignment, &diff);

        let mut instances = Vec::new();
        if mode == ComparisonMode::Release {
            instances.extend(self.cross_matched(&alignment));
        }
        instances.extend(old_inferred);
        instances.extend(new_inferred);

        let summary = alignment.summary();
        info!(
            old = %old,
            new = %new,
            %mode,
            instances = instances.len(),
            errored = errored_files.len(),
            "mined SATD difference"
        );

        Ok(SatdDifference {
            project: new.project.clone(),
            old_commit: old.clone(),
            new_commit: new.clone(),
            mode,
            instances,
            errored_files,
            summary,
        })
    }

    /// All SATD present in `commit`, each with its stable instance id.
    ///
    /// # Errors
    ///
    /// Returns an error if the revision cannot be read.
    pub fn snapshot(&self, commit: &CommitRef) -> satd_core::Result<SatdSnapshot> {
        let extraction = self.extractor.extract(commit, &[])?;
        let entries = build_mappings(&extraction)
            .into_iter()
            .map(|m| SnapshotEntry {
                instance_id: m.satd.instance_id(),
                satd: m.satd,
            })
            .collect();
        Ok(SatdSnapshot {
            project: commit.project.clone(),
            commit: commit.clone(),
            entries,
            errored_files: extraction.errored_files,
        })
    }

    fn extract_files(&self, commit: &CommitRef, files: &[String]) -> satd_core::Result<Extraction> {
        // An empty list would mean the whole tree
        if files.is_empty() {
            return Ok(Extraction::default());
        }
        self.extractor.extract(commit, files)
    }

    fn cross_matched(&self, alignment: &Alignment) -> Vec<SatdInstance> {
        alignment
            .matched_pairs()
            .into_iter()
            .map(|(old_idx, new_idx)| {
                let old = &alignment.old[old_idx].satd;
                let new = &alignment.new[new_idx].satd;
                let resolution = resolve_pair(&old.comment.text, &new.comment.text, self.classifier);
                SatdInstance::paired(old.clone(), new.clone(), resolution)
            })
            .collect()
    }
}

impl<G, E, C> DiffMiner<'_, G, E, C>
where
    G: GitAccess + RevisionResolver + ?Sized,
    E: CommentExtractor + ?Sized,
    C: SatdClassifier + ?Sized,
{
    /// Resolve two revision expressions and compare them.
    ///
    /// # Errors
    ///
    /// Returns [`satd_core::SatdError::Git`] if either revision does not
    /// resolve or the comparison fails.
    pub fn compare(&self, old_rev: &str, new_rev: &str) -> satd_core::Result<SatdDifference> {
        let old = self.git.resolve(old_rev)?;
        let new = self.git.resolve(new_rev)?;
        debug!(%old_rev, %new_rev, old = %old, new = %new, "resolved revisions");
        self.mine_diff(&old, &new)
    }
}

/// Diff inference for the old side.
///
/// A replacement claimed by a `CHANGED` instance is withheld from later
/// old mappings so no new comment is paired twice.
fn infer_old(alignment: &mut Alignment, diff: &CommitDiff) -> Vec<SatdInstance> {
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut instances = Vec::new();

    for old_idx in alignment.unmatched_old() {
        let open_new: Vec<usize> = alignment
            .unmatched_new()
            .into_iter()
            .filter(|idx| !claimed.contains(idx))
            .collect();
        let candidates: Vec<&SatdInFile> = open_new.iter().map(|&i| &alignment.new[i].satd).collect();
        let old = &alignment.old[old_idx].satd;

        let inferred = diff.instances_for_old_file(&old.file, old, &candidates);
        if let Some(new) = inferred.first().and_then(SatdInstance::new_side) {
            if let Some(&new_idx) = open_new.iter().find(|&&i| alignment.new[i].satd == *new) {
                claimed.insert(new_idx);
            }
        }

        if inferred.is_empty() {
            debug!(file = %old.file, line = old.comment.start_line, "old comment untouched by diff");
            alignment.old[old_idx].bind(MatchState::Untouched);
        } else {
            alignment.old[old_idx].bind(MatchState::DiffInferred);
            instances.extend(inferred);
        }
    }

    debug!(instances = instances.len(), "old-side diff inference");
    instances
}

/// Second alignment pass: bind new mappings already reported as the new
/// side of an old-side inference so they are not reported again.
fn absorb_inferred(alignment: &mut Alignment, old_inferred: &[SatdInstance]) {
    let mut targets: Vec<&SatdInFile> = old_inferred
        .iter()
        .filter_map(SatdInstance::new_side)
        .collect();

    for new_idx in alignment.unmatched_new() {
        let satd = &alignment.new[new_idx].satd;
        if let Some(pos) = targets.iter().position(|t| *t == satd) {
            targets.swap_remove(pos);
            alignment.new[new_idx].bind(MatchState::DiffInferred);
        }
    }
}

fn infer_new(alignment: &mut Alignment, diff: &CommitDiff) -> Vec<SatdInstance> {
    let mut instances = Vec::new();
    for new_idx in alignment.unmatched_new() {
        let new = &alignment.new[new_idx].satd;
        let inferred = diff.instances_for_new_file(&new.file, new);
        if inferred.is_empty() {
            debug!(file = %new.file, line = new.comment.start_line, "new comment untouched by diff");
            alignment.new[new_idx].bind(MatchState::Untouched);
        } else {
            alignment.new[new_idx].bind(MatchState::DiffInferred);
            instances.extend(inferred);
        }
    }
    debug!(
        instances = instances.len(),
        added = instances.iter().filter(|i| i.resolution() == Resolution::Added).count(),
        "new-side diff inference"
    );
    instances
}
