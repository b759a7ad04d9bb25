//! Cross-revision comment alignment.
//!
//! Each side of a comparison becomes a list of [`CommentMapping`]s. Passes
//! then bind old and new mappings to each other. A mapping is bound at most
//! once; every later pass only sees the mappings still [`MatchState::Unmatched`].

use std::collections::{HashMap, HashSet};

use satd_core::{AlignmentSummary, Extraction, SatdInFile};
use tracing::debug;

/// Where a mapping ended up.
///
/// The index in the matched variants points into the other side's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    Unmatched,
    /// Bound to the mapping at this index by identical text.
    ContentMatched(usize),
    /// Bound to the mapping at this index by file, class and method.
    LocationMatched(usize),
    /// Resolved from the diff hunks.
    DiffInferred,
    /// The file failed extraction on one side; no instance is produced.
    Excluded,
    /// The diff does not touch the comment; no instance is produced.
    Untouched,
}

/// A located SATD comment plus its alignment state.
#[derive(Debug, Clone)]
pub struct CommentMapping {
    pub satd: SatdInFile,
    state: MatchState,
}

impl CommentMapping {
    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn is_unmatched(&self) -> bool {
        self.state == MatchState::Unmatched
    }

    /// Move out of `Unmatched`.
    ///
    /// # Panics
    ///
    /// Panics if the mapping was already bound. Two passes claiming the same
    /// mapping would duplicate it in the output.
    pub fn bind(&mut self, state: MatchState) {
        assert!(
            self.is_unmatched(),
            "comment mapping {}:{} bound twice ({:?} then {:?})",
            self.satd.file,
            self.satd.comment.start_line,
            self.state,
            state
        );
        self.state = state;
    }
}

/// Flatten an extraction into mappings, assigning duplication ids.
///
/// Comments with identical text in the same file are numbered 0, 1, 2, ...
/// in extraction order (file path order, then source order), so identical
/// boilerplate in different methods stays distinct.
///
/// # Examples
///
/// ```
/// use satd_core::{Comment, DebtCategory, Extraction};
/// use satd_miner::align::build_mappings;
///
/// let todo = |line, method: &str| Comment {
///     text: "// TODO".into(),
///     start_line: line,
///     end_line: line,
///     containing_class: "Foo".into(),
///     containing_method: Some(method.into()),
///     category: DebtCategory::Implementation,
/// };
/// let mut extraction = Extraction::default();
/// extraction
///     .files
///     .insert("Foo.java".into(), vec![todo(3, "read"), todo(9, "write")]);
///
/// let mappings = build_mappings(&extraction);
/// assert_eq!(mappings[0].satd.duplication_id, 0);
/// assert_eq!(mappings[1].satd.duplication_id, 1);
/// ```
pub fn build_mappings(extraction: &Extraction) -> Vec<CommentMapping> {
    let mut mappings = Vec::with_capacity(extraction.comment_count());
    for (file, comments) in &extraction.files {
        let mut seen: HashMap<&str, u32> = HashMap::new();
        for comment in comments {
            let counter = seen.entry(comment.text.as_str()).or_insert(0);
            mappings.push(CommentMapping {
                satd: SatdInFile::new(file.clone(), comment.clone(), *counter),
                state: MatchState::Unmatched,
            });
            *counter += 1;
        }
    }
    mappings
}

/// The two mapping lists of one comparison.
#[derive(Debug, Clone)]
pub struct Alignment {
    pub old: Vec<CommentMapping>,
    pub new: Vec<CommentMapping>,
}

impl Alignment {
    pub fn new(old: Vec<CommentMapping>, new: Vec<CommentMapping>) -> Self {
        Self { old, new }
    }

    /// Indices of old mappings not yet bound, in order.
    pub fn unmatched_old(&self) -> Vec<usize> {
        unmatched(&self.old)
    }

    /// Indices of new mappings not yet bound, in order.
    pub fn unmatched_new(&self) -> Vec<usize> {
        unmatched(&self.new)
    }

    /// Bind every mapping in an errored file, on both sides, to [`MatchState::Excluded`].
    ///
    /// Returns the number of (old, new) mappings excluded.
    pub fn exclude_files(&mut self, errored: &HashSet<&str>) -> (usize, usize) {
        let mut excluded = (0, 0);
        for idx in self.unmatched_old() {
            if errored.contains(self.old[idx].satd.file.as_str()) {
                self.old[idx].bind(MatchState::Excluded);
                excluded.0 += 1;
            }
        }
        for idx in self.unmatched_new() {
            if errored.contains(self.new[idx].satd.file.as_str()) {
                self.new[idx].bind(MatchState::Excluded);
                excluded.1 += 1;
            }
        }
        excluded
    }

    /// Bind each unmatched old mapping to the first unmatched new mapping with
    /// identical text, wherever it lives. Returns the number of pairs bound.
    pub fn align_by_content(&mut self) -> usize {
        let mut bound = 0;
        for old_idx in unmatched(&self.old) {
            let candidate = self.new.iter().position(|n| {
                n.is_unmatched() && n.satd.comment.content_eq(&self.old[old_idx].satd.comment)
            });
            if let Some(new_idx) = candidate {
                self.old[old_idx].bind(MatchState::ContentMatched(new_idx));
                self.new[new_idx].bind(MatchState::ContentMatched(old_idx));
                bound += 1;
            }
        }
        debug!(pairs = bound, "content alignment");
        bound
    }

    /// Bind each unmatched old mapping to the first unmatched new mapping in
    /// the same file, class and method. Returns the number of pairs bound.
    pub fn align_by_location(&mut self) -> usize {
        let mut bound = 0;
        for old_idx in unmatched(&self.old) {
            let candidate = self
                .new
                .iter()
                .position(|n| n.is_unmatched() && n.satd.location_eq(&self.old[old_idx].satd));
            if let Some(new_idx) = candidate {
                self.old[old_idx].bind(MatchState::LocationMatched(new_idx));
                self.new[new_idx].bind(MatchState::LocationMatched(old_idx));
                bound += 1;
            }
        }
        debug!(pairs = bound, "location alignment");
        bound
    }

    /// Every (old, new) index pair bound by content or location, in old order.
    pub fn matched_pairs(&self) -> Vec<(usize, usize)> {
        self.old
            .iter()
            .enumerate()
            .filter_map(|(idx, m)| match m.state {
                MatchState::ContentMatched(n) | MatchState::LocationMatched(n) => Some((idx, n)),
                _ => None,
            })
            .collect()
    }

    /// Count how every mapping ended up.
    pub fn summary(&self) -> AlignmentSummary {
        let mut s = AlignmentSummary {
            old_total: self.old.len(),
            new_total: self.new.len(),
            ..AlignmentSummary::default()
        };
        for m in &self.old {
            match m.state {
                MatchState::ContentMatched(_) => s.content_matched += 1,
                MatchState::LocationMatched(_) => s.location_matched += 1,
                MatchState::DiffInferred => s.old_inferred += 1,
                MatchState::Excluded => s.old_excluded += 1,
                MatchState::Untouched | MatchState::Unmatched => s.old_untouched += 1,
            }
        }
        for m in &self.new {
            match m.state {
                MatchState::DiffInferred => s.new_inferred += 1,
                MatchState::Excluded => s.new_excluded += 1,
                MatchState::Untouched | MatchState::Unmatched => s.new_untouched += 1,
                MatchState::ContentMatched(_) | MatchState::LocationMatched(_) => {}
            }
        }
        s
    }
}

fn unmatched(mappings: &[CommentMapping]) -> Vec<usize> {
    mappings
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_unmatched())
        .map(|(idx, _)| idx)
        .collect()
}
