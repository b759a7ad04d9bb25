use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The repository a revision belongs to.
///
/// # Examples
///
/// ```
/// use satd_core::ProjectInfo;
///
/// let project = ProjectInfo::new("commons-io", "https://github.com/apache/commons-io");
/// assert_eq!(project.name, "commons-io");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    /// Short project name (usually the repository directory name).
    pub name: String,
    /// Remote URL, or the local path when no remote is configured.
    pub uri: String,
}

impl ProjectInfo {
    /// Create project identity from a name and URI.
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
        }
    }
}

/// One repository revision.
///
/// Equality and hashing use the commit id only, so a `CommitRef` can key
/// maps and visited-sets during a history walk without touching the object
/// store again.
///
/// # Examples
///
/// ```
/// use satd_core::{CommitRef, ProjectInfo};
///
/// let project = ProjectInfo::new("demo", "/tmp/demo");
/// let parent = CommitRef::new("aaaa", 10, 10, project.clone(), vec![]);
/// let child = CommitRef::new("bbbb", 20, 20, project, vec!["aaaa".into()]);
/// assert!(CommitRef::is_ancestor_relationship(&child, &parent));
/// assert!(!CommitRef::is_ancestor_relationship(&parent, &child));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRef {
    /// Full commit hash.
    pub id: String,
    /// Author timestamp (seconds since epoch).
    pub author_time: i64,
    /// Committer timestamp (seconds since epoch).
    pub commit_time: i64,
    /// Repository the commit belongs to.
    pub project: ProjectInfo,
    /// Hashes of the direct parents, in commit order.
    pub parent_ids: Vec<String>,
}

impl CommitRef {
    /// Create a commit reference.
    pub fn new(
        id: impl Into<String>,
        author_time: i64,
        commit_time: i64,
        project: ProjectInfo,
        parent_ids: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            author_time,
            commit_time,
            project,
            parent_ids,
        }
    }

    /// First 8 characters of the commit hash.
    pub fn short_id(&self) -> &str {
        &self.id[..self.id.len().min(8)]
    }

    /// Resolve the direct parents through the git access layer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SatdError::Git`] if the object store cannot be read.
    /// A failure here concerns this commit only; history walkers skip it.
    pub fn parents<G>(&self, git: &G) -> crate::Result<Vec<CommitRef>>
    where
        G: crate::GitAccess + ?Sized,
    {
        git.parents_of(self)
    }

    /// `true` iff `b` is a direct parent of `a`.
    pub fn is_ancestor_relationship(a: &CommitRef, b: &CommitRef) -> bool {
        a.parent_ids.iter().any(|p| *p == b.id)
    }
}

impl PartialEq for CommitRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CommitRef {}

impl Hash for CommitRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for CommitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_id())
    }
}

/// Kind of technical debt a SATD comment admits to.
///
/// # Examples
///
/// ```
/// use satd_core::DebtCategory;
///
/// let c: DebtCategory = "defect".parse().unwrap();
/// assert_eq!(c, DebtCategory::Defect);
/// assert_eq!(c.to_string(), "DEFECT");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DebtCategory {
    /// Missing or inadequate tests.
    Test,
    /// Incomplete or shortcut implementation.
    Implementation,
    /// Design shortcuts, hacks, workarounds.
    Design,
    /// Known bugs.
    Defect,
    /// Missing or outdated documentation.
    Documentation,
}

impl fmt::Display for DebtCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebtCategory::Test => write!(f, "TEST"),
            DebtCategory::Implementation => write!(f, "IMPLEMENTATION"),
            DebtCategory::Design => write!(f, "DESIGN"),
            DebtCategory::Defect => write!(f, "DEFECT"),
            DebtCategory::Documentation => write!(f, "DOCUMENTATION"),
        }
    }
}

impl FromStr for DebtCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test" => Ok(DebtCategory::Test),
            "implementation" => Ok(DebtCategory::Implementation),
            "design" => Ok(DebtCategory::Design),
            "defect" => Ok(DebtCategory::Defect),
            "documentation" => Ok(DebtCategory::Documentation),
            other => Err(format!("unknown debt category: {other}")),
        }
    }
}

/// One SATD comment as found in a source file.
///
/// `containing_method` is `None` for comments outside any method body
/// (field declarations, class headers, top of file).
///
/// # Examples
///
/// ```
/// use satd_core::{Comment, DebtCategory};
///
/// let c = Comment {
///     text: "TODO fix race".into(),
///     start_line: 12,
///     end_line: 12,
///     containing_class: "com.acme.Foo".into(),
///     containing_method: Some("run".into()),
///     category: DebtCategory::Defect,
/// };
/// assert!(c.overlaps(10, 12));
/// assert!(!c.overlaps(13, 20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment text, markers included.
    pub text: String,
    /// First line (1-indexed).
    pub start_line: u32,
    /// Last line (1-indexed, inclusive).
    pub end_line: u32,
    /// Fully qualified name of the enclosing type.
    pub containing_class: String,
    /// Name of the enclosing method or constructor, if any.
    pub containing_method: Option<String>,
    /// Classification label assigned at extraction time.
    pub category: DebtCategory,
}

impl Comment {
    /// Two comments are content-equal iff their text is identical.
    pub fn content_eq(&self, other: &Comment) -> bool {
        self.text == other.text
    }

    /// `true` if the inclusive line range `[start, end]` shares a line with this comment.
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.start_line <= end && start <= self.end_line
    }
}

/// A SATD comment together with the file it lives in and its duplication id.
///
/// The duplication id distinguishes content-identical comments in the same
/// file of the same revision: 0, 1, 2, ... in extraction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatdInFile {
    /// Repository-relative path.
    pub file: String,
    /// The comment.
    pub comment: Comment,
    /// Index among identical comments in the same file.
    pub duplication_id: u32,
}

impl SatdInFile {
    /// Create a located comment.
    pub fn new(file: impl Into<String>, comment: Comment, duplication_id: u32) -> Self {
        Self {
            file: file.into(),
            comment,
            duplication_id,
        }
    }

    /// Same file, same enclosing class and same enclosing method, whatever the text.
    pub fn location_eq(&self, other: &SatdInFile) -> bool {
        self.file == other.file
            && self.comment.containing_class == other.comment.containing_class
            && self.comment.containing_method == other.comment.containing_method
    }

    /// Stable identity of this debt item, independent of line numbers.
    ///
    /// # Examples
    ///
    /// ```
    /// use satd_core::{Comment, DebtCategory, SatdInFile};
    ///
    /// let comment = Comment {
    ///     text: "// TODO".into(),
    ///     start_line: 1,
    ///     end_line: 1,
    ///     containing_class: "A".into(),
    ///     containing_method: None,
    ///     category: DebtCategory::Implementation,
    /// };
    /// let a = SatdInFile::new("A.java", comment.clone(), 0);
    /// let mut moved = comment;
    /// moved.start_line = 40;
    /// moved.end_line = 40;
    /// let b = SatdInFile::new("A.java", moved, 0);
    /// assert_eq!(a.instance_id(), b.instance_id());
    /// assert_eq!(a.instance_id().len(), 64);
    /// ```
    pub fn instance_id(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [
            self.file.as_str(),
            self.comment.text.as_str(),
            self.comment.containing_class.as_str(),
            self.comment.containing_method.as_deref().unwrap_or(""),
        ] {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }
        hasher.update(self.duplication_id.to_le_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Lifecycle outcome of one SATD instance between two revisions.
///
/// # Examples
///
/// ```
/// use satd_core::Resolution;
///
/// assert_eq!(Resolution::Stay.to_string(), "STAY");
/// let r: Resolution = serde_json::from_str("\"CHANGED\"").unwrap();
/// assert_eq!(r, Resolution::Changed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resolution {
    /// No old counterpart.
    Added,
    /// No new counterpart, or the new counterpart is no longer SATD.
    Removed,
    /// Old and new text identical.
    Stay,
    /// Both sides SATD, text differs.
    Changed,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Added => write!(f, "ADDED"),
            Resolution::Removed => write!(f, "REMOVED"),
            Resolution::Stay => write!(f, "STAY"),
            Resolution::Changed => write!(f, "CHANGED"),
        }
    }
}

/// The unit of output: one debt item across a revision pair.
///
/// At least one side is always present; the constructors are the only way
/// to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatdInstance {
    old: Option<SatdInFile>,
    new: Option<SatdInFile>,
    resolution: Resolution,
}

impl SatdInstance {
    /// A comment present only in the new revision.
    pub fn added(new: SatdInFile) -> Self {
        Self {
            old: None,
            new: Some(new),
            resolution: Resolution::Added,
        }
    }

    /// A comment present only in the old revision.
    pub fn removed(old: SatdInFile) -> Self {
        Self {
            old: Some(old),
            new: None,
            resolution: Resolution::Removed,
        }
    }

    /// A comment with counterparts on both sides.
    pub fn paired(old: SatdInFile, new: SatdInFile, resolution: Resolution) -> Self {
        Self {
            old: Some(old),
            new: Some(new),
            resolution,
        }
    }

    /// Old-side location and comment, absent for newly introduced debt.
    pub fn old(&self) -> Option<&SatdInFile> {
        self.old.as_ref()
    }

    /// New-side location and comment, absent for removed debt.
    pub fn new_side(&self) -> Option<&SatdInFile> {
        self.new.as_ref()
    }

    /// The lifecycle outcome.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Duplication id of the side that identifies this instance (old first).
    pub fn duplication_id(&self) -> u32 {
        self.old
            .as_ref()
            .or(self.new.as_ref())
            .map(|s| s.duplication_id)
            .unwrap_or_default()
    }
}

/// How two revisions relate, which selects the alignment strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonMode {
    /// One revision is a direct parent of the other; only diff-touched files are mined.
    DirectParent,
    /// Arbitrary revisions; full trees are mined and location alignment applies.
    Release,
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonMode::DirectParent => write!(f, "direct-parent"),
            ComparisonMode::Release => write!(f, "release"),
        }
    }
}

/// How every extracted comment mapping of one comparison ended up.
///
/// Each mapping is counted exactly once, so
/// `old_total == sum of the old_* buckets` and likewise for the new side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentSummary {
    pub old_total: usize,
    pub new_total: usize,
    /// Pairs bound by identical text.
    pub content_matched: usize,
    /// Pairs bound by file + class + method (release mode).
    pub location_matched: usize,
    /// Old mappings resolved from diff hunks.
    pub old_inferred: usize,
    /// New mappings resolved from diff hunks or absorbed by an old-side inference.
    pub new_inferred: usize,
    /// Old mappings in files that failed extraction.
    pub old_excluded: usize,
    /// New mappings in files that failed extraction.
    pub new_excluded: usize,
    /// Old mappings the diff did not touch.
    pub old_untouched: usize,
    /// New mappings the diff did not touch.
    pub new_untouched: usize,
}

/// All SATD changes between two revisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatdDifference {
    pub project: ProjectInfo,
    pub old_commit: CommitRef,
    pub new_commit: CommitRef,
    pub mode: ComparisonMode,
    pub instances: Vec<SatdInstance>,
    /// Files whose comments could not be extracted on either side.
    pub errored_files: Vec<String>,
    pub summary: AlignmentSummary,
}

impl SatdDifference {
    /// Number of instances with the given resolution.
    pub fn count(&self, resolution: Resolution) -> usize {
        self.instances
            .iter()
            .filter(|i| i.resolution() == resolution)
            .count()
    }
}

/// One entry of a [`SatdSnapshot`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub satd: SatdInFile,
    /// [`SatdInFile::instance_id`] of `satd`.
    pub instance_id: String,
}

/// All SATD present in a single revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatdSnapshot {
    pub project: ProjectInfo,
    pub commit: CommitRef,
    pub entries: Vec<SnapshotEntry>,
    pub errored_files: Vec<String>,
}

/// A changed region of a file, without context lines.
///
/// A count of zero means the region is empty on that side: a pure insertion
/// has `old_lines == 0` and sits after line `old_start`.
///
/// # Examples
///
/// ```
/// use satd_core::{DiffHunk, ChangeType};
///
/// let hunk = DiffHunk {
///     old_start: 10,
///     old_lines: 2,
///     new_start: 10,
///     new_lines: 3,
///     change_type: ChangeType::Modify,
/// };
/// assert_eq!(hunk.old_range(), Some((10, 11)));
/// assert_eq!(hunk.new_range(), Some((10, 12)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffHunk {
    /// Starting line in the old version.
    pub old_start: u32,
    /// Number of lines in the old version.
    pub old_lines: u32,
    /// Starting line in the new version.
    pub new_start: u32,
    /// Number of lines in the new version.
    pub new_lines: u32,
    /// Classification of the change.
    pub change_type: ChangeType,
}

impl DiffHunk {
    /// Inclusive range of deleted/replaced old lines, `None` for pure insertions.
    pub fn old_range(&self) -> Option<(u32, u32)> {
        (self.old_lines > 0).then(|| (self.old_start, self.old_start + self.old_lines - 1))
    }

    /// Inclusive range of inserted/replacing new lines, `None` for pure deletions.
    pub fn new_range(&self) -> Option<(u32, u32)> {
        (self.new_lines > 0).then(|| (self.new_start, self.new_start + self.new_lines - 1))
    }
}

/// Classification of a diff hunk.
///
/// # Examples
///
/// ```
/// use satd_core::ChangeType;
///
/// let ct = ChangeType::Add;
/// assert_eq!(format!("{ct}"), "add");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Lines only inserted.
    Add,
    /// Lines only removed.
    Delete,
    /// Lines replaced.
    Modify,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeType::Add => write!(f, "add"),
            ChangeType::Delete => write!(f, "delete"),
            ChangeType::Modify => write!(f, "modify"),
        }
    }
}

/// What happened to a file between two trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaStatus {
    Added,
    Deleted,
    Modified,
    Renamed,
    Copied,
}

/// One changed-file entry between two trees, with its edit hunks.
///
/// `old_path` is `None` for added files and `new_path` is `None` for
/// deleted ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDelta {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub status: DeltaStatus,
    pub hunks: Vec<DiffHunk>,
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use satd_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn comment(text: &str, method: Option<&str>) -> Comment {
        Comment {
            text: text.into(),
            start_line: 3,
            end_line: 4,
            containing_class: "com.acme.Foo".into(),
            containing_method: method.map(String::from),
            category: DebtCategory::Implementation,
        }
    }

    fn commit(id: &str, parents: &[&str]) -> CommitRef {
        CommitRef::new(
            id,
            0,
            0,
            ProjectInfo::new("demo", "/tmp/demo"),
            parents.iter().map(|p| p.to_string()).collect(),
        )
    }

    struct Parents;

    impl crate::GitAccess for Parents {
        fn parents_of(&self, child: &CommitRef) -> crate::Result<Vec<CommitRef>> {
            if child.id == "bad" {
                return Err(crate::SatdError::Git("object missing".into()));
            }
            Ok(child.parent_ids.iter().map(|p| commit(p, &[])).collect())
        }

        fn changed_files(&self, _: &CommitRef, _: &CommitRef) -> crate::Result<Vec<FileDelta>> {
            Ok(Vec::new())
        }

        fn list_files(&self, _: &CommitRef) -> crate::Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn read_file(&self, _: &CommitRef, path: &str) -> crate::Result<String> {
            Err(crate::SatdError::FileNotFound(path.into()))
        }
    }

    #[test]
    fn parents_resolve_through_git_access() {
        let merge = commit("m", &["a", "b"]);
        let parents = merge.parents(&Parents).unwrap();
        assert_eq!(parents, vec![commit("a", &[]), commit("b", &[])]);

        let dyn_git: &dyn crate::GitAccess = &Parents;
        assert!(commit("root", &[]).parents(dyn_git).unwrap().is_empty());
        assert!(matches!(
            commit("bad", &["a"]).parents(&Parents),
            Err(crate::SatdError::Git(_))
        ));
    }

    #[test]
    fn commit_identity_ignores_metadata() {
        let a = commit("abc", &[]);
        let mut b = commit("abc", &["zzz"]);
        b.commit_time = 99;
        assert_eq!(a, b);

        let set: HashSet<CommitRef> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn short_id_handles_short_hashes() {
        assert_eq!(commit("0123456789abcdef", &[]).short_id(), "01234567");
        assert_eq!(commit("abc", &[]).short_id(), "abc");
    }

    #[test]
    fn comment_overlap_is_inclusive() {
        let c = comment("// TODO", None);
        assert!(c.overlaps(4, 9));
        assert!(c.overlaps(1, 3));
        assert!(!c.overlaps(5, 9));
        assert!(!c.overlaps(1, 2));
    }

    #[test]
    fn location_eq_ignores_text() {
        let a = SatdInFile::new("Foo.java", comment("// TODO a", Some("run")), 0);
        let b = SatdInFile::new("Foo.java", comment("// TODO b", Some("run")), 0);
        let c = SatdInFile::new("Foo.java", comment("// TODO a", Some("stop")), 0);
        assert!(a.location_eq(&b));
        assert!(!a.location_eq(&c));
    }

    #[test]
    fn instance_id_depends_on_duplication_id() {
        let a = SatdInFile::new("Foo.java", comment("// TODO", Some("run")), 0);
        let b = SatdInFile::new("Foo.java", comment("// TODO", Some("run")), 1);
        assert_ne!(a.instance_id(), b.instance_id());
    }

    #[test]
    fn instance_constructors_keep_one_side() {
        let side = SatdInFile::new("Foo.java", comment("// TODO", None), 2);
        let added = SatdInstance::added(side.clone());
        assert!(added.old().is_none());
        assert_eq!(added.resolution(), Resolution::Added);
        assert_eq!(added.duplication_id(), 2);

        let removed = SatdInstance::removed(side);
        assert!(removed.new_side().is_none());
        assert_eq!(removed.resolution(), Resolution::Removed);
    }

    #[test]
    fn hunk_ranges() {
        let insertion = DiffHunk {
            old_start: 5,
            old_lines: 0,
            new_start: 6,
            new_lines: 2,
            change_type: ChangeType::Add,
        };
        assert_eq!(insertion.old_range(), None);
        assert_eq!(insertion.new_range(), Some((6, 7)));
    }

    #[test]
    fn resolution_serializes_screaming_case() {
        let json = serde_json::to_string(&Resolution::Removed).unwrap();
        assert_eq!(json, "\"REMOVED\"");
    }

    #[test]
    fn debt_category_from_str() {
        assert_eq!("TEST".parse::<DebtCategory>().unwrap(), DebtCategory::Test);
        assert_eq!(
            "Documentation".parse::<DebtCategory>().unwrap(),
            DebtCategory::Documentation
        );
        assert!("nonsense".parse::<DebtCategory>().is_err());
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "md".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn satd_in_file_serializes_camel_case() {
        let side = SatdInFile::new("Foo.java", comment("// TODO", Some("run")), 0);
        let json = serde_json::to_value(&side).unwrap();
        assert!(json.get("duplicationId").is_some());
        assert!(json["comment"].get("containingMethod").is_some());
    }
}
