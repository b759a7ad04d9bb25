//! Repository access via git2.
//!
//! [`GitRepository`] resolves revisions into [`CommitRef`]s and implements
//! [`GitAccess`]: parent lookup, zero-context tree diffs with rename
//! detection, tree listing, and blob reads.

use std::path::Path;

use git2::{
    Delta, DiffFindOptions, DiffOptions, ObjectType, Oid, Patch, Repository, TreeWalkMode,
    TreeWalkResult,
};
use satd_core::{
    ChangeType, CommitRef, DeltaStatus, DiffHunk, FileDelta, GitAccess, ProjectInfo,
    RevisionResolver, SatdError,
};
use tracing::debug;

/// An opened repository plus the project identity stamped on its commits.
pub struct GitRepository {
    repo: Repository,
    project: ProjectInfo,
}

impl GitRepository {
    /// Open the repository containing `path`.
    ///
    /// The project name is the working directory name; the URI is the
    /// `origin` remote URL, or the path when there is no such remote.
    ///
    /// # Errors
    ///
    /// Returns [`SatdError::Git`] if `path` is not a git repository.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use satd_gitpulse::repo::GitRepository;
    ///
    /// let repo = GitRepository::open(Path::new(".")).unwrap();
    /// let head = repo.resolve("HEAD").unwrap();
    /// println!("{} at {}", repo.project().name, head.short_id());
    /// ```
    pub fn open(path: &Path) -> Result<Self, SatdError> {
        let repo = Repository::discover(path)
            .map_err(|e| SatdError::Git(format!("failed to open repository: {e}")))?;
        let project = project_info(&repo, path);
        debug!(name = %project.name, uri = %project.uri, "opened repository");
        Ok(Self { repo, project })
    }

    /// The project identity of this repository.
    pub fn project(&self) -> &ProjectInfo {
        &self.project
    }

    /// Resolve a revision expression (`HEAD`, a tag, a branch, a hash) to a commit.
    ///
    /// # Errors
    ///
    /// Returns [`SatdError::Git`] if the expression does not name a commit.
    pub fn resolve(&self, rev: &str) -> Result<CommitRef, SatdError> {
        let commit = self
            .repo
            .revparse_single(rev)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|e| SatdError::Git(format!("failed to resolve '{rev}': {e}")))?;
        Ok(self.to_commit_ref(&commit))
    }

    fn to_commit_ref(&self, commit: &git2::Commit) -> CommitRef {
        CommitRef::new(
            commit.id().to_string(),
            commit.author().when().seconds(),
            commit.time().seconds(),
            self.project.clone(),
            commit.parent_ids().map(|id| id.to_string()).collect(),
        )
    }

    fn find_commit(&self, commit: &CommitRef) -> Result<git2::Commit<'_>, SatdError> {
        let oid = Oid::from_str(&commit.id)
            .map_err(|e| SatdError::Git(format!("invalid commit id '{}': {e}", commit.id)))?;
        self.repo
            .find_commit(oid)
            .map_err(|e| SatdError::Git(format!("failed to find commit {commit}: {e}")))
    }

    fn tree_of(&self, commit: &CommitRef) -> Result<git2::Tree<'_>, SatdError> {
        self.find_commit(commit)?
            .tree()
            .map_err(|e| SatdError::Git(format!("failed to get tree of {commit}: {e}")))
    }
}

impl RevisionResolver for GitRepository {
    fn resolve(&self, rev: &str) -> satd_core::Result<CommitRef> {
        GitRepository::resolve(self, rev)
    }
}

impl GitAccess for GitRepository {
    fn parents_of(&self, commit: &CommitRef) -> satd_core::Result<Vec<CommitRef>> {
        let found = self.find_commit(commit)?;
        Ok(found.parents().map(|p| self.to_commit_ref(&p)).collect())
    }

    fn changed_files(&self, old: &CommitRef, new: &CommitRef) -> satd_core::Result<Vec<FileDelta>> {
        let old_tree = self.tree_of(old)?;
        let new_tree = self.tree_of(new)?;

        let mut diff_opts = DiffOptions::new();
        diff_opts.context_lines(0);
        let mut diff = self
            .repo
            .diff_tree_to_tree(Some(&old_tree), Some(&new_tree), Some(&mut diff_opts))
            .map_err(|e| SatdError::Git(format!("failed to compute diff: {e}")))?;

        let mut find_opts = DiffFindOptions::new();
        find_opts.renames(true);
        diff.find_similar(Some(&mut find_opts))
            .map_err(|e| SatdError::Git(format!("failed to find renames: {e}")))?;

        let mut deltas = Vec::new();
        for idx in 0..diff.deltas().len() {
            let Some(delta) = diff.get_delta(idx) else {
                continue;
            };
            let status = match delta.status() {
                Delta::Added => DeltaStatus::Added,
                Delta::Deleted => DeltaStatus::Deleted,
                Delta::Renamed => DeltaStatus::Renamed,
                Delta::Copied => DeltaStatus::Copied,
                Delta::Unmodified | Delta::Ignored | Delta::Untracked => continue,
                _ => DeltaStatus::Modified,
            };
            let old_path = match status {
                DeltaStatus::Added => None,
                _ => delta.old_file().path().map(path_string),
            };
            let new_path = match status {
                DeltaStatus::Deleted => None,
                _ => delta.new_file().path().map(path_string),
            };

            let patch = Patch::from_diff(&diff, idx)
                .map_err(|e| SatdError::Git(format!("failed to build patch: {e}")))?;
            let hunks = match patch {
                Some(patch) => collect_hunks(&patch)?,
                None => Vec::new(),
            };

            deltas.push(FileDelta {
                old_path,
                new_path,
                status,
                hunks,
            });
        }

        debug!(old = %old, new = %new, files = deltas.len(), "computed tree diff");
        Ok(deltas)
    }

    fn list_files(&self, commit: &CommitRef) -> satd_core::Result<Vec<String>> {
        let tree = self.tree_of(commit)?;
        let mut files = Vec::new();
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() == Some(ObjectType::Blob) {
                if let Some(name) = entry.name() {
                    files.push(format!("{root}{name}"));
                }
            }
            TreeWalkResult::Ok
        })
        .map_err(|e| SatdError::Git(format!("failed to walk tree of {commit}: {e}")))?;
        files.sort();
        Ok(files)
    }

    fn read_file(&self, commit: &CommitRef, path: &str) -> satd_core::Result<String> {
        let tree = self.tree_of(commit)?;
        let entry = tree
            .get_path(Path::new(path))
            .map_err(|e| SatdError::Git(format!("{path} not found in {commit}: {e}")))?;
        let blob = entry
            .to_object(&self.repo)
            .and_then(|obj| obj.peel_to_blob())
            .map_err(|e| SatdError::Git(format!("failed to read blob {path}: {e}")))?;
        String::from_utf8(blob.content().to_vec())
            .map_err(|_| SatdError::Parse(format!("{path} is not valid UTF-8")))
    }
}

fn collect_hunks(patch: &Patch<'_>) -> Result<Vec<DiffHunk>, SatdError> {
    let mut hunks = Vec::with_capacity(patch.num_hunks());
    for idx in 0..patch.num_hunks() {
        let (hunk, _) = patch
            .hunk(idx)
            .map_err(|e| SatdError::Git(format!("failed to read hunk: {e}")))?;
        let change_type = match (hunk.old_lines(), hunk.new_lines()) {
            (0, _) => ChangeType::Add,
            (_, 0) => ChangeType::Delete,
            _ => ChangeType::Modify,
        };
        hunks.push(DiffHunk {
            old_start: hunk.old_start(),
            old_lines: hunk.old_lines(),
            new_start: hunk.new_start(),
            new_lines: hunk.new_lines(),
            change_type,
        });
    }
    Ok(hunks)
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn project_info(repo: &Repository, path: &Path) -> ProjectInfo {
    let root = repo.workdir().unwrap_or_else(|| repo.path());
    let name = root
        .canonicalize()
        .unwrap_or_else(|_| root.to_path_buf())
        .file_name()
        .map(|n| n.to_string_lossy().trim_end_matches(".git").to_string())
        .unwrap_or_else(|| "unknown".into());
    let uri = repo
        .find_remote("origin")
        .ok()
        .and_then(|remote| remote.url().map(String::from))
        .unwrap_or_else(|| path.to_string_lossy().to_string());
    ProjectInfo::new(name, uri)
}

#[cfg(test)]
mod tests {
    use git2::{Signature, Time};
    use tempfile::TempDir;

    use super::*;

    struct Fixture {
        dir: TempDir,
        repo: Repository,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let repo = Repository::init(dir.path()).unwrap();
            Self { dir, repo }
        }

        fn commit(&self, files: &[(&str, Option<&str>)], time: i64) -> Oid {
            let mut index = self.repo.index().unwrap();
            for (path, content) in files {
                let full = self.dir.path().join(path);
                match content {
                    Some(content) => {
                        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
                        std::fs::write(&full, content).unwrap();
                        index.add_path(Path::new(path)).unwrap();
                    }
                    None => {
                        std::fs::remove_file(&full).unwrap();
                        index.remove_path(Path::new(path)).unwrap();
                    }
                }
            }
            index.write().unwrap();
            let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();
            let sig = Signature::new("Dev", "dev@example.com", &Time::new(time, 0)).unwrap();
            let parents: Vec<git2::Commit> = self
                .repo
                .head()
                .ok()
                .and_then(|h| h.peel_to_commit().ok())
                .into_iter()
                .collect();
            let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
            self.repo
                .commit(Some("HEAD"), &sig, &sig, "change", &tree, &parent_refs)
                .unwrap()
        }

        fn open(&self) -> GitRepository {
            GitRepository::open(self.dir.path()).unwrap()
        }
    }

    #[test]
    fn resolve_fills_commit_metadata() {
        let fx = Fixture::new();
        let first = fx.commit(&[("A.java", Some("class A {}\n"))], 1_000);
        let second = fx.commit(&[("A.java", Some("class A { }\n"))], 2_000);

        let repo = fx.open();
        let head = repo.resolve("HEAD").unwrap();
        assert_eq!(head.id, second.to_string());
        assert_eq!(head.commit_time, 2_000);
        assert_eq!(head.author_time, 2_000);
        assert_eq!(head.parent_ids, vec![first.to_string()]);
        assert_eq!(head.project, *repo.project());

        let parents = repo.parents_of(&head).unwrap();
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].id, first.to_string());
        assert!(parents[0].parent_ids.is_empty());
    }

    #[test]
    fn resolve_unknown_revision_is_git_error() {
        let fx = Fixture::new();
        fx.commit(&[("A.java", Some("class A {}\n"))], 1_000);
        assert!(matches!(fx.open().resolve("no-such-tag"), Err(SatdError::Git(_))));
    }

    #[test]
    fn project_name_is_directory_name() {
        let fx = Fixture::new();
        fx.commit(&[("A.java", Some("class A {}\n"))], 1_000);
        let expected = fx
            .dir
            .path()
            .canonicalize()
            .unwrap()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_string();
        assert_eq!(fx.open().project().name, expected);
    }

    #[test]
    fn changed_files_reports_zero_context_hunks() {
        let fx = Fixture::new();
        fx.commit(
            &[
                ("src/A.java", Some("a\nb\nc\nd\ne\nf\ng\n")),
                ("src/Gone.java", Some("class Gone {}\n")),
            ],
            1_000,
        );
        fx.commit(
            &[
                ("src/A.java", Some("a\nB\nc\nd\ne\nf\ng\nh\n")),
                ("src/Gone.java", None),
                ("src/New.java", Some("interface New { void x(); }\n")),
            ],
            2_000,
        );
        let repo = fx.open();
        let head = repo.resolve("HEAD").unwrap();
        let parent = repo.resolve("HEAD~1").unwrap();
        let deltas = repo.changed_files(&parent, &head).unwrap();
        assert_eq!(deltas.len(), 3);

        let a = deltas
            .iter()
            .find(|d| d.new_path.as_deref() == Some("src/A.java"))
            .unwrap();
        assert_eq!(a.status, DeltaStatus::Modified);
        assert_eq!(a.hunks.len(), 2);
        assert_eq!(a.hunks[0].old_range(), Some((2, 2)));
        assert_eq!(a.hunks[0].change_type, ChangeType::Modify);
        assert_eq!(a.hunks[1].change_type, ChangeType::Add);
        assert_eq!(a.hunks[1].new_range(), Some((8, 8)));

        let gone = deltas
            .iter()
            .find(|d| d.old_path.as_deref() == Some("src/Gone.java"))
            .unwrap();
        assert_eq!(gone.status, DeltaStatus::Deleted);
        assert!(gone.new_path.is_none());

        let added = deltas
            .iter()
            .find(|d| d.new_path.as_deref() == Some("src/New.java"))
            .unwrap();
        assert_eq!(added.status, DeltaStatus::Added);
        assert!(added.old_path.is_none());
    }

    #[test]
    fn renames_are_detected() {
        let fx = Fixture::new();
        let body = "class Util {\n    int a;\n    int b;\n    int c;\n    int d;\n}\n";
        fx.commit(&[("util/Util.java", Some(body))], 1_000);
        fx.commit(&[("util/Util.java", None), ("text/Util.java", Some(body))], 2_000);
        let repo = fx.open();
        let deltas = repo
            .changed_files(&repo.resolve("HEAD~1").unwrap(), &repo.resolve("HEAD").unwrap())
            .unwrap();
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].status, DeltaStatus::Renamed);
        assert_eq!(deltas[0].old_path.as_deref(), Some("util/Util.java"));
        assert_eq!(deltas[0].new_path.as_deref(), Some("text/Util.java"));
    }

    #[test]
    fn list_and_read_files() {
        let fx = Fixture::new();
        fx.commit(
            &[
                ("src/main/B.java", Some("class B {}\n")),
                ("A.java", Some("class A {}\n")),
                ("README.md", Some("hi\n")),
            ],
            1_000,
        );
        let repo = fx.open();
        let head = repo.resolve("HEAD").unwrap();
        assert_eq!(
            repo.list_files(&head).unwrap(),
            vec!["A.java", "README.md", "src/main/B.java"]
        );
        assert_eq!(repo.read_file(&head, "src/main/B.java").unwrap(), "class B {}\n");
        assert!(matches!(
            repo.read_file(&head, "missing.java"),
            Err(SatdError::Git(_))
        ));
    }

    #[test]
    fn non_utf8_blob_is_parse_error() {
        let fx = Fixture::new();
        let full = fx.dir.path().join("Bin.java");
        std::fs::write(&full, [0xff, 0xfe, 0x00]).unwrap();
        let mut index = fx.repo.index().unwrap();
        index.add_path(Path::new("Bin.java")).unwrap();
        index.write().unwrap();
        let tree = fx.repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::new("Dev", "dev@example.com", &Time::new(1_000, 0)).unwrap();
        fx.repo
            .commit(Some("HEAD"), &sig, &sig, "bin", &tree, &[])
            .unwrap();

        let repo = fx.open();
        let head = repo.resolve("HEAD").unwrap();
        assert!(matches!(
            repo.read_file(&head, "Bin.java"),
            Err(SatdError::Parse(_))
        ));
    }
}
