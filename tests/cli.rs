use std::path::Path;
use std::process::Command;

use git2::{Repository, Signature, Time};

const BEFORE: &str = "package demo;

class Cache {
    void load() {
        read();
    }
}
";

const AFTER: &str = "package demo;

class Cache {
    void load() {
        // FIXME: evict stale entries
        read();
    }
}
";

fn two_commit_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    let sig = Signature::new("Dev", "dev@example.com", &Time::new(1_000, 0)).unwrap();

    let mut parent = None;
    for content in [BEFORE, AFTER] {
        std::fs::write(dir.path().join("Cache.java"), content).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("Cache.java")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let parents: Vec<git2::Commit> = parent.iter().map(|oid| repo.find_commit(*oid).unwrap()).collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        parent = Some(
            repo.commit(Some("HEAD"), &sig, &sig, "change", &tree, &parent_refs)
                .unwrap(),
        );
    }
    dir
}

fn satdtrack(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_satdtrack"))
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
}

#[test]
fn diff_reports_added_fixme() {
    let dir = two_commit_repo();
    let output = satdtrack(dir.path(), &["diff", "HEAD~1", "HEAD"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(direct-parent): 1 ADDED, 0 REMOVED, 0 CHANGED, 0 STAY"));
    assert!(stdout.contains("Cache.java:5 (demo.Cache#load)"));
}

#[test]
fn snapshot_json_lists_entries() {
    let dir = two_commit_repo();
    let output = satdtrack(dir.path(), &["snapshot", "--format", "json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"instanceId\""));
    assert!(stdout.contains("\"category\": \"DEFECT\""));
}

#[test]
fn outside_a_repository_fails_with_hint() {
    let dir = tempfile::tempdir().unwrap();
    let output = satdtrack(dir.path(), &["snapshot"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Not a git repository"));
}

#[test]
fn unknown_revision_fails() {
    let dir = two_commit_repo();
    let output = satdtrack(dir.path(), &["diff", "no-such-tag", "HEAD"]);
    assert!(!output.status.success());
}
