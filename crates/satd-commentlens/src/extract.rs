//! Java comment extraction via tree-sitter.
//!
//! Parses each source file, collects its comments with their enclosing
//! class and method, and keeps the ones the classifier labels as SATD.

use satd_core::{
    Comment, CommentExtractor, CommitRef, DebtCategory, Extraction, GitAccess, SatdClassifier,
    SatdError,
};
use satd_difflens::filter::SourceFilter;
use tracing::{debug, warn};
use tree_sitter::{Node, Parser};

/// A comment as it appears in the source, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceComment {
    /// Comment text including its markers; grouped line comments are joined with `\n`.
    pub text: String,
    /// 1-based first line.
    pub start_line: u32,
    /// 1-based last line.
    pub end_line: u32,
    /// Package-qualified name of the innermost enclosing type, or the package alone.
    pub containing_class: String,
    /// Enclosing method or constructor, or the one declared directly below.
    pub containing_method: Option<String>,
}

impl SourceComment {
    fn into_comment(self, category: DebtCategory) -> Comment {
        Comment {
            text: self.text,
            start_line: self.start_line,
            end_line: self.end_line,
            containing_class: self.containing_class,
            containing_method: self.containing_method,
            category,
        }
    }
}

/// Extract every comment from a Java source file, in source order.
///
/// Runs of `//` comments on consecutive lines are merged into one comment.
/// A comment on its own line(s) directly above a method declaration is
/// attributed to that method.
///
/// # Errors
///
/// Returns [`SatdError::Extraction`] if the file does not parse cleanly.
///
/// # Examples
///
/// ```
/// use satd_commentlens::extract::extract_comments;
///
/// let source = "package org.acme;\n\
///               class Worker {\n\
///                   void run() {\n\
///                       // TODO: batch these\n\
///                   }\n\
///               }\n";
/// let comments = extract_comments("Worker.java", source).unwrap();
/// assert_eq!(comments.len(), 1);
/// assert_eq!(comments[0].start_line, 4);
/// assert_eq!(comments[0].containing_class, "org.acme.Worker");
/// assert_eq!(comments[0].containing_method.as_deref(), Some("run"));
/// ```
pub fn extract_comments(path: &str, source: &str) -> Result<Vec<SourceComment>, SatdError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .map_err(|e| SatdError::Parse(format!("failed to set language: {e}")))?;

    let Some(tree) = parser.parse(source, None) else {
        return Err(extraction_error(path, "parser produced no tree"));
    };
    let root = tree.root_node();
    if root.has_error() {
        return Err(extraction_error(path, "syntax error"));
    }

    let bytes = source.as_bytes();
    let package = package_name(&root, bytes);
    let mut scope = Scope {
        classes: Vec::new(),
        method: None,
    };
    let mut comments = Vec::new();
    collect_comments(root, bytes, &package, &mut scope, &mut comments);
    Ok(comments)
}

fn extraction_error(path: &str, reason: &str) -> SatdError {
    SatdError::Extraction {
        file: path.to_string(),
        reason: reason.to_string(),
    }
}

struct Scope {
    classes: Vec<String>,
    method: Option<String>,
}

impl Scope {
    fn containing_class(&self, package: &str) -> String {
        let classes = self.classes.join(".");
        match (package.is_empty(), classes.is_empty()) {
            (true, _) => classes,
            (false, true) => package.to_string(),
            (false, false) => format!("{package}.{classes}"),
        }
    }
}

fn collect_comments(
    node: Node,
    source: &[u8],
    package: &str,
    scope: &mut Scope,
    out: &mut Vec<SourceComment>,
) {
    match node.kind() {
        "class_declaration"
        | "interface_declaration"
        | "enum_declaration"
        | "record_declaration"
        | "annotation_type_declaration" => {
            let name = find_child_text(&node, "identifier", source).unwrap_or_default();
            scope.classes.push(name);
            let outer_method = scope.method.take();
            collect_children(node, source, package, scope, out);
            scope.method = outer_method;
            scope.classes.pop();
        }
        "method_declaration" | "constructor_declaration" | "compact_constructor_declaration" => {
            let name = find_child_text(&node, "identifier", source);
            let outer = std::mem::replace(&mut scope.method, name);
            collect_children(node, source, package, scope, out);
            scope.method = outer;
        }
        _ => collect_children(node, source, package, scope, out),
    }
}

fn collect_children(
    node: Node,
    source: &[u8],
    package: &str,
    scope: &mut Scope,
    out: &mut Vec<SourceComment>,
) {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();

    let mut i = 0;
    while i < children.len() {
        let child = children[i];
        if !is_comment(&child) {
            collect_comments(child, source, package, scope, out);
            i += 1;
            continue;
        }

        // Merge consecutive line comments into one
        let mut last = i;
        if child.kind() == "line_comment" {
            while last + 1 < children.len()
                && children[last + 1].kind() == "line_comment"
                && children[last + 1].start_position().row as u32 == comment_end_line(&children[last])
                && starts_line(&children[last + 1], source)
            {
                last += 1;
            }
        }

        let text = children[i..=last]
            .iter()
            .map(|c| node_text(c, source).trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        let method = scope.method.clone().or_else(|| {
            starts_line(&child, source)
                .then(|| following_method(&children[last], &children[last + 1..], source))
                .flatten()
        });

        out.push(SourceComment {
            text,
            start_line: child.start_position().row as u32 + 1,
            end_line: comment_end_line(&children[last]),
            containing_class: scope.containing_class(package),
            containing_method: method,
        });
        i = last + 1;
    }
}

fn is_comment(node: &Node) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment" | "comment")
}

/// Line comments include the trailing newline in some grammar versions.
fn comment_end_line(node: &Node) -> u32 {
    let end = node.end_position();
    let row = if end.column == 0 && end.row > node.start_position().row {
        end.row - 1
    } else {
        end.row
    };
    row as u32 + 1
}

fn starts_line(node: &Node, source: &[u8]) -> bool {
    let line_start = source[..node.start_byte()]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |p| p + 1);
    source[line_start..node.start_byte()]
        .iter()
        .all(|b| b.is_ascii_whitespace())
}

/// Name of the method declared on the line right after a comment.
fn following_method(last: &Node, rest: &[Node], source: &[u8]) -> Option<String> {
    let next = rest.first()?;
    if next.start_position().row as u32 != comment_end_line(last) {
        return None;
    }
    match next.kind() {
        "method_declaration" | "constructor_declaration" | "compact_constructor_declaration" => {
            find_child_text(next, "identifier", source)
        }
        _ => None,
    }
}

fn package_name(root: &Node, source: &[u8]) -> String {
    let mut cursor = root.walk();
    let found = root
        .children(&mut cursor)
        .find(|c| c.kind() == "package_declaration");
    found
        .and_then(|pkg| {
            find_child_text(&pkg, "scoped_identifier", source)
                .or_else(|| find_child_text(&pkg, "identifier", source))
        })
        .unwrap_or_default()
}

fn node_text(node: &Node, source: &[u8]) -> String {
    let start = node.start_byte();
    let end = node.end_byte();
    if start >= source.len() || end > source.len() {
        return String::new();
    }
    String::from_utf8_lossy(&source[start..end]).to_string()
}

fn find_child_text(node: &Node, kind: &str, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == kind {
            let text = node_text(&child, source);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// [`CommentExtractor`] that reads Java files from git and keeps SATD comments.
///
/// Only paths with one of the filter's source extensions are read. Exclude
/// patterns are not applied here; they only narrow the modified-files views
/// of a direct-parent comparison.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use satd_commentlens::classify::KeywordClassifier;
/// use satd_commentlens::extract::JavaCommentExtractor;
/// use satd_core::{ClassifierConfig, CommentExtractor};
/// use satd_gitpulse::repo::GitRepository;
///
/// let repo = GitRepository::open(Path::new(".")).unwrap();
/// let classifier = KeywordClassifier::from_config(&ClassifierConfig::default()).unwrap();
/// let extractor = JavaCommentExtractor::new(&repo, &classifier);
/// let head = repo.resolve("HEAD").unwrap();
/// let extraction = extractor.extract(&head, &[]).unwrap();
/// println!("{} SATD comments", extraction.comment_count());
/// ```
pub struct JavaCommentExtractor<'a, G: GitAccess + ?Sized, C: SatdClassifier + ?Sized> {
    git: &'a G,
    classifier: &'a C,
    filter: SourceFilter,
}

impl<'a, G: GitAccess + ?Sized, C: SatdClassifier + ?Sized> JavaCommentExtractor<'a, G, C> {
    pub fn new(git: &'a G, classifier: &'a C) -> Self {
        Self {
            git,
            classifier,
            filter: SourceFilter::default_filter(),
        }
    }

    /// Read only paths with one of `filter`'s source extensions.
    pub fn with_filter(mut self, filter: SourceFilter) -> Self {
        self.filter = filter;
        self
    }

    fn satd_in(&self, path: &str, source: &str) -> Result<Vec<Comment>, SatdError> {
        let mut kept = Vec::new();
        for comment in extract_comments(path, source)? {
            match self.classifier.classify(&comment.text) {
                Ok(Some(category)) => kept.push(comment.into_comment(category)),
                Ok(None) => {}
                Err(e) => {
                    warn!(file = path, line = comment.start_line, error = %e, "classifier failed, treating as non-SATD");
                }
            }
        }
        Ok(kept)
    }
}

impl<G: GitAccess + ?Sized, C: SatdClassifier + ?Sized> CommentExtractor
    for JavaCommentExtractor<'_, G, C>
{
    fn extract(&self, commit: &CommitRef, files: &[String]) -> satd_core::Result<Extraction> {
        let paths: Vec<String> = if files.is_empty() {
            self.git
                .list_files(commit)?
                .into_iter()
                .filter(|p| self.filter.is_source(p))
                .collect()
        } else {
            files
                .iter()
                .filter(|p| self.filter.is_source(p))
                .cloned()
                .collect()
        };

        let mut extraction = Extraction::default();
        for path in paths {
            let result = self
                .git
                .read_file(commit, &path)
                .and_then(|source| self.satd_in(&path, &source));
            match result {
                Ok(comments) => {
                    if !comments.is_empty() {
                        extraction.files.insert(path, comments);
                    }
                }
                Err(e) => {
                    warn!(commit = %commit, file = %path, error = %e, "comment extraction failed");
                    extraction.errored_files.push(path);
                }
            }
        }

        debug!(
            commit = %commit,
            files = extraction.files.len(),
            comments = extraction.comment_count(),
            errored = extraction.errored_files.len(),
            "extracted SATD"
        );
        Ok(extraction)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use satd_core::{ClassifierConfig, FileDelta, MiningConfig, ProjectInfo};

    use super::*;
    use crate::classify::KeywordClassifier;

    const WORKER: &str = r#"package org.acme.jobs;

import java.util.List;

// TODO: split this class
public class Worker {
    private int retries; // HACK hardcoded

    // FIXME: not thread safe
    // see issue 12
    public void run() {
        /* TODO: optimize */
        for (int i = 0; i < retries; i++) {
            // plain comment
        }
    }

    static class Inner {
        Inner() {
            // XXX constructor hack
        }
    }
}
"#;

    fn comments() -> Vec<SourceComment> {
        extract_comments("Worker.java", WORKER).unwrap()
    }

    fn by_text<'a>(all: &'a [SourceComment], needle: &str) -> &'a SourceComment {
        all.iter()
            .find(|c| c.text.contains(needle))
            .unwrap_or_else(|| panic!("no comment containing {needle}"))
    }

    #[test]
    fn comments_come_out_in_source_order() {
        let all = comments();
        let starts: Vec<u32> = all.iter().map(|c| c.start_line).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn top_level_comment_belongs_to_package() {
        let all = comments();
        let c = by_text(&all, "split this class");
        assert_eq!(c.containing_class, "org.acme.jobs");
        assert_eq!(c.containing_method, None);
        assert_eq!((c.start_line, c.end_line), (5, 5));
    }

    #[test]
    fn trailing_field_comment_has_class_but_no_method() {
        let all = comments();
        let c = by_text(&all, "HACK hardcoded");
        assert_eq!(c.containing_class, "org.acme.jobs.Worker");
        assert_eq!(c.containing_method, None);
    }

    #[test]
    fn adjacent_line_comments_merge_and_attach_to_next_method() {
        let all = comments();
        let c = by_text(&all, "not thread safe");
        assert_eq!(c.text, "// FIXME: not thread safe\n// see issue 12");
        assert_eq!((c.start_line, c.end_line), (9, 10));
        assert_eq!(c.containing_method.as_deref(), Some("run"));
    }

    #[test]
    fn block_comment_inside_method() {
        let all = comments();
        let c = by_text(&all, "optimize");
        assert_eq!(c.text, "/* TODO: optimize */");
        assert_eq!(c.start_line, 12);
        assert_eq!(c.containing_method.as_deref(), Some("run"));
    }

    #[test]
    fn nested_class_and_constructor() {
        let all = comments();
        let c = by_text(&all, "constructor hack");
        assert_eq!(c.containing_class, "org.acme.jobs.Worker.Inner");
        assert_eq!(c.containing_method.as_deref(), Some("Inner"));
    }

    #[test]
    fn default_package_uses_class_name_only() {
        let all = extract_comments("A.java", "class A {\n    // TODO\n}\n").unwrap();
        assert_eq!(all[0].containing_class, "A");
    }

    #[test]
    fn syntax_error_is_extraction_error() {
        let err = extract_comments("Broken.java", "class Broken { void f( { }").unwrap_err();
        assert!(matches!(err, SatdError::Extraction { ref file, .. } if file == "Broken.java"));
    }

    struct Tree {
        files: HashMap<&'static str, &'static str>,
    }

    impl GitAccess for Tree {
        fn parents_of(&self, _: &CommitRef) -> satd_core::Result<Vec<CommitRef>> {
            Ok(Vec::new())
        }

        fn changed_files(&self, _: &CommitRef, _: &CommitRef) -> satd_core::Result<Vec<FileDelta>> {
            Ok(Vec::new())
        }

        fn list_files(&self, _: &CommitRef) -> satd_core::Result<Vec<String>> {
            let mut files: Vec<String> = self.files.keys().map(|s| s.to_string()).collect();
            files.sort();
            Ok(files)
        }

        fn read_file(&self, _: &CommitRef, path: &str) -> satd_core::Result<String> {
            self.files
                .get(path)
                .map(|s| s.to_string())
                .ok_or_else(|| SatdError::FileNotFound(path.into()))
        }
    }

    fn commit() -> CommitRef {
        CommitRef::new("c0ffee", 0, 0, ProjectInfo::new("demo", "mem"), vec![])
    }

    #[test]
    fn extractor_keeps_satd_and_records_failures() {
        let tree = Tree {
            files: HashMap::from([
                ("src/Worker.java", WORKER),
                ("src/Broken.java", "class Broken { void f( { }"),
                ("src/Clean.java", "class Clean {\n    // returns nothing\n}\n"),
                ("README.md", "TODO docs"),
            ]),
        };
        let classifier = KeywordClassifier::from_config(&ClassifierConfig::default()).unwrap();
        let extractor = JavaCommentExtractor::new(&tree, &classifier);

        let extraction = extractor.extract(&commit(), &[]).unwrap();
        assert_eq!(extraction.errored_files, vec!["src/Broken.java"]);
        assert_eq!(extraction.files.len(), 1);
        let worker = &extraction.files["src/Worker.java"];
        assert_eq!(worker.len(), 5);
        assert!(worker.iter().all(|c| !c.text.contains("plain comment")));
        assert_eq!(worker[0].category, DebtCategory::Implementation);
    }

    #[test]
    fn extractor_limits_to_requested_files() {
        let tree = Tree {
            files: HashMap::from([
                ("src/Worker.java", WORKER),
                ("src/Other.java", "class Other {\n    // TODO\n}\n"),
            ]),
        };
        let classifier = KeywordClassifier::from_config(&ClassifierConfig::default()).unwrap();
        let extractor = JavaCommentExtractor::new(&tree, &classifier);

        let extraction = extractor
            .extract(&commit(), &["src/Other.java".to_string(), "src/Missing.java".to_string()])
            .unwrap();
        assert_eq!(extraction.files.keys().collect::<Vec<_>>(), vec!["src/Other.java"]);
        assert_eq!(extraction.errored_files, vec!["src/Missing.java"]);
    }

    #[test]
    fn extractor_reads_configured_extensions() {
        let tree = Tree {
            files: HashMap::from([
                ("src/Worker.java", WORKER),
                ("src/Gen.jav", "class Gen {\n    // TODO regenerate\n}\n"),
            ]),
        };
        let classifier = KeywordClassifier::from_config(&ClassifierConfig::default()).unwrap();
        let config = MiningConfig {
            extensions: vec!["jav".into()],
            ..MiningConfig::default()
        };
        let extractor = JavaCommentExtractor::new(&tree, &classifier)
            .with_filter(SourceFilter::from_config(&config).unwrap());

        let extraction = extractor.extract(&commit(), &[]).unwrap();
        assert_eq!(extraction.files.keys().collect::<Vec<_>>(), vec!["src/Gen.jav"]);
        assert!(extraction.errored_files.is_empty());
    }
}
