//! Text, JSON and Markdown renderings of mining results.

use std::fmt::Write;

use satd_core::{
    OutputFormat, Resolution, SatdDifference, SatdError, SatdInFile, SatdInstance, SatdSnapshot,
};
use serde::Serialize;

use crate::history::HistoryReport;

const RESOLUTIONS: [Resolution; 4] = [
    Resolution::Added,
    Resolution::Removed,
    Resolution::Changed,
    Resolution::Stay,
];

/// Render one revision-pair comparison.
///
/// # Errors
///
/// Returns [`SatdError::Serialization`] if JSON serialization fails.
pub fn render_difference(diff: &SatdDifference, format: OutputFormat) -> Result<String, SatdError> {
    match format {
        OutputFormat::Text => Ok(difference_text(diff)),
        OutputFormat::Json => serde_json::to_string_pretty(diff).map_err(SatdError::from),
        OutputFormat::Markdown => Ok(difference_markdown(diff)),
    }
}

/// Render all SATD of a single revision.
///
/// # Errors
///
/// Returns [`SatdError::Serialization`] if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use satd_core::{CommitRef, OutputFormat, ProjectInfo, SatdSnapshot};
/// use satd_miner::report::render_snapshot;
///
/// let project = ProjectInfo::new("demo", "/tmp/demo");
/// let snapshot = SatdSnapshot {
///     project: project.clone(),
///     commit: CommitRef::new("0123456789", 0, 0, project, vec![]),
///     entries: vec![],
///     errored_files: vec![],
/// };
/// let out = render_snapshot(&snapshot, OutputFormat::Text).unwrap();
/// assert!(out.contains("01234567: 0 SATD comments"));
/// ```
pub fn render_snapshot(snapshot: &SatdSnapshot, format: OutputFormat) -> Result<String, SatdError> {
    match format {
        OutputFormat::Text => Ok(snapshot_text(snapshot)),
        OutputFormat::Json => serde_json::to_string_pretty(snapshot).map_err(SatdError::from),
        OutputFormat::Markdown => Ok(snapshot_markdown(snapshot)),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FailedPairOutput<'a> {
    parent: &'a str,
    child: &'a str,
    error: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryOutput<'a> {
    differences: &'a [SatdDifference],
    failed: Vec<FailedPairOutput<'a>>,
    cancelled: bool,
}

/// Render a whole history walk.
///
/// Text and Markdown list only pairs that changed some SATD; JSON keeps
/// every compared pair.
///
/// # Errors
///
/// Returns [`SatdError::Serialization`] if JSON serialization fails.
pub fn render_history(report: &HistoryReport, format: OutputFormat) -> Result<String, SatdError> {
    match format {
        OutputFormat::Text => Ok(history_text(report)),
        OutputFormat::Json => {
            let output = HistoryOutput {
                differences: &report.differences,
                failed: report
                    .failed
                    .iter()
                    .map(|f| FailedPairOutput {
                        parent: &f.pair.parent.id,
                        child: &f.pair.child.id,
                        error: &f.error,
                    })
                    .collect(),
                cancelled: report.cancelled,
            };
            serde_json::to_string_pretty(&output).map_err(SatdError::from)
        }
        OutputFormat::Markdown => Ok(history_markdown(report)),
    }
}

fn counts_line(diff: &SatdDifference) -> String {
    RESOLUTIONS
        .iter()
        .map(|r| format!("{} {r}", diff.count(*r)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `File.java:12 (com.acme.Foo#run)`
fn location(satd: &SatdInFile) -> String {
    let scope = match &satd.comment.containing_method {
        Some(method) => format!("{}#{method}", satd.comment.containing_class),
        None => satd.comment.containing_class.clone(),
    };
    format!("{}:{} ({scope})", satd.file, satd.comment.start_line)
}

/// First line of a comment, trimmed to `max` characters.
fn headline(text: &str, max: usize) -> String {
    let first = text.lines().next().unwrap_or("").trim();
    if first.chars().count() <= max {
        first.to_string()
    } else {
        let cut: String = first.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

/// The side an instance is reported under: new if present, old otherwise.
fn reported_side(instance: &SatdInstance) -> Option<&SatdInFile> {
    instance.new_side().or(instance.old())
}

fn difference_text(diff: &SatdDifference) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}..{} ({}): {}",
        diff.project.name,
        diff.old_commit,
        diff.new_commit,
        diff.mode,
        counts_line(diff)
    );

    for instance in &diff.instances {
        let Some(side) = reported_side(instance) else {
            continue;
        };
        let _ = writeln!(
            out,
            "  {:<8} {}  {}",
            instance.resolution().to_string(),
            location(side),
            headline(&side.comment.text, 72)
        );
        if instance.resolution() == Resolution::Changed {
            if let Some(old) = instance.old() {
                let _ = writeln!(out, "           was: {}", headline(&old.comment.text, 72));
            }
        }
    }

    if !diff.errored_files.is_empty() {
        let _ = writeln!(out, "  errored files:");
        for file in &diff.errored_files {
            let _ = writeln!(out, "    {file}");
        }
    }
    out
}

fn difference_markdown(diff: &SatdDifference) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "## SATD changes `{}..{}`\n",
        diff.old_commit, diff.new_commit
    );
    let _ = writeln!(out, "- **Project:** {}", diff.project.name);
    let _ = writeln!(out, "- **Mode:** {}", diff.mode);
    let _ = writeln!(out, "- **Summary:** {}\n", counts_line(diff));

    if !diff.instances.is_empty() {
        let _ = writeln!(out, "| Resolution | Location | Comment |");
        let _ = writeln!(out, "|---|---|---|");
        for instance in &diff.instances {
            let Some(side) = reported_side(instance) else {
                continue;
            };
            let _ = writeln!(
                out,
                "| {} | `{}` | {} |",
                instance.resolution(),
                location(side),
                escape_cell(&headline(&side.comment.text, 80))
            );
        }
        let _ = writeln!(out);
    }

    if !diff.errored_files.is_empty() {
        let _ = writeln!(out, "**Errored files:**\n");
        for file in &diff.errored_files {
            let _ = writeln!(out, "- `{file}`");
        }
        let _ = writeln!(out);
    }
    out
}

fn snapshot_text(snapshot: &SatdSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}: {} SATD comments",
        snapshot.project.name,
        snapshot.commit,
        snapshot.entries.len()
    );
    for entry in &snapshot.entries {
        let _ = writeln!(
            out,
            "  [{}] {} {}  {}",
            &entry.instance_id[..entry.instance_id.len().min(12)],
            entry.satd.comment.category,
            location(&entry.satd),
            headline(&entry.satd.comment.text, 72)
        );
    }
    if !snapshot.errored_files.is_empty() {
        let _ = writeln!(out, "  errored files: {}", snapshot.errored_files.join(", "));
    }
    out
}

fn snapshot_markdown(snapshot: &SatdSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## SATD in `{}`\n", snapshot.commit);
    let _ = writeln!(out, "**{}** comments\n", snapshot.entries.len());

    if !snapshot.entries.is_empty() {
        let _ = writeln!(out, "| Category | Location | Comment |");
        let _ = writeln!(out, "|---|---|---|");
        for entry in &snapshot.entries {
            let _ = writeln!(
                out,
                "| {} | `{}` | {} |",
                entry.satd.comment.category,
                location(&entry.satd),
                escape_cell(&headline(&entry.satd.comment.text, 80))
            );
        }
    }
    out
}

fn history_text(report: &HistoryReport) -> String {
    let mut out = String::new();
    for diff in report.differences.iter().filter(|d| !d.instances.is_empty()) {
        out.push_str(&difference_text(diff));
    }
    let _ = writeln!(
        out,
        "{} pairs compared, {} failed{}",
        report.differences.len(),
        report.failed.len(),
        if report.cancelled { " (cancelled)" } else { "" }
    );
    for failed in &report.failed {
        let _ = writeln!(
            out,
            "  failed {}..{}: {}",
            failed.pair.parent, failed.pair.child, failed.error
        );
    }
    out
}

fn history_markdown(report: &HistoryReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# SATD history\n");
    let _ = writeln!(
        out,
        "{} pairs compared, {} failed{}\n",
        report.differences.len(),
        report.failed.len(),
        if report.cancelled { " (cancelled)" } else { "" }
    );
    for diff in report.differences.iter().filter(|d| !d.instances.is_empty()) {
        out.push_str(&difference_markdown(diff));
    }
    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
