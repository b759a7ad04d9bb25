use satd_core::{ChangeType, DeltaStatus, DiffHunk, FileDelta, SatdError};

/// Parse a unified diff string (as produced by `git diff`) into [`FileDelta`] entries.
///
/// Hunks are split into edit regions: context lines are dropped, and every
/// run of consecutive `-`/`+` lines becomes one [`DiffHunk`]. This is the
/// same shape the git layer produces with zero context lines.
///
/// Handles new files, deleted files, renames (with or without content
/// changes), and binary files (which are skipped).
///
/// # Errors
///
/// Returns [`SatdError::Parse`] if a hunk header is malformed.
///
/// # Examples
///
/// ```
/// use satd_difflens::parser::parse_unified_diff;
///
/// let diff = "\
/// diff --git a/Foo.java b/Foo.java
/// --- a/Foo.java
/// +++ b/Foo.java
/// @@ -1,3 +1,4 @@
///  class Foo {
/// +    // TODO fix race
///      void run() {}
///  }
/// ";
/// let files = parse_unified_diff(diff).unwrap();
/// assert_eq!(files.len(), 1);
/// assert_eq!(files[0].hunks.len(), 1);
/// assert_eq!(files[0].hunks[0].new_range(), Some((2, 2)));
/// ```
pub fn parse_unified_diff(input: &str) -> Result<Vec<FileDelta>, SatdError> {
    let mut files: Vec<FileDelta> = Vec::new();
    let mut current: Option<PendingFile> = None;
    let mut cursor: Option<HunkCursor> = None;

    for line in input.lines() {
        if let Some(rest) = line.strip_prefix("diff --git ") {
            flush_edit(&mut current, &mut cursor);
            if let Some(file) = current.take() {
                file.finish_into(&mut files);
            }
            let mut file = PendingFile::default();
            if let Some((old, new)) = split_git_header(rest) {
                file.old_path = Some(old);
                file.new_path = Some(new);
            }
            current = Some(file);
            continue;
        }

        // Patches without the "diff --git" line start at the "---" header
        if line.starts_with("--- ") && current.is_none() {
            current = Some(PendingFile::default());
        }

        let Some(file) = current.as_mut() else {
            continue;
        };

        if line.starts_with("Binary files ") && line.ends_with(" differ") {
            file.is_binary = true;
            continue;
        }

        if line.starts_with("new file mode") {
            file.is_new_file = true;
            continue;
        }

        if line.starts_with("deleted file mode") {
            file.is_deleted_file = true;
            continue;
        }

        if let Some(path) = line.strip_prefix("rename from ") {
            file.rename = true;
            file.old_path = Some(path.to_string());
            continue;
        }

        if let Some(path) = line.strip_prefix("rename to ") {
            file.rename = true;
            file.new_path = Some(path.to_string());
            continue;
        }

        if line.starts_with("index ")
            || line.starts_with("similarity index")
            || line.starts_with("dissimilarity index")
            || line.starts_with("old mode")
            || line.starts_with("new mode")
        {
            continue;
        }

        if cursor.is_none() {
            if let Some(path) = line.strip_prefix("--- ") {
                match parse_path(path) {
                    Some(p) => file.old_path = Some(p),
                    None => file.is_new_file = true,
                }
                continue;
            }

            if let Some(path) = line.strip_prefix("+++ ") {
                match parse_path(path) {
                    Some(p) => file.new_path = Some(p),
                    None => file.is_deleted_file = true,
                }
                continue;
            }
        }

        if line.starts_with("@@ ") {
            flush_edit(&mut current, &mut cursor);
            let (old_start, old_lines, new_start, new_lines) = parse_hunk_header(line)?;
            cursor = Some(HunkCursor::new(old_start, old_lines, new_start, new_lines));
            continue;
        }

        if line == "\\ No newline at end of file" {
            continue;
        }

        let Some(hunk) = cursor.as_mut() else {
            continue;
        };

        if line.starts_with('-') {
            hunk.delete_line();
        } else if line.starts_with('+') {
            hunk.insert_line();
        } else if line.starts_with(' ') || line.is_empty() {
            if let Some(edit) = hunk.context_line() {
                file.hunks.push(edit);
            }
        }

        if hunk.is_exhausted() {
            flush_edit(&mut current, &mut cursor);
        }
    }

    flush_edit(&mut current, &mut cursor);
    if let Some(file) = current.take() {
        file.finish_into(&mut files);
    }

    Ok(files)
}

#[derive(Default)]
struct PendingFile {
    old_path: Option<String>,
    new_path: Option<String>,
    hunks: Vec<DiffHunk>,
    is_new_file: bool,
    is_deleted_file: bool,
    is_binary: bool,
    rename: bool,
}

impl PendingFile {
    fn finish_into(self, files: &mut Vec<FileDelta>) {
        if self.is_binary {
            return;
        }
        let (status, old_path, new_path) = if self.is_new_file {
            (DeltaStatus::Added, None, self.new_path)
        } else if self.is_deleted_file {
            (DeltaStatus::Deleted, self.old_path, None)
        } else if self.rename {
            (DeltaStatus::Renamed, self.old_path, self.new_path)
        } else {
            (DeltaStatus::Modified, self.old_path, self.new_path)
        };
        if old_path.is_none() && new_path.is_none() {
            return;
        }
        files.push(FileDelta {
            old_path,
            new_path,
            status,
            hunks: self.hunks,
        });
    }
}

/// Walks the body of one `@@` hunk, emitting edit regions.
struct HunkCursor {
    next_old: u32,
    next_new: u32,
    old_remaining: u32,
    new_remaining: u32,
    edit: Option<DiffHunk>,
}

impl HunkCursor {
    fn new(old_start: u32, old_lines: u32, new_start: u32, new_lines: u32) -> Self {
        // A zero count means the header names the line *before* the hunk
        Self {
            next_old: if old_lines == 0 { old_start + 1 } else { old_start },
            next_new: if new_lines == 0 { new_start + 1 } else { new_start },
            old_remaining: old_lines,
            new_remaining: new_lines,
            edit: None,
        }
    }

    fn open_edit(&mut self) -> &mut DiffHunk {
        let (old_start, new_start) = (self.next_old, self.next_new);
        self.edit.get_or_insert(DiffHunk {
            old_start,
            old_lines: 0,
            new_start,
            new_lines: 0,
            change_type: ChangeType::Modify,
        })
    }

    fn delete_line(&mut self) {
        self.open_edit().old_lines += 1;
        self.next_old += 1;
        self.old_remaining = self.old_remaining.saturating_sub(1);
    }

    fn insert_line(&mut self) {
        self.open_edit().new_lines += 1;
        self.next_new += 1;
        self.new_remaining = self.new_remaining.saturating_sub(1);
    }

    fn context_line(&mut self) -> Option<DiffHunk> {
        let edit = self.close_edit();
        self.next_old += 1;
        self.next_new += 1;
        self.old_remaining = self.old_remaining.saturating_sub(1);
        self.new_remaining = self.new_remaining.saturating_sub(1);
        edit
    }

    fn is_exhausted(&self) -> bool {
        self.old_remaining == 0 && self.new_remaining == 0
    }

    fn close_edit(&mut self) -> Option<DiffHunk> {
        let mut edit = self.edit.take()?;
        edit.change_type = if edit.old_lines == 0 {
            edit.old_start -= 1;
            ChangeType::Add
        } else if edit.new_lines == 0 {
            edit.new_start -= 1;
            ChangeType::Delete
        } else {
            ChangeType::Modify
        };
        Some(edit)
    }
}

fn flush_edit(current: &mut Option<PendingFile>, cursor: &mut Option<HunkCursor>) {
    if let Some(mut hunk) = cursor.take() {
        if let (Some(edit), Some(file)) = (hunk.close_edit(), current.as_mut()) {
            file.hunks.push(edit);
        }
    }
}

/// Split `a/old b/new` from a `diff --git` line.
fn split_git_header(rest: &str) -> Option<(String, String)> {
    let rest = rest.strip_prefix("a/")?;
    let (old, new) = rest.split_once(" b/")?;
    Some((old.to_string(), new.to_string()))
}

/// `None` for `/dev/null`.
fn parse_path(raw: &str) -> Option<String> {
    let normalized = raw.trim_end_matches('\t').trim_matches('"');

    if normalized == "/dev/null" {
        return None;
    }

    let stripped = normalized
        .strip_prefix("a/")
        .or_else(|| normalized.strip_prefix("b/"))
        .unwrap_or(normalized);

    Some(stripped.to_string())
}

fn parse_hunk_header(line: &str) -> Result<(u32, u32, u32, u32), SatdError> {
    let inner = line
        .strip_prefix("@@ ")
        .and_then(|s| {
            let end = s.find(" @@")?;
            Some(&s[..end])
        })
        .ok_or_else(|| SatdError::Parse(format!("invalid hunk header: {line}")))?;

    let parts: Vec<&str> = inner.split(' ').collect();
    if parts.len() != 2 {
        return Err(SatdError::Parse(format!("invalid hunk header: {line}")));
    }

    let old = parts[0]
        .strip_prefix('-')
        .ok_or_else(|| SatdError::Parse(format!("invalid old range in hunk: {line}")))?;
    let new = parts[1]
        .strip_prefix('+')
        .ok_or_else(|| SatdError::Parse(format!("invalid new range in hunk: {line}")))?;

    let (old_start, old_lines) = parse_range(old, line)?;
    let (new_start, new_lines) = parse_range(new, line)?;

    Ok((old_start, old_lines, new_start, new_lines))
}

fn parse_range(range: &str, context: &str) -> Result<(u32, u32), SatdError> {
    if let Some((start, count)) = range.split_once(',') {
        let s = start
            .parse()
            .map_err(|_| SatdError::Parse(format!("invalid range number in: {context}")))?;
        let c = count
            .parse()
            .map_err(|_| SatdError::Parse(format!("invalid range count in: {context}")))?;
        Ok((s, c))
    } else {
        let s = range
            .parse()
            .map_err(|_| SatdError::Parse(format!("invalid range number in: {context}")))?;
        Ok((s, 1))
    }
}
