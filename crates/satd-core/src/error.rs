use std::path::PathBuf;

/// Errors that can occur while mining self-admitted technical debt.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to a `miette::Report` at the boundary.
///
/// Extraction and classifier failures are normally recovered where they
/// happen (the file is recorded as errored, the comment is treated as not
/// SATD); the variants exist for collaborators to report them.
///
/// # Examples
///
/// ```
/// use satd_core::SatdError;
///
/// let err = SatdError::Git("object not found".into());
/// assert!(err.to_string().contains("object not found"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SatdError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    #[diagnostic(help("check .satdtrack.toml, or run `satdtrack init` for a template"))]
    Config(String),

    /// Git object store or revision lookup failure.
    #[error("git error: {0}")]
    #[diagnostic(help("revisions may be tags, branches, hashes or expressions like HEAD~3"))]
    Git(String),

    /// Diff or source parsing failure.
    #[error("parse error: {0}")]
    Parse(String),

    /// Comments of a file could not be extracted.
    #[error("extraction failed for {file}: {reason}")]
    Extraction {
        /// Repository-relative path of the file.
        file: String,
        /// Why extraction failed.
        reason: String,
    },

    /// The SATD classifier could not label a comment.
    #[error("classifier error: {0}")]
    Classifier(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}
