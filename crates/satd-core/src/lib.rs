//! Core types, configuration, and error handling for satdtrack.
//!
//! This crate provides the shared foundation used by all other satdtrack crates:
//! - [`SatdError`]: unified error type using `thiserror`
//! - [`SatdConfig`]: configuration loaded from `.satdtrack.toml`
//! - The data model: [`CommitRef`], [`Comment`], [`SatdInFile`], [`SatdInstance`],
//!   [`Resolution`], [`SatdDifference`], [`SatdSnapshot`], [`FileDelta`]
//! - Collaborator traits: [`GitAccess`], [`RevisionResolver`], [`CommentExtractor`],
//!   [`SatdClassifier`]

mod capability;
mod config;
mod error;
mod types;

pub use capability::{CommentExtractor, Extraction, GitAccess, RevisionResolver, SatdClassifier};
pub use config::{ClassifierConfig, KeywordRule, MiningConfig, SatdConfig};
pub use error::SatdError;
pub use types::{
    AlignmentSummary, ChangeType, Comment, CommitRef, ComparisonMode, DebtCategory, DeltaStatus,
    DiffHunk, FileDelta, OutputFormat, ProjectInfo, Resolution, SatdDifference, SatdInFile,
    SatdInstance, SatdSnapshot, SnapshotEntry,
};

/// A convenience `Result` type for satdtrack operations.
pub type Result<T> = std::result::Result<T, SatdError>;
