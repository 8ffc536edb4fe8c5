//! # Error Module
//!
//! Error types for the duplicate image finder.
//!
//! ## Taxonomy
//! - **Fatal** (`ScanError`, `ToleranceError`) - reported from `run` before any
//!   progress or completion callback fires
//! - **Per-file** (`HashFailure`) - recorded and excluded from matching, never aborts a run
//! - **Collaborator** (`PreferencesError`, `ReviewError`) - belong to the presentation side

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Invalid tolerance: {0}")]
    Tolerance(#[from] ToleranceError),

    #[error("Hasher configuration error: {0}")]
    Hasher(#[from] HashError),

    #[error("Preferences error: {0}")]
    Preferences(#[from] PreferencesError),

    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    #[error("Progress display thread panicked; results were lost")]
    EventThread,
}

/// Errors that prevent a scan from starting
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

/// Rejected tolerance values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToleranceError {
    #[error("{value} is negative (tolerance must be 0 or greater)")]
    Negative { value: i64 },
}

/// Internal errors while decoding or normalizing one image
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Hash computation failed: {0}")]
    ComputationFailed(String),

    #[error("Failed to open image file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A per-file hashing failure.
///
/// Produced instead of a fingerprint when an image cannot be read or decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[error("Could not hash {path}: {reason}")]
pub struct HashFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl HashFailure {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Errors reading or writing the preferences file
#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("Failed to read preferences from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Preferences file {path} is malformed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No configuration directory available on this system")]
    NoConfigDir,
}

/// Errors raised by the review session when acting on results
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Failed to delete {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No entry #{index} on this page")]
    NoSuchEntry { index: usize },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, FinderError>;
