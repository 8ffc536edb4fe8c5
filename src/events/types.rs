//! Event type definitions for progress reporting.

use crate::core::matcher::DuplicatePair;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Events emitted by one finder run, in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// One candidate finished its hash attempt
    Progress(ProgressEvent),
    /// A candidate could not be hashed; sent just before its progress event
    HashFailed { path: PathBuf, reason: String },
    /// Terminal event, sent exactly once per run
    Completed { pairs: Vec<DuplicatePair> },
}

/// Progress after one candidate's hash attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Candidates processed so far, 1-based
    pub processed: usize,
    /// Total candidates found by the scanner
    pub total: usize,
}

impl ProgressEvent {
    /// Completion as a percentage (0-100)
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.processed as f64 / self.total as f64 * 100.0
    }

    pub fn is_last(&self) -> bool {
        self.processed == self.total
    }
}

impl Event {
    /// Whether this event ends the run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::Completed { .. })
    }
}
