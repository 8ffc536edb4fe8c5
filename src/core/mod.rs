//! # Core Module
//!
//! The UI-agnostic duplicate detection engine.
//!
//! ## Modules
//! - `scanner` - Lists candidate images under a root directory
//! - `hasher` - Computes perceptual fingerprints
//! - `matcher` - Pairs fingerprints within a tolerance
//! - `finder` - Orchestrates scan, hash, match and reports progress
//! - `results` - Canonical, de-duplicated pair sets
//! - `grouper` - Optional connected-component view over pairs

pub mod finder;
pub mod grouper;
pub mod hasher;
pub mod matcher;
pub mod results;
pub mod scanner;

// Re-export commonly used types
pub use finder::{CancellationToken, DuplicateFinder, RunReport};
pub use grouper::{group_pairs, DuplicateGroup};
pub use hasher::{HashAlgorithmKind, HasherConfig, PerceptualHash};
pub use matcher::{DuplicatePair, MatcherKind, Tolerance, DEFAULT_TOLERANCE};
pub use results::ResultSet;
pub use scanner::{list_candidate_images, ScanConfig};
