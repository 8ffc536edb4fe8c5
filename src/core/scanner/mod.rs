//! # Scanner Module
//!
//! Enumerates candidate images under a root directory.
//!
//! ## Supported Formats
//! - JPEG (.jpg, .jpeg)
//! - PNG (.png)
//!
//! Extensions are matched case-insensitively. Anything else is skipped.
//!
//! ## Example
//! ```rust,ignore
//! use dupli_pic_finder::core::scanner::{ImageScanner, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let images = scanner.list_candidate_images(Path::new("/Users/me/Pictures"))?;
//! ```

mod filter;
mod walker;

pub use filter::ImageFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Image formats the scanner accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Unknown,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            _ => ImageFormat::Unknown,
        }
    }

    /// Detect format from a path's extension
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(ImageFormat::from_extension)
            .unwrap_or(ImageFormat::Unknown)
    }

    /// Check if this format is supported
    pub fn is_supported(&self) -> bool {
        !matches!(self, ImageFormat::Unknown)
    }
}

/// Trait for candidate image scanners
///
/// Implement this trait to plug a different file source into the finder (e.g., for testing).
pub trait ImageScanner: Send + Sync {
    /// List candidate images under `root` in a stable order.
    ///
    /// Fails only when `root` is missing or not a directory.
    fn list_candidate_images(&self, root: &Path) -> Result<Vec<PathBuf>, ScanError>;
}

/// List candidate images under `root` with the default (recursive) configuration
pub fn list_candidate_images(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    WalkDirScanner::new(ScanConfig::default()).list_candidate_images(root)
}
