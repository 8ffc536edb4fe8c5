//! Extension allow-list for the scanner.

use std::path::Path;

/// Decides whether a file is a candidate image
pub struct ImageFilter {
    /// Lowercase extensions to accept, without the dot
    extensions: Vec<String>,
}

impl ImageFilter {
    /// Create a filter accepting png, jpg and jpeg
    pub fn new() -> Self {
        Self {
            extensions: vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()],
        }
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => {
                let ext_lower = ext.to_lowercase();
                self.extensions.iter().any(|e| *e == ext_lower)
            }
            None => false,
        }
    }
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::new()
    }
}
