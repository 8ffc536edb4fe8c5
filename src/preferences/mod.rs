//! # Preferences Module
//!
//! User settings that survive between sessions: the match tolerance and how many
//! pairs to show per review page. Stored as JSON under the platform config
//! directory unless a path is given explicitly.

use crate::core::matcher::{Tolerance, DEFAULT_TOLERANCE};
use crate::error::{PreferencesError, ToleranceError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default number of pairs shown per review page
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

const APP_DIR: &str = "dupli-pic-finder";
const FILE_NAME: &str = "preferences.json";

/// Persisted user preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Match tolerance, validated only when used
    pub tolerance: i64,
    /// Pairs per review page
    pub items_per_page: usize,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE as i64,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl Preferences {
    /// `<config dir>/dupli-pic-finder/preferences.json`
    pub fn default_path() -> Result<PathBuf, PreferencesError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
            .ok_or(PreferencesError::NoConfigDir)
    }

    /// Load preferences, falling back to defaults.
    ///
    /// A missing file is normal on first run. An unreadable or malformed file
    /// is logged and ignored.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(Some(prefs)) => prefs,
            Ok(None) => {
                debug!(path = %path.display(), "No preferences file, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(error = %e, "Ignoring preferences file, using defaults");
                Self::default()
            }
        }
    }

    /// Load preferences strictly; `Ok(None)` when the file does not exist
    pub fn try_load(path: &Path) -> Result<Option<Self>, PreferencesError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PreferencesError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| PreferencesError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Write preferences as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), PreferencesError> {
        let write_error = |source| PreferencesError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| write_error(std::io::Error::from(e)))?;
        fs::write(path, json + "\n").map_err(write_error)?;

        debug!(path = %path.display(), "Saved preferences");
        Ok(())
    }

    /// The stored tolerance as a validated value
    pub fn tolerance(&self) -> Result<Tolerance, ToleranceError> {
        Tolerance::new(self.tolerance)
    }

    /// Page size used for paging; never zero
    pub fn page_size(&self) -> usize {
        self.items_per_page.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_first_run_values() {
        let prefs = Preferences::default();
        assert_eq!(prefs.tolerance, 5);
        assert_eq!(prefs.items_per_page, 20);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope.json");

        assert_eq!(Preferences::try_load(&path).unwrap(), None);
        assert_eq!(Preferences::load(&path), Preferences::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("prefs.json");
        let prefs = Preferences {
            tolerance: 9,
            items_per_page: 7,
        };

        prefs.save(&path).unwrap();

        assert_eq!(Preferences::load(&path), prefs);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        fs::write(&path, "tolerance=9").unwrap();

        assert!(matches!(
            Preferences::try_load(&path),
            Err(PreferencesError::Parse { .. })
        ));
        assert_eq!(Preferences::load(&path), Preferences::default());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        fs::write(&path, r#"{"tolerance": 12}"#).unwrap();

        let prefs = Preferences::load(&path);
        assert_eq!(prefs.tolerance, 12);
        assert_eq!(prefs.items_per_page, DEFAULT_ITEMS_PER_PAGE);
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let prefs = Preferences {
            items_per_page: 0,
            ..Default::default()
        };
        assert_eq!(prefs.page_size(), 1);
    }

    #[test]
    fn negative_stored_tolerance_is_rejected_on_use() {
        let prefs = Preferences {
            tolerance: -2,
            ..Default::default()
        };
        assert_eq!(
            prefs.tolerance(),
            Err(ToleranceError::Negative { value: -2 })
        );
    }
}
