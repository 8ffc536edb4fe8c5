//! # Review Module
//!
//! State for browsing found pairs a page at a time and deleting copies.
//!
//! A [`ReviewSession`] is created once per result set and passed to whatever
//! renders it. The session owns the pair list, the current page and the set of
//! selected paths. Deletion goes through a [`FileRemover`], so the engine
//! itself never touches files.

use crate::core::matcher::DuplicatePair;
use crate::core::results::ResultSet;
use crate::error::ReviewError;
use crate::preferences::Preferences;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Removes files on behalf of a review session
pub trait FileRemover {
    fn remove(&self, path: &Path) -> std::io::Result<()>;
}

/// Deletes files from disk with [`std::fs::remove_file`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl FileRemover for FsRemover {
    fn remove(&self, path: &Path) -> std::io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// One row of the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEntry<'a> {
    /// Position in the whole result list, stable across pages
    pub index: usize,
    pub pair: &'a DuplicatePair,
}

/// Which image of a pair to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

impl Side {
    /// Parse the 1-based side number used in prompts
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Side::First),
            2 => Some(Side::Second),
            _ => None,
        }
    }

    pub fn of<'a>(&self, pair: &'a DuplicatePair) -> &'a Path {
        match self {
            Side::First => pair.first(),
            Side::Second => pair.second(),
        }
    }
}

/// Outcome of deleting the selection
#[derive(Debug, Default)]
pub struct DeleteSummary {
    pub deleted: Vec<PathBuf>,
    pub errors: Vec<ReviewError>,
}

/// Paged view over a result set with selection and deletion
#[derive(Debug, Clone)]
pub struct ReviewSession {
    results: ResultSet,
    page: usize,
    page_size: usize,
    selected: BTreeSet<PathBuf>,
}

impl ReviewSession {
    /// Start a session; pairs are canonicalized and de-duplicated first.
    /// A page size of 0 is treated as 1.
    pub fn new(pairs: impl IntoIterator<Item = DuplicatePair>, page_size: usize) -> Self {
        Self {
            results: ResultSet::from_pairs(pairs),
            page: 0,
            page_size: page_size.max(1),
            selected: BTreeSet::new(),
        }
    }

    pub fn with_preferences(
        pairs: impl IntoIterator<Item = DuplicatePair>,
        preferences: &Preferences,
    ) -> Self {
        Self::new(pairs, preferences.page_size())
    }

    pub fn pairs(&self) -> &[DuplicatePair] {
        self.results.pairs()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages; an empty session still has one (empty) page
    pub fn page_count(&self) -> usize {
        self.len().div_ceil(self.page_size).max(1)
    }

    /// Zero-based index of the current page
    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn page_entries(&self) -> Vec<PageEntry<'_>> {
        let start = self.page * self.page_size;
        self.pairs()
            .iter()
            .enumerate()
            .skip(start)
            .take(self.page_size)
            .map(|(index, pair)| PageEntry { index, pair })
            .collect()
    }

    /// Returns false when already on the last page
    pub fn next_page(&mut self) -> bool {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Returns false when already on the first page
    pub fn prev_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to a page, clamped to the valid range
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
    }

    /// Look up a pair by its global index
    pub fn entry(&self, index: usize) -> Result<&DuplicatePair, ReviewError> {
        self.pairs()
            .get(index)
            .ok_or(ReviewError::NoSuchEntry { index })
    }

    /// Flip selection for a path; returns whether it is now selected
    pub fn toggle_selection(&mut self, path: &Path) -> bool {
        if self.selected.remove(path) {
            false
        } else {
            self.selected.insert(path.to_path_buf());
            true
        }
    }

    pub fn is_selected(&self, path: &Path) -> bool {
        self.selected.contains(path)
    }

    pub fn selected(&self) -> impl Iterator<Item = &Path> {
        self.selected.iter().map(PathBuf::as_path)
    }

    /// Delete one file and forget every pair that mentions it.
    ///
    /// Returns how many pairs were dropped. On failure the session is unchanged.
    pub fn delete(&mut self, path: &Path, remover: &dyn FileRemover) -> Result<usize, ReviewError> {
        remover.remove(path).map_err(|source| ReviewError::Delete {
            path: path.to_path_buf(),
            source,
        })?;

        let dropped = self.results.remove_path(path);
        self.selected.remove(path);
        self.go_to_page(self.page);

        info!(path = %path.display(), pairs_dropped = dropped, "Deleted image");
        Ok(dropped)
    }

    /// Delete every selected path, continuing past failures
    pub fn delete_selected(&mut self, remover: &dyn FileRemover) -> DeleteSummary {
        let targets: Vec<PathBuf> = self.selected.iter().cloned().collect();
        let mut summary = DeleteSummary::default();

        for path in targets {
            match self.delete(&path, remover) {
                Ok(_) => summary.deleted.push(path),
                Err(e) => summary.errors.push(e),
            }
        }

        summary
    }
}
