//! # Results Module
//!
//! Canonical, de-duplicated pair lists for presentation and deletion.
//!
//! A single matcher run never reports the same pair twice, but callers that
//! merge several runs, or feed in pairs from elsewhere, can. [`ResultSet`]
//! sorts each pair's paths, drops repeats and orders the list
//! lexicographically so the same input always renders the same way.

use crate::core::matcher::DuplicatePair;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// An ordered set of canonical duplicate pairs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pairs: Vec<DuplicatePair>,
}

impl ResultSet {
    /// Canonicalize and de-duplicate pairs.
    ///
    /// Output is sorted by (first, second) path. When a pair repeats, the
    /// entry with the smallest distance is kept. Idempotent.
    pub fn canonicalize(pairs: impl IntoIterator<Item = DuplicatePair>) -> Vec<DuplicatePair> {
        let mut pairs: Vec<_> = pairs.into_iter().map(DuplicatePair::canonical).collect();
        pairs.sort_by(|a, b| a.cmp(b).then(a.distance().cmp(&b.distance())));
        pairs.dedup();
        pairs
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = DuplicatePair>) -> Self {
        Self {
            pairs: Self::canonicalize(pairs),
        }
    }

    /// Combine the pair lists of several runs
    pub fn merge(runs: impl IntoIterator<Item = Vec<DuplicatePair>>) -> Self {
        Self::from_pairs(runs.into_iter().flatten())
    }

    pub fn pairs(&self) -> &[DuplicatePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Every distinct path mentioned, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        let unique: BTreeSet<_> = self
            .pairs
            .iter()
            .flat_map(|p| [p.first().as_os_str(), p.second().as_os_str()])
            .collect();
        unique.into_iter().map(PathBuf::from).collect()
    }

    /// Drop every pair that references `path`; returns how many were removed
    pub fn remove_path(&mut self, path: &Path) -> usize {
        let before = self.pairs.len();
        self.pairs.retain(|p| !p.contains(path));
        before - self.pairs.len()
    }

    /// A copy without any pair referencing `path`
    pub fn without_path(&self, path: &Path) -> Self {
        let mut copy = self.clone();
        copy.remove_path(path);
        copy
    }
}

impl From<Vec<DuplicatePair>> for ResultSet {
    fn from(pairs: Vec<DuplicatePair>) -> Self {
        Self::from_pairs(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: &str, b: &str, distance: u32) -> DuplicatePair {
        DuplicatePair::new(a, b, distance)
    }

    fn as_strings(pairs: &[DuplicatePair]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|p| {
                (
                    p.first().display().to_string(),
                    p.second().display().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn canonicalize_sorts_and_dedupes() {
        let out = ResultSet::canonicalize(vec![
            pair("/b.jpg", "/a.jpg", 2),
            pair("/c.jpg", "/a.jpg", 1),
            pair("/a.jpg", "/b.jpg", 2),
        ]);

        assert_eq!(
            as_strings(&out),
            vec![
                ("/a.jpg".to_string(), "/b.jpg".to_string()),
                ("/a.jpg".to_string(), "/c.jpg".to_string()),
            ]
        );
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let input = vec![
            pair("/z.png", "/y.png", 3),
            pair("/y.png", "/z.png", 1),
            pair("/m/a.jpg", "/b.jpg", 0),
        ];

        let once = ResultSet::canonicalize(input);
        let twice = ResultSet::canonicalize(once.clone());

        assert_eq!(once, twice);
        assert_eq!(
            once.iter().map(|p| p.distance()).collect::<Vec<_>>(),
            twice.iter().map(|p| p.distance()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn repeated_pair_keeps_smallest_distance() {
        let out = ResultSet::canonicalize(vec![pair("/a.jpg", "/b.jpg", 4), pair("/b.jpg", "/a.jpg", 1)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].distance(), 1);
    }

    #[test]
    fn merge_combines_runs() {
        let set = ResultSet::merge(vec![
            vec![pair("/a.jpg", "/b.jpg", 0)],
            vec![pair("/b.jpg", "/a.jpg", 0), pair("/c.jpg", "/d.jpg", 2)],
        ]);

        assert_eq!(set.len(), 2);
        assert_eq!(set.paths().len(), 4);
    }

    #[test]
    fn remove_path_drops_referencing_pairs() {
        let mut set = ResultSet::from_pairs(vec![
            pair("/a.jpg", "/b.jpg", 0),
            pair("/a.jpg", "/c.jpg", 0),
            pair("/d.jpg", "/e.jpg", 0),
        ]);

        assert_eq!(set.remove_path(Path::new("/a.jpg")), 2);
        assert_eq!(
            as_strings(set.pairs()),
            vec![("/d.jpg".to_string(), "/e.jpg".to_string())]
        );
        assert!(set.without_path(Path::new("/e.jpg")).is_empty());
    }
}
