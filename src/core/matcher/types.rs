//! Value types shared by the matcher, the finder and the result set.

use crate::core::hasher::Fingerprint;
use crate::error::{HashFailure, ToleranceError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Tolerance used when the caller has no preference
pub const DEFAULT_TOLERANCE: u32 = 5;

/// One scanned file together with its hashing outcome
#[derive(Debug, Clone)]
pub struct HashRecord {
    path: PathBuf,
    outcome: Result<Fingerprint, HashFailure>,
}

impl HashRecord {
    /// Build from a hasher result for `path`
    pub fn from_outcome(path: impl Into<PathBuf>, outcome: Result<Fingerprint, HashFailure>) -> Self {
        Self {
            path: path.into(),
            outcome,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.outcome.as_ref().ok()
    }

    pub fn failure(&self) -> Option<&HashFailure> {
        self.outcome.as_ref().err()
    }

    pub fn is_hashed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Maximum Hamming distance (exclusive) for two fingerprints to count as duplicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tolerance(u32);

impl Tolerance {
    /// Validate a caller-supplied tolerance.
    ///
    /// Only negative values are rejected. Values beyond `u32::MAX` are
    /// clamped; they already admit every possible distance.
    pub fn new(value: i64) -> Result<Self, ToleranceError> {
        if value < 0 {
            return Err(ToleranceError::Negative { value });
        }
        Ok(Tolerance(u32::try_from(value).unwrap_or(u32::MAX)))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// `distance < tolerance`
    pub fn admits(&self, distance: u32) -> bool {
        distance < self.0
    }

    /// Largest admitted distance, or None when nothing can match
    pub fn max_admitted(&self) -> Option<u32> {
        self.0.checked_sub(1)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance(DEFAULT_TOLERANCE)
    }
}

impl TryFrom<i64> for Tolerance {
    type Error = ToleranceError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Tolerance::new(value)
    }
}

impl std::fmt::Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An unordered pair of similar images.
///
/// Always stored in canonical order (`first <= second` by path string).
/// Identity, equality and ordering use the two paths only; `distance` is
/// carried along for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicatePair {
    first: PathBuf,
    second: PathBuf,
    distance: u32,
}

impl DuplicatePair {
    pub fn new(a: impl Into<PathBuf>, b: impl Into<PathBuf>, distance: u32) -> Self {
        let (a, b) = (a.into(), b.into());
        let (first, second) = if a.as_os_str() <= b.as_os_str() {
            (a, b)
        } else {
            (b, a)
        };
        Self {
            first,
            second,
            distance,
        }
    }

    pub fn first(&self) -> &Path {
        &self.first
    }

    pub fn second(&self) -> &Path {
        &self.second
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// The same pair with its paths in canonical order
    pub fn canonical(self) -> Self {
        Self::new(self.first, self.second, self.distance)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.first.as_os_str() == path.as_os_str() || self.second.as_os_str() == path.as_os_str()
    }

    fn key(&self) -> (&std::ffi::OsStr, &std::ffi::OsStr) {
        (self.first.as_os_str(), self.second.as_os_str())
    }
}

impl PartialEq for DuplicatePair {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for DuplicatePair {}

impl Hash for DuplicatePair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for DuplicatePair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DuplicatePair {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_rejects_negative() {
        assert_eq!(
            Tolerance::new(-1),
            Err(ToleranceError::Negative { value: -1 })
        );
    }

    #[test]
    fn huge_tolerance_is_clamped_and_admits_everything() {
        let huge = Tolerance::new(i64::MAX).unwrap();
        assert_eq!(huge.value(), u32::MAX);
        assert!(huge.admits(1024));

        let just_over = Tolerance::new(u32::MAX as i64 + 1).unwrap();
        assert_eq!(just_over, huge);
    }

    #[test]
    fn tolerance_zero_admits_nothing() {
        let zero = Tolerance::new(0).unwrap();
        assert!(!zero.admits(0));
        assert_eq!(zero.max_admitted(), None);
    }

    #[test]
    fn tolerance_is_exclusive() {
        let five = Tolerance::new(5).unwrap();
        assert!(five.admits(4));
        assert!(!five.admits(5));
        assert_eq!(five.max_admitted(), Some(4));
        assert_eq!(Tolerance::default().value(), 5);
    }

    #[test]
    fn pair_is_canonical_on_construction() {
        let pair = DuplicatePair::new("/b.jpg", "/a.jpg", 3);
        assert_eq!(pair.first(), Path::new("/a.jpg"));
        assert_eq!(pair.second(), Path::new("/b.jpg"));
    }

    #[test]
    fn pair_equality_ignores_order_and_distance() {
        let ab = DuplicatePair::new("/a.jpg", "/b.jpg", 1);
        let ba = DuplicatePair::new("/b.jpg", "/a.jpg", 4);
        assert_eq!(ab, ba);
    }

    #[test]
    fn pair_contains_either_member() {
        let pair = DuplicatePair::new("/a.jpg", "/b.jpg", 0);
        assert!(pair.contains(Path::new("/a.jpg")));
        assert!(pair.contains(Path::new("/b.jpg")));
        assert!(!pair.contains(Path::new("/c.jpg")));
    }

    #[test]
    fn record_accessors() {
        let failed = HashRecord::from_outcome("/x.png", Err(HashFailure::new("/x.png", "truncated")));
        assert!(!failed.is_hashed());
        assert!(failed.fingerprint().is_none());
        assert_eq!(failed.path(), Path::new("/x.png"));
        assert_eq!(failed.failure().map(|f| f.reason.as_str()), Some("truncated"));
    }
}
