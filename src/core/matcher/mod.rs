//! # Matcher Module
//!
//! Finds duplicate pairs by comparing fingerprints under a tolerance.
//!
//! ## How It Works
//! Every unordered pair of successfully hashed images `(i, j)` with `i < j` in
//! input order is compared by Hamming distance. The pair is a duplicate when
//! `distance < tolerance`, so a tolerance of 0 matches nothing and a tolerance
//! of 1 matches only bit-identical fingerprints.
//!
//! Similarity is not treated as transitive: if A~B and B~C but not A~C, the
//! output holds (A,B) and (B,C) only. Clustering lives in
//! [`crate::core::grouper`].
//!
//! ## Strategies
//! - [`ExhaustiveMatcher`] - the all-pairs baseline
//! - [`BucketedMatcher`] - pigeonhole block index, same pairs in the same order

mod bucketed;
mod types;

pub use bucketed::BucketedMatcher;
pub use types::{DuplicatePair, HashRecord, Tolerance, DEFAULT_TOLERANCE};

use crate::core::hasher::PerceptualHash;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Strategy trait for pairwise matching
pub trait Matcher: Send + Sync {
    /// Compare all successfully hashed records and return the duplicate pairs
    /// in `(i, j)` input order. Failed records are ignored.
    fn find_pairs(&self, records: &[HashRecord], tolerance: Tolerance) -> Vec<DuplicatePair>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Available matching strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatcherKind {
    /// Compare every pair
    #[default]
    Exhaustive,
    /// Only compare pairs sharing an identical hash block
    Bucketed,
}

impl MatcherKind {
    pub fn build(self) -> Box<dyn Matcher> {
        match self {
            MatcherKind::Exhaustive => Box::new(ExhaustiveMatcher),
            MatcherKind::Bucketed => Box::new(BucketedMatcher),
        }
    }
}

/// The quadratic all-pairs matcher
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveMatcher;

impl Matcher for ExhaustiveMatcher {
    fn find_pairs(&self, records: &[HashRecord], tolerance: Tolerance) -> Vec<DuplicatePair> {
        let hashed: Vec<_> = hashed_records(records).collect();
        let mut pairs = Vec::new();
        let mut comparisons = 0usize;

        for i in 0..hashed.len() {
            for j in (i + 1)..hashed.len() {
                let (path_a, hash_a) = hashed[i];
                let (path_b, hash_b) = hashed[j];
                if path_a.as_os_str() == path_b.as_os_str() {
                    continue;
                }

                let distance = hash_a.distance(hash_b);
                comparisons += 1;

                if tolerance.admits(distance) {
                    pairs.push(DuplicatePair::new(path_a, path_b, distance));
                }
            }
        }

        debug!(
            images = hashed.len(),
            comparisons,
            pairs = pairs.len(),
            "Exhaustive matching finished"
        );
        pairs
    }

    fn name(&self) -> &'static str {
        "exhaustive"
    }
}

/// Find duplicate pairs with the exhaustive baseline
pub fn find_pairs(records: &[HashRecord], tolerance: Tolerance) -> Vec<DuplicatePair> {
    ExhaustiveMatcher.find_pairs(records, tolerance)
}

/// Successfully hashed records, in input order
pub(crate) fn hashed_records(
    records: &[HashRecord],
) -> impl Iterator<Item = (&std::path::Path, &crate::core::hasher::Fingerprint)> {
    records
        .iter()
        .filter_map(|r| r.fingerprint().map(|fp| (r.path(), fp)))
}
