//! # Block-Bucketed Matcher
//!
//! Skips most of the quadratic comparison work without changing the result.
//!
//! ## How It Works
//! A tolerance `t` admits distances up to `t - 1`. Split every fingerprint
//! into `t` contiguous blocks: `t - 1` differing bits can touch at most
//! `t - 1` blocks, so any admitted pair agrees exactly on at least one block
//! (pigeonhole). Each block value is a bucket key; only records sharing a
//! bucket are compared, and each candidate is verified with the exact distance.
//!
//! Candidates are visited in `(i, j)` order, so the output is identical to
//! [`super::ExhaustiveMatcher`]'s, pair for pair.
//!
//! ## Fallback
//! When `t` exceeds the fingerprint width, or fingerprints differ in width,
//! blocks cannot be formed and the exhaustive matcher is used instead.

use super::{hashed_records, DuplicatePair, ExhaustiveMatcher, HashRecord, Matcher, Tolerance};
use crate::core::hasher::{pack_bits, Fingerprint, PerceptualHash};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::debug;

/// Pigeonhole block index matcher
#[derive(Debug, Clone, Copy, Default)]
pub struct BucketedMatcher;

/// Bucket key: block number and the packed bits of that block
type BlockKey = (usize, Vec<u8>);

impl BucketedMatcher {
    /// Contiguous `[start, end)` bit ranges splitting `bits` into `blocks` parts
    fn block_ranges(bits: usize, blocks: usize) -> Vec<(usize, usize)> {
        (0..blocks)
            .map(|k| (k * bits / blocks, (k + 1) * bits / blocks))
            .collect()
    }

    fn block_key(fingerprint: &Fingerprint, block: usize, range: (usize, usize)) -> BlockKey {
        let bits = (range.0..range.1).map(|i| fingerprint.bit(i));
        (block, pack_bits(bits))
    }

    /// Candidate index pairs `(i, j)`, `i < j`, sharing at least one block
    fn candidates(hashed: &[(&Path, &Fingerprint)], blocks: usize) -> BTreeSet<(usize, usize)> {
        let bits = hashed[0].1.bit_count() as usize;
        let ranges = Self::block_ranges(bits, blocks);

        let mut buckets: HashMap<BlockKey, Vec<usize>> = HashMap::new();
        for (idx, (_, fingerprint)) in hashed.iter().enumerate() {
            for (block, range) in ranges.iter().enumerate() {
                buckets
                    .entry(Self::block_key(fingerprint, block, *range))
                    .or_default()
                    .push(idx);
            }
        }

        let mut candidates = BTreeSet::new();
        for members in buckets.values() {
            // Members were pushed in index order
            for a in 0..members.len() {
                for b in (a + 1)..members.len() {
                    candidates.insert((members[a], members[b]));
                }
            }
        }
        candidates
    }
}

impl Matcher for BucketedMatcher {
    fn find_pairs(&self, records: &[HashRecord], tolerance: Tolerance) -> Vec<DuplicatePair> {
        let Some(max_distance) = tolerance.max_admitted() else {
            return Vec::new();
        };

        let hashed: Vec<_> = hashed_records(records).collect();
        if hashed.len() < 2 {
            return Vec::new();
        }

        let bits = hashed[0].1.bit_count();
        let uniform = hashed.iter().all(|(_, fp)| fp.bit_count() == bits);
        let blocks = max_distance as usize + 1;

        if !uniform || blocks > bits as usize {
            debug!(blocks, bits, uniform, "Block index not applicable, comparing all pairs");
            return ExhaustiveMatcher.find_pairs(records, tolerance);
        }

        let candidates = Self::candidates(&hashed, blocks);
        let mut pairs = Vec::new();

        for &(i, j) in &candidates {
            let (path_a, hash_a) = hashed[i];
            let (path_b, hash_b) = hashed[j];
            if path_a.as_os_str() == path_b.as_os_str() {
                continue;
            }

            let distance = hash_a.distance(hash_b);
            if tolerance.admits(distance) {
                pairs.push(DuplicatePair::new(path_a, path_b, distance));
            }
        }

        debug!(
            images = hashed.len(),
            candidates = candidates.len(),
            pairs = pairs.len(),
            "Bucketed matching finished"
        );
        pairs
    }

    fn name(&self) -> &'static str {
        "bucketed"
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{record, synthetic_records};
    use super::*;

    fn tol(value: i64) -> Tolerance {
        Tolerance::new(value).unwrap()
    }

    #[test]
    fn block_ranges_cover_all_bits() {
        let ranges = BucketedMatcher::block_ranges(64, 5);
        assert_eq!(ranges.first().map(|r| r.0), Some(0));
        assert_eq!(ranges.last().map(|r| r.1), Some(64));
        for window in ranges.windows(2) {
            assert_eq!(window[0].1, window[1].0);
        }
    }

    #[test]
    fn matches_exhaustive_for_many_tolerances() {
        let records = synthetic_records(90);

        for t in [0, 1, 2, 3, 5, 8, 13, 40, 64, 65, 100] {
            let expected = ExhaustiveMatcher.find_pairs(&records, tol(t));
            let actual = BucketedMatcher.find_pairs(&records, tol(t));
            assert_eq!(actual, expected, "tolerance {}", t);
        }
    }

    #[test]
    fn preserves_exhaustive_ordering() {
        let records = vec![
            record("/z.jpg", &[0x00]),
            record("/y.jpg", &[0x01]),
            record("/x.jpg", &[0x03]),
        ];

        let expected = ExhaustiveMatcher.find_pairs(&records, tol(3));
        let actual = BucketedMatcher.find_pairs(&records, tol(3));

        assert_eq!(actual.len(), 3);
        let expected_distances: Vec<_> = expected.iter().map(|p| p.distance()).collect();
        let actual_distances: Vec<_> = actual.iter().map(|p| p.distance()).collect();
        assert_eq!(actual, expected);
        assert_eq!(actual_distances, expected_distances);
    }

    #[test]
    fn mixed_widths_fall_back_to_exhaustive() {
        let records = vec![record("/a.jpg", &[0x00]), record("/b.jpg", &[0x00, 0x00])];
        // Width mismatch adds 8 bits of distance
        assert!(BucketedMatcher.find_pairs(&records, tol(8)).is_empty());
        assert_eq!(BucketedMatcher.find_pairs(&records, tol(9)).len(), 1);
    }

    #[test]
    fn zero_tolerance_is_empty() {
        let records = vec![record("/a.jpg", &[0xAA]), record("/b.jpg", &[0xAA])];
        assert!(BucketedMatcher.find_pairs(&records, tol(0)).is_empty());
    }
}
