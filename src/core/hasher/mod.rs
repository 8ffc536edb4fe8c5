//! # Hasher Module
//!
//! Computes perceptual fingerprints for images.
//!
//! ## Supported Algorithms
//! - **pHash (Perceptual Hash)** - DCT-based, the default
//! - **dHash (Difference Hash)** - brightness gradients between neighbours
//! - **aHash (Average Hash)** - brightness against the mean
//!
//! ## How It Works
//! 1. Decode the file (zune-jpeg for JPEG, the image crate otherwise)
//! 2. Reduce to a single luminance channel
//! 3. Shrink to a small square grid
//! 4. Derive one bit per grid cell or DCT coefficient
//!
//! Fingerprints are compared by Hamming distance.
//!
//! ## Example
//! ```rust,ignore
//! use dupli_pic_finder::core::hasher::{HasherConfig, HashAlgorithmKind};
//!
//! let hasher = HasherConfig::new()
//!     .algorithm(HashAlgorithmKind::Difference)
//!     .build()?;
//!
//! match hasher.compute_fingerprint(&path) {
//!     Ok(fingerprint) => println!("{}", fingerprint.to_hex()),
//!     Err(failure) => eprintln!("{}", failure),
//! }
//! ```

mod algorithms;
pub mod decode;
pub mod resize;
mod traits;

pub use algorithms::{AverageHasher, DifferenceHasher, PerceptualHasher};
pub use traits::{Fingerprint, HashAlgorithm, HashAlgorithmKind, PerceptualHash};
pub(crate) use traits::pack_bits;

use crate::error::HashError;

/// Smallest grid edge that yields a meaningful hash
const MIN_HASH_SIZE: u32 = 2;
/// Largest grid edge accepted (1024-bit hashes)
const MAX_HASH_SIZE: u32 = 32;

/// Configuration builder for hashers
#[derive(Debug, Clone)]
pub struct HasherConfig {
    /// Grid edge length; the hash has hash_size² bits
    hash_size: u32,
    /// Algorithm to use
    algorithm: HashAlgorithmKind,
}

impl HasherConfig {
    /// pHash over an 8x8 grid (64 bits)
    pub fn new() -> Self {
        Self {
            hash_size: 8,
            algorithm: HashAlgorithmKind::Perceptual,
        }
    }

    /// Set the grid edge length (2-32)
    ///
    /// - 8: 64 bits, the usual choice
    /// - 16: 256 bits, finer discrimination, tolerances scale accordingly
    pub fn hash_size(mut self, size: u32) -> Self {
        self.hash_size = size;
        self
    }

    /// Set the hash algorithm
    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn kind(&self) -> HashAlgorithmKind {
        self.algorithm
    }

    /// Build the hasher
    pub fn build(self) -> Result<Box<dyn HashAlgorithm>, HashError> {
        if !(MIN_HASH_SIZE..=MAX_HASH_SIZE).contains(&self.hash_size) {
            return Err(HashError::ComputationFailed(format!(
                "hash size {} is outside {}..={}",
                self.hash_size, MIN_HASH_SIZE, MAX_HASH_SIZE
            )));
        }

        Ok(match self.algorithm {
            HashAlgorithmKind::Perceptual => Box::new(PerceptualHasher::new(self.hash_size)),
            HashAlgorithmKind::Difference => Box::new(DifferenceHasher::new(self.hash_size)),
            HashAlgorithmKind::Average => Box::new(AverageHasher::new(self.hash_size)),
        })
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn config_defaults_to_phash() {
        let config = HasherConfig::new();
        assert_eq!(config.algorithm, HashAlgorithmKind::Perceptual);
        assert_eq!(config.hash_size, 8);
    }

    #[test]
    fn config_builder_works() {
        let config = HasherConfig::new()
            .algorithm(HashAlgorithmKind::Average)
            .hash_size(16);

        assert_eq!(config.algorithm, HashAlgorithmKind::Average);
        assert_eq!(config.hash_size, 16);
    }

    #[test]
    fn build_creates_matching_kind() {
        for kind in [
            HashAlgorithmKind::Perceptual,
            HashAlgorithmKind::Difference,
            HashAlgorithmKind::Average,
        ] {
            let hasher = HasherConfig::new().algorithm(kind).build().unwrap();
            assert_eq!(hasher.kind(), kind);
        }
    }

    #[test]
    fn build_rejects_degenerate_sizes() {
        assert!(HasherConfig::new().hash_size(0).build().is_err());
        assert!(HasherConfig::new().hash_size(64).build().is_err());
    }

    #[test]
    fn compute_fingerprint_reports_failure_for_missing_file() {
        let hasher = HasherConfig::new().build().unwrap();
        let path = Path::new("/nonexistent/dir/photo.jpg");

        let failure = hasher.compute_fingerprint(path).unwrap_err();

        assert_eq!(failure.path, path);
        assert!(!failure.reason.is_empty());
    }
}
