//! Average Hash (aHash) implementation.
//!
//! Each pixel of a hash_size x hash_size grayscale thumbnail sets its bit when
//! it is brighter than the thumbnail's mean. Fast, but the least tolerant of edits.

use super::super::resize::resize_to_grayscale;
use super::super::traits::{Fingerprint, HashAlgorithm, HashAlgorithmKind};
use crate::error::HashError;
use image::DynamicImage;

/// Average Hash (aHash) implementation
pub struct AverageHasher {
    hash_size: u32,
}

impl AverageHasher {
    /// Create a new aHash hasher
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

impl HashAlgorithm for AverageHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, HashError> {
        let gray = resize_to_grayscale(image, self.hash_size, self.hash_size)?;

        let count = gray.width() as u64 * gray.height() as u64;
        if count == 0 {
            return Err(HashError::ComputationFailed("empty thumbnail".to_string()));
        }
        let total: u64 = gray.pixels().map(|p| p[0] as u64).sum();
        let average = total / count;

        let bits = gray.pixels().map(|p| p[0] as u64 > average);

        Ok(Fingerprint::from_bits(bits, HashAlgorithmKind::Average))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Average
    }
}
