//! Perceptual Hash (pHash) implementation.
//!
//! The image is reduced to luminance, shrunk, and passed through a DCT; each
//! bit records whether a low-frequency coefficient lies above the mean. This
//! survives recompression, resizing and small brightness shifts.
//!
//! The transform itself comes from the image_hasher crate.

use super::super::traits::{Fingerprint, HashAlgorithm, HashAlgorithmKind};
use crate::error::HashError;
use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig as ImageHasherConfig};

/// DCT mean hash
pub struct PerceptualHasher {
    hasher: image_hasher::Hasher,
}

impl PerceptualHasher {
    /// Create a pHash hasher producing `hash_size * hash_size` bits
    pub fn new(hash_size: u32) -> Self {
        let hasher = ImageHasherConfig::new()
            .hash_size(hash_size, hash_size)
            .hash_alg(HashAlg::Mean)
            .preproc_dct()
            .to_hasher();

        Self { hasher }
    }
}

impl HashAlgorithm for PerceptualHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, HashError> {
        // image_hasher converts to luma internally; doing it here keeps alpha
        // channels out of the hash.
        let luma = DynamicImage::ImageLuma8(image.to_luma8());
        let hash = self.hasher.hash_image(&luma);

        Ok(Fingerprint::new(
            hash.as_bytes().to_vec(),
            HashAlgorithmKind::Perceptual,
        ))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Perceptual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::PerceptualHash;
    use image::{ImageBuffer, Rgb};

    fn pattern(offset: u8) -> DynamicImage {
        let img = ImageBuffer::from_fn(100, 100, |x, y| {
            let v = if (x / 25 + y / 25) % 2 == 0 { 200 } else { 40 };
            let v = (v as u8).saturating_add(offset);
            Rgb([v, v, v])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn identical_images_produce_identical_hash() {
        let hasher = PerceptualHasher::new(8);
        let image = pattern(0);

        let hash1 = hasher.hash_image(&image).unwrap();
        let hash2 = hasher.hash_image(&image).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.distance(&hash2), 0);
    }

    #[test]
    fn hash_has_64_bits_for_size_8() {
        let hash = PerceptualHasher::new(8).hash_image(&pattern(0)).unwrap();
        assert_eq!(hash.bit_count(), 64);
    }

    #[test]
    fn brightness_shift_stays_close() {
        let hasher = PerceptualHasher::new(8);

        let hash1 = hasher.hash_image(&pattern(0)).unwrap();
        let hash2 = hasher.hash_image(&pattern(10)).unwrap();

        assert!(hash1.distance(&hash2) < 10);
    }

    #[test]
    fn kind_returns_perceptual() {
        assert_eq!(PerceptualHasher::new(8).kind(), HashAlgorithmKind::Perceptual);
    }
}
