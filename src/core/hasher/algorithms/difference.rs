//! Difference Hash (dHash) implementation.
//!
//! dHash works by:
//! 1. Converting to grayscale and shrinking to (hash_size+1) x hash_size
//! 2. Comparing each pixel to the one on its right
//! 3. Setting the bit when the left pixel is brighter
//!
//! This captures the direction of brightness gradients.

use super::super::resize::resize_to_grayscale;
use super::super::traits::{Fingerprint, HashAlgorithm, HashAlgorithmKind};
use crate::error::HashError;
use image::DynamicImage;

/// Difference Hash (dHash) implementation
pub struct DifferenceHasher {
    /// Rows in the comparison grid; the hash has hash_size² bits
    hash_size: u32,
}

impl DifferenceHasher {
    /// Create a new dHash hasher
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

impl HashAlgorithm for DifferenceHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, HashError> {
        let n = self.hash_size;
        // One extra column so every cell has a right-hand neighbour
        let gray = resize_to_grayscale(image, n + 1, n)?;

        let grid = &gray;
        let bits = (0..n).flat_map(move |y| {
            (0..n).map(move |x| grid.get_pixel(x, y)[0] > grid.get_pixel(x + 1, y)[0])
        });

        Ok(Fingerprint::from_bits(bits, HashAlgorithmKind::Difference))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Difference
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::PerceptualHash;
    use image::{ImageBuffer, Rgb};

    fn create_solid_image(v: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(100, 100, |_, _| Rgb([v, v, v])))
    }

    fn create_left_to_right_gradient() -> DynamicImage {
        let img = ImageBuffer::from_fn(100, 100, |x, _| {
            let brightness = (x * 255 / 99) as u8;
            Rgb([brightness, brightness, brightness])
        });
        DynamicImage::ImageRgb8(img)
    }

    fn create_right_to_left_gradient() -> DynamicImage {
        let img = ImageBuffer::from_fn(100, 100, |x, _| {
            let brightness = ((99 - x) * 255 / 99) as u8;
            Rgb([brightness, brightness, brightness])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn identical_images_produce_identical_hash() {
        let hasher = DifferenceHasher::new(8);
        let image = create_solid_image(128);

        let hash1 = hasher.hash_image(&image).unwrap();
        let hash2 = hasher.hash_image(&image).unwrap();

        assert_eq!(hash1.distance(&hash2), 0);
    }

    #[test]
    fn opposite_gradients_are_maximally_different() {
        let hasher = DifferenceHasher::new(8);

        // Brightening to the right never sets a bit; darkening always does
        let rising = hasher.hash_image(&create_left_to_right_gradient()).unwrap();
        let falling = hasher.hash_image(&create_right_to_left_gradient()).unwrap();

        assert_eq!(rising.as_bytes(), &[0x00; 8]);
        assert_eq!(falling.as_bytes(), &[0xFF; 8]);
        assert_eq!(rising.distance(&falling), 64);
    }

    #[test]
    fn hash_size_affects_output_length() {
        let image = create_solid_image(128);

        let hash_8 = DifferenceHasher::new(8).hash_image(&image).unwrap();
        let hash_16 = DifferenceHasher::new(16).hash_image(&image).unwrap();

        assert_eq!(hash_8.as_bytes().len(), 8);
        assert_eq!(hash_16.as_bytes().len(), 32);
    }

    #[test]
    fn kind_returns_difference() {
        assert_eq!(DifferenceHasher::new(8).kind(), HashAlgorithmKind::Difference);
    }
}
