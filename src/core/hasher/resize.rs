//! Grayscale downsampling with fast_image_resize.
//!
//! Hashes that work on raw pixel grids (dHash, aHash) first reduce the image
//! to a single luminance channel, then shrink it to a tiny fixed grid.

use crate::error::HashError;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma};

/// Reusable grayscale resizer
pub struct GrayResizer {
    resizer: Resizer,
}

impl GrayResizer {
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
        }
    }

    /// Convert to luminance and resize to exactly `width` x `height`.
    pub fn resize_to_grayscale(
        &mut self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, HashError> {
        let gray = image.to_luma8();
        let (src_width, src_height) = gray.dimensions();

        if src_width == 0 || src_height == 0 {
            return Err(HashError::ComputationFailed(
                "source image has a zero dimension".to_string(),
            ));
        }

        if width == 0 || height == 0 {
            return Err(HashError::ComputationFailed(format!(
                "invalid target size {}x{}",
                width, height
            )));
        }

        let src_image = Image::from_vec_u8(src_width, src_height, gray.into_raw(), PixelType::U8)
            .map_err(|e| HashError::ComputationFailed(format!("source buffer: {}", e)))?;

        let mut dst_image = Image::new(width, height, PixelType::U8);

        // Box filter averages every source pixel into the grid cell it covers
        let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Box));

        self.resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| HashError::ComputationFailed(format!("resize failed: {}", e)))?;

        let result: ImageBuffer<Luma<u8>, Vec<u8>> =
            ImageBuffer::from_raw(width, height, dst_image.into_vec()).ok_or_else(|| {
                HashError::ComputationFailed("resized buffer has unexpected size".to_string())
            })?;

        Ok(result)
    }
}

impl Default for GrayResizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function for one-off resizing
pub fn resize_to_grayscale(
    image: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<GrayImage, HashError> {
    GrayResizer::new().resize_to_grayscale(image, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            Rgb([r, g, 64])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn resize_produces_correct_dimensions() {
        let resized = resize_to_grayscale(&create_test_image(100, 100), 8, 8).unwrap();
        assert_eq!(resized.dimensions(), (8, 8));
    }

    #[test]
    fn resize_non_square_target() {
        let resized = resize_to_grayscale(&create_test_image(200, 100), 9, 8).unwrap();
        assert_eq!(resized.dimensions(), (9, 8));
    }

    #[test]
    fn resize_can_upscale_tiny_images() {
        let resized = resize_to_grayscale(&create_test_image(2, 2), 8, 8).unwrap();
        assert_eq!(resized.dimensions(), (8, 8));
    }

    #[test]
    fn zero_target_is_rejected() {
        assert!(resize_to_grayscale(&create_test_image(10, 10), 0, 8).is_err());
    }

    #[test]
    fn resizer_reuse_is_deterministic() {
        let mut resizer = GrayResizer::new();
        let image = create_test_image(64, 48);

        let first = resizer.resize_to_grayscale(&image, 8, 8).unwrap();
        let second = resizer.resize_to_grayscale(&image, 8, 8).unwrap();

        assert_eq!(first.into_raw(), second.into_raw());
    }
}
