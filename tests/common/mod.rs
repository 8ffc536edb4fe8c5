//! Shared fixtures for integration tests.
//!
//! Images are built so their dHash is known in advance: each row starts at
//! mid-grey and steps down for a 1 bit or up for a 0 bit, then every cell is
//! blown up to a 10x10 block so downsampling recovers the grid exactly.

#![allow(dead_code)]

use image::{GrayImage, Luma};
use std::path::{Path, PathBuf};

const GRID: usize = 8;
const BLOCK: u32 = 10;
const STEP: i32 = 12;

/// 64 bits with the first `ones` set
pub fn bits_with_prefix(ones: usize) -> Vec<bool> {
    (0..GRID * GRID).map(|i| i < ones).collect()
}

/// A greyscale image whose 8x8 dHash is exactly `bits`
pub fn dhash_image(bits: &[bool]) -> GrayImage {
    assert_eq!(bits.len(), GRID * GRID);

    let mut grid = [[0u8; GRID + 1]; GRID];
    for (row, cells) in grid.iter_mut().enumerate() {
        let mut value: i32 = 128;
        cells[0] = value as u8;
        for col in 0..GRID {
            value += if bits[row * GRID + col] { -STEP } else { STEP };
            cells[col + 1] = value as u8;
        }
    }

    GrayImage::from_fn((GRID as u32 + 1) * BLOCK, GRID as u32 * BLOCK, |x, y| {
        Luma([grid[(y / BLOCK) as usize][(x / BLOCK) as usize]])
    })
}

/// Save a dHash fixture under `dir` and return its path
pub fn write_dhash_image(dir: &Path, name: &str, bits: &[bool]) -> PathBuf {
    let path = dir.join(name);
    dhash_image(bits).save(&path).unwrap();
    path
}

/// Save a fixture whose hash has its first `ones` bits set
pub fn write_prefix_image(dir: &Path, name: &str, ones: usize) -> PathBuf {
    write_dhash_image(dir, name, &bits_with_prefix(ones))
}
