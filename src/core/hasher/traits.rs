//! Trait definitions and the fingerprint value type.

use super::decode::ImageDecoder;
use crate::error::{HashError, HashFailure};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A computed perceptual hash that can be compared
pub trait PerceptualHash: Clone + Send + Sync {
    /// Hamming distance to another hash
    ///
    /// Number of differing bits. Lower distance = more similar images.
    fn distance(&self, other: &Self) -> u32;

    /// Get the raw hash bytes
    fn as_bytes(&self) -> &[u8];

    /// Get the hash as a hexadecimal string
    fn to_hex(&self) -> String {
        self.as_bytes().iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Get the total number of bits in this hash
    fn bit_count(&self) -> u32 {
        (self.as_bytes().len() * 8) as u32
    }
}

/// Available hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithmKind {
    /// Perceptual Hash (pHash) - DCT-based, the most robust to recompression
    Perceptual,
    /// Difference Hash (dHash) - compares adjacent pixel brightness
    Difference,
    /// Average Hash (aHash) - compares each pixel with the mean brightness
    Average,
}

impl HashAlgorithmKind {
    /// Get a human-readable description of the algorithm
    pub fn description(&self) -> &'static str {
        match self {
            HashAlgorithmKind::Perceptual => {
                "Perceptual Hash (pHash) - DCT-based, robust to recompression and resizing"
            }
            HashAlgorithmKind::Difference => {
                "Difference Hash (dHash) - Compares brightness gradients between pixels"
            }
            HashAlgorithmKind::Average => {
                "Average Hash (aHash) - Fast comparison based on average brightness"
            }
        }
    }
}

impl std::fmt::Display for HashAlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithmKind::Perceptual => write!(f, "pHash"),
            HashAlgorithmKind::Difference => write!(f, "dHash"),
            HashAlgorithmKind::Average => write!(f, "aHash"),
        }
    }
}

/// Trait for hash algorithm implementations
pub trait HashAlgorithm: Send + Sync {
    /// Compute a fingerprint from an already-decoded image
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, HashError>;

    /// Decode the file at `path` and hash it
    fn hash_file(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let image = ImageDecoder::decode(path)?;
        self.hash_image(&image)
    }

    /// Compute a fingerprint, folding every error into a [`HashFailure`]
    /// for `path`. The file is opened, decoded and closed within this call.
    fn compute_fingerprint(&self, path: &Path) -> Result<Fingerprint, HashFailure> {
        self.hash_file(path)
            .map_err(|e| HashFailure::new(path, e.to_string()))
    }

    /// Get the algorithm kind
    fn kind(&self) -> HashAlgorithmKind;
}

/// A fixed-length perceptual fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    /// The raw hash bits, most significant bit first
    bytes: Vec<u8>,
    /// The algorithm that produced this hash
    algorithm: HashAlgorithmKind,
}

impl Fingerprint {
    /// Create a new fingerprint
    pub fn new(bytes: Vec<u8>, algorithm: HashAlgorithmKind) -> Self {
        Self { bytes, algorithm }
    }

    /// Create from a bit sequence, packing MSB first
    pub fn from_bits(bits: impl IntoIterator<Item = bool>, algorithm: HashAlgorithmKind) -> Self {
        Self::new(pack_bits(bits), algorithm)
    }

    /// Value of bit `index`, MSB-first across the byte sequence
    pub fn bit(&self, index: usize) -> bool {
        let byte = self.bytes[index / 8];
        (byte >> (7 - index % 8)) & 1 == 1
    }
}

impl PerceptualHash for Fingerprint {
    fn distance(&self, other: &Self) -> u32 {
        let common: u32 = self
            .bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum();
        // Bits present in only one hash count as differing
        let extra = self.bytes.len().abs_diff(other.bytes.len()) as u32 * 8;
        common + extra
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Pack bits into bytes, MSB first; a trailing partial byte is zero-padded
pub(crate) fn pack_bits(bits: impl IntoIterator<Item = bool>) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut current_byte: u8 = 0;
    let mut bit_position = 0;

    for bit in bits {
        if bit {
            current_byte |= 1 << (7 - bit_position);
        }
        bit_position += 1;
        if bit_position == 8 {
            bytes.push(current_byte);
            current_byte = 0;
            bit_position = 0;
        }
    }

    if bit_position > 0 {
        bytes.push(current_byte);
    }

    bytes
}
