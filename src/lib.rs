//! # Dupli-Pic Finder
//!
//! Finds visually duplicate images in a directory tree using perceptual hashing.
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation helpers:
//! - `core` - Scanner, hasher, matcher and the finder that drives them
//! - `events` - Channel-based progress reporting for worker threads
//! - `preferences` - Persisted tolerance and page size
//! - `review` - Paged browsing and deletion of found pairs
//! - `error` - Error types
//!
//! ## Example
//! ```rust,ignore
//! use dupli_pic_finder::core::DuplicateFinder;
//!
//! let mut finder = DuplicateFinder::builder().build()?;
//! finder.run(
//!     Path::new("/photos"),
//!     5,
//!     |processed, total| println!("{processed}/{total}"),
//!     |pairs| println!("{} pairs", pairs.len()),
//! )?;
//! ```

pub mod core;
pub mod error;
pub mod events;
pub mod preferences;
pub mod review;

// Re-export commonly used types at the crate root
pub use error::{FinderError, Result};

/// Initialize tracing for the library.
///
/// Logs go to stderr. `RUST_LOG` overrides `default_directive`. Calling this
/// more than once is harmless; later calls keep the first subscriber.
pub fn init_tracing(default_directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
