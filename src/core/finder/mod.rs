//! # Finder Module
//!
//! Drives one duplicate search from start to finish.
//!
//! ## Run Protocol
//! 1. **Validate** - a negative tolerance fails before anything else
//! 2. **Scan** - a missing or non-directory root fails before any callback
//! 3. **Hash** - one attempt per candidate in scan order, each followed by
//!    exactly one progress callback `(processed, total)`; failures are recorded
//!    and still count as processed
//! 4. **Match** - the successfully hashed subset goes to the matcher
//! 5. **Complete** - the completion callback fires exactly once with the pairs
//!
//! An empty candidate list skips straight to step 5 with no progress calls.
//!
//! ## Threading
//! Everything runs on the caller's thread. UIs that need to stay responsive
//! move the finder to a worker and use [`DuplicateFinder::run_with_events`].

mod executor;

pub use executor::{CancellationToken, DuplicateFinder, DuplicateFinderBuilder, RunReport};
