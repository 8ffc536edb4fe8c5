//! # Events Module
//!
//! Channel-based form of the finder's progress/completion protocol.
//!
//! ## Design
//! `DuplicateFinder::run_with_events` forwards every progress callback and the
//! single completion callback into an [`EventSender`], so a UI can run the engine
//! on a worker thread and consume events on its own thread.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! let worker = std::thread::spawn(move || finder.run_with_events(&root, 5, &sender));
//!
//! for event in receiver.iter() {
//!     match event {
//!         Event::Progress(p) => println!("Hashed {}/{}", p.processed, p.total),
//!         Event::Completed { pairs } => println!("{} pairs", pairs.len()),
//!         _ => {}
//!     }
//! }
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
