//! # duplipic CLI
//!
//! Command-line interface for the duplicate image finder.
//!
//! ## Usage
//! ```bash
//! duplipic scan ~/Pictures --tolerance 8
//! duplipic scan ~/Pictures --output json --groups
//! duplipic review ~/Pictures --page-size 10
//! duplipic prefs set --tolerance 6
//! ```

mod cli;

use dupli_pic_finder::Result;

fn main() -> Result<()> {
    cli::run()
}
