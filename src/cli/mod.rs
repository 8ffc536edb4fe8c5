//! # CLI Module
//!
//! Command-line interface for the duplicate image finder.
//!
//! ## Usage
//! ```bash
//! # Scan a directory tree for duplicates
//! duplipic scan ~/Pictures
//!
//! # Stricter matching, top-level files only
//! duplipic scan ~/Pictures --tolerance 3 --flat
//!
//! # JSON output, clustered into groups
//! duplipic scan ~/Pictures --output json --groups
//!
//! # Page through pairs and delete copies
//! duplipic review ~/Pictures
//!
//! # Persist a default tolerance
//! duplipic prefs set --tolerance 6
//! ```

mod interactive;
mod output;

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::{style, Term};
use dupli_pic_finder::core::finder::{DuplicateFinder, RunReport};
use dupli_pic_finder::core::hasher::{HashAlgorithmKind, HasherConfig};
use dupli_pic_finder::core::matcher::{DuplicatePair, MatcherKind, Tolerance};
use dupli_pic_finder::core::scanner::ScanConfig;
use dupli_pic_finder::error::{FinderError, Result};
use dupli_pic_finder::events::{Event, EventChannel};
use dupli_pic_finder::preferences::Preferences;
use dupli_pic_finder::review::ReviewSession;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

/// Dupli-Pic Finder - find visually duplicate images
#[derive(Parser, Debug)]
#[command(name = "duplipic")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Preferences file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    prefs: Option<PathBuf>,

    /// Verbose output and debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a directory for duplicate images
    Scan {
        /// Directory to scan
        root: PathBuf,

        /// Maximum distance (exclusive) for a match; defaults to the saved preference
        #[arg(short, long, allow_negative_numbers = true)]
        tolerance: Option<i64>,

        #[command(flatten)]
        hashing: HashingArgs,

        /// Matching strategy
        #[arg(short, long, default_value = "exhaustive")]
        matcher: MatcherChoice,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Cluster pairs into transitive groups
        #[arg(short, long)]
        groups: bool,
    },

    /// Scan, then page through pairs and delete copies
    Review {
        /// Directory to scan
        root: PathBuf,

        /// Maximum distance (exclusive) for a match; defaults to the saved preference
        #[arg(short, long, allow_negative_numbers = true)]
        tolerance: Option<i64>,

        /// Pairs per page; defaults to the saved preference
        #[arg(long)]
        page_size: Option<usize>,

        #[command(flatten)]
        hashing: HashingArgs,
    },

    /// Show or change saved preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

/// Scanner and hasher options shared by `scan` and `review`
#[derive(Args, Debug)]
struct HashingArgs {
    /// Hash algorithm to use
    #[arg(short, long, default_value = "perceptual")]
    algorithm: Algorithm,

    /// Hash grid edge (2-32); the hash has this many bits squared
    #[arg(long, default_value_t = 8)]
    hash_size: u32,

    /// Only scan the root's own files
    #[arg(long)]
    flat: bool,

    /// Follow symbolic links while scanning
    #[arg(long)]
    follow_symlinks: bool,
}

impl HashingArgs {
    fn hasher(&self) -> HasherConfig {
        HasherConfig::new()
            .algorithm(self.algorithm.into())
            .hash_size(self.hash_size)
    }

    fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            recursive: !self.flat,
            follow_symlinks: self.follow_symlinks,
        }
    }
}

#[derive(Subcommand, Debug)]
enum PrefsAction {
    /// Print current preferences
    Show,
    /// Update and save preferences
    Set {
        /// Default match tolerance
        #[arg(short, long, allow_negative_numbers = true)]
        tolerance: Option<i64>,

        /// Pairs per review page
        #[arg(long)]
        items_per_page: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// Perceptual Hash - DCT based, robust to edits (default)
    Perceptual,
    /// Difference Hash - brightness gradients
    Difference,
    /// Average Hash - fastest, good for exact copies
    Average,
}

impl From<Algorithm> for HashAlgorithmKind {
    fn from(algo: Algorithm) -> Self {
        match algo {
            Algorithm::Perceptual => HashAlgorithmKind::Perceptual,
            Algorithm::Difference => HashAlgorithmKind::Difference,
            Algorithm::Average => HashAlgorithmKind::Average,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MatcherChoice {
    /// Compare every pair
    Exhaustive,
    /// Index hash blocks; faster on large folders
    Bucketed,
}

impl From<MatcherChoice> for MatcherKind {
    fn from(choice: MatcherChoice) -> Self {
        match choice {
            MatcherChoice::Exhaustive => MatcherKind::Exhaustive,
            MatcherChoice::Bucketed => MatcherKind::Bucketed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (paths only)
    Minimal,
}

/// Everything needed to run one search
struct SearchRequest {
    root: PathBuf,
    tolerance: i64,
    hasher: HasherConfig,
    scan_config: ScanConfig,
    matcher: MatcherKind,
    show_progress: bool,
    verbose: bool,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    dupli_pic_finder::init_tracing(if cli.verbose { "debug" } else { "warn" });

    let prefs_path = cli.prefs.clone();
    let verbose = cli.verbose;

    match cli.command {
        Commands::Scan {
            root,
            tolerance,
            hashing,
            matcher,
            output,
            groups,
        } => {
            let prefs = load_preferences(prefs_path.as_deref());
            let request = SearchRequest {
                root,
                tolerance: tolerance.unwrap_or(prefs.tolerance),
                hasher: hashing.hasher(),
                scan_config: hashing.scan_config(),
                matcher: matcher.into(),
                show_progress: output == OutputFormat::Pretty,
                verbose,
            };
            run_scan(request, output, groups)
        }
        Commands::Review {
            root,
            tolerance,
            page_size,
            hashing,
        } => {
            let prefs = load_preferences(prefs_path.as_deref());
            let request = SearchRequest {
                root,
                tolerance: tolerance.unwrap_or(prefs.tolerance),
                hasher: hashing.hasher(),
                scan_config: hashing.scan_config(),
                matcher: MatcherKind::default(),
                show_progress: true,
                verbose,
            };
            let (pairs, report) = search_with_progress(&request)?;
            let session = match page_size {
                Some(size) => ReviewSession::new(pairs, size),
                None => ReviewSession::with_preferences(pairs, &prefs),
            };
            interactive::review(session, &report)
        }
        Commands::Prefs { action } => run_prefs(prefs_path, action),
    }
}

fn run_scan(request: SearchRequest, output: OutputFormat, groups: bool) -> Result<()> {
    let term = Term::stderr();

    if output == OutputFormat::Pretty {
        term.write_line(&format!(
            "{} {}",
            style("Dupli-Pic Finder").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let (pairs, report) = search_with_progress(&request)?;

    let summary = output::Summary {
        root: &request.root,
        tolerance: request.tolerance,
        algorithm: request.hasher.kind(),
        report: &report,
        pairs: &pairs,
    };

    match output {
        OutputFormat::Pretty => output::print_pretty(&term, &summary, groups, request.verbose),
        OutputFormat::Json => output::print_json(&summary, groups),
        OutputFormat::Minimal => output::print_minimal(&pairs, groups),
    }

    Ok(())
}

/// Run the finder while a progress bar consumes its events
fn search_with_progress(request: &SearchRequest) -> Result<(Vec<DuplicatePair>, RunReport)> {
    let mut finder = DuplicateFinder::builder()
        .scan_config(request.scan_config.clone())
        .hasher(request.hasher.clone())
        .matcher(request.matcher)
        .build()?;

    let (sender, receiver) = EventChannel::new();

    let progress = if request.show_progress {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} images {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let verbose = request.verbose;

    // Handle events in a separate thread; it hands back the completed pairs
    let event_thread = thread::spawn(move || {
        let mut found = Vec::new();
        for event in receiver.iter() {
            match event {
                Event::Progress(p) => {
                    if let Some(ref pb) = progress {
                        pb.set_length(p.total as u64);
                        pb.set_position(p.processed as u64);
                        if p.is_last() {
                            pb.set_message("matching");
                        } else {
                            pb.set_message(format!("{:.0}%", p.percent()));
                        }
                    }
                }
                Event::HashFailed { path, reason } => {
                    if let (Some(pb), true) = (&progress, verbose) {
                        pb.println(format!(
                            "  {} {}: {}",
                            style("!").yellow(),
                            path.display(),
                            style(reason).dim()
                        ));
                    }
                }
                Event::Completed { pairs } => {
                    if let Some(ref pb) = progress {
                        pb.finish_and_clear();
                    }
                    found = pairs;
                }
            }
        }
        if let Some(ref pb) = progress {
            pb.finish_and_clear();
        }
        found
    });

    let result = finder.run_with_events(&request.root, request.tolerance, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    let pairs = join_event_thread(event_thread);

    let report = result?;
    Ok((pairs?, report))
}

/// Wait for the event thread; if it panicked the completed pairs are lost
fn join_event_thread(handle: JoinHandle<Vec<DuplicatePair>>) -> Result<Vec<DuplicatePair>> {
    handle.join().map_err(|_| FinderError::EventThread)
}

fn run_prefs(path: Option<PathBuf>, action: PrefsAction) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => Preferences::default_path()?,
    };
    let mut prefs = Preferences::load(&path);

    match action {
        PrefsAction::Show => {}
        PrefsAction::Set {
            tolerance,
            items_per_page,
        } => {
            if let Some(tolerance) = tolerance {
                Tolerance::new(tolerance)?;
                prefs.tolerance = tolerance;
            }
            if let Some(items) = items_per_page {
                prefs.items_per_page = items;
            }
            prefs.save(&path)?;
        }
    }

    println!("{}", style(path.display()).dim());
    println!("tolerance      = {}", prefs.tolerance);
    println!("items_per_page = {}", prefs.items_per_page);
    Ok(())
}

fn load_preferences(path: Option<&Path>) -> Preferences {
    match path {
        Some(path) => Preferences::load(path),
        None => Preferences::default_path()
            .map(|path| Preferences::load(&path))
            .unwrap_or_default(),
    }
}

/// Shorten paths under the home directory to `~/...`
fn display_path(path: &Path) -> String {
    dirs::home_dir()
        .and_then(|home| {
            path.strip_prefix(&home)
                .ok()
                .map(|rest| format!("~/{}", rest.display()))
        })
        .unwrap_or_else(|| path.display().to_string())
}
