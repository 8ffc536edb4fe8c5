//! Finder execution implementation.

use crate::core::hasher::{HashAlgorithm, HasherConfig, PerceptualHash};
use crate::core::matcher::{DuplicatePair, HashRecord, Matcher, MatcherKind, Tolerance};
use crate::core::scanner::{ImageScanner, ScanConfig, WalkDirScanner};
use crate::error::{FinderError, HashFailure};
use crate::events::{Event, EventSender, ProgressEvent};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Cooperative cancellation flag shared between a UI and a running finder.
///
/// The finder checks it before each hash attempt. Once set, hashing stops,
/// already-hashed images are still matched, and the completion callback
/// still fires exactly once.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Outcome of one run, alongside the pairs passed to the completion callback
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Candidates returned by the scanner
    pub total_candidates: usize,
    /// Candidates hashed successfully
    pub hashed: usize,
    /// Per-file failures, in scan order
    pub failures: Vec<HashFailure>,
    /// Number of pairs delivered to the completion callback
    pub pairs_found: usize,
    /// Whether the run stopped early on cancellation
    pub cancelled: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunReport {
    /// Candidates that went through a hash attempt
    pub fn processed(&self) -> usize {
        self.hashed + self.failures.len()
    }
}

/// Builder for [`DuplicateFinder`]
pub struct DuplicateFinderBuilder {
    scan_config: ScanConfig,
    hasher: HasherConfig,
    matcher: MatcherKind,
    scanner: Option<Box<dyn ImageScanner>>,
    cancellation: Option<CancellationToken>,
}

impl DuplicateFinderBuilder {
    pub fn new() -> Self {
        Self {
            scan_config: ScanConfig::default(),
            hasher: HasherConfig::default(),
            matcher: MatcherKind::default(),
            scanner: None,
            cancellation: None,
        }
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.scan_config = config;
        self
    }

    /// Replace the default walkdir scanner; `scan_config` is then ignored
    pub fn scanner(mut self, scanner: Box<dyn ImageScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    pub fn hasher(mut self, config: HasherConfig) -> Self {
        self.hasher = config;
        self
    }

    pub fn matcher(mut self, kind: MatcherKind) -> Self {
        self.matcher = kind;
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Build the finder; fails only on an invalid hasher configuration
    pub fn build(self) -> Result<DuplicateFinder, FinderError> {
        let hasher = self.hasher.build()?;
        let scan_config = self.scan_config;
        let scanner = self
            .scanner
            .unwrap_or_else(|| Box::new(WalkDirScanner::new(scan_config)));

        Ok(DuplicateFinder {
            scanner,
            hasher,
            matcher: self.matcher.build(),
            cancellation: self.cancellation,
        })
    }
}

impl Default for DuplicateFinderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Scanner, hasher and matcher wired together
pub struct DuplicateFinder {
    scanner: Box<dyn ImageScanner>,
    hasher: Box<dyn HashAlgorithm>,
    matcher: Box<dyn Matcher>,
    cancellation: Option<CancellationToken>,
}

impl DuplicateFinder {
    pub fn builder() -> DuplicateFinderBuilder {
        DuplicateFinderBuilder::new()
    }

    /// Search `root` for duplicates.
    ///
    /// `on_progress(processed, total)` fires once per candidate in scan order;
    /// `on_complete(pairs)` fires exactly once when the run finishes. Fatal
    /// errors are returned before either callback runs.
    ///
    /// Takes `&mut self`, so one finder cannot have two runs in flight.
    pub fn run<P, C>(
        &mut self,
        root: &Path,
        tolerance: i64,
        on_progress: P,
        on_complete: C,
    ) -> Result<RunReport, FinderError>
    where
        P: FnMut(usize, usize),
        C: FnOnce(Vec<DuplicatePair>),
    {
        self.execute(root, tolerance, on_progress, |_| {}, on_complete)
    }

    /// Run and forward the protocol into an event channel.
    ///
    /// Emits `HashFailed` just before the failing candidate's `Progress`,
    /// and a single terminal `Completed`. Fatal errors emit nothing.
    pub fn run_with_events(
        &mut self,
        root: &Path,
        tolerance: i64,
        events: &EventSender,
    ) -> Result<RunReport, FinderError> {
        self.execute(
            root,
            tolerance,
            |processed, total| events.send(Event::Progress(ProgressEvent { processed, total })),
            |failure| {
                events.send(Event::HashFailed {
                    path: failure.path.clone(),
                    reason: failure.reason.clone(),
                })
            },
            |pairs| events.send(Event::Completed { pairs }),
        )
    }

    /// Run and return the pairs directly
    pub fn find(
        &mut self,
        root: &Path,
        tolerance: i64,
    ) -> Result<(Vec<DuplicatePair>, RunReport), FinderError> {
        let mut found = Vec::new();
        let report = self.run(root, tolerance, |_, _| {}, |pairs| found = pairs)?;
        Ok((found, report))
    }

    fn execute<P, F, C>(
        &mut self,
        root: &Path,
        tolerance: i64,
        mut on_progress: P,
        mut on_failure: F,
        on_complete: C,
    ) -> Result<RunReport, FinderError>
    where
        P: FnMut(usize, usize),
        F: FnMut(&HashFailure),
        C: FnOnce(Vec<DuplicatePair>),
    {
        let start_time = Instant::now();
        let tolerance = Tolerance::new(tolerance)?;
        let candidates = self.scanner.list_candidate_images(root)?;
        let total = candidates.len();

        info!(
            root = %root.display(),
            %tolerance,
            candidates = total,
            algorithm = %self.hasher.kind(),
            matcher = self.matcher.name(),
            "Starting duplicate search"
        );

        let mut report = RunReport {
            total_candidates: total,
            ..Default::default()
        };

        if candidates.is_empty() {
            report.duration_ms = start_time.elapsed().as_millis() as u64;
            on_complete(Vec::new());
            info!("No candidate images found");
            return Ok(report);
        }

        // One record per attempted candidate, hashed or failed
        let mut records = Vec::with_capacity(total);

        for (idx, path) in candidates.into_iter().enumerate() {
            if self.is_cancelled() {
                info!(processed = idx, total, "Search cancelled");
                report.cancelled = true;
                break;
            }

            let outcome = self.hasher.compute_fingerprint(&path);
            match &outcome {
                Ok(fingerprint) => {
                    debug!(path = %path.display(), hash = %fingerprint.to_hex(), "Hashed");
                }
                Err(failure) => {
                    warn!(path = %failure.path.display(), reason = %failure.reason, "Could not hash image");
                    on_failure(failure);
                }
            }
            records.push(HashRecord::from_outcome(path, outcome));

            on_progress(idx + 1, total);
        }

        report.hashed = records.iter().filter(|r| r.is_hashed()).count();
        report.failures = records
            .iter()
            .filter_map(HashRecord::failure)
            .cloned()
            .collect();

        // The matcher skips failed records itself
        let pairs = self.matcher.find_pairs(&records, tolerance);
        report.pairs_found = pairs.len();
        report.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            hashed = report.hashed,
            failed = report.failures.len(),
            pairs = report.pairs_found,
            duration_ms = report.duration_ms,
            "Duplicate search finished"
        );

        on_complete(pairs);
        Ok(report)
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map(CancellationToken::is_cancelled)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::HashAlgorithmKind;
    use crate::error::ScanError;
    use crate::events::EventChannel;
    use image::{ImageBuffer, Rgb};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_gradient(dir: &Path, name: &str, rising: bool) -> PathBuf {
        let path = dir.join(name);
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(64, 64, |x, _| {
            let v = (x * 255 / 63) as u8;
            let v = if rising { v } else { 255 - v };
            Rgb([v, v, v])
        });
        img.save(&path).unwrap();
        path
    }

    fn dhash_finder() -> DuplicateFinder {
        DuplicateFinder::builder()
            .hasher(HasherConfig::new().algorithm(HashAlgorithmKind::Difference))
            .build()
            .unwrap()
    }

    /// Scanner returning a fixed list, used to exercise cancellation
    struct FixedScanner(Vec<PathBuf>);

    impl ImageScanner for FixedScanner {
        fn list_candidate_images(&self, _root: &Path) -> Result<Vec<PathBuf>, ScanError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn failures_are_reported_in_scan_order_beside_hashed_records() {
        let temp_dir = TempDir::new().unwrap();
        let a = write_gradient(temp_dir.path(), "a.png", true);
        fs::write(temp_dir.path().join("b.jpg"), b"broken").unwrap();
        fs::copy(&a, temp_dir.path().join("c.png")).unwrap();
        fs::write(temp_dir.path().join("d.png"), b"also broken").unwrap();

        let (pairs, report) = dhash_finder().find(temp_dir.path(), 5).unwrap();

        assert_eq!(report.total_candidates, 4);
        assert_eq!(report.hashed, 2);
        let failed: Vec<_> = report
            .failures
            .iter()
            .map(|f| f.path.file_name().unwrap().to_owned())
            .collect();
        assert_eq!(failed, vec!["b.jpg", "d.png"]);
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].second().ends_with("c.png"));
    }

    #[test]
    fn negative_tolerance_fails_before_scanning() {
        let mut finder = dhash_finder();
        let mut progress_calls = 0;
        let mut completed = false;

        let result = finder.run(
            Path::new("/nonexistent/root"),
            -1,
            |_, _| progress_calls += 1,
            |_| completed = true,
        );

        // Tolerance is checked first, so this is not a scan error
        assert!(matches!(result, Err(FinderError::Tolerance(_))));
        assert_eq!(progress_calls, 0);
        assert!(!completed);
    }

    #[test]
    fn missing_root_fails_without_callbacks() {
        let mut finder = dhash_finder();
        let mut completed = false;

        let result = finder.run(Path::new("/nonexistent/root"), 5, |_, _| {}, |_| completed = true);

        assert!(matches!(result, Err(FinderError::Scan(_))));
        assert!(!completed);
    }

    #[test]
    fn empty_directory_completes_without_progress() {
        let temp_dir = TempDir::new().unwrap();
        let mut finder = dhash_finder();
        let mut progress_calls = 0;
        let mut completion: Option<Vec<DuplicatePair>> = None;

        let report = finder
            .run(temp_dir.path(), 5, |_, _| progress_calls += 1, |pairs| completion = Some(pairs))
            .unwrap();

        assert_eq!(progress_calls, 0);
        assert_eq!(completion, Some(Vec::new()));
        assert_eq!(report.total_candidates, 0);
    }

    #[test]
    fn progress_is_reported_once_per_candidate_in_order() {
        let temp_dir = TempDir::new().unwrap();
        write_gradient(temp_dir.path(), "a.png", true);
        write_gradient(temp_dir.path(), "b.png", false);
        fs::write(temp_dir.path().join("c.jpg"), b"not an image").unwrap();

        let mut finder = dhash_finder();
        let mut seen = Vec::new();

        let report = finder
            .run(temp_dir.path(), 5, |processed, total| seen.push((processed, total)), |_| {})
            .unwrap();

        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
        assert_eq!(report.hashed, 2);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("c.jpg"));
        assert_eq!(report.processed(), 3);
    }

    #[test]
    fn identical_copies_are_paired() {
        let temp_dir = TempDir::new().unwrap();
        let a = write_gradient(temp_dir.path(), "a.png", true);
        fs::copy(&a, temp_dir.path().join("b.png")).unwrap();

        let (pairs, report) = dhash_finder().find(temp_dir.path(), 5).unwrap();

        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].first().ends_with("a.png"));
        assert!(pairs[0].second().ends_with("b.png"));
        assert_eq!(pairs[0].distance(), 0);
        assert_eq!(report.pairs_found, 1);
    }

    #[test]
    fn unrelated_images_are_not_paired() {
        let temp_dir = TempDir::new().unwrap();
        write_gradient(temp_dir.path(), "a.png", true);
        write_gradient(temp_dir.path(), "b.png", false);

        let (pairs, _) = dhash_finder().find(temp_dir.path(), 5).unwrap();

        assert!(pairs.is_empty());
    }

    #[test]
    fn events_follow_the_run_protocol() {
        let temp_dir = TempDir::new().unwrap();
        write_gradient(temp_dir.path(), "a.png", true);
        fs::write(temp_dir.path().join("b.jpg"), b"garbage").unwrap();

        let (sender, receiver) = EventChannel::new();
        let report = dhash_finder()
            .run_with_events(temp_dir.path(), 5, &sender)
            .unwrap();
        drop(sender);

        let events: Vec<_> = receiver.iter().collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], Event::Progress(ProgressEvent { processed: 1, total: 2 })));
        assert!(matches!(&events[1], Event::HashFailed { path, .. } if path.ends_with("b.jpg")));
        assert!(matches!(events[2], Event::Progress(ProgressEvent { processed: 2, total: 2 })));
        assert!(matches!(&events[3], Event::Completed { pairs } if pairs.is_empty()));
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn fatal_errors_emit_no_events() {
        let (sender, receiver) = EventChannel::new();
        let result = dhash_finder().run_with_events(Path::new("/nonexistent/root"), 5, &sender);
        drop(sender);

        assert!(result.is_err());
        assert_eq!(receiver.iter().count(), 0);
    }

    #[test]
    fn cancellation_stops_hashing_but_still_completes() {
        let temp_dir = TempDir::new().unwrap();
        let a = write_gradient(temp_dir.path(), "a.png", true);
        let b = temp_dir.path().join("b.png");
        fs::copy(&a, &b).unwrap();
        let c = temp_dir.path().join("c.png");
        fs::copy(&a, &c).unwrap();

        let token = CancellationToken::new();
        let mut finder = DuplicateFinder::builder()
            .hasher(HasherConfig::new().algorithm(HashAlgorithmKind::Difference))
            .scanner(Box::new(FixedScanner(vec![a, b, c])))
            .cancellation(token.clone())
            .build()
            .unwrap();

        let mut seen = Vec::new();
        let mut completion = None;
        let report = finder
            .run(
                temp_dir.path(),
                5,
                |processed, total| {
                    seen.push(processed);
                    if processed == 2 {
                        token.cancel();
                    }
                    assert_eq!(total, 3);
                },
                |pairs| completion = Some(pairs),
            )
            .unwrap();

        assert!(report.cancelled);
        assert_eq!(seen, vec![1, 2]);
        // a and b were hashed before cancellation and still match
        assert_eq!(completion.map(|p| p.len()), Some(1));
    }

    #[test]
    fn bucketed_matcher_gives_same_pairs() {
        let temp_dir = TempDir::new().unwrap();
        let a = write_gradient(temp_dir.path(), "a.png", true);
        fs::copy(&a, temp_dir.path().join("b.png")).unwrap();
        write_gradient(temp_dir.path(), "c.png", false);

        let (exhaustive, _) = dhash_finder().find(temp_dir.path(), 5).unwrap();
        let (bucketed, _) = DuplicateFinder::builder()
            .hasher(HasherConfig::new().algorithm(HashAlgorithmKind::Difference))
            .matcher(MatcherKind::Bucketed)
            .build()
            .unwrap()
            .find(temp_dir.path(), 5)
            .unwrap();

        assert_eq!(exhaustive, bucketed);
    }
}
