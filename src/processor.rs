//! Core processing engine
//!
//! Runs the file operations for each command, either on one file or on every
//! file directly inside a directory.

use crate::cli::{Args, ChunkArgs, ConcatArgs, DiffArgs, RandomArgs, SplitArgs, Target, TargetArgs};
use crate::error::{ListyError, Result};
use crate::lines::{self, LineSequence};
use crate::ops;
use crate::output::{
    append_suffix_to_filename, concat_output_name, CHUNK_SUFFIX, DEDUPED_SUFFIX, DIFF_SUFFIX,
    RANDOM_SUFFIX, SPLIT_SUFFIX,
};
use crate::progress::{
    create_progress_bar, print_bullet, print_error, print_header, print_info, print_success,
    print_warning, ProcessingStats,
};
use crate::transform;

use clap::ValueEnum;
use colored::*;
use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// How a directory batch reacts to a file that fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BatchPolicy {
    /// Stop at the first failing file
    #[default]
    Abort,
    /// Log the failure and move on
    Continue,
    /// Move on, then report every failure and exit non-zero
    Collect,
}

/// Processor configuration
#[derive(Debug, Clone, Default)]
pub struct ProcessorConfig {
    pub quiet: bool,
    pub verbose: bool,
}

impl ProcessorConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            quiet: args.quiet,
            verbose: args.verbose,
        }
    }
}

/// Outcome of a directory batch
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files the operation succeeded on
    pub processed: Vec<PathBuf>,
    /// Files that failed, when the policy let the batch go on
    pub failed: Vec<(PathBuf, ListyError)>,
}

/// Main processor
pub struct Processor {
    config: ProcessorConfig,
    stats: ProcessingStats,
}

impl Processor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            stats: ProcessingStats::new(),
        }
    }

    /// Direct children of `dir` that are regular files, in listing order
    pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| ListyError::io(dir, e.into()))?;
            let path = entry.path();
            if path.is_file() {
                files.push(path.to_path_buf());
            } else {
                log::debug!("Skipping {:?}: not a regular file", path);
            }
        }

        Ok(files)
    }

    /// Apply `op` to every file directly inside `dir`.
    ///
    /// The file list is taken before the first file is touched, so outputs
    /// written into `dir` during the batch are not picked up. `op` returns a
    /// one-line description of what it did.
    pub fn run_batch<F>(&mut self, dir: &Path, policy: BatchPolicy, mut op: F) -> Result<BatchReport>
    where
        F: FnMut(&Path) -> Result<String>,
    {
        let files = Self::list_files(dir)?;
        let mut report = BatchReport::default();

        if files.is_empty() {
            if !self.config.quiet {
                print_warning(&format!("No files found in {:?}", dir));
            }
            return Ok(report);
        }

        let sizes: Vec<u64> = files
            .iter()
            .map(|path| fs::metadata(path).map(|m| m.len()).unwrap_or(0))
            .collect();
        for size in &sizes {
            self.stats.add_file(*size);
        }

        let pb = if self.config.quiet {
            ProgressBar::hidden()
        } else {
            create_progress_bar(files.len() as u64, "Processing...")
        };

        for (path, size) in files.into_iter().zip(sizes) {
            if self.config.verbose {
                pb.set_message(format!("{:?}", path.file_name().unwrap_or_default()));
            }

            match op(&path) {
                Ok(message) => {
                    log::debug!("{:?}: {}", path, message);
                    if !self.config.quiet {
                        pb.suspend(|| print_success(&message));
                    }
                    self.stats.complete_file(size);
                    report.processed.push(path);
                }
                Err(e) => {
                    self.stats.fail_file();
                    match policy {
                        BatchPolicy::Abort => {
                            pb.abandon();
                            log::debug!(
                                "Batch aborted with {} files left",
                                self.stats.pending_files()
                            );
                            return Err(e);
                        }
                        BatchPolicy::Continue => {
                            log::warn!("{:?} failed: {}", path, e);
                            pb.suspend(|| print_error(&format!("{:?}: {}", path, e)));
                        }
                        BatchPolicy::Collect => {
                            log::warn!("{:?} failed: {}", path, e);
                            report.failed.push((path, e));
                        }
                    }
                }
            }

            pb.inc(1);
        }

        pb.finish_with_message("Complete".green().to_string());

        if !self.config.quiet {
            self.stats.print_summary();
        }

        Ok(report)
    }

    fn header(&self, text: &str) {
        if !self.config.quiet {
            print_header(text);
        }
    }

    fn info(&self, text: &str) {
        if !self.config.quiet {
            print_info(text);
        }
    }

    fn success(&self, text: &str) {
        if !self.config.quiet {
            print_success(text);
        }
    }

    /// `dedupe`
    pub fn dedupe(&mut self, args: &TargetArgs) -> anyhow::Result<()> {
        match args.target()? {
            Target::File(file) => {
                let out = output_for(&file, args.out.as_deref(), DEDUPED_SUFFIX);
                self.header(&format!("Deduping {:?} to {:?}", file, out));
                let n = ops::dedupe_file(&file, &out)?;
                self.success(&format!("Removed {} duplicates", n));
            }
            Target::Dir(dir) => {
                self.header(&format!("Deduping directory {:?}", dir));
                let report = self.run_batch(&dir, args.on_error, |file| {
                    let out = append_suffix_to_filename(file, DEDUPED_SUFFIX);
                    let n = ops::dedupe_file(file, &out)?;
                    Ok(format!("Removed {} duplicates from {:?}", n, file))
                })?;
                check_report(report)?;
            }
        }
        Ok(())
    }

    /// `diff`
    pub fn diff(&mut self, args: &DiffArgs) -> anyhow::Result<()> {
        let base = args.base()?;

        match args.target.target()? {
            Target::File(file) => {
                let out = output_for(&file, args.target.out.as_deref(), DIFF_SUFFIX);
                self.header(&format!("Diffing {:?} against {:?}", file, base));
                let n = ops::diff_files(&base, &file, &out)?;
                self.success(&format!("Found {} different lines, written to {:?}", n, out));
            }
            Target::Dir(dir) => {
                self.header(&format!("Getting differences from directory {:?}", dir));
                let base_set = lines::load_to_set(&base)?;
                let out = output_for(&base, args.target.out.as_deref(), DIFF_SUFFIX);

                let mut result = LineSequence::new();
                let report = self.run_batch(&dir, args.target.on_error, |file| {
                    if is_same_file(file, &base) {
                        return Ok(format!("Skipped base file {:?}", file));
                    }
                    let (n, diff) = transform::diff(&base_set, lines::load(file)?);
                    result.extend(diff);
                    Ok(format!("Found {} differences in {:?}", n, file))
                })?;

                lines::save(&out, &result)?;
                self.success(&format!("{} different lines written to {:?}", result.len(), out));
                check_report(report)?;
            }
        }
        Ok(())
    }

    /// `chunk`
    pub fn chunk(&mut self, args: &ChunkArgs) -> anyhow::Result<()> {
        let file = args.file()?;
        let chunk_size = args.chunk_size();
        let out = output_for(&file, args.out.as_deref(), CHUNK_SUFFIX);

        self.header(&format!("Chunking {:?} to {:?} by {} lines", file, out, chunk_size));
        if chunk_size == 0 && !self.config.quiet {
            print_warning("Chunk size is not positive, nothing will be written");
        }

        let n = ops::chunk_file(&file, &out, chunk_size)?;
        let total = lines::count_file_lines(&file)?;
        self.success(&format!("Chunked {} lines into {} files", total, n));
        Ok(())
    }

    /// `random`
    pub fn random(&mut self, args: &RandomArgs) -> anyhow::Result<()> {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        match args.target.target()? {
            Target::File(file) => {
                let out = output_for(&file, args.target.out.as_deref(), RANDOM_SUFFIX);
                self.header(&format!("Randomizing {:?} to {:?}", file, out));
                let n = ops::shuffle_file(&file, &out, &mut rng)?;
                self.success(&format!("Randomized {} lines", n));
            }
            Target::Dir(dir) => {
                self.header(&format!("Randomizing directory {:?}", dir));
                let report = self.run_batch(&dir, args.target.on_error, |file| {
                    let out = append_suffix_to_filename(file, RANDOM_SUFFIX);
                    let n = ops::shuffle_file(file, &out, &mut rng)?;
                    Ok(format!("Randomized {} lines of {:?}", n, file))
                })?;
                check_report(report)?;
            }
        }
        Ok(())
    }

    /// `split`
    pub fn split(&mut self, args: &SplitArgs) -> anyhow::Result<()> {
        let delim = args.delim()?;
        let ids = args.ids()?;
        let policy = args.policy();

        match args.target.target()? {
            Target::File(file) => {
                let out = output_for(&file, args.target.out.as_deref(), SPLIT_SUFFIX);
                self.header(&format!("Splitting {:?} to {:?} by {:?} with ids {:?}", file, out, delim, ids));
                let n = ops::split_file(&file, &out, &delim, &ids, policy)?;
                self.success(&format!("Wrote {} lines to {:?}", n, out));
            }
            Target::Dir(dir) => {
                self.header(&format!("Splitting directory {:?} by {:?} for ids {:?}", dir, delim, ids));
                let report = self.run_batch(&dir, args.target.on_error, |file| {
                    let out = append_suffix_to_filename(file, SPLIT_SUFFIX);
                    let n = ops::split_file(file, &out, &delim, &ids, policy)?;
                    Ok(format!("Wrote {} lines to {:?}", n, out))
                })?;
                check_report(report)?;
            }
        }
        Ok(())
    }

    /// `concat`
    pub fn concat(&mut self, args: &ConcatArgs) -> anyhow::Result<()> {
        let dir = args.dir()?;
        let out = args.out.clone().unwrap_or_else(|| concat_output_name(&dir));

        self.header(&format!("Concatenating {:?} to {:?}", dir, out));
        let files: Vec<PathBuf> = Self::list_files(&dir)?
            .into_iter()
            .filter(|file| !is_same_file(file, &out))
            .collect();

        if self.config.verbose {
            for file in &files {
                print_bullet(&format!("{:?}", file));
            }
        }

        let n = ops::concat_files(&files, &out)?;
        self.success(&format!("Done! {} lines written to {:?}", n, out));
        Ok(())
    }

    /// `count`
    pub fn count(&mut self, args: &TargetArgs) -> anyhow::Result<()> {
        match args.target()? {
            Target::File(file) => {
                let n = lines::count_file_lines(&file)?;
                println!("{}", n);
            }
            Target::Dir(dir) => {
                self.header(&format!("Counting lines in {:?}", dir));
                let mut total = 0;
                let report = self.run_batch(&dir, args.on_error, |file| {
                    let n = lines::count_file_lines(file)?;
                    total += n;
                    Ok(format!("{:?}: {} lines", file, n))
                })?;
                self.info(&format!("{} lines in total", total));
                check_report(report)?;
            }
        }
        Ok(())
    }

    /// Get processing statistics
    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }
}

/// `--out` when given, otherwise `input` with `suffix` before its extension
fn output_for(input: &Path, out: Option<&Path>, suffix: &str) -> PathBuf {
    match out {
        Some(out) if !out.as_os_str().is_empty() => out.to_path_buf(),
        _ => append_suffix_to_filename(input, suffix),
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Turn collected per-file failures into an error for the exit status
fn check_report(report: BatchReport) -> anyhow::Result<()> {
    if report.failed.is_empty() {
        return Ok(());
    }

    for (path, e) in &report.failed {
        print_error(&format!("{:?}: {}", path, e));
    }
    anyhow::bail!(
        "{} of {} files failed",
        report.failed.len(),
        report.failed.len() + report.processed.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::{load, save};
    use crate::transform::PluckPolicy;
    use tempfile::TempDir;

    fn quiet() -> Processor {
        Processor::new(ProcessorConfig {
            quiet: true,
            verbose: false,
        })
    }

    fn target_dir(dir: &Path, on_error: BatchPolicy) -> TargetArgs {
        TargetArgs {
            file: None,
            dir: Some(dir.to_path_buf()),
            out: None,
            on_error,
        }
    }

    #[test]
    fn test_list_files_skips_directories() {
        let temp = TempDir::new().unwrap();
        save(&temp.path().join("a.txt"), &["a"]).unwrap();
        save(&temp.path().join("b"), &["b"]).unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        save(&temp.path().join("sub/c.txt"), &["c"]).unwrap();

        let mut files = Processor::list_files(temp.path()).unwrap();
        files.sort();
        assert_eq!(files, vec![temp.path().join("a.txt"), temp.path().join("b")]);
    }

    #[test]
    fn test_list_files_missing_dir() {
        let temp = TempDir::new().unwrap();
        let err = Processor::list_files(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, ListyError::Io { .. }));
    }

    #[test]
    fn test_dedupe_dir_writes_one_output_per_file() {
        let temp = TempDir::new().unwrap();
        save(&temp.path().join("a.txt"), &["x", "x", "y"]).unwrap();
        save(&temp.path().join("b"), &["z", "z"]).unwrap();

        quiet().dedupe(&target_dir(temp.path(), BatchPolicy::Abort)).unwrap();

        assert_eq!(load(&temp.path().join("a-deduped.txt")).unwrap(), vec!["x", "y"]);
        assert_eq!(load(&temp.path().join("b-deduped")).unwrap(), vec!["z"]);
        assert!(!temp.path().join("a-deduped-deduped.txt").exists());
    }

    #[test]
    fn test_batch_policies() {
        let temp = TempDir::new().unwrap();
        for name in ["one.txt", "two.txt", "three.txt"] {
            save(&temp.path().join(name), &["line"]).unwrap();
        }

        let failing = |file: &Path| -> Result<String> {
            if file.ends_with("two.txt") {
                Err(ListyError::Validation("boom".to_string()))
            } else {
                Ok(String::from("ok"))
            }
        };

        let err = quiet().run_batch(temp.path(), BatchPolicy::Abort, failing).unwrap_err();
        assert!(matches!(err, ListyError::Validation(_)));

        let report = quiet().run_batch(temp.path(), BatchPolicy::Continue, failing).unwrap();
        assert_eq!(report.processed.len(), 2);
        assert!(report.failed.is_empty());

        let mut processor = quiet();
        let report = processor.run_batch(temp.path(), BatchPolicy::Collect, failing).unwrap();
        assert_eq!(report.processed.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].0.ends_with("two.txt"));
        assert_eq!(processor.stats().failed_files, 1);
        assert!(check_report(report).is_err());
    }

    #[test]
    fn test_abort_keeps_earlier_outputs_and_skips_the_rest() {
        let temp = TempDir::new().unwrap();
        for name in ["a.txt", "b.txt", "c.txt", "d.txt"] {
            save(&temp.path().join(name), &["key:value"]).unwrap();
        }
        save(&temp.path().join("bad.txt"), &["key:value", "lonely"]).unwrap();
        let listed = Processor::list_files(temp.path()).unwrap();

        let mut visited = Vec::new();
        let mut processor = quiet();
        let err = processor
            .run_batch(temp.path(), BatchPolicy::Abort, |file| {
                visited.push(file.to_path_buf());
                let out = append_suffix_to_filename(file, SPLIT_SUFFIX);
                let n = ops::split_file(file, &out, ":", &[1], PluckPolicy::Abort)?;
                Ok(format!("Wrote {} lines", n))
            })
            .unwrap_err();
        assert!(matches!(
            err,
            ListyError::IndexOutOfRange { line: 2, index: 1, fields: 1 }
        ));

        let (failed, before) = visited.split_last().unwrap();
        assert!(failed.ends_with("bad.txt"));
        assert!(!append_suffix_to_filename(failed, SPLIT_SUFFIX).exists());
        for file in before {
            assert_eq!(load(&append_suffix_to_filename(file, SPLIT_SUFFIX)).unwrap(), vec!["value"]);
        }
        for file in listed.iter().filter(|file| !visited.contains(file)) {
            assert!(!append_suffix_to_filename(file, SPLIT_SUFFIX).exists());
        }

        let stats = processor.stats();
        assert_eq!(stats.total_files, 5);
        assert_eq!(stats.processed_files, before.len() as u64);
        assert_eq!(stats.failed_files, 1);
        assert_eq!(stats.pending_files(), 4 - before.len() as u64);
    }

    #[test]
    fn test_diff_dir_defaults_to_base_diff_name() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("seen.txt");
        save(&base, &["one", "two"]).unwrap();
        save(&temp.path().join("new.txt"), &["two", "three", "four"]).unwrap();

        let args = DiffArgs {
            base: Some(base.clone()),
            target: target_dir(temp.path(), BatchPolicy::Abort),
        };
        quiet().diff(&args).unwrap();

        assert_eq!(load(&temp.path().join("seen-diff.txt")).unwrap(), vec!["three", "four"]);
        assert_eq!(load(&base).unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn test_diff_dir_concatenates_and_skips_base() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("base.txt");
        save(&base, &["one", "two"]).unwrap();
        save(&temp.path().join("c1.txt"), &["one", "three"]).unwrap();
        save(&temp.path().join("c2.txt"), &["four", "two"]).unwrap();
        let out = temp.path().join("fresh.txt");

        let args = DiffArgs {
            base: Some(base.clone()),
            target: TargetArgs {
                out: Some(out.clone()),
                ..target_dir(temp.path(), BatchPolicy::Abort)
            },
        };
        quiet().diff(&args).unwrap();

        let mut fresh = load(&out).unwrap();
        fresh.sort();
        assert_eq!(fresh, vec!["four", "three"]);
    }

    #[test]
    fn test_concat_skips_its_own_output() {
        let temp = TempDir::new().unwrap();
        save(&temp.path().join("a.txt"), &["1"]).unwrap();
        save(&temp.path().join("all.txt"), &["stale"]).unwrap();

        let args = ConcatArgs {
            dir: Some(temp.path().to_path_buf()),
            out: None,
        };
        quiet().concat(&args).unwrap();

        assert_eq!(load(&temp.path().join("all.txt")).unwrap(), vec!["1"]);
    }

    #[test]
    fn test_output_for() {
        assert_eq!(
            output_for(Path::new("w.txt"), None, RANDOM_SUFFIX),
            PathBuf::from("w-rnd.txt")
        );
        assert_eq!(
            output_for(Path::new("w.txt"), Some(Path::new("o.txt")), RANDOM_SUFFIX),
            PathBuf::from("o.txt")
        );
    }
}
