//! Command-line interface definition for listy
//!
//! Provides argument parsing and validation for the list tool.

use crate::error::{ListyError, Result};
use crate::output::sanitize_filename;
use crate::processor::BatchPolicy;
use crate::transform::{PluckPolicy, DEFAULT_CHUNK_SIZE};

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Line-oriented list toolkit
///
/// Dedupe, diff, chunk, shuffle, split and concatenate word lists, ID lists
/// and other one-record-per-line files.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "listy",
    version,
    about = "Dedupe, diff, chunk, shuffle, split and concat line-oriented lists",
    long_about = r#"
Quick set-like and line-level transformations over single files or whole
directories. Every input is loaded into memory, transformed, and written to
an output file next to it unless --out says otherwise.

EXAMPLES:
    # Remove duplicate lines (writes words-deduped.txt)
    listy dedupe -f words.txt

    # Lines of new.txt that are not in seen.txt
    listy diff -b seen.txt -f new.txt -o fresh.txt

    # Split a list into files of 500 lines (ids-chunk-1.txt, ...)
    listy chunk -f ids.txt -b 500

    # Shuffle every file in a directory, reproducibly
    listy random -d lists/ --seed 42

    # Keep the 3rd and 1st ':'-separated fields of every line
    listy split -s : -i 2,0 -f combo.txt

    # Join every file in a directory into lists/all.txt
    listy concat -d lists/
"#
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Quiet mode - only errors are printed
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Dedupe file(s), keeping the first occurrence of every line
    Dedupe(TargetArgs),

    /// Keep only the lines of file(s) that are not in a base file
    Diff(DiffArgs),

    /// Chunk a file by a given number of lines
    Chunk(ChunkArgs),

    /// Randomize the lines of file(s)
    Random(RandomArgs),

    /// Split file(s) by a delimiter and pluck fields by position
    Split(SplitArgs),

    /// Concatenate the files of a directory into a single file
    Concat(ConcatArgs),

    /// Count the lines of file(s)
    Count(TargetArgs),
}

/// A single file or every file directly inside a directory
#[derive(ClapArgs, Debug, Clone)]
pub struct TargetArgs {
    /// File to process
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Directory whose files are processed one by one
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Output file (single-file mode only)
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// What a directory batch does when one file fails
    #[arg(long, value_enum, default_value_t = BatchPolicy::Abort)]
    pub on_error: BatchPolicy,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DiffArgs {
    /// Base file whose lines are removed from the others
    #[arg(short, long, value_name = "FILE")]
    pub base: Option<PathBuf>,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ChunkArgs {
    /// File to chunk
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Lines per chunk; zero or less writes nothing
    #[arg(short, long, value_name = "LINES", default_value_t = DEFAULT_CHUNK_SIZE as i64, allow_negative_numbers = true)]
    pub by: i64,

    /// Destination prefix; chunk n is written to <stem>-n.<ext>
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RandomArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Seed for a reproducible shuffle
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SplitArgs {
    /// Literal delimiter to split each line by
    #[arg(short = 's', long, value_name = "DELIM")]
    pub delim: Option<String>,

    /// Zero-based field positions to keep, comma separated (e.g. 1,3)
    #[arg(short, long, value_name = "IDS")]
    pub ids: Option<String>,

    /// What to do with a line that lacks a requested field
    #[arg(long, value_enum, default_value_t = OnMissing::Abort)]
    pub on_missing: OnMissing,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Values of `split --on-missing`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnMissing {
    /// Fail on the first short line
    #[default]
    Abort,
    /// Drop short lines
    Skip,
    /// Write an empty field for each missing one
    Empty,
}

impl From<OnMissing> for PluckPolicy {
    fn from(value: OnMissing) -> Self {
        match value {
            OnMissing::Abort => PluckPolicy::Abort,
            OnMissing::Skip => PluckPolicy::Skip,
            OnMissing::Empty => PluckPolicy::Empty,
        }
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ConcatArgs {
    /// Directory to concat into a single file
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Output file (default: <dir>/all.txt)
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

/// What a command operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    File(PathBuf),
    Dir(PathBuf),
}

impl TargetArgs {
    /// Resolve `--dir` / `--file`; a directory wins when both are given
    pub fn target(&self) -> Result<Target> {
        if let Some(dir) = non_empty(self.dir.as_ref()) {
            return Ok(Target::Dir(clean_path(dir)));
        }
        let file = required(self.file.as_ref(), "file")?;
        Ok(Target::File(file))
    }
}

impl DiffArgs {
    pub fn base(&self) -> Result<PathBuf> {
        required(self.base.as_ref(), "base")
    }
}

impl ChunkArgs {
    pub fn file(&self) -> Result<PathBuf> {
        required(self.file.as_ref(), "file")
    }

    /// Chunk size with non-positive values collapsed to zero
    pub fn chunk_size(&self) -> usize {
        usize::try_from(self.by).unwrap_or(0)
    }
}

impl SplitArgs {
    pub fn delim(&self) -> Result<String> {
        match self.delim.as_deref() {
            Some(delim) if !delim.is_empty() => Ok(delim.to_string()),
            _ => Err(missing("delim")),
        }
    }

    /// Parse `--ids` into field positions
    pub fn ids(&self) -> Result<Vec<usize>> {
        match self.ids.as_deref() {
            Some(ids) if !ids.trim().is_empty() => parse_ids(ids),
            _ => Err(missing("ids")),
        }
    }

    pub fn policy(&self) -> PluckPolicy {
        self.on_missing.into()
    }
}

impl ConcatArgs {
    pub fn dir(&self) -> Result<PathBuf> {
        required(self.dir.as_ref(), "dir").map(|dir| clean_path(&dir))
    }
}

/// Parse a comma-separated list of zero-based field positions
pub fn parse_ids(ids: &str) -> Result<Vec<usize>> {
    ids.split(',')
        .map(|id| {
            let id = id.trim();
            id.parse::<usize>().map_err(|_| {
                ListyError::Validation(format!("Invalid field id '{}' in --ids '{}'", id, ids))
            })
        })
        .collect()
}

fn non_empty(path: Option<&PathBuf>) -> Option<&PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}

fn required(path: Option<&PathBuf>, flag: &str) -> Result<PathBuf> {
    non_empty(path).cloned().ok_or_else(|| missing(flag))
}

fn missing(flag: &str) -> ListyError {
    ListyError::Validation(format!("Please provide a value for --{}", flag))
}

fn clean_path(path: &Path) -> PathBuf {
    match path.to_str().map(sanitize_filename) {
        Some(cleaned) if !cleaned.is_empty() => PathBuf::from(cleaned),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("listy").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(parse_ids("1,3").unwrap(), vec![1, 3]);
        assert_eq!(parse_ids(" 2, 0 ,2").unwrap(), vec![2, 0, 2]);
        assert!(matches!(parse_ids("1,x"), Err(ListyError::Validation(_))));
        assert!(parse_ids("-1").is_err());
    }

    #[test]
    fn test_dir_wins_over_file() {
        let args = parse(&["dedupe", "-f", "a.txt", "-d", "lists//"]);
        let Command::Dedupe(target) = args.command else { panic!("expected dedupe") };
        assert_eq!(target.target().unwrap(), Target::Dir(PathBuf::from("lists")));
    }

    #[test]
    fn test_missing_target_is_validation_error() {
        let args = parse(&["random"]);
        let Command::Random(random) = args.command else { panic!("expected random") };
        let err = random.target.target().unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Please provide a value for --file");
    }

    #[test]
    fn test_chunk_defaults_and_boundaries() {
        let args = parse(&["chunk", "-f", "ids.txt"]);
        let Command::Chunk(chunk) = args.command else { panic!("expected chunk") };
        assert_eq!(chunk.chunk_size(), 2000);

        let args = parse(&["chunk", "-f", "ids.txt", "-b", "-5"]);
        let Command::Chunk(chunk) = args.command else { panic!("expected chunk") };
        assert_eq!(chunk.chunk_size(), 0);
    }

    #[test]
    fn test_split_args() {
        let args = parse(&["-q", "split", "-s", ",", "-i", "1,3", "-f", "x.csv", "--on-missing", "skip"]);
        assert!(args.quiet);
        let Command::Split(split) = args.command else { panic!("expected split") };
        assert_eq!(split.delim().unwrap(), ",");
        assert_eq!(split.ids().unwrap(), vec![1, 3]);
        assert_eq!(split.on_missing, OnMissing::Skip);
        assert_eq!(split.policy(), PluckPolicy::Skip);

        let args = parse(&["split", "-i", "1", "-f", "x.csv"]);
        let Command::Split(split) = args.command else { panic!("expected split") };
        assert!(split.delim().is_err());
        assert_eq!(split.policy(), PluckPolicy::Abort);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&["diff", "-b", "base.txt", "-d", "lists", "--on-error", "collect", "-v"]);
        assert!(args.verbose);
        let Command::Diff(diff) = args.command else { panic!("expected diff") };
        assert_eq!(diff.base().unwrap(), PathBuf::from("base.txt"));
        assert_eq!(diff.target.on_error, BatchPolicy::Collect);
    }
}
