//! File operation wrappers
//!
//! Each wrapper loads its input through the line store, runs one transform,
//! and persists the result. Errors from loading or saving propagate as-is.

use crate::error::Result;
use crate::lines::{self, LineSequence};
use crate::output::chunk_file_name;
use crate::transform::{self, PluckPolicy, SplitRecord};

use rand::Rng;
use std::path::Path;

/// Dedupe `src` into `dst`, returning the number of removed duplicates
pub fn dedupe_file(src: &Path, dst: &Path) -> Result<usize> {
    let lines = lines::load(src)?;
    let (removed, lines) = transform::dedupe(lines);
    lines::save(dst, &lines)?;
    Ok(removed)
}

/// Write the lines of `candidate` missing from `base` into `dst`, returning
/// how many were written
pub fn diff_files(base: &Path, candidate: &Path, dst: &Path) -> Result<usize> {
    let base_set = lines::load_to_set(base)?;
    let lines = lines::load(candidate)?;
    let (n, result) = transform::diff(&base_set, lines);
    lines::save(dst, &result)?;
    Ok(n)
}

/// Split `src` into files of `chunk_size` lines named `<prefix stem>-<n>.<ext>`
/// (n starting at 1). Returns the number of files written; a zero chunk size
/// or an empty input writes nothing.
pub fn chunk_file(src: &Path, dst_prefix: &Path, chunk_size: usize) -> Result<usize> {
    let lines = lines::load(src)?;
    let chunks = transform::chunk_by_lines(&lines, chunk_size);

    for (i, chunk) in chunks.iter().enumerate() {
        let name = chunk_file_name(dst_prefix, i + 1);
        lines::save(&name, chunk)?;
        log::debug!("Chunk {} -> {:?} ({} lines)", i + 1, name, chunk.len());
    }

    Ok(chunks.len())
}

/// Shuffle `src` into `dst` with the given random source, returning the
/// number of lines written
pub fn shuffle_file<R: Rng + ?Sized>(src: &Path, dst: &Path, rng: &mut R) -> Result<usize> {
    let lines = lines::load(src)?;
    let lines = transform::shuffle(lines, rng);
    lines::save(dst, &lines)?;
    Ok(lines.len())
}

/// Split every line of `src` on `delim` and pluck the fields at `ids`.
/// Nothing is written; callers join and save the records themselves.
pub fn split_and_pluck_file(
    src: &Path,
    delim: &str,
    ids: &[usize],
    policy: PluckPolicy,
) -> Result<Vec<SplitRecord>> {
    let lines = lines::load(src)?;
    transform::split_and_pluck(&lines, delim, ids, policy)
}

/// Split and pluck `src`, re-join the fields with `delim` and save to `dst`.
/// Returns the number of lines written.
pub fn split_file(
    src: &Path,
    dst: &Path,
    delim: &str,
    ids: &[usize],
    policy: PluckPolicy,
) -> Result<usize> {
    let records = split_and_pluck_file(src, delim, ids, policy)?;
    let lines = transform::join_records(&records, delim);
    lines::save(dst, &lines)?;
    Ok(lines.len())
}

/// Concatenate `files` in order into `dst`, returning the total line count
pub fn concat_files<P: AsRef<Path>>(files: &[P], dst: &Path) -> Result<usize> {
    let mut result = LineSequence::new();
    for file in files {
        let file = file.as_ref();
        log::debug!("Concatenating {:?}", file);
        result.extend(lines::load(file)?);
    }

    lines::save(dst, &result)?;
    Ok(result.len())
}
