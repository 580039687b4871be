//! Line store
//!
//! Loads a file into an ordered sequence of lines and writes sequences back
//! out. Lines are raw bytes: nothing is decoded or re-encoded, so whatever a
//! file holds between two `\n` bytes is written back exactly as read.

use crate::dedup::LineSet;
use crate::error::{ListyError, Result};
use crate::output::{ensure_parent_dir, OutputWriter};

use bstr::{BString, ByteSlice};
use std::fs::File;
use std::path::Path;

/// A single line, terminator stripped
pub type Line = BString;

/// An ordered sequence of lines, terminators stripped
pub type LineSequence = Vec<Line>;

/// Read the file at `path` and return its lines without line terminators.
///
/// A trailing `\r` is stripped from every line, a last line without a
/// newline still counts, and an empty file yields an empty sequence.
pub fn load(path: &Path) -> Result<LineSequence> {
    let file = File::open(path).map_err(|e| ListyError::io(path, e))?;
    let len = file.metadata().map_err(|e| ListyError::io(path, e))?.len();
    if len == 0 {
        log::debug!("{:?} is empty", path);
        return Ok(Vec::new());
    }

    // SAFETY: the map is read-only and dropped before this function returns;
    // every line is copied out of it.
    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| ListyError::io(path, e))?;
    let lines = split_lines(&mmap);

    if log::log_enabled!(log::Level::Debug) && mmap.to_str().is_err() {
        log::debug!("{:?} is not valid UTF-8, lines are kept as raw bytes", path);
    }
    log::debug!("Loaded {} lines from {:?}", lines.len(), path);
    Ok(lines)
}

/// Load the lines of `path` straight into a membership set
pub fn load_to_set(path: &Path) -> Result<LineSet> {
    let lines = load(path)?;
    Ok(LineSet::from_lines(lines))
}

/// Count the lines of the file at `path`
pub fn count_file_lines(path: &Path) -> Result<usize> {
    Ok(load(path)?.len())
}

/// Create or truncate `path` and write each line followed by `\n`.
///
/// There is no atomic rename: a failed write can leave a partial file behind.
pub fn save<S: AsRef<[u8]>>(path: &Path, lines: &[S]) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut writer = OutputWriter::create(path)?;
    writer.write_lines(lines)?;
    writer.flush()?;
    log::debug!(
        "Wrote {} lines ({} bytes) to {:?}",
        writer.lines_written(),
        writer.bytes_written(),
        path
    );
    Ok(())
}

/// Like [`save`], but keeps whatever `path` already holds and adds to the end
pub fn append<S: AsRef<[u8]>>(path: &Path, lines: &[S]) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut writer = OutputWriter::append(path)?;
    writer.write_lines(lines)?;
    writer.flush()?;
    log::debug!("Appended {} lines to {:?}", writer.lines_written(), path);
    Ok(())
}

/// Split raw content on `\n`, dropping one trailing `\r` per line
pub fn split_lines(content: &[u8]) -> LineSequence {
    let mut lines = Vec::new();
    let mut start = 0;

    for end in memchr::memchr_iter(b'\n', content) {
        lines.push(Line::from(strip_cr(&content[start..end])));
        start = end + 1;
    }
    if start < content.len() {
        lines.push(Line::from(strip_cr(&content[start..])));
    }

    lines
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}
