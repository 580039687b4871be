//! Transform engine
//!
//! Pure functions over in-memory line sequences. Nothing here touches the
//! filesystem; see [`crate::ops`] for the file-level wrappers.

use crate::dedup::LineSet;
use crate::error::{ListyError, Result};
use crate::lines::{Line, LineSequence};

use bstr::ByteSlice;
use rand::seq::SliceRandom;
use rand::Rng;

/// Default number of lines per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

/// Consecutive, size-bounded groups of lines
pub type ChunkGroup = Vec<LineSequence>;

/// The fields of one line after splitting (and possibly plucking)
pub type SplitRecord = Vec<Line>;

/// What `split_and_pluck` does with a line that lacks a requested field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PluckPolicy {
    /// Fail the whole operation with `IndexOutOfRange`
    #[default]
    Abort,
    /// Drop the line from the output
    Skip,
    /// Emit an empty field in place of the missing one
    Empty,
}

/// Remove repeated lines, keeping the first occurrence of each.
///
/// Returns the number of dropped lines along with the surviving lines in
/// their original order.
pub fn dedupe(lines: LineSequence) -> (usize, LineSequence) {
    let mut seen = LineSet::with_capacity(lines.len());
    let mut result = Vec::with_capacity(lines.len());
    let mut dupes = 0;

    for line in lines {
        if seen.insert(&line) {
            result.push(line);
        } else {
            dupes += 1;
        }
    }

    (dupes, result)
}

/// Keep the lines of `candidate` that are not members of `base`, in
/// candidate order. The count is the length of the result.
pub fn diff(base: &LineSet, candidate: LineSequence) -> (usize, LineSequence) {
    let result: LineSequence = candidate
        .into_iter()
        .filter(|line| !base.contains(line))
        .collect();

    (result.len(), result)
}

/// Partition `lines` into consecutive groups of `chunk_size` lines; the last
/// group holds the remainder. A zero chunk size or empty input yields no
/// groups.
pub fn chunk_by_lines(lines: &[Line], chunk_size: usize) -> ChunkGroup {
    if chunk_size == 0 {
        return Vec::new();
    }
    lines.chunks(chunk_size).map(<[Line]>::to_vec).collect()
}

/// Uniformly permute `lines` with the given random source
pub fn shuffle<R: Rng + ?Sized>(mut lines: LineSequence, rng: &mut R) -> LineSequence {
    lines.shuffle(rng);
    lines
}

/// Split `line` on a literal delimiter. An empty delimiter splits between
/// characters; bytes that are not valid UTF-8 each form their own field.
fn split_fields<'a>(line: &'a [u8], delim: &str) -> Vec<&'a [u8]> {
    if delim.is_empty() {
        return line
            .char_indices()
            .map(|(start, end, _)| &line[start..end])
            .collect();
    }
    line.split_str(delim).collect()
}

/// Split every line on `delim`
pub fn split_by(lines: &[Line], delim: &str) -> Vec<SplitRecord> {
    lines
        .iter()
        .map(|line| split_fields(line, delim).into_iter().map(Line::from).collect())
        .collect()
}

/// Split every line on `delim` and keep only the fields at `ids`, in the
/// order given. Repeated ids repeat the field.
///
/// A line with fewer fields than an id needs is handled according to
/// `policy`.
pub fn split_and_pluck(
    lines: &[Line],
    delim: &str,
    ids: &[usize],
    policy: PluckPolicy,
) -> Result<Vec<SplitRecord>> {
    let mut result = Vec::with_capacity(lines.len());

    'lines: for (n, line) in lines.iter().enumerate() {
        let fields = split_fields(line, delim);
        let mut plucked = Vec::with_capacity(ids.len());

        for &id in ids {
            match fields.get(id) {
                Some(field) => plucked.push(Line::from(*field)),
                None => match policy {
                    PluckPolicy::Abort => {
                        return Err(ListyError::IndexOutOfRange {
                            line: n + 1,
                            index: id,
                            fields: fields.len(),
                        });
                    }
                    PluckPolicy::Skip => {
                        log::warn!(
                            "Skipping line {}: field {} out of range ({} fields)",
                            n + 1,
                            id,
                            fields.len()
                        );
                        continue 'lines;
                    }
                    PluckPolicy::Empty => plucked.push(Line::default()),
                },
            }
        }

        result.push(plucked);
    }

    Ok(result)
}

/// Re-join split records into lines with `delim`
pub fn join_records(records: &[SplitRecord], delim: &str) -> LineSequence {
    records
        .iter()
        .map(|record| Line::from(bstr::join(delim, record)))
        .collect()
}

/// Number of lines in a sequence
pub fn count_lines<S>(lines: &[S]) -> usize {
    lines.len()
}
