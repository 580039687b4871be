//! Output management module
//!
//! Buffered line writing and the naming convention for derived output files.

use crate::error::{ListyError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default buffer size for file writing (1MB)
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Suffix for `dedupe` outputs
pub const DEDUPED_SUFFIX: &str = "-deduped";
/// Suffix for `diff` outputs
pub const DIFF_SUFFIX: &str = "-diff";
/// Suffix for `random` outputs
pub const RANDOM_SUFFIX: &str = "-rnd";
/// Suffix for `split` outputs
pub const SPLIT_SUFFIX: &str = "-split";
/// Suffix for the `chunk` destination prefix; chunk files add `-<n>` after it
pub const CHUNK_SUFFIX: &str = "-chunk";
/// File name `concat` writes into the input directory by default
pub const CONCAT_FILE_NAME: &str = "all.txt";

/// Output file writer with buffering
pub struct OutputWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    lines_written: u64,
    bytes_written: u64,
}

impl OutputWriter {
    /// Create (or truncate) the file at `path`
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| ListyError::io(path, e))?;

        Ok(Self::with_file(path, file))
    }

    /// Open the file at `path` for appending, creating it if it is absent
    pub fn append(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|e| ListyError::io(path, e))?;

        Ok(Self::with_file(path, file))
    }

    fn with_file(path: &Path, file: File) -> Self {
        Self {
            writer: BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file),
            path: path.to_path_buf(),
            lines_written: 0,
            bytes_written: 0,
        }
    }

    /// Write a line's bytes followed by a single `\n`
    pub fn write_line<L: AsRef<[u8]>>(&mut self, line: L) -> Result<()> {
        let line = line.as_ref();
        self.writer
            .write_all(line)
            .and_then(|()| self.writer.write_all(b"\n"))
            .map_err(|e| ListyError::io(&self.path, e))?;
        self.lines_written += 1;
        self.bytes_written += line.len() as u64 + 1;
        Ok(())
    }

    /// Write every line in order
    pub fn write_lines<S: AsRef<[u8]>>(&mut self, lines: &[S]) -> Result<()> {
        for line in lines {
            self.write_line(line)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| ListyError::io(&self.path, e))
    }

    /// Get number of lines written
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Get bytes written
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl Drop for OutputWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

/// Insert `suffix` between the file stem and the extension of `path`.
///
/// `lists/words.txt` with `-deduped` becomes `lists/words-deduped.txt`, a
/// path without extension just gets the suffix appended, and an empty path
/// stays empty.
pub fn append_suffix_to_filename(path: &Path, suffix: &str) -> PathBuf {
    let Some(stem) = path.file_stem() else {
        return path.to_path_buf();
    };

    let mut name = stem.to_os_string();
    name.push(suffix);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

/// Collapse repeated `/` separators and drop trailing ones.
///
/// `directory////directory//file.txt/` becomes `directory/directory/file.txt`.
/// A bare `/` becomes the empty string.
pub fn sanitize_filename(filename: &str) -> String {
    let mut cleaned = String::with_capacity(filename.len());
    let mut previous_slash = false;
    for c in filename.chars() {
        if c == '/' && previous_slash {
            continue;
        }
        previous_slash = c == '/';
        cleaned.push(c);
    }

    if cleaned == "/" {
        return String::new();
    }
    cleaned.trim_end_matches('/').to_string()
}

/// Path of the `index`-th (1-based) chunk file for a destination prefix
pub fn chunk_file_name(prefix: &Path, index: usize) -> PathBuf {
    append_suffix_to_filename(prefix, &format!("-{}", index))
}

/// Default `concat` output inside `dir`
pub fn concat_output_name(dir: &Path) -> PathBuf {
    dir.join(CONCAT_FILE_NAME)
}

/// Ensure the parent directory of an output file exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(|e| ListyError::io(parent, e))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_writer() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.txt");

        let mut writer = OutputWriter::create(&path).unwrap();
        writer.write_line("hello").unwrap();
        writer.write_line("world").unwrap();
        writer.flush().unwrap();

        assert_eq!(writer.lines_written(), 2);
        assert_eq!(writer.bytes_written(), 12);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "hello\nworld\n");
    }

    #[test]
    fn test_output_writer_append_keeps_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.txt");
        std::fs::write(&path, "first\n").unwrap();

        let mut writer = OutputWriter::append(&path).unwrap();
        writer.write_lines(&["second", "third"]).unwrap();
        writer.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\nthird\n");
    }

    #[test]
    fn test_output_writer_writes_raw_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("raw.txt");

        let mut writer = OutputWriter::create(&path).unwrap();
        writer.write_line(b"caf\xe9").unwrap();
        writer.flush().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"caf\xe9\n");
        assert_eq!(writer.bytes_written(), 5);
    }

    #[test]
    fn test_append_suffix_to_filename() {
        let cases = [
            ("/path/to/rockyou.txt", "-deduped", "/path/to/rockyou-deduped.txt"),
            ("words", "-rnd", "words-rnd"),
            ("dir.d/words", "-split", "dir.d/words-split"),
            ("archive.tar.gz", "-diff", "archive.tar-diff.gz"),
            ("", "-diff", ""),
        ];
        for (input, suffix, expected) in cases {
            assert_eq!(
                append_suffix_to_filename(Path::new(input), suffix),
                PathBuf::from(expected),
                "for {input:?}"
            );
        }
    }

    #[test]
    fn test_chunk_file_name() {
        let prefix = append_suffix_to_filename(Path::new("ids.txt"), CHUNK_SUFFIX);
        assert_eq!(chunk_file_name(&prefix, 3), PathBuf::from("ids-chunk-3.txt"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(
            sanitize_filename("directory////directory////file.txt"),
            "directory/directory/file.txt"
        );
        assert_eq!(sanitize_filename("lists//"), "lists");
        assert_eq!(sanitize_filename("/abs//dir"), "/abs/dir");
        assert_eq!(sanitize_filename("/"), "");
        assert_eq!(sanitize_filename(""), "");
    }

    #[test]
    fn test_ensure_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/deeper/out.txt");
        ensure_parent_dir(&path).unwrap();
        assert!(temp_dir.path().join("nested/deeper").is_dir());
    }
}
