//! Error types for list operations

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListyError {
    /// A file or directory could not be opened, read or written
    #[error("I/O error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Required input is missing or malformed
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A plucked field index does not exist on a split line
    #[error("Line {line}: field index {index} out of range ({fields} fields)")]
    IndexOutOfRange {
        line: usize,
        index: usize,
        fields: usize,
    },
}

impl ListyError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ListyError>;
