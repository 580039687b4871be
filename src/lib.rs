//! # listy
//!
//! Quick set-like and line-level transformations over line-oriented lists.
//!
//! ## Features
//!
//! - **Dedupe**: drop repeated lines, keeping first occurrences in order
//! - **Diff**: keep the lines of a file that are missing from a base file
//! - **Chunk**: split a list into files of N lines
//! - **Random**: shuffle lines, optionally from a fixed seed
//! - **Split**: pluck delimiter-separated fields by position
//! - **Concat**: join every file of a directory into one
//!
//! Every operation works on a single file or on each file directly inside a
//! directory. Inputs are loaded fully into memory as raw bytes, so lines are
//! compared and written back exactly as they appear on disk.
//!
//! ## Example
//!
//! ```rust
//! use listy::dedup::to_set;
//! use listy::lines::split_lines;
//! use listy::transform::{dedupe, diff};
//!
//! let lines = split_lines(b"b\na\nb\ncaf\xe9\n");
//! let (removed, unique) = dedupe(lines);
//! assert_eq!(removed, 1);
//! assert_eq!(unique, vec![&b"b"[..], &b"a"[..], &b"caf\xe9"[..]]);
//!
//! let base = to_set(&["a"]);
//! let (n, fresh) = diff(&base, unique);
//! assert_eq!(n, 2);
//! assert_eq!(fresh, vec![&b"b"[..], &b"caf\xe9"[..]]);
//! ```

pub mod cli;
pub mod dedup;
pub mod error;
pub mod lines;
pub mod ops;
pub mod output;
pub mod processor;
pub mod progress;
pub mod transform;

pub use cli::Args;
pub use error::{ListyError, Result};
pub use processor::{Processor, ProcessorConfig};
