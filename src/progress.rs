//! Progress display module
//!
//! Styled status lines, the per-file progress bar used by directory batches,
//! and the end-of-run summary.

use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    println!("  {} {}", "•".green(), text);
}

/// Create a styled progress bar counting files
pub fn create_progress_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);

    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Counters for a directory batch
#[derive(Debug)]
pub struct ProcessingStats {
    pub total_files: u64,
    pub processed_files: u64,
    pub failed_files: u64,
    pub total_bytes: u64,
    pub processed_bytes: u64,
    pub start_time: Instant,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self {
            total_files: 0,
            processed_files: 0,
            failed_files: 0,
            total_bytes: 0,
            processed_bytes: 0,
            start_time: Instant::now(),
        }
    }

    /// Register a file about to be processed
    pub fn add_file(&mut self, size: u64) {
        self.total_files += 1;
        self.total_bytes += size;
    }

    pub fn complete_file(&mut self, size: u64) {
        self.processed_files += 1;
        self.processed_bytes += size;
    }

    pub fn fail_file(&mut self) {
        self.failed_files += 1;
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Files neither completed nor failed, e.g. after an aborted batch
    pub fn pending_files(&self) -> u64 {
        self.total_files
            .saturating_sub(self.processed_files + self.failed_files)
    }

    /// Print the end-of-batch summary block
    pub fn print_summary(&self) {
        let rule = "─".repeat(48);

        println!();
        println!("{}", rule.dimmed());
        println!(
            "  {} {} of {}",
            label("files"),
            format_number(self.processed_files).green(),
            format_number(self.total_files)
        );
        if self.failed_files > 0 {
            println!(
                "  {} {}",
                label("failed"),
                format_number(self.failed_files).red()
            );
        }
        println!(
            "  {} {} of {}",
            label("read"),
            ByteSize(self.processed_bytes),
            ByteSize(self.total_bytes)
        );
        println!("  {} {}", label("took"), format_duration(self.elapsed()));
        println!("{}", rule.dimmed());
    }
}

fn label(name: &str) -> ColoredString {
    format!("{:<10}", name).bold()
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Group the digits of `n` in threes, e.g. `12,345`
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;

    let mut groups = Vec::with_capacity(digits.len() / 3 + 1);
    if head > 0 {
        groups.push(&digits[..head]);
    }
    groups.extend(
        digits.as_bytes()[head..]
            .chunks(3)
            .map(|group| std::str::from_utf8(group).unwrap_or_default()),
    );

    groups.join(",")
}

/// Short human-readable duration: `420ms`, `3.2s`, `4m 05s`, `2h 10m`
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    match secs {
        0 => format!("{}ms", duration.as_millis()),
        1..=59 => format!("{:.1}s", duration.as_secs_f64()),
        60..=3599 => format!("{}m {:02}s", secs / 60, secs % 60),
        _ => format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60),
    }
}
