//! listy - line-oriented list toolkit
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::process;

use listy::cli::{Args, Command};
use listy::processor::{Processor, ProcessorConfig};
use listy::progress::print_error;

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging, leaving an explicit RUST_LOG alone
    if std::env::var_os("RUST_LOG").is_none() {
        if args.verbose {
            std::env::set_var("RUST_LOG", "debug");
        } else if !args.quiet {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    // Run the application
    if let Err(e) = run(args) {
        print_error(&format!("{}", e));

        // Print chain of errors
        let mut source = e.source();
        while let Some(err) = source {
            print_error(&format!("  Caused by: {}", err));
            source = err.source();
        }

        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = ProcessorConfig::from_args(&args);
    let mut processor = Processor::new(config);

    match &args.command {
        Command::Dedupe(target) => processor.dedupe(target),
        Command::Diff(diff) => processor.diff(diff),
        Command::Chunk(chunk) => processor.chunk(chunk),
        Command::Random(random) => processor.random(random),
        Command::Split(split) => processor.split(split),
        Command::Concat(concat) => processor.concat(concat),
        Command::Count(target) => processor.count(target),
    }
}
