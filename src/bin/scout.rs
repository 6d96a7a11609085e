//! Scout CLI binary.

use std::process;

use clap::Parser;
use scout::cli::{ScoutArgs, execute_command};
use tracing::Level;

fn main() {
    let args = ScoutArgs::parse();

    // Logs go to stderr so JSON output on stdout stays parseable.
    let level = match args.verbosity() {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = execute_command(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
