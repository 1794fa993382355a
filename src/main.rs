//! Analyse a given lambda calculus expression and print the result to
//! standard output.
//!
//! Example usage:
//!
//!     cargo run -- --expr 'λx.λy.x z' normalize
//!
//! Logging goes to standard error and is configured through the `LAMBDA_LOG`
//! environment variable (e.g. `LAMBDA_LOG=debug`), or `--verbose`.

use std::process::ExitCode;

use clap::Parser;
use rust_lambda_analysis::end_to_end::{run_analyzer, AnalyzerConfig};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("LAMBDA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let analyzer_config = AnalyzerConfig::parse();

    init_tracing(analyzer_config.verbose);

    match run_analyzer(&analyzer_config) {
        Ok(analysis_result) => {
            println!("{}", analysis_result);
            ExitCode::SUCCESS
        }

        Err(run_error) => {
            eprintln!("{}", run_error);
            ExitCode::FAILURE
        }
    }
}
