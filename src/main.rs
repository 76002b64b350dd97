//! deploykit - deploy functions to Google Cloud Functions behind a Fastly gateway

use clap::Parser;
use deploykit::cli::{Cli, run};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Alternate Display prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
