use clap::Parser;
use std::process::ExitCode;

use futurefund::cli::{Cli, run};

#[tokio::main]
async fn main() -> ExitCode {
    futurefund::logging::init("info");

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
