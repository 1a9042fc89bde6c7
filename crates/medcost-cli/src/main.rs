//! medcost - medical cost prediction CLI
//!
//! Usage:
//!   medcost predict --age 30 --bmi 25.5 --children 1 \
//!       --sex male --smoker no --region southeast      # Predict one person
//!   medcost predict ... --model rfr_model.apr --json   # Explicit artifact, JSON output
//!   medcost inspect rfr_model.apr                      # Artifact summary and schema check

use clap::Parser;
use medcost_cli::{execute_command, report_error, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG, when set, overrides the flag-derived level.
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            e.exit_code()
        }
    }
}
