//! medcost-cli library
//!
//! This library is the foundation for the medcost CLI binary.
//! Exports CLI structures for testing and reuse.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
pub mod error;
mod output;

pub use error::CliError;

/// medcost - Medical cost prediction
///
/// Encode insured-person attributes and run them through a trained
/// random forest artifact.
#[derive(Parser, Debug)]
#[command(name = "medcost")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict the medical cost for one person
    Predict {
        /// Age in years (0-120)
        #[arg(long)]
        age: u32,

        /// Body mass index (0.0-100.0)
        #[arg(long)]
        bmi: f32,

        /// Number of children (0-20)
        #[arg(long, default_value = "0")]
        children: u32,

        /// Sex: male or female
        #[arg(long)]
        sex: String,

        /// Smoker: yes or no
        #[arg(long)]
        smoker: String,

        /// Region: northeast, southeast, northwest or southwest
        #[arg(long)]
        region: String,

        /// Path to the model artifact (overrides the config file)
        #[arg(long, value_name = "FILE")]
        model: Option<PathBuf>,

        /// TOML configuration file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Show an artifact's summary and schema alignment
    Inspect {
        /// Path to the model artifact
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    /// Log level implied by the verbosity flags.
    #[must_use]
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            log::LevelFilter::Error
        } else if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        }
    }
}

/// Execute the CLI command and return the result.
///
/// # Errors
///
/// Returns a [`CliError`] carrying the exit code for the failure class.
pub fn execute_command(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Commands::Predict {
            age,
            bmi,
            children,
            sex,
            smoker,
            region,
            model,
            config,
        } => {
            let args = commands::predict::PredictArgs {
                age: *age,
                bmi: *bmi,
                children: *children,
                sex,
                smoker,
                region,
            };
            commands::predict::run(&args, model.as_deref(), config.as_deref(), cli.json)
        }
        Commands::Inspect { file } => commands::inspect::run(file, cli.json),
    }
}

/// Print a failure to stderr.
pub fn report_error(err: &CliError) {
    output::error(&err.to_string());
}
