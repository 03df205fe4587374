pub mod batch;
pub mod cli;
pub mod columns;
pub mod csv_io;
pub mod error;
pub mod expand;
pub mod identifier;
pub mod merge;
pub mod record;
pub mod template;
pub mod validation;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

pub use batch::{merge_batch, run_batch, MergedBatch, RunOptions, RunSummary};
pub use error::TemplatizerError;
pub use identifier::IdentifierRegistry;
pub use merge::RecordMerger;
pub use record::Record;
pub use template::{Template, TemplateValue};

pub fn run() -> ExitCode {
    // Load .env file - current dir first, then parent
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path("../.env");
    }

    // Initialize tracing with RUST_LOG env filter
    // Default: warn for dependencies, info for run summaries
    // Use RUST_LOG=debug for per-record identifier logs
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,ia_templatizer_lib=info")),
        )
        .init();

    // Usage errors exit here with status 2
    let options = cli::Cli::parse().into_options();

    match run_batch(&options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
