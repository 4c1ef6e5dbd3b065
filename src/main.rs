use clap::Parser;
use mbexport::actions::{self, ActionError};
use mbexport::configuration::{Configuration, ConfigurationError};
use mbexport::exit_codes::MbExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Export Metabase group memberships (permissions.tsv) and the saved-query
/// inventory of the collection tree (queries.tsv) to the working directory.
///
/// Connection settings come from the MBEXPORT_HOST, MBEXPORT_USER and
/// MBEXPORT_PASSWORD environment variables, optionally loaded from a local
/// .env file.
#[derive(Parser)]
#[command(name = "mbexport", version, about)]
struct Cli {}

#[derive(Error, Debug)]
enum MbExportError {
    #[error(transparent)]
    ConfigurationError(#[from] ConfigurationError),
    #[error(transparent)]
    ActionError(#[from] ActionError),
}

impl MbExportError {
    fn exit_code(&self) -> MbExitCode {
        match self {
            MbExportError::ConfigurationError(_) => MbExitCode::ConfigError,
            MbExportError::ActionError(e) => e.exit_code(),
        }
    }
}

async fn run() -> Result<(), MbExportError> {
    // Seed the environment from a local .env file, if present
    dotenv::dotenv().ok();
    let configuration = Configuration::load_from_env()?;

    actions::run(&configuration).await?;

    Ok(())
}

/// Main entry point for the program
#[tokio::main]
async fn main() {
    // Intialize the logging subsystem
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let _cli = Cli::parse();

    if let Err(e) = run().await {
        eprintln!("ERROR: {}", e);
        ::std::process::exit(e.exit_code().code());
    }
}
