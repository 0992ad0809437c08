use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use contacts_cli::{cli::Cli, commands, config::Config, error::CliError, logging};
use persistence::ContactStore;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load()?;
    logging::init_logging(&config.logging);

    info!("Starting contact manager v{}", env!("CARGO_PKG_VERSION"));

    let store = match ContactStore::connect(&config.database).await {
        Ok(store) => store,
        Err(e) => {
            let err = CliError::from(e);
            error!(error = %err, "Could not connect to database");
            eprintln!("Error: {}", err);
            return Ok(ExitCode::from(err.exit_code()));
        }
    };

    let mut input = std::io::stdin().lock();
    let mut out = std::io::stdout().lock();
    let result = commands::run(&store, cli.command, cli.json, &mut input, &mut out).await;
    store.close().await;

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("Error: {}", err);
            Ok(ExitCode::from(err.exit_code()))
        }
    }
}
