mod catalog;
mod cli;
mod config;
mod download;
mod error;
mod pivot;
mod reading;
mod select;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, command::download::DownloadArgs, Cli, Commands};
use config::Settings;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::try_from(&cli.settings)?;

    let outcome = match cli.command {
        Commands::Download {
            dataset,
            state,
            district,
            start_date,
            end_date,
            pivot,
        } => {
            let args = DownloadArgs {
                dataset,
                state,
                district,
                start_date,
                end_date,
                pivot,
            };
            command::download(&settings, args).await
        }
        Commands::Pivot { file, value_column } => command::pivot(&file, &value_column),
    };

    match outcome {
        Ok(filename) => println!("File saved to `{}`", filename),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
