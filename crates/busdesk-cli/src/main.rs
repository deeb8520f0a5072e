mod agency;
mod import;
mod station;

use std::path::PathBuf;

use anyhow::Context;
use busdesk_core::{AppConfig, ConfigError};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "busdesk")]
#[command(about = "Bus agency administration from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Bulk bus import files
    Import {
        #[command(subcommand)]
        command: ImportCommands,
    },
    /// The signed-in agency
    Agency {
        #[command(subcommand)]
        command: AgencyCommands,
    },
    /// Station creation
    Station {
        #[command(subcommand)]
        command: StationCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ImportCommands {
    /// Validate a .csv/.xls/.xlsx file locally
    Check { file: PathBuf },
    /// Validate, then upload to the server
    Upload { file: PathBuf },
}

#[derive(Debug, Subcommand)]
enum AgencyCommands {
    /// Show completion requirements and where the agency should go next
    Status,
    /// Publish the agency once every requirement is completed
    Publish,
}

#[derive(Debug, Subcommand)]
enum StationCommands {
    /// Walk the station wizard with a JSON draft and submit it
    Submit {
        /// Station draft as JSON (camelCase keys)
        draft: PathBuf,
        /// Station photo; repeat for several
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn require_config(config: Result<AppConfig, ConfigError>) -> anyhow::Result<AppConfig> {
    config.context("failed to load configuration")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = busdesk_core::load_app_config_from_env();
    let log_level = config.as_ref().map_or("info", |c| c.log_level.as_str());
    init_tracing(log_level)?;

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Import { command }) => match command {
            ImportCommands::Check { file } => import::run_import_check(&file)?,
            ImportCommands::Upload { file } => {
                import::run_import_upload(&require_config(config)?, &file).await?;
            }
        },
        Some(Commands::Agency { command }) => {
            let config = require_config(config)?;
            match command {
                AgencyCommands::Status => agency::run_agency_status(&config).await?,
                AgencyCommands::Publish => agency::run_agency_publish(&config).await?,
            }
        }
        Some(Commands::Station { command }) => match command {
            StationCommands::Submit { draft, images } => {
                station::run_station_submit(&require_config(config)?, &draft, &images).await?;
            }
        },
        None => println!("busdesk: run with --help to list commands"),
    }

    Ok(())
}
