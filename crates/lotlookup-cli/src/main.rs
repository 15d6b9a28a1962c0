use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lotlookup_core::{LotIdentifier, NormalizedRecord};
use lotlookup_scraper::{ChromiumConfig, ChromiumDriver, Pipeline};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lotlookup")]
#[command(about = "Look up vehicle auction lots on Copart and IAAI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a lot and print it as a normalized JSON record
    Resolve {
        /// Bare lot number or Copart/IAAI listing URL
        input: String,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the platform and lot number an input resolves to, without fetching
    Classify {
        /// Bare lot number or Copart/IAAI listing URL
        input: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = lotlookup_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries the record; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Classify { input } => match lotlookup_core::classify_and_extract(&input) {
            Ok(lot) => {
                println!("{}", format_classification(&lot));
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("{e}");
                Ok(ExitCode::FAILURE)
            }
        },
        Commands::Resolve { input, pretty } => {
            let driver = ChromiumDriver::new(ChromiumConfig::from_app_config(&config));
            let pipeline = Pipeline::from_config(&config, driver)?;

            match pipeline.resolve(&input).await {
                Ok(record) => {
                    println!("{}", format_record(&record, pretty)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("{}: {}", e.kind(), e.detail());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn format_classification(lot: &LotIdentifier) -> String {
    format!("{} {}", lot.platform(), lot.id())
}

fn format_record(record: &NormalizedRecord, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(record)
    } else {
        serde_json::to_string(record)
    }
}
