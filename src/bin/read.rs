//! Schema Registry Read CLI
//!
//! Runs the `schemaregistry_schema` data source outside of a host and prints
//! the resulting state, the provider schema, or the effective configuration.

use anyhow::Context;
use clap::{Parser, Subcommand};
use schemaregistry_provider::provider::schema_document;
use schemaregistry_provider::{Provider, ProviderConfig, SCHEMA_DATA_SOURCE};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schemaregistry-read")]
#[command(about = "Read schemas from a schema registry the way the data source does")]
#[command(version)]
struct Cli {
    /// Config file layered over the default locations
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Registry URL (overrides configuration)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the latest schema for a subject
    Read {
        /// Subject to look up
        #[arg(short, long)]
        subject: String,
    },

    /// Print the provider and data source schema as JSON
    Schema,

    /// Print the effective configuration (password redacted)
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ProviderConfig> {
    let mut config = ProviderConfig::load_from(cli.config.as_deref())
        .context("failed to load provider configuration")?;
    if let Some(url) = &cli.url {
        config.registry.url = url.clone();
    }
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Read { subject } => {
            let config = load_config(&cli)?;
            let provider = Provider::configure(&config)?;

            let response = provider.read_data_source(
                SCHEMA_DATA_SOURCE,
                &serde_json::json!({ "subject": subject }),
            );
            for diag in &response.diagnostics {
                eprintln!("{}", diag);
            }

            match response.state {
                Some(state) => {
                    println!("{}", serde_json::to_string_pretty(&state)?);
                    Ok(!response.diagnostics.has_errors())
                }
                None => Ok(false),
            }
        }

        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&schema_document())?);
            Ok(true)
        }

        Commands::Config => {
            let config = load_config(&cli)?;
            print!("{}", config.redacted().to_toml()?);
            if let Err(e) = config.validate() {
                eprintln!("Warning: {}", e);
            }
            Ok(true)
        }
    }
}
