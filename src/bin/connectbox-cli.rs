use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

use connectbox_admin::config::validation::validate_config;
use connectbox_admin::config::{load_config, AuthConfig, ClientConfig, ConfigError};
use connectbox_admin::observability::init_logging;
use connectbox_admin::{AdminClient, ApiResult, ValueEncoding};

#[derive(Parser)]
#[command(name = "connectbox-cli")]
#[command(about = "Command-line client for the ConnectBox admin API", long_about = None)]
struct Cli {
    /// Admin base URL; overrides the config file
    #[arg(short, long)]
    url: Option<String>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Admin username for HTTP Basic auth
    #[arg(long)]
    user: Option<String>,

    #[arg(long, requires = "user")]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a property
    Get { name: String },
    /// Write a property
    Set {
        name: String,
        value: String,
        /// Send the value as-is instead of {"value": ...}
        #[arg(long)]
        raw: bool,
    },
    /// Trigger an event on a property
    Trigger { name: String, event: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    if let Some(username) = cli.user {
        config.auth = Some(AuthConfig {
            username,
            password: cli.password.unwrap_or_default(),
        });
    }

    // Overrides bypass the checks in load_config.
    if let Err(errors) = validate_config(&config) {
        eprintln!("{}", ConfigError::Validation(errors));
        return Ok(ExitCode::from(2));
    }

    init_logging(&config.observability);

    let client = AdminClient::from_config(&config)?;
    tracing::debug!(base_url = %client.base_url(), "Admin client ready");

    let outcome = match cli.command {
        Commands::Get { name } => client.get_property(&name).await,
        Commands::Set { name, value, raw } => {
            client
                .set_property(&name, &value, ValueEncoding::from(!raw))
                .await
        }
        Commands::Trigger { name, event } => client.trigger_event(&name, &event).await,
    };

    print_outcome(outcome)
}

fn print_outcome(outcome: ApiResult<Value>) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match outcome {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error {}: {}", e.code(), e.detail_text());
            Ok(ExitCode::FAILURE)
        }
    }
}
