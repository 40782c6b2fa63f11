use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

use threshold_exporter::config::{load_config, validation::validate_config, ThresholdConfig};
use threshold_exporter::resolve::{
    resolve_state_filters, resolve_tenant, resolve_thresholds, ResolutionSummary,
};

#[derive(Parser)]
#[command(name = "threshold-cli")]
#[command(about = "Inspect threshold configs and a running threshold-exporter", long_about = None)]
struct Cli {
    /// Base URL of a running exporter
    #[arg(short, long, env = "EXPORTER_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a config file and report validation warnings and counts
    Check { file: PathBuf },
    /// Print what a config file resolves to, as JSON
    Resolve {
        file: PathBuf,
        /// Only this tenant
        #[arg(short, long)]
        tenant: Option<String>,
    },
    /// Check exporter readiness
    Status,
    /// Show the exporter's published config and resolution
    Config,
    /// Show one tenant's resolution from the exporter
    Tenant { tenant: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file } => {
            let Some(config) = load_or_report(&file) else {
                return Ok(ExitCode::FAILURE);
            };
            let warnings = validate_config(&config);
            for warning in &warnings {
                println!("warning: {}", warning);
            }
            println!("{}", serde_json::to_string_pretty(&ResolutionSummary::of(&config))?);
            println!("{}: ok ({} warnings)", file.display(), warnings.len());
        }
        Commands::Resolve { file, tenant } => {
            let Some(config) = load_or_report(&file) else {
                return Ok(ExitCode::FAILURE);
            };
            let output = match tenant {
                Some(tenant) => match resolve_tenant(&config, &tenant) {
                    Some(resolution) => serde_json::to_value(resolution)?,
                    None => {
                        eprintln!("Error: tenant {tenant:?} not found in {}", file.display());
                        return Ok(ExitCode::FAILURE);
                    }
                },
                None => serde_json::json!({
                    "thresholds": resolve_thresholds(&config),
                    "state_filters": resolve_state_filters(&config),
                }),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Status => {
            let res = reqwest::get(format!("{}/ready", cli.url)).await?;
            let status = res.status();
            println!("{}: {}", status, res.text().await?.trim());
            if !status.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Config => {
            let res = reqwest::get(format!("{}/api/v1/config", cli.url)).await?;
            return print_response(res).await;
        }
        Commands::Tenant { tenant } => {
            let res = reqwest::get(format!("{}/api/v1/tenants/{}", cli.url, tenant)).await?;
            return print_response(res).await;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_or_report(file: &Path) -> Option<ThresholdConfig> {
    match load_config(file) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Error: {}", e);
            None
        }
    }
}

async fn print_response(res: reqwest::Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: exporter returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(ExitCode::FAILURE);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(ExitCode::SUCCESS)
}
