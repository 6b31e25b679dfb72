use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use trade_template::kv::{content_hash, parse_kv, KeyValueConfig};
use trade_template::settings::active::unrecognized_keys;
use trade_template::settings::{validate, ActiveConfig, ValidationBounds};

#[derive(Parser)]
#[command(name = "config-cli")]
#[command(about = "Management CLI for the trade template config pipeline", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    #[arg(short, long, default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show reconciler state and the last tick outcome
    Status,
    /// Show the active configuration and bounds
    Config,
    /// Validate a key=value config file against the default settings
    Check { file: PathBuf },
    /// Print the content hash of a key=value config file
    Hash { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status => query(&cli.url, &cli.key, "/admin/status").await?,
        Commands::Config => query(&cli.url, &cli.key, "/admin/config").await?,
        Commands::Check { file } => return check(&file),
        Commands::Hash { file } => {
            let kv = read_kv(&file)?;
            println!("{}", content_hash(&kv));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn read_kv(path: &Path) -> Result<KeyValueConfig, std::io::Error> {
    Ok(parse_kv(&std::fs::read_to_string(path)?))
}

fn check(path: &Path) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let kv = read_kv(path)?;
    let active = ActiveConfig::default();
    let bounds = ValidationBounds::default();

    match validate(&kv, &active, &bounds) {
        Ok(()) => {
            let applied = active.applied_from(&kv);
            println!("OK {} ({} keys)", content_hash(&kv), kv.len());
            let ignored = unrecognized_keys(&kv);
            if !ignored.is_empty() {
                eprintln!("Ignored keys: {}", ignored.join(", "));
            }
            println!("{}", serde_json::to_string_pretty(&applied)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(report) => {
            eprintln!("Rejected: {}", report.cause);
            for violation in &report.violations {
                eprintln!("  - {}", violation);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn query(url: &str, key: &str, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if !key.is_empty() {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key))?,
        );
    }

    let res = client
        .get(format!("{}{}", url.trim_end_matches('/'), path))
        .headers(headers)
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
