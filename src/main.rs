//! HD Signing Service CLI
//!
//! Command-line front-end for address lookup and digest signing.

use clap::{Parser, Subcommand};
use hd_sign_server::config::{ADDRESS_ENDPOINT, DEFAULT_CONFIG_PATH, SIGN_ENDPOINT};
use hd_sign_server::service::{Response, SignRequest};
use hd_sign_server::{Config, Error, RequestContext, Result, SeedPhrase, SignerService};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "hd-sign")]
#[command(about = "Derive indexed accounts and sign digests from one seed phrase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the address of an account
    Address {
        /// Account index (0 or greater)
        #[arg(short, long, allow_negative_numbers = true)]
        index: i64,
    },

    /// Sign a 32-byte digest with an account
    Sign {
        /// Account index (1 or greater)
        #[arg(short, long, allow_negative_numbers = true)]
        index: i64,

        /// Digest hash (hex encoded, with or without 0x prefix)
        #[arg(short, long)]
        digest: String,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&PathBuf::from(DEFAULT_CONFIG_PATH))?,
    };

    match cli.command {
        Commands::Config => {
            let view = serde_json::json!({
                "config": config,
                "routes": {
                    "address": config.route(ADDRESS_ENDPOINT),
                    "sign": config.route(SIGN_ENDPOINT),
                }
            });
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(())
        }
        Commands::Address { index } => {
            let service = load_service(&config)?;
            let response =
                run_blocking(move || service.handle_get_address(&cli_context(), index)).await?;
            render(response)
        }
        Commands::Sign { index, digest } => {
            let service = load_service(&config)?;
            let body = serde_json::to_string(&SignRequest {
                index,
                digest_hash: digest,
            })?;
            let response =
                run_blocking(move || service.handle_sign(&cli_context(), &body)).await?;
            render(response)
        }
    }
}

fn load_service(config: &Config) -> Result<SignerService> {
    let seed = SeedPhrase::from_env()?;
    if let Err(e) = seed.validate() {
        tracing::warn!(error = %e, "Seed phrase failed validation; requests will fail");
    }
    Ok(SignerService::from_config(Arc::new(seed), config))
}

/// The CLI acts as a local caller
fn cli_context() -> RequestContext {
    RequestContext::from_ip(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Derivation and signing are CPU-bound; keep them off the async workers.
async fn run_blocking<F>(f: F) -> Result<Response>
where
    F: FnOnce() -> Response + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Signing(format!("worker task failed: {}", e)))
}

fn render(response: Response) -> Result<()> {
    let body = serde_json::to_string_pretty(&response.body)?;
    if response.is_success() {
        println!("{}", body);
        return Ok(());
    }

    eprintln!("{}", body);
    tracing::error!(status = response.status, "Request failed");
    std::process::exit(if response.status < 500 { 2 } else { 1 });
}
