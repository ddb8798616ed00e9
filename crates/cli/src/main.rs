//! steamcheck Command Line Interface
//!
//! Resolves a player reference (profile link, vanity name, or any of the
//! numeric identity encodings) and reports profile, ban and activity data.

mod render;
mod settings;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use steamcheck_identity::to_all_formats;
use steamcheck_profile::ProfileInspector;
use steamcheck_resolution::IdentityResolver;
use steamcheck_sdk::SteamApiClient;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::settings::{AppConfig, LogFormat};

#[derive(Parser)]
#[command(name = "steamcheck")]
#[command(about = "Check a player profile and show bans/info", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./steamcheck.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level override (e.g. warn, info, debug)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a profile and show bans/info
    Check(ProfileArgs),
    /// Resolve a profile reference to its canonical id
    Resolve(ProfileArgs),
    /// Show every encoding of a canonical id (no network access)
    Convert {
        /// Canonical 64-bit id
        steam64: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct ProfileArgs {
    /// Profile link, vanity name, or id (Steam64, STEAM_0:Y:Z, U:1:N)
    profile: String,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    init_logging(&config);

    match cli.command {
        Commands::Check(args) => handle_check(args, &config).await,
        Commands::Resolve(args) => handle_resolve(args, &config).await,
        Commands::Convert { steam64, json } => handle_convert(&steam64, json),
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Pretty => registry.with(fmt_layer.pretty()).init(),
        LogFormat::Compact => registry.with(fmt_layer.compact()).init(),
    }
}

fn api_client(config: &AppConfig) -> Result<SteamApiClient> {
    SteamApiClient::with_timeout(
        &config.api_base_url,
        config.api_key.clone(),
        config.request_timeout,
    )
    .context("failed to build Web API client")
}

async fn handle_check(args: ProfileArgs, config: &AppConfig) -> Result<()> {
    let inspector =
        ProfileInspector::new(api_client(config)?).with_playtime_app_id(config.playtime_app_id);

    info!(profile = %args.profile, "checking profile");
    let report = inspector.inspect(&args.profile).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render::profile_report(&report));
    }
    Ok(())
}

async fn handle_resolve(args: ProfileArgs, config: &AppConfig) -> Result<()> {
    let resolver = IdentityResolver::with_client(api_client(config)?);
    let resolved = resolver.resolve(&args.profile).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        println!("{}", render::resolved_identity(&resolved));
    }
    Ok(())
}

fn handle_convert(steam64: &str, json: bool) -> Result<()> {
    let formats = to_all_formats(steam64)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&formats)?);
    } else {
        println!("{}", render::identity_formats(&formats));
    }
    Ok(())
}
