use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod token;

use commands::{
    AuthCommand, ConfigCommand, FirebaseCommand, SignalementsCommand, SyncCommand, UsersCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "sigsync")]
#[command(version)]
#[command(
    about = "Import road-defect signalements from Firestore into the admin API",
    long_about = None
)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, register or manage the stored session
    Auth(AuthCommand),

    /// Manage API user accounts
    Users(UsersCommand),

    /// Manage signalements in the API
    Signalements(SignalementsCommand),

    /// Inspect Firestore data
    Firebase(FirebaseCommand),

    /// Import Firestore signalements into the API
    Sync(SyncCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config)?;
    tracing::debug!(
        api_url = %config.api_url.value,
        data_dir = %config.data_dir.value.display(),
        "Loaded configuration"
    );

    match &cli.command {
        Some(Commands::Auth(cmd)) => cmd.run(&config)?,
        Some(Commands::Users(cmd)) => cmd.run(&config)?,
        Some(Commands::Signalements(cmd)) => cmd.run(&config)?,
        Some(Commands::Firebase(cmd)) => cmd.run(&config)?,
        Some(Commands::Sync(cmd)) => cmd.run(&config)?,
        Some(Commands::Config(cmd)) => cmd.run(&config)?,
        None => println!("Use --help to see available commands"),
    }

    Ok(())
}

/// Logs go to stderr so command output stays pipeable. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "sigsync=warn,sigsync_core=warn",
        1 => "sigsync=info,sigsync_core=info",
        _ => "sigsync=debug,sigsync_core=debug",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
