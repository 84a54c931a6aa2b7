use anyhow::Context;
use atrium_http::{
    self,
    server::{ConfigOverrides, ServerConfig},
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Atrium HTTP API Server
///
/// Flags override the configuration file when `config --file` is used.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Host address to bind to [default: 127.0.0.1]
    #[arg(short = 'H', long, env = "ATRIUM_HOST")]
    host: Option<String>,

    /// Port to listen on [default: 3000]
    #[arg(short, long, env = "ATRIUM_PORT")]
    port: Option<u16>,

    /// Log level (error, warn, info, debug, trace) [default: info]
    #[arg(short, long)]
    log_level: Option<String>,

    /// JSON file with files and conversations to preload
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server with a specific configuration file
    Config {
        /// Path to the configuration file
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let base = match &cli.command {
        Some(Commands::Config { file }) => ServerConfig::from_file(file)
            .with_context(|| format!("Failed to load configuration from {}", file.display()))?,
        None => ServerConfig::default(),
    };

    let config = base.with_overrides(ConfigOverrides {
        host: cli.host,
        port: cli.port,
        log_level: cli.log_level,
        seed_file: cli.seed,
    });

    atrium_http::start_with_config(config).await
}
