//! System launcher daemon
//!
//! Loads configuration, initializes the core and serves JSON-RPC over HTTP
//! until interrupted.

use anyhow::Result;
use clap::Parser;
use launcher_core::models::LauncherConfig;
use launcher_core::storage::{init_config_dir, init_data_dir, ConfigStorage};
use launcher_server::LauncherServer;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "launcherd")]
#[command(about = "System launcher daemon - JSON-RPC over HTTP", long_about = None)]
struct Args {
    /// Path to a JSON config file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level
    #[arg(short, long)]
    log_level: Option<String>,

    /// Base directory for the local and git file systems
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<LauncherConfig> {
    let storage = match &args.config {
        Some(path) => ConfigStorage::at_path(path.clone()),
        None => ConfigStorage::new(init_config_dir()?),
    };
    let mut config = storage.load()?;

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.rpc_port = port;
    }
    if let Some(log_level) = &args.log_level {
        config.server.log_level = log_level.clone();
    }
    if let Some(data_dir) = &args.data_dir {
        config = config.with_data_dir(data_dir);
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let log_dir = match &args.data_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            dir.clone()
        }
        None => init_data_dir()?,
    };
    let log_file_path = log_dir.join("launcherd.log");

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    use tracing_subscriber::fmt::writer::MakeWriterExt;
    let stdout_writer = std::io::stdout.with_max_level(tracing::Level::INFO);
    let file_writer = log_file.with_max_level(tracing::Level::DEBUG);

    tracing_subscriber::fmt()
        .with_writer(stdout_writer.and(file_writer))
        .with_env_filter(config.server.log_level.as_str())
        .with_ansi(false)
        .init();

    tracing::info!("System launcher daemon starting...");
    tracing::info!("Binding {}:{}", config.server.host, config.server.rpc_port);
    tracing::info!("Log file: {}", log_file_path.display());

    let server = LauncherServer::new(config);
    let addr = server.start().await?;
    tracing::info!("Daemon ready and listening on http://{}", addr);

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    server.stop().await;

    Ok(())
}
