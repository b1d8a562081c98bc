mod command;
mod render;
mod repl;
mod trigger;

use anyhow::Result;
use clap::Parser;
use launcher_client::{connect_with_retry, ClientApi, ClientConfig, RetryPolicy, RpcClient};
use repl::Repl;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

fn setup_logging() -> Result<()> {
    let mut log_path = std::env::temp_dir();
    log_path.push("launcher-cli.log");

    let log_file = std::fs::File::create(log_path)?;
    let subscriber = tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter("launcher=debug,launcher_client=debug")
        .json()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "launcher")]
#[command(about = "System launcher REPL client", long_about = None)]
struct Args {
    #[arg(long, default_value = "localhost")]
    host: String,

    #[arg(short, long, default_value_t = 8081)]
    port: u16,

    /// Per-request timeout
    #[arg(long, default_value_t = 30_000)]
    timeout_ms: u64,

    #[arg(long, default_value_t = 10)]
    max_retries: u32,

    #[arg(long, default_value_t = 2_000)]
    retry_delay_ms: u64,
}

async fn run(args: Args) -> Result<i32> {
    let config = ClientConfig {
        host: args.host,
        port: args.port,
        timeout_ms: args.timeout_ms,
    };
    let policy = RetryPolicy {
        max_retries: args.max_retries,
        retry_delay: Duration::from_millis(args.retry_delay_ms),
    };

    let client = Arc::new(RpcClient::new(&config)?);
    println!("Connecting to {}...", client.endpoint());

    if let Err(e) = connect_with_retry(&client, &policy).await {
        error!("Connection failed: {}", e);
        println!("✗ {}", e);
        return Ok(1);
    }
    info!("Connected to {}", client.endpoint());
    println!("✓ Connected to {}", client.endpoint());

    let api = ClientApi::new(client);
    match api.system_status().await {
        Ok(status) => println!("\n{}\n", render::system_status(&status)),
        Err(e) => println!("{}", render::error(&e)),
    }

    Repl::new(api).run().await?;
    Ok(0)
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;
    let args = Args::parse();

    let code = run(args).await?;
    // Stdin is read on a blocking thread that the runtime would otherwise wait on.
    std::process::exit(code);
}
