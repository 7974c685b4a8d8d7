//! Utusan - one-shot proxied transfer client.
//!
//! Performs a single blocking transfer through an HTTP proxy and
//! reports a failed transfer on standard error. Standard output stays
//! silent, and the exit status does not reflect the transfer outcome.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use utusan::config::{Config, Overrides};
use utusan::relay::RelayClient;

#[derive(Parser)]
#[command(name = "utusan")]
#[command(about = "One-shot transfer client - relays a single request through an HTTP proxy")]
#[command(version)]
struct Cli {
    /// Target URL to request (default: coap://[::1]/)
    #[arg(short, long)]
    target: Option<String>,

    /// HTTP proxy to relay through (default: http://0.0.0.0:8000)
    #[arg(short, long)]
    proxy: Option<String>,

    /// Seconds to wait for the proxy connection to establish
    #[arg(long)]
    connect_timeout: Option<u64>,

    /// Seconds to wait on socket reads and writes
    #[arg(long)]
    io_timeout: Option<u64>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let overrides = Overrides {
        target: cli.target,
        proxy: cli.proxy,
        connect_timeout_secs: cli.connect_timeout,
        io_timeout_secs: cli.io_timeout,
    };

    let config = Config::load(&overrides).context("Invalid configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Target: {}", config.target);
    tracing::debug!("Proxy: {}", config.proxy);

    let client = RelayClient::new(config.proxy.clone())
        .with_connect_timeout(config.connect_timeout)
        .with_io_timeout(config.io_timeout);

    // A failed transfer is reported, never escalated: the exit status
    // stays 0 either way.
    if let Err(e) = client.perform(&config.target) {
        eprintln!("transfer failed: {}", e);
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
