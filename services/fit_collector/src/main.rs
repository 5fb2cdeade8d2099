//! Fit collector binary
//!
//! Usage:
//!   fit-collector listen --socket /tmp/drawstream/fit.sock --output run.fit
//!   fit-collector dump run.fit

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use drawstream_config::{load_config, DrawstreamConfig};
use fit_collector::{dump_file, FitCollector};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fit-collector")]
#[command(about = "Collects framed writer output into fit files")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Listen for writers and append their frames to a fit file
    Listen {
        /// Socket path, overrides socket.path
        #[arg(short, long)]
        socket: Option<PathBuf>,

        /// Fit file, overrides collector.output
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print every message of a fit file as one JSON object per line
    Dump {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Listen {
            socket,
            output,
            config,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(socket) = socket {
                config.socket.path = socket;
            }
            if let Some(output) = output {
                config.collector.output = output;
            }

            let level = args.log_level.as_deref().unwrap_or(&config.collector.log_level);
            init_logging(level);
            listen(config).await
        }
        Command::Dump { file } => {
            init_logging(args.log_level.as_deref().unwrap_or("warn"));
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            let count = dump_file(&file, &mut out).with_context(|| format!("Failed to dump {:?}", file))?;
            out.flush()?;
            debug!("Dumped {} messages", count);
            Ok(())
        }
    }
}

async fn listen(config: DrawstreamConfig) -> Result<()> {
    info!("Starting fit collector");
    debug!("Effective configuration:\n{}", config.to_toml()?);

    let collector = FitCollector::bind(config.socket.to_socket_config(), &config.collector.output)
        .await
        .map_err(|e| {
            error!("Failed to start collector: {}", e);
            e
        })?;

    let summary = collector.run_until(shutdown_signal()).await?;
    info!(
        connections = summary.connections,
        frames = summary.frames.total(),
        "Fit collector stopped"
    );
    Ok(())
}

fn init_logging(level: &str) {
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    let log_level = match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
