//! tree-router
//!
//! An HTTP server whose routes are resolved by a per-method segment trie.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum fallback ──▶ filter chain ──▶ TreeRouter ──▶ handler
//!                      (request ID,      (access log,      (static >      or
//!                       timeout,          metrics,          param >       404
//!                       body limit)       user filters)     wildcard)
//!
//!     config file ──▶ ConfigWatcher ──▶ HttpServer::reload (atomic swap)
//!     SIGINT/SIGTERM ──▶ Shutdown ──▶ graceful drain
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use tree_router::config::{load_config, ConfigWatcher, ServerConfig};
use tree_router::observability::{logging::init_logging, metrics::init_metrics};
use tree_router::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "tree-router")]
#[command(about = "HTTP server routing requests through a segment trie", long_about = None)]
struct Cli {
    /// Path to the TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload routes when the config file changes.
    #[arg(short, long, requires = "config")]
    watch: bool,

    /// Validate the config and print the route table, then exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    init_logging(&config.observability)?;
    tracing::info!(
        name = %config.name,
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let server = HttpServer::from_config(config.clone())?;

    if cli.check {
        for (method, pattern) in server.router().routes() {
            println!("{method:<7} {pattern}");
        }
        return Ok(());
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    // The watcher handle must outlive the server.
    let (_watcher, config_updates) = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, rx) = ConfigWatcher::new(path);
            (Some(watcher.run()?), rx)
        }
        _ => {
            let (_tx, rx) = mpsc::unbounded_channel();
            (None, rx)
        }
    };

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
