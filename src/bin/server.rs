//! TierKV Backend Server Binary
//!
//! Starts the authoritative key-value backend.

use std::sync::Arc;

use clap::Parser;
use tierkv::network::Server;
use tierkv::{BackendHandler, Config};
use tracing_subscriber::{fmt, EnvFilter};

/// TierKV Backend
#[derive(Parser, Debug)]
#[command(name = "tierkv-server")]
#[command(about = "In-memory key-value backend speaking the TierKV line protocol")]
#[command(version)]
struct Args {
    /// Host to bind
    #[arg(long, default_value = "127.0.0.1")]
    listen_host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "7777")]
    port: u16,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Longest accepted command line in bytes
    #[arg(long, default_value = "65536")]
    max_command_len: usize,

    /// Client read timeout in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    read_timeout_ms: u64,

    /// Client write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tierkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("TierKV Backend v{}", tierkv::VERSION);

    // Build config from args
    let config = Config::builder()
        .listen_host(&args.listen_host)
        .backend_port(args.port)
        .max_connections(args.max_connections)
        .max_command_len(args.max_command_len)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    let handler = Arc::new(BackendHandler::new());

    let server = match Server::bind(&config.backend_listen_addr(), handler, config.clone()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start backend: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
