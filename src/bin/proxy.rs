//! TierKV Proxy Binary
//!
//! Starts the caching proxy in front of a backend.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tierkv::network::{Server, TcpConnector};
use tierkv::tasks::spawn_sweeper;
use tierkv::{CachingProxy, Config};
use tracing_subscriber::{fmt, EnvFilter};

/// TierKV Caching Proxy
#[derive(Parser, Debug)]
#[command(name = "tierkv-proxy")]
#[command(about = "Write-through caching proxy for a TierKV backend")]
#[command(version)]
struct Args {
    /// Host to bind
    #[arg(long, default_value = "127.0.0.1")]
    listen_host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8888")]
    port: u16,

    /// Backend host
    #[arg(long, default_value = "localhost")]
    backend_host: String,

    /// Backend port
    #[arg(long, default_value = "7777")]
    backend_port: u16,

    /// Seconds a cached value may be served without asking the backend
    #[arg(long, default_value = "60.0")]
    max_cache_age: f64,

    /// Seconds between stale-entry sweeps (0 = never sweep)
    #[arg(long, default_value = "60")]
    sweep_interval: u64,

    /// Backend connect/read/write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    backend_timeout_ms: u64,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Longest accepted command line in bytes
    #[arg(long, default_value = "65536")]
    max_command_len: usize,
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

    let max_cache_age = match Duration::try_from_secs_f64(args.max_cache_age) {
        Ok(age) => age,
        Err(e) => {
            tracing::error!("Invalid --max-cache-age {}: {}", args.max_cache_age, e);
            std::process::exit(1);
        }
    };
    let sweep_interval = (args.sweep_interval > 0).then(|| Duration::from_secs(args.sweep_interval));

    tracing::info!("TierKV Proxy v{}", tierkv::VERSION);

    // Build config from args
    let config = Config::builder()
        .listen_host(&args.listen_host)
        .proxy_port(args.port)
        .backend_host(&args.backend_host)
        .backend_port(args.backend_port)
        .backend_timeout_ms(args.backend_timeout_ms)
        .max_connections(args.max_connections)
        .max_command_len(args.max_command_len)
        .max_cache_age(max_cache_age)
        .cache_sweep_interval(sweep_interval)
        .build();

    tracing::info!("Backend address: {}", config.backend_addr());
    tracing::info!("Max cache age: {:?}", config.max_cache_age);

    let proxy = Arc::new(CachingProxy::new(
        TcpConnector::from_config(&config),
        config.max_cache_age,
    ));

    let _sweeper = match config.cache_sweep_interval {
        Some(interval) => {
            let stats_source = Arc::clone(&proxy);
            let sweeper = spawn_sweeper(
                Arc::clone(proxy.cache()),
                config.max_cache_age,
                interval,
                move |_| {
                    let stats = stats_source.stats();
                    tracing::info!(
                        hits = stats.hits,
                        misses = stats.misses,
                        forwarded = stats.forwarded,
                        backend_failures = stats.backend_failures,
                        cached = stats_source.cache().len(),
                        "proxy stats"
                    );
                },
            );
            match sweeper {
                Ok(handle) => Some(handle),
                Err(e) => {
                    tracing::error!("Failed to start cache sweeper: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => None,
    };

    let server = match Server::bind(&config.proxy_listen_addr(), proxy, config.clone()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start proxy: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Proxy stopped");
}
