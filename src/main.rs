//! WS Relay Proxy Command Line Tool
//!
//! This binary is the command-line interface for the WebSocket relay sidecar.

use clap::Parser;
use log::{info, warn};

// Import our library
use ws_relay_proxy::{BridgeServer, APP_NAME, VERSION};
use ws_relay_proxy::common::{init_logger, Result};
use ws_relay_proxy::config::{
    log_config, BridgeConfig, ConfigLoader, ConfigMerger, ConfigValidator,
    DEFAULT_CONFIG_FILE, LISTEN_STR, LOG_LEVEL_STR, UPSTREAM_STR, WS_PATH_STR,
};

use std::path::Path;
use std::sync::Arc;

/// WS Relay Proxy: WebSocket relay sidecar
#[derive(Parser, Debug)]
#[clap(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Listen address
    #[clap(short, long, default_value = LISTEN_STR)]
    listen: String,

    /// Upstream WebSocket endpoint clients are bridged to
    #[clap(short, long, default_value = UPSTREAM_STR)]
    upstream: String,

    /// Inbound request path that accepts WebSocket upgrades
    #[clap(long, default_value = WS_PATH_STR)]
    ws_path: String,

    /// Log level
    #[clap(long, default_value = LOG_LEVEL_STR)]
    log_level: String,

    /// Maximum number of concurrent bridge pairs (unbounded when not set)
    #[clap(long)]
    max_pairs: Option<usize>,

    /// Upstream connect timeout in seconds (no timeout when not set)
    #[clap(long)]
    connect_timeout: Option<u64>,

    /// Idle timeout per pair in seconds (no timeout when not set)
    #[clap(long)]
    idle_timeout: Option<u64>,

    /// Load configuration from environment variables
    #[clap(long)]
    from_env: bool,

    /// Load configuration from a file
    #[clap(long)]
    config_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    init_logger(&args.log_level);

    info!("Starting {} v{}", APP_NAME, VERSION);

    // Create default configuration
    let mut config = BridgeConfig::default();

    // Load the default configuration file if it exists
    if Path::new(DEFAULT_CONFIG_FILE).exists() {
        info!("Loading configuration from {}", DEFAULT_CONFIG_FILE);
        config = config.merge(BridgeConfig::from_file(DEFAULT_CONFIG_FILE)?);
    }

    // Load from configuration file if specified
    if let Some(config_file) = args.config_file.as_deref() {
        if Path::new(config_file).exists() {
            info!("Loading configuration from file: {}", config_file);
            config = config.merge(BridgeConfig::from_file(config_file)?);
        } else {
            warn!("Configuration file not found: {}", config_file);
        }
    }

    // Load from environment variables if specified
    if args.from_env {
        info!("Loading configuration from environment variables");
        config = config.merge(BridgeConfig::from_env()?);
    } else {
        // Load from command line arguments
        info!("Loading configuration from command line arguments");
        let cmd_config = BridgeConfig::from_args(
            &args.listen,
            &args.upstream,
            &args.ws_path,
            &args.log_level,
            args.max_pairs,
            args.connect_timeout,
            args.idle_timeout,
        )?;
        config = config.merge(cmd_config);
    }

    // Validate the final configuration
    config.validate()?;
    for warning in config.check_warnings() {
        warn!("{}", warning);
    }

    log_config(&config);

    // Bind and start the relay
    let server = BridgeServer::bind(Arc::new(config)).await?;

    info!("Relay ready, press Ctrl+C to stop");

    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
