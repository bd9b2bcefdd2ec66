//! Signal server entry point

use anyhow::Context;
use clap::Parser;
use pulse_market_data::{MarketDataProvider, ThrottledProvider, YahooChartProvider};
use pulse_signal_server::{load_config, ServerConfig, SignalServer};
use pulse_strategies::StrategyRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML, or JSON by extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    bind_address: Option<String>,

    /// Port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Seconds between polling ticks
    #[arg(long)]
    tick_interval_secs: Option<u64>,

    /// Maximum connections
    #[arg(long)]
    max_connections: Option<usize>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Args {
    /// Command line flags win over the config file
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(bind_address) = &self.bind_address {
            config.bind_address = bind_address.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(secs) = self.tick_interval_secs {
            config.scheduler.tick_interval_secs = secs;
        }
        if let Some(max_connections) = self.max_connections {
            config.max_connections = max_connections;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pulse_signal_server=info,warn".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(args.log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!args.log_json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    info!("Starting Pulse Signal Server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => load_config(path)
            .await
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    info!(
        "Configuration loaded: {}:{}, tick every {}s",
        config.bind_address, config.port, config.scheduler.tick_interval_secs
    );

    let yahoo = YahooChartProvider::new(&config.provider)
        .context("Failed to build market data client")?;
    let provider: Arc<dyn MarketDataProvider> = Arc::new(ThrottledProvider::new(
        yahoo,
        config.provider.max_concurrent_requests,
    ));
    let strategies = StrategyRegistry::with_defaults(provider, &config.strategies);
    info!("Registered strategies: {:?}", strategies.names());

    let server = SignalServer::new(config, strategies);

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for CTRL+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    tokio::select! {
        result = server.start() => {
            if let Err(e) = result {
                error!("Signal server error: {}", e);
                return Err(e.into());
            }
        }
        _ = shutdown_signal => {
            info!("👋 Shutting down signal server");
        }
    }

    Ok(())
}
