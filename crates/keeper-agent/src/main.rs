use clap::Parser;
use keeper_agent::{client::OllamaClient, config::KeeperConfig, reconcile::Reconciler};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "keeper-agent",
    version,
    about = "Keeps one model resident in a local model-serving daemon"
)]
struct Cli {
    /// Model to keep loaded, e.g. llama3:8b
    #[arg(long)]
    model: String,

    /// Daemon base URL, e.g. http://127.0.0.1:11434
    #[arg(long, default_value = "http://127.0.0.1:11434")]
    daemon_url: String,

    /// Seconds between reconcile cycles.
    #[arg(long, default_value_t = 5)]
    cycle_interval_seconds: u64,

    /// Seconds between probes while other models are resident.
    #[arg(long, default_value_t = 60)]
    monitor_interval_seconds: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Keep the keeper itself at info but quiet the HTTP client internals
    // unless RUST_LOG says otherwise.
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn,hyper_util=warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = KeeperConfig {
        target_model: cli.model,
        daemon_url: cli.daemon_url,
        cycle_interval_seconds: cli.cycle_interval_seconds,
        monitor_interval_seconds: cli.monitor_interval_seconds,
    };

    info!(
        "starting keeper for '{}' against {}",
        config.target_model, config.daemon_url
    );

    let client = OllamaClient::new(&config.daemon_url);
    let reconciler = Reconciler::new(config, client);

    // The reconciler is one cooperative task; dropping its future at any
    // suspension point is a clean stop. The daemon's own model lifecycle is
    // unaffected by our exit.
    tokio::select! {
        _ = reconciler.run() => {}
        _ = signal::ctrl_c() => info!("shutdown requested"),
    }

    Ok(())
}
