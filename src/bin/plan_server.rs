use anyhow::Context;
use clap::Parser;
use meal_planner::app::server::run_serve;
use meal_planner::utils::{logger, validation::Validate};
use meal_planner::TomlConfig;

#[derive(Parser)]
#[command(name = "plan-server")]
#[command(about = "HTTP service generating 30-day senior meal plans")]
struct Args {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the bind address from config
    #[arg(long)]
    bind: Option<String>,

    /// Override the port from config
    #[arg(short, long)]
    port: Option<u16>,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path))?,
        None => TomlConfig::default(),
    };

    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let log_level = if args.verbose {
        Some("debug")
    } else {
        config.log_level()
    };
    logger::init_server_logger(log_level);

    config.validate().context("Configuration validation failed")?;

    tracing::info!(
        "Serving plans from '{}' ({} v{})",
        config.data.directory,
        config.planner.name,
        config.planner.version
    );

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    let bind = config.server.bind.clone();
    let port = config.server.port;
    run_serve(config, &bind, port, monitor_enabled).await
}
