use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use goldfeed::config::{Config, SupabaseConfig};
use goldfeed::domain::ExchangeRate;
use goldfeed::{AppCfg, SinkKind};

#[derive(Parser, Debug)]
#[command(version, about = "Scrape the quarter gold price, convert it and store the observation")]
struct Args {
    /// Where to store the observation
    #[arg(long, value_enum, default_value_t = SinkKind::File)]
    sink: SinkKind,

    /// Path to config file (optional)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory for pending JSON documents (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Price page URL (overrides config)
    #[arg(long)]
    source_url: Option<String>,

    /// Fail the observation instead of converting with the fallback rate (the remote sink does this by default)
    #[arg(long)]
    strict_rate: bool,

    /// Convert with this rate instead of querying the rate API
    #[arg(long)]
    fixed_rate: Option<f64>,

    /// Number of recent rows to show after a remote save (overrides config)
    #[arg(long)]
    recent: Option<usize>,
}

fn build_app_cfg(args: Args) -> Result<AppCfg> {
    // Priority: CLI args > Config file > Defaults
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(data_dir) = args.data_dir {
        config.storage.data_dir = data_dir;
    }
    if let Some(source_url) = args.source_url {
        config.source.url = source_url;
    }
    if args.strict_rate {
        config.rate.strict = Some(true);
    }
    if let Some(recent) = args.recent {
        config.remote.recent_limit = recent;
    }
    config.validate()?;

    let mut app_cfg = AppCfg::new(config, args.sink, SupabaseConfig::from_env());
    if let Some(rate) = args.fixed_rate {
        let rate = ExchangeRate::new(rate).ok_or_else(|| anyhow!("--fixed-rate must be positive, got {}", rate))?;
        app_cfg.fixed_rate = Some(rate);
    }
    Ok(app_cfg)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let app_cfg = match build_app_cfg(args) {
        Ok(app_cfg) => app_cfg,
        Err(e) => {
            error!("❌ Invalid configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match goldfeed::run(app_cfg).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ Cloud scraping failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
