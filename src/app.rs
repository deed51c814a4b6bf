// src/app.rs
use chrono::Local;
use clap::ValueEnum;
use tracing::{error, info};

use crate::application::Pipeline;
use crate::config::{Config, SupabaseConfig};
use crate::domain::{ExchangeRate, Observation};
use crate::infrastructure::{
    FileSink, FrankfurterRateProvider, PriceExtractor, RateProvider, RemoteSink, SaveReceipt, StaticRateProvider,
};
use crate::report;
use crate::shared::errors::AppError;

/// Storage backend selected for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkKind {
    /// Pending JSON documents under the data directory
    File,
    /// Supabase `gold_prices` table
    Remote,
}

impl SinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::File => "file",
            SinkKind::Remote => "remote",
        }
    }

    /// Rate policy when `rate.strict` is unset. The table has no column for
    /// the rate's provenance, so remote rows never carry a fallback rate.
    pub fn strict_rate_by_default(&self) -> bool {
        matches!(self, SinkKind::Remote)
    }
}

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub config: Config,
    pub sink: SinkKind,
    pub supabase: SupabaseConfig,
    /// Skip the rate lookup and convert with this value
    pub fixed_rate: Option<ExchangeRate>,
}

impl AppCfg {
    pub fn new(config: Config, sink: SinkKind, supabase: SupabaseConfig) -> Self {
        Self {
            config,
            sink,
            supabase,
            fixed_rate: None,
        }
    }
}

/// Successful run: what was observed and where it went
#[derive(Debug)]
pub struct RunReport {
    pub observation: Observation,
    pub receipt: SaveReceipt,
}

pub async fn run(app_cfg: AppCfg) -> Result<RunReport, AppError> {
    info!("🔍 Gold price collector starting ({} sink)", app_cfg.sink.as_str());
    info!("⏰ Current time: {}", Local::now().to_rfc3339());
    info!("{}", "=".repeat(50));

    match app_cfg.sink {
        SinkKind::File => run_file(&app_cfg).await,
        SinkKind::Remote => run_remote(&app_cfg).await,
    }
}

fn build_extractor(app_cfg: &AppCfg) -> Result<PriceExtractor, AppError> {
    let cfg = &app_cfg.config;
    let rate_provider: Box<dyn RateProvider> = match app_cfg.fixed_rate {
        Some(rate) => {
            info!("💱 Using fixed {}/{} rate: {}", cfg.rate.base, cfg.rate.symbol, rate);
            Box::new(StaticRateProvider::new(rate))
        }
        None => Box::new(FrankfurterRateProvider::new(&cfg.rate)?),
    };

    let mut rate_cfg = cfg.rate.clone();
    rate_cfg.strict = Some(rate_cfg.strict.unwrap_or(app_cfg.sink.strict_rate_by_default()));

    PriceExtractor::new(cfg.source.clone(), &rate_cfg, rate_provider)
}

async fn run_file(app_cfg: &AppCfg) -> Result<RunReport, AppError> {
    let storage = &app_cfg.config.storage;
    let sink = FileSink::new(storage.data_dir.clone(), storage.summary_limit);
    let pipeline = Pipeline::new(build_extractor(app_cfg)?, sink);

    let run = pipeline.run_once().await;
    let receipt = run.saved?;

    // The error document is kept for later inspection, but the run still failed
    if let Some(message) = run.observation.error_message() {
        error!("❌ Cloud scraping failed, error document recorded");
        return Err(AppError::ExtractionError(message.to_string()));
    }

    info!("🚀 Cloud scraping completed successfully!");
    Ok(RunReport {
        observation: run.observation,
        receipt,
    })
}

async fn run_remote(app_cfg: &AppCfg) -> Result<RunReport, AppError> {
    if let Err(missing) = app_cfg.supabase.credentials() {
        error!("❌ Supabase configuration missing: {}", missing.join(", "));
        return Err(AppError::ConfigError(format!("missing {}", missing.join(", "))));
    }
    info!("✅ Supabase configuration found");

    let sink = RemoteSink::new(app_cfg.supabase.clone(), &app_cfg.config.remote)?;
    let pipeline = Pipeline::new(build_extractor(app_cfg)?, sink);

    let run = pipeline.run_once().await;
    let receipt = run.saved?;

    if let SaveReceipt::Remote { id, created_at } = &receipt {
        if let Some(id) = id {
            info!("📊 Record ID: {}", id);
        }
        if let Some(created_at) = created_at {
            info!("⏰ Timestamp: {}", created_at);
        }
    }
    info!("✅ Cloud scraping completed successfully!");

    let limit = app_cfg.config.remote.recent_limit;
    if limit > 0 {
        let recent = pipeline.sink().fetch_recent(limit).await;
        report::print_recent(&recent, limit);
    }

    Ok(RunReport {
        observation: run.observation,
        receipt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_remote_run_without_credentials_fails_fast() {
        let app_cfg = AppCfg::new(Config::default(), SinkKind::Remote, SupabaseConfig::default());
        let err = run(app_cfg).await.unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("SUPABASE_SERVICE_KEY"));
    }

    #[test]
    fn test_sink_kind_names() {
        assert_eq!(SinkKind::File.as_str(), "file");
        assert_eq!(SinkKind::Remote.as_str(), "remote");
    }

    #[test]
    fn test_only_remote_sink_is_strict_by_default() {
        assert!(SinkKind::Remote.strict_rate_by_default());
        assert!(!SinkKind::File.strict_rate_by_default());
    }
}
