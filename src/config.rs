use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

use crate::domain::ExchangeRate;

pub const DEFAULT_SOURCE_URL: &str = "https://bigpara.hurriyet.com.tr/altin/ceyrek-altin-fiyati/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_RATE_ENDPOINT: &str = "https://api.frankfurter.dev/v1/latest";
pub const DEFAULT_FALLBACK_RATE: f64 = 36.50;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceCfg {
    pub url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub buy_label: String,
    pub sell_label: String,
    pub currency_suffix: String,
    pub scraped_from: String,
}

impl Default for SourceCfg {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 15,
            buy_label: "alış fiyatı".to_string(),
            sell_label: "satış fiyatı".to_string(),
            currency_suffix: "TL".to_string(),
            scraped_from: "github_actions".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateCfg {
    pub endpoint: String,
    pub base: String,
    pub symbol: String,
    pub timeout_secs: u64,
    pub fallback: ExchangeRate,
    /// Treat a fallback rate as a failed observation. Unset means the
    /// sink decides: strict for the remote table, lenient for files.
    pub strict: Option<bool>,
}

impl Default for RateCfg {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_RATE_ENDPOINT.to_string(),
            base: "EUR".to_string(),
            symbol: "TRY".to_string(),
            timeout_secs: 10,
            fallback: ExchangeRate::new(DEFAULT_FALLBACK_RATE).expect("fallback constant is positive"),
            strict: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageCfg {
    pub data_dir: PathBuf,
    pub summary_limit: usize,
}

impl Default for StorageCfg {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            summary_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteCfg {
    pub table: String,
    pub timeout_secs: u64,
    pub recent_limit: usize,
}

impl Default for RemoteCfg {
    fn default() -> Self {
        Self {
            table: "gold_prices".to_string(),
            timeout_secs: 15,
            recent_limit: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceCfg,
    pub rate: RateCfg,
    pub storage: StorageCfg,
    pub remote: RemoteCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read {}", path.as_ref().display()))?;
        Self::from_toml(&s)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).context("parse Config.toml")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.timeout_secs == 0 || self.rate.timeout_secs == 0 || self.remote.timeout_secs == 0 {
            bail!("timeouts must be greater than zero");
        }
        if self.source.buy_label.trim().is_empty() || self.source.sell_label.trim().is_empty() {
            bail!("source.buy_label and source.sell_label must not be empty");
        }
        if self.rate.base.trim().is_empty() || self.rate.symbol.trim().is_empty() {
            bail!("rate.base and rate.symbol must not be empty");
        }
        if self.source.url.trim().is_empty() {
            bail!("source.url must not be empty");
        }
        if self.remote.table.trim().is_empty() {
            bail!("remote.table must not be empty");
        }
        Ok(())
    }
}

/// Supabase credentials, read once at startup
#[derive(Debug, Clone, Default)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub service_key: Option<String>,
}

impl SupabaseConfig {
    pub const URL_VAR: &'static str = "SUPABASE_URL";
    pub const KEY_VAR: &'static str = "SUPABASE_SERVICE_KEY";

    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            service_key: Some(service_key.into()),
        }
    }

    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            url: read(Self::URL_VAR),
            service_key: read(Self::KEY_VAR),
        }
    }

    /// Base URL (without trailing slash) and key, or the names of the missing variables
    pub fn credentials(&self) -> std::result::Result<(&str, &str), Vec<&'static str>> {
        match (&self.url, &self.service_key) {
            (Some(url), Some(key)) => Ok((url.trim_end_matches('/'), key.as_str())),
            (url, key) => {
                let mut missing = Vec::new();
                if url.is_none() {
                    missing.push(Self::URL_VAR);
                }
                if key.is_none() {
                    missing.push(Self::KEY_VAR);
                }
                Err(missing)
            }
        }
    }
}
