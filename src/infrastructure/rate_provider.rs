use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::RateCfg;
use crate::domain::{ExchangeRate, RateQuote, RateSource};
use crate::shared::errors::AppError;

/// Source of currency conversion rates
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Units of `quote` per one `base`. Never fails: lookup problems are
    /// reported through [`crate::domain::RateSource::Fallback`].
    async fn get_rate(&self, base: &str, quote: &str) -> RateQuote;
}

/// Response body of the Frankfurter `latest` endpoint
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: HashMap<String, f64>,
}

/// Frankfurter API client with a configured fallback rate
pub struct FrankfurterRateProvider {
    http_client: Client,
    endpoint: String,
    fallback: ExchangeRate,
}

impl FrankfurterRateProvider {
    pub fn new(cfg: &RateCfg) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            endpoint: cfg.endpoint.clone(),
            fallback: cfg.fallback,
        })
    }

    async fn fetch_rate(&self, base: &str, quote: &str) -> Result<ExchangeRate, AppError> {
        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[("base", base), ("symbols", quote)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::NetworkError(format!(
                "rate API request failed with status: {}",
                response.status()
            )));
        }

        let body: LatestRatesResponse = response.json().await?;
        let value = body
            .rates
            .get(quote)
            .copied()
            .ok_or_else(|| AppError::NetworkError(format!("rate API response has no {} rate", quote)))?;

        ExchangeRate::new(value)
            .ok_or_else(|| AppError::NetworkError(format!("rate API returned unusable {} rate: {}", quote, value)))
    }
}

#[async_trait]
impl RateProvider for FrankfurterRateProvider {
    async fn get_rate(&self, base: &str, quote: &str) -> RateQuote {
        match self.fetch_rate(base, quote).await {
            Ok(rate) => {
                info!("✅ {}/{} rate: {}", base, quote, rate);
                RateQuote::live(rate)
            }
            Err(e) => {
                warn!("⚠️ Could not fetch {}/{} rate, using fallback {}: {}", base, quote, self.fallback, e);
                RateQuote::fallback(self.fallback, e.to_string())
            }
        }
    }
}

/// Fixed rate, used when no lookup is wanted
pub struct StaticRateProvider {
    rate: ExchangeRate,
}

impl StaticRateProvider {
    pub fn new(rate: ExchangeRate) -> Self {
        Self { rate }
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    async fn get_rate(&self, _base: &str, _quote: &str) -> RateQuote {
        RateQuote {
            rate: self.rate,
            source: RateSource::Fixed,
        }
    }
}
