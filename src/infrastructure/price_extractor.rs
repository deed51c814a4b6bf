//! Gold price page scraper
//!
//! Fetches the quote page, flattens it to text and looks for the buy and sell
//! phrases, e.g. `alış fiyatı 4.500,00 TL`. The page has no structured data,
//! so any copy or markup change on the site shows up here as an extraction
//! failure rather than a crash.

use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::html::flatten_text;
use super::rate_provider::RateProvider;
use crate::config::{RateCfg, SourceCfg};
use crate::domain::{normalize, Observation, RateSource};
use crate::shared::errors::AppError;
use crate::shared::utils::parse_locale_decimal;

const PRICE_PATTERN: &str = r"(\d{1,3}(?:[.,]\d{3})*(?:[.,]\d{2})?)";

/// Buy and sell prices in the page's own currency
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativePrices {
    pub buy: f64,
    pub sell: f64,
}

/// Compiled buy/sell patterns
#[derive(Debug, Clone)]
pub struct PricePatterns {
    buy: Regex,
    sell: Regex,
}

impl PricePatterns {
    pub fn new(buy_label: &str, sell_label: &str, currency_suffix: &str) -> Result<Self, AppError> {
        Ok(Self {
            buy: Self::compile(buy_label, currency_suffix)?,
            sell: Self::compile(sell_label, currency_suffix)?,
        })
    }

    pub fn from_config(cfg: &SourceCfg) -> Result<Self, AppError> {
        Self::new(&cfg.buy_label, &cfg.sell_label, &cfg.currency_suffix)
    }

    fn compile(label: &str, suffix: &str) -> Result<Regex, AppError> {
        let label = label
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");
        let pattern = format!(r"(?i){}\s+{}\s*{}", label, PRICE_PATTERN, regex::escape(suffix.trim()));
        Regex::new(&pattern).map_err(|e| AppError::ConfigError(format!("invalid price pattern: {}", e)))
    }

    /// Find both prices in flattened page text
    pub fn extract(&self, text: &str) -> Result<NativePrices, AppError> {
        let buy = Self::capture(&self.buy, text);
        let sell = Self::capture(&self.sell, text);

        match (buy, sell) {
            (Some(buy), Some(sell)) => Ok(NativePrices { buy, sell }),
            (buy, sell) => {
                let missing: Vec<&str> = [("buy", buy.is_none()), ("sell", sell.is_none())]
                    .into_iter()
                    .filter_map(|(name, absent)| absent.then_some(name))
                    .collect();
                Err(AppError::ExtractionError(format!(
                    "Could not extract gold prices from website (missing: {})",
                    missing.join(", ")
                )))
            }
        }
    }

    fn capture(pattern: &Regex, text: &str) -> Option<f64> {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_locale_decimal(m.as_str()))
    }
}

/// Scrapes the configured page and produces one [`Observation`]
pub struct PriceExtractor {
    http_client: Client,
    source: SourceCfg,
    patterns: PricePatterns,
    rate_provider: Box<dyn RateProvider>,
    base_currency: String,
    quote_currency: String,
    strict_rate: bool,
}

impl PriceExtractor {
    pub fn new(source: SourceCfg, rate: &RateCfg, rate_provider: Box<dyn RateProvider>) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(source.timeout_secs))
            .user_agent(source.user_agent.clone())
            .build()?;
        let patterns = PricePatterns::from_config(&source)?;

        Ok(Self {
            http_client,
            source,
            patterns,
            rate_provider,
            base_currency: rate.base.clone(),
            quote_currency: rate.symbol.clone(),
            strict_rate: rate.strict.unwrap_or(false),
        })
    }

    /// Run fetch, extraction and conversion. Failures come back as an
    /// error observation, never as `Err`.
    pub async fn extract(&self) -> Observation {
        let text = match self.fetch_page().await {
            Ok(text) => text,
            Err(e) => {
                warn!("❌ Page fetch failed: {}", e);
                return self.failed(format!("Scraping failed: {}", e));
            }
        };

        let prices = match self.patterns.extract(&text) {
            Ok(prices) => prices,
            Err(AppError::ExtractionError(message)) => {
                warn!("❌ {}", message);
                return self.failed(message);
            }
            Err(e) => return self.failed(e.to_string()),
        };
        info!("🔍 Extracted native prices: buy={} sell={}", prices.buy, prices.sell);

        // Rate is quote-per-base, e.g. TRY per EUR
        let rate = self.rate_provider.get_rate(&self.base_currency, &self.quote_currency).await;
        if self.strict_rate {
            if let RateSource::Fallback { reason } = &rate.source {
                return self.failed(format!("Exchange rate unavailable: {}", reason));
            }
        }

        normalize(prices.buy, prices.sell, &rate, &self.source.url, &self.source.scraped_from)
    }

    async fn fetch_page(&self) -> Result<String, AppError> {
        info!("🔍 Fetching gold prices from: {}", self.source.url);

        let response = self.http_client.get(&self.source.url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::NetworkError(format!(
                "page request failed with status: {}",
                response.status()
            )));
        }

        let html = response.text().await?;
        debug!("Fetched {} bytes of page content", html.len());
        Ok(flatten_text(&html))
    }

    fn failed(&self, message: String) -> Observation {
        Observation::failed(&self.source.url, &self.source.scraped_from, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_patterns() -> PricePatterns {
        PricePatterns::from_config(&SourceCfg::default()).unwrap()
    }

    #[test]
    fn test_extracts_both_prices() {
        let text = "Çeyrek altın alış fiyatı 4.500,00 TL ve satış fiyatı 4.550,00 TL olarak açıklandı.";
        let prices = default_patterns().extract(text).unwrap();
        assert_eq!(prices, NativePrices { buy: 4500.0, sell: 4550.0 });
    }

    #[test]
    fn test_is_case_insensitive_and_tolerates_spacing() {
        let text = "Alış   Fiyatı 999,99 tl Satış Fiyatı\n1.001,50TL";
        let prices = default_patterns().extract(text).unwrap();
        assert_eq!(prices.buy, 999.99);
        assert_eq!(prices.sell, 1001.5);
    }

    #[test]
    fn test_reports_missing_fields() {
        let patterns = default_patterns();

        let err = patterns.extract("nothing to see here").unwrap_err();
        assert!(matches!(err, AppError::ExtractionError(_)));
        assert!(err.to_string().contains("missing: buy, sell"));

        let err = patterns.extract("alış fiyatı 4.500,00 TL").unwrap_err();
        assert!(err.to_string().contains("missing: sell"));
    }

    #[test]
    fn test_custom_labels_are_escaped() {
        let patterns = PricePatterns::new("buy (spot)", "sell (spot)", "EUR").unwrap();
        let prices = patterns.extract("buy (spot) 1.234,56 EUR / sell (spot) 1.240,00 EUR").unwrap();
        assert_eq!(prices.buy, 1234.56);
        assert_eq!(prices.sell, 1240.0);
    }
}
