//! Observation - the single record produced by one collection run

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the conversion rate came from
#[derive(Debug, Clone, PartialEq)]
pub enum RateSource {
    /// Live value returned by the quote API
    Live,
    /// Value given on the command line
    Fixed,
    /// Configured constant used because the lookup failed
    Fallback { reason: String },
}

impl RateSource {
    pub fn label(&self) -> &'static str {
        match self {
            RateSource::Live => "live",
            RateSource::Fixed => "fixed",
            RateSource::Fallback { .. } => "fallback",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RateSource::Fallback { .. })
    }
}

/// Exchange rate, always positive and finite
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ExchangeRate(f64);

impl ExchangeRate {
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && value > 0.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ExchangeRate {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        ExchangeRate::new(value).ok_or_else(|| format!("exchange rate must be positive and finite, got {}", value))
    }
}

impl From<ExchangeRate> for f64 {
    fn from(rate: ExchangeRate) -> Self {
        rate.0
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rate plus its provenance, as returned by a rate provider
#[derive(Debug, Clone, PartialEq)]
pub struct RateQuote {
    pub rate: ExchangeRate,
    pub source: RateSource,
}

impl RateQuote {
    pub fn live(rate: ExchangeRate) -> Self {
        Self { rate, source: RateSource::Live }
    }

    pub fn fallback(rate: ExchangeRate, reason: impl Into<String>) -> Self {
        Self {
            rate,
            source: RateSource::Fallback { reason: reason.into() },
        }
    }
}

/// Successfully extracted and converted prices
#[derive(Debug, Clone, PartialEq)]
pub struct GoldQuote {
    pub native_buy: f64,
    pub native_sell: f64,
    pub converted_buy: f64,
    pub converted_sell: f64,
    pub rate: ExchangeRate,
    pub rate_source: RateSource,
}

/// Result of one collection attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Quoted(GoldQuote),
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationStatus {
    Ok,
    Error,
}

/// Immutable record of one run
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    captured_at: DateTime<Local>,
    source_url: String,
    scraped_from: String,
    outcome: Outcome,
}

impl Observation {
    pub fn quoted(
        captured_at: DateTime<Local>,
        source_url: impl Into<String>,
        scraped_from: impl Into<String>,
        quote: GoldQuote,
    ) -> Self {
        Self {
            captured_at,
            source_url: source_url.into(),
            scraped_from: scraped_from.into(),
            outcome: Outcome::Quoted(quote),
        }
    }

    pub fn failed(source_url: impl Into<String>, scraped_from: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            captured_at: Local::now(),
            source_url: source_url.into(),
            scraped_from: scraped_from.into(),
            outcome: Outcome::Failed { message: message.into() },
        }
    }

    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn scraped_from(&self) -> &str {
        &self.scraped_from
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn status(&self) -> ObservationStatus {
        match self.outcome {
            Outcome::Quoted(_) => ObservationStatus::Ok,
            Outcome::Failed { .. } => ObservationStatus::Error,
        }
    }

    pub fn quote(&self) -> Option<&GoldQuote> {
        match &self.outcome {
            Outcome::Quoted(quote) => Some(quote),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Quoted(_) => None,
            Outcome::Failed { message } => Some(message),
        }
    }

    /// Storage document; field names follow the existing table/file contract
    pub fn to_document(&self) -> ObservationDocument {
        let timestamp = self.captured_at.to_rfc3339();
        match &self.outcome {
            Outcome::Quoted(quote) => ObservationDocument::Quoted {
                status: ObservationStatus::Ok,
                timestamp,
                date: self.captured_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                buy_price_tl: quote.native_buy,
                sell_price_tl: quote.native_sell,
                buy_price_eur: quote.converted_buy,
                sell_price_eur: quote.converted_sell,
                eur_tl_rate: quote.rate.value(),
                rate_source: quote.rate_source.label().to_string(),
                source: self.source_url.clone(),
                scraped_from: self.scraped_from.clone(),
            },
            Outcome::Failed { message } => ObservationDocument::Failed {
                status: ObservationStatus::Error,
                error: message.clone(),
                timestamp,
                source: self.source_url.clone(),
            },
        }
    }
}

/// Serialized form of an [`Observation`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservationDocument {
    Quoted {
        status: ObservationStatus,
        timestamp: String,
        date: String,
        buy_price_tl: f64,
        sell_price_tl: f64,
        buy_price_eur: f64,
        sell_price_eur: f64,
        eur_tl_rate: f64,
        rate_source: String,
        source: String,
        scraped_from: String,
    },
    Failed {
        status: ObservationStatus,
        error: String,
        timestamp: String,
        source: String,
    },
}
