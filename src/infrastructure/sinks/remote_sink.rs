//! Supabase (PostgREST) table sink

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use super::{ObservationSink, SaveReceipt};
use crate::config::{RemoteCfg, SupabaseConfig};
use crate::domain::{Observation, Outcome};
use crate::shared::errors::AppError;

const RECENT_COLUMNS: &str = "created_at,buy_price_tl,sell_price_tl,buy_price_eur,sell_price_eur";

/// Row body for the insert call
#[derive(Debug, Serialize)]
struct GoldPriceRow<'a> {
    date: String,
    buy_price_tl: f64,
    sell_price_tl: f64,
    buy_price_eur: f64,
    sell_price_eur: f64,
    eur_tl_rate: f64,
    source: &'a str,
    scraped_from: &'a str,
}

/// Returned representation of an inserted row
#[derive(Debug, Deserialize)]
struct InsertedRow {
    id: Option<serde_json::Value>,
    created_at: Option<String>,
}

/// Row as returned by the recent-prices query
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecentRecord {
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub buy_price_tl: Option<f64>,
    #[serde(default)]
    pub sell_price_tl: Option<f64>,
    #[serde(default)]
    pub buy_price_eur: Option<f64>,
    #[serde(default)]
    pub sell_price_eur: Option<f64>,
}

pub struct RemoteSink {
    http_client: Client,
    config: SupabaseConfig,
    table: String,
}

impl RemoteSink {
    pub fn new(config: SupabaseConfig, remote: &RemoteCfg) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(remote.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            config,
            table: remote.table.clone(),
        })
    }

    fn credentials(&self) -> Result<(&str, &str), AppError> {
        self.config
            .credentials()
            .map_err(|missing| AppError::ConfigError(format!("missing {}", missing.join(", "))))
    }

    fn table_url(&self, base_url: &str) -> String {
        format!("{}/rest/v1/{}", base_url, self.table)
    }

    /// Most recent rows, newest first. Best effort: any problem yields an empty list.
    pub async fn fetch_recent(&self, limit: usize) -> Vec<RecentRecord> {
        let Ok((base_url, key)) = self.credentials() else {
            return Vec::new();
        };

        let limit = limit.to_string();
        let result = self
            .http_client
            .get(self.table_url(base_url))
            .header("apikey", key)
            .bearer_auth(key)
            .query(&[
                ("select", RECENT_COLUMNS),
                ("order", "created_at.desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await;

        let response = match result {
            Ok(response) if response.status() == StatusCode::OK => response,
            Ok(response) => {
                warn!("⚠️ Recent prices query returned status: {}", response.status());
                return Vec::new();
            }
            Err(e) => {
                warn!("⚠️ Recent prices query failed: {}", e);
                return Vec::new();
            }
        };

        response.json::<Vec<RecentRecord>>().await.unwrap_or_else(|e| {
            warn!("⚠️ Could not decode recent prices: {}", e);
            Vec::new()
        })
    }
}

#[async_trait]
impl ObservationSink for RemoteSink {
    async fn save(&self, observation: &Observation) -> Result<SaveReceipt, AppError> {
        let quote = match observation.outcome() {
            Outcome::Quoted(quote) => quote,
            Outcome::Failed { message } => {
                return Err(AppError::PersistenceError(format!(
                    "error in data, skipping save: {}",
                    message
                )));
            }
        };
        let (base_url, key) = self.credentials()?;

        let row = GoldPriceRow {
            date: observation.captured_at().to_rfc3339(),
            buy_price_tl: quote.native_buy,
            sell_price_tl: quote.native_sell,
            buy_price_eur: quote.converted_buy,
            sell_price_eur: quote.converted_sell,
            eur_tl_rate: quote.rate.value(),
            source: observation.source_url(),
            scraped_from: observation.scraped_from(),
        };

        let response = self
            .http_client
            .post(self.table_url(base_url))
            .header("apikey", key)
            .bearer_auth(key)
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await
            .map_err(|e| AppError::PersistenceError(format!("insert request failed: {}", e)))?;

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => format!("<body unreadable: {}>", e),
        };
        if status != StatusCode::CREATED {
            return Err(AppError::PersistenceError(format!("insert failed: {} - {}", status, body)));
        }

        let inserted = serde_json::from_str::<Vec<InsertedRow>>(&body)
            .ok()
            .and_then(|rows| rows.into_iter().next());
        if inserted.is_none() {
            warn!("⚠️ Insert succeeded but the returned representation was not readable");
        }
        let (id, created_at) = inserted.map(|row| (row.id, row.created_at)).unwrap_or((None, None));

        info!("✅ Data successfully saved to Supabase!");
        Ok(SaveReceipt::Remote { id, created_at })
    }

    fn backend_type(&self) -> &'static str {
        "Supabase"
    }
}
