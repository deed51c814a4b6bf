//! Shared observation pipeline: extract, then hand the result to a sink

use tracing::{error, info};

use crate::domain::{Observation, Outcome};
use crate::infrastructure::{ObservationSink, PriceExtractor, SaveReceipt};
use crate::shared::errors::AppError;
use crate::shared::utils::format_amount;

/// Observation produced by one run and what happened when saving it
#[derive(Debug)]
pub struct PipelineRun {
    pub observation: Observation,
    pub saved: Result<SaveReceipt, AppError>,
}

pub struct Pipeline<S: ObservationSink> {
    extractor: PriceExtractor,
    sink: S,
}

impl<S: ObservationSink> Pipeline<S> {
    pub fn new(extractor: PriceExtractor, sink: S) -> Self {
        Self { extractor, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run extract and save exactly once
    pub async fn run_once(&self) -> PipelineRun {
        let observation = self.extractor.extract().await;
        log_observation(&observation);

        info!("💾 Saving to {}...", self.sink.backend_type());
        let saved = self.sink.save(&observation).await;
        if let Err(e) = &saved {
            error!("❌ Save to {} failed: {}", self.sink.backend_type(), e);
        }

        PipelineRun { observation, saved }
    }
}

fn log_observation(observation: &Observation) {
    match observation.outcome() {
        Outcome::Quoted(quote) => {
            info!("✅ Successfully scraped gold prices:");
            info!("   Buy TL:   {}", format_amount(quote.native_buy));
            info!("   Sell TL:  {}", format_amount(quote.native_sell));
            info!("   Buy EUR:  {}", format_amount(quote.converted_buy));
            info!("   Sell EUR: {}", format_amount(quote.converted_sell));
            info!("   EUR/TL Rate: {} ({})", quote.rate, quote.rate_source.label());
        }
        Outcome::Failed { message } => {
            error!("❌ Scraping failed: {}", message);
        }
    }
}
