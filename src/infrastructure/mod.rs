//! Infrastructure layer - HTTP sources and storage backends

pub mod html;
pub mod price_extractor;
pub mod rate_provider;
pub mod sinks;

pub use price_extractor::{NativePrices, PriceExtractor, PricePatterns};
pub use rate_provider::{FrankfurterRateProvider, RateProvider, StaticRateProvider};
pub use sinks::{FileSink, ObservationSink, RemoteSink, SaveReceipt};
