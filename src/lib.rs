//! Goldfeed - gold price collector
//! Scrapes a retail gold quote, converts it with a live exchange rate and
//! stores the observation as a pending JSON document or a Supabase row.

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod report;
pub mod shared;

// Re-export main types for convenience
pub use app::{run, AppCfg, RunReport, SinkKind};
pub use application::Pipeline;
pub use config::{Config, SupabaseConfig};
pub use domain::{Observation, Outcome};
pub use infrastructure::{FileSink, ObservationSink, PriceExtractor, RemoteSink};
pub use shared::errors::AppError;
