//! Domain layer - observation model and price normalization

pub mod normalizer;
pub mod observation;

pub use normalizer::{normalize, normalize_at};
pub use observation::{
    ExchangeRate, GoldQuote, Observation, ObservationDocument, ObservationStatus, Outcome, RateQuote, RateSource,
};
