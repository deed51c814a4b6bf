//! Converts native-currency prices into an [`Observation`]

use chrono::{DateTime, Local};

use super::observation::{GoldQuote, Observation, RateQuote};
use crate::shared::utils::round2;

/// Build an observation stamped with the current local time
pub fn normalize(
    native_buy: f64,
    native_sell: f64,
    rate: &RateQuote,
    source_url: &str,
    scraped_from: &str,
) -> Observation {
    normalize_at(Local::now(), native_buy, native_sell, rate, source_url, scraped_from)
}

/// Same as [`normalize`] with an explicit capture time
pub fn normalize_at(
    captured_at: DateTime<Local>,
    native_buy: f64,
    native_sell: f64,
    rate: &RateQuote,
    source_url: &str,
    scraped_from: &str,
) -> Observation {
    let divisor = rate.rate.value();
    let quote = GoldQuote {
        native_buy,
        native_sell,
        converted_buy: round2(native_buy / divisor),
        converted_sell: round2(native_sell / divisor),
        rate: rate.rate,
        rate_source: rate.source.clone(),
    };

    Observation::quoted(captured_at, source_url, scraped_from, quote)
}
