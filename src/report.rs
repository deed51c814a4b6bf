// src/report.rs
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::infrastructure::sinks::RecentRecord;

const RULE_WIDTH: usize = 85;

/// Parse a `created_at` value for display, tolerating odd fractions and offsets
pub fn parse_created_at(raw: &str) -> NaiveDateTime {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw.trim()) {
        return ts.naive_local();
    }

    let trimmed = raw.trim().split('+').next().unwrap_or_default();
    let trimmed = trimmed.split('.').next().unwrap_or_default().trim_end_matches('Z');
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S"))
        .unwrap_or_else(|_| Utc::now().naive_utc())
}

/// Text table of the most recent stored prices
pub fn render_recent(records: &[RecentRecord]) -> String {
    let mut out = String::new();
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');

    if records.is_empty() {
        out.push_str("❌ No data found.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<20} {:<12} {:<12} {:<12} {:<12}\n",
        "Date/Time", "Buy TL", "Sell TL", "Buy EUR", "Sell EUR"
    ));
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');

    for rec in records {
        let ts = parse_created_at(rec.created_at.as_deref().unwrap_or_default());
        out.push_str(&format!(
            "{:<20} {:>8.2}      {:>8.2}      {:>8.2}      {:>8.2}\n",
            ts.format("%d.%m.%Y %H:%M").to_string(),
            rec.buy_price_tl.unwrap_or(0.0),
            rec.sell_price_tl.unwrap_or(0.0),
            rec.buy_price_eur.unwrap_or(0.0),
            rec.sell_price_eur.unwrap_or(0.0),
        ));
    }
    out
}

pub fn print_recent(records: &[RecentRecord], limit: usize) {
    println!("\n📈 Latest gold prices from Supabase ({} newest entries):", limit);
    print!("{}", render_recent(records));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn record(created_at: &str) -> RecentRecord {
        RecentRecord {
            created_at: Some(created_at.to_string()),
            buy_price_tl: Some(4500.0),
            sell_price_tl: Some(4550.0),
            buy_price_eur: Some(123.29),
            sell_price_eur: None,
        }
    }

    #[test]
    fn test_parse_created_at_variants() {
        let ts = parse_created_at("2026-10-17T09:30:00.123456+00:00");
        assert_eq!((ts.day(), ts.month(), ts.hour(), ts.minute()), (17, 10, 9, 30));

        let ts = parse_created_at("2026-10-17T09:30:00Z");
        assert_eq!((ts.hour(), ts.minute()), (9, 30));

        // no offset, so only the seconds part is kept
        let ts = parse_created_at("2026-10-17T09:30:00.1234567");
        assert_eq!((ts.year(), ts.hour(), ts.minute()), (2026, 9, 30));
    }

    #[test]
    fn test_parse_created_at_garbage_is_now() {
        let before = Utc::now().naive_utc() - chrono::Duration::seconds(1);
        assert!(parse_created_at("not a date") >= before);
    }

    #[test]
    fn test_render_recent_rows() {
        let table = render_recent(&[record("2026-10-17T09:30:00+00:00")]);
        assert!(table.contains("Date/Time"));
        assert!(table.contains("17.10.2026 09:30"));
        assert!(table.contains(" 4500.00"));
        assert!(table.contains("  123.29"));
        assert!(table.contains("    0.00"));
    }

    #[test]
    fn test_render_recent_empty() {
        assert!(render_recent(&[]).contains("No data found"));
    }
}
