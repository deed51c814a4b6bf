//! Utility functions and helpers

/// Parse a decimal written with `.` as thousands separator and `,` as decimal
/// separator, e.g. `"1.234,56"` -> `1234.56`.
pub fn parse_locale_decimal(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace('.', "").replace(',', ".");
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Round to two decimal places (half away from zero)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format with a `,` thousands separator and two decimals, e.g. `4,500.00`
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}
