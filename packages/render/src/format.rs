//! Display formatting for popup and tabular fields.
//!
//! Formats match the published popup tables: thousands-separated
//! population, dollar income, one-decimal °C temperature, one-decimal
//! percentages, three-decimal scores.

/// Formats an integer with comma thousands separators ("1,234,567").
#[must_use]
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a dollar amount, rounded to whole dollars ("$45,000").
#[must_use]
pub fn money(value: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = value.round().max(0.0) as u64;
    format!("${}", thousands(whole))
}

/// Formats a temperature in °C with one decimal ("29.5°C").
#[must_use]
pub fn temperature(value: f64) -> String {
    format!("{value:.1}°C")
}

/// Formats a [0, 1] fraction as a percentage with one decimal ("72.5%").
#[must_use]
pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Formats a composite score with three decimals ("0.613").
#[must_use]
pub fn score(value: f64) -> String {
    format!("{value:.3}")
}
