//! Conversions between minor-unit integers and the two-decimal display form.
//!
//! Amounts are stored and sent as `i64` minor units. Major units only exist
//! at the edges: formatting for display and parsing what the user typed.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount is empty")]
    Empty,
    #[error("'{0}' is not a valid amount")]
    Invalid(String),
    #[error("amount is too large")]
    Overflow,
}

/// Format minor units as major units with exactly two decimals: `1050` -> `"10.50"`
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Format with a currency symbol in front, as the screens show totals
pub fn format_euros(cents: i64) -> String {
    format!("€{}", format_cents(cents))
}

/// Parse a user-entered major-unit amount into minor units: `"10.50"` -> `1050`.
///
/// Accepts `.` or `,` as decimal separator. Extra decimals are rounded half
/// away from zero.
pub fn parse_amount(input: &str) -> Result<i64, MoneyError> {
    let trimmed = input.trim().trim_start_matches('€').trim();
    if trimmed.is_empty() {
        return Err(MoneyError::Empty);
    }

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let invalid = || MoneyError::Invalid(input.trim().to_string());

    let (whole, frac) = match unsigned.split_once(['.', ',']) {
        Some((w, f)) => (w, f),
        None => (unsigned, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| MoneyError::Overflow)?
    };

    let digits: Vec<i64> = frac.bytes().map(|b| i64::from(b - b'0')).collect();
    let tenths = digits.first().copied().unwrap_or(0);
    let hundredths = digits.get(1).copied().unwrap_or(0);
    let round_up = digits.get(2).is_some_and(|d| *d >= 5);

    let cents = whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
        .ok_or(MoneyError::Overflow)?;

    Ok(if negative { -cents } else { cents })
}
