//! Parsing and formatting of user-entered amounts.
//!
//! Stakes and odds live in the slip as the strings the user typed or the
//! view rendered. Parsing is lenient about trailing text: the leading number
//! is taken and the rest ignored, so `"7abc"` reads as 7 while `"abc"` does
//! not parse at all.

use rust_decimal::{Decimal, RoundingStrategy};

/// Parse the leading decimal number of `raw`.
///
/// Accepts optional leading whitespace, an optional sign, digits and an
/// optional fractional part. Returns `None` when no digits are found.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        // A bare trailing dot ("5.") still reads as 5.
        end = if frac_end > frac_start { frac_end } else { end };
    }

    if digits == 0 {
        return None;
    }

    let number = &s[..end];
    let number = number.strip_prefix('+').unwrap_or(number);
    // ".5" and "-.5" need a leading zero for Decimal.
    let normalized = match number.strip_prefix('-') {
        Some(rest) if rest.starts_with('.') => format!("-0{}", rest),
        None if number.starts_with('.') => format!("0{}", number),
        _ => number.to_string(),
    };

    normalized.parse().ok()
}

/// Parse `raw`, treating anything unparsable as zero.
pub fn amount_or_zero(raw: &str) -> Decimal {
    parse_amount(raw).unwrap_or(Decimal::ZERO)
}

/// Format with exactly two decimal places, rounding half away from zero.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// What a stake returns at the given odds, two decimals.
///
/// Returns `"0.00"` when either side does not parse or the product does not
/// fit a `Decimal`.
pub fn potential_win(stake: &str, price: &str) -> String {
    match (parse_amount(stake), parse_amount(price)) {
        (Some(stake), Some(price)) => stake
            .checked_mul(price)
            .map(format_amount)
            .unwrap_or_else(|| "0.00".to_string()),
        _ => "0.00".to_string(),
    }
}

/// Normalize a user-entered stake for storage.
///
/// Unparsable or negative input becomes `"0"`; anything else is kept exactly
/// as typed.
pub fn sanitize_stake(raw: &str) -> String {
    match parse_amount(raw) {
        Some(value) if value >= Decimal::ZERO => raw.to_string(),
        _ => "0".to_string(),
    }
}
