//! Money parsing and formatting for statement amounts.
//!
//! Every amount is an exact `Decimal` quantized to two fractional digits with
//! half-up rounding. [`parse_money`] is the single interpreter of textual
//! amounts and [`format_money`] the single renderer, so rounding is identical
//! across the whole pipeline.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use super::patterns::MONEY_NOISE;

/// Number of fractional digits in every amount.
pub const MONEY_SCALE: u32 = 2;

/// Quantize to two fractional digits, rounding half away from zero.
pub fn round_half_up(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Zero with two fractional digits.
pub fn zero() -> Decimal {
    Decimal::new(0, MONEY_SCALE)
}

/// Parse a free-form money string (e.g. "PHP 1,234.50", "n/a").
///
/// Never fails: blanks, placeholders and unparseable residue all yield zero.
pub fn parse_money(text: &str) -> Decimal {
    let trimmed = text.trim();

    if trimmed.is_empty()
        || trimmed == "-"
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("none")
    {
        return zero();
    }

    let cleaned = MONEY_NOISE.replace_all(trimmed, "");
    if cleaned.is_empty() || cleaned == "." || cleaned == "-" {
        return zero();
    }

    // Bare leading or trailing points ("5.", ".5") are valid amounts
    let mut candidate = cleaned.into_owned();
    if candidate.ends_with('.') {
        candidate.push('0');
    }
    if candidate.starts_with('.') {
        candidate.insert(0, '0');
    } else if candidate.starts_with("-.") {
        candidate.insert(1, '0');
    }

    let value = match Decimal::from_str(&candidate) {
        Ok(value) => round_half_up(value),
        Err(_) => {
            warn!("Could not parse money value: {:?}", candidate);
            return zero();
        }
    };

    // Too many integer digits to carry two decimals
    if value.scale() != MONEY_SCALE {
        warn!("Money value out of range: {:?}", candidate);
        return zero();
    }
    value
}

/// Format an amount with thousands separators (e.g. "12,345.50").
pub fn format_money(value: Decimal) -> String {
    let s = round_half_up(value).to_string();
    let (sign, unsigned) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };

    let (integer_part, decimal_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::with_capacity(chars.len() + chars.len() / 3);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    format!("{}{}.{}", sign, grouped, decimal_part)
}

/// Format a value given as text, coercing it to a decimal first.
///
/// Input that is not a plain decimal number renders as "0.00".
pub fn format_money_text(text: &str) -> String {
    match Decimal::from_str(text.trim()) {
        Ok(value) => format_money(value),
        Err(_) => format_money(zero()),
    }
}

/// Sum amounts exactly. Amounts that would overflow the total are skipped.
pub fn sum<'a, I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = &'a Decimal>,
{
    amounts.into_iter().fold(zero(), |acc, d| match acc.checked_add(*d) {
        Some(total) => total,
        None => {
            warn!("Skipping amount {} that overflows total {}", d, acc);
            acc
        }
    })
}
