//! Brazilian-real amounts: parsing user input and formatting for display.

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{Error, Result};

pub(crate) const CURRENCY_MARKER: &str = "R$";

/// Most fraction digits a `Decimal` holds without rounding.
const MAX_FRACTION_DIGITS: usize = 28;

/// Digits with optional `.` thousands groups, then an optional `,` fraction.
static AMOUNT_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]{1,3}(?:\.[0-9]{3})+|[0-9]+)(?:,([0-9]+))?$").ok()
});

/// Parse a pt-BR monetary string (`"1.500,00"`, `"R$ 1.500,00"`) into an exact amount.
///
/// Blank input (or only the `R$` marker) is zero. Anything else that is not a
/// well-formed non-negative amount fails with [`Error::InvalidAmountFormat`]
/// carrying the raw input. The result keeps at least two fraction digits and
/// never drops digits the user typed.
pub(crate) fn parse_brl(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix(CURRENCY_MARKER)
        .unwrap_or(trimmed)
        .trim();

    if body.is_empty() {
        return Ok(Decimal::new(0, 2));
    }

    let captures = AMOUNT_PATTERN
        .as_ref()
        .and_then(|re| re.captures(body))
        .ok_or_else(|| invalid(raw))?;
    let fraction_digits = captures.get(1).map_or(0, |m| m.as_str().len());
    if fraction_digits > MAX_FRACTION_DIGITS {
        return Err(invalid(raw));
    }

    let normalized = body.replace('.', "").replacen(',', ".", 1);
    let mut amount = Decimal::from_str(&normalized).map_err(|_| invalid(raw))?;
    if (amount.scale() as usize) < fraction_digits {
        return Err(invalid(raw));
    }
    if amount.scale() < 2 {
        amount.rescale(2);
    }
    Ok(amount)
}

fn invalid(raw: &str) -> Error {
    Error::InvalidAmountFormat {
        raw: raw.to_string(),
    }
}

/// Format an amount the way the form layer shows it: `R$ 1.234.567,89`.
pub(crate) fn format_brl(val: Decimal) -> String {
    let abs = val
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let body = group_digits(&format!("{abs:.2}"));
    if val < Decimal::ZERO && abs > Decimal::ZERO {
        format!("-{CURRENCY_MARKER} {body}")
    } else {
        format!("{CURRENCY_MARKER} {body}")
    }
}

/// Format an amount for an input field: pt-BR separators, every stored
/// fraction digit kept, no marker. `parse_brl` reads it back unchanged.
pub(crate) fn format_brl_exact(val: Decimal) -> String {
    let body = group_digits(&val.abs().to_string());
    if val < Decimal::ZERO {
        format!("-{body}")
    } else {
        body
    }
}

/// `1234567.891` -> `1.234.567,891`
fn group_digits(plain: &str) -> String {
    let (int_part, dec_part) = plain.split_once('.').unwrap_or((plain, ""));
    let grouped = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(".");
    if dec_part.is_empty() {
        grouped
    } else {
        format!("{grouped},{dec_part}")
    }
}
