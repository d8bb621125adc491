//! Ether amounts: user input to wei and wei to display strings.

use alloy_primitives::utils::{format_ether, parse_ether};
use alloy_primitives::U256;

use crate::error::{ClientError, Result};

const ETHER_DECIMALS: usize = 18;

/// Parses a decimal ether amount such as `"1.5"` into wei.
///
/// Surrounding whitespace is ignored. Empty input, signs, exponents and
/// more than 18 fractional digits are rejected before `parse_ether` sees
/// the value.
pub fn parse_amount(value: &str) -> Result<U256> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid("amount is empty"));
    }
    if value.starts_with('-') {
        return Err(invalid("amount cannot be negative"));
    }

    let (whole, frac) = value.split_once('.').unwrap_or((value, ""));
    if frac.contains('.') {
        return Err(invalid("invalid amount format"));
    }
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid("invalid number"));
    }
    if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid("invalid number"));
    }
    if frac.len() > ETHER_DECIMALS {
        return Err(invalid("too many decimal places"));
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let normalized = if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, frac)
    };
    parse_ether(&normalized).map_err(|e| invalid(&e.to_string()))
}

/// Formats wei like ethers' `formatEther`: trailing zeros trimmed, at least
/// one fractional digit (`"1.5"`, `"0.0"`).
pub fn format_amount(wei: U256) -> String {
    let formatted = format_ether(wei);
    match formatted.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            format!("{}.{}", whole, if frac.is_empty() { "0" } else { frac })
        }
        None => format!("{}.0", formatted),
    }
}

fn invalid(reason: &str) -> ClientError {
    ClientError::InvalidAmount(reason.to_string())
}
