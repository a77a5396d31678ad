//! Conversion between minor-unit integers and decimal display strings.
//!
//! Amounts travel through the app as [`U256`] minor units (wei for the native
//! coin, 18-decimal units for the reward token). They are only turned into
//! decimal strings at the display boundary. The arithmetic is
//! `alloy_primitives::utils`; this module trims the output for display and
//! maps unit errors into [`ProviderError`].

use alloy_primitives::U256;
use alloy_primitives::utils::{self, ParseUnits};

use super::error::ProviderError;

/// Decimals used by the native coin and the reward token.
pub const ETHER_DECIMALS: u8 = 18;

/// Formats a minor-unit amount as a decimal string.
///
/// Trailing fractional zeros are trimmed, but at least one fractional digit is
/// kept, so `10^18` with 18 decimals renders as `"1.0"`.
#[must_use]
pub fn format_units(amount: U256, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    match utils::format_units(amount, decimals) {
        Ok(text) => trim_fraction(&text),
        Err(e) => {
            tracing::debug!(decimals, error = %e, "unsupported unit, showing raw amount");
            amount.to_string()
        }
    }
}

/// Formats a wei amount as ether.
#[must_use]
pub fn format_ether(amount: U256) -> String {
    format_units(amount, ETHER_DECIMALS)
}

/// Parses a non-negative decimal string into minor units.
///
/// # Errors
///
/// Returns [`ProviderError::Decode`] for empty, malformed, negative or
/// out-of-range amounts.
pub fn parse_units(input: &str, decimals: u8) -> Result<U256, ProviderError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ProviderError::decode("empty amount"));
    }
    match utils::parse_units(input, decimals) {
        Ok(ParseUnits::U256(amount)) => Ok(amount),
        Ok(ParseUnits::I256(_)) => Err(ProviderError::decode(format!(
            "amount '{input}' must not be negative"
        ))),
        Err(e) => Err(ProviderError::decode(format!("invalid amount '{input}': {e}"))),
    }
}

/// Parses an ether amount into wei.
///
/// # Errors
///
/// See [`parse_units`].
pub fn parse_ether(input: &str) -> Result<U256, ProviderError> {
    parse_units(input, ETHER_DECIMALS)
}

fn trim_fraction(text: &str) -> String {
    match text.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            let fraction = if fraction.is_empty() { "0" } else { fraction };
            format!("{whole}.{fraction}")
        }
        None => text.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
