//! Menu Fixtures

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::iso::{self, Currency};
use serde::Deserialize;

use crate::fixtures::FixtureError;

/// Wrapper for a menu in YAML
#[derive(Debug, Deserialize)]
pub struct MenuFixture {
    /// Delivery fee configuration for this menu
    pub delivery: DeliveryFixture,

    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,

    /// Map of side item key -> side item fixture
    #[serde(default)]
    pub sides: FxHashMap<String, SideItemFixture>,
}

/// Delivery fee configuration from YAML
#[derive(Debug, Deserialize)]
pub struct DeliveryFixture {
    /// Subtotal at which delivery becomes free (e.g., "30.00 CNY")
    pub free_threshold: String,

    /// Flat fee charged below the threshold (e.g., "6.00 CNY")
    pub flat_fee: String,
}

/// Product fixture from YAML
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Size/variant specs, in display order
    pub specs: Vec<SpecFixture>,
}

/// Spec fixture from YAML
#[derive(Debug, Deserialize)]
pub struct SpecFixture {
    /// Spec key within the product (e.g., "regular")
    pub key: String,

    /// Spec name
    pub name: String,

    /// Spec price (e.g., "45.00 CNY")
    pub price: String,
}

/// Side item fixture from YAML
#[derive(Debug, Deserialize)]
pub struct SideItemFixture {
    /// Side item name
    pub name: String,

    /// Per-unit price (e.g., "4.00 CNY")
    pub price: String,
}

/// Parse a price string (e.g., "45.00 CNY") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code is
/// not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "CNY" => iso::CNY,
        "JPY" => iso::JPY,
        "USD" => iso::USD,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    // Scale by the currency exponent (JPY has no minor unit).
    let factor = 10_i64
        .checked_pow(currency.exponent)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::from(factor))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Parse a percentage string (e.g., "20%" or "0.2") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "20%" for 20%
/// - Decimal format: "0.2" for 20%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a number.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        return Ok(Percentage::from(value / 100.0));
    }

    let value = trimmed
        .parse::<f64>()
        .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

    Ok(Percentage::from(value))
}
