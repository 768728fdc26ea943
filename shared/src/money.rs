//! Monetary arithmetic helpers
//!
//! Prices cross the wire as `f64` (plain JSON numbers). All arithmetic is
//! done using `Decimal` internally, then rounded back to 2 decimal places
//! (half-up) for storage and display.

use rust_decimal::prelude::*;

/// Monetary values are rounded to 2 decimal places
pub const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded half-up to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round a monetary f64 to 2 decimal places (half-up)
#[inline]
pub fn round_money(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// Multiply a unit price by a quantity, rounded to 2 decimal places
pub fn line_total(unit_price: f64, quantity: i32) -> f64 {
    to_f64(to_decimal(unit_price) * Decimal::from(quantity))
}

/// Format a monetary value with exactly two decimals for display
pub fn format_money(value: f64) -> String {
    format!("{:.2}", round_money(value))
}
