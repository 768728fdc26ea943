//! Discount pricing
//!
//! Resolves the unit price a food item sells at for a given instant. The
//! caller supplies `now` so pricing stays deterministic under test.

use chrono::{DateTime, Utc};

use crate::models::FoodItem;

/// Unit price the item sells at `now`: the discounted price inside an
/// active window, the base price otherwise.
pub fn effective_price(item: &FoodItem, now: DateTime<Utc>) -> f64 {
    active_discount(item, now).unwrap_or(item.price)
}

/// The discounted price, if a discount window covers `now`.
///
/// Both window bounds are inclusive. A discount missing either bound is
/// malformed and never applies.
pub fn active_discount(item: &FoodItem, now: DateTime<Utc>) -> Option<f64> {
    let discounted = item.discount_price?;
    if let (Some(start), Some(end)) = (item.discount_start, item.discount_end)
        && start <= now
        && now <= end
    {
        return Some(discounted);
    }
    None
}
