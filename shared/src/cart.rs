//! Customer cart
//!
//! In-memory cart for one in-progress order. All lines must come from a
//! single restaurant. Unit prices are captured at add time through the
//! discount window, so a discount expiring later does not reprice lines
//! already in the cart.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{FoodItem, OrderItemPayload};
use crate::money;
use crate::pricing;

/// Cart rejection reasons. Every rejection leaves the cart unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The item belongs to a different restaurant than the cart holds
    #[error(
        "cart holds items from restaurant {cart_restaurant}, cannot add from restaurant {item_restaurant}"
    )]
    CrossRestaurant {
        item_restaurant: i64,
        cart_restaurant: i64,
    },

    /// Quantities must be positive
    #[error("quantity must be positive, got {quantity}")]
    InvalidQuantity { quantity: i32 },

    /// No line carries the given food item id
    #[error("food item {0} is not in the cart")]
    LineNotFound(i64),
}

/// One cart line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub food_item_id: i64,
    pub name: String,
    /// Unit price captured at add time, discount already resolved
    pub unit_price: f64,
    pub quantity: i32,
    /// Owning restaurant, denormalized for the affinity check
    pub restaurant_id: i64,
}

impl CartLine {
    /// Line total, rounded to 2 decimal places
    pub fn total(&self) -> f64 {
        money::line_total(self.unit_price, self.quantity)
    }
}

/// Cart bound to at most one restaurant at a time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restaurant the cart is bound to; `None` while empty
    pub fn restaurant_id(&self) -> Option<i64> {
        self.lines.first().map(|line| line.restaurant_id)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add `quantity` of `item` priced at `now`.
    ///
    /// Adding an item already in the cart accumulates its quantity and
    /// keeps the originally captured unit price. Items from a second
    /// restaurant are rejected until the cart is cleared.
    pub fn add_item(
        &mut self,
        item: &FoodItem,
        quantity: i32,
        now: DateTime<Utc>,
    ) -> Result<(), CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }
        if let Some(cart_restaurant) = self.restaurant_id() {
            if cart_restaurant != item.restaurant_id {
                return Err(CartError::CrossRestaurant {
                    item_restaurant: item.restaurant_id,
                    cart_restaurant,
                });
            }
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.food_item_id == item.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                food_item_id: item.id,
                name: item.name.clone(),
                unit_price: pricing::effective_price(item, now),
                quantity,
                restaurant_id: item.restaurant_id,
            });
        }
        Ok(())
    }

    /// Remove the line for `food_item_id`; no-op when absent
    pub fn remove_item(&mut self, food_item_id: i64) {
        self.lines.retain(|line| line.food_item_id != food_item_id);
    }

    /// Replace the quantity of an existing line
    pub fn set_quantity(&mut self, food_item_id: i64, quantity: i32) -> Result<(), CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.food_item_id == food_item_id)
            .ok_or(CartError::LineNotFound(food_item_id))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Drop every line; the cart loses its restaurant affinity
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line totals, rounded to 2 decimal places (half-up)
    pub fn total_price(&self) -> f64 {
        let total: Decimal = self
            .lines
            .iter()
            .map(|line| money::to_decimal(line.unit_price) * Decimal::from(line.quantity))
            .sum();
        money::to_f64(total)
    }

    /// Total formatted with two decimals for display
    pub fn display_total(&self) -> String {
        money::format_money(self.total_price())
    }

    /// Lines serialized for the create-order payload
    pub fn order_items(&self) -> Vec<OrderItemPayload> {
        self.lines
            .iter()
            .map(|line| OrderItemPayload {
                food_item_id: line.food_item_id,
                quantity: line.quantity,
                price: line.unit_price,
            })
            .collect()
    }
}
