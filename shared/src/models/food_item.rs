//! Food Item Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Food item entity
///
/// The discount triple (`discount_price`, `discount_start`, `discount_end`)
/// is either fully present or treated as no discount; see
/// [`crate::pricing::effective_price`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Base unit price
    pub price: f64,
    /// Discounted unit price, applies only inside the discount window
    #[serde(default)]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub discount_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub discount_end: Option<DateTime<Utc>>,
    /// Food type name used for grouping and search (e.g. "pizza")
    #[serde(rename = "type", default)]
    pub food_type: String,
    /// Owning restaurant. Some list endpoints send this under a
    /// denormalized column name.
    #[serde(alias = "restaurant_id_food_item")]
    pub restaurant_id: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Validation failures for food-item payloads
#[derive(Debug, Error, PartialEq)]
pub enum FoodItemError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("price must be non-negative, got {0}")]
    NegativePrice(f64),
    #[error("discount price must be non-negative, got {0}")]
    NegativeDiscountPrice(f64),
    #[error("discount price requires both window bounds")]
    IncompleteDiscountWindow,
    #[error("discount window starts after it ends")]
    InvertedDiscountWindow,
}

/// Create food item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItemCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub discount_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub discount_end: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub food_type: String,
    pub restaurant_id: i64,
}

impl FoodItemCreate {
    /// Check the payload before it is sent
    pub fn validate(&self) -> Result<(), FoodItemError> {
        if self.name.trim().is_empty() {
            return Err(FoodItemError::EmptyName);
        }
        if self.price < 0.0 {
            return Err(FoodItemError::NegativePrice(self.price));
        }
        validate_discount(self.discount_price, self.discount_start, self.discount_end)
    }
}

/// Update food item payload; absent fields stay unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_end: Option<DateTime<Utc>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub food_type: Option<String>,
}

impl FoodItemUpdate {
    /// Check the payload before it is sent. A discount price in the
    /// payload must bring its window along; the window cannot be
    /// assembled across requests.
    pub fn validate(&self) -> Result<(), FoodItemError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(FoodItemError::EmptyName);
            }
        }
        if let Some(price) = self.price {
            if price < 0.0 {
                return Err(FoodItemError::NegativePrice(price));
            }
        }
        validate_discount(self.discount_price, self.discount_start, self.discount_end)
    }
}

fn validate_discount(
    price: Option<f64>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), FoodItemError> {
    let Some(discount_price) = price else {
        return Ok(());
    };
    if discount_price < 0.0 {
        return Err(FoodItemError::NegativeDiscountPrice(discount_price));
    }
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(FoodItemError::InvertedDiscountWindow),
        (Some(_), Some(_)) => Ok(()),
        _ => Err(FoodItemError::IncompleteDiscountWindow),
    }
}
