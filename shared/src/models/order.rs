//! Order Model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money;

/// Order lifecycle status
///
/// Client-side mirror of the server state machine. Statuses this build
/// does not recognize deserialize as [`OrderStatus::Unknown`], which
/// offers no actions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    Assigned,
    Delivered,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Assigned => "assigned",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment methods the checkout form offers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::CreditCard,
        PaymentMethod::Paypal,
        PaymentMethod::Cash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "paypal" => Ok(PaymentMethod::Paypal),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(format!("unknown payment method '{other}'")),
        }
    }
}

/// One item line of a placed order, as the API reports it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub name: String,
    /// Unit price the order was placed at
    pub price: f64,
    pub quantity: i32,
}

impl OrderLine {
    /// Line total, rounded to 2 decimal places
    pub fn total(&self) -> f64 {
        money::line_total(self.price, self.quantity)
    }
}

/// Order entity (read-only projection; the server owns every mutation)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: i64,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub restaurant_name: Option<String>,
    #[serde(default)]
    pub deliverer_username: Option<String>,
    pub status: OrderStatus,
    pub total_price: f64,
    /// Displayed verbatim; only the create payload constrains the value set
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub delivery_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delivered_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub food_items: Vec<OrderLine>,
}

/// One cart line in the create-order payload
///
/// `price` is the unit price the customer saw at add-to-cart time; the
/// server recomputes the authoritative total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItemPayload {
    pub food_item_id: i64,
    pub quantity: i32,
    pub price: f64,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub cart: Vec<OrderItemPayload>,
    pub payment_method: PaymentMethod,
    pub delivery_time: DateTime<Utc>,
}

/// Create order response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub id: i64,
    pub status: OrderStatus,
    #[serde(default)]
    pub total_price: Option<f64>,
}

/// Status transition request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Assignment request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRequest {
    pub deliverer_id: i64,
}
