//! Deliverer Model

use serde::{Deserialize, Serialize};

/// Deliverer as listed for order assignment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deliverer {
    pub id: i64,
    pub username: String,
}

/// Id-lookup response for a deliverer username
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelivererId {
    pub id: i64,
}
