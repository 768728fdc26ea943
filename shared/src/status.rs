//! Order status actions
//!
//! Client-side mirror of the server's order state machine. The mirror
//! only decides which controls a view offers; the server stays the
//! authority on every transition and may still reject a request.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::OrderStatus;

/// Actions a view can trigger against an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    /// Restaurant admin accepts a pending order
    Approve,
    /// Restaurant admin hands an approved order to a deliverer
    Assign,
    /// Deliverer completes an assigned order
    MarkDelivered,
    /// Deliverer undoes a delivery marked by mistake
    ResetDelivery,
}

impl OrderAction {
    /// Status the server is asked to move the order to
    pub fn target_status(self) -> OrderStatus {
        match self {
            OrderAction::Approve => OrderStatus::Approved,
            OrderAction::Assign => OrderStatus::Assigned,
            OrderAction::MarkDelivered => OrderStatus::Delivered,
            OrderAction::ResetDelivery => OrderStatus::Assigned,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Approve => "approve",
            OrderAction::Assign => "assign",
            OrderAction::MarkDelivered => "mark_delivered",
            OrderAction::ResetDelivery => "reset_delivery",
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions available for an order currently in `status`.
///
/// Unrecognized statuses get an empty set: a stale client renders no
/// controls rather than guessing at transitions.
pub fn allowed_actions(status: OrderStatus) -> &'static [OrderAction] {
    match status {
        OrderStatus::Pending => &[OrderAction::Approve],
        OrderStatus::Approved => &[OrderAction::Assign],
        OrderStatus::Assigned => &[OrderAction::MarkDelivered],
        OrderStatus::Delivered => &[OrderAction::ResetDelivery],
        OrderStatus::Unknown => &[],
    }
}

/// Whether `action` is offered while the order is in `status`
pub fn permits(status: OrderStatus, action: OrderAction) -> bool {
    allowed_actions(status).contains(&action)
}
