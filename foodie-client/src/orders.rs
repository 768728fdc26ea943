//! Order boards
//!
//! One view-model for the two live order screens. The restaurant admin
//! works the `pending → approved → assigned` edge of the state machine,
//! the deliverer works `assigned → delivered` plus the undo edge back.
//! Both poll their order list and patch rows optimistically after a
//! confirmed transition; the next poll corrects any drift.

use std::time::Duration;

use chrono::Utc;
use thiserror::Error;

use shared::models::{Deliverer, Order, OrderStatus};
use shared::session::{Role, Session, SessionError};
use shared::status::{OrderAction, allowed_actions, permits};

use crate::poll::{Poller, PollerHandle};
use crate::{ClientError, HttpClient};

/// Order-board failures
#[derive(Debug, Error)]
pub enum BoardError {
    /// The cached order status does not offer this action
    #[error("cannot {action} an order that is {status}")]
    NotAllowed {
        status: OrderStatus,
        action: OrderAction,
    },

    /// The session cannot open this board
    #[error(transparent)]
    Session(#[from] SessionError),

    /// API failure
    #[error(transparent)]
    Api(#[from] ClientError),
}

/// Which screen the board drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoardKind {
    RestaurantAdmin,
    Deliverer,
}

impl BoardKind {
    fn allows(self, action: OrderAction) -> bool {
        match self {
            BoardKind::RestaurantAdmin => {
                matches!(action, OrderAction::Approve | OrderAction::Assign)
            }
            BoardKind::Deliverer => {
                matches!(action, OrderAction::MarkDelivered | OrderAction::ResetDelivery)
            }
        }
    }
}

/// Live order list with role-appropriate actions
pub struct OrderBoard {
    client: HttpClient,
    username: String,
    orders: PollerHandle<Order>,
    kind: BoardKind,
}

impl OrderBoard {
    /// Board for the restaurant admin's order screen.
    ///
    /// Polls the orders of the restaurant managed by the session user.
    pub fn restaurant_admin(
        client: HttpClient,
        session: &Session,
        poll_interval: Duration,
    ) -> Result<Self, BoardError> {
        session.require_role(Role::RestaurantAdmin)?;

        let username = session.username.clone();
        let fetch_client = client.clone();
        let fetch_username = username.clone();
        let orders = Poller::spawn("restaurant-orders", poll_interval, move || {
            let client = fetch_client.clone();
            let username = fetch_username.clone();
            async move { client.orders(&username).await }
        });

        Ok(Self {
            client,
            username,
            orders,
            kind: BoardKind::RestaurantAdmin,
        })
    }

    /// Board for the deliverer's today-orders screen.
    ///
    /// Resolves the deliverer id once, then polls today's orders for it.
    pub async fn deliverer(
        client: HttpClient,
        session: &Session,
        poll_interval: Duration,
    ) -> Result<Self, BoardError> {
        session.require_role(Role::Deliverer)?;

        let deliverer_id = client.deliverer_id(&session.username).await?;
        let fetch_client = client.clone();
        let orders = Poller::spawn("today-orders", poll_interval, move || {
            let client = fetch_client.clone();
            async move { client.today_orders(deliverer_id).await }
        });

        Ok(Self {
            client,
            username: session.username.clone(),
            orders,
            kind: BoardKind::Deliverer,
        })
    }

    /// Snapshot of the polled orders
    pub async fn orders(&self) -> Vec<Order> {
        self.orders.snapshot().await
    }

    /// Actions the view should offer for `order` on this board
    pub fn actions_for(&self, order: &Order) -> Vec<OrderAction> {
        allowed_actions(order.status)
            .iter()
            .copied()
            .filter(|action| self.kind.allows(*action))
            .collect()
    }

    /// Check an action against the cached row before calling the API.
    /// An order id the board has never seen counts as unknown status.
    async fn guard(&self, order_id: i64, action: OrderAction) -> Result<(), BoardError> {
        let status = self
            .orders
            .snapshot()
            .await
            .iter()
            .find(|order| order.id == order_id)
            .map(|order| order.status)
            .unwrap_or(OrderStatus::Unknown);

        if !self.kind.allows(action) || !permits(status, action) {
            return Err(BoardError::NotAllowed { status, action });
        }
        Ok(())
    }

    /// Approve a pending order
    pub async fn approve(&self, order_id: i64) -> Result<(), BoardError> {
        self.guard(order_id, OrderAction::Approve).await?;

        let updated = self.client.approve_order(order_id).await?;
        tracing::info!(order_id, "Order approved");
        self.orders
            .apply(move |orders| replace_order(orders, updated))
            .await;
        Ok(())
    }

    /// Hand an approved order to a deliverer
    pub async fn assign(&self, order_id: i64, deliverer_id: i64) -> Result<(), BoardError> {
        self.guard(order_id, OrderAction::Assign).await?;

        let updated = self.client.assign_order(order_id, deliverer_id).await?;
        tracing::info!(order_id, deliverer_id, "Order assigned");
        self.orders
            .apply(move |orders| replace_order(orders, updated))
            .await;
        Ok(())
    }

    /// Mark an assigned order delivered
    pub async fn mark_delivered(&self, order_id: i64) -> Result<(), BoardError> {
        self.guard(order_id, OrderAction::MarkDelivered).await?;

        self.client
            .update_order_status(order_id, OrderStatus::Delivered)
            .await?;
        tracing::info!(order_id, "Order marked delivered");
        let delivered_at = Utc::now();
        self.orders
            .apply(move |orders| {
                if let Some(order) = orders.iter_mut().find(|o| o.id == order_id) {
                    order.status = OrderStatus::Delivered;
                    order.delivered_time = Some(delivered_at);
                }
            })
            .await;
        Ok(())
    }

    /// Undo a delivery marked by mistake
    pub async fn reset_delivery(&self, order_id: i64) -> Result<(), BoardError> {
        self.guard(order_id, OrderAction::ResetDelivery).await?;

        self.client.reset_order_status(order_id).await?;
        tracing::info!(order_id, "Order delivery reset");
        self.orders
            .apply(move |orders| {
                if let Some(order) = orders.iter_mut().find(|o| o.id == order_id) {
                    order.status = OrderStatus::Assigned;
                    order.delivered_time = None;
                }
            })
            .await;
        Ok(())
    }

    /// Deliverers free for assignment right now
    pub async fn free_deliverers(&self) -> Result<Vec<Deliverer>, BoardError> {
        Ok(self.client.free_deliverers(&self.username).await?)
    }

    /// Stop polling; the cached list stays readable
    pub fn stop(&self) {
        self.orders.stop();
    }

    /// Stop polling and wait for the poll task to exit
    pub async fn shutdown(self) {
        self.orders.shutdown().await;
    }
}

fn replace_order(orders: &mut [Order], updated: Order) {
    if let Some(order) = orders.iter_mut().find(|o| o.id == updated.id) {
        *order = updated;
    }
}
