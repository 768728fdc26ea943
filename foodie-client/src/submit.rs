//! Order submission
//!
//! Validates the checkout form locally, then posts the order. At most one
//! submission is in flight per submitter; a failed submission returns the
//! API error unmodified and is never retried automatically.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use thiserror::Error;

use shared::cart::Cart;
use shared::models::{OrderConfirmation, OrderCreate, PaymentMethod};

use crate::{ClientError, HttpClient};

/// Submission failures
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A precondition failed; nothing was sent
    #[error("invalid order: {0}")]
    Validation(&'static str),

    /// A submission is already in flight for this submitter
    #[error("an order submission is already in flight")]
    AlreadySubmitting,

    /// The API call failed; surfaced unmodified
    #[error(transparent)]
    Api(#[from] ClientError),
}

/// Checkout form state as the customer filled it
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub payment_method: Option<PaymentMethod>,
    pub delivery_time: Option<DateTime<Utc>>,
}

impl CheckoutForm {
    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn with_delivery_time(mut self, time: DateTime<Utc>) -> Self {
        self.delivery_time = Some(time);
        self
    }
}

/// Build and validate the create-order payload.
///
/// Fails with the first violated precondition; no network is involved.
/// `now` is the instant the delivery time is checked against.
pub fn build_order(
    cart: &Cart,
    form: &CheckoutForm,
    now: DateTime<Utc>,
) -> Result<OrderCreate, SubmitError> {
    let payment_method = form
        .payment_method
        .ok_or(SubmitError::Validation("payment method is not selected"))?;
    if cart.is_empty() {
        return Err(SubmitError::Validation("cart is empty"));
    }
    let delivery_time = form
        .delivery_time
        .ok_or(SubmitError::Validation("delivery time is not set"))?;
    if delivery_time < now {
        return Err(SubmitError::Validation("delivery time is in the past"));
    }

    Ok(OrderCreate {
        cart: cart.order_items(),
        payment_method,
        delivery_time,
    })
}

/// Submits orders for one customer, one at a time
#[derive(Debug, Clone)]
pub struct OrderSubmitter {
    client: HttpClient,
    username: String,
    in_flight: Arc<AtomicBool>,
}

impl OrderSubmitter {
    pub fn new(client: HttpClient, username: impl Into<String>) -> Self {
        Self {
            client,
            username: username.into(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a submission is currently in flight
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Validate and post the order built from `cart` and `form`.
    ///
    /// The cart is only read; the caller clears it after a confirmed
    /// submission.
    pub async fn submit(
        &self,
        cart: &Cart,
        form: &CheckoutForm,
    ) -> Result<OrderConfirmation, SubmitError> {
        let order = build_order(cart, form, Utc::now())?;

        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(SubmitError::AlreadySubmitting);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let confirmation = self.client.create_order(&self.username, &order).await?;
        tracing::info!(
            order_id = confirmation.id,
            total_lines = order.cart.len(),
            "Order submitted"
        );
        Ok(confirmation)
    }
}

/// Clears the in-flight flag when the submission resolves, error paths
/// included.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
