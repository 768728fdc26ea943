//! Customer shop
//!
//! The customer flow end to end: browse restaurant menus, build a cart,
//! check out. The menu list is fetched on demand rather than polled;
//! prices shown here are advisory and the server recomputes totals.

use chrono::{DateTime, Utc};
use thiserror::Error;

use shared::cart::{Cart, CartError};
use shared::models::{Order, OrderConfirmation, PaymentMethod, RestaurantMenu, search_menus};
use shared::session::{Role, Session, SessionError};

use crate::submit::{CheckoutForm, OrderSubmitter, SubmitError};
use crate::{ClientResult, HttpClient};

/// Shop failures
#[derive(Debug, Error)]
pub enum ShopError {
    /// The id does not belong to any loaded menu item
    #[error("food item {0} is not on any loaded menu")]
    UnknownItem(i64),

    /// Cart rejection
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Customer shop view
pub struct Shop {
    client: HttpClient,
    username: String,
    menus: Vec<RestaurantMenu>,
    cart: Cart,
    form: CheckoutForm,
    submitter: OrderSubmitter,
}

impl Shop {
    /// Open the shop for a customer session
    pub fn new(client: HttpClient, session: &Session) -> Result<Self, SessionError> {
        session.require_role(Role::Customer)?;

        let username = session.username.clone();
        let submitter = OrderSubmitter::new(client.clone(), username.clone());
        Ok(Self {
            client,
            username,
            menus: Vec::new(),
            cart: Cart::new(),
            form: CheckoutForm::default(),
            submitter,
        })
    }

    /// Load (or reload) the purchasable menus
    pub async fn load_menus(&mut self) -> ClientResult<()> {
        self.menus = self
            .client
            .restaurants_with_food_items(&self.username)
            .await?;
        tracing::debug!(menus = self.menus.len(), "Menus loaded");
        Ok(())
    }

    pub fn menus(&self) -> &[RestaurantMenu] {
        &self.menus
    }

    /// Menus filtered by a search query (prefix match on name or type)
    pub fn search(&self, query: &str) -> Vec<RestaurantMenu> {
        search_menus(&self.menus, query)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add a menu item to the cart, priced at this instant
    pub fn add_to_cart(&mut self, food_item_id: i64, quantity: i32) -> Result<(), ShopError> {
        let item = self
            .menus
            .iter()
            .flat_map(|menu| menu.food_items.iter())
            .find(|item| item.id == food_item_id)
            .ok_or(ShopError::UnknownItem(food_item_id))?;
        self.cart.add_item(item, quantity, Utc::now())?;
        Ok(())
    }

    /// Remove a cart line; no-op when absent
    pub fn remove_from_cart(&mut self, food_item_id: i64) {
        self.cart.remove_item(food_item_id);
    }

    /// Replace the quantity of a cart line
    pub fn set_quantity(&mut self, food_item_id: i64, quantity: i32) -> Result<(), ShopError> {
        self.cart.set_quantity(food_item_id, quantity)?;
        Ok(())
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.form.payment_method = Some(method);
    }

    pub fn set_delivery_time(&mut self, time: DateTime<Utc>) {
        self.form.delivery_time = Some(time);
    }

    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Whether a checkout is currently in flight
    pub fn is_submitting(&self) -> bool {
        self.submitter.is_submitting()
    }

    /// Submit the cart. On confirmation the cart and form reset for the
    /// next order; on failure both are left as they were.
    pub async fn checkout(&mut self) -> Result<OrderConfirmation, SubmitError> {
        let confirmation = self.submitter.submit(&self.cart, &self.form).await?;
        self.cart.clear();
        self.form = CheckoutForm::default();
        Ok(confirmation)
    }

    /// The customer's past orders
    pub async fn order_history(&self) -> ClientResult<Vec<Order>> {
        self.client.customer_orders(&self.username).await
    }
}
