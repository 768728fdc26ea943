//! HTTP client for the food-ordering REST API
//!
//! Thin typed layer over the platform endpoints. Every call returns a
//! [`ClientResult`]; non-success statuses are mapped onto [`ClientError`]
//! with the response text preserved.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use shared::models::{
    AssignRequest, Deliverer, DelivererId, FoodItem, FoodItemCreate, FoodItemUpdate, Notification,
    Order, OrderConfirmation, OrderCreate, OrderStatus, RestaurantMenu, RestaurantMenuGrouped,
    StatusUpdate,
};

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for making requests against the platform API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.get(self.url(path));

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let mut request = self.client.get(self.url(path)).query(query);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.post(self.url(path)).json(body);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.put(self.url(path)).json(body);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body, discarding the response body
    pub async fn put_unit<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<()> {
        let mut request = self.client.put(self.url(path)).json(body);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_empty_response(response).await
    }

    /// Make a PUT request without body, discarding the response body
    pub async fn put_empty(&self, path: &str) -> ClientResult<()> {
        let mut request = self.client.put(self.url(path));

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_empty_response(response).await
    }

    /// Make a DELETE request, discarding the response body
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let mut request = self.client.delete(self.url(path));

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_empty_response(response).await
    }

    /// Handle the HTTP response, parsing the body
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return Err(Self::map_error(status, text));
        }

        response.json().await.map_err(Into::into)
    }

    /// Handle the HTTP response when the body is irrelevant
    async fn handle_empty_response(response: reqwest::Response) -> ClientResult<()> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return Err(Self::map_error(status, text));
        }

        Ok(())
    }

    fn map_error(status: StatusCode, text: String) -> ClientError {
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(text),
            StatusCode::NOT_FOUND => ClientError::NotFound(text),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(text)
            }
            _ => ClientError::Server {
                status: status.as_u16(),
                message: text,
            },
        }
    }

    // ========== Customer API ==========

    /// Restaurants with their purchasable food items
    pub async fn restaurants_with_food_items(
        &self,
        username: &str,
    ) -> ClientResult<Vec<RestaurantMenu>> {
        self.get(&format!("restaurants-with-food-items/{username}"))
            .await
    }

    /// Place an order for the customer
    pub async fn create_order(
        &self,
        username: &str,
        order: &OrderCreate,
    ) -> ClientResult<OrderConfirmation> {
        self.post(&format!("customer/create-order/{username}"), order)
            .await
    }

    /// The customer's past orders
    pub async fn customer_orders(&self, username: &str) -> ClientResult<Vec<Order>> {
        self.get(&format!("customer/orders/{username}")).await
    }

    // ========== Order API ==========

    /// Orders of the restaurant managed by `username`
    pub async fn orders(&self, username: &str) -> ClientResult<Vec<Order>> {
        self.get(&format!("orders/{username}")).await
    }

    /// Today's orders assigned to a deliverer
    pub async fn today_orders(&self, deliverer_id: i64) -> ClientResult<Vec<Order>> {
        self.get(&format!("today_orders/{deliverer_id}")).await
    }

    /// Move an order to `status`
    pub async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> ClientResult<()> {
        self.put_unit(&format!("orders/{order_id}/status"), &StatusUpdate { status })
            .await
    }

    /// Undo a delivery: the order drops back to assigned
    pub async fn reset_order_status(&self, order_id: i64) -> ClientResult<()> {
        self.put_empty(&format!("orders/{order_id}/reset")).await
    }

    /// Approve a pending order, returning the updated order
    pub async fn approve_order(&self, order_id: i64) -> ClientResult<Order> {
        self.put(
            &format!("restaurant_admin/orders/{order_id}/approve"),
            &StatusUpdate {
                status: OrderStatus::Approved,
            },
        )
        .await
    }

    /// Assign an approved order to a deliverer, returning the updated order
    pub async fn assign_order(&self, order_id: i64, deliverer_id: i64) -> ClientResult<Order> {
        self.put(
            &format!("restaurant_admin/orders/{order_id}/assign"),
            &AssignRequest { deliverer_id },
        )
        .await
    }

    // ========== Deliverer API ==========

    /// Deliverers currently free for assignment
    pub async fn free_deliverers(&self, username: &str) -> ClientResult<Vec<Deliverer>> {
        self.get(&format!("deliverers/free/{username}")).await
    }

    /// Resolve a deliverer username to its id
    pub async fn deliverer_id(&self, username: &str) -> ClientResult<i64> {
        let DelivererId { id } = self.get(&format!("get-id-deliverer/{username}")).await?;
        Ok(id)
    }

    // ========== Notification API ==========

    /// Notifications for a restaurant admin
    pub async fn notifications(&self, username: &str) -> ClientResult<Vec<Notification>> {
        self.get(&format!("notifications/{username}")).await
    }

    /// Mark every notification of `username` as read
    pub async fn mark_notifications_read(&self, username: &str) -> ClientResult<()> {
        self.put_empty(&format!("notifications/mark_as_read/{username}"))
            .await
    }

    // ========== Menu Management API ==========

    /// The admin's menu, grouped by food type
    pub async fn active_food_items(&self, username: &str) -> ClientResult<RestaurantMenuGrouped> {
        self.get_with_query("active_food_items", &[("username", username)])
            .await
    }

    /// Create a food item. The payload is validated locally first.
    pub async fn create_food_item(&self, item: &FoodItemCreate) -> ClientResult<FoodItem> {
        item.validate()
            .map_err(|e| ClientError::Validation(e.to_string()))?;
        self.post("food_items", item).await
    }

    /// Update a food item. The payload is validated locally first.
    pub async fn update_food_item(
        &self,
        food_item_id: i64,
        update: &FoodItemUpdate,
    ) -> ClientResult<FoodItem> {
        update
            .validate()
            .map_err(|e| ClientError::Validation(e.to_string()))?;
        self.put(&format!("food_items/{food_item_id}"), update).await
    }

    /// Toggle whether a food item is purchasable
    pub async fn set_food_item_active(&self, food_item_id: i64, active: bool) -> ClientResult<()> {
        let action = if active { "activate" } else { "deactivate" };
        self.put_empty(&format!("food_items/{food_item_id}/{action}"))
            .await
    }

    /// Delete a food item
    pub async fn delete_food_item(&self, food_item_id: i64) -> ClientResult<()> {
        self.delete(&format!("food_items/{food_item_id}")).await
    }
}
