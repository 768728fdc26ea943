// foodie-client/tests/client_integration.rs
// Integration tests against a mock platform API

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use tokio::sync::Mutex;

use foodie_client::{
    BoardError, CheckoutForm, ClientConfig, ClientError, HttpClient, NotificationFeed, OrderBoard,
    OrderSubmitter, Shop, SubmitError,
};
use shared::cart::Cart;
use shared::models::{
    AssignRequest, Deliverer, DelivererId, FoodItem, FoodItemCreate, FoodItemUpdate, FoodTypeGroup,
    Notification, Order, OrderConfirmation, OrderStatus, PaymentMethod, RestaurantMenu,
    RestaurantMenuGrouped, StatusUpdate,
};
use shared::session::{Role, Session, SessionError};
use shared::status::OrderAction;

// ========== Mock API ==========

#[derive(Default)]
struct Hits {
    orders: AtomicUsize,
    today_orders: AtomicUsize,
    create_order: AtomicUsize,
    approve: AtomicUsize,
    assign: AtomicUsize,
    status: AtomicUsize,
    reset: AtomicUsize,
    notifications: AtomicUsize,
    mark_read: AtomicUsize,
    food_items: AtomicUsize,
}

#[derive(Default)]
struct ApiState {
    menus: Mutex<Vec<RestaurantMenu>>,
    orders: Mutex<Vec<Order>>,
    notifications: Mutex<Vec<Notification>>,
    deliverers: Mutex<Vec<Deliverer>>,
    created_orders: Mutex<Vec<serde_json::Value>>,
    create_order_delay_ms: AtomicU64,
    hits: Hits,
}

async fn list_menus(
    State(state): State<Arc<ApiState>>,
    Path(_username): Path<String>,
) -> Json<Vec<RestaurantMenu>> {
    Json(state.menus.lock().await.clone())
}

async fn create_order(
    State(state): State<Arc<ApiState>>,
    Path(_username): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Json<OrderConfirmation> {
    state.hits.create_order.fetch_add(1, Ordering::SeqCst);
    let delay = state.create_order_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    state.created_orders.lock().await.push(body);
    Json(OrderConfirmation {
        id: 101,
        status: OrderStatus::Pending,
        total_price: Some(23.33),
    })
}

async fn customer_orders(
    State(state): State<Arc<ApiState>>,
    Path(_username): Path<String>,
) -> Json<Vec<Order>> {
    Json(state.orders.lock().await.clone())
}

async fn list_orders(
    State(state): State<Arc<ApiState>>,
    Path(username): Path<String>,
) -> Result<Json<Vec<Order>>, (StatusCode, String)> {
    let calls = state.hits.orders.fetch_add(1, Ordering::SeqCst);
    match username.as_str() {
        "missing" => Err((StatusCode::NOT_FOUND, "no restaurant for user".to_string())),
        "badreq" => Err((StatusCode::BAD_REQUEST, "malformed request".to_string())),
        "broken" => Err((StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string())),
        // first call succeeds, everything after fails
        "flaky" if calls > 0 => Err((StatusCode::INTERNAL_SERVER_ERROR, "flaky".to_string())),
        _ => Ok(Json(state.orders.lock().await.clone())),
    }
}

async fn today_orders(
    State(state): State<Arc<ApiState>>,
    Path(_deliverer_id): Path<i64>,
) -> Json<Vec<Order>> {
    state.hits.today_orders.fetch_add(1, Ordering::SeqCst);
    Json(state.orders.lock().await.clone())
}

async fn update_status(
    State(state): State<Arc<ApiState>>,
    Path(order_id): Path<i64>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    state.hits.status.fetch_add(1, Ordering::SeqCst);
    let mut orders = state.orders.lock().await;
    let order = orders
        .iter_mut()
        .find(|o| o.id == order_id)
        .ok_or((StatusCode::NOT_FOUND, "order not found".to_string()))?;
    order.status = body.status;
    Ok(Json(serde_json::json!({ "message": "status updated" })))
}

async fn reset_status(
    State(state): State<Arc<ApiState>>,
    Path(order_id): Path<i64>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    state.hits.reset.fetch_add(1, Ordering::SeqCst);
    let mut orders = state.orders.lock().await;
    let order = orders
        .iter_mut()
        .find(|o| o.id == order_id)
        .ok_or((StatusCode::NOT_FOUND, "order not found".to_string()))?;
    order.status = OrderStatus::Assigned;
    order.delivered_time = None;
    Ok(Json(serde_json::json!({ "message": "delivery reset" })))
}

async fn approve_order(
    State(state): State<Arc<ApiState>>,
    Path(order_id): Path<i64>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Order>, (StatusCode, String)> {
    state.hits.approve.fetch_add(1, Ordering::SeqCst);
    let mut orders = state.orders.lock().await;
    let order = orders
        .iter_mut()
        .find(|o| o.id == order_id)
        .ok_or((StatusCode::NOT_FOUND, "order not found".to_string()))?;
    order.status = body.status;
    Ok(Json(order.clone()))
}

async fn assign_order(
    State(state): State<Arc<ApiState>>,
    Path(order_id): Path<i64>,
    Json(body): Json<AssignRequest>,
) -> Result<Json<Order>, (StatusCode, String)> {
    state.hits.assign.fetch_add(1, Ordering::SeqCst);
    let mut orders = state.orders.lock().await;
    let order = orders
        .iter_mut()
        .find(|o| o.id == order_id)
        .ok_or((StatusCode::NOT_FOUND, "order not found".to_string()))?;
    order.status = OrderStatus::Assigned;
    order.deliverer_username = Some(format!("deliverer-{}", body.deliverer_id));
    Ok(Json(order.clone()))
}

async fn free_deliverers(
    State(state): State<Arc<ApiState>>,
    Path(_username): Path<String>,
) -> Json<Vec<Deliverer>> {
    Json(state.deliverers.lock().await.clone())
}

async fn deliverer_id(Path(_username): Path<String>) -> Json<DelivererId> {
    Json(DelivererId { id: 5 })
}

async fn list_notifications(
    State(state): State<Arc<ApiState>>,
    Path(_username): Path<String>,
) -> Json<Vec<Notification>> {
    state.hits.notifications.fetch_add(1, Ordering::SeqCst);
    Json(state.notifications.lock().await.clone())
}

async fn mark_notifications_read(
    State(state): State<Arc<ApiState>>,
    Path(_username): Path<String>,
) -> Json<serde_json::Value> {
    state.hits.mark_read.fetch_add(1, Ordering::SeqCst);
    for notification in state.notifications.lock().await.iter_mut() {
        notification.is_read = true;
    }
    Json(serde_json::json!({ "message": "marked" }))
}

async fn active_food_items(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<RestaurantMenuGrouped>, (StatusCode, String)> {
    let username = params
        .get("username")
        .ok_or((StatusCode::BAD_REQUEST, "username required".to_string()))?;
    Ok(Json(RestaurantMenuGrouped {
        restaurant_name: format!("{username}'s place"),
        food_items: vec![FoodTypeGroup {
            food_type: "pizza".to_string(),
            food_items: vec![food_item(1, 1, 8.5)],
        }],
    }))
}

async fn create_food_item(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<FoodItemCreate>,
) -> Json<FoodItem> {
    state.hits.food_items.fetch_add(1, Ordering::SeqCst);
    Json(FoodItem {
        id: 99,
        name: body.name,
        description: body.description,
        price: body.price,
        discount_price: body.discount_price,
        discount_start: body.discount_start,
        discount_end: body.discount_end,
        food_type: body.food_type,
        restaurant_id: body.restaurant_id,
        is_active: true,
    })
}

async fn update_food_item(
    State(state): State<Arc<ApiState>>,
    Path(food_item_id): Path<i64>,
    Json(body): Json<FoodItemUpdate>,
) -> Json<FoodItem> {
    state.hits.food_items.fetch_add(1, Ordering::SeqCst);
    let mut item = food_item(food_item_id, 1, 8.5);
    if let Some(price) = body.price {
        item.price = price;
    }
    if let Some(name) = body.name {
        item.name = name;
    }
    Json(item)
}

async fn toggle_food_item(
    State(state): State<Arc<ApiState>>,
    Path((_food_item_id, _action)): Path<(i64, String)>,
) -> Json<serde_json::Value> {
    state.hits.food_items.fetch_add(1, Ordering::SeqCst);
    Json(serde_json::json!({ "message": "ok" }))
}

async fn delete_food_item(
    State(state): State<Arc<ApiState>>,
    Path(_food_item_id): Path<i64>,
) -> Json<serde_json::Value> {
    state.hits.food_items.fetch_add(1, Ordering::SeqCst);
    Json(serde_json::json!({ "message": "deleted" }))
}

async fn spawn_mock(state: Arc<ApiState>) -> String {
    let app = Router::new()
        .route("/restaurants-with-food-items/{username}", get(list_menus))
        .route("/customer/create-order/{username}", post(create_order))
        .route("/customer/orders/{username}", get(customer_orders))
        .route("/orders/{username}", get(list_orders))
        .route("/today_orders/{deliverer_id}", get(today_orders))
        .route("/orders/{order_id}/status", put(update_status))
        .route("/orders/{order_id}/reset", put(reset_status))
        .route("/restaurant_admin/orders/{order_id}/approve", put(approve_order))
        .route("/restaurant_admin/orders/{order_id}/assign", put(assign_order))
        .route("/deliverers/free/{username}", get(free_deliverers))
        .route("/get-id-deliverer/{username}", get(deliverer_id))
        .route("/notifications/{username}", get(list_notifications))
        .route("/notifications/mark_as_read/{username}", put(mark_notifications_read))
        .route("/active_food_items", get(active_food_items))
        .route("/food_items", post(create_food_item))
        .route(
            "/food_items/{food_item_id}",
            put(update_food_item).delete(delete_food_item),
        )
        .route("/food_items/{food_item_id}/{action}", put(toggle_food_item))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

// ========== Fixtures ==========

fn food_item(id: i64, restaurant_id: i64, price: f64) -> FoodItem {
    FoodItem {
        id,
        name: format!("item-{id}"),
        description: None,
        price,
        discount_price: None,
        discount_start: None,
        discount_end: None,
        food_type: "pizza".to_string(),
        restaurant_id,
        is_active: true,
    }
}

fn order(id: i64, status: OrderStatus) -> Order {
    Order {
        id,
        customer_name: Some("mario".to_string()),
        restaurant_name: Some("Luigi".to_string()),
        deliverer_username: None,
        status,
        total_price: 23.33,
        payment_method: "cash".to_string(),
        delivery_time: Some(Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap()),
        delivered_time: None,
        created_at: None,
        food_items: Vec::new(),
    }
}

fn notification(id: i64, is_read: bool) -> Notification {
    Notification {
        id,
        order_id: id * 10,
        is_read,
        created_at: None,
    }
}

async fn client_for(state: &Arc<ApiState>) -> HttpClient {
    let base_url = spawn_mock(Arc::clone(state)).await;
    ClientConfig::new(base_url)
        .with_token("test-token")
        .with_timeout(5)
        .build_http_client()
}

fn admin_session() -> Session {
    Session::new("tok", "luigi", Role::RestaurantAdmin)
}

fn deliverer_session() -> Session {
    Session::new("tok", "dave", Role::Deliverer)
}

fn customer_session() -> Session {
    Session::new("tok", "mario", Role::Customer)
}

const FAST_POLL: Duration = Duration::from_millis(25);
const SLOW_POLL: Duration = Duration::from_secs(3600);

// ========== HTTP client ==========

#[tokio::test]
async fn test_fetch_menus_parses_discount_fields() {
    let state = Arc::new(ApiState::default());
    let mut discounted = food_item(2, 1, 10.0);
    discounted.discount_price = Some(7.5);
    discounted.discount_start = Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
    discounted.discount_end = Some(Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap());
    *state.menus.lock().await = vec![RestaurantMenu {
        id: 1,
        restaurant_name: "Luigi".to_string(),
        food_items: vec![food_item(1, 1, 8.5), discounted],
    }];

    let client = client_for(&state).await;
    let menus = client.restaurants_with_food_items("mario").await.unwrap();

    assert_eq!(menus.len(), 1);
    assert_eq!(menus[0].food_items.len(), 2);
    assert_eq!(menus[0].food_items[1].discount_price, Some(7.5));
}

#[tokio::test]
async fn test_error_mapping_from_status_codes() {
    let state = Arc::new(ApiState::default());
    let client = client_for(&state).await;

    let err = client.orders("missing").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(msg) if msg.contains("no restaurant")));

    let err = client.orders("badreq").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    let err = client.orders("broken").await.unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 500, .. }));
}

#[tokio::test]
async fn test_network_error_without_server() {
    // nothing listens on this port
    let client = ClientConfig::new("http://127.0.0.1:9")
        .with_timeout(1)
        .build_http_client();
    let err = client.orders("luigi").await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
}

#[tokio::test]
async fn test_food_item_endpoints() {
    let state = Arc::new(ApiState::default());
    let client = client_for(&state).await;

    let created = client
        .create_food_item(&FoodItemCreate {
            name: "Calzone".to_string(),
            description: None,
            price: 9.0,
            discount_price: None,
            discount_start: None,
            discount_end: None,
            food_type: "pizza".to_string(),
            restaurant_id: 1,
        })
        .await
        .unwrap();
    assert_eq!(created.id, 99);
    assert_eq!(created.name, "Calzone");

    let updated = client
        .update_food_item(
            3,
            &FoodItemUpdate {
                price: Some(11.5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, 11.5);

    client.set_food_item_active(3, false).await.unwrap();
    client.delete_food_item(3).await.unwrap();
    assert_eq!(state.hits.food_items.load(Ordering::SeqCst), 4);

    let grouped = client.active_food_items("luigi").await.unwrap();
    assert_eq!(grouped.restaurant_name, "luigi's place");
    assert_eq!(grouped.food_items[0].food_type, "pizza");
}

#[tokio::test]
async fn test_invalid_food_item_payload_never_reaches_the_network() {
    let state = Arc::new(ApiState::default());
    let client = client_for(&state).await;

    let err = client
        .create_food_item(&FoodItemCreate {
            name: "Calzone".to_string(),
            description: None,
            price: -1.0,
            discount_price: None,
            discount_start: None,
            discount_end: None,
            food_type: "pizza".to_string(),
            restaurant_id: 1,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(state.hits.food_items.load(Ordering::SeqCst), 0);
}

// ========== Order submission ==========

fn cart_with_lines() -> Cart {
    let mut cart = Cart::new();
    cart.add_item(&food_item(1, 1, 10.0), 2, Utc::now()).unwrap();
    cart.add_item(&food_item(2, 1, 3.33), 1, Utc::now()).unwrap();
    cart
}

fn checkout_form() -> CheckoutForm {
    CheckoutForm::default()
        .with_payment_method(PaymentMethod::CreditCard)
        .with_delivery_time(Utc::now() + chrono::Duration::hours(2))
}

#[tokio::test]
async fn test_submit_posts_cart_payload() {
    let state = Arc::new(ApiState::default());
    let client = client_for(&state).await;
    let submitter = OrderSubmitter::new(client, "mario");

    let confirmation = submitter
        .submit(&cart_with_lines(), &checkout_form())
        .await
        .unwrap();
    assert_eq!(confirmation.id, 101);
    assert_eq!(confirmation.status, OrderStatus::Pending);

    let bodies = state.created_orders.lock().await;
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["payment_method"], "credit_card");
    assert_eq!(body["cart"][0]["food_item_id"], 1);
    assert_eq!(body["cart"][0]["quantity"], 2);
    assert_eq!(body["cart"][0]["price"], 10.0);
    assert_eq!(body["cart"][1]["food_item_id"], 2);
    assert!(body["delivery_time"].is_string());
}

#[tokio::test]
async fn test_submit_validation_failures_skip_the_network() {
    let state = Arc::new(ApiState::default());
    let client = client_for(&state).await;
    let submitter = OrderSubmitter::new(client, "mario");

    // empty cart
    let err = submitter.submit(&Cart::new(), &checkout_form()).await.unwrap_err();
    assert!(matches!(err, SubmitError::Validation(_)));

    // missing payment method
    let form = CheckoutForm::default().with_delivery_time(Utc::now() + chrono::Duration::hours(1));
    let err = submitter.submit(&cart_with_lines(), &form).await.unwrap_err();
    assert!(matches!(err, SubmitError::Validation(_)));

    // delivery time in the past
    let form = checkout_form().with_delivery_time(Utc::now() - chrono::Duration::hours(1));
    let err = submitter.submit(&cart_with_lines(), &form).await.unwrap_err();
    assert!(matches!(err, SubmitError::Validation(_)));

    assert_eq!(state.hits.create_order.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_second_submit_rejected_while_first_in_flight() {
    let state = Arc::new(ApiState::default());
    state.create_order_delay_ms.store(200, Ordering::SeqCst);
    let client = client_for(&state).await;
    let submitter = OrderSubmitter::new(client, "mario");

    let first = {
        let submitter = submitter.clone();
        let cart = cart_with_lines();
        let form = checkout_form();
        tokio::spawn(async move { submitter.submit(&cart, &form).await })
    };

    // let the first submission reach the wire
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(submitter.is_submitting());

    let err = submitter
        .submit(&cart_with_lines(), &checkout_form())
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::AlreadySubmitting));

    first.await.unwrap().unwrap();
    assert!(!submitter.is_submitting());
    assert_eq!(state.hits.create_order.load(Ordering::SeqCst), 1);

    // once settled, the next submission goes through
    submitter
        .submit(&cart_with_lines(), &checkout_form())
        .await
        .unwrap();
    assert_eq!(state.hits.create_order.load(Ordering::SeqCst), 2);
}

// ========== Order boards ==========

#[tokio::test]
async fn test_restaurant_board_approve_flow() {
    let state = Arc::new(ApiState::default());
    *state.orders.lock().await = vec![order(1, OrderStatus::Pending), order(2, OrderStatus::Assigned)];
    let client = client_for(&state).await;

    let board = OrderBoard::restaurant_admin(client, &admin_session(), FAST_POLL).unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;

    let orders = board.orders().await;
    assert_eq!(orders.len(), 2);
    assert_eq!(board.actions_for(&orders[0]), vec![OrderAction::Approve]);

    board.approve(1).await.unwrap();
    assert_eq!(state.hits.approve.load(Ordering::SeqCst), 1);

    // optimistic patch is visible without waiting for the next poll
    let approved = board
        .orders()
        .await
        .into_iter()
        .find(|o| o.id == 1)
        .unwrap();
    assert_eq!(approved.status, OrderStatus::Approved);

    // approving again is rejected locally
    let err = board.approve(1).await.unwrap_err();
    assert!(matches!(
        err,
        BoardError::NotAllowed {
            status: OrderStatus::Approved,
            action: OrderAction::Approve
        }
    ));
    assert_eq!(state.hits.approve.load(Ordering::SeqCst), 1);

    board.shutdown().await;
}

#[tokio::test]
async fn test_restaurant_board_assign_flow() {
    let state = Arc::new(ApiState::default());
    *state.orders.lock().await = vec![order(1, OrderStatus::Approved)];
    *state.deliverers.lock().await = vec![Deliverer {
        id: 5,
        username: "dave".to_string(),
    }];
    let client = client_for(&state).await;

    let board = OrderBoard::restaurant_admin(client, &admin_session(), FAST_POLL).unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;

    let free = board.free_deliverers().await.unwrap();
    assert_eq!(free.len(), 1);

    board.assign(1, free[0].id).await.unwrap();
    let assigned = board.orders().await.pop().unwrap();
    assert_eq!(assigned.status, OrderStatus::Assigned);
    assert_eq!(assigned.deliverer_username.as_deref(), Some("deliverer-5"));

    board.shutdown().await;
}

#[tokio::test]
async fn test_board_rejects_actions_for_wrong_stage_or_role() {
    let state = Arc::new(ApiState::default());
    *state.orders.lock().await = vec![order(1, OrderStatus::Pending)];
    let client = client_for(&state).await;

    let board = OrderBoard::restaurant_admin(client, &admin_session(), FAST_POLL).unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;

    // skipping a stage fails locally
    let err = board.assign(1, 5).await.unwrap_err();
    assert!(matches!(err, BoardError::NotAllowed { .. }));

    // deliverer-only action on an admin board fails locally
    let err = board.mark_delivered(1).await.unwrap_err();
    assert!(matches!(err, BoardError::NotAllowed { .. }));

    // unknown order id counts as unknown status
    let err = board.approve(999).await.unwrap_err();
    assert!(matches!(
        err,
        BoardError::NotAllowed {
            status: OrderStatus::Unknown,
            ..
        }
    ));

    assert_eq!(state.hits.assign.load(Ordering::SeqCst), 0);
    assert_eq!(state.hits.status.load(Ordering::SeqCst), 0);
    assert_eq!(state.hits.approve.load(Ordering::SeqCst), 0);

    board.shutdown().await;
}

#[tokio::test]
async fn test_deliverer_board_deliver_and_reset() {
    let state = Arc::new(ApiState::default());
    *state.orders.lock().await = vec![order(3, OrderStatus::Assigned)];
    let client = client_for(&state).await;

    let board = OrderBoard::deliverer(client, &deliverer_session(), FAST_POLL)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(state.hits.today_orders.load(Ordering::SeqCst) >= 1);

    board.mark_delivered(3).await.unwrap();
    let delivered = board.orders().await.pop().unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert!(delivered.delivered_time.is_some());
    assert_eq!(state.hits.status.load(Ordering::SeqCst), 1);

    board.reset_delivery(3).await.unwrap();
    let reset = board.orders().await.pop().unwrap();
    assert_eq!(reset.status, OrderStatus::Assigned);
    assert!(reset.delivered_time.is_none());
    assert_eq!(state.hits.reset.load(Ordering::SeqCst), 1);

    board.shutdown().await;
}

#[tokio::test]
async fn test_board_construction_is_role_gated() {
    let state = Arc::new(ApiState::default());
    let client = client_for(&state).await;

    let err = OrderBoard::restaurant_admin(client.clone(), &customer_session(), SLOW_POLL)
        .err()
        .unwrap();
    assert!(matches!(
        err,
        BoardError::Session(SessionError::RoleMismatch { .. })
    ));

    let err = OrderBoard::deliverer(client, &admin_session(), SLOW_POLL)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, BoardError::Session(_)));
}

#[tokio::test]
async fn test_board_keeps_stale_list_when_polls_fail() {
    let state = Arc::new(ApiState::default());
    *state.orders.lock().await = vec![order(1, OrderStatus::Pending)];
    let client = client_for(&state).await;

    // "flaky": first fetch succeeds, later ones return 500
    let session = Session::new("tok", "flaky", Role::RestaurantAdmin);
    let board = OrderBoard::restaurant_admin(client, &session, FAST_POLL).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(state.hits.orders.load(Ordering::SeqCst) >= 3);
    let orders = board.orders().await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, 1);

    board.shutdown().await;
}

// ========== Notification feed ==========

#[tokio::test]
async fn test_notification_feed_unread_badge_and_mark_read() {
    let state = Arc::new(ApiState::default());
    *state.notifications.lock().await = vec![
        notification(1, false),
        notification(2, true),
        notification(3, false),
    ];
    let client = client_for(&state).await;

    // slow interval: only the initial fetch runs, so the flip below is
    // observably local
    let feed = NotificationFeed::new(client, &admin_session(), SLOW_POLL).unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;

    assert_eq!(feed.unread_count().await, 2);

    feed.mark_all_read().await.unwrap();
    assert_eq!(state.hits.mark_read.load(Ordering::SeqCst), 1);
    assert_eq!(feed.unread_count().await, 0);
    assert!(feed.notifications().await.iter().all(|n| n.is_read));

    feed.shutdown().await;
}

#[tokio::test]
async fn test_notification_feed_is_role_gated() {
    let state = Arc::new(ApiState::default());
    let client = client_for(&state).await;

    let err = NotificationFeed::new(client, &deliverer_session(), SLOW_POLL)
        .err()
        .unwrap();
    assert!(matches!(err, SessionError::RoleMismatch { .. }));
}

// ========== Shop ==========

#[tokio::test]
async fn test_shop_browse_add_and_checkout() {
    let state = Arc::new(ApiState::default());
    *state.menus.lock().await = vec![
        RestaurantMenu {
            id: 1,
            restaurant_name: "Luigi".to_string(),
            food_items: vec![food_item(1, 1, 10.0), food_item(2, 1, 3.33)],
        },
        RestaurantMenu {
            id: 2,
            restaurant_name: "Sakura".to_string(),
            food_items: vec![food_item(3, 2, 12.0)],
        },
    ];
    let client = client_for(&state).await;

    let mut shop = Shop::new(client, &customer_session()).unwrap();
    shop.load_menus().await.unwrap();
    assert_eq!(shop.menus().len(), 2);

    shop.add_to_cart(1, 2).unwrap();
    shop.add_to_cart(2, 1).unwrap();
    assert_eq!(shop.cart().total_price(), 23.33);

    // cross-restaurant add is rejected and the cart stays intact
    assert!(shop.add_to_cart(3, 1).is_err());
    assert_eq!(shop.cart().len(), 2);

    shop.set_payment_method(PaymentMethod::Cash);
    shop.set_delivery_time(Utc::now() + chrono::Duration::hours(1));

    let confirmation = shop.checkout().await.unwrap();
    assert_eq!(confirmation.id, 101);
    // confirmed checkout clears the cart and form
    assert!(shop.cart().is_empty());
    assert!(shop.form().payment_method.is_none());

    let history = shop.order_history().await.unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_shop_checkout_failure_preserves_cart() {
    let state = Arc::new(ApiState::default());
    *state.menus.lock().await = vec![RestaurantMenu {
        id: 1,
        restaurant_name: "Luigi".to_string(),
        food_items: vec![food_item(1, 1, 10.0)],
    }];
    let client = client_for(&state).await;

    let mut shop = Shop::new(client, &customer_session()).unwrap();
    shop.load_menus().await.unwrap();
    shop.add_to_cart(1, 1).unwrap();
    // no payment method selected
    shop.set_delivery_time(Utc::now() + chrono::Duration::hours(1));

    let err = shop.checkout().await.unwrap_err();
    assert!(matches!(err, SubmitError::Validation(_)));
    assert_eq!(shop.cart().len(), 1);
    assert_eq!(state.hits.create_order.load(Ordering::SeqCst), 0);
}
