//! Foodie Client - typed API client and view-model core
//!
//! Client-side core of the food-ordering platform: a typed HTTP client
//! over the REST API plus the view-models the front ends render from
//! (customer shop, order boards, notification feed). All live lists are
//! kept fresh by polling; the server stays authoritative for every
//! state transition and total.

pub mod config;
pub mod error;
pub mod http;
pub mod notifications;
pub mod orders;
pub mod poll;
pub mod shop;
pub mod submit;

// Re-exports
pub use config::{ClientConfig, DEFAULT_POLL_INTERVAL};
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use notifications::NotificationFeed;
pub use orders::{BoardError, OrderBoard};
pub use poll::{FetchList, Poller, PollerHandle};
pub use shop::{Shop, ShopError};
pub use submit::{CheckoutForm, OrderSubmitter, SubmitError, build_order};

// Shared-type re-exports for downstream convenience
pub use shared::cart::{Cart, CartError, CartLine};
pub use shared::models::{
    FoodItem, Notification, Order, OrderStatus, PaymentMethod, RestaurantMenu,
};
pub use shared::session::{Role, Session, SessionError, SessionStore};
pub use shared::status::{OrderAction, allowed_actions};
