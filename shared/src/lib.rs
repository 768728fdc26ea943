//! Shared types for the food-ordering platform client
//!
//! Domain models, request payloads, and the pure client-side logic
//! (cart, discount pricing, status actions, session context) used by
//! any front end built on top of the API client.

pub mod cart;
pub mod models;
pub mod money;
pub mod pricing;
pub mod session;
pub mod status;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use cart::{Cart, CartError, CartLine};
pub use models::{FoodItem, Notification, Order, OrderStatus, PaymentMethod, RestaurantMenu};
pub use session::{Role, Session, SessionError, SessionStore};
pub use status::{allowed_actions, permits, OrderAction};
