//! Data models
//!
//! Shared between the API client and any front end. All IDs are `i64`
//! (server-assigned integer primary keys); prices are `f64` on the wire.

pub mod deliverer;
pub mod food_item;
pub mod notification;
pub mod order;
pub mod restaurant;

// Re-exports
pub use deliverer::*;
pub use food_item::*;
pub use notification::*;
pub use order::*;
pub use restaurant::*;
