//! Notification Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order notification shown to a restaurant admin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: i64,
    pub order_id: i64,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Count of notifications not yet marked read
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}
