//! Notification feed
//!
//! Polls the notification list for a restaurant admin and tracks the
//! unread badge. Marking as read flips the cached flags immediately;
//! the next poll re-syncs with the server.

use std::time::Duration;

use shared::models::{Notification, unread_count};
use shared::session::{Role, Session, SessionError};

use crate::poll::{Poller, PollerHandle};
use crate::{ClientResult, HttpClient};

/// Live notification list for a restaurant admin
pub struct NotificationFeed {
    client: HttpClient,
    username: String,
    feed: PollerHandle<Notification>,
}

impl NotificationFeed {
    /// Start polling notifications for the session user
    pub fn new(
        client: HttpClient,
        session: &Session,
        poll_interval: Duration,
    ) -> Result<Self, SessionError> {
        session.require_role(Role::RestaurantAdmin)?;

        let username = session.username.clone();
        let fetch_client = client.clone();
        let fetch_username = username.clone();
        let feed = Poller::spawn("notifications", poll_interval, move || {
            let client = fetch_client.clone();
            let username = fetch_username.clone();
            async move { client.notifications(&username).await }
        });

        Ok(Self {
            client,
            username,
            feed,
        })
    }

    /// Snapshot of the polled notifications
    pub async fn notifications(&self) -> Vec<Notification> {
        self.feed.snapshot().await
    }

    /// Count for the unread badge
    pub async fn unread_count(&self) -> usize {
        unread_count(&self.feed.snapshot().await)
    }

    /// Mark everything read on the server, then flip the cached flags
    pub async fn mark_all_read(&self) -> ClientResult<()> {
        self.client.mark_notifications_read(&self.username).await?;
        self.feed
            .apply(|notifications| {
                for notification in notifications.iter_mut() {
                    notification.is_read = true;
                }
            })
            .await;
        Ok(())
    }

    /// Stop polling; the cached list stays readable
    pub fn stop(&self) {
        self.feed.stop();
    }

    /// Stop polling and wait for the poll task to exit
    pub async fn shutdown(self) {
        self.feed.shutdown().await;
    }
}
