//! Notification feed stores.
//!
//! Two deliberately distinct views over the same endpoint. The bell widget
//! filters to unread and removes items locally when they are marked read
//! (no re-fetch); the full page keeps everything visible and just flips
//! flags in place. They also disagree on what "read" means — the bell
//! checks only the `isRead` flag, the page also honors `readBy` — and that
//! asymmetry is preserved on purpose.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::debug;

use arcadectl_core::{Notification, Result};

use crate::api::CatalogApi;

/// How often the bell widget re-polls in watch mode.
pub const BELL_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Where a notification points: the comment that was replied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub app_id: String,
    /// Comment to scroll to and highlight at the destination
    pub comment_id: String,
}

impl NavigationTarget {
    fn of(notification: &Notification) -> Self {
        Self {
            app_id: notification.app_id.clone(),
            comment_id: notification.parent_id.clone(),
        }
    }
}

/// Unread-only bell view. Poll-driven; mark-read is an optimistic local
/// removal.
pub struct BellFeed {
    api: Arc<dyn CatalogApi>,
    items: Mutex<Vec<Notification>>,
}

impl BellFeed {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            items: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.items.lock().expect("bell feed lock")
    }

    /// Fetch and keep only unread items, in server order.
    pub async fn poll(&self) -> Result<()> {
        let all = self.api.notifications().await?;
        let unread: Vec<Notification> = all.into_iter().filter(|n| !n.is_read_flag()).collect();
        debug!(unread = unread.len(), "bell feed polled");
        *self.lock() = unread;
        Ok(())
    }

    pub fn unread(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// Unread counter behind the bell icon.
    pub fn unread_count(&self) -> usize {
        self.lock().len()
    }

    /// Mark one notification read and drop it from the view immediately,
    /// without re-fetching. Idempotent: an id already absent from the list
    /// is not an error (the server contract is assumed idempotent too).
    pub async fn mark_read(&self, id: &str) -> Result<()> {
        self.api.mark_notification_read(id).await?;
        self.lock().retain(|n| n.id != id);
        Ok(())
    }

    /// Bulk mark; the bell view clears entirely.
    pub async fn mark_all_read(&self) -> Result<()> {
        self.api.mark_all_notifications_read().await?;
        self.lock().clear();
        Ok(())
    }
}

/// Full notifications page: everything stays visible, read items are only
/// de-emphasized.
pub struct NotificationPage {
    api: Arc<dyn CatalogApi>,
    /// Session user id, for the `readBy` half of the read check
    user_id: String,
    items: Mutex<Vec<Notification>>,
}

impl NotificationPage {
    pub fn new(api: Arc<dyn CatalogApi>, user_id: impl Into<String>) -> Self {
        Self {
            api,
            user_id: user_id.into(),
            items: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.items.lock().expect("notification page lock")
    }

    /// Fetch once on entry; keeps all items in server order.
    pub async fn refresh(&self) -> Result<()> {
        let all = self.api.notifications().await?;
        *self.lock() = all;
        Ok(())
    }

    pub fn items(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// The page-view read check: flag OR `readBy` membership.
    pub fn is_read(&self, notification: &Notification) -> bool {
        notification.is_read_for(&self.user_id)
    }

    /// Flip the flag in place; the item stays visible.
    pub async fn mark_read(&self, id: &str) -> Result<()> {
        self.api.mark_notification_read(id).await?;
        if let Some(n) = self.lock().iter_mut().find(|n| n.id == id) {
            n.is_read = true;
        }
        Ok(())
    }

    pub async fn mark_all_read(&self) -> Result<()> {
        self.api.mark_all_notifications_read().await?;
        for n in self.lock().iter_mut() {
            n.is_read = true;
        }
        Ok(())
    }

    /// Mark read as a side effect and hand back where the notification
    /// points, so the caller can jump to the source comment.
    pub async fn open(&self, id: &str) -> Result<NavigationTarget> {
        let target = {
            let items = self.lock();
            items
                .iter()
                .find(|n| n.id == id)
                .map(NavigationTarget::of)
        };
        let target = target.ok_or_else(|| {
            arcadectl_core::ArcadeError::validation(format!("unknown notification id {id}"))
        })?;
        self.mark_read(id).await?;
        Ok(target)
    }
}
