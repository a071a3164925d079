//! The catalog API surface, as a trait.
//!
//! One method per backend endpoint, nothing more: no retries, no caching,
//! no local interpretation of server-side ordering.

use async_trait::async_trait;

use arcadectl_core::models::{AdminPagination, AdminSort, StatusFilter};
use arcadectl_core::{Comment, Notification, Result, SessionUser, SortOrder};

/// Query parameters for `GET /api/comments/admin/all`.
#[derive(Debug, Clone)]
pub struct AdminQuery {
    pub page: usize,
    pub limit: usize,
    pub status: StatusFilter,
    pub sort_by: AdminSort,
    pub search: Option<String>,
}

impl Default for AdminQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            status: StatusFilter::All,
            sort_by: AdminSort::Newest,
            search: None,
        }
    }
}

/// Response envelope of the admin overview endpoint.
#[derive(Debug, Clone)]
pub struct AdminOverview {
    pub comments: Vec<Comment>,
    pub pagination: AdminPagination,
}

/// Everything the backend exposes to this client.
///
/// Anonymous calls are legal: implementations attach whatever credentials
/// exist and never block on their absence.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_comments(&self, app_id: &str, sort: SortOrder) -> Result<Vec<Comment>>;
    async fn post_comment(&self, app_id: &str, content: &str) -> Result<Comment>;
    async fn post_reply(&self, comment_id: &str, content: &str) -> Result<()>;
    async fn edit_comment(&self, comment_id: &str, content: &str) -> Result<()>;
    /// Owner variant of delete
    async fn delete_comment(&self, comment_id: &str) -> Result<()>;
    /// Moderator variant of delete; same visible effect, different endpoint
    async fn admin_delete_comment(&self, comment_id: &str) -> Result<()>;
    async fn pin_comment(&self, comment_id: &str) -> Result<()>;
    async fn block_user(&self, user_id: &str, reason: &str) -> Result<()>;

    async fn admin_overview(&self, query: &AdminQuery) -> Result<AdminOverview>;
    async fn admin_mark_read(&self, comment_id: &str) -> Result<()>;
    async fn admin_mark_all_read(&self) -> Result<()>;

    async fn notifications(&self) -> Result<Vec<Notification>>;
    async fn mark_notification_read(&self, id: &str) -> Result<()>;
    async fn mark_all_notifications_read(&self) -> Result<()>;

    async fn whoami(&self) -> Result<SessionUser>;
}
