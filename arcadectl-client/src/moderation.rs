//! Moderation overlay over the admin comment list.
//!
//! Layers `adminRead` triage state on top of the same comment data the
//! thread store shows. Filtering, search, and all sorts are server-side;
//! the client only owns the page-button windowing.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use arcadectl_core::models::{AdminPagination, AdminSort, StatusFilter};
use arcadectl_core::{page_window, ArcadeError, Comment, PageToken, Result};

use crate::api::{AdminQuery, CatalogApi};
use crate::session::Session;

/// How often the admin overview re-polls in watch mode. Independent of the
/// bell poll; the two loops do not coordinate.
pub const OVERVIEW_POLL_INTERVAL: Duration = Duration::from_secs(120);

#[derive(Default)]
struct OverviewState {
    comments: Vec<Comment>,
    pagination: AdminPagination,
    error: Option<String>,
}

pub struct ModerationStore {
    api: Arc<dyn CatalogApi>,
    query: Mutex<AdminQuery>,
    state: Mutex<OverviewState>,
}

impl ModerationStore {
    /// Requires a MOD/ADMIN session; the gate runs before any call.
    pub fn new(api: Arc<dyn CatalogApi>, session: &Session) -> Result<Self> {
        if !session.capabilities.can_moderate() {
            return Err(ArcadeError::forbidden(
                "the moderation overview requires MOD or ADMIN",
            ));
        }
        Ok(Self {
            api,
            query: Mutex::new(AdminQuery::default()),
            state: Mutex::new(OverviewState::default()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, OverviewState> {
        self.state.lock().expect("moderation store lock")
    }

    pub fn query(&self) -> AdminQuery {
        self.query.lock().expect("moderation query lock").clone()
    }

    pub fn set_query(&self, query: AdminQuery) {
        *self.query.lock().expect("moderation query lock") = query;
    }

    pub fn set_page(&self, page: usize) {
        self.query.lock().expect("moderation query lock").page = page.max(1);
    }

    pub fn set_status(&self, status: StatusFilter) {
        let mut query = self.query.lock().expect("moderation query lock");
        query.status = status;
        query.page = 1;
    }

    pub fn set_search(&self, search: Option<String>) {
        let mut query = self.query.lock().expect("moderation query lock");
        query.search = search;
        query.page = 1;
    }

    pub fn set_sort(&self, sort: AdminSort) {
        self.query.lock().expect("moderation query lock").sort_by = sort;
    }

    /// Fetch the current page. Wholesale replacement, like every other
    /// store.
    pub async fn refresh(&self) -> Result<()> {
        let query = self.query();
        match self.api.admin_overview(&query).await {
            Ok(overview) => {
                let mut state = self.lock();
                state.comments = overview.comments;
                state.pagination = overview.pagination;
                state.error = None;
                Ok(())
            }
            Err(err) => {
                let mut state = self.lock();
                state.comments = Vec::new();
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.lock().comments.clone()
    }

    pub fn pagination(&self) -> AdminPagination {
        self.lock().pagination.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// The compressed page-number button row for the current position.
    pub fn page_buttons(&self) -> Vec<PageToken> {
        let current = self.query().page;
        let total = self.lock().pagination.total_pages;
        page_window(current, total)
    }

    /// Mark one comment triaged, then re-fetch so counters stay honest.
    pub async fn mark_read(&self, comment_id: &str) -> Result<()> {
        self.api.admin_mark_read(comment_id).await?;
        self.refresh().await
    }

    pub async fn mark_all_read(&self) -> Result<()> {
        self.api.admin_mark_all_read().await?;
        self.refresh().await
    }

    /// Moderator delete; always the admin endpoint from this overlay.
    pub async fn delete(&self, comment_id: &str) -> Result<()> {
        self.api.admin_delete_comment(comment_id).await?;
        self.refresh().await
    }

    pub async fn pin(&self, comment_id: &str) -> Result<()> {
        self.api.pin_comment(comment_id).await?;
        self.refresh().await
    }
}
