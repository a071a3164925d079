//! Per-app comment thread store.
//!
//! Consistency model: the server computes `repliesCount`, pin ordering, and
//! timestamps, so the client treats itself as having no authoritative
//! state. Every mutation is followed by a full re-fetch, and a successful
//! fetch replaces the local list wholesale.
//!
//! Overlapping fetches are resolved with a monotonic generation counter:
//! a response belonging to anything but the newest issued request is
//! discarded instead of overwriting fresher data.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use arcadectl_core::{
    validate_content, ArcadeError, Comment, Reply, ReplyWindow, Result, Role, SortOrder,
};

use crate::api::CatalogApi;
use crate::session::Session;

#[derive(Default)]
struct ThreadState {
    app_id: Option<String>,
    sort: SortOrder,
    comments: Vec<Comment>,
    /// Display-only error from the last failed fetch
    error: Option<String>,
    /// Local "load more" windows, keyed by comment id
    reply_windows: HashMap<String, ReplyWindow>,
}

pub struct CommentThreadStore {
    api: Arc<dyn CatalogApi>,
    session: Option<Session>,
    state: Mutex<ThreadState>,
    generation: AtomicU64,
}

impl CommentThreadStore {
    pub fn new(api: Arc<dyn CatalogApi>, session: Option<Session>) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(ThreadState::default()),
            generation: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ThreadState> {
        self.state.lock().expect("comment store lock")
    }

    fn session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| ArcadeError::unauthorized("sign in to do that"))
    }

    /// Fetch all top-level comments for an app and replace the local list.
    ///
    /// Anonymous sessions are fine: the endpoint returns public data. On
    /// failure the list is left empty and the error is kept for display.
    pub async fn refresh(&self, app_id: &str, sort: SortOrder) -> Result<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.list_comments(app_id, sort).await;

        let mut state = self.lock();
        if generation != self.generation.load(Ordering::SeqCst) {
            // A newer fetch was issued while this one was in flight
            debug!(app_id, generation, "discarding stale comment list response");
            return Ok(());
        }

        state.app_id = Some(app_id.to_string());
        state.sort = sort;
        state.reply_windows.clear();
        match result {
            Ok(comments) => {
                state.comments = comments;
                state.error = None;
                Ok(())
            }
            Err(err) => {
                state.comments = Vec::new();
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Re-run the last fetch (the "try again" affordance).
    pub async fn retry(&self) -> Result<()> {
        let (app_id, sort) = {
            let state = self.lock();
            match state.app_id.clone() {
                Some(app_id) => (app_id, state.sort),
                None => return Ok(()),
            }
        };
        self.refresh(&app_id, sort).await
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.lock().comments.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn find(&self, comment_id: &str) -> Option<Comment> {
        self.lock()
            .comments
            .iter()
            .find(|c| c.id == comment_id)
            .cloned()
    }

    /// Create a top-level comment, then re-fetch the whole list.
    pub async fn post(&self, app_id: &str, content: &str) -> Result<()> {
        self.session()?;
        validate_content(content)?;
        self.api.post_comment(app_id, content).await?;
        let sort = self.lock().sort;
        self.refresh(app_id, sort).await
    }

    /// Reply under a parent comment, then re-fetch.
    pub async fn reply(&self, comment_id: &str, content: &str) -> Result<()> {
        self.session()?;
        validate_content(content)?;
        self.api.post_reply(comment_id, content).await?;
        self.retry().await
    }

    /// Edit a comment. Author-only, checked before the call.
    pub async fn edit(&self, comment_id: &str, content: &str) -> Result<()> {
        let session = self.session()?;
        validate_content(content)?;
        let comment = self
            .find(comment_id)
            .ok_or_else(|| ArcadeError::validation(format!("unknown comment id {comment_id}")))?;
        if !session.capabilities.can_edit(&comment) {
            return Err(ArcadeError::forbidden("only the author can edit a comment"));
        }
        self.api.edit_comment(comment_id, content).await?;
        self.retry().await
    }

    /// Delete a comment, dispatching to the owner or moderator endpoint by
    /// role. The backend is assumed to enforce the real check.
    pub async fn delete(&self, comment_id: &str) -> Result<()> {
        let session = self.session()?;
        let comment = self
            .find(comment_id)
            .ok_or_else(|| ArcadeError::validation(format!("unknown comment id {comment_id}")))?;

        if session.capabilities.owns(&comment) {
            self.api.delete_comment(comment_id).await?;
        } else if session.capabilities.can_delete_any() {
            self.api.admin_delete_comment(comment_id).await?;
        } else {
            return Err(ArcadeError::forbidden("cannot delete someone else's comment"));
        }
        self.retry().await
    }

    /// Toggle the pinned flag. Pinned ordering is applied server-side and
    /// picked up by the re-fetch.
    pub async fn pin(&self, comment_id: &str) -> Result<()> {
        let session = self.session()?;
        if !session.capabilities.can_pin() {
            return Err(ArcadeError::forbidden("pinning requires MOD or ADMIN"));
        }
        self.api.pin_comment(comment_id).await?;
        self.retry().await
    }

    /// Block a user platform-wide. The role gate runs entirely client-side
    /// before any network call: MOD cannot block staff, nobody blocks
    /// themselves.
    pub async fn block(&self, user_id: &str, reason: &str) -> Result<()> {
        let session = self.session()?;
        let target_role = self
            .author_role(user_id)
            .ok_or_else(|| ArcadeError::validation(format!("unknown user id {user_id}")))?;

        if !session.capabilities.can_block(user_id, target_role) {
            return Err(ArcadeError::forbidden(format!(
                "{} cannot block a {} user",
                session.user.role, target_role
            )));
        }
        self.api.block_user(user_id, reason).await
    }

    fn author_role(&self, user_id: &str) -> Option<Role> {
        let state = self.lock();
        for comment in &state.comments {
            if comment.author.id == user_id {
                return Some(comment.author.role);
            }
            for reply in &comment.replies {
                if reply.author.id == user_id {
                    return Some(reply.author.role);
                }
            }
        }
        None
    }

    /// The currently revealed prefix of a comment's reply list. Replies are
    /// fully embedded in the fetch; this is a local slice, never a request.
    pub fn visible_replies(&self, comment_id: &str) -> Vec<Reply> {
        let state = self.lock();
        let Some(comment) = state.comments.iter().find(|c| c.id == comment_id) else {
            return Vec::new();
        };
        let window = state
            .reply_windows
            .get(comment_id)
            .copied()
            .unwrap_or_default();
        window.visible_slice(&comment.replies).to_vec()
    }

    /// Replies still behind the "load more" affordance. Counts against the
    /// embedded reply list, which the fetch delivers in full.
    pub fn hidden_reply_count(&self, comment_id: &str) -> usize {
        let state = self.lock();
        let Some(comment) = state.comments.iter().find(|c| c.id == comment_id) else {
            return 0;
        };
        let window = state
            .reply_windows
            .get(comment_id)
            .copied()
            .unwrap_or_default();
        window.hidden_count(comment.replies.len())
    }

    pub fn reveal_more_replies(&self, comment_id: &str) {
        let mut state = self.lock();
        state
            .reply_windows
            .entry(comment_id.to_string())
            .or_default()
            .reveal_more();
    }
}
