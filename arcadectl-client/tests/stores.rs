//! Store behavior tests against an in-memory catalog API.
//!
//! The fake implements [`CatalogApi`] over mutexed vectors, with optional
//! per-call gates so tests can control the resolution order of overlapping
//! fetches.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use tokio::sync::oneshot;

use arcadectl_core::models::{AdminPagination, StatusFilter};
use arcadectl_core::{
    ArcadeError, Capabilities, Comment, Notification, Result, Role, SessionUser, SortOrder,
    TokenStore, UserRef,
};
use arcadectl_client::{
    AdminOverview, AdminQuery, BellFeed, CatalogApi, CommentThreadStore, ModerationStore,
    NotificationPage, Session,
};

// ============================================================================
// Fixtures
// ============================================================================

fn user_ref(id: &str, role: Role) -> UserRef {
    UserRef {
        id: id.to_string(),
        username: format!("user-{id}"),
        role,
        avatar: None,
    }
}

fn session_user(id: &str, role: Role) -> SessionUser {
    SessionUser {
        id: id.to_string(),
        username: format!("user-{id}"),
        avatar: None,
        role,
        purchased_games: Default::default(),
    }
}

fn session(id: &str, role: Role) -> Session {
    let user = session_user(id, role);
    let capabilities = Capabilities::for_session(&user);
    Session { user, capabilities }
}

fn comment(id: &str, author: UserRef, content: &str, minutes: i64) -> Comment {
    Comment {
        id: id.to_string(),
        app_id: "abc123".to_string(),
        author,
        content: content.to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap() + Duration::minutes(minutes),
        is_pinned: false,
        admin_read: false,
        replies_count: 0,
        replies: Vec::new(),
    }
}

fn notification(id: &str, is_read: bool, read_by: &[&str]) -> Notification {
    Notification {
        id: id.to_string(),
        actor: user_ref("u9", Role::User),
        app_id: "abc123".to_string(),
        parent_id: "c1".to_string(),
        content: "replied to you".to_string(),
        is_read,
        read_by: read_by.iter().map(|s| s.to_string()).collect(),
        created_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    }
}

// ============================================================================
// Fake API
// ============================================================================

#[derive(Default)]
struct FakeApi {
    comments: Mutex<Vec<Comment>>,
    notifications: Mutex<Vec<Notification>>,
    user: Mutex<Option<SessionUser>>,
    whoami_error: Mutex<Option<&'static str>>,

    /// Gates popped (front first) at the start of each list_comments call;
    /// the call blocks until its gate fires.
    list_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    lists_started: AtomicUsize,
    fail_lists: AtomicBool,

    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn with_comments(&self, comments: Vec<Comment>) {
        *self.comments.lock().unwrap() = comments;
    }

    fn with_notifications(&self, items: Vec<Notification>) {
        *self.notifications.lock().unwrap() = items;
    }

    fn with_user(&self, user: SessionUser) {
        *self.user.lock().unwrap() = Some(user);
    }

    fn push_list_gate(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.list_gates.lock().unwrap().push_back(rx);
        tx
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn wait_for_lists_started(&self, n: usize) {
        while self.lists_started.load(Ordering::SeqCst) < n {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }
    }
}

#[async_trait]
impl CatalogApi for FakeApi {
    async fn list_comments(&self, app_id: &str, sort: SortOrder) -> Result<Vec<Comment>> {
        self.record(format!("list:{app_id}:{}", sort.as_query()));
        self.lists_started.fetch_add(1, Ordering::SeqCst);

        let gate = self.list_gates.lock().unwrap().pop_front();
        if let Some(rx) = gate {
            rx.await.ok();
        }

        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(ArcadeError::transport("connection refused"));
        }

        let mut comments = self.comments.lock().unwrap().clone();
        match sort {
            SortOrder::Newest => comments.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => comments.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }
        Ok(comments)
    }

    async fn post_comment(&self, app_id: &str, content: &str) -> Result<Comment> {
        self.record(format!("post:{app_id}"));
        let author = self
            .user
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ArcadeError::unauthorized("no session"))?;
        let mut comments = self.comments.lock().unwrap();
        let n = comments.len();
        let created = comment(
            &format!("c{}", n + 1),
            user_ref(&author.id, author.role),
            content,
            n as i64 + 100,
        );
        comments.push(created.clone());
        Ok(created)
    }

    async fn post_reply(&self, comment_id: &str, _content: &str) -> Result<()> {
        self.record(format!("reply:{comment_id}"));
        Ok(())
    }

    async fn edit_comment(&self, comment_id: &str, content: &str) -> Result<()> {
        self.record(format!("edit:{comment_id}"));
        let mut comments = self.comments.lock().unwrap();
        if let Some(c) = comments.iter_mut().find(|c| c.id == comment_id) {
            c.content = content.to_string();
        }
        Ok(())
    }

    async fn delete_comment(&self, comment_id: &str) -> Result<()> {
        self.record(format!("delete:{comment_id}"));
        self.comments.lock().unwrap().retain(|c| c.id != comment_id);
        Ok(())
    }

    async fn admin_delete_comment(&self, comment_id: &str) -> Result<()> {
        self.record(format!("admin-delete:{comment_id}"));
        self.comments.lock().unwrap().retain(|c| c.id != comment_id);
        Ok(())
    }

    async fn pin_comment(&self, comment_id: &str) -> Result<()> {
        self.record(format!("pin:{comment_id}"));
        let mut comments = self.comments.lock().unwrap();
        if let Some(c) = comments.iter_mut().find(|c| c.id == comment_id) {
            c.is_pinned = !c.is_pinned;
        }
        Ok(())
    }

    async fn block_user(&self, user_id: &str, _reason: &str) -> Result<()> {
        self.record(format!("block:{user_id}"));
        Ok(())
    }

    async fn admin_overview(&self, query: &AdminQuery) -> Result<AdminOverview> {
        self.record(format!("admin-overview:page={}", query.page));
        let comments = self.comments.lock().unwrap().clone();
        let filtered: Vec<Comment> = comments
            .into_iter()
            .filter(|c| match query.status {
                StatusFilter::All => true,
                StatusFilter::Read => c.admin_read,
                StatusFilter::Unread => !c.admin_read,
            })
            .collect();
        let total = filtered.len();
        Ok(AdminOverview {
            comments: filtered,
            pagination: AdminPagination {
                total_pages: total.div_ceil(query.limit).max(1),
                total_comments: total,
                total_unread: 0,
                total_read: 0,
            },
        })
    }

    async fn admin_mark_read(&self, comment_id: &str) -> Result<()> {
        self.record(format!("admin-read:{comment_id}"));
        let mut comments = self.comments.lock().unwrap();
        if let Some(c) = comments.iter_mut().find(|c| c.id == comment_id) {
            c.admin_read = true;
        }
        Ok(())
    }

    async fn admin_mark_all_read(&self) -> Result<()> {
        self.record("admin-read-all");
        for c in self.comments.lock().unwrap().iter_mut() {
            c.admin_read = true;
        }
        Ok(())
    }

    async fn notifications(&self) -> Result<Vec<Notification>> {
        self.record("notifications");
        Ok(self.notifications.lock().unwrap().clone())
    }

    async fn mark_notification_read(&self, id: &str) -> Result<()> {
        self.record(format!("notif-read:{id}"));
        let mut items = self.notifications.lock().unwrap();
        if let Some(n) = items.iter_mut().find(|n| n.id == id) {
            n.is_read = true;
        }
        // Unknown ids are fine; the server contract is idempotent
        Ok(())
    }

    async fn mark_all_notifications_read(&self) -> Result<()> {
        self.record("notif-read-all");
        for n in self.notifications.lock().unwrap().iter_mut() {
            n.is_read = true;
        }
        Ok(())
    }

    async fn whoami(&self) -> Result<SessionUser> {
        self.record("whoami");
        if let Some(kind) = *self.whoami_error.lock().unwrap() {
            return match kind {
                "unauthorized" => Err(ArcadeError::unauthorized("token expired")),
                _ => Err(ArcadeError::transport("connection refused")),
            };
        }
        self.user
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ArcadeError::unauthorized("no session"))
    }
}

// ============================================================================
// Comment thread store
// ============================================================================

#[tokio::test]
async fn test_refresh_replaces_list_wholesale() {
    let fake = FakeApi::new();
    fake.with_comments(vec![comment("c1", user_ref("u1", Role::User), "first", 0)]);
    let store = CommentThreadStore::new(fake.clone(), None);

    store.refresh("abc123", SortOrder::Newest).await.unwrap();
    assert_eq!(store.comments().len(), 1);

    // Server state changes out from under us; the next fetch replaces
    // everything, merging nothing
    fake.with_comments(vec![
        comment("c2", user_ref("u2", Role::User), "second", 1),
        comment("c3", user_ref("u3", Role::User), "third", 2),
    ]);
    store.refresh("abc123", SortOrder::Newest).await.unwrap();

    let ids: Vec<String> = store.comments().iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids, vec!["c3", "c2"]);
}

#[tokio::test]
async fn test_post_then_refetch_includes_new_comment() {
    let fake = FakeApi::new();
    fake.with_user(session_user("u1", Role::User));
    let store = CommentThreadStore::new(fake.clone(), Some(session("u1", Role::User)));

    store.refresh("abc123", SortOrder::Newest).await.unwrap();
    store.post("abc123", "Great game!").await.unwrap();

    let comments = store.comments();
    let posted = comments
        .iter()
        .find(|c| c.content == "Great game!")
        .expect("posted comment present after re-fetch");
    assert_eq!(posted.author.id, "u1");
}

#[tokio::test]
async fn test_anonymous_can_list_but_not_post() {
    let fake = FakeApi::new();
    fake.with_comments(vec![comment("c1", user_ref("u1", Role::User), "public", 0)]);
    let store = CommentThreadStore::new(fake.clone(), None);

    // No token, no prompt: public data comes back
    store.refresh("abc123", SortOrder::Newest).await.unwrap();
    assert_eq!(store.comments().len(), 1);

    let err = store.post("abc123", "hi").await.unwrap_err();
    assert!(err.is_unauthorized());
    // The gate fired before any network call
    assert!(!fake.calls().iter().any(|c| c.starts_with("post:")));
}

#[tokio::test]
async fn test_length_gate_runs_before_network() {
    let fake = FakeApi::new();
    fake.with_user(session_user("u1", Role::User));
    let store = CommentThreadStore::new(fake.clone(), Some(session("u1", Role::User)));

    let over = "x".repeat(501);
    assert!(store.post("abc123", &over).await.is_err());
    assert!(fake.calls().is_empty());

    let at_limit = "x".repeat(500);
    store.post("abc123", &at_limit).await.unwrap();
    assert!(fake.calls().iter().any(|c| c.starts_with("post:")));
}

#[tokio::test]
async fn test_edit_rejects_unknown_and_foreign_comments() {
    let fake = FakeApi::new();
    fake.with_comments(vec![comment("c1", user_ref("u2", Role::User), "theirs", 0)]);
    let store = CommentThreadStore::new(fake.clone(), Some(session("a1", Role::Admin)));
    store.refresh("abc123", SortOrder::Newest).await.unwrap();

    // An id missing from the local list never reaches the network
    let err = store.edit("missing", "new text").await.unwrap_err();
    assert!(matches!(err, ArcadeError::Validation { .. }));

    // Even an admin cannot edit someone else's comment
    let err = store.edit("c1", "new text").await.unwrap_err();
    assert!(matches!(err, ArcadeError::Forbidden { .. }));
    assert!(!fake.calls().iter().any(|c| c.starts_with("edit:")));
}

#[tokio::test]
async fn test_delete_dispatches_by_ownership() {
    let fake = FakeApi::new();
    fake.with_comments(vec![
        comment("c1", user_ref("m1", Role::Mod), "mine", 0),
        comment("c2", user_ref("u2", Role::User), "theirs", 1),
    ]);
    let store = CommentThreadStore::new(fake.clone(), Some(session("m1", Role::Mod)));
    store.refresh("abc123", SortOrder::Newest).await.unwrap();

    store.delete("c1").await.unwrap();
    store.delete("c2").await.unwrap();

    let calls = fake.calls();
    assert!(calls.contains(&"delete:c1".to_string()));
    assert!(calls.contains(&"admin-delete:c2".to_string()));
}

#[tokio::test]
async fn test_mod_cannot_block_admin() {
    let fake = FakeApi::new();
    fake.with_comments(vec![comment("c1", user_ref("a1", Role::Admin), "staff", 0)]);
    let store = CommentThreadStore::new(fake.clone(), Some(session("m1", Role::Mod)));
    store.refresh("abc123", SortOrder::Newest).await.unwrap();

    let err = store.block("a1", "spam").await.unwrap_err();
    assert!(matches!(err, ArcadeError::Forbidden { .. }));
    assert!(!fake.calls().iter().any(|c| c.starts_with("block:")));

    // An admin blocking a mod goes through
    let fake2 = FakeApi::new();
    fake2.with_comments(vec![comment("c1", user_ref("m1", Role::Mod), "staff", 0)]);
    let store2 = CommentThreadStore::new(fake2.clone(), Some(session("a1", Role::Admin)));
    store2.refresh("abc123", SortOrder::Newest).await.unwrap();
    store2.block("m1", "abuse").await.unwrap();
    assert!(fake2.calls().contains(&"block:m1".to_string()));
}

#[tokio::test]
async fn test_failed_fetch_leaves_empty_list_and_error() {
    let fake = FakeApi::new();
    fake.with_comments(vec![comment("c1", user_ref("u1", Role::User), "x", 0)]);
    let store = CommentThreadStore::new(fake.clone(), None);
    store.refresh("abc123", SortOrder::Newest).await.unwrap();
    assert_eq!(store.comments().len(), 1);

    fake.fail_lists.store(true, Ordering::SeqCst);
    assert!(store.retry().await.is_err());
    assert!(store.comments().is_empty());
    assert!(store.error().unwrap().contains("transport error"));

    // The "try again" affordance recovers
    fake.fail_lists.store(false, Ordering::SeqCst);
    store.retry().await.unwrap();
    assert_eq!(store.comments().len(), 1);
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_stale_response_is_discarded() {
    // First fetch (newest) resolves AFTER a second fetch (oldest) was
    // issued; the store must keep the newer request's result.
    let fake = FakeApi::new();
    fake.with_comments(vec![
        comment("early", user_ref("u1", Role::User), "a", 0),
        comment("late", user_ref("u2", Role::User), "b", 5),
    ]);
    let store = Arc::new(CommentThreadStore::new(fake.clone(), None));

    let gate1 = fake.push_list_gate();
    let gate2 = fake.push_list_gate();

    let first = {
        let store = store.clone();
        tokio::spawn(async move { store.refresh("abc123", SortOrder::Newest).await })
    };
    fake.wait_for_lists_started(1).await;

    let second = {
        let store = store.clone();
        tokio::spawn(async move { store.refresh("abc123", SortOrder::Oldest).await })
    };
    fake.wait_for_lists_started(2).await;

    // The newer request resolves first and lands
    gate2.send(()).unwrap();
    second.await.unwrap().unwrap();

    // The older request resolves last; its response must be dropped
    gate1.send(()).unwrap();
    first.await.unwrap().unwrap();

    let ids: Vec<String> = store.comments().iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids, vec!["early", "late"], "oldest-first order must survive");
}

#[tokio::test]
async fn test_reply_windowing_is_local() {
    let mut parent = comment("c1", user_ref("u1", Role::User), "popular", 0);
    for i in 0..25 {
        parent.replies.push(arcadectl_core::Reply {
            id: format!("r{i}"),
            author: user_ref("u2", Role::User),
            content: format!("reply {i}"),
            created_at: parent.created_at,
            parent_id: Some("c1".to_string()),
        });
    }
    parent.replies_count = 25;

    let fake = FakeApi::new();
    fake.with_comments(vec![parent]);
    let store = CommentThreadStore::new(fake.clone(), None);
    store.refresh("abc123", SortOrder::Newest).await.unwrap();
    let fetches_after_load = fake.calls().len();

    assert_eq!(store.visible_replies("c1").len(), 10);
    assert_eq!(store.hidden_reply_count("c1"), 15);

    store.reveal_more_replies("c1");
    assert_eq!(store.visible_replies("c1").len(), 20);
    assert_eq!(store.hidden_reply_count("c1"), 5);

    store.reveal_more_replies("c1");
    assert_eq!(store.visible_replies("c1").len(), 25);
    assert_eq!(store.hidden_reply_count("c1"), 0);

    // "Load more" is UI-level truncation, never an extra fetch
    assert_eq!(fake.calls().len(), fetches_after_load);
}

// ============================================================================
// Notification feeds
// ============================================================================

#[tokio::test]
async fn test_bell_shows_unread_only_and_removes_on_read() {
    let fake = FakeApi::new();
    fake.with_notifications(vec![
        notification("n1", false, &[]),
        notification("n2", true, &[]),
        notification("n3", false, &[]),
    ]);
    let bell = BellFeed::new(fake.clone());

    bell.poll().await.unwrap();
    assert_eq!(bell.unread_count(), 2);

    bell.mark_read("n1").await.unwrap();
    assert_eq!(bell.unread_count(), 1);

    // Idempotence: marking an id already gone is not an error
    bell.mark_read("n1").await.unwrap();
    assert_eq!(bell.unread_count(), 1);

    bell.mark_all_read().await.unwrap();
    assert_eq!(bell.unread_count(), 0);
}

#[tokio::test]
async fn test_page_keeps_items_and_flips_flags() {
    let fake = FakeApi::new();
    fake.with_notifications(vec![
        notification("n1", false, &[]),
        notification("n2", false, &["u1"]),
    ]);
    let page = NotificationPage::new(fake.clone(), "u1");

    page.refresh().await.unwrap();
    let items = page.items();
    assert_eq!(items.len(), 2);

    // Dual read representation: the page honors readBy, the flag does not
    assert!(!items[1].is_read_flag());
    assert!(page.is_read(&items[1]));

    page.mark_read("n1").await.unwrap();
    let items = page.items();
    assert_eq!(items.len(), 2, "read items stay visible");
    assert!(page.is_read(&items[0]));

    page.mark_all_read().await.unwrap();
    assert!(page.items().iter().all(|n| page.is_read(n)));
}

#[tokio::test]
async fn test_open_marks_read_and_yields_target() {
    let fake = FakeApi::new();
    fake.with_notifications(vec![notification("n1", false, &[])]);
    let page = NotificationPage::new(fake.clone(), "u1");
    page.refresh().await.unwrap();

    let target = page.open("n1").await.unwrap();
    assert_eq!(target.app_id, "abc123");
    assert_eq!(target.comment_id, "c1");
    assert!(page.is_read(&page.items()[0]));
    assert!(fake.calls().contains(&"notif-read:n1".to_string()));
}

// ============================================================================
// Moderation overlay
// ============================================================================

#[tokio::test]
async fn test_moderation_requires_staff() {
    let fake = FakeApi::new();
    assert!(ModerationStore::new(fake.clone(), &session("u1", Role::Premium)).is_err());
    assert!(ModerationStore::new(fake.clone(), &session("m1", Role::Mod)).is_ok());
}

#[tokio::test]
async fn test_moderation_mark_read_refetches() {
    let fake = FakeApi::new();
    fake.with_comments(vec![
        comment("c1", user_ref("u1", Role::User), "a", 0),
        comment("c2", user_ref("u2", Role::User), "b", 1),
    ]);
    let store = ModerationStore::new(fake.clone(), &session("a1", Role::Admin)).unwrap();

    store.set_status(StatusFilter::Unread);
    store.refresh().await.unwrap();
    assert_eq!(store.comments().len(), 2);

    store.mark_read("c1").await.unwrap();
    // Triaged comment drops out of the unread filter on the re-fetch
    let ids: Vec<String> = store.comments().iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids, vec!["c2"]);
}

#[tokio::test]
async fn test_moderation_delete_uses_admin_endpoint_and_refetches() {
    let fake = FakeApi::new();
    fake.with_comments(vec![
        comment("c1", user_ref("u1", Role::User), "spam", 0),
        comment("c2", user_ref("u2", Role::User), "fine", 1),
    ]);
    let store = ModerationStore::new(fake.clone(), &session("a1", Role::Admin)).unwrap();
    store.refresh().await.unwrap();

    store.delete("c1").await.unwrap();

    // Always the admin endpoint from this overlay, then a re-fetch
    assert!(fake.calls().contains(&"admin-delete:c1".to_string()));
    let ids: Vec<String> = store.comments().iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids, vec!["c2"]);
}

#[tokio::test]
async fn test_moderation_pin_refetches() {
    let fake = FakeApi::new();
    fake.with_comments(vec![comment("c1", user_ref("u1", Role::User), "notable", 0)]);
    let store = ModerationStore::new(fake.clone(), &session("m1", Role::Mod)).unwrap();
    store.refresh().await.unwrap();

    store.pin("c1").await.unwrap();

    assert!(fake.calls().contains(&"pin:c1".to_string()));
    let comments = store.comments();
    assert!(comments.iter().find(|c| c.id == "c1").unwrap().is_pinned);
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn test_no_token_means_guest() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = TokenStore::new(dir.path().join("token"));
    let fake = FakeApi::new();

    let session = Session::establish(fake.as_ref(), &tokens).await.unwrap();
    assert!(session.is_none());
    assert!(fake.calls().is_empty(), "no whoami without a token");
}

#[tokio::test]
async fn test_rejected_token_is_purged_and_degrades_to_guest() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = TokenStore::new(dir.path().join("token"));
    tokens.save("stale.jwt.here").unwrap();

    let fake = FakeApi::new();
    *fake.whoami_error.lock().unwrap() = Some("unauthorized");

    let session = Session::establish(fake.as_ref(), &tokens).await.unwrap();
    assert!(session.is_none());
    assert_eq!(tokens.load().unwrap(), None, "token purged on 401");
}

#[tokio::test]
async fn test_whoami_outage_falls_back_to_jwt_decode() {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
    let payload = URL_SAFE_NO_PAD.encode(br#"{"id":"u42","username":"gamer","role":"PREMIUM"}"#);
    let jwt = format!("{header}.{payload}.sig");

    let dir = tempfile::tempdir().unwrap();
    let tokens = TokenStore::new(dir.path().join("token"));
    tokens.save(&jwt).unwrap();

    let fake = FakeApi::new();
    *fake.whoami_error.lock().unwrap() = Some("transport");

    let session = Session::establish(fake.as_ref(), &tokens)
        .await
        .unwrap()
        .expect("decoded identity");
    assert_eq!(session.user.id, "u42");
    assert_eq!(session.user.role, Role::Premium);
    assert_eq!(tokens.load().unwrap(), Some(jwt), "token kept on outage");
}
