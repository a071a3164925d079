//! Domain models for the catalog comment/notification API.
//!
//! These mirror the JSON the backend sends (camelCase fields, opaque string
//! ids). The client never owns entity lifecycles: every struct here is just
//! the shape of the most recent fetch.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform role, in ascending order of privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Premium,
    Mod,
    Admin,
}

impl Role {
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Mod | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "USER"),
            Role::Premium => write!(f, "PREMIUM"),
            Role::Mod => write!(f, "MOD"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

/// Minimal author reference embedded in comments and notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    #[serde(alias = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
}

fn default_role() -> Role {
    Role::User
}

/// Single-level-nested response to a comment. No pin/read flags, no children.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    #[serde(alias = "_id")]
    pub id: String,
    pub author: UserRef,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Ownership is by reference, not embedded identity
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Top-level comment attached to a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(alias = "_id")]
    pub id: String,
    pub app_id: String,
    pub author: UserRef,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_pinned: bool,
    /// Admin triage flag, distinct from per-user notification read state
    #[serde(default)]
    pub admin_read: bool,
    /// Server-supplied cache of the reply count. The embedded `replies`
    /// page can be shorter; the gap drives the "load more" affordance.
    /// Never recomputed client-side.
    #[serde(default)]
    pub replies_count: usize,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

/// "Someone replied to you" event, created server-side when a reply lands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(alias = "_id")]
    pub id: String,
    pub actor: UserRef,
    pub app_id: String,
    /// The comment that was replied to
    pub parent_id: String,
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    /// Broadcast notifications track readers here instead of `isRead`
    #[serde(default)]
    pub read_by: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Read check as the bell widget performs it: the flag only.
    pub fn is_read_flag(&self) -> bool {
        self.is_read
    }

    /// Read check as the notifications page performs it: the flag OR the
    /// user appearing in `readBy`. The two views intentionally differ.
    pub fn is_read_for(&self, user_id: &str) -> bool {
        self.is_read || self.read_by.iter().any(|id| id == user_id)
    }
}

/// Session identity returned by `/api/user/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(alias = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default)]
    pub purchased_games: HashSet<String>,
}

/// Sort order for the per-app comment list. Server-side sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn as_query(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        }
    }
}

/// Sort options the admin overview endpoint understands. Server-side sorts,
/// never re-derived locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminSort {
    #[default]
    Newest,
    Oldest,
    MostReplies,
    PinnedFirst,
}

impl AdminSort {
    pub fn as_query(self) -> &'static str {
        match self {
            AdminSort::Newest => "newest",
            AdminSort::Oldest => "oldest",
            AdminSort::MostReplies => "most-replies",
            AdminSort::PinnedFirst => "pinned-first",
        }
    }
}

/// Read-status filter for the admin overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Read,
    Unread,
}

impl StatusFilter {
    pub fn as_query(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Read => "read",
            StatusFilter::Unread => "unread",
        }
    }
}

/// Pagination envelope on the admin overview response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPagination {
    pub total_pages: usize,
    pub total_comments: usize,
    #[serde(default)]
    pub total_unread: usize,
    #[serde(default)]
    pub total_read: usize,
}
