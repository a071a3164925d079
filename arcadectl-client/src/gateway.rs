//! reqwest-backed implementation of [`CatalogApi`].
//!
//! Credential policy: every request carries the static `X-Auth-Token`
//! deployment secret; the bearer token is read fresh from the token file
//! per call and attached only when present. A 401 purges the stored token
//! so the caller can fall back to the anonymous view.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use arcadectl_core::models::AdminPagination;
use arcadectl_core::{
    ArcadeConfig, ArcadeError, Comment, Notification, Result, SessionUser, SortOrder, TokenStore,
};

use crate::api::{AdminOverview, AdminQuery, CatalogApi};

/// Thin HTTP adapter: attach credentials, perform the call, surface a typed
/// failure. No retries, no backoff; callers own user-facing messaging.
pub struct ApiGateway {
    client: Client,
    base_url: String,
    service_token: String,
    tokens: TokenStore,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: Option<String>,
}

#[derive(Deserialize)]
struct CommentsEnvelope {
    comments: Vec<Comment>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationsEnvelope {
    notifications: Vec<Notification>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminOverviewEnvelope {
    comments: Vec<Comment>,
    pagination: AdminPagination,
}

impl ApiGateway {
    pub fn new(config: &ArcadeConfig, tokens: TokenStore) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs()))
            .build()
            .map_err(|err| ArcadeError::transport(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.endpoint().to_string(),
            service_token: config.api.service_token.clone(),
            tokens,
        })
    }

    /// Build a request with whatever credentials exist right now.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self
            .client
            .request(method, &url)
            .header("X-Auth-Token", &self.service_token);

        // Anonymous calls are legal; never block on a missing token
        if let Some(token) = self.tokens.load()? {
            builder = builder.bearer_auth(token);
        }

        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let response = builder
            .send()
            .await
            .map_err(|err| ArcadeError::transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
            .and_then(|body| body.message)
            .unwrap_or_else(|| "request failed".to_string());

        if status == StatusCode::UNAUTHORIZED {
            warn!("bearer token rejected, purging stored token");
            self.tokens.clear()?;
            return Err(ArcadeError::unauthorized(message));
        }

        Err(ArcadeError::api(status.as_u16(), message))
    }

    async fn fetch<T: for<'de> Deserialize<'de>>(
        &self,
        builder: RequestBuilder,
        context: &str,
    ) -> Result<T> {
        let response = self.send(builder).await?;
        let body = response
            .text()
            .await
            .map_err(|err| ArcadeError::transport(err.to_string()))?;
        serde_json::from_str(&body).map_err(|err| ArcadeError::decode(context, err))
    }

    /// Fire a mutation and discard whatever body comes back.
    async fn fire(&self, builder: RequestBuilder) -> Result<()> {
        self.send(builder).await.map(|_| ())
    }
}

#[async_trait]
impl CatalogApi for ApiGateway {
    async fn list_comments(&self, app_id: &str, sort: SortOrder) -> Result<Vec<Comment>> {
        debug!(app_id, sort = sort.as_query(), "fetching comment list");
        let path = format!("/api/comments/{}?sort={}", app_id, sort.as_query());
        let envelope: CommentsEnvelope = self
            .fetch(self.request(Method::GET, &path)?, "comment list")
            .await?;
        Ok(envelope.comments)
    }

    async fn post_comment(&self, app_id: &str, content: &str) -> Result<Comment> {
        let path = format!("/api/comments/{app_id}");
        let builder = self
            .request(Method::POST, &path)?
            .json(&json!({ "content": content }));
        self.fetch(builder, "created comment").await
    }

    async fn post_reply(&self, comment_id: &str, content: &str) -> Result<()> {
        let path = format!("/api/comments/reply/{comment_id}");
        let builder = self
            .request(Method::POST, &path)?
            .json(&json!({ "content": content }));
        self.fire(builder).await
    }

    async fn edit_comment(&self, comment_id: &str, content: &str) -> Result<()> {
        let path = format!("/api/comments/edit/{comment_id}");
        let builder = self
            .request(Method::PUT, &path)?
            .json(&json!({ "content": content }));
        self.fire(builder).await
    }

    async fn delete_comment(&self, comment_id: &str) -> Result<()> {
        let path = format!("/api/comments/{comment_id}");
        self.fire(self.request(Method::DELETE, &path)?).await
    }

    async fn admin_delete_comment(&self, comment_id: &str) -> Result<()> {
        let path = format!("/api/comments/admin/{comment_id}");
        self.fire(self.request(Method::DELETE, &path)?).await
    }

    async fn pin_comment(&self, comment_id: &str) -> Result<()> {
        let path = format!("/api/comments/pin/{comment_id}");
        self.fire(self.request(Method::POST, &path)?).await
    }

    async fn block_user(&self, user_id: &str, reason: &str) -> Result<()> {
        let path = format!("/api/comments/block/{user_id}");
        let builder = self
            .request(Method::POST, &path)?
            .json(&json!({ "reason": reason }));
        self.fire(builder).await
    }

    async fn admin_overview(&self, query: &AdminQuery) -> Result<AdminOverview> {
        let mut path = format!(
            "/api/comments/admin/all?page={}&limit={}&status={}&sortBy={}",
            query.page,
            query.limit,
            query.status.as_query(),
            query.sort_by.as_query(),
        );
        if let Some(ref search) = query.search {
            path.push_str(&format!("&search={}", urlencoding::encode(search)));
        }

        let envelope: AdminOverviewEnvelope = self
            .fetch(self.request(Method::GET, &path)?, "admin overview")
            .await?;
        Ok(AdminOverview {
            comments: envelope.comments,
            pagination: envelope.pagination,
        })
    }

    async fn admin_mark_read(&self, comment_id: &str) -> Result<()> {
        let path = format!("/api/comments/admin/{comment_id}/read");
        self.fire(self.request(Method::POST, &path)?).await
    }

    async fn admin_mark_all_read(&self) -> Result<()> {
        self.fire(self.request(Method::POST, "/api/comments/admin/mark-all-read")?)
            .await
    }

    async fn notifications(&self) -> Result<Vec<Notification>> {
        let envelope: NotificationsEnvelope = self
            .fetch(
                self.request(Method::GET, "/api/comments/notifications")?,
                "notifications",
            )
            .await?;
        Ok(envelope.notifications)
    }

    async fn mark_notification_read(&self, id: &str) -> Result<()> {
        let path = format!("/api/comments/notifications/{id}/read");
        self.fire(self.request(Method::POST, &path)?).await
    }

    async fn mark_all_notifications_read(&self) -> Result<()> {
        self.fire(self.request(Method::POST, "/api/comments/notifications/read-all")?)
            .await
    }

    async fn whoami(&self) -> Result<SessionUser> {
        self.fetch(self.request(Method::GET, "/api/user/me")?, "session identity")
            .await
    }
}
