//! Single process-wide session provider.
//!
//! Replaces the original's two overlapping auth contexts with one explicit
//! init/teardown lifecycle: read the token, validate it against the
//! backend, derive the capability set once. `None` means guest — a legal
//! state, not an error.

use tracing::{info, warn};

use arcadectl_core::{decode_jwt_identity, Capabilities, Result, SessionUser, TokenStore};

use crate::api::CatalogApi;

#[derive(Debug, Clone)]
pub struct Session {
    pub user: SessionUser,
    pub capabilities: Capabilities,
}

impl Session {
    fn from_user(user: SessionUser) -> Self {
        let capabilities = Capabilities::for_session(&user);
        Self { user, capabilities }
    }

    /// Establish the session for this invocation.
    ///
    /// No token means guest. A rejected token (401) also degrades to guest:
    /// the gateway purges it and we never hard-fail on auth. Any other
    /// failure of `/api/user/me` falls back to decoding the JWT payload
    /// locally, which is enough for display identity.
    pub async fn establish(api: &dyn CatalogApi, tokens: &TokenStore) -> Result<Option<Session>> {
        let Some(token) = tokens.load()? else {
            return Ok(None);
        };

        match api.whoami().await {
            Ok(user) => {
                info!(user_id = %user.id, role = %user.role, "session established");
                Ok(Some(Session::from_user(user)))
            }
            Err(err) if err.is_unauthorized() => {
                tokens.clear()?;
                warn!("session token rejected, continuing as guest");
                Ok(None)
            }
            Err(err) => {
                warn!(error = %err, "whoami unreachable, decoding identity from token");
                let user = decode_jwt_identity(&token)?;
                Ok(Some(Session::from_user(user)))
            }
        }
    }

    /// Tear down: clear the token so the next invocation starts as guest.
    pub fn logout(tokens: &TokenStore) -> Result<()> {
        tokens.clear()
    }
}
