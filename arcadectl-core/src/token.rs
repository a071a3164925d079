//! Session token persistence and the JWT identity fallback.
//!
//! The bearer token is the only client-owned persistent state. It lives in a
//! plain file and is re-read before every request; only login/logout write
//! it, so no coordination is needed.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ArcadeError, Result};
use crate::models::{Role, SessionUser};

/// File-backed store for the bearer token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current token, if any. Always reads fresh from disk.
    pub fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim().to_string();
                Ok(if token.is_empty() { None } else { Some(token) })
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token.trim())?;
        Ok(())
    }

    /// Purge the token. Missing file is not an error; this also runs on 401.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JwtClaims {
    #[serde(alias = "_id", alias = "sub")]
    id: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    role: Option<Role>,
    #[serde(default)]
    avatar: Option<String>,
}

/// Decode the identity embedded in a JWT payload, without verifying the
/// signature. Used only as a display fallback when `/api/user/me` is
/// unreachable; authorization still happens server-side on every call.
pub fn decode_jwt_identity(token: &str) -> Result<SessionUser> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| ArcadeError::unauthorized("token is not a JWT"))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|err| ArcadeError::unauthorized(format!("invalid JWT payload: {err}")))?;

    let claims: JwtClaims = serde_json::from_slice(&bytes)
        .map_err(|err| ArcadeError::decode("JWT claims", err))?;

    debug!(user_id = %claims.id, "decoded identity from JWT payload");

    Ok(SessionUser {
        id: claims.id,
        username: claims.username.unwrap_or_else(|| "(unknown)".to_string()),
        avatar: claims.avatar,
        role: claims.role.unwrap_or(Role::User),
        purchased_games: Default::default(),
    })
}
