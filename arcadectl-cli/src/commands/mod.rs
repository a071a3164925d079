//! Command implementations for the arcadectl CLI

use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use tracing::debug;

use arcadectl_client::{ApiGateway, Session};
use arcadectl_core::{ArcadeConfig, TokenStore};

pub mod auth;
pub mod comments;
pub mod moderation;
pub mod notify;

// Re-export main dispatcher functions for flat access from main.rs
pub use auth::run_auth;
pub use comments::run_comments;
pub use moderation::run_moderation;
pub use notify::run_notify;

/// Global flags shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Globals {
    pub endpoint: Option<String>,
    pub token_file: Option<PathBuf>,
}

/// Everything a command needs: the gateway, the token store, and the
/// session established for this invocation (None = guest).
pub struct AppContext {
    pub gateway: Arc<ApiGateway>,
    pub tokens: TokenStore,
    pub session: Option<Session>,
}

impl AppContext {
    /// The session, or an actionable error for commands that need one.
    pub fn session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| anyhow!("not signed in. Run: arcadectl auth login --token <jwt>"))
    }
}

/// Load config, build the gateway, establish the session.
pub async fn init_context(globals: &Globals) -> Result<AppContext> {
    let mut config = ArcadeConfig::load().context("failed to load configuration")?;
    if let Some(ref endpoint) = globals.endpoint {
        config.api.endpoint = endpoint.clone();
    }

    let token_path = globals
        .token_file
        .clone()
        .unwrap_or_else(ArcadeConfig::default_token_path);
    let tokens = TokenStore::new(token_path);

    let gateway = Arc::new(ApiGateway::new(&config, tokens.clone())?);
    debug!(endpoint = config.endpoint(), "gateway ready");

    let session = Session::establish(gateway.as_ref(), &tokens)
        .await
        .context("failed to establish session")?;

    Ok(AppContext {
        gateway,
        tokens,
        session,
    })
}

// ============================================================================
// Output Format (shared)
// ============================================================================

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (for piping to jq)
    Json,
    /// Quiet mode - IDs only
    Quiet,
}

pub fn resolve_format(output: OutputFormat, json_flag: bool, quiet_flag: bool) -> OutputFormat {
    if json_flag {
        OutputFormat::Json
    } else if quiet_flag {
        OutputFormat::Quiet
    } else {
        output
    }
}

// ============================================================================
// Content Resolution (stdin/file/inline)
// ============================================================================

pub fn get_content(
    message: &Option<String>,
    file: &Option<PathBuf>,
    context: &str,
) -> Result<String> {
    // Priority: -m inline > --file > stdin
    if let Some(msg) = message {
        return Ok(msg.clone());
    }

    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()));
    }

    // Check if stdin has data (not a TTY)
    if !std::io::stdin().is_terminal() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        let content = buf.trim().to_string();
        if !content.is_empty() {
            return Ok(content);
        }
    }

    Err(anyhow!(
        "No content provided for {}. Use -m, --file, or pipe content via stdin",
        context
    ))
}
