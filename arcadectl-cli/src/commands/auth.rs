//! Session token management - login, logout, whoami
//!
//! The bearer token is the only client-owned persistent state; these
//! commands are the only writers. Every other command re-reads it fresh
//! per request.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use arcadectl_client::Session;
use arcadectl_core::{ArcadeConfig, TokenStore};

use super::{init_context, Globals};

#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Store a bearer token and validate it against the backend
    Login(LoginArgs),
    /// Clear the stored token
    Logout,
    /// Show the current session identity
    Whoami,
}

#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// JWT bearer token issued by the catalog
    #[arg(long)]
    pub token: String,
}

pub async fn run_auth(args: AuthArgs, globals: &Globals) -> Result<()> {
    match args.command {
        AuthCommands::Login(login) => {
            let tokens = token_store(globals);
            tokens.save(&login.token).context("failed to store token")?;

            // Validate straight away; a rejected token is purged again by
            // the session provider and we report it
            let ctx = init_context(globals).await?;
            match ctx.session {
                Some(session) => {
                    println!(
                        "✓ Signed in as {} ({})",
                        session.user.username, session.user.role
                    );
                }
                None => {
                    println!("✗ Token rejected by the backend; not stored");
                }
            }
            Ok(())
        }
        AuthCommands::Logout => {
            let tokens = token_store(globals);
            Session::logout(&tokens).context("failed to clear token")?;
            println!("✓ Signed out");
            Ok(())
        }
        AuthCommands::Whoami => {
            let ctx = init_context(globals).await?;
            match ctx.session {
                Some(session) => {
                    println!("{} ({})", session.user.username, session.user.role);
                    println!("id: {}", session.user.id);
                    if !session.user.purchased_games.is_empty() {
                        println!("purchased: {}", session.user.purchased_games.len());
                    }
                }
                None => println!("(guest)"),
            }
            Ok(())
        }
    }
}

fn token_store(globals: &Globals) -> TokenStore {
    TokenStore::new(
        globals
            .token_file
            .clone()
            .unwrap_or_else(ArcadeConfig::default_token_path),
    )
}
