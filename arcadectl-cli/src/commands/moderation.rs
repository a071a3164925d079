//! Moderator triage commands over the admin comment list
//!
//! Commands: overview, read, read-all, delete, pin. Filtering, search, and
//! sorting all happen server-side; the page-button row is the client's only
//! pagination logic.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use arcadectl_client::{AdminQuery, ModerationStore, OVERVIEW_POLL_INTERVAL};
use arcadectl_core::models::{AdminSort, StatusFilter};
use arcadectl_core::PageToken;

use super::{init_context, resolve_format, Globals, OutputFormat};
use crate::ui;

#[derive(Parser, Debug)]
pub struct ModArgs {
    #[command(subcommand)]
    pub command: ModCommands,
}

#[derive(Subcommand, Debug)]
pub enum ModCommands {
    /// Paged overview of all comments with triage state
    Overview(OverviewArgs),
    /// Mark one comment triaged
    Read(ReadArgs),
    /// Mark every comment triaged
    ReadAll,
    /// Delete any comment via the admin endpoint
    Delete(DeleteArgs),
    /// Toggle a comment's pinned flag
    Pin(PinArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum StatusArg {
    #[default]
    All,
    Read,
    Unread,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusFilter::All,
            StatusArg::Read => StatusFilter::Read,
            StatusArg::Unread => StatusFilter::Unread,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum SortByArg {
    #[default]
    Newest,
    Oldest,
    MostReplies,
    PinnedFirst,
}

impl From<SortByArg> for AdminSort {
    fn from(arg: SortByArg) -> Self {
        match arg {
            SortByArg::Newest => AdminSort::Newest,
            SortByArg::Oldest => AdminSort::Oldest,
            SortByArg::MostReplies => AdminSort::MostReplies,
            SortByArg::PinnedFirst => AdminSort::PinnedFirst,
        }
    }
}

#[derive(Parser, Debug)]
pub struct OverviewArgs {
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Comments per page
    #[arg(long, default_value = "20")]
    pub limit: usize,

    /// Triage status filter
    #[arg(long, value_enum, default_value = "all")]
    pub status: StatusArg,

    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,

    /// Sort order (applied server-side)
    #[arg(long, value_enum, default_value = "newest")]
    pub sort_by: SortByArg,

    /// Keep polling every 2 minutes
    #[arg(long)]
    pub watch: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, conflicts_with = "output")]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ReadArgs {
    /// Comment id to mark triaged
    pub comment_id: String,
}

#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Comment id to delete
    pub comment_id: String,
}

#[derive(Parser, Debug)]
pub struct PinArgs {
    /// Comment id to pin or unpin
    pub comment_id: String,
}

pub async fn run_moderation(args: ModArgs, globals: &Globals) -> Result<()> {
    let ctx = init_context(globals).await?;
    let session = ctx.session()?;
    let store = ModerationStore::new(ctx.gateway.clone(), session)?;

    match args.command {
        ModCommands::Overview(args) => run_overview(&store, args).await,
        ModCommands::Read(args) => {
            store
                .mark_read(&args.comment_id)
                .await
                .context("failed to mark comment read")?;
            println!("✓ Marked as read: {}", args.comment_id);
            Ok(())
        }
        ModCommands::ReadAll => {
            store
                .mark_all_read()
                .await
                .context("failed to mark comments read")?;
            println!("✓ All comments marked read");
            Ok(())
        }
        ModCommands::Delete(args) => {
            store
                .delete(&args.comment_id)
                .await
                .context("failed to delete comment")?;
            println!("✓ Comment {} deleted", args.comment_id);
            Ok(())
        }
        ModCommands::Pin(args) => {
            store
                .pin(&args.comment_id)
                .await
                .context("failed to toggle pin")?;
            println!("✓ Pin toggled on {}", args.comment_id);
            Ok(())
        }
    }
}

async fn run_overview(store: &ModerationStore, args: OverviewArgs) -> Result<()> {
    let format = resolve_format(args.output, args.json, false);

    store.set_query(AdminQuery {
        page: args.page.max(1),
        limit: args.limit,
        status: args.status.into(),
        sort_by: args.sort_by.into(),
        search: args.search.clone(),
    });

    if !args.watch {
        let pb = ui::spinner("fetching admin overview");
        let result = store.refresh().await;
        ui::finish(pb);
        result.context("failed to fetch admin overview")?;
        print_overview(store, format)?;
        return Ok(());
    }

    // Slow triage loop, independent of the notification bell poll
    let mut ticker = tokio::time::interval(OVERVIEW_POLL_INTERVAL);
    loop {
        ticker.tick().await;
        match store.refresh().await {
            Ok(()) => print_overview(store, format)?,
            Err(err) => tracing::warn!(error = %err, "overview poll failed"),
        }
    }
}

fn print_overview(store: &ModerationStore, format: OutputFormat) -> Result<()> {
    let comments = store.comments();
    let pagination = store.pagination();

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "comments": comments,
                    "pagination": pagination,
                }))?
            );
        }
        OutputFormat::Quiet => {
            for comment in &comments {
                println!("{}", comment.id);
            }
        }
        OutputFormat::Human => {
            println!(
                "┌─ moderation overview :: {} comments ({} unread / {} read)",
                pagination.total_comments, pagination.total_unread, pagination.total_read
            );
            println!("│");

            if comments.is_empty() {
                println!("│  (nothing matches)");
            } else {
                for (i, comment) in comments.iter().enumerate() {
                    let is_last = i == comments.len() - 1;
                    let prefix = if is_last { "└─" } else { "├─" };
                    let cont = if is_last { "   " } else { "│  " };

                    let status = if comment.admin_read { "[read]" } else { "[unread]" };
                    let pin = if comment.is_pinned { " [pinned]" } else { "" };
                    println!(
                        "{} {}{} {} on {} @ {}",
                        prefix,
                        status,
                        pin,
                        comment.author.username,
                        comment.app_id,
                        comment.created_at.format("%Y-%m-%d %H:%M"),
                    );
                    println!("{cont}{}", comment.content);
                    println!("{cont}id: {}  replies: {}", comment.id, comment.replies_count);

                    if !is_last {
                        println!("│");
                    }
                }
            }

            println!();
            println!("{}", render_page_buttons(store));
        }
    }
    Ok(())
}

/// Render the compressed page-number row, current page bracketed:
/// `1 … 4 [5] 6 … 10`
fn render_page_buttons(store: &ModerationStore) -> String {
    let current = store.query().page;
    store
        .page_buttons()
        .iter()
        .map(|token| match token {
            PageToken::Page(n) if *n == current => format!("[{n}]"),
            PageToken::Page(n) => n.to_string(),
            PageToken::Ellipsis => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
