//! Comment thread commands - browse and act on per-app comment threads
//!
//! Commands: list, post, reply, edit, delete, pin, block
//!
//! Every mutation re-fetches the whole thread through the store; what gets
//! printed afterwards is always the server's view, never a local patch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use arcadectl_client::CommentThreadStore;
use arcadectl_core::{is_image_url, Comment, SortOrder};

use super::{get_content, init_context, resolve_format, Globals, OutputFormat};
use crate::ui;

#[derive(Parser, Debug)]
pub struct CommentsArgs {
    #[command(subcommand)]
    pub command: CommentsCommands,
}

#[derive(Subcommand, Debug)]
pub enum CommentsCommands {
    /// List the comment thread of a catalog entry
    List(ListArgs),
    /// Post a new top-level comment
    Post(PostArgs),
    /// Reply to a comment
    Reply(ReplyArgs),
    /// Edit your own comment
    Edit(EditArgs),
    /// Delete a comment (yours, or anyone's as MOD/ADMIN)
    Delete(DeleteArgs),
    /// Toggle a comment's pinned flag (MOD/ADMIN)
    Pin(PinArgs),
    /// Block a user from commenting platform-wide (MOD/ADMIN)
    Block(BlockArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum SortArg {
    #[default]
    Newest,
    Oldest,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => SortOrder::Newest,
            SortArg::Oldest => SortOrder::Oldest,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Catalog entry (app/game) id
    pub app_id: String,

    /// Sort order (applied server-side)
    #[arg(long, value_enum, default_value = "newest")]
    pub sort: SortArg,

    /// How many "load more replies" pages to reveal per comment
    #[arg(long, default_value = "0")]
    pub reveal: usize,

    /// Output format
    #[arg(long, short, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, conflicts_with = "output")]
    pub json: bool,

    /// Shorthand for --output quiet
    #[arg(long, conflicts_with = "output")]
    pub quiet: bool,
}

#[derive(Parser, Debug)]
pub struct PostArgs {
    /// Catalog entry (app/game) id
    pub app_id: String,

    /// Inline comment content (max 500 characters)
    #[arg(long, short)]
    pub message: Option<String>,

    /// Read content from file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ReplyArgs {
    /// Parent comment id
    pub comment_id: String,

    /// Inline reply content (max 500 characters)
    #[arg(long, short)]
    pub message: Option<String>,

    /// Read content from file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Catalog entry id the comment lives under
    pub app_id: String,

    /// Comment id to edit
    pub comment_id: String,

    /// New content
    #[arg(long, short)]
    pub message: Option<String>,

    /// Read content from file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Catalog entry id the comment lives under
    pub app_id: String,

    /// Comment id to delete
    pub comment_id: String,
}

#[derive(Parser, Debug)]
pub struct PinArgs {
    /// Comment id to pin or unpin
    pub comment_id: String,
}

#[derive(Parser, Debug)]
pub struct BlockArgs {
    /// Catalog entry id where the user commented
    pub app_id: String,

    /// User id to block
    pub user_id: String,

    /// Reason recorded with the block
    #[arg(long)]
    pub reason: String,
}

pub async fn run_comments(args: CommentsArgs, globals: &Globals) -> Result<()> {
    let ctx = init_context(globals).await?;
    let store = CommentThreadStore::new(ctx.gateway.clone(), ctx.session.clone());

    match args.command {
        CommentsCommands::List(args) => run_list(&ctx, &store, args).await,
        CommentsCommands::Post(args) => run_post(&store, args).await,
        CommentsCommands::Reply(args) => run_reply(&store, args).await,
        CommentsCommands::Edit(args) => run_edit(&store, args).await,
        CommentsCommands::Delete(args) => run_delete(&store, args).await,
        CommentsCommands::Pin(args) => run_pin(&store, args).await,
        CommentsCommands::Block(args) => run_block(&store, args).await,
    }
}

async fn run_list(
    ctx: &super::AppContext,
    store: &CommentThreadStore,
    args: ListArgs,
) -> Result<()> {
    let format = resolve_format(args.output, args.json, args.quiet);

    let pb = ui::spinner(format!("fetching comments for {}", args.app_id));
    let result = store.refresh(&args.app_id, args.sort.into()).await;
    ui::finish(pb);
    result.context("failed to fetch comments")?;

    for _ in 0..args.reveal {
        for comment in store.comments() {
            store.reveal_more_replies(&comment.id);
        }
    }

    let comments = store.comments();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&comments)?);
        }
        OutputFormat::Quiet => {
            for comment in &comments {
                println!("{}", comment.id);
            }
        }
        OutputFormat::Human => {
            println!("┌─ {} :: {} comments", args.app_id, comments.len());
            println!("│");

            if comments.is_empty() {
                println!("│  (no comments)");
            } else {
                for (i, comment) in comments.iter().enumerate() {
                    let is_last = i == comments.len() - 1;
                    print_comment(store, comment, is_last);
                    if !is_last {
                        println!("│");
                    }
                }
            }

            if ctx.session.is_none() {
                println!();
                println!("(sign in to post: arcadectl auth login --token <jwt>)");
            }
        }
    }

    Ok(())
}

fn print_comment(store: &CommentThreadStore, comment: &Comment, is_last: bool) {
    let prefix = if is_last { "└─" } else { "├─" };
    let cont = if is_last { "   " } else { "│  " };

    let pin = if comment.is_pinned { "[pinned] " } else { "" };
    println!(
        "{} {}{} ({}) @ {}",
        prefix,
        pin,
        comment.author.username,
        comment.author.role,
        comment.created_at.format("%Y-%m-%d %H:%M"),
    );
    if is_image_url(&comment.content) {
        println!("{cont}[image] {}", comment.content.trim());
    } else {
        println!("{cont}{}", comment.content);
    }
    println!("{cont}id: {}", comment.id);

    let visible = store.visible_replies(&comment.id);
    for reply in &visible {
        println!(
            "{cont}  ↳ {} @ {}: {}",
            reply.author.username,
            reply.created_at.format("%Y-%m-%d %H:%M"),
            reply.content,
        );
    }
    let hidden = store.hidden_reply_count(&comment.id);
    if hidden > 0 {
        println!("{cont}  ({hidden} more replies, use --reveal)");
    }
}

async fn run_post(store: &CommentThreadStore, args: PostArgs) -> Result<()> {
    let content = get_content(&args.message, &args.file, "comment")?;

    let pb = ui::spinner("posting comment");
    let result = store.post(&args.app_id, &content).await;
    ui::finish(pb);
    result.context("failed to post comment")?;

    println!("✓ Comment posted on {}", args.app_id);
    Ok(())
}

async fn run_reply(store: &CommentThreadStore, args: ReplyArgs) -> Result<()> {
    let content = get_content(&args.message, &args.file, "reply")?;

    let pb = ui::spinner("posting reply");
    let result = store.reply(&args.comment_id, &content).await;
    ui::finish(pb);
    result.context("failed to post reply")?;

    println!("✓ Reply posted under {}", args.comment_id);
    Ok(())
}

async fn run_edit(store: &CommentThreadStore, args: EditArgs) -> Result<()> {
    let content = get_content(&args.message, &args.file, "edit")?;

    // Load the thread first so the author-only gate has something to check
    store
        .refresh(&args.app_id, SortOrder::Newest)
        .await
        .context("failed to fetch comments")?;

    store
        .edit(&args.comment_id, &content)
        .await
        .context("failed to edit comment")?;

    println!("✓ Comment {} updated", args.comment_id);
    Ok(())
}

async fn run_delete(store: &CommentThreadStore, args: DeleteArgs) -> Result<()> {
    // The owner/admin endpoint dispatch needs the comment's author
    store
        .refresh(&args.app_id, SortOrder::Newest)
        .await
        .context("failed to fetch comments")?;

    store
        .delete(&args.comment_id)
        .await
        .context("failed to delete comment")?;

    println!("✓ Comment {} deleted", args.comment_id);
    Ok(())
}

async fn run_pin(store: &CommentThreadStore, args: PinArgs) -> Result<()> {
    store
        .pin(&args.comment_id)
        .await
        .context("failed to toggle pin")?;

    println!("✓ Pin toggled on {}", args.comment_id);
    Ok(())
}

async fn run_block(store: &CommentThreadStore, args: BlockArgs) -> Result<()> {
    // The role gate needs the target's role, which lives in the thread data
    store
        .refresh(&args.app_id, SortOrder::Newest)
        .await
        .context("failed to fetch comments")?;

    store
        .block(&args.user_id, &args.reason)
        .await
        .context("failed to block user")?;

    println!("✓ User {} blocked", args.user_id);
    Ok(())
}
