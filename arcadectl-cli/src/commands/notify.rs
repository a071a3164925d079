//! Notification commands - the bell widget and the full notifications page
//!
//! `bell` shows unread only and can poll; `list` is the full page with
//! read/unread styling. The two are distinct views over the same endpoint
//! and are kept that way on purpose.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use arcadectl_client::{BellFeed, NotificationPage, BELL_POLL_INTERVAL};
use arcadectl_core::Notification;

use super::{init_context, resolve_format, Globals, OutputFormat};
use crate::ui;

#[derive(Parser, Debug)]
pub struct NotifyArgs {
    #[command(subcommand)]
    pub command: NotifyCommands,
}

#[derive(Subcommand, Debug)]
pub enum NotifyCommands {
    /// Unread notifications, bell-widget style
    Bell(BellArgs),
    /// All notifications with read/unread state
    List(ListArgs),
    /// Mark one notification read
    Read(ReadArgs),
    /// Mark every notification read
    ReadAll,
    /// Mark read and show where the notification points
    Open(OpenArgs),
}

#[derive(Parser, Debug)]
pub struct BellArgs {
    /// Keep polling every 30 seconds
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
pub struct ListArgs {
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
pub struct ReadArgs {
    /// Notification id
    pub id: String,
}

#[derive(Parser, Debug)]
pub struct OpenArgs {
    /// Notification id
    pub id: String,
}

pub async fn run_notify(args: NotifyArgs, globals: &Globals) -> Result<()> {
    let ctx = init_context(globals).await?;
    let session = ctx.session()?;

    match args.command {
        NotifyCommands::Bell(args) => run_bell(&ctx, args).await,
        NotifyCommands::List(args) => {
            let page = NotificationPage::new(ctx.gateway.clone(), session.user.id.clone());
            run_list(&page, args).await
        }
        NotifyCommands::Read(args) => {
            let page = NotificationPage::new(ctx.gateway.clone(), session.user.id.clone());
            page.refresh().await.context("failed to fetch notifications")?;
            page.mark_read(&args.id)
                .await
                .context("failed to mark notification read")?;
            println!("✓ Marked as read: {}", args.id);
            Ok(())
        }
        NotifyCommands::ReadAll => {
            let page = NotificationPage::new(ctx.gateway.clone(), session.user.id.clone());
            page.mark_all_read()
                .await
                .context("failed to mark notifications read")?;
            println!("✓ All notifications marked read");
            Ok(())
        }
        NotifyCommands::Open(args) => {
            let page = NotificationPage::new(ctx.gateway.clone(), session.user.id.clone());
            page.refresh().await.context("failed to fetch notifications")?;
            let target = page
                .open(&args.id)
                .await
                .context("failed to open notification")?;
            println!(
                "→ app {} :: comment {} (arcadectl comments list {})",
                target.app_id, target.comment_id, target.app_id
            );
            Ok(())
        }
    }
}

async fn run_bell(ctx: &super::AppContext, args: BellArgs) -> Result<()> {
    let format = resolve_format(args.output, args.json, false);
    let bell = BellFeed::new(ctx.gateway.clone());

    if !args.watch {
        let pb = ui::spinner("checking notifications");
        let result = bell.poll().await;
        ui::finish(pb);
        result.context("failed to fetch notifications")?;
        print_bell(&bell, format)?;
        return Ok(());
    }

    // Independent polling loop; errors are reported and the loop carries on
    let mut ticker = tokio::time::interval(BELL_POLL_INTERVAL);
    loop {
        ticker.tick().await;
        match bell.poll().await {
            Ok(()) => print_bell(&bell, format)?,
            Err(err) => tracing::warn!(error = %err, "bell poll failed"),
        }
    }
}

fn print_bell(bell: &BellFeed, format: OutputFormat) -> Result<()> {
    let unread = bell.unread();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&unread)?);
        }
        OutputFormat::Quiet => {
            for n in &unread {
                println!("{}", n.id);
            }
        }
        OutputFormat::Human => {
            println!("🔔 {} unread", bell.unread_count());
            for n in &unread {
                println!(
                    "  • {} replied on {} @ {}  (id: {})",
                    n.actor.username,
                    n.app_id,
                    n.created_at.format("%Y-%m-%d %H:%M"),
                    n.id
                );
            }
        }
    }
    Ok(())
}

async fn run_list(page: &NotificationPage, args: ListArgs) -> Result<()> {
    let format = resolve_format(args.output, args.json, args.quiet);

    let pb = ui::spinner("fetching notifications");
    let result = page.refresh().await;
    ui::finish(pb);
    result.context("failed to fetch notifications")?;

    let items = page.items();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Quiet => {
            for n in &items {
                println!("{}", n.id);
            }
        }
        OutputFormat::Human => {
            println!("┌─ notifications ({})", items.len());
            println!("│");

            if items.is_empty() {
                println!("│  (no notifications)");
            } else {
                for (i, n) in items.iter().enumerate() {
                    let is_last = i == items.len() - 1;
                    print_notification(page, n, is_last);
                    if !is_last {
                        println!("│");
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_notification(page: &NotificationPage, n: &Notification, is_last: bool) {
    let prefix = if is_last { "└─" } else { "├─" };
    let cont = if is_last { "   " } else { "│  " };

    let status = if page.is_read(n) { "[read]" } else { "[unread]" };
    println!(
        "{} {} {} replied @ {}",
        prefix,
        status,
        n.actor.username,
        n.created_at.format("%Y-%m-%d %H:%M")
    );
    println!("{cont}{}", n.content);
    println!("{cont}id: {}  app: {}  comment: {}", n.id, n.app_id, n.parent_id);
}
