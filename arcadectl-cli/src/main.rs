//! arcadectl CLI - catalog comment, notification, and moderation tooling
//!
//! This is the main entry point for the arcadectl command-line tool, which
//! provides:
//! - Comment thread browsing and posting (`comments` subcommand)
//! - Reply notification feeds, bell widget included (`notify` subcommand)
//! - Moderator triage over the admin comment list (`mod` subcommand)
//! - Session token management (`auth` subcommand)

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;
mod ui;

#[derive(Parser, Debug)]
#[command(
    name = "arcadectl",
    author,
    version,
    about = "Comment, notification, and moderation client for the arcade catalog",
    long_about = "Browse and post comments on catalog entries, follow reply notifications, \
                  and run moderator triage, all against the catalog's HTTP API."
)]
struct Cli {
    /// Suppress progress spinners (for script consumption)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Catalog API endpoint (overrides config.toml)
    #[arg(long, env = "ARCADECTL_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Bearer token file (default: ~/.arcadectl/token)
    #[arg(long, env = "ARCADECTL_TOKEN_FILE", global = true)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Comment threads on catalog entries (list, post, reply, edit, delete, pin, block)
    Comments(commands::comments::CommentsArgs),
    /// Reply notifications (bell, list, read, read-all, open)
    Notify(commands::notify::NotifyArgs),
    /// Moderator triage over the admin comment list
    #[command(name = "mod")]
    Moderation(commands::moderation::ModArgs),
    /// Session token management (login, logout, whoami)
    Auth(commands::auth::AuthArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Shell {
    Bash,
    Zsh,
    Fish,
    Elvish,
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing().ok();
    let cli = Cli::parse();

    ui::init_quiet_mode(cli.quiet);

    let globals = commands::Globals {
        endpoint: cli.endpoint,
        token_file: cli.token_file,
    };

    match cli.command {
        Commands::Comments(args) => commands::run_comments(args, &globals).await?,
        Commands::Notify(args) => commands::run_notify(args, &globals).await?,
        Commands::Moderation(args) => commands::run_moderation(args, &globals).await?,
        Commands::Auth(args) => commands::run_auth(args, &globals).await?,
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
