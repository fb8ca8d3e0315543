//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use rapport_domain::{AccountId, ContentId, ReactionKind};
use std::path::PathBuf;

/// Rapport CLI - Follow graph, profile views and post reactions.
#[derive(Debug, Parser)]
#[command(name = "rapport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "RAPPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file (overrides the configured path)
    #[arg(long, global = true, env = "RAPPORT_DB")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (ids and outcome tags only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage accounts
    Account(AccountArgs),

    /// Manage posts
    Post(PostArgs),

    /// Follow another account
    Follow(FollowArgs),

    /// Stop following an account
    Unfollow(FollowArgs),

    /// Record a profile view
    View(ViewArgs),

    /// React to a post
    React(ReactArgs),

    /// Show engagement statistics for a post
    Stats(StatsArgs),

    /// Complete one-sided follow edges
    Repair,
}

/// Arguments for account management.
#[derive(Debug, Parser)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub action: AccountAction,
}

/// Account management actions.
#[derive(Debug, Subcommand)]
pub enum AccountAction {
    /// Register a new account
    Add {
        /// Display handle
        handle: String,
    },

    /// Show an account with its followers, following and profile viewers
    Show {
        /// Account id
        id: AccountId,
    },
}

/// Arguments for post management.
#[derive(Debug, Parser)]
pub struct PostArgs {
    #[command(subcommand)]
    pub action: PostAction,
}

/// Post management actions.
#[derive(Debug, Subcommand)]
pub enum PostAction {
    /// Publish a post
    Add {
        /// Author account id
        author: AccountId,
        /// Post title
        title: String,
    },
}

/// Arguments for follow and unfollow.
#[derive(Debug, Parser)]
pub struct FollowArgs {
    /// Acting account id
    pub actor: AccountId,

    /// Target account id
    pub target: AccountId,
}

/// Arguments for the view command.
#[derive(Debug, Parser)]
pub struct ViewArgs {
    /// Account viewing the profile
    pub viewer: AccountId,

    /// Account whose profile is viewed
    pub owner: AccountId,
}

/// Arguments for the react command.
#[derive(Debug, Parser)]
pub struct ReactArgs {
    /// Reacting account id
    pub actor: AccountId,

    /// Post id
    pub content: ContentId,

    /// Reaction kind
    #[arg(value_enum)]
    pub kind: ReactionArg,
}

/// Arguments for the stats command.
#[derive(Debug, Parser)]
pub struct StatsArgs {
    /// Post id
    pub content: ContentId,
}

/// Reaction argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReactionArg {
    /// Like the post
    Like,
    /// Dislike the post
    Dislike,
    /// Mark the post as seen
    View,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<ReactionArg> for ReactionKind {
    fn from(kind: ReactionArg) -> Self {
        match kind {
            ReactionArg::Like => ReactionKind::Like,
            ReactionArg::Dislike => ReactionKind::Dislike,
            ReactionArg::View => ReactionKind::View,
        }
    }
}
