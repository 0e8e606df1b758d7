use std::path::PathBuf;

use clap::{Parser, Subcommand};
use memoshare_core::usage::{DEFAULT_WEEKS, MAX_WEEKS};

#[derive(Parser)]
#[command(name = "memoshare")]
#[command(about = "Share text, links, and images to a memos server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Shared configuration directory (defaults to $MEMOSHARE_GROUP_DIR or the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub group_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Share text and attachments as a new memo
    Share {
        /// Memo text (read from stdin when omitted and stdin is piped)
        text: Vec<String>,
        /// Image path, http(s) URL, or other file to attach; repeatable
        #[arg(short, long = "attach", value_name = "PATH_OR_URL")]
        attachments: Vec<String>,
    },
    /// Show memo activity for the last few weeks
    Heatmap {
        /// Number of week columns
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_WEEKS,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WEEKS))
        )]
        weeks: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the shared memos connection settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Store the memos host, openId, and/or access token
    Set {
        /// memos server URL, e.g. https://memos.example.com
        #[arg(long)]
        host: Option<String>,
        /// openId appended to API requests (empty string clears it)
        #[arg(long)]
        open_id: Option<String>,
        /// Access token stored in the OS keyring
        #[arg(long)]
        access_token: Option<String>,
    },
    /// Show the current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove host, openId, and access token
    Clear,
}
