use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const PASSKEEP_LONG_VERSION: &str = concat!(
    "version: ", env!("CARGO_PKG_VERSION"), "\n",
    "git sha: ", env!("PASSKEEP_GIT_SHA"), "\n",
    "build time (UTC): ", env!("PASSKEEP_BUILD_TIME"), "\n",
    "target: ", env!("PASSKEEP_TARGET"), "\n",
    "profile: ", env!("PASSKEEP_PROFILE")
);

#[derive(Parser)]
#[command(
    name = "passkeep",
    version = env!("CARGO_PKG_VERSION"),
    long_version = PASSKEEP_LONG_VERSION,
    about = " 🔐 Passkeep: local password manager"
)]
pub struct Cli {
    /// Data directory override (else PASSKEEP_DATA_DIR, config file, platform default)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List entries (passwords are never printed)
    List {
        /// Restrict to a category id or name (`all` for every category)
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive search over service, username and description
        #[arg(long)]
        query: Option<String>,
        /// Output JSON array (machine-readable)
        #[arg(long)]
        json: bool,
    },
    /// Show a single entry
    Show {
        id: String,
        /// Print the password in clear text
        #[arg(long = "reveal")]
        reveal_password: bool,
    },
    /// Add a new entry; missing required fields are prompted for
    Add(EntryArgs),
    /// Edit an entry; omitted fields keep their current value
    Edit {
        id: String,
        #[command(flatten)]
        fields: EntryArgs,
    },
    /// Remove an entry by id
    Rm {
        id: String,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Copy an entry's password to the clipboard, restoring it after a TTL
    Copy {
        id: String,
        /// Clipboard TTL in seconds (overrides PASSKEEP_CLIP_TTL)
        #[arg(long)]
        ttl: Option<u64>,
    },
    /// Print a random password
    Generate {
        #[arg(long)]
        length: Option<usize>,
    },
    /// Rate a password as weak, medium or strong
    Strength {
        password: String,
        #[arg(long)]
        json: bool,
    },
    /// Entry and category counts
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Manage categories
    #[command(subcommand)]
    Category(CategoryCommand),
    /// Show the theme, or toggle it
    Theme {
        #[arg(value_parser = ["toggle"])]
        action: Option<String>,
    },
    /// Launch the interactive Terminal UI
    Tui,
}

#[derive(Args, Clone, Debug, Default)]
pub struct EntryArgs {
    #[arg(long)]
    pub service: Option<String>,
    #[arg(long)]
    pub user: Option<String>,
    #[arg(long, conflicts_with = "generate")]
    pub password: Option<String>,
    /// Generate a password instead of prompting
    #[arg(long)]
    pub generate: bool,
    /// Generated password length
    #[arg(long, requires = "generate")]
    pub length: Option<usize>,
    #[arg(long)]
    pub description: Option<String>,
    /// Category id or name; unknown values fall back to Autre
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// List all categories, built-in first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Create a custom category
    Add {
        name: String,
        /// Emoji icon (defaults to 📝)
        #[arg(long)]
        icon: Option<String>,
    },
    /// Rename a custom category or change its icon
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete a custom category; its entries move to Autre
    Rm {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}
