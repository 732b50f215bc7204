use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "lifedoc")]
#[command(about = "Keep a dated photo diary from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name holding the Firebase project configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account with a name and profile picture
    Register {
        /// Display name used in the diary title
        #[arg(long)]
        name: String,
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
        /// Password confirmation
        #[arg(long, value_name = "PASSWORD")]
        confirm_password: String,
        /// Profile picture (any common image format)
        #[arg(long, value_name = "PATH")]
        picture: PathBuf,
    },
    /// Sign in and keep the session in the OS keychain
    Login {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Sign out and clear the stored session
    Logout,
    /// Show the signed-in account and diary title
    Whoami,
    /// List diary entries, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a diary entry
    #[command(alias = "new")]
    Add {
        /// Entry date (defaults to today)
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,
        /// Entry text (read from piped stdin when omitted)
        #[arg(long)]
        text: Option<String>,
        /// Photo to attach
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },
    /// Edit an entry; the edited version replaces the stored one
    Edit {
        /// Entry ID or unique ID prefix
        id: String,
        /// New entry date
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,
        /// New entry text
        #[arg(long, conflicts_with = "clear_text")]
        text: Option<String>,
        /// Remove the entry text
        #[arg(long)]
        clear_text: bool,
        /// New photo
        #[arg(long, value_name = "PATH", conflicts_with = "remove_image")]
        image: Option<PathBuf>,
        /// Remove the photo
        #[arg(long)]
        remove_image: bool,
    },
    /// Delete an entry and its photo
    Delete {
        /// Entry ID or unique ID prefix
        id: String,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update a profile
    Init {
        /// Firebase web API key
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,
        /// Firebase project id
        #[arg(long, value_name = "ID")]
        project_id: Option<String>,
        /// Firebase storage bucket, e.g. my-app.appspot.com
        #[arg(long, value_name = "BUCKET")]
        storage_bucket: Option<String>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved profile configuration
    Show,
}
