//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Partials - HTML partial includes with session caching
///
/// Fills every `data-include` placeholder in a page with its fragment,
/// preferring cached markup and falling back to it when a fetch fails.
#[derive(Parser, Debug)]
#[command(name = "partials")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PARTIALS_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the partial includes of a page
    Render(RenderArgs),

    /// Inspect or clear the session cache
    Cache(CacheArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Arguments for the render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// HTML page containing mount points
    pub page: PathBuf,

    /// Serve fragments from this local site root
    #[arg(long, conflicts_with = "base_url")]
    pub root: Option<PathBuf>,

    /// Fetch fragments over HTTP relative to this URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Write the rendered page here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip the session cache for this render
    #[arg(long)]
    pub no_cache: bool,

    /// Session whose cache to use (default: from config)
    #[arg(short, long)]
    pub session: Option<String>,

    /// Print a per-mount report to stderr
    #[arg(long)]
    pub report: Option<OutputFormat>,
}

/// Output format for listings and reports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Session to operate on (default: from config)
    #[arg(short, long, global = true)]
    pub session: Option<String>,

    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List cached fragments
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Remove every cached fragment of the session
    Clear,

    /// Show the session cache file path
    Path,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}
