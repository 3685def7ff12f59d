// Configuration: command-line flags with environment fallbacks.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const PREFS_FILE_NAME: &str = ".speisekarte_prefs.json";

/// Browse restaurant daily menus from the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "speisekarte", version)]
pub struct Config {
    /// Base URL of the menu API.
    #[arg(long, env = "MENU_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// File holding persisted preferences (theme).
    #[arg(long, env = "MENU_PREFS_FILE")]
    pub prefs_file: Option<PathBuf>,

    /// Start on this day (YYYY-MM-DD) instead of today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Only show dishes of the restaurant with this id.
    #[arg(long)]
    pub restaurant: Option<i64>,

    /// Print the menu once and exit instead of starting the interactive view.
    #[arg(long)]
    pub print: bool,

    /// Never write color escape sequences in `--print` mode. Colors are
    /// also left out when stdout is not a terminal.
    #[arg(long)]
    pub no_color: bool,

    /// Give up on a request after this many seconds. Requests wait
    /// indefinitely when unset.
    #[arg(long, env = "MENU_API_TIMEOUT")]
    pub timeout_secs: Option<u64>,

    /// Log filter, e.g. `debug` or `speisekarte_cli=info`. Overrides RUST_LOG.
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Config {
    /// Preferences file path: the explicit one, else a dot file in the
    /// user's home directory.
    pub fn prefs_path(&self) -> PathBuf {
        self.prefs_file.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(PREFS_FILE_NAME)
        })
    }
}
