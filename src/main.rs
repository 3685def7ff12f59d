// Entrypoint for the menu viewer.
// - Keeps `main` small: read config, set up logging, build the API client
//   and the theme setting, then hand over to the UI loop.

use std::io::IsTerminal;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use speisekarte_cli::api::ApiClient;
use speisekarte_cli::config::Config;
use speisekarte_cli::dates;
use speisekarte_cli::state::{Controller, RestaurantFilter, ViewState};
use speisekarte_cli::storage::FileStore;
use speisekarte_cli::theme::{self, ThemeSetting};
use speisekarte_cli::ui;

fn init_logging(config: &Config) {
    let filter = match &config.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("speisekarte_cli=warn")),
    };
    // stderr keeps log lines out of the printed menu.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(&config);

    let api = ApiClient::from_config(&config).context("Failed to build HTTP client")?;
    tracing::info!(base_url = api.base_url(), "using menu API");

    let store = FileStore::new(config.prefs_path());
    let mut theme = ThemeSetting::load(store, theme::system_preference);

    let mut state = ViewState::new(config.date.unwrap_or_else(dates::today));
    if let Some(id) = config.restaurant {
        state.select_restaurant(RestaurantFilter::Only(id));
    }
    let mut controller = Controller::new(api, state);

    if config.print {
        let mut stdout = std::io::stdout();
        let color = !config.no_color && stdout.is_terminal();
        ui::print_once(&mut controller, &theme, color, &mut stdout)?;
    } else {
        // Blocks until the user exits.
        ui::run(&mut controller, &mut theme)?;
    }
    Ok(())
}
