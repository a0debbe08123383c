// reposcout entry point.
// Runs the interactive TUI, or a single search with --query.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use reposcout::cache;
use reposcout::github::GitHubClient;
use reposcout::logging::{LogTarget, init_logging};
use reposcout::state::{Debouncer, SearchState};
use reposcout::ui::table;
use reposcout::{App, Cli, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from(Cli::parse());

    match config.query.clone() {
        Some(query) => run_once(&config, &query).await,
        None => run_tui(&config).await,
    }
}

/// Run one search and print the displayed rows.
async fn run_once(config: &Config, query: &str) -> Result<()> {
    init_logging(config.verbose, LogTarget::Stderr)?;

    let client = GitHubClient::new(&config.api_url, config.token.as_deref())?;
    let mut cache = config.open_cache();
    let mut search = SearchState::new(config.page_size, config.sort_key);
    search.input = query.to_string();

    search.search(&client, &mut cache).await;
    cache.flush().await;

    if let Some(error) = &search.error {
        anyhow::bail!("{}", error);
    }

    let rows = search.displayed();
    print!("{}", table::render_plain(&rows));
    Ok(())
}

/// Run the interactive UI until the user quits.
async fn run_tui(config: &Config) -> Result<()> {
    if let Some(path) = cache::log_path() {
        init_logging(config.verbose, LogTarget::File(&path))?;
    }

    let client = GitHubClient::new(&config.api_url, config.token.as_deref())?;
    let cache = config.open_cache();
    let search = SearchState::new(config.page_size, config.sort_key);
    let mut app = App::new(search, Debouncer::new(config.debounce), client, cache);

    info!(api = %config.api_url, "starting reposcout");

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    app.cache.flush().await;

    result.context("terminal I/O failed")
}
