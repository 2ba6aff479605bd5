use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use feedpulse::api::ApiClient;
use feedpulse::app::{App, AppEvent, View};
use feedpulse::config::Config;
use feedpulse::store::ArticleStore;
use feedpulse::theme::ThemeVariant;
use feedpulse::ui;

#[derive(Parser, Debug)]
#[command(name = "feedpulse", about = "Terminal dashboard for FeedPulse articles")]
struct Args {
    /// Backend root URL (overrides the config file)
    #[arg(long, env = "FEEDPULSE_API_URL", value_name = "URL")]
    base_url: Option<String>,

    /// Config file path (default: ~/.config/feedpulse/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start in the Explore view
    #[arg(long)]
    explore: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Logs go to a file or stderr, never stdout where the TUI draws.
fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_ref())?;

    let config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from '{}'", path.display()))?,
        None => Config::default(),
    };

    let base_url = config.resolve_base_url(args.base_url.as_deref());
    let api = ApiClient::new(&base_url, config.request_timeout())
        .with_context(|| format!("Cannot use backend URL '{}'", base_url))?;
    tracing::info!(base_url = %api.base_url(), "Starting FeedPulse");

    let store = ArticleStore::new(api);
    let mut app = App::new(store);

    match ThemeVariant::from_str_name(&config.theme) {
        Some(variant) => app.set_theme(variant),
        None => tracing::warn!(theme = %config.theme, "Unknown theme, using dark"),
    }
    for warning in app.keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
    }
    if args.explore {
        app.view = View::Explorer;
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
