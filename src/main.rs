use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use feedlist::app::{App, AppEvent};
use feedlist::config::Config;
use feedlist::feed::{spawn_refresher, FileFeedSource, RefreshRequest, SharedFeeds};
use feedlist::keybindings::KeybindingRegistry;
use feedlist::screen::{ScreenController, StatusSink};
use feedlist::ui;
use feedlist::util::strip_control_chars;

/// Get the config directory path (~/.config/feedlist/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("feedlist"))
}

#[derive(Parser, Debug)]
#[command(name = "feedlist", version, about = "Terminal feed list with tags and filters")]
struct Args {
    /// Feed snapshot (JSON array of feeds)
    #[arg(long, value_name = "FILE")]
    feeds: Option<PathBuf>,

    /// Config file (default: ~/.config/feedlist/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file while the list is on screen
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Print the title line and rows once, then exit
    #[arg(long)]
    dump: bool,

    /// Start with this tag selected
    #[arg(long)]
    tag: Option<String>,

    /// Start with this filter expression applied
    #[arg(long)]
    filter: Option<String>,

    /// Row width for --dump
    #[arg(long, default_value_t = 80)]
    width: usize,
}

/// Logs go to stderr only when nothing else owns the terminal.
fn init_tracing(args: &Args) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Some(path) = &args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Arc::new(file))
            .init();
    } else if args.dump {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    let config_dir = get_config_dir()?;
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;

    let feeds_path = args
        .feeds
        .clone()
        .or_else(|| config.feeds_file.clone())
        .unwrap_or_else(|| config_dir.join("feeds.json"));
    if !feeds_path.exists() {
        eprintln!("Error: No feeds file found at {}", feeds_path.display());
        eprintln!();
        eprintln!("Point feedlist at a JSON feed snapshot:");
        eprintln!("  feedlist --feeds /path/to/feeds.json");
        std::process::exit(1);
    }

    let shared = SharedFeeds::default();
    let source = FileFeedSource::new(&feeds_path, shared.clone());
    let count = source
        .reload()
        .await
        .with_context(|| format!("Failed to load feeds from '{}'", feeds_path.display()))?;
    tracing::info!(feeds = count, path = %feeds_path.display(), "Loaded feed snapshot");

    let notices = StatusSink::new();
    let mut screen = ScreenController::new(
        Arc::new(shared),
        config.screen_settings(),
        Arc::new(notices.clone()),
    );

    if let Some(tag) = &args.tag {
        if let Err(e) = screen.set_tag(tag) {
            eprintln!("{}", e);
        }
    }
    if let Some(filter) = &args.filter {
        if let Err(e) = screen.apply_filter(filter) {
            eprintln!("{}", e);
        }
    }

    if args.dump {
        println!("{}", strip_control_chars(&screen.title_line(args.width)));
        for row in screen.rows(args.width) {
            println!("{}", strip_control_chars(&row));
        }
        return Ok(());
    }

    let mut keybindings = KeybindingRegistry::new();
    for warning in keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!(%warning, "Ignoring keybinding override");
    }

    let (request_tx, request_rx) = mpsc::channel::<RefreshRequest>(1);
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    let refresher = spawn_refresher(source, config.refresh_interval(), request_rx, event_tx);

    // Startup notices (bad --tag/--filter) were already printed
    let _ = notices.take();
    let mut app = App::new(screen, notices, keybindings, request_tx);
    let result = ui::run(&mut app, event_rx).await;

    refresher.abort();
    result
}
