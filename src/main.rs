mod app;
mod config;
mod constants;
mod error;
mod feed;
mod input;
mod model;
mod player;
mod provider;
mod ui;
mod viewport;
mod worker;

use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use app::BrowserSession;
use config::Config;
use constants::constants;
use input::Intent;
use player::MpvLauncher;
use provider::YtDlpProvider;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Browse trending and searched videos from the terminal", long_about = None)]
struct Args {
  /// Player program used for playback (default: mpv, or `player` in prefs.toml)
  #[arg(long)]
  player: Option<String>,

  /// Path to the yt-dlp executable (default: yt-dlp, or `yt_dlp` in prefs.toml)
  #[arg(long)]
  yt_dlp: Option<String>,

  /// Write logs here instead of the platform data directory
  #[arg(long, value_name = "PATH")]
  log_file: Option<PathBuf>,

  /// Don't load the trending feed on startup
  #[arg(long)]
  no_trending: bool,

  /// Search for this immediately and open the Search tab
  #[arg(short, long)]
  query: Option<String>,
}

// --- Logging ---

fn default_log_path() -> PathBuf {
  ProjectDirs::from("", "", "juliet")
    .map(|dirs| dirs.data_local_dir().join("juliet.log"))
    .unwrap_or_else(|| std::env::temp_dir().join("juliet.log"))
}

/// Route `tracing` output to a file; the terminal belongs to the UI.
/// Logging is best-effort: if the file can't be opened the app runs without it.
fn init_logging(path: &Path) -> Option<WorkerGuard> {
  let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
  let file_name = path.file_name()?;
  std::fs::create_dir_all(dir).ok()?;

  let appender = RollingFileAppender::builder()
    .rotation(Rotation::NEVER)
    .filename_prefix(file_name.to_string_lossy())
    .build(dir)
    .ok()?;
  let (writer, guard) = tracing_appender::non_blocking(appender);
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(writer)
    .with_ansi(false)
    .init();
  Some(guard)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let log_path = args.log_file.clone().unwrap_or_else(default_log_path);
  let _log_guard = init_logging(&log_path);

  let config = Config::load();
  let yt_dlp = args.yt_dlp.clone().unwrap_or_else(|| config.yt_dlp());
  let player = args.player.clone().unwrap_or_else(|| config.player());
  info!(%yt_dlp, %player, "starting");

  let provider = Arc::new(YtDlpProvider::new(yt_dlp));
  let launcher = Box::new(MpvLauncher::new(player, config.player_args()));
  let mut session = BrowserSession::new(provider, launcher);

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::try_init().context("Failed to initialise terminal")?;

  if !args.no_trending {
    session.store.load_trending();
  }
  if let Some(query) = args.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
    session.apply_intent(Intent::SubmitQuery(query.to_string()));
  }

  let result = run(&mut terminal, &mut session);
  ratatui::restore();
  info!("exiting");
  result
}

/// One iteration per frame: apply finished fetches, redraw, then wait briefly for a key.
fn run(terminal: &mut DefaultTerminal, session: &mut BrowserSession) -> Result<()> {
  let poll_interval = constants().poll_interval();

  loop {
    session.drain_fetch_results();

    terminal.draw(|frame| ui::ui(frame, session)).context("Failed to draw frame")?;

    if event::poll(poll_interval)? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => session.handle_key(key),
        _ => {}
      }
    }

    if session.should_quit {
      break;
    }
  }
  Ok(())
}
