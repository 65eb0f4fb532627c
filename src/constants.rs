//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available,
//! with no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // Paging
  pub page_size: usize,
  pub trending_limit: usize,
  pub prefetch_margin: usize,

  // Frame loop
  pub poll_interval_ms: u64,

  // Catalog URLs
  pub trending_url: String,
  pub search_url: String,
  pub search_filter: String,
  pub watch_url: String,

  // External programs (overridable via prefs.toml / CLI)
  pub player: String,
  pub player_args: Vec<String>,
  pub yt_dlp: String,
}

impl Constants {
  pub fn poll_interval(&self) -> Duration {
    Duration::from_millis(self.poll_interval_ms)
  }
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed every test below fails.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
