use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;

use crate::constants::constants;

/// User preferences read from `prefs.toml` in the platform config directory.
#[derive(Deserialize, Default, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
  pub player: Option<String>,
  pub player_args: Option<Vec<String>>,
  pub yt_dlp: Option<String>,
}

impl Config {
  pub fn load() -> Self {
    Self::path().and_then(|path| std::fs::read_to_string(path).ok()).map(|s| Self::parse(&s)).unwrap_or_default()
  }

  /// Parse prefs, falling back to defaults when the file is malformed.
  pub fn parse(content: &str) -> Self {
    toml::from_str(content).unwrap_or_default()
  }

  pub fn path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "juliet").map(|dirs| dirs.config_dir().join("prefs.toml"))
  }

  pub fn player(&self) -> String {
    self.player.clone().unwrap_or_else(|| constants().player.clone())
  }

  pub fn player_args(&self) -> Vec<String> {
    self.player_args.clone().unwrap_or_else(|| constants().player_args.clone())
  }

  pub fn yt_dlp(&self) -> String {
    self.yt_dlp.clone().unwrap_or_else(|| constants().yt_dlp.clone())
  }
}
