use futures::future::BoxFuture;
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::constants::constants;
use crate::error::BrowseError;
use crate::model::{FeedSpec, VideoRecord};

/// Source of catalog pages. Implementations must be cheap to share across worker tasks.
pub trait CatalogProvider: Send + Sync {
  fn fetch(&self, spec: FeedSpec) -> BoxFuture<'static, Result<Vec<VideoRecord>, BrowseError>>;
}

/// Catalog provider backed by the `yt-dlp` executable in flat-playlist mode.
#[derive(Debug, Clone)]
pub struct YtDlpProvider {
  program: String,
}

impl YtDlpProvider {
  pub fn new(program: impl Into<String>) -> Self {
    Self { program: program.into() }
  }
}

impl CatalogProvider for YtDlpProvider {
  fn fetch(&self, spec: FeedSpec) -> BoxFuture<'static, Result<Vec<VideoRecord>, BrowseError>> {
    let program = self.program.clone();
    Box::pin(async move {
      let (url, start, end) = match &spec {
        FeedSpec::Trending => (constants().trending_url.clone(), 1, constants().trending_limit),
        FeedSpec::Search { query, page_window_start, page_window_end } => {
          (search_url(query), *page_window_start, *page_window_end)
        }
      };
      let stdout = run_flat_playlist(&program, &url, start, end).await?;
      let mut records = parse_flat_playlist(&stdout)?;
      if spec == FeedSpec::Trending {
        records.truncate(constants().trending_limit);
      }
      debug!(?spec, count = records.len(), "provider: page parsed");
      Ok(records)
    })
  }
}

/// Build the results URL for a free-text query, restricted to videos.
pub fn search_url(query: &str) -> String {
  let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
  format!("{}?search_query={}&sp={}", constants().search_url, encoded, constants().search_filter)
}

async fn run_flat_playlist(program: &str, url: &str, start: usize, end: usize) -> Result<String, BrowseError> {
  let playlist_range = format!("{}:{}", start, end);
  let output = Command::new(program)
    .args([
      "--flat-playlist",
      "--dump-single-json",
      "--playlist-items",
      &playlist_range,
      "--no-warnings",
      "--ignore-errors",
      "--",
      url,
    ])
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true)
    .output()
    .await
    .map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        BrowseError::Provider(format!("{} not found. Install it with: pip install yt-dlp", program))
      } else {
        BrowseError::Provider(format!("failed to execute {}: {}", program, e))
      }
    })?;

  if !output.status.success() {
    return Err(BrowseError::Provider(format!(
      "{} exited with {}: {}",
      program,
      output.status,
      String::from_utf8_lossy(&output.stderr).trim()
    )));
  }

  String::from_utf8(output.stdout).map_err(|_| BrowseError::Provider(format!("{} output non-UTF8", program)))
}

#[derive(Debug, Deserialize)]
struct FlatPlaylist {
  #[serde(default)]
  entries: Vec<Option<FlatEntry>>,
}

#[derive(Debug, Deserialize)]
struct FlatEntry {
  id: Option<String>,
  title: Option<String>,
  channel: Option<String>,
  uploader: Option<String>,
  duration_string: Option<String>,
  duration: Option<f64>,
  url: Option<String>,
}

/// Parse `--dump-single-json` output into records, dropping entries without an id.
/// A playlist with no usable entries is an `EmptyPage` error: there is nothing to show.
pub fn parse_flat_playlist(json: &str) -> Result<Vec<VideoRecord>, BrowseError> {
  let playlist: FlatPlaylist =
    serde_json::from_str(json).map_err(|e| BrowseError::Provider(format!("malformed catalog response: {}", e)))?;

  let records: Vec<VideoRecord> = playlist.entries.into_iter().flatten().filter_map(into_record).collect();
  if records.is_empty() {
    return Err(BrowseError::EmptyPage);
  }
  Ok(records)
}

fn into_record(entry: FlatEntry) -> Option<VideoRecord> {
  let non_empty = |s: Option<String>| s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty() && s != "NA");

  let id = non_empty(entry.id)?;
  let title = non_empty(entry.title).unwrap_or_else(|| "Untitled".to_string());
  let channel_name =
    non_empty(entry.channel).or_else(|| non_empty(entry.uploader)).unwrap_or_else(|| "Unknown".to_string());
  let duration_text = non_empty(entry.duration_string)
    .or_else(|| entry.duration.map(format_duration))
    .unwrap_or_else(|| "--:--".to_string());
  let playback_url = non_empty(entry.url)
    .filter(|u| u.starts_with("http://") || u.starts_with("https://"))
    .unwrap_or_else(|| format!("{}{}", constants().watch_url, id));

  Some(VideoRecord { id, title, channel_name, duration_text, playback_url })
}

/// Format seconds the way yt-dlp's `duration_string` does: `m:ss` or `h:mm:ss`.
fn format_duration(secs: f64) -> String {
  let total = secs.max(0.0).round() as u64;
  let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
  if h > 0 { format!("{}:{:02}:{:02}", h, m, s) } else { format!("{}:{:02}", m, s) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn parses_full_entry() {
    let json = r#"{"entries":[{"id":"abc","title":"Hello","channel":"Chan","duration_string":"3:21",
      "url":"https://www.youtube.com/watch?v=abc"}]}"#;
    let records = parse_flat_playlist(json).unwrap();
    assert_eq!(
      records,
      vec![VideoRecord {
        id: "abc".into(),
        title: "Hello".into(),
        channel_name: "Chan".into(),
        duration_text: "3:21".into(),
        playback_url: "https://www.youtube.com/watch?v=abc".into(),
      }]
    );
  }

  #[test]
  fn missing_fields_fall_back() {
    let json = r#"{"entries":[{"id":"xyz"}]}"#;
    let r = &parse_flat_playlist(json).unwrap()[0];
    assert_eq!(r.title, "Untitled");
    assert_eq!(r.channel_name, "Unknown");
    assert_eq!(r.duration_text, "--:--");
    assert_eq!(r.playback_url, "https://www.youtube.com/watch?v=xyz");
  }

  #[test]
  fn uploader_used_when_channel_missing() {
    let json = r#"{"entries":[{"id":"a","uploader":"Up","duration":3725.0}]}"#;
    let r = &parse_flat_playlist(json).unwrap()[0];
    assert_eq!(r.channel_name, "Up");
    assert_eq!(r.duration_text, "1:02:05");
  }

  #[test]
  fn entries_without_id_are_dropped() {
    let json = r#"{"entries":[{"title":"no id"},null,{"id":"  "},{"id":"ok"}]}"#;
    let records = parse_flat_playlist(json).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "ok");
  }

  #[test]
  fn empty_playlist_is_empty_page() {
    assert_eq!(parse_flat_playlist(r#"{"entries":[]}"#), Err(BrowseError::EmptyPage));
    assert_eq!(parse_flat_playlist(r#"{"title":"x"}"#), Err(BrowseError::EmptyPage));
    assert_eq!(parse_flat_playlist(r#"{"entries":[{"title":"no id"}]}"#), Err(BrowseError::EmptyPage));
  }

  #[test]
  fn malformed_json_is_error() {
    assert!(matches!(parse_flat_playlist("not json"), Err(BrowseError::Provider(_))));
  }

  #[test]
  fn relative_url_replaced_with_watch_url() {
    let json = r#"{"entries":[{"id":"q1","url":"/watch?v=q1"}]}"#;
    assert_eq!(parse_flat_playlist(json).unwrap()[0].playback_url, "https://www.youtube.com/watch?v=q1");
  }

  #[test]
  fn format_duration_short_and_long() {
    assert_eq!(format_duration(59.0), "0:59");
    assert_eq!(format_duration(61.4), "1:01");
    assert_eq!(format_duration(3600.0), "1:00:00");
  }

  #[test]
  fn search_url_encodes_query() {
    assert_eq!(
      search_url("cats & dogs"),
      "https://www.youtube.com/results?search_query=cats+%26+dogs&sp=EgIQAQ%253D%253D"
    );
  }

  #[tokio::test]
  async fn missing_program_maps_to_provider_error() {
    let provider = YtDlpProvider::new("definitely-not-a-real-yt-dlp-binary");
    let err = provider.fetch(FeedSpec::Trending).await.unwrap_err();
    assert!(matches!(err, BrowseError::Provider(ref msg) if msg.contains("not found")));
  }
}
