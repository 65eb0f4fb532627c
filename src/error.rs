use thiserror::Error;

use crate::model::FeedSpec;

/// Recoverable failures of the browsing engine. None of these ends the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowseError {
  /// Network or parse failure while fetching a page.
  #[error("catalog fetch failed: {0}")]
  Provider(String),

  /// The catalog answered, but with no usable entries (e.g. a page past the last result).
  #[error("catalog returned no entries")]
  EmptyPage,

  /// The player process could not be started.
  #[error("failed to launch player: {0}")]
  Launch(String),

  /// A fetch result arrived for a request the feed no longer expects.
  #[error("stale result for {received:?} (expected {expected:?})")]
  Stale { expected: Option<FeedSpec>, received: FeedSpec },
}

