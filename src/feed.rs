use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::error::BrowseError;
use crate::model::{FeedKind, FeedSpec, VideoRecord};
use crate::worker::{FetchResult, FetchWorker};

/// Accumulated results of one feed.
///
/// `seen_ids` always equals the set of ids in `records`; `loading` is true
/// exactly while a fetch for this feed is outstanding.
#[derive(Debug, Clone)]
pub struct FeedState {
  records: Vec<VideoRecord>,
  seen_ids: HashSet<String>,
  page_counter: usize,
  loading: bool,
  /// The request whose result this feed is waiting for. Admission is gated on
  /// this, not on `loading`: a stale result clears the flag while the awaited
  /// worker is still running.
  pending: Option<FeedSpec>,
  /// A page came back short or empty: there is nothing more to page through.
  exhausted: bool,
}

impl Default for FeedState {
  fn default() -> Self {
    Self {
      records: Vec::new(),
      seen_ids: HashSet::new(),
      page_counter: 1,
      loading: false,
      pending: None,
      exhausted: false,
    }
  }
}

impl FeedState {
  pub fn records(&self) -> &[VideoRecord] {
    &self.records
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn page_counter(&self) -> usize {
    self.page_counter
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn is_exhausted(&self) -> bool {
    self.exhausted
  }

  fn reset(&mut self) {
    *self = Self::default();
  }

  /// Append records whose id hasn't been seen, preserving arrival order.
  /// Returns how many were accepted.
  fn append_unique(&mut self, new_records: Vec<VideoRecord>) -> usize {
    let before = self.records.len();
    for record in new_records {
      if self.seen_ids.insert(record.id.clone()) {
        self.records.push(record);
      }
    }
    self.records.len() - before
  }
}

/// Owns both feeds and is the single admission point for fetches.
pub struct FeedStore {
  trending: FeedState,
  search: FeedState,
  query: Option<String>,
  page_size: usize,
  worker: FetchWorker,
}

impl FeedStore {
  pub fn new(worker: FetchWorker, page_size: usize) -> Self {
    Self {
      trending: FeedState::default(),
      search: FeedState::default(),
      query: None,
      page_size: page_size.max(1),
      worker,
    }
  }

  pub fn feed(&self, kind: FeedKind) -> &FeedState {
    match kind {
      FeedKind::Trending => &self.trending,
      FeedKind::Search => &self.search,
    }
  }

  fn feed_mut(&mut self, kind: FeedKind) -> &mut FeedState {
    match kind {
      FeedKind::Trending => &mut self.trending,
      FeedKind::Search => &mut self.search,
    }
  }

  /// The query the search feed currently pages through.
  pub fn query(&self) -> Option<&str> {
    self.query.as_deref()
  }

  /// Spawn a fetch for `spec` unless its feed already has one outstanding.
  ///
  /// Returns whether a worker was spawned. A spec for a page beyond the
  /// feed's current counter advances the counter by one.
  pub fn request_page(&mut self, spec: FeedSpec) -> bool {
    let feed = self.feed_mut(spec.kind());
    if feed.loading || feed.pending.is_some() {
      debug!(?spec, pending = ?feed.pending, "feed: request ignored, fetch already in flight");
      return false;
    }
    if spec.page_number() > feed.page_counter {
      feed.page_counter += 1;
    }
    feed.loading = true;
    feed.pending = Some(spec.clone());
    self.worker.spawn_fetch(spec);
    true
  }

  /// Start the one-shot trending load.
  pub fn load_trending(&mut self) -> bool {
    self.request_page(FeedSpec::Trending)
  }

  /// Reset the search feed for `query` and request its first page.
  pub fn submit_query(&mut self, query: &str) -> bool {
    info!(query = %query, "feed: search submitted");
    self.search.reset();
    self.query = Some(query.to_string());
    self.request_page(FeedSpec::search_page(query, 1, self.page_size))
  }

  /// Request the page after the search feed's current one, if there can be one.
  pub fn request_next_page(&mut self) -> bool {
    let Some(query) = self.query.clone() else { return false };
    if self.search.exhausted || self.search.loading || self.search.pending.is_some() {
      return false;
    }
    let spec = FeedSpec::search_page(&query, self.search.page_counter + 1, self.page_size);
    self.request_page(spec)
  }

  /// Whether the search list has filled every page requested so far and more may follow.
  pub fn can_load_more(&self) -> bool {
    !self.search.is_empty()
      && !self.search.exhausted
      && self.search.len() >= self.page_size * self.search.page_counter
  }

  /// Merge a worker's completion into the matching feed.
  ///
  /// The loading flag is cleared whatever the outcome. Returns the number of
  /// records appended, or why nothing was.
  pub fn apply_fetch_result(&mut self, result: FetchResult) -> Result<usize, BrowseError> {
    let page_size = self.page_size;
    let FetchResult { spec, outcome } = result;
    let feed = self.feed_mut(spec.kind());
    feed.loading = false;

    if feed.pending.as_ref() != Some(&spec) {
      debug!(?spec, expected = ?feed.pending, "feed: discarding stale result");
      return Err(BrowseError::Stale { expected: feed.pending.clone(), received: spec });
    }
    feed.pending = None;

    match outcome {
      Ok(new_records) => {
        let received = new_records.len();
        if spec.kind() == FeedKind::Search && received < spec.window_len().unwrap_or(page_size) {
          feed.exhausted = true;
        }
        let accepted = feed.append_unique(new_records);
        info!(?spec, received, accepted, total = feed.len(), "feed: page applied");
        Ok(accepted)
      }
      Err(BrowseError::EmptyPage) if spec.kind() == FeedKind::Search => {
        info!(?spec, total = feed.len(), "feed: search has no more results");
        feed.exhausted = true;
        Err(BrowseError::EmptyPage)
      }
      Err(e) => {
        warn!(?spec, err = %e, "feed: fetch failed");
        Err(e)
      }
    }
  }
}
