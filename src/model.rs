/// A single video entry from a catalog feed. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
  pub id: String,
  pub title: String,
  pub channel_name: String,
  pub duration_text: String,
  pub playback_url: String,
}

/// Which of the two independent feeds a request or result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
  Trending,
  Search,
}

/// Fully describes one fetch request. Equal specs are the same page request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeedSpec {
  Trending,
  /// `page_window_start..=page_window_end` are 1-indexed result ranks.
  Search { query: String, page_window_start: usize, page_window_end: usize },
}

impl FeedSpec {
  /// Spec for the `page`-th (1-indexed) page of `query`.
  pub fn search_page(query: &str, page: usize, page_size: usize) -> Self {
    let page = page.max(1);
    FeedSpec::Search {
      query: query.to_string(),
      page_window_start: (page - 1) * page_size + 1,
      page_window_end: page * page_size,
    }
  }

  pub fn kind(&self) -> FeedKind {
    match self {
      FeedSpec::Trending => FeedKind::Trending,
      FeedSpec::Search { .. } => FeedKind::Search,
    }
  }

  /// 1-indexed page number this spec covers. Trending is always page 1.
  pub fn page_number(&self) -> usize {
    match self {
      FeedSpec::Trending => 1,
      FeedSpec::Search { page_window_start, page_window_end, .. } => {
        let size = page_window_end.saturating_sub(*page_window_start) + 1;
        page_window_start.saturating_sub(1) / size + 1
      }
    }
  }

  /// Number of ranks the request asks for.
  pub fn window_len(&self) -> Option<usize> {
    match self {
      FeedSpec::Trending => None,
      FeedSpec::Search { page_window_start, page_window_end, .. } => {
        Some(page_window_end.saturating_sub(*page_window_start) + 1)
      }
    }
  }
}

/// The two tabs of the browser, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
  #[default]
  Trending,
  Search,
}

impl Tab {
  pub const ALL: [Tab; 2] = [Tab::Trending, Tab::Search];

  pub fn next(self) -> Self {
    match self {
      Tab::Trending => Tab::Search,
      Tab::Search => Tab::Trending,
    }
  }

  pub fn feed(self) -> FeedKind {
    match self {
      Tab::Trending => FeedKind::Trending,
      Tab::Search => FeedKind::Search,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn search_page_windows() {
    assert_eq!(
      FeedSpec::search_page("cats", 1, 50),
      FeedSpec::Search { query: "cats".into(), page_window_start: 1, page_window_end: 50 }
    );
    assert_eq!(
      FeedSpec::search_page("cats", 3, 50),
      FeedSpec::Search { query: "cats".into(), page_window_start: 101, page_window_end: 150 }
    );
  }

  #[test]
  fn search_page_zero_is_first_page() {
    assert_eq!(FeedSpec::search_page("x", 0, 50), FeedSpec::search_page("x", 1, 50));
  }

  #[test]
  fn page_number_inverts_search_page() {
    for page in 1..6 {
      assert_eq!(FeedSpec::search_page("q", page, 50).page_number(), page);
    }
    assert_eq!(FeedSpec::Trending.page_number(), 1);
  }

  #[test]
  fn kind_and_window_len() {
    assert_eq!(FeedSpec::Trending.kind(), FeedKind::Trending);
    assert_eq!(FeedSpec::Trending.window_len(), None);
    let spec = FeedSpec::search_page("q", 2, 20);
    assert_eq!(spec.kind(), FeedKind::Search);
    assert_eq!(spec.window_len(), Some(20));
  }

  #[test]
  fn tab_cycles() {
    assert_eq!(Tab::Trending.next(), Tab::Search);
    assert_eq!(Tab::Search.next(), Tab::Trending);
    assert_eq!(Tab::Trending.feed(), FeedKind::Trending);
  }
}
