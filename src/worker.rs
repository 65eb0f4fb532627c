use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::BrowseError;
use crate::model::{FeedSpec, VideoRecord};
use crate::provider::CatalogProvider;

/// Completion message of one fetch: the request it answers and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
  pub spec: FeedSpec,
  pub outcome: Result<Vec<VideoRecord>, BrowseError>,
}

pub type FetchSender = mpsc::UnboundedSender<FetchResult>;
pub type FetchReceiver = mpsc::UnboundedReceiver<FetchResult>;

/// Runs provider calls on background tasks and reports each completion on the channel.
///
/// Workers never touch browser state; the channel is the only way results get back.
#[derive(Clone)]
pub struct FetchWorker {
  provider: Arc<dyn CatalogProvider>,
  tx: FetchSender,
}

impl FetchWorker {
  /// Create a worker handle together with the receiving end of its completion channel.
  pub fn new(provider: Arc<dyn CatalogProvider>) -> (Self, FetchReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Self { provider, tx }, rx)
  }

  /// Fire-and-forget: exactly one `FetchResult` is sent for every call.
  pub fn spawn_fetch(&self, spec: FeedSpec) {
    let fut = self.provider.fetch(spec.clone());
    let tx = self.tx.clone();
    debug!(?spec, "worker: fetch spawned");
    tokio::spawn(async move {
      // A panicking provider still owes the channel an answer.
      let outcome = match tokio::spawn(fut).await {
        Ok(outcome) => outcome,
        Err(e) => Err(BrowseError::Provider(format!("provider task aborted: {}", e))),
      };
      // The receiver only goes away on shutdown.
      let _ = tx.send(FetchResult { spec, outcome });
    });
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use futures::future::BoxFuture;
  use std::collections::HashMap;
  use std::sync::Mutex as StdMutex;
  use std::time::Duration;

  /// In-memory provider: canned pages per spec, everything else fails.
  #[derive(Default)]
  pub(crate) struct FakeProvider {
    pub(crate) pages: StdMutex<HashMap<FeedSpec, Vec<VideoRecord>>>,
    pub(crate) calls: StdMutex<Vec<FeedSpec>>,
  }

  impl FakeProvider {
    pub(crate) fn with_page(self, spec: FeedSpec, records: Vec<VideoRecord>) -> Self {
      self.pages.lock().unwrap().insert(spec, records);
      self
    }

    pub(crate) fn calls(&self) -> Vec<FeedSpec> {
      self.calls.lock().unwrap().clone()
    }
  }

  impl CatalogProvider for FakeProvider {
    fn fetch(&self, spec: FeedSpec) -> BoxFuture<'static, Result<Vec<VideoRecord>, BrowseError>> {
      self.calls.lock().unwrap().push(spec.clone());
      let page = self.pages.lock().unwrap().get(&spec).cloned();
      Box::pin(async move { page.ok_or_else(|| BrowseError::Provider("no such page".into())) })
    }
  }

  struct PanickingProvider;

  fn explode() -> Result<Vec<VideoRecord>, BrowseError> {
    panic!("provider blew up")
  }

  impl CatalogProvider for PanickingProvider {
    fn fetch(&self, _spec: FeedSpec) -> BoxFuture<'static, Result<Vec<VideoRecord>, BrowseError>> {
      Box::pin(async { explode() })
    }
  }

  pub(crate) fn record(id: &str) -> VideoRecord {
    VideoRecord {
      id: id.to_string(),
      title: format!("Video {}", id),
      channel_name: "Channel".to_string(),
      duration_text: "1:00".to_string(),
      playback_url: format!("https://www.youtube.com/watch?v={}", id),
    }
  }

  pub(crate) fn records(prefix: &str, n: usize) -> Vec<VideoRecord> {
    (0..n).map(|i| record(&format!("{}{}", prefix, i))).collect()
  }

  pub(crate) async fn recv(rx: &mut FetchReceiver) -> FetchResult {
    tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.expect("fetch timed out").expect("channel closed")
  }

  #[tokio::test]
  async fn success_is_reported_once() {
    let provider = FakeProvider::default().with_page(FeedSpec::Trending, records("t", 3));
    let (worker, mut rx) = FetchWorker::new(Arc::new(provider));
    worker.spawn_fetch(FeedSpec::Trending);

    let result = recv(&mut rx).await;
    assert_eq!(result.spec, FeedSpec::Trending);
    assert_eq!(result.outcome.unwrap().len(), 3);
    assert!(rx.try_recv().is_err());
  }

  #[tokio::test]
  async fn failure_is_reported_as_err() {
    let (worker, mut rx) = FetchWorker::new(Arc::new(FakeProvider::default()));
    let spec = FeedSpec::search_page("cats", 1, 50);
    worker.spawn_fetch(spec.clone());

    let result = recv(&mut rx).await;
    assert_eq!(result.spec, spec);
    assert!(matches!(result.outcome, Err(BrowseError::Provider(_))));
  }

  #[tokio::test]
  async fn panic_is_reported_as_err() {
    let (worker, mut rx) = FetchWorker::new(Arc::new(PanickingProvider));
    worker.spawn_fetch(FeedSpec::Trending);

    let result = recv(&mut rx).await;
    assert!(matches!(result.outcome, Err(BrowseError::Provider(ref m)) if m.contains("aborted")));
  }
}
