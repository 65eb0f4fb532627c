use ratatui::crossterm::event::KeyEvent;
use std::sync::Arc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, warn};

use crate::constants::constants;
use crate::error::BrowseError;
use crate::feed::{FeedState, FeedStore};
use crate::input::{InputMode, Intent};
use crate::model::{FeedKind, Tab, VideoRecord};
use crate::player::PlayerLauncher;
use crate::provider::CatalogProvider;
use crate::viewport::{Viewport, clamp_selection, compute_visible, should_prefetch};
use crate::worker::{FetchReceiver, FetchWorker};

/// Everything the frame loop owns: both feeds, selection, input mode and the
/// receiving end of the fetch-completion channel. Mutated only on the UI thread.
pub struct BrowserSession {
  pub store: FeedStore,
  pub tab: Tab,
  pub selection: usize,
  pub scroll_offset: usize,
  pub mode: InputMode,
  pub cursor_visible: bool,
  pub should_quit: bool,
  /// Rows available for the list, as of the last layout.
  pub viewport_height: usize,
  results_rx: FetchReceiver,
  launcher: Box<dyn PlayerLauncher>,
  prefetch_margin: usize,
}

impl BrowserSession {
  pub fn new(provider: Arc<dyn CatalogProvider>, launcher: Box<dyn PlayerLauncher>) -> Self {
    let (worker, results_rx) = FetchWorker::new(provider);
    Self {
      store: FeedStore::new(worker, constants().page_size),
      tab: Tab::default(),
      selection: 0,
      scroll_offset: 0,
      mode: InputMode::default(),
      cursor_visible: false,
      should_quit: false,
      viewport_height: 0,
      results_rx,
      launcher,
      prefetch_margin: constants().prefetch_margin,
    }
  }

  pub fn active_feed(&self) -> &FeedState {
    self.store.feed(self.tab.feed())
  }

  pub fn selected_record(&self) -> Option<&VideoRecord> {
    self.active_feed().records().get(self.selection)
  }

  /// Apply every completion waiting on the channel without blocking.
  /// Returns how many results were processed.
  pub fn drain_fetch_results(&mut self) -> usize {
    let mut processed = 0;
    loop {
      match self.results_rx.try_recv() {
        Ok(result) => {
          processed += 1;
          match self.store.apply_fetch_result(result) {
            Ok(_) => {}
            Err(BrowseError::Stale { received, .. }) => debug!(?received, "session: stale result dropped"),
            Err(e) => debug!(err = %e, "session: fetch failure absorbed"),
          }
        }
        Err(TryRecvError::Empty) => break,
        // The store holds a sender, so this only happens while tearing down.
        Err(TryRecvError::Disconnected) => break,
      }
    }
    processed
  }

  /// Recompute the visible window for a list `height` rows tall.
  pub fn layout(&mut self, height: usize) -> Viewport {
    self.viewport_height = height;
    let total = self.active_feed().len();
    self.selection = clamp_selection(self.selection, total);
    let viewport = compute_visible(self.selection, total, self.scroll_offset, height);
    self.scroll_offset = viewport.scroll_offset;
    viewport
  }

  pub fn handle_key(&mut self, key: KeyEvent) {
    for intent in self.mode.handle_key(key) {
      self.apply_intent(intent);
    }
  }

  pub fn apply_intent(&mut self, intent: Intent) {
    match intent {
      Intent::ShowCursor => self.cursor_visible = true,
      Intent::HideCursor => self.cursor_visible = false,
      Intent::SwitchTab => {
        self.tab = self.tab.next();
        self.reset_position();
      }
      Intent::MoveSelection(delta) => self.move_selection(delta),
      Intent::PlaySelected => self.play_selected(),
      Intent::SubmitQuery(query) => {
        self.store.submit_query(&query);
        self.tab = Tab::Search;
        self.reset_position();
      }
      Intent::Quit => {
        info!("session: quit requested");
        self.should_quit = true;
      }
    }
  }

  fn reset_position(&mut self) {
    self.selection = 0;
    self.scroll_offset = 0;
  }

  fn move_selection(&mut self, delta: isize) {
    let total = self.active_feed().len();
    if total == 0 {
      self.reset_position();
      return;
    }
    self.selection = self.selection.saturating_add_signed(delta).min(total - 1);
    self.scroll_offset = compute_visible(self.selection, total, self.scroll_offset, self.viewport_height).scroll_offset;

    if delta > 0 && should_prefetch(self.tab, self.selection, total, self.prefetch_margin) {
      let spawned = self.store.request_next_page();
      debug!(selection = self.selection, total, spawned, "session: prefetch check");
    }
  }

  fn play_selected(&self) {
    let Some(record) = self.selected_record() else { return };
    if let Err(e) = self.launcher.launch(&record.playback_url) {
      warn!(err = %e, id = %record.id, "session: playback not started");
    }
  }

  /// Whether `kind` has a fetch in flight.
  pub fn is_loading(&self, kind: FeedKind) -> bool {
    self.store.feed(kind).is_loading()
  }
}
