//! Maps a logical selection onto the bounded window of visible rows.

use std::ops::Range;

use crate::model::Tab;

/// Result of laying out a list: the scroll offset to keep and the rows to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
  pub scroll_offset: usize,
  pub visible: Range<usize>,
}

/// Clamp a selection into `0..total`, or 0 for an empty list.
pub fn clamp_selection(selection: usize, total: usize) -> usize {
  selection.min(total.saturating_sub(1))
}

/// Scroll just enough to keep `selection` inside a window of `height` rows.
pub fn compute_visible(selection: usize, total: usize, scroll_offset: usize, height: usize) -> Viewport {
  let selection = clamp_selection(selection, total);
  let mut offset = scroll_offset;

  if height > 0 && selection >= offset + height {
    offset = selection + 1 - height;
  } else if selection < offset {
    offset = selection;
  }
  offset = offset.min(total.saturating_sub(height));

  Viewport { scroll_offset: offset, visible: offset..total.min(offset + height) }
}

/// Whether moving to `selection` should fetch the next page. Only the search
/// feed pages; trending is a one-shot load.
pub fn should_prefetch(tab: Tab, selection: usize, total: usize, margin: usize) -> bool {
  tab == Tab::Search && total > 0 && selection + margin >= total
}

#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  #[test]
  fn no_scroll_while_selection_visible() {
    assert_eq!(compute_visible(3, 100, 0, 10), Viewport { scroll_offset: 0, visible: 0..10 });
  }

  #[test]
  fn scrolls_down_to_reveal_at_bottom() {
    assert_eq!(compute_visible(10, 100, 0, 10), Viewport { scroll_offset: 1, visible: 1..11 });
    assert_eq!(compute_visible(42, 100, 0, 10), Viewport { scroll_offset: 33, visible: 33..43 });
  }

  #[test]
  fn scrolls_up_to_reveal_at_top() {
    assert_eq!(compute_visible(5, 100, 20, 10), Viewport { scroll_offset: 5, visible: 5..15 });
  }

  #[test]
  fn clamps_offset_when_list_shrinks() {
    // Selection beyond the end is clamped first, then the offset.
    assert_eq!(compute_visible(80, 12, 70, 10), Viewport { scroll_offset: 2, visible: 2..12 });
  }

  #[test]
  fn short_list_never_scrolls() {
    assert_eq!(compute_visible(4, 5, 3, 10), Viewport { scroll_offset: 0, visible: 0..5 });
  }

  #[test]
  fn empty_list() {
    assert_eq!(compute_visible(7, 0, 4, 10), Viewport { scroll_offset: 0, visible: 0..0 });
  }

  #[test]
  fn zero_height_shows_nothing() {
    let v = compute_visible(3, 10, 0, 0);
    assert!(v.visible.is_empty());
  }

  #[test]
  fn clamp_selection_bounds() {
    assert_eq!(clamp_selection(0, 0), 0);
    assert_eq!(clamp_selection(9, 0), 0);
    assert_eq!(clamp_selection(9, 5), 4);
    assert_eq!(clamp_selection(2, 5), 2);
  }

  #[test]
  fn prefetch_near_end_of_search() {
    assert!(should_prefetch(Tab::Search, 47, 50, 3));
    assert!(should_prefetch(Tab::Search, 49, 50, 3));
    assert!(!should_prefetch(Tab::Search, 46, 50, 3));
  }

  #[test]
  fn prefetch_never_on_trending_or_empty() {
    assert!(!should_prefetch(Tab::Trending, 49, 50, 3));
    assert!(!should_prefetch(Tab::Search, 0, 0, 3));
  }

  proptest! {
    #[test]
    fn selection_always_visible(total in 1usize..500, height in 1usize..80, sel in 0usize..600, offset in 0usize..600) {
      let v = compute_visible(sel, total, offset, height);
      let sel = clamp_selection(sel, total);
      prop_assert!(v.scroll_offset <= sel);
      prop_assert!(sel < v.scroll_offset + height);
      prop_assert!(v.scroll_offset <= total.saturating_sub(height));
      prop_assert!(v.visible.contains(&sel));
      prop_assert!(v.visible.end <= total);
      prop_assert!(v.visible.len() <= height);
    }
  }
}
