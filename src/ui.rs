use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, BorderType, List, ListItem, Padding, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::BrowserSession;
use crate::model::{FeedKind, Tab};

const SPLASH: [&str; 5] = [
  "     ██ ██    ██ ██      ██ ███████ ████████       ██████  ██      ██████  ",
  "     ██ ██    ██ ██      ██ ██         ██          ██   ██ ██      ██   ██ ",
  "     ██ ██    ██ ██      ██ █████      ██    █████ ██   ██ ██      ██████  ",
  "██   ██ ██    ██ ██      ██ ██         ██          ██   ██ ██      ██      ",
  " █████   ██████  ███████ ██ ███████    ██          ██████  ███████ ██      ",
];

/// Below this height the splash is dropped to leave room for the list.
const SPLASH_MIN_HEIGHT: u16 = 24;

const HELP: &str = " TAB: Switch | /: Search | ↑↓: Navigate | ENTER: Play | Q: Quit ";

const ACCENT: Color = Color::Cyan;
const NOTICE: Color = Color::Yellow;
const HELP_FG: Color = Color::Green;
const MUTED: Color = Color::DarkGray;

// --- Helpers ---

/// Truncate a string to `max_width` columns, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.width() <= max_width {
    return s.to_string();
  }
  let mut out = String::new();
  let mut used = 0;
  for c in s.chars() {
    let w = c.width().unwrap_or(0);
    if used + w + 1 > max_width {
      break;
    }
    used += w;
    out.push(c);
  }
  out.push('…');
  out
}

/// The longest suffix of `s` that fits in `max_width` columns.
fn tail_fit(s: &str, max_width: usize) -> &str {
  let mut used = 0;
  let mut start = s.len();
  for (i, c) in s.char_indices().rev() {
    let w = c.width().unwrap_or(0);
    if used + w > max_width {
      break;
    }
    used += w;
    start = i;
  }
  &s[start..]
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, session: &mut BrowserSession) {
  let area = frame.area();
  let splash_h = if area.height >= SPLASH_MIN_HEIGHT { SPLASH.len() as u16 } else { 0 };

  let [splash_area, tabs_area, input_area, list_area, status_area, footer_area] = Layout::vertical([
    Constraint::Length(splash_h),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(1),
  ])
  .areas(area);

  render_splash(frame, splash_area);
  render_tabs(frame, session, tabs_area);
  render_input(frame, session, input_area);
  render_list(frame, session, list_area);
  render_status(frame, session, status_area);
  render_footer(frame, footer_area);
}

fn render_splash(frame: &mut Frame, area: Rect) {
  if area.height == 0 {
    return;
  }
  let lines: Vec<Line> = SPLASH.iter().map(|l| Line::styled(*l, Style::default().fg(ACCENT))).collect();
  frame.render_widget(Paragraph::new(lines), area);
}

fn render_tabs(frame: &mut Frame, session: &BrowserSession, area: Rect) {
  let busy = |kind| if session.is_loading(kind) { " …" } else { "" };
  let labels = [
    format!("Trending ({}){}", session.store.feed(FeedKind::Trending).len(), busy(FeedKind::Trending)),
    format!("Search Results (Page {}){}", session.store.feed(FeedKind::Search).page_counter(), busy(FeedKind::Search)),
  ];
  let mut spans = vec![Span::raw(" ")];
  for (tab, label) in Tab::ALL.iter().zip(labels) {
    let style = if *tab == session.tab {
      Style::default().fg(ACCENT).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
      Style::default().add_modifier(Modifier::DIM)
    };
    spans.push(Span::styled(format!(" {} ", label), style));
    spans.push(Span::raw("   "));
  }
  frame.render_widget(Line::from(spans), area);
}

fn render_input(frame: &mut Frame, session: &BrowserSession, area: Rect) {
  let typing = session.mode.is_text_entry();
  let border_color = if typing { ACCENT } else { MUTED };
  let block = Block::bordered()
    .title(" Search ")
    .title_style(Style::default().fg(border_color))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let shown = if typing { tail_fit(session.mode.buffer(), inner_w.saturating_sub(1)) } else { "" };
  frame.render_widget(Paragraph::new(shown).style(Style::default().fg(NOTICE)).block(block), area);

  if typing && session.cursor_visible {
    let cursor_x = area.x + 2 + shown.width() as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

fn render_list(frame: &mut Frame, session: &mut BrowserSession, area: Rect) {
  let viewport = session.layout(area.height.saturating_sub(2) as usize);
  let feed = session.active_feed();
  let inner_w = area.width.saturating_sub(2) as usize;

  let items: Vec<ListItem> = feed.records()[viewport.visible.clone()]
    .iter()
    .zip(viewport.visible.clone())
    .map(|(video, idx)| {
      let selected = idx == session.selection;
      let left_style = if selected {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD | Modifier::REVERSED)
      } else {
        Style::default()
      };

      let right = format!("{}  {}", truncate_str(&video.channel_name, 15), video.duration_text);
      let right_w = right.width();
      let prefix = format!("▶ {:2}. ", idx + 1);
      let title_max = inner_w.saturating_sub(prefix.width() + right_w + 2);
      let title = truncate_str(&video.title, title_max);
      let gap = inner_w.saturating_sub(prefix.width() + title.width() + right_w);

      ListItem::new(Line::from(vec![
        Span::styled(format!("{}{}", prefix, title), left_style),
        Span::raw(" ".repeat(gap)),
        Span::styled(right, Style::default().add_modifier(Modifier::DIM)),
      ]))
    })
    .collect();

  let title = match session.tab {
    Tab::Trending => " Trending ".to_string(),
    Tab::Search => match session.store.query() {
      Some(q) => format!(" Results for '{}' ", truncate_str(q, inner_w / 2)),
      None => " Results ".to_string(),
    },
  };

  let list = List::new(items).block(
    Block::bordered()
      .title(title)
      .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
      .border_type(BorderType::Rounded)
      .border_style(Style::default().fg(MUTED)),
  );
  frame.render_widget(list, area);
}

fn render_status(frame: &mut Frame, session: &BrowserSession, area: Rect) {
  let feed = session.active_feed();
  let (text, style) = if feed.is_loading() {
    (" ⏳ Loading more results…".to_string(), Style::default().fg(NOTICE))
  } else if session.tab == Tab::Search && session.store.can_load_more() {
    (" ↓ Scroll down to load more results ↓".to_string(), Style::default().fg(NOTICE))
  } else if session.tab == Tab::Search && feed.is_exhausted() && !feed.is_empty() {
    (format!(" End of results ({} videos)", feed.len()), Style::default().fg(MUTED))
  } else if session.tab == Tab::Search && session.store.query().is_none() {
    (" Press / to search.".to_string(), Style::default().fg(MUTED))
  } else {
    (format!(" {} videos", feed.len()), Style::default().fg(MUTED))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
  let help = Span::styled(HELP, Style::default().fg(HELP_FG).add_modifier(Modifier::REVERSED));
  frame.render_widget(Line::from(vec![Span::raw(" "), help]), area);
}
