use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// How keystrokes are currently interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
  #[default]
  Navigation,
  TextEntry { buffer: String },
}

/// A decoded user action, independent of the key that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
  ShowCursor,
  HideCursor,
  SwitchTab,
  MoveSelection(isize),
  PlaySelected,
  SubmitQuery(String),
  Quit,
}

impl InputMode {
  pub fn is_text_entry(&self) -> bool {
    matches!(self, InputMode::TextEntry { .. })
  }

  /// The text-entry buffer, or `""` while navigating.
  pub fn buffer(&self) -> &str {
    match self {
      InputMode::TextEntry { buffer } => buffer,
      InputMode::Navigation => "",
    }
  }

  /// Advance the state machine by one key. Unmapped keys yield no intents.
  pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Intent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return vec![Intent::Quit];
    }

    match self {
      InputMode::Navigation => self.handle_navigation_key(key),
      InputMode::TextEntry { .. } => self.handle_text_key(key),
    }
  }

  fn handle_navigation_key(&mut self, key: KeyEvent) -> Vec<Intent> {
    let intent = match key.code {
      KeyCode::Char('/') => {
        *self = InputMode::TextEntry { buffer: String::new() };
        Intent::ShowCursor
      }
      KeyCode::Tab => Intent::SwitchTab,
      KeyCode::Up | KeyCode::Char('k') => Intent::MoveSelection(-1),
      KeyCode::Down | KeyCode::Char('j') => Intent::MoveSelection(1),
      KeyCode::Enter => Intent::PlaySelected,
      KeyCode::Char('q') => Intent::Quit,
      _ => return Vec::new(),
    };
    vec![intent]
  }

  fn handle_text_key(&mut self, key: KeyEvent) -> Vec<Intent> {
    let InputMode::TextEntry { buffer } = self else { return Vec::new() };
    match key.code {
      KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) && !c.is_control() => {
        buffer.push(c);
        Vec::new()
      }
      KeyCode::Backspace => {
        buffer.pop();
        Vec::new()
      }
      KeyCode::Enter => {
        let query = std::mem::take(buffer);
        *self = InputMode::Navigation;
        if query.is_empty() { vec![Intent::HideCursor] } else { vec![Intent::SubmitQuery(query), Intent::HideCursor] }
      }
      KeyCode::Esc => {
        *self = InputMode::Navigation;
        vec![Intent::HideCursor]
      }
      _ => Vec::new(),
    }
  }
}
