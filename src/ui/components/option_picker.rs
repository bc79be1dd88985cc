use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

/// One selectable entry; an empty `value` means "no constraint"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
  pub value: String,
  pub label: String,
}

impl PickerOption {
  pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
    Self {
      value: value.into(),
      label: label.into(),
    }
  }
}

/// Events emitted by the picker that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
  /// Option chosen (its value)
  Selected(String),
  /// Picker cancelled
  Cancelled,
}

/// Overlay list for choosing one value, with type-to-narrow.
///
/// The first entry is always an "All" option with an empty value.
#[derive(Debug, Clone, Default)]
pub struct OptionPicker {
  active: bool,
  title: String,
  options: Vec<PickerOption>,
  filter: TextInput,
  selected: usize,
}

impl OptionPicker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Show the picker, pre-selecting the entry whose value is `current`
  pub fn show(&mut self, title: impl Into<String>, all_label: &str, options: Vec<PickerOption>, current: &str) {
    let mut all = vec![PickerOption::new("", all_label)];
    all.extend(options);

    self.active = true;
    self.title = title.into();
    self.filter.clear();
    self.selected = all.iter().position(|o| o.value == current).unwrap_or(0);
    self.options = all;
  }

  pub fn hide(&mut self) {
    self.active = false;
    self.options.clear();
    self.filter.clear();
    self.selected = 0;
  }

  /// Options matching the typed filter (case-insensitive, label or value)
  fn visible(&self) -> Vec<&PickerOption> {
    if self.filter.is_empty() {
      return self.options.iter().collect();
    }
    let needle = self.filter.value().to_lowercase();
    self
      .options
      .iter()
      .filter(|o| o.label.to_lowercase().contains(&needle) || o.value.to_lowercase().contains(&needle))
      .collect()
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<PickerEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    let len = self.visible().len();
    match key.code {
      KeyCode::Down | KeyCode::Tab => {
        if len > 0 {
          self.selected = (self.selected + 1) % len;
        }
        return KeyResult::Handled;
      }
      KeyCode::Up | KeyCode::BackTab => {
        if len > 0 {
          self.selected = if self.selected == 0 {
            len - 1
          } else {
            self.selected - 1
          };
        }
        return KeyResult::Handled;
      }
      _ => {}
    }

    match self.filter.handle_key(key) {
      InputResult::Submitted(_) => {
        let choice = self.visible().get(self.selected).map(|o| o.value.clone());
        self.hide();
        match choice {
          Some(value) => KeyResult::Event(PickerEvent::Selected(value)),
          None => KeyResult::Event(PickerEvent::Cancelled),
        }
      }
      InputResult::Cancelled => {
        self.hide();
        KeyResult::Event(PickerEvent::Cancelled)
      }
      InputResult::Changed => {
        self.selected = 0;
        KeyResult::Handled
      }
      InputResult::Consumed | InputResult::NotHandled => KeyResult::Handled,
    }
  }

  /// Render the picker overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let visible = self.visible();

    let max_label_len = self
      .options
      .iter()
      .map(|o| o.label.chars().count())
      .max()
      .unwrap_or(10);
    let width = (max_label_len as u16 + 6)
      .max(self.title.len() as u16 + 4)
      .max(24)
      .min(area.width.saturating_sub(4));
    let height = (self.options.len() as u16 + 3).min(area.height.saturating_sub(4)).max(4);

    // Center the overlay
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(format!(" {} ", self.title));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height < 2 {
      return;
    }

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Filter line
        Constraint::Min(1),    // Options
      ])
      .split(inner);

    let filter_line = Line::from(vec![
      Span::styled("> ", Style::default().fg(Color::Yellow)),
      Span::raw(self.filter.value()),
      Span::styled("_", Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(filter_line), chunks[0]);

    let items: Vec<ListItem> = visible
      .iter()
      .map(|option| {
        let style = if option.value.is_empty() {
          Style::default().fg(Color::Gray)
        } else {
          Style::default().fg(Color::Cyan)
        };
        ListItem::new(Line::from(Span::styled(option.label.clone(), style)))
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected));

    frame.render_stateful_widget(list, chunks[1], &mut state);
  }
}
