use crate::catalog::Card;
use crate::ui::renderfns::{format_price, truncate, type_color};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Width of one card cell, borders included
const CELL_WIDTH: u16 = 30;
/// Height of one card cell, borders included
const CELL_HEIGHT: u16 = 6;

/// Grid of card tiles with a 2D selection cursor.
///
/// The column count follows the last rendered width, so navigation
/// matches what is on screen.
#[derive(Debug, Clone)]
pub struct CardGrid {
  selected: usize,
  columns: usize,
  scroll_row: usize,
}

impl Default for CardGrid {
  fn default() -> Self {
    Self {
      selected: 0,
      columns: 1,
      scroll_row: 0,
    }
  }
}

impl CardGrid {
  pub fn new() -> Self {
    Self::default()
  }

  #[cfg(test)]
  pub fn selected_index(&self) -> usize {
    self.selected
  }

  pub fn selected<'a>(&self, cards: &'a [Card]) -> Option<&'a Card> {
    cards.get(self.selected)
  }

  /// Back to the first card, e.g. after the page changed
  pub fn reset(&mut self) {
    self.selected = 0;
    self.scroll_row = 0;
  }

  pub fn columns_for_width(width: u16) -> usize {
    usize::from((width / CELL_WIDTH).max(1))
  }

  /// Move the cursor with h/j/k/l or arrows. Returns false for other keys.
  pub fn handle_key(&mut self, key: KeyEvent, len: usize) -> bool {
    if len == 0 {
      return matches!(
        key.code,
        KeyCode::Char('h' | 'j' | 'k' | 'l')
          | KeyCode::Left
          | KeyCode::Down
          | KeyCode::Up
          | KeyCode::Right
      );
    }

    let last = len - 1;
    let cols = self.columns.max(1);
    self.selected = self.selected.min(last);

    match key.code {
      KeyCode::Char('h') | KeyCode::Left => {
        self.selected = self.selected.saturating_sub(1);
      }
      KeyCode::Char('l') | KeyCode::Right => {
        self.selected = (self.selected + 1).min(last);
      }
      KeyCode::Char('k') | KeyCode::Up => {
        if self.selected >= cols {
          self.selected -= cols;
        }
      }
      KeyCode::Char('j') | KeyCode::Down => {
        if self.selected + cols <= last {
          self.selected += cols;
        }
      }
      _ => return false,
    }
    true
  }

  /// Keep the selected row inside the visible window
  fn scroll_into_view(&mut self, visible_rows: usize) {
    let row = self.selected / self.columns.max(1);
    let visible_rows = visible_rows.max(1);
    if row < self.scroll_row {
      self.scroll_row = row;
    } else if row >= self.scroll_row + visible_rows {
      self.scroll_row = row + 1 - visible_rows;
    }
  }

  pub fn render(&mut self, frame: &mut Frame, area: Rect, cards: &[Card], title: &str, loading: bool) {
    let block = Block::default()
      .title(format!(" {} ", title))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    // Cards of a superseded page are never shown while its replacement loads
    if cards.is_empty() || loading {
      let content = if loading {
        "Loading cards..."
      } else {
        "No cards found."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    self.columns = Self::columns_for_width(inner.width);
    self.selected = self.selected.min(cards.len() - 1);
    let visible_rows = usize::from((inner.height / CELL_HEIGHT).max(1));
    self.scroll_into_view(visible_rows);

    let rows = Layout::vertical(vec![Constraint::Length(CELL_HEIGHT); visible_rows]).split(inner);
    let col_constraints = vec![Constraint::Ratio(1, self.columns as u32); self.columns];

    for (row_offset, row_area) in rows.iter().enumerate() {
      let row = self.scroll_row + row_offset;
      let cells = Layout::horizontal(col_constraints.clone()).split(*row_area);
      for (col, cell_area) in cells.iter().enumerate() {
        let index = row * self.columns + col;
        let Some(card) = cards.get(index) else {
          return;
        };
        render_cell(frame, *cell_area, card, index == self.selected);
      }
    }
  }
}

fn render_cell(frame: &mut Frame, area: Rect, card: &Card, selected: bool) {
  let border = if selected {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::DarkGray)
  };
  let width = area.width.saturating_sub(2) as usize;

  let block = Block::default()
    .title(format!(" {} ", truncate(&card.name, width.saturating_sub(2))))
    .borders(Borders::ALL)
    .border_style(border);

  let mut type_spans: Vec<Span> = card
    .types
    .iter()
    .map(|t| Span::styled(format!("{} ", t), Style::default().fg(type_color(t))))
    .collect();
  if let Some(hp) = &card.hp {
    type_spans.push(Span::styled(format!("HP {}", hp), Style::default().fg(Color::White)));
  }
  if type_spans.is_empty() {
    type_spans.push(Span::styled(
      card.supertype.clone().unwrap_or_default(),
      Style::default().fg(Color::Gray),
    ));
  }

  let set_name = card.set.as_ref().map(|s| s.name.as_str()).unwrap_or("-");
  let market = card
    .tcgplayer
    .as_ref()
    .and_then(|t| t.prices.values().find_map(|p| p.market))
    .map(format_price)
    .unwrap_or_default();

  let lines = vec![
    Line::from(type_spans),
    Line::from(Span::styled(truncate(set_name, width), Style::default().fg(Color::Cyan))),
    Line::from(vec![
      Span::styled(truncate(&card.id, width), Style::default().fg(Color::DarkGray)),
      Span::raw(" "),
      Span::styled(market, Style::default().fg(Color::Green)),
    ]),
  ];

  frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::fake::card;
  use crossterm::event::KeyModifiers;
  use ratatui::backend::TestBackend;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn grid(columns: usize) -> CardGrid {
    CardGrid {
      columns,
      ..CardGrid::default()
    }
  }

  #[test]
  fn test_columns_for_width() {
    assert_eq!(CardGrid::columns_for_width(10), 1);
    assert_eq!(CardGrid::columns_for_width(90), 3);
    assert_eq!(CardGrid::columns_for_width(119), 3);
  }

  #[test]
  fn test_horizontal_moves_clamp() {
    let mut g = grid(3);
    assert!(g.handle_key(key(KeyCode::Char('h')), 5));
    assert_eq!(g.selected_index(), 0);
    for _ in 0..10 {
      g.handle_key(key(KeyCode::Right), 5);
    }
    assert_eq!(g.selected_index(), 4);
  }

  #[test]
  fn test_vertical_moves_by_row() {
    let mut g = grid(3);
    g.handle_key(key(KeyCode::Char('j')), 8);
    assert_eq!(g.selected_index(), 3);
    g.handle_key(key(KeyCode::Char('j')), 8);
    assert_eq!(g.selected_index(), 6);
    // No card below 6 + 3 = 9 in an 8 card page
    g.handle_key(key(KeyCode::Char('j')), 8);
    assert_eq!(g.selected_index(), 6);
    g.handle_key(key(KeyCode::Up), 8);
    assert_eq!(g.selected_index(), 3);
  }

  #[test]
  fn test_other_keys_not_handled() {
    let mut g = grid(3);
    assert!(!g.handle_key(key(KeyCode::Char('n')), 5));
  }

  fn rendered(grid: &mut CardGrid, cards: &[Card], loading: bool) -> String {
    let mut terminal = Terminal::new(TestBackend::new(70, 14)).unwrap();
    terminal
      .draw(|frame| grid.render(frame, frame.area(), cards, "Cards", loading))
      .unwrap();
    terminal
      .backend()
      .buffer()
      .content()
      .iter()
      .map(|cell| cell.symbol())
      .collect()
  }

  #[test]
  fn test_loading_hides_previous_cards() {
    let cards = vec![card("base1-4".to_string()), card("base1-58".to_string())];
    let mut g = CardGrid::new();

    let shown = rendered(&mut g, &cards, false);
    assert!(shown.contains("base1-58"));

    let loading = rendered(&mut g, &cards, true);
    assert!(loading.contains("Loading cards..."));
    assert!(!loading.contains("base1-58"));
  }

  #[test]
  fn test_reset() {
    let mut g = grid(2);
    g.handle_key(key(KeyCode::Down), 6);
    g.reset();
    assert_eq!(g.selected_index(), 0);
  }

  #[test]
  fn test_scroll_follows_selection() {
    let mut g = grid(2);
    g.selected = 7; // row 3
    g.scroll_into_view(2);
    assert_eq!(g.scroll_row, 2);
    g.selected = 0;
    g.scroll_into_view(2);
    assert_eq!(g.scroll_row, 0);
  }
}
