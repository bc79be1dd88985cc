use super::KeyResult;
use crate::catalog::Card;
use crate::ui::renderfns::{format_price, humanize_key, type_color};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Events emitted by the detail overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailEvent {
  Closed,
}

#[derive(Debug, Clone, Default, PartialEq)]
enum DetailState {
  #[default]
  Closed,
  Open(Box<Card>),
}

/// Modal with everything known about one card.
#[derive(Debug, Clone, Default)]
pub struct DetailOverlay {
  state: DetailState,
  scroll: u16,
}

impl DetailOverlay {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_open(&self) -> bool {
    matches!(self.state, DetailState::Open(_))
  }

  pub fn card(&self) -> Option<&Card> {
    match &self.state {
      DetailState::Open(card) => Some(card),
      DetailState::Closed => None,
    }
  }

  /// Open on `card`. Ignored while the grid is loading, since the
  /// selection may point into a page that is about to be replaced.
  pub fn open(&mut self, card: Card, loading: bool) -> bool {
    if loading {
      return false;
    }
    self.state = DetailState::Open(Box::new(card));
    self.scroll = 0;
    true
  }

  pub fn close(&mut self) {
    self.state = DetailState::Closed;
    self.scroll = 0;
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<DetailEvent> {
    if !self.is_open() {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter | KeyCode::Backspace => {
        self.close();
        KeyResult::Event(DetailEvent::Closed)
      }
      KeyCode::Char('j') | KeyCode::Down => {
        self.scroll = self.scroll.saturating_add(1);
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.scroll = self.scroll.saturating_sub(1);
        KeyResult::Handled
      }
      // Modal: nothing leaks to the grid underneath
      _ => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    let Some(card) = self.card() else {
      return;
    };

    let width = (area.width * 80 / 100).max(40).min(area.width);
    let height = (area.height * 85 / 100).max(10).min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .title(format!(" {} ", card.name))
      .title_alignment(Alignment::Center)
      .title_bottom(Line::from(" j/k scroll, Esc close ").right_aligned())
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(detail_lines(card))
      .block(block)
      .wrap(Wrap { trim: false })
      .scroll((self.scroll, 0));
    frame.render_widget(paragraph, overlay_area);
  }
}

fn label(text: &str) -> Span<'static> {
  Span::styled(format!("{:<14}", text), Style::default().fg(Color::DarkGray))
}

fn section(title: &str) -> Line<'static> {
  Line::from(Span::styled(
    title.to_string(),
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
  ))
}

fn field(name: &str, value: impl Into<String>) -> Line<'static> {
  Line::from(vec![label(name), Span::raw(value.into())])
}

fn detail_lines(card: &Card) -> Vec<Line<'static>> {
  let mut lines = vec![
    field("Id", card.id.clone()),
    field("Supertype", card.supertype.clone().unwrap_or_else(|| "-".to_string())),
  ];

  if !card.subtypes.is_empty() {
    lines.push(field("Subtypes", card.subtypes.join(", ")));
  }

  if !card.types.is_empty() {
    let mut spans = vec![label("Types")];
    for (i, t) in card.types.iter().enumerate() {
      if i > 0 {
        spans.push(Span::raw(", "));
      }
      spans.push(Span::styled(t.clone(), Style::default().fg(type_color(t))));
    }
    lines.push(Line::from(spans));
  }

  if let Some(hp) = &card.hp {
    lines.push(field("HP", hp.clone()));
  }

  if !card.attacks.is_empty() {
    lines.push(Line::default());
    lines.push(section("Attacks"));
    for attack in &card.attacks {
      let mut spans = vec![Span::styled(
        attack.name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
      )];
      if !attack.damage.is_empty() {
        spans.push(Span::styled(
          format!("  {}", attack.damage),
          Style::default().fg(Color::Red),
        ));
      }
      lines.push(Line::from(spans));
      if let Some(text) = attack.text.as_deref().filter(|t| !t.is_empty()) {
        lines.push(Line::from(Span::styled(
          format!("  {}", text),
          Style::default().fg(Color::Gray),
        )));
      }
    }
  }

  if let Some(set) = &card.set {
    lines.push(Line::default());
    lines.push(section("Set"));
    lines.push(field("Name", set.name.clone()));
    lines.push(field("Series", set.series.clone()));
    let released = set
      .release_date()
      .map(|d| d.format("%B %-d, %Y").to_string())
      .unwrap_or_else(|| set.release_date.clone());
    lines.push(field("Released", released));
    lines.push(field("Cards", format!("{} printed / {} total", set.printed_total, set.total)));
    if let Some(code) = &set.ptcgo_code {
      lines.push(field("Code", code.clone()));
    }
  }

  if let Some(tcg) = card.tcgplayer.as_ref().filter(|t| !t.prices.is_empty()) {
    lines.push(Line::default());
    lines.push(section("Prices"));
    for (variant, tiers) in &tcg.prices {
      lines.push(Line::from(Span::styled(
        humanize_key(variant),
        Style::default().add_modifier(Modifier::BOLD),
      )));
      for (tier, value) in tiers.entries() {
        lines.push(Line::from(vec![
          Span::raw("  "),
          label(tier),
          Span::styled(format_price(value), Style::default().fg(Color::Green)),
        ]));
      }
    }
    if !tcg.updated_at.is_empty() {
      lines.push(field("Updated", tcg.updated_at.clone()));
    }
    if !tcg.url.is_empty() {
      lines.push(field("Market", tcg.url.clone()));
    }
  }

  lines.push(Line::default());
  lines.push(section("Images"));
  lines.push(field("Small", card.images.small.clone()));
  lines.push(field("Large", card.images.large.clone()));

  lines
}
