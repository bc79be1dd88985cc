use crate::app::AppContext;
use crate::ui::components::KeyResult;
use crate::ui::ensure_valid_selection;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::{EmptyView, SearchView};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
  Search,
  Empty,
}

const LINKS: &[(Link, &str, &str)] = &[
  (Link::Search, "Browse cards", "search, filter and page through the catalog"),
  (Link::Empty, "Empty page", "a blank page"),
];

/// Start page with links to the other views
pub struct HomeView {
  ctx: AppContext,
  list_state: ListState,
}

impl HomeView {
  pub fn new(ctx: AppContext) -> Self {
    Self {
      ctx,
      list_state: ListState::default().with_selected(Some(0)),
    }
  }

  fn selected_link(&self) -> Option<Link> {
    self
      .list_state
      .selected()
      .and_then(|i| LINKS.get(i))
      .map(|(link, _, _)| *link)
  }

  fn open(&self, link: Link) -> Box<dyn View> {
    match link {
      Link::Search => Box::new(SearchView::new(
        self.ctx.client.clone(),
        self.ctx.session.clone(),
      )),
      Link::Empty => Box::new(EmptyView::new()),
    }
  }

  fn handle_navigation(&mut self, key: KeyEvent) -> KeyResult<Link> {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
        KeyResult::Handled
      }
      KeyCode::Enter => match self.selected_link() {
        Some(link) => KeyResult::Event(link),
        None => KeyResult::Handled,
      },
      KeyCode::Char('s') => KeyResult::Event(Link::Search),
      _ => KeyResult::NotHandled,
    }
  }
}

impl View for HomeView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.handle_navigation(key) {
      KeyResult::Event(link) => ViewAction::Push(self.open(link)),
      KeyResult::Handled => ViewAction::None,
      KeyResult::NotHandled => match key.code {
        KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
        _ => ViewAction::None,
      },
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    ensure_valid_selection(&mut self.list_state, LINKS.len());

    let block = Block::default()
      .title(" cardex ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3), // Intro
        Constraint::Min(0),    // Links
      ])
      .margin(1)
      .split(inner);

    let intro = Paragraph::new(format!(
      "Browse the trading card catalog at {}.",
      self.ctx.client.host()
    ))
    .style(Style::default().fg(Color::Gray))
    .wrap(Wrap { trim: true });
    frame.render_widget(intro, chunks[0]);

    let items: Vec<ListItem> = LINKS
      .iter()
      .map(|(_, label, description)| {
        ListItem::new(Line::from(vec![
          Span::styled(format!("{:<16}", label), Style::default().fg(Color::Cyan)),
          Span::styled(*description, Style::default().fg(Color::DarkGray)),
        ]))
      })
      .collect();

    let list = List::new(items)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");
    frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
  }

  fn breadcrumb_label(&self) -> String {
    "Home".to_string()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("Enter", "open").with_priority(20),
      ShortcutInfo::new("s", "search").with_priority(30),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::CatalogClient;
  use crate::search::SessionOptions;
  use crossterm::event::KeyModifiers;
  use std::time::Duration;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn home() -> HomeView {
    let client = CatalogClient::with_api_key(
      "http://127.0.0.1:9",
      "test".to_string(),
      Duration::from_secs(1),
    )
    .unwrap();
    HomeView::new(AppContext {
      client,
      session: SessionOptions {
        page_size: 12,
        debounce: Duration::from_millis(300),
        prefetch: false,
      },
    })
  }

  #[test]
  fn test_navigation_selects_links() {
    let mut view = home();
    assert_eq!(view.selected_link(), Some(Link::Search));
    view.handle_key(key(KeyCode::Char('j')));
    assert_eq!(view.selected_link(), Some(Link::Empty));
  }

  #[test]
  fn test_enter_on_empty_pushes_view() {
    let mut view = home();
    view.handle_key(key(KeyCode::Down));
    match view.handle_key(key(KeyCode::Enter)) {
      ViewAction::Push(pushed) => assert_eq!(pushed.breadcrumb_label(), "Empty"),
      _ => panic!("expected a pushed view"),
    }
  }

  #[tokio::test]
  async fn test_enter_on_search_pushes_search_view() {
    let mut view = home();
    match view.handle_key(key(KeyCode::Enter)) {
      ViewAction::Push(pushed) => assert_eq!(pushed.breadcrumb_label(), "Search"),
      _ => panic!("expected a pushed view"),
    }
  }

  #[test]
  fn test_q_pops() {
    let mut view = home();
    assert!(matches!(view.handle_key(key(KeyCode::Char('q'))), ViewAction::Pop));
  }
}
