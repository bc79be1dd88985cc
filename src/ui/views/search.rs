use crate::catalog::{CatalogApi, CatalogClient, PageKey};
use crate::search::{SearchSession, SessionOptions};
use crate::ui::components::{
  CardGrid, DetailEvent, DetailOverlay, FilterBar, KeyResult, OptionPicker, PickerEvent,
  PickerOption, SearchEvent, SearchInput,
};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use std::time::Instant;
use tracing::debug;

/// Which filter the open picker edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickerTarget {
  Category,
  Collection,
}

/// Card grid with search, type and set filters, paging and a detail overlay
pub struct SearchView<C: CatalogApi = CatalogClient> {
  session: SearchSession<C>,
  grid: CardGrid,
  /// Page the grid selection belongs to
  grid_page: PageKey,

  // Components
  search: SearchInput,
  picker: OptionPicker,
  picker_target: Option<PickerTarget>,
  detail: DetailOverlay,
}

impl<C: CatalogApi> SearchView<C> {
  pub fn new(client: C, options: SessionOptions) -> Self {
    Self::with_search_term(client, options, None)
  }

  /// Start with `term` already applied, e.g. from `--query`
  pub fn with_search_term(client: C, options: SessionOptions, term: Option<String>) -> Self {
    let mut session = SearchSession::new(client, options);
    match term {
      Some(term) => session.start_with_search_term(term),
      None => session.start(),
    }

    let grid_page = PageKey::new(session.current_page(), session.filters());
    Self {
      session,
      grid: CardGrid::new(),
      grid_page,
      search: SearchInput::new(),
      picker: OptionPicker::new(),
      picker_target: None,
      detail: DetailOverlay::new(),
    }
  }

  /// Reset the selection when a different page or result set is shown
  fn sync_grid(&mut self) {
    let shown = PageKey::new(self.session.current_page(), self.session.filters());
    if shown != self.grid_page {
      self.grid.reset();
      self.grid_page = shown;
    }
  }

  fn show_picker(&mut self, target: PickerTarget) {
    let options = self.session.filter_options();
    let (title, all_label, choices, current) = match target {
      PickerTarget::Category => (
        "Type",
        "All types",
        options
          .map(|o| {
            o.categories
              .iter()
              .map(|c| PickerOption::new(c.clone(), c.clone()))
              .collect()
          })
          .unwrap_or_default(),
        self.session.filters().category.clone(),
      ),
      PickerTarget::Collection => (
        "Set",
        "All sets",
        options
          .map(|o| {
            o.collections
              .iter()
              .map(|s| PickerOption::new(s.id.clone(), s.name.clone()))
              .collect()
          })
          .unwrap_or_default(),
        self.session.filters().collection.clone(),
      ),
    };

    let title = if self.session.filter_options_loading() {
      format!("{} (loading...)", title)
    } else {
      title.to_string()
    };
    if options.is_none() {
      debug!(?target, "filter options not loaded yet");
    }
    self.picker.show(title, all_label, choices, &current);
    self.picker_target = Some(target);
  }

  // Key handling helpers for or_else chain pattern
  fn handle_overlays(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match self.detail.handle_key(key) {
      KeyResult::Handled | KeyResult::Event(DetailEvent::Closed) => return Some(ViewAction::None),
      KeyResult::NotHandled => {}
    }

    match self.picker.handle_key(key) {
      KeyResult::Handled => return Some(ViewAction::None),
      KeyResult::Event(PickerEvent::Selected(value)) => {
        match self.picker_target.take() {
          Some(PickerTarget::Category) => self.session.set_category(value),
          Some(PickerTarget::Collection) => self.session.set_collection(value),
          None => {}
        }
        return Some(ViewAction::None);
      }
      KeyResult::Event(PickerEvent::Cancelled) => {
        self.picker_target = None;
        return Some(ViewAction::None);
      }
      KeyResult::NotHandled => {}
    }

    let current = self
      .session
      .pending_search_term()
      .unwrap_or(&self.session.filters().search_term)
      .to_string();
    match self.search.handle_key(key, &current) {
      KeyResult::Handled => Some(ViewAction::None),
      KeyResult::Event(SearchEvent::Changed(term)) => {
        self.session.edit_search_term(term, Instant::now());
        Some(ViewAction::None)
      }
      KeyResult::Event(SearchEvent::Submitted(term)) => {
        self.session.submit_search_term(term);
        Some(ViewAction::None)
      }
      KeyResult::Event(SearchEvent::Cleared) => {
        self.session.submit_search_term(String::new());
        Some(ViewAction::None)
      }
      KeyResult::NotHandled => None,
    }
  }

  fn handle_navigation(&mut self, key: KeyEvent) -> Option<ViewAction> {
    // Nothing is on screen to move over while a page loads
    let visible = if self.session.is_loading() {
      0
    } else {
      self.session.cards().len()
    };
    if self.grid.handle_key(key, visible) {
      return Some(ViewAction::None);
    }

    match key.code {
      KeyCode::Char('n') | KeyCode::Char(']') | KeyCode::PageDown => {
        self.session.next_page();
        Some(ViewAction::None)
      }
      KeyCode::Char('p') | KeyCode::Char('[') | KeyCode::PageUp => {
        self.session.previous_page();
        Some(ViewAction::None)
      }
      _ => None,
    }
  }

  fn handle_actions(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match key.code {
      KeyCode::Char('t') => {
        self.show_picker(PickerTarget::Category);
        Some(ViewAction::None)
      }
      KeyCode::Char('s') => {
        self.show_picker(PickerTarget::Collection);
        Some(ViewAction::None)
      }
      KeyCode::Char('c') => {
        self.session.clear_filters();
        Some(ViewAction::None)
      }
      KeyCode::Char('r') => {
        self.session.refresh();
        Some(ViewAction::None)
      }
      KeyCode::Enter => {
        if let Some(card) = self.grid.selected(self.session.cards()) {
          self.detail.open(card.clone(), self.session.is_loading());
        }
        Some(ViewAction::None)
      }
      KeyCode::Char('q') | KeyCode::Esc => Some(ViewAction::Pop),
      _ => None,
    }
  }
}

impl<C: CatalogApi> View for SearchView<C> {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    let action = self
      .handle_overlays(key)
      .or_else(|| self.handle_navigation(key))
      .or_else(|| self.handle_actions(key))
      .unwrap_or(ViewAction::None);
    self.sync_grid();
    action
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Filter bar
        Constraint::Min(0),    // Grid
      ])
      .split(area);

    FilterBar {
      filters: self.session.filters(),
      pending_term: self.session.pending_search_term(),
      options: self.session.filter_options(),
      current_page: self.session.current_page(),
      total_pages: self.session.total_pages(),
      total_count: self.session.total_count(),
      has_previous: self.session.has_previous_page(),
      has_next: self.session.has_next_page(),
    }
    .render(frame, chunks[0]);

    self.grid.render(
      frame,
      chunks[1],
      self.session.cards(),
      "Cards",
      self.session.is_loading(),
    );

    // Overlays
    self.search.render_overlay(frame, chunks[1]);
    self.picker.render_overlay(frame, chunks[1]);
    self.detail.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    let term = &self.session.filters().search_term;
    if term.is_empty() {
      "Search".to_string()
    } else {
      format!("Search [{}]", term)
    }
  }

  fn captures_input(&self) -> bool {
    self.search.is_active() || self.picker.is_active()
  }

  fn tick(&mut self) {
    self.session.poll(Instant::now());
    self.sync_grid();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    if self.detail.is_open() {
      return vec![
        ShortcutInfo::new("j/k", "scroll").with_priority(10),
        ShortcutInfo::new("Esc", "close").with_priority(20),
      ];
    }

    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "name").with_priority(20),
      ShortcutInfo::new("t", "type").with_priority(21),
      ShortcutInfo::new("s", "set").with_priority(22),
      ShortcutInfo::new("c", "clear").with_priority(23),
      ShortcutInfo::new("n/p", "page").with_priority(30),
      ShortcutInfo::new("hjkl", "move").when_active(),
      ShortcutInfo::new("Enter", "details").with_priority(40),
      ShortcutInfo::new("r", "refresh").with_priority(50),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::fake::FakeCatalog;
  use crossterm::event::KeyModifiers;
  use std::collections::HashMap;
  use std::sync::Arc;
  use std::time::Duration;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn options() -> SessionOptions {
    SessionOptions {
      page_size: 12,
      debounce: Duration::from_millis(300),
      prefetch: true,
    }
  }

  /// Tick until the displayed page and the filter options are loaded
  async fn settle(view: &mut SearchView<FakeCatalog>) {
    for _ in 0..100 {
      tokio::time::sleep(Duration::from_millis(5)).await;
      view.tick();
      if !view.session.is_loading() && view.session.filter_options().is_some() {
        return;
      }
    }
    panic!("view did not settle");
  }

  #[tokio::test]
  async fn test_enter_opens_detail_for_selected_card() {
    let mut view = SearchView::new(FakeCatalog::with_total(30), options());
    settle(&mut view).await;

    view.handle_key(key(KeyCode::Char('l')));
    view.handle_key(key(KeyCode::Enter));
    assert_eq!(view.detail.card().map(|c| c.id.as_str()), Some("-1"));

    // Close, then back out of the view
    assert!(matches!(view.handle_key(key(KeyCode::Esc)), ViewAction::None));
    assert!(!view.detail.is_open());
    assert!(matches!(view.handle_key(key(KeyCode::Esc)), ViewAction::Pop));
  }

  #[tokio::test]
  async fn test_enter_while_loading_keeps_detail_closed() {
    let mut catalog = FakeCatalog::with_total(30);
    catalog.delays = Arc::new(HashMap::from([(
      "Slow".to_string(),
      Duration::from_millis(500),
    )]));
    let mut view = SearchView::new(catalog, options());
    settle(&mut view).await;

    view.session.set_category("Slow".to_string());
    assert!(view.session.is_loading());
    assert!(!view.session.cards().is_empty());

    // The old page stays in memory but is hidden, so the cursor stays put
    view.tick();
    view.handle_key(key(KeyCode::Right));
    assert_eq!(view.grid.selected_index(), 0);

    view.handle_key(key(KeyCode::Enter));
    assert!(!view.detail.is_open());
  }

  #[tokio::test]
  async fn test_page_change_resets_selection() {
    let mut view = SearchView::new(FakeCatalog::with_total(30), options());
    settle(&mut view).await;

    view.handle_key(key(KeyCode::Right));
    assert_eq!(view.grid.selected_index(), 1);

    view.handle_key(key(KeyCode::Char('n')));
    settle(&mut view).await;
    assert_eq!(view.session.current_page(), 2);
    assert_eq!(view.grid.selected_index(), 0);
    assert_eq!(view.session.cards()[0].id, "-12");
  }

  #[tokio::test]
  async fn test_search_submit_applies_term() {
    let catalog = FakeCatalog::with_total(30);
    let mut view = SearchView::new(catalog.clone(), options());
    settle(&mut view).await;

    view.handle_key(key(KeyCode::Char('/')));
    assert!(view.captures_input());
    view.handle_key(key(KeyCode::Char('p')));
    view.handle_key(key(KeyCode::Char('i')));
    // Typing 'p' must not page backwards
    assert_eq!(view.session.current_page(), 1);
    view.handle_key(key(KeyCode::Enter));

    assert!(!view.captures_input());
    assert_eq!(view.session.filters().search_term, "pi");
    assert_eq!(view.breadcrumb_label(), "Search [pi]");
    settle(&mut view).await;
    assert_eq!(
      catalog.calls().last().map(|k| k.filters.search_term.clone()),
      Some("pi".to_string())
    );
  }

  #[tokio::test]
  async fn test_type_picker_sets_category() {
    let mut view = SearchView::new(FakeCatalog::with_total(30), options());
    settle(&mut view).await;

    view.handle_key(key(KeyCode::Char('t')));
    assert!(view.captures_input());
    view.handle_key(key(KeyCode::Down)); // All types -> Fire
    view.handle_key(key(KeyCode::Enter));

    assert_eq!(view.session.filters().category, "Fire");
    assert!(!view.captures_input());

    view.handle_key(key(KeyCode::Char('c')));
    assert!(view.session.filters().is_empty());
  }

  #[tokio::test]
  async fn test_set_picker_uses_set_id() {
    let mut view = SearchView::new(FakeCatalog::with_total(30), options());
    settle(&mut view).await;

    view.handle_key(key(KeyCode::Char('s')));
    view.handle_key(key(KeyCode::Char('b')));
    view.handle_key(key(KeyCode::Char('a')));
    view.handle_key(key(KeyCode::Enter));

    assert_eq!(view.session.filters().collection, "base1");
  }

  #[tokio::test]
  async fn test_initial_search_term() {
    let catalog = FakeCatalog::with_total(5);
    let mut view =
      SearchView::with_search_term(catalog.clone(), options(), Some("mew".to_string()));
    settle(&mut view).await;

    assert_eq!(view.session.filters().search_term, "mew");
    let calls = catalog.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].filters.search_term, "mew");
  }
}
