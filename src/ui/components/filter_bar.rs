use crate::catalog::{FilterCombination, FilterOptions};
use crate::ui::renderfns::{truncate, type_color};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// One-line summary of the active filters and the page position
pub struct FilterBar<'a> {
  pub filters: &'a FilterCombination,
  /// Term typed but not yet committed by the debounce
  pub pending_term: Option<&'a str>,
  pub options: Option<&'a FilterOptions>,
  pub current_page: u32,
  pub total_pages: u32,
  pub total_count: u64,
  pub has_previous: bool,
  pub has_next: bool,
}

impl FilterBar<'_> {
  /// Display name of the selected set, falling back to its id
  fn collection_label(&self) -> String {
    let id = &self.filters.collection;
    self
      .options
      .and_then(|o| o.collections.iter().find(|s| &s.id == id))
      .map(|s| s.name.clone())
      .unwrap_or_else(|| id.clone())
  }

  pub fn line(&self) -> Line<'static> {
    let key = Style::default().fg(Color::Yellow);
    let dim = Style::default().fg(Color::DarkGray);
    let sep = || Span::styled(" │ ", Style::default().fg(Color::DarkGray));

    let mut spans = vec![Span::styled("[/] ", key)];
    match self.pending_term {
      Some(term) => spans.push(Span::styled(
        format!("{}…", truncate(term, 20)),
        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
      )),
      None if self.filters.search_term.is_empty() => spans.push(Span::styled("any name", dim)),
      None => spans.push(Span::styled(
        truncate(&self.filters.search_term, 20),
        Style::default().fg(Color::White),
      )),
    }

    spans.push(sep());
    spans.push(Span::styled("[t] ", key));
    if self.filters.category.is_empty() {
      spans.push(Span::styled("all types", dim));
    } else {
      spans.push(Span::styled(
        self.filters.category.clone(),
        Style::default().fg(type_color(&self.filters.category)),
      ));
    }

    spans.push(sep());
    spans.push(Span::styled("[s] ", key));
    if self.filters.collection.is_empty() {
      spans.push(Span::styled("all sets", dim));
    } else {
      spans.push(Span::styled(
        truncate(&self.collection_label(), 24),
        Style::default().fg(Color::Cyan),
      ));
    }

    let arrow = |enabled: bool| {
      if enabled {
        Style::default().fg(Color::Yellow)
      } else {
        dim
      }
    };
    spans.push(sep());
    spans.push(Span::styled("‹p ", arrow(self.has_previous)));
    spans.push(Span::styled(
      format!(
        "page {}/{} · {} cards",
        self.current_page, self.total_pages, self.total_count
      ),
      Style::default().fg(Color::Gray),
    ));
    spans.push(Span::styled(" n›", arrow(self.has_next)));

    Line::from(spans)
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    frame.render_widget(Paragraph::new(self.line()), area);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::types::SetSummary;

  fn text(line: &Line) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
  }

  #[test]
  fn test_empty_filters() {
    let filters = FilterCombination::default();
    let bar = FilterBar {
      filters: &filters,
      pending_term: None,
      options: None,
      current_page: 1,
      total_pages: 1,
      total_count: 0,
      has_previous: false,
      has_next: false,
    };
    let line = text(&bar.line());
    assert!(line.contains("any name"));
    assert!(line.contains("all types"));
    assert!(line.contains("all sets"));
    assert!(line.contains("page 1/1 · 0 cards"));
  }

  #[test]
  fn test_active_filters_use_set_name() {
    let filters = FilterCombination {
      search_term: "pikachu".to_string(),
      category: "Lightning".to_string(),
      collection: "base1".to_string(),
    };
    let options = FilterOptions {
      categories: vec!["Lightning".to_string()],
      collections: vec![SetSummary {
        id: "base1".to_string(),
        name: "Base".to_string(),
      }],
    };
    let bar = FilterBar {
      filters: &filters,
      pending_term: None,
      options: Some(&options),
      current_page: 2,
      total_pages: 3,
      total_count: 30,
      has_previous: true,
      has_next: true,
    };
    let line = text(&bar.line());
    assert!(line.contains("pikachu"));
    assert!(line.contains("Lightning"));
    assert!(line.contains("Base"));
    assert!(!line.contains("base1"));
  }

  #[test]
  fn test_pending_term_shown() {
    let filters = FilterCombination::default();
    let bar = FilterBar {
      filters: &filters,
      pending_term: Some("char"),
      options: None,
      current_page: 1,
      total_pages: 1,
      total_count: 0,
      has_previous: false,
      has_next: false,
    };
    assert!(text(&bar.line()).contains("char…"));
  }

  #[test]
  fn test_page_arrows_dim_at_bounds() {
    let filters = FilterCombination::default();
    let bar = FilterBar {
      filters: &filters,
      pending_term: None,
      options: None,
      current_page: 1,
      total_pages: 2,
      total_count: 20,
      has_previous: false,
      has_next: true,
    };
    let line = bar.line();
    let style_of = |content: &str| {
      line
        .spans
        .iter()
        .find(|s| s.content == content)
        .map(|s| s.style.fg)
    };
    assert_eq!(style_of("‹p "), Some(Some(Color::DarkGray)));
    assert_eq!(style_of(" n›"), Some(Some(Color::Yellow)));
  }
}
