/// Page position within a result set of known size.
///
/// `current_page` is 1-based and always within `1..=total_pages()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
  current_page: u32,
  total_count: u64,
  page_size: u32,
}

impl Pagination {
  pub fn new(page_size: u32) -> Self {
    Self {
      current_page: 1,
      total_count: 0,
      page_size: page_size.max(1),
    }
  }

  pub fn current_page(&self) -> u32 {
    self.current_page
  }

  pub fn total_count(&self) -> u64 {
    self.total_count
  }

  /// Number of pages, never less than 1 so an empty result reads "1 of 1"
  pub fn total_pages(&self) -> u32 {
    let pages = self.total_count.div_ceil(u64::from(self.page_size)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
  }

  pub fn has_next(&self) -> bool {
    self.current_page < self.total_pages()
  }

  pub fn has_previous(&self) -> bool {
    self.current_page > 1
  }

  /// Move to `page`. Returns false (and changes nothing) when the page is
  /// out of range, already current, or a fetch is in flight.
  pub fn go_to(&mut self, page: u32, busy: bool) -> bool {
    if busy || page < 1 || page > self.total_pages() || page == self.current_page {
      return false;
    }
    self.current_page = page;
    true
  }

  pub fn next(&mut self, busy: bool) -> bool {
    self.go_to(self.current_page.saturating_add(1), busy)
  }

  pub fn previous(&mut self, busy: bool) -> bool {
    self.go_to(self.current_page.saturating_sub(1), busy)
  }

  pub fn reset(&mut self) {
    self.current_page = 1;
  }

  /// Record the total reported by the catalog, clamping the current page
  pub fn set_total_count(&mut self, total_count: u64) {
    self.total_count = total_count;
    self.current_page = self.current_page.min(self.total_pages());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn with_total(total: u64) -> Pagination {
    let mut p = Pagination::new(12);
    p.set_total_count(total);
    p
  }

  #[test]
  fn test_total_pages_rounds_up() {
    assert_eq!(with_total(25).total_pages(), 3);
    assert_eq!(with_total(24).total_pages(), 2);
    assert_eq!(with_total(1).total_pages(), 1);
  }

  #[test]
  fn test_total_pages_is_at_least_one() {
    assert_eq!(with_total(0).total_pages(), 1);
  }

  #[test]
  fn test_total_pages_formula_holds() {
    for total in 0..200u64 {
      let expected = std::cmp::max(1, (total + 11) / 12) as u32;
      assert_eq!(with_total(total).total_pages(), expected, "total {}", total);
    }
  }

  #[test]
  fn test_go_to_past_last_page_is_noop() {
    let mut p = with_total(25);
    assert!(p.go_to(3, false));
    assert!(!p.go_to(4, false));
    assert_eq!(p.current_page(), 3);
  }

  #[test]
  fn test_go_to_out_of_range_leaves_state_unchanged() {
    let mut p = with_total(25);
    let before = p.clone();
    assert!(!p.go_to(0, false));
    assert!(!p.go_to(4, false));
    assert_eq!(p, before);
  }

  #[test]
  fn test_go_to_while_busy_is_noop() {
    let mut p = with_total(25);
    assert!(!p.go_to(2, true));
    assert_eq!(p.current_page(), 1);
  }

  #[test]
  fn test_next_and_previous() {
    let mut p = with_total(25);
    assert!(!p.has_previous());
    assert!(!p.previous(false));
    assert!(p.next(false));
    assert!(p.next(false));
    assert!(!p.has_next());
    assert!(!p.next(false));
    assert_eq!(p.current_page(), 3);
    assert!(p.previous(false));
    assert_eq!(p.current_page(), 2);
  }

  #[test]
  fn test_shrinking_total_clamps_current_page() {
    let mut p = with_total(100);
    p.go_to(8, false);
    p.set_total_count(30);
    assert_eq!(p.current_page(), 3);
  }
}
