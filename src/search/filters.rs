use crate::catalog::FilterCombination;
use std::time::{Duration, Instant};

/// Holds back a value until input has been quiet for `delay`.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
  delay: Duration,
  pending: Option<(T, Instant)>,
}

impl<T> Debounce<T> {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      pending: None,
    }
  }

  /// Replace the pending value and restart the quiet period
  pub fn push(&mut self, value: T, now: Instant) {
    self.pending = Some((value, now + self.delay));
  }

  /// Take the pending value once its quiet period has elapsed
  pub fn poll(&mut self, now: Instant) -> Option<T> {
    match &self.pending {
      Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(v, _)| v),
      _ => None,
    }
  }

  pub fn pending(&self) -> Option<&T> {
    self.pending.as_ref().map(|(v, _)| v)
  }

  pub fn cancel(&mut self) {
    self.pending = None;
  }
}

/// User-selected filters, with search-term edits debounced.
///
/// Every mutator returns true only when the active combination actually
/// changed.
#[derive(Debug, Clone)]
pub struct FilterState {
  active: FilterCombination,
  term_input: Debounce<String>,
}

impl FilterState {
  pub fn new(debounce: Duration) -> Self {
    Self {
      active: FilterCombination::default(),
      term_input: Debounce::new(debounce),
    }
  }

  pub fn active(&self) -> &FilterCombination {
    &self.active
  }

  /// Search term still waiting out the debounce, if any
  pub fn pending_search_term(&self) -> Option<&str> {
    self.term_input.pending().map(String::as_str)
  }

  /// Record a keystroke-level edit of the search term
  pub fn edit_search_term(&mut self, term: String, now: Instant) {
    self.term_input.push(term, now);
  }

  /// Apply a search term immediately, discarding any pending edit
  pub fn commit_search_term(&mut self, term: String) -> bool {
    self.term_input.cancel();
    replace(&mut self.active.search_term, term)
  }

  /// Apply a pending search term whose quiet period has elapsed
  pub fn poll(&mut self, now: Instant) -> bool {
    match self.term_input.poll(now) {
      Some(term) => replace(&mut self.active.search_term, term),
      None => false,
    }
  }

  pub fn set_category(&mut self, category: String) -> bool {
    replace(&mut self.active.category, category)
  }

  pub fn set_collection(&mut self, collection: String) -> bool {
    replace(&mut self.active.collection, collection)
  }

  /// Reset all three fields as one change
  pub fn clear_all(&mut self) -> bool {
    self.term_input.cancel();
    let changed = !self.active.is_empty();
    self.active = FilterCombination::default();
    changed
  }
}

fn replace(field: &mut String, value: String) -> bool {
  let value = value.trim().to_string();
  if *field == value {
    false
  } else {
    *field = value;
    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const DELAY: Duration = Duration::from_millis(300);

  #[test]
  fn test_debounce_waits_for_quiet_period() {
    let t0 = Instant::now();
    let mut d = Debounce::new(DELAY);
    d.push("a", t0);
    assert_eq!(d.poll(t0 + Duration::from_millis(100)), None);
    assert_eq!(d.poll(t0 + DELAY), Some("a"));
    assert_eq!(d.poll(t0 + DELAY * 2), None);
  }

  #[test]
  fn test_debounce_restarts_on_push() {
    let t0 = Instant::now();
    let mut d = Debounce::new(DELAY);
    d.push("a", t0);
    d.push("ab", t0 + Duration::from_millis(200));
    assert_eq!(d.poll(t0 + Duration::from_millis(400)), None);
    assert_eq!(d.poll(t0 + Duration::from_millis(500)), Some("ab"));
  }

  #[test]
  fn test_typing_coalesces_into_one_change() {
    let t0 = Instant::now();
    let mut f = FilterState::new(DELAY);
    f.edit_search_term("p".to_string(), t0);
    f.edit_search_term("pi".to_string(), t0 + Duration::from_millis(50));
    f.edit_search_term("pik".to_string(), t0 + Duration::from_millis(100));

    assert!(!f.poll(t0 + Duration::from_millis(200)));
    assert_eq!(f.pending_search_term(), Some("pik"));
    assert!(f.poll(t0 + Duration::from_millis(400)));
    assert_eq!(f.active().search_term, "pik");
    assert!(!f.poll(t0 + Duration::from_millis(800)));
  }

  #[test]
  fn test_commit_skips_debounce() {
    let t0 = Instant::now();
    let mut f = FilterState::new(DELAY);
    f.edit_search_term("char".to_string(), t0);
    assert!(f.commit_search_term("charizard".to_string()));
    assert_eq!(f.pending_search_term(), None);
    assert_eq!(f.active().search_term, "charizard");
  }

  #[test]
  fn test_setting_same_value_is_not_a_change() {
    let mut f = FilterState::new(DELAY);
    assert!(f.set_category("Fire".to_string()));
    assert!(!f.set_category("Fire".to_string()));
    assert!(!f.set_collection(String::new()));
  }

  #[test]
  fn test_clear_all() {
    let mut f = FilterState::new(DELAY);
    assert!(!f.clear_all());
    f.set_category("Fire".to_string());
    f.set_collection("base1".to_string());
    assert!(f.clear_all());
    assert!(f.active().is_empty());
  }
}
