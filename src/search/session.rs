//! Fetch orchestration for the search view.
//!
//! A `SearchSession` owns everything one search view needs: the page cache,
//! pagination, filters and the channel that spawned fetches report back on.
//! It is created when the view mounts and dropped with it.

use crate::cache::{CacheKey, PageCache};
use crate::catalog::{
  Card, CardPage, CatalogApi, CatalogError, FilterCombination, FilterOptions, PageKey,
};
use crate::query::Query;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::filters::FilterState;
use super::pagination::Pagination;

/// Tunables for a session
#[derive(Debug, Clone)]
pub struct SessionOptions {
  pub page_size: u32,
  pub debounce: Duration,
  /// Read ahead one page after unfiltered fetches
  pub prefetch: bool,
}

/// Result of one spawned page fetch
#[derive(Debug)]
struct PageResponse {
  generation: u64,
  key: PageKey,
  result: Result<CardPage, CatalogError>,
}

pub struct SearchSession<C: CatalogApi> {
  client: C,
  options: SessionOptions,
  cache: PageCache<PageKey, Card>,
  pagination: Pagination,
  filters: FilterState,
  filter_options: Query<FilterOptions>,

  /// Bumped whenever previously issued requests become irrelevant
  generation: u64,
  in_flight: HashSet<PageKey>,
  /// Page the view is waiting on; `Some` means loading
  awaiting: Option<PageKey>,
  cards: Arc<Vec<Card>>,

  tx: mpsc::UnboundedSender<PageResponse>,
  rx: mpsc::UnboundedReceiver<PageResponse>,
}

impl<C: CatalogApi> SearchSession<C> {
  pub fn new(client: C, options: SessionOptions) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    let options_client = client.clone();
    let filter_options = Query::new("filter options", move || {
      let client = options_client.clone();
      async move {
        client
          .fetch_filter_options()
          .await
          .map_err(|e| e.to_string())
      }
    });

    Self {
      pagination: Pagination::new(options.page_size),
      filters: FilterState::new(options.debounce),
      client,
      options,
      cache: PageCache::new(),
      filter_options,
      generation: 0,
      in_flight: HashSet::new(),
      awaiting: None,
      cards: Arc::new(Vec::new()),
      tx,
      rx,
    }
  }

  /// Load the picker options and the first page
  pub fn start(&mut self) {
    self.filter_options.fetch();
    self.load_current_page();
  }

  /// Like `start`, with `term` applied before the first fetch
  pub fn start_with_search_term(&mut self, term: String) {
    self.filters.commit_search_term(term);
    self.start();
  }

  // ==========================================================================
  // Accessors
  // ==========================================================================

  pub fn cards(&self) -> &[Card] {
    &self.cards
  }

  pub fn is_loading(&self) -> bool {
    self.awaiting.is_some()
  }

  pub fn current_page(&self) -> u32 {
    self.pagination.current_page()
  }

  pub fn total_pages(&self) -> u32 {
    self.pagination.total_pages()
  }

  pub fn total_count(&self) -> u64 {
    self.pagination.total_count()
  }

  pub fn filters(&self) -> &FilterCombination {
    self.filters.active()
  }

  pub fn pending_search_term(&self) -> Option<&str> {
    self.filters.pending_search_term()
  }

  pub fn filter_options(&self) -> Option<&FilterOptions> {
    self.filter_options.data()
  }

  pub fn filter_options_loading(&self) -> bool {
    self.filter_options.is_loading()
  }

  // ==========================================================================
  // Pagination
  // ==========================================================================

  pub fn go_to(&mut self, page: u32) -> bool {
    let busy = self.is_loading();
    if !self.pagination.go_to(page, busy) {
      return false;
    }
    self.load_current_page();
    true
  }

  pub fn next_page(&mut self) -> bool {
    let busy = self.is_loading();
    if !self.pagination.next(busy) {
      return false;
    }
    self.load_current_page();
    true
  }

  pub fn previous_page(&mut self) -> bool {
    let busy = self.is_loading();
    if !self.pagination.previous(busy) {
      return false;
    }
    self.load_current_page();
    true
  }

  pub fn has_next_page(&self) -> bool {
    self.pagination.has_next()
  }

  pub fn has_previous_page(&self) -> bool {
    self.pagination.has_previous()
  }

  // ==========================================================================
  // Filters
  // ==========================================================================

  /// Keystroke-level edit; applied once input goes quiet
  pub fn edit_search_term(&mut self, term: String, now: Instant) {
    self.filters.edit_search_term(term, now);
  }

  pub fn submit_search_term(&mut self, term: String) {
    if self.filters.commit_search_term(term) {
      self.on_filters_changed();
    }
  }

  pub fn set_category(&mut self, category: String) {
    if self.filters.set_category(category) {
      self.on_filters_changed();
    }
  }

  pub fn set_collection(&mut self, collection: String) {
    if self.filters.set_collection(collection) {
      self.on_filters_changed();
    }
  }

  pub fn clear_filters(&mut self) {
    if self.filters.clear_all() {
      self.on_filters_changed();
    }
  }

  /// Drop cached pages and refetch the current one
  pub fn refresh(&mut self) {
    info!(page = self.current_page(), "refreshing search results");
    if self.filter_options.state().error().is_some() {
      self.filter_options.refetch();
    }
    self.invalidate();
    self.load_current_page();
  }

  /// Apply settled search input and drain finished fetches.
  ///
  /// Returns true if anything visible changed.
  pub fn poll(&mut self, now: Instant) -> bool {
    let mut changed = false;

    if self.filters.poll(now) {
      self.on_filters_changed();
      changed = true;
    }

    changed |= self.filter_options.poll();

    while let Ok(response) = self.rx.try_recv() {
      changed |= self.apply_response(response);
    }

    changed
  }

  // ==========================================================================
  // Internals
  // ==========================================================================

  fn on_filters_changed(&mut self) {
    info!(filters = ?self.filters.active(), "filters changed");
    self.invalidate();
    self.pagination.reset();
    self.load_current_page();
  }

  /// Forget cached pages and fence off every request issued so far
  fn invalidate(&mut self) {
    if !self.cache.is_empty() {
      debug!(pages = self.cache.len(), "clearing page cache");
    }
    self.cache.clear();
    self.generation += 1;
    self.in_flight.clear();
    self.awaiting = None;
  }

  /// Show the current page from cache, or start waiting for it
  fn load_current_page(&mut self) {
    let key = PageKey::new(self.pagination.current_page(), self.filters.active());

    if let Some(cards) = self.cache.get(&key) {
      debug!(key = %key.description(), "page cache hit");
      self.cards = cards;
      self.awaiting = None;
      self.prefetch_after(&key);
      return;
    }

    self.awaiting = Some(key.clone());
    if !self.in_flight.contains(&key) {
      self.dispatch(key);
    }
  }

  fn dispatch(&mut self, key: PageKey) {
    debug!(key = %key.description(), generation = self.generation, "fetching page");
    self.in_flight.insert(key.clone());

    let client = self.client.clone();
    let tx = self.tx.clone();
    let generation = self.generation;
    let page_size = self.options.page_size;

    tokio::spawn(async move {
      let result = client.fetch_page(key.page, &key.filters, page_size).await;
      // Receiver is gone once the session is dropped
      let _ = tx.send(PageResponse {
        generation,
        key,
        result,
      });
    });
  }

  fn apply_response(&mut self, response: PageResponse) -> bool {
    let PageResponse {
      generation,
      key,
      result,
    } = response;

    if generation != self.generation {
      debug!(
        key = %key.description(),
        generation,
        current = self.generation,
        "discarding stale page"
      );
      return false;
    }

    self.in_flight.remove(&key);
    let displayed = self.awaiting.as_ref() == Some(&key);

    match result {
      Ok(page) => {
        let total_count = page.total_count;
        let cards = match self.cache.get(&key) {
          Some(existing) => existing,
          None => self.cache.put(key.clone(), page.cards),
        };

        if !displayed {
          return false;
        }

        self.cards = cards;
        self.awaiting = None;
        self.pagination.set_total_count(total_count);

        if self.pagination.current_page() != key.page {
          // The result set shrank under us
          self.load_current_page();
        } else {
          self.prefetch_after(&key);
        }
        true
      }
      Err(e) => {
        warn!(
          key = %key.description(),
          kind = ?e.kind(),
          error = %e,
          "catalog fetch failed"
        );
        if !displayed {
          return false;
        }
        self.cards = Arc::new(Vec::new());
        self.awaiting = None;
        true
      }
    }
  }

  fn prefetch_after(&mut self, key: &PageKey) {
    if !self.options.prefetch || !key.filters.is_empty() {
      return;
    }

    let next_page = key.page + 1;
    if next_page > self.pagination.total_pages() {
      return;
    }

    let next = PageKey::new(next_page, &key.filters);
    if self.cache.contains(&next) || self.in_flight.contains(&next) {
      return;
    }

    debug!(key = %next.description(), "prefetching");
    self.dispatch(next);
  }
}
