//! Session-scoped cache of fetched result pages.

use std::collections::HashMap;
use std::sync::Arc;

use super::traits::CacheKey;

/// In-memory page cache owned by a single search session.
///
/// Entries have no expiry and no size bound. The owner is expected to
/// call [`PageCache::clear`] whenever the keys it has stored stop being
/// valid (e.g. the filters change). Values are shared behind an `Arc`, so
/// repeated lookups of one key hand out the same list.
#[derive(Debug)]
pub struct PageCache<K: CacheKey, T> {
  entries: HashMap<K, Arc<Vec<T>>>,
}

impl<K: CacheKey, T> Default for PageCache<K, T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K: CacheKey, T> PageCache<K, T> {
  pub fn new() -> Self {
    Self {
      entries: HashMap::new(),
    }
  }

  /// Look up a cached page
  pub fn get(&self, key: &K) -> Option<Arc<Vec<T>>> {
    self.entries.get(key).cloned()
  }

  /// Store a page, replacing any previous entry for the key
  pub fn put(&mut self, key: K, records: Vec<T>) -> Arc<Vec<T>> {
    let records = Arc::new(records);
    self.entries.insert(key, Arc::clone(&records));
    records
  }

  pub fn contains(&self, key: &K) -> bool {
    self.entries.contains_key(key)
  }

  /// Drop every entry
  pub fn clear(&mut self) {
    self.entries.clear();
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  impl CacheKey for u32 {
    fn description(&self) -> String {
      format!("page {}", self)
    }
  }

  #[test]
  fn test_get_after_put_returns_same_list() {
    let mut cache: PageCache<u32, &str> = PageCache::new();
    let stored = cache.put(1, vec!["a", "b"]);

    let first = cache.get(&1).unwrap();
    let second = cache.get(&1).unwrap();
    assert!(Arc::ptr_eq(&stored, &first));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*first, vec!["a", "b"]);
  }

  #[test]
  fn test_miss_returns_none() {
    let cache: PageCache<u32, &str> = PageCache::new();
    assert!(cache.get(&7).is_none());
    assert!(!cache.contains(&7));
  }

  #[test]
  fn test_put_overwrites() {
    let mut cache: PageCache<u32, &str> = PageCache::new();
    cache.put(1, vec!["old"]);
    cache.put(1, vec!["new"]);
    assert_eq!(*cache.get(&1).unwrap(), vec!["new"]);
    assert_eq!(cache.len(), 1);
  }

  #[test]
  fn test_clear_drops_everything() {
    let mut cache: PageCache<u32, &str> = PageCache::new();
    cache.put(1, vec!["a"]);
    cache.put(2, vec!["b"]);
    cache.clear();
    assert!(cache.is_empty());
    assert!(cache.get(&1).is_none());
  }
}
