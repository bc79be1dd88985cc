//! Caching implementations for catalog types.

use crate::cache::CacheKey;

use super::filter::PageKey;

impl CacheKey for PageKey {
  fn description(&self) -> String {
    match self.filters.query_expression() {
      Some(q) => format!("cards page {} [{}]", self.page, q),
      None => format!("cards page {}", self.page),
    }
  }
}
