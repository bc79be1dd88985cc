//! Core traits for the caching system.

use std::hash::Hash;

/// Trait for keys that can address a cache entry.
///
/// Implementors must be deterministic: two keys naming the same request
/// compare equal and hash identically.
pub trait CacheKey: Clone + Eq + Hash {
  /// Human-readable description for log output
  fn description(&self) -> String;
}
