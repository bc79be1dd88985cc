//! Generic in-memory caching for fetched pages.
//!
//! The cache is deliberately simple: it maps a key to a shared list of
//! records and is reset wholesale by its owner. There is no persistence
//! and no eviction.

mod page_cache;
mod traits;

pub use page_cache::PageCache;
pub use traits::CacheKey;
