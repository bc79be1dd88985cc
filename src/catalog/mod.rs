//! Client and data model for the remote card catalog API.

pub mod api_types;
mod cache;
pub mod client;
pub mod error;
#[cfg(test)]
pub mod fake;
pub mod filter;
pub mod types;

pub use client::{CatalogApi, CatalogClient};
pub use error::CatalogError;
pub use filter::{FilterCombination, PageKey};
pub use types::{Card, CardPage, FilterOptions};
