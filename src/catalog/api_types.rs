//! Serde-deserializable envelopes matching catalog API responses.
//!
//! Card records deserialize straight into the domain types; only the
//! envelopes and the set listing need their own shapes.

use serde::Deserialize;

use super::types::{Card, CardPage, FilterOptions, SetSummary};

// ============================================================================
// /cards
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiCardsResponse {
  #[serde(default)]
  pub data: Vec<Card>,
  #[serde(rename = "totalCount", default)]
  pub total_count: u64,
}

impl From<ApiCardsResponse> for CardPage {
  fn from(resp: ApiCardsResponse) -> Self {
    CardPage {
      cards: resp.data,
      total_count: resp.total_count,
    }
  }
}

// ============================================================================
// /types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiTypesResponse {
  #[serde(default)]
  pub data: Vec<String>,
}

// ============================================================================
// /sets
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiSet {
  pub id: String,
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiSetsResponse {
  #[serde(default)]
  pub data: Vec<ApiSet>,
}

impl From<ApiSet> for SetSummary {
  fn from(set: ApiSet) -> Self {
    SetSummary {
      id: set.id,
      name: set.name,
    }
  }
}

/// Combine the two listing responses into picker options
pub fn into_filter_options(types: ApiTypesResponse, sets: ApiSetsResponse) -> FilterOptions {
  FilterOptions {
    categories: types.data,
    collections: sets.data.into_iter().map(SetSummary::from).collect(),
  }
}
