//! Scripted in-memory catalog for driving sessions and views in tests.

use super::types::{CardImages, SetSummary};
use super::{Card, CardPage, CatalogApi, CatalogError, FilterCombination, FilterOptions, PageKey};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Every result set has `total` cards, optionally delayed or failing per
/// category. Card ids are `<category>-<index>`.
#[derive(Clone, Default)]
pub struct FakeCatalog {
  pub total: u64,
  pub calls: Arc<Mutex<Vec<PageKey>>>,
  pub delays: Arc<HashMap<String, Duration>>,
  pub failing: Arc<HashSet<String>>,
}

impl FakeCatalog {
  pub fn with_total(total: u64) -> Self {
    Self {
      total,
      ..Default::default()
    }
  }

  pub fn calls(&self) -> Vec<PageKey> {
    self.calls.lock().unwrap().clone()
  }
}

pub fn card(id: String) -> Card {
  Card {
    name: id.clone(),
    id,
    images: CardImages::default(),
    supertype: None,
    subtypes: Vec::new(),
    types: Vec::new(),
    hp: None,
    attacks: Vec::new(),
    set: None,
    tcgplayer: None,
  }
}

impl CatalogApi for FakeCatalog {
  async fn fetch_page(
    &self,
    page: u32,
    filters: &FilterCombination,
    page_size: u32,
  ) -> Result<CardPage, CatalogError> {
    self.calls.lock().unwrap().push(PageKey::new(page, filters));

    if let Some(delay) = self.delays.get(&filters.category) {
      tokio::time::sleep(*delay).await;
    }
    if self.failing.contains(&filters.category) {
      return Err(CatalogError::Status {
        status: 503,
        message: "unavailable".to_string(),
      });
    }

    let start = u64::from(page - 1) * u64::from(page_size);
    let end = (start + u64::from(page_size)).min(self.total);
    let cards = (start..end)
      .map(|i| card(format!("{}-{}", filters.category, i)))
      .collect();

    Ok(CardPage {
      cards,
      total_count: self.total,
    })
  }

  async fn fetch_filter_options(&self) -> Result<FilterOptions, CatalogError> {
    Ok(FilterOptions {
      categories: vec!["Fire".to_string(), "Water".to_string()],
      collections: vec![SetSummary {
        id: "base1".to_string(),
        name: "Base".to_string(),
      }],
    })
  }
}
