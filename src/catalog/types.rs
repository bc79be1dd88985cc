use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single catalog record (one trading card)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
  pub id: String,
  pub name: String,
  pub images: CardImages,
  #[serde(default)]
  pub supertype: Option<String>,
  #[serde(default)]
  pub subtypes: Vec<String>,
  /// Element/energy types, e.g. "Fire"
  #[serde(default)]
  pub types: Vec<String>,
  #[serde(default)]
  pub hp: Option<String>,
  #[serde(default)]
  pub attacks: Vec<Attack>,
  #[serde(default)]
  pub set: Option<CardSet>,
  #[serde(default)]
  pub tcgplayer: Option<TcgPlayer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardImages {
  #[serde(default)]
  pub small: String,
  #[serde(default)]
  pub large: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attack {
  pub name: String,
  #[serde(default)]
  pub damage: String,
  #[serde(default)]
  pub text: Option<String>,
}

/// The collection (expansion set) a card was printed in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSet {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub series: String,
  #[serde(default)]
  pub printed_total: u32,
  #[serde(default)]
  pub total: u32,
  #[serde(default)]
  pub ptcgo_code: Option<String>,
  #[serde(default)]
  pub release_date: String,
}

impl CardSet {
  /// Parse the catalog's `YYYY/MM/DD` release date
  pub fn release_date(&self) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&self.release_date, "%Y/%m/%d").ok()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcgPlayer {
  #[serde(default)]
  pub url: String,
  #[serde(default)]
  pub updated_at: String,
  /// Prices keyed by print variant ("normal", "holofoil", ...)
  #[serde(default)]
  pub prices: BTreeMap<String, PriceTiers>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTiers {
  pub low: Option<f64>,
  pub mid: Option<f64>,
  pub high: Option<f64>,
  pub market: Option<f64>,
  pub direct_low: Option<f64>,
}

impl PriceTiers {
  /// Tiers that carry a price, in display order
  pub fn entries(&self) -> Vec<(&'static str, f64)> {
    [
      ("Low", self.low),
      ("Mid", self.mid),
      ("High", self.high),
      ("Market", self.market),
      ("Direct low", self.direct_low),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| (label, v)))
    .collect()
  }
}

/// One page of cards plus the total number of matches
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardPage {
  pub cards: Vec<Card>,
  pub total_count: u64,
}

/// Set reference used to populate the collection picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetSummary {
  pub id: String,
  pub name: String,
}

/// Values offered by the category and collection pickers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
  pub categories: Vec<String>,
  pub collections: Vec<SetSummary>,
}
