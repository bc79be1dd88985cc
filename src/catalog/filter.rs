/// The active search/category/collection constraints.
///
/// Empty strings mean "no constraint". Two combinations select the same
/// result set exactly when all three fields are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterCombination {
  pub search_term: String,
  pub category: String,
  pub collection: String,
}

impl FilterCombination {
  /// True when no constraint is active
  pub fn is_empty(&self) -> bool {
    self.search_term.is_empty() && self.category.is_empty() && self.collection.is_empty()
  }

  /// Build the catalog `q` expression, or None when nothing is filtered
  pub fn query_expression(&self) -> Option<String> {
    let mut parts = Vec::new();

    if !self.search_term.is_empty() {
      parts.push(format!("name:{}", quote_if_spaced(&self.search_term)));
    }
    if !self.category.is_empty() {
      parts.push(format!("types:{}", quote_if_spaced(&self.category)));
    }
    if !self.collection.is_empty() {
      parts.push(format!("set.id:{}", self.collection));
    }

    if parts.is_empty() {
      None
    } else {
      Some(parts.join(" "))
    }
  }
}

/// Multi-word values must be quoted or the catalog treats each word as a term
fn quote_if_spaced(value: &str) -> String {
  // A stray quote would unbalance the expression
  let value = value.replace('"', "");
  if value.chars().any(char::is_whitespace) {
    format!("\"{}\"", value)
  } else {
    value
  }
}

/// Cache key for one page of one result set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
  pub page: u32,
  pub filters: FilterCombination,
}

impl PageKey {
  pub fn new(page: u32, filters: &FilterCombination) -> Self {
    Self {
      page,
      filters: filters.clone(),
    }
  }
}
