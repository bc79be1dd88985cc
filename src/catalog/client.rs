use crate::catalog::api_types::{
  into_filter_options, ApiCardsResponse, ApiSetsResponse, ApiTypesResponse,
};
use crate::catalog::error::CatalogError;
use crate::catalog::filter::FilterCombination;
use crate::catalog::types::{CardPage, FilterOptions};
use crate::config::Config;
use color_eyre::{eyre::eyre, Result};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use url::Url;

const API_KEY_HEADER: &str = "X-Api-Key";

/// Page size used when listing sets for the collection picker
const SETS_PAGE_SIZE: u32 = 1000;

/// Read-only operations the search session needs from the catalog.
///
/// Implemented by [`CatalogClient`] for the real API; tests provide
/// scripted implementations.
pub trait CatalogApi: Clone + Send + Sync + 'static {
  /// Fetch one page of cards matching `filters`
  fn fetch_page(
    &self,
    page: u32,
    filters: &FilterCombination,
    page_size: u32,
  ) -> impl Future<Output = Result<CardPage, CatalogError>> + Send;

  /// Fetch the category and collection lists for the pickers
  fn fetch_filter_options(
    &self,
  ) -> impl Future<Output = Result<FilterOptions, CatalogError>> + Send;
}

/// HTTP client for the card catalog API
#[derive(Clone)]
pub struct CatalogClient {
  http: reqwest::Client,
  base_url: Url,
  api_key: String,
}

impl CatalogClient {
  pub fn new(config: &Config) -> Result<Self> {
    let api_key = Config::get_api_key()?;
    Self::with_api_key(
      &config.catalog.url,
      api_key,
      Duration::from_secs(config.catalog.timeout_secs),
    )
  }

  pub fn with_api_key(base_url: &str, api_key: String, timeout: Duration) -> Result<Self> {
    let mut base_url =
      Url::parse(base_url).map_err(|e| eyre!("Invalid catalog url {}: {}", base_url, e))?;

    // Url::join replaces the last path segment unless the base ends in '/'
    if !base_url.path().ends_with('/') {
      let path = format!("{}/", base_url.path());
      base_url.set_path(&path);
    }

    let http = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      base_url,
      api_key,
    })
  }

  /// Host name shown in the header bar
  pub fn host(&self) -> &str {
    self.base_url.host_str().unwrap_or("")
  }

  /// Build the `/cards` url for a page under the given filters
  pub fn cards_url(
    &self,
    page: u32,
    filters: &FilterCombination,
    page_size: u32,
  ) -> Result<Url, CatalogError> {
    let mut url = self.base_url.join("cards")?;
    {
      let mut pairs = url.query_pairs_mut();
      pairs.append_pair("page", &page.to_string());
      pairs.append_pair("pageSize", &page_size.to_string());
      if let Some(q) = filters.query_expression() {
        pairs.append_pair("q", &q);
      }
    }
    Ok(url)
  }

  async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
    debug!(%url, "catalog request");

    let response = self
      .http
      .get(url)
      .header(API_KEY_HEADER, &self.api_key)
      .send()
      .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
      return Err(CatalogError::Status {
        status: status.as_u16(),
        message: body.trim().chars().take(200).collect(),
      });
    }

    Ok(serde_json::from_str(&body)?)
  }
}

impl CatalogApi for CatalogClient {
  async fn fetch_page(
    &self,
    page: u32,
    filters: &FilterCombination,
    page_size: u32,
  ) -> Result<CardPage, CatalogError> {
    let url = self.cards_url(page, filters, page_size)?;
    let response: ApiCardsResponse = self.get_json(url).await?;
    Ok(response.into())
  }

  async fn fetch_filter_options(&self) -> Result<FilterOptions, CatalogError> {
    let types_url = self.base_url.join("types")?;
    let mut sets_url = self.base_url.join("sets")?;
    sets_url
      .query_pairs_mut()
      .append_pair("pageSize", &SETS_PAGE_SIZE.to_string());

    let (types, sets) = futures::try_join!(
      self.get_json::<ApiTypesResponse>(types_url),
      self.get_json::<ApiSetsResponse>(sets_url),
    )?;

    Ok(into_filter_options(types, sets))
  }
}
