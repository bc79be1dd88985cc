use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CATALOG_URL: &str = "https://api.pokemontcg.io/v2";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  /// Custom title for header (defaults to catalog host if not set)
  pub title: Option<String>,
  /// Directory for log files (defaults to $XDG_DATA_HOME/cardex/logs)
  pub log_dir: Option<PathBuf>,
  #[serde(default)]
  pub catalog: CatalogConfig,
  #[serde(default)]
  pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
  pub url: String,
  pub timeout_secs: u64,
}

impl Default for CatalogConfig {
  fn default() -> Self {
    Self {
      url: DEFAULT_CATALOG_URL.to_string(),
      timeout_secs: 15,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
  /// Cards per page
  pub page_size: u32,
  /// Quiet period before a typed search term is applied
  pub debounce_ms: u64,
  /// Read ahead one page when browsing without filters
  pub prefetch: bool,
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      page_size: 12,
      debounce_ms: 300,
      prefetch: true,
    }
  }
}

impl SearchConfig {
  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./cardex.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/cardex/config.yaml
  ///
  /// Every setting has a default, so running without a config file is fine.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Config::default(),
    };
    config.validate()?;
    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("cardex.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("cardex").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    // An empty file is a valid "all defaults" config
    if contents.trim().is_empty() {
      return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(contents)?)
  }

  pub fn validate(&self) -> Result<()> {
    if self.search.page_size == 0 {
      return Err(eyre!("search.page_size must be at least 1"));
    }
    Ok(())
  }

  /// Directory log files are written to
  pub fn log_dir(&self) -> Result<PathBuf> {
    if let Some(dir) = &self.log_dir {
      return Ok(dir.clone());
    }
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;
    Ok(data_dir.join("cardex").join("logs"))
  }

  /// Get the catalog API key from environment variables.
  ///
  /// Checks CARDEX_API_KEY first, then POKEMON_TCG_API_KEY as fallback.
  pub fn get_api_key() -> Result<String> {
    std::env::var("CARDEX_API_KEY")
      .or_else(|_| std::env::var("POKEMON_TCG_API_KEY"))
      .map_err(|_| {
        eyre!("Catalog API key not found. Set CARDEX_API_KEY or POKEMON_TCG_API_KEY environment variable.")
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_config_uses_defaults() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.catalog.url, DEFAULT_CATALOG_URL);
    assert_eq!(config.search.page_size, 12);
    assert!(config.search.prefetch);
  }

  #[test]
  fn test_partial_sections_keep_other_defaults() {
    let config = Config::parse(
      "title: My binder\nsearch:\n  page_size: 20\ncatalog:\n  timeout_secs: 3\n",
    )
    .unwrap();
    assert_eq!(config.title.as_deref(), Some("My binder"));
    assert_eq!(config.search.page_size, 20);
    assert_eq!(config.search.debounce_ms, 300);
    assert_eq!(config.catalog.timeout_secs, 3);
    assert_eq!(config.catalog.url, DEFAULT_CATALOG_URL);
  }

  #[test]
  fn test_zero_page_size_is_rejected() {
    let config = Config::parse("search:\n  page_size: 0\n").unwrap();
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_missing_explicit_path_is_an_error() {
    let err = Config::load(Some(Path::new("/definitely/not/here.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }

  #[test]
  fn test_explicit_log_dir_wins() {
    let config = Config::parse("log_dir: /tmp/cardex-test-logs\n").unwrap();
    assert_eq!(
      config.log_dir().unwrap(),
      PathBuf::from("/tmp/cardex-test-logs")
    );
  }
}
