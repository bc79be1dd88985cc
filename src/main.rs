mod app;
mod cache;
mod catalog;
mod commands;
mod config;
mod event;
mod logging;
mod query;
mod search;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "cardex")]
#[command(about = "A terminal browser for trading card catalogs")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./cardex.yaml, then $XDG_CONFIG_HOME/cardex/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Open the search view with this card name already applied
  #[arg(short, long)]
  query: Option<String>,

  /// Cards per page
  #[arg(long)]
  page_size: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let mut config = config::Config::load(args.config.as_deref())?;
  if let Some(page_size) = args.page_size {
    config.search.page_size = page_size;
  }
  config.validate()?;

  // Held until exit so buffered log lines get flushed
  let _log_guard = logging::init(&config.log_dir()?)?;
  info!(
    catalog = %config.catalog.url,
    page_size = config.search.page_size,
    "starting cardex"
  );

  let mut app = app::App::new(&config, args.query)?;
  app.run().await?;

  Ok(())
}
