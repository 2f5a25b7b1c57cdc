//! Configuration for the `playdex` binary.
//!
//! Layered: `playdex.toml` (or `--config PATH`), then `PLAYDEX__*`
//! environment variables (double underscore separates nesting, e.g.
//! `PLAYDEX__CATALOG__API_KEY`).

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use playdex_catalog::CatalogConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite database path; created on first use.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  pub catalog:    CatalogConfig,
}

fn default_store_path() -> PathBuf {
  PathBuf::from("playdex.db")
}

impl Settings {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("PLAYDEX").separator("__"))
      .build()
      .context("failed to read configuration")?;

    settings
      .try_deserialize()
      .context("failed to deserialise configuration")
  }
}
