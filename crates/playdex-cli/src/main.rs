//! `playdex` — command-line client for the playdex game catalog.
//!
//! # Usage
//!
//! ```
//! playdex signup alice@example.com hunter2-hunter2 --name alice
//! playdex games --genre indie --sort rating
//! playdex favorite 3498
//! playdex profile
//! ```
//!
//! The catalog API key comes from `playdex.toml` or
//! `PLAYDEX__CATALOG__API_KEY`. The session persists in the SQLite store
//! between invocations, so `login` and `logout` work like a browser
//! session.

mod commands;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use playdex_app::SessionStore;
use playdex_catalog::CatalogClient;
use playdex_store_sqlite::SqliteStore;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use commands::Command;

#[derive(Parser)]
#[command(name = "playdex", about = "Game catalog, favorites, and comments")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "playdex.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let store = Arc::new(
    SqliteStore::open(&settings.store_path)
      .await
      .with_context(|| format!("failed to open store at {:?}", settings.store_path))?,
  );
  let catalog = Arc::new(CatalogClient::new(settings.catalog)?);

  // Restore the persisted session before dispatching.
  let session = SessionStore::new(Arc::clone(&store));
  let mut watcher = session.subscribe();
  watcher
    .wait_for(|s| !s.is_loading())
    .await
    .context("session store closed during restore")?;

  commands::run(cli.command, session, store, catalog).await
}
