//! [`CatalogClient`] — async HTTP client implementing
//! [`CatalogSource`] against the catalog REST API.

use std::time::Duration;

use serde::{Deserialize, de::DeserializeOwned};
use tokio::sync::OnceCell;

use playdex_core::{
  catalog::CatalogSource,
  game::{GameDetail, GameId, GamePage, GameQuery, Genre, Platform, Screenshot},
};

use crate::{
  Result,
  dto::{DetailDto, GameDto, GenreDto, Page, PlatformDto, ScreenshotDto},
  error::Error,
};

/// Connection settings for the catalog API.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
  /// API root, e.g. `https://api.rawg.io/api`.
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Key appended to every request.
  pub api_key:  String,
}

fn default_base_url() -> String {
  "https://api.rawg.io/api".to_owned()
}

/// Async client for the catalog API.
///
/// Reference lists (genres, platforms) are fetched once and cached for the
/// client's lifetime; nothing else is cached.
pub struct CatalogClient {
  client:    reqwest::Client,
  config:    CatalogConfig,
  genres:    OnceCell<Vec<Genre>>,
  platforms: OnceCell<Vec<Platform>>,
}

impl CatalogClient {
  pub fn new(config: CatalogConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self {
      client,
      config,
      genres: OnceCell::new(),
      platforms: OnceCell::new(),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// `GET <base>{path}?key=...&{query}`, decoding a JSON body on 2xx and
  /// surfacing the status otherwise.
  async fn get_json<T: DeserializeOwned>(
    &self,
    path: &str,
    query: &[(&str, String)],
  ) -> Result<T> {
    let resp = self
      .client
      .get(self.url(path))
      .query(&[("key", self.config.api_key.as_str())])
      .query(query)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      tracing::warn!(%status, path, "catalog request failed");
      return Err(Error::Status(status));
    }
    Ok(resp.json().await?)
  }
}

impl CatalogSource for CatalogClient {
  type Error = Error;

  /// `GET /games?page=..&page_size=..[&platforms=..][&genres=..][&ordering=..]`
  async fn list_games(&self, query: &GameQuery) -> Result<GamePage> {
    let mut params = vec![
      ("page", query.page.to_string()),
      ("page_size", query.page_size.to_string()),
    ];
    if let Some(platform) = query.platform {
      params.push(("platforms", platform.to_string()));
    }
    if let Some(genre) = &query.genre {
      params.push(("genres", genre.clone()));
    }
    if let Some(sort) = query.sort {
      params.push(("ordering", sort.as_param().to_owned()));
    }

    let page: Page<GameDto> = self.get_json("/games", &params).await?;
    Ok(page.into())
  }

  async fn genres(&self) -> Result<Vec<Genre>> {
    self
      .genres
      .get_or_try_init(|| async {
        let page: Page<GenreDto> = self.get_json("/genres", &[]).await?;
        Ok(page.results.into_iter().map(Into::into).collect())
      })
      .await
      .cloned()
  }

  async fn platforms(&self) -> Result<Vec<Platform>> {
    self
      .platforms
      .get_or_try_init(|| async {
        // The platform taxonomy does not fit the default page size.
        let page: Page<PlatformDto> = self
          .get_json("/platforms", &[("page_size", "100".to_owned())])
          .await?;
        Ok(page.results.into_iter().map(Into::into).collect())
      })
      .await
      .cloned()
  }

  /// `GET /games/{id}` — placeholder ids short-circuit to a stub without
  /// touching the network.
  async fn game_detail(&self, id: &GameId) -> Result<GameDetail> {
    if id.is_placeholder() {
      return Ok(GameDetail::placeholder(id.clone()));
    }
    let detail: DetailDto = self.get_json(&format!("/games/{id}"), &[]).await?;
    Ok(detail.into())
  }

  /// `GET /games/{id}/screenshots`, clamped to `limit`.
  async fn screenshots(&self, id: &GameId, limit: usize) -> Result<Vec<Screenshot>> {
    if id.is_placeholder() {
      return Ok(Vec::new());
    }
    let page: Page<ScreenshotDto> = self
      .get_json(&format!("/games/{id}/screenshots"), &[])
      .await?;
    Ok(
      page
        .results
        .into_iter()
        .take(limit)
        .map(Into::into)
        .collect(),
    )
  }
}
