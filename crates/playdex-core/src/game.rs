//! Catalog-facing read models: games, genres, platforms, screenshots.
//!
//! These are pass-through views of the external catalog. Nothing here is
//! owned or mutated by playdex.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

// ─── Game id ─────────────────────────────────────────────────────────────────

/// Slug prefix for "add favorite" placeholder card slots.
const PLACEHOLDER_PREFIX: &str = "add-favorite-";

/// Identifier for either a real catalog game or a placeholder card slot.
///
/// Placeholder ids must never reach the network; the catalog client
/// short-circuits them to a stub [`GameDetail`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameId {
  /// Numeric id assigned by the external catalog.
  Catalog(i64),
  /// An "add favorite" slot shown when the favorites row is not full.
  Placeholder(u32),
}

impl GameId {
  pub fn placeholder(slot: u32) -> Self {
    Self::Placeholder(slot)
  }

  pub fn is_placeholder(&self) -> bool {
    matches!(self, Self::Placeholder(_))
  }
}

impl fmt::Display for GameId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Catalog(id) => write!(f, "{id}"),
      Self::Placeholder(slot) => write!(f, "{PLACEHOLDER_PREFIX}{slot}"),
    }
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid game id: {0:?}")]
pub struct ParseGameIdError(pub String);

impl FromStr for GameId {
  type Err = ParseGameIdError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if let Some(slot) = s.strip_prefix(PLACEHOLDER_PREFIX) {
      return slot
        .parse()
        .map(Self::Placeholder)
        .map_err(|_| ParseGameIdError(s.to_owned()));
    }
    s
      .parse()
      .map(Self::Catalog)
      .map_err(|_| ParseGameIdError(s.to_owned()))
  }
}

// Wire form: the catalog number, or the placeholder slug as a string.
impl Serialize for GameId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Self::Catalog(id) => serializer.serialize_i64(*id),
      Self::Placeholder(_) => serializer.serialize_str(&self.to_string()),
    }
  }
}

impl<'de> Deserialize<'de> for GameId {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
      Number(i64),
      Text(String),
    }

    match Raw::deserialize(deserializer)? {
      Raw::Number(id) => Ok(Self::Catalog(id)),
      Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
  }
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// One row of a paginated game listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
  pub id:               GameId,
  pub name:             String,
  pub background_image: Option<String>,
  pub rating:           Option<f64>,
  pub released:         Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
  pub id:   i64,
  pub name: String,
  pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
  pub id:   i64,
  pub name: String,
  pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenshot {
  pub id:    i64,
  pub image: String,
}

/// The full detail record for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetail {
  pub id:               GameId,
  pub name:             String,
  pub description:      Option<String>,
  pub background_image: Option<String>,
  pub rating:           Option<f64>,
  pub released:         Option<NaiveDate>,
  pub genres:           Vec<Genre>,
  pub platforms:        Vec<Platform>,
  pub developers:       Vec<String>,
}

impl GameDetail {
  /// The stub record returned for placeholder ids without any network call.
  pub fn placeholder(id: GameId) -> Self {
    Self {
      id,
      name: "Add Favorite".to_owned(),
      description: None,
      background_image: None,
      rating: None,
      released: None,
      genres: Vec::new(),
      platforms: Vec::new(),
      developers: Vec::new(),
    }
  }
}

// ─── Listing queries ─────────────────────────────────────────────────────────

/// Catalog sort keys; each maps to one ordering parameter of the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
  Name,
  Released,
  Rating,
  Metacritic,
}

impl SortKey {
  /// The `ordering` query-parameter value. Quality keys sort descending.
  pub fn as_param(self) -> &'static str {
    match self {
      Self::Name => "name",
      Self::Released => "-released",
      Self::Rating => "-rating",
      Self::Metacritic => "-metacritic",
    }
  }
}

/// Parameters for one page of a filtered game listing.
#[derive(Debug, Clone, PartialEq)]
pub struct GameQuery {
  /// 1-based page number.
  pub page:      u32,
  pub page_size: u32,
  /// Platform id filter.
  pub platform:  Option<i64>,
  /// Genre id or slug filter.
  pub genre:     Option<String>,
  pub sort:      Option<SortKey>,
}

impl Default for GameQuery {
  fn default() -> Self {
    Self {
      page:      1,
      page_size: 12,
      platform:  None,
      genre:     None,
      sort:      None,
    }
  }
}

/// One page of results plus a has-more flag for infinite scroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamePage {
  pub results:  Vec<GameSummary>,
  pub has_more: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn game_id_round_trips_through_display_and_parse() {
    assert_eq!("3498".parse::<GameId>().unwrap(), GameId::Catalog(3498));
    assert_eq!(
      "add-favorite-2".parse::<GameId>().unwrap(),
      GameId::Placeholder(2)
    );
    assert_eq!(GameId::Catalog(3498).to_string(), "3498");
    assert_eq!(GameId::Placeholder(2).to_string(), "add-favorite-2");
  }

  #[test]
  fn game_id_rejects_garbage() {
    assert!("not-a-game".parse::<GameId>().is_err());
    assert!("add-favorite-x".parse::<GameId>().is_err());
  }

  #[test]
  fn game_id_serde_uses_number_or_slug() {
    assert_eq!(
      serde_json::to_string(&GameId::Catalog(42)).unwrap(),
      "42"
    );
    assert_eq!(
      serde_json::to_string(&GameId::Placeholder(1)).unwrap(),
      "\"add-favorite-1\""
    );
    let id: GameId = serde_json::from_str("\"add-favorite-1\"").unwrap();
    assert_eq!(id, GameId::Placeholder(1));
    let id: GameId = serde_json::from_str("42").unwrap();
    assert_eq!(id, GameId::Catalog(42));
  }

  #[test]
  fn placeholder_detail_is_a_stub() {
    let detail = GameDetail::placeholder(GameId::placeholder(1));
    assert_eq!(detail.name, "Add Favorite");
    assert!(detail.background_image.is_none());
    assert!(detail.genres.is_empty());
  }
}
