//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, release dates as `YYYY-MM-DD`.
//! UUIDs are stored as hyphenated lowercase strings. Game ids are stored in
//! their display form (the catalog number, or the placeholder slug).

use chrono::{DateTime, NaiveDate, Utc};
use playdex_core::{
  comment::{Comment, CommentId},
  favorite::FavoriteEntry,
  game::GameId,
  identity::{Identity, ProviderKind, UserId},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String {
  id.hyphenated().to_string()
}

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Ok(Uuid::parse_str(s)?)
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String {
  d.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── GameId ──────────────────────────────────────────────────────────────────

pub fn encode_game_id(id: &GameId) -> String {
  id.to_string()
}

pub fn decode_game_id(s: &str) -> Result<GameId> {
  Ok(s.parse()?)
}

// ─── ProviderKind ────────────────────────────────────────────────────────────

pub fn encode_provider(p: ProviderKind) -> &'static str {
  match p {
    ProviderKind::Password => "password",
    ProviderKind::Github => "github",
  }
}

pub fn decode_provider(s: &str) -> Result<ProviderKind> {
  match s {
    "password" => Ok(ProviderKind::Password),
    "github" => Ok(ProviderKind::Github),
    other => Err(Error::Provider(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub email:         String,
  pub display_name:  Option<String>,
  pub avatar_url:    Option<String>,
  pub provider:      String,
  pub password_hash: Option<String>,
}

impl RawUser {
  pub fn into_identity(self) -> Result<Identity> {
    Ok(Identity {
      user_id:      UserId(decode_uuid(&self.user_id)?),
      email:        self.email,
      display_name: self.display_name,
      avatar_url:   self.avatar_url,
      provider:     decode_provider(&self.provider)?,
    })
  }
}

/// Raw strings read directly from a `favorites` row.
pub struct RawFavorite {
  pub owner_id:   String,
  pub game_id:    String,
  pub game_name:  String,
  pub game_image: Option<String>,
  pub rating:     Option<f64>,
  pub released:   Option<String>,
  pub added_at:   String,
}

impl RawFavorite {
  pub fn into_entry(self) -> Result<FavoriteEntry> {
    Ok(FavoriteEntry {
      owner:      UserId(decode_uuid(&self.owner_id)?),
      game_id:    decode_game_id(&self.game_id)?,
      game_name:  self.game_name,
      game_image: self.game_image,
      rating:     self.rating,
      released:   self.released.as_deref().map(decode_date).transpose()?,
      added_at:   decode_dt(&self.added_at)?,
    })
  }
}

/// Raw strings read directly from a `comments` row.
pub struct RawComment {
  pub comment_id:    String,
  pub author_id:     String,
  pub author_handle: String,
  pub game_id:       String,
  pub text:          String,
  pub created_at:    String,
}

impl RawComment {
  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      id:            CommentId(decode_uuid(&self.comment_id)?),
      author:        UserId(decode_uuid(&self.author_id)?),
      author_handle: self.author_handle,
      game_id:       decode_game_id(&self.game_id)?,
      text:          self.text,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
