//! Comment — free-text notes tied to a game and an author.
//!
//! Comments are immutable once created; the only mutation is author-initiated
//! deletion.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{game::GameId, identity::UserId};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CommentId(pub Uuid);

impl CommentId {
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }
}

impl Default for CommentId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for CommentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
  pub id:            CommentId,
  pub author:        UserId,
  /// Short display handle captured at posting time (the author's email
  /// local part). A presentation shortcut, not a real username field.
  pub author_handle: String,
  pub game_id:       GameId,
  pub text:          String,
  /// Assigned by the store, not the caller.
  pub created_at:    DateTime<Utc>,
}

/// Input for [`CommentStore::add_comment`](crate::store::CommentStore).
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
  pub author:        UserId,
  pub author_handle: String,
  pub game_id:       GameId,
  pub text:          String,
}

/// Filter for comment listings. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentFilter {
  pub author: Option<UserId>,
  pub game:   Option<GameId>,
}

impl CommentFilter {
  pub fn by_author(author: UserId) -> Self {
    Self {
      author: Some(author),
      ..Self::default()
    }
  }

  pub fn by_game(game: GameId) -> Self {
    Self {
      game: Some(game),
      ..Self::default()
    }
  }
}
