//! FavoriteEntry — a user-to-game favorite marker.
//!
//! Identity is `(owner, game_id)`: at most one entry per user per game.
//! The entry's existence is the sole favorite state; there is no separate
//! boolean flag anywhere.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{game::GameId, identity::UserId};

/// A favorited game, denormalised with enough catalog data to render a card
/// without a live lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
  pub owner:      UserId,
  pub game_id:    GameId,
  pub game_name:  String,
  pub game_image: Option<String>,
  pub rating:     Option<f64>,
  pub released:   Option<NaiveDate>,
  /// Assigned when the entry is created; never updated.
  pub added_at:   DateTime<Utc>,
}

/// Outcome of a favorite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
  /// The game is now favorited.
  Added,
  /// The game is no longer favorited.
  Removed,
}

impl FavoriteToggle {
  pub fn is_favorited(self) -> bool {
    matches!(self, Self::Added)
  }
}
