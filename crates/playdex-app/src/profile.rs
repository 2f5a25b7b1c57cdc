//! Profile aggregation: one user's favorites and comments, enriched with
//! catalog detail in a bounded concurrent fan-out.
//!
//! Enrichment is best-effort. A catalog failure degrades the affected card
//! (the denormalised favorite data still renders) instead of failing the
//! whole profile.

use std::{collections::HashMap, sync::Arc};

use tokio::{sync::Semaphore, task::JoinSet};

use playdex_core::{
  Error, Result,
  catalog::CatalogSource,
  comment::{Comment, CommentFilter},
  favorite::FavoriteEntry,
  game::{GameDetail, GameId, Screenshot},
  identity::Identity,
  store::{CommentStore, FavoriteStore},
};

/// Tunables for profile assembly.
#[derive(Debug, Clone, Copy)]
pub struct ProfileLimits {
  /// How many of the newest favorites form the "recently added" strip.
  pub recent:      usize,
  /// Screenshots fetched per favorite.
  pub screenshots: usize,
  /// Concurrent catalog requests during the fan-out.
  pub concurrency: usize,
}

impl Default for ProfileLimits {
  fn default() -> Self {
    Self {
      recent:      5,
      screenshots: 5,
      concurrency: 4,
    }
  }
}

/// A favorite with its (possibly missing) catalog enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteCard {
  pub entry:       FavoriteEntry,
  pub detail:      Option<GameDetail>,
  pub screenshots: Vec<Screenshot>,
}

impl FavoriteCard {
  /// True when catalog enrichment failed and only denormalised data is
  /// available.
  pub fn is_degraded(&self) -> bool {
    self.detail.is_none() && !self.entry.game_id.is_placeholder()
  }
}

/// A comment paired with what is known about the game it targets.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentCard {
  pub comment:    Comment,
  pub game_name:  String,
  pub game_image: Option<String>,
}

/// Everything the profile page renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
  pub identity:       Identity,
  /// All favorites, newest-first.
  pub favorites:      Vec<FavoriteCard>,
  /// The first [`ProfileLimits::recent`] favorites, cloned for the strip.
  pub recently_added: Vec<FavoriteCard>,
  /// The user's comments, newest-first.
  pub comments:       Vec<CommentCard>,
}

/// Assemble the profile view for `identity`.
///
/// Favorites and comments come from their stores; each favorite then fans
/// out to the catalog for detail and screenshots, at most
/// `limits.concurrency` requests in flight. Comment cards reuse the
/// details fetched for favorites and fall back to `"Unknown Game"` when
/// the game is not among them and its own lookup fails.
pub async fn build_profile<F, C, G>(
  identity: Identity,
  favorites: &F,
  comments: &C,
  catalog: Arc<G>,
  limits: ProfileLimits,
) -> Result<ProfileView>
where
  F: FavoriteStore,
  C: CommentStore,
  G: CatalogSource + 'static,
{
  let mut entries = favorites
    .list_favorites(identity.user_id)
    .await
    .map_err(Error::storage)?;
  entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));

  let my_comments = comments
    .list_comments(&CommentFilter::by_author(identity.user_id))
    .await
    .map_err(Error::storage)?;

  let cards = enrich_favorites(entries, &catalog, limits).await;

  let mut known_games: HashMap<GameId, (String, Option<String>)> = cards
    .iter()
    .filter_map(|card| {
      card.detail.as_ref().map(|d| {
        (d.id.clone(), (d.name.clone(), d.background_image.clone()))
      })
    })
    .collect();

  let mut comment_cards = Vec::with_capacity(my_comments.len());
  for comment in my_comments {
    let (game_name, game_image) = match known_games.get(&comment.game_id) {
      Some(known) => known.clone(),
      None => {
        let resolved = resolve_game(&*catalog, &comment.game_id).await;
        known_games.insert(comment.game_id.clone(), resolved.clone());
        resolved
      }
    };
    comment_cards.push(CommentCard {
      comment,
      game_name,
      game_image,
    });
  }

  let recently_added = cards.iter().take(limits.recent).cloned().collect();

  Ok(ProfileView {
    identity,
    favorites: cards,
    recently_added,
    comments: comment_cards,
  })
}

/// Fetch detail + screenshots for each entry, preserving input order.
async fn enrich_favorites<G>(
  entries: Vec<FavoriteEntry>,
  catalog: &Arc<G>,
  limits: ProfileLimits,
) -> Vec<FavoriteCard>
where
  G: CatalogSource + 'static,
{
  let permits = Arc::new(Semaphore::new(limits.concurrency.max(1)));
  let mut tasks = JoinSet::new();

  let count = entries.len();
  for (index, entry) in entries.into_iter().enumerate() {
    let catalog = Arc::clone(catalog);
    let permits = Arc::clone(&permits);
    let screenshot_limit = limits.screenshots;

    tasks.spawn(async move {
      // The semaphore is never closed, so acquisition cannot fail.
      let _permit = permits.acquire_owned().await.ok();

      let (detail, screenshots) = tokio::join!(
        catalog.game_detail(&entry.game_id),
        catalog.screenshots(&entry.game_id, screenshot_limit),
      );

      let detail = match detail {
        Ok(detail) => Some(detail),
        Err(e) => {
          tracing::warn!(game = %entry.game_id, error = %e, "detail fetch failed");
          None
        }
      };
      let screenshots = match screenshots {
        Ok(shots) => shots,
        Err(e) => {
          tracing::warn!(game = %entry.game_id, error = %e, "screenshot fetch failed");
          Vec::new()
        }
      };

      (index, FavoriteCard {
        entry,
        detail,
        screenshots,
      })
    });
  }

  let mut cards: Vec<Option<FavoriteCard>> = vec![None; count];
  while let Some(joined) = tasks.join_next().await {
    match joined {
      Ok((index, card)) => cards[index] = Some(card),
      Err(e) => tracing::warn!(error = %e, "enrichment task panicked"),
    }
  }
  cards.into_iter().flatten().collect()
}

async fn resolve_game<G: CatalogSource>(
  catalog: &G,
  id: &GameId,
) -> (String, Option<String>) {
  match catalog.game_detail(id).await {
    Ok(detail) => (detail.name, detail.background_image),
    Err(e) => {
      tracing::warn!(game = %id, error = %e, "game lookup for comment failed");
      ("Unknown Game".to_owned(), None)
    }
  }
}
