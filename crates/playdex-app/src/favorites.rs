//! The favorites service: session-gated access to a [`FavoriteStore`].

use std::sync::Arc;

use tokio::sync::watch;

use playdex_core::{
  Error, Result, Session,
  favorite::{FavoriteEntry, FavoriteToggle},
  game::{GameId, GameSummary},
  identity::Identity,
  store::FavoriteStore,
};

/// Favorites operations for whoever is currently signed in.
///
/// Holds a [`watch::Receiver`] on the session so every call reads the
/// latest identity without a round-trip to the session store.
pub struct Favorites<F> {
  store:   Arc<F>,
  session: watch::Receiver<Session>,
}

impl<F> Clone for Favorites<F> {
  fn clone(&self) -> Self {
    Self {
      store:   Arc::clone(&self.store),
      session: self.session.clone(),
    }
  }
}

impl<F: FavoriteStore> Favorites<F> {
  pub fn new(store: Arc<F>, session: watch::Receiver<Session>) -> Self {
    Self { store, session }
  }

  fn identity(&self) -> Result<Identity> {
    self.session.borrow().require_identity().cloned()
  }

  /// Flip the favorite marker for `game` and report the new state.
  pub async fn toggle(&self, game: &GameSummary) -> Result<FavoriteToggle> {
    let me = self.identity()?;
    let toggle = self
      .store
      .toggle_favorite(me.user_id, game)
      .await
      .map_err(Error::storage)?;
    tracing::debug!(user = %me.user_id, game = %game.id, ?toggle, "favorite toggled");
    Ok(toggle)
  }

  /// The signed-in user's favorites, newest-first by `added_at`.
  pub async fn list(&self) -> Result<Vec<FavoriteEntry>> {
    let me = self.identity()?;
    let mut entries = self
      .store
      .list_favorites(me.user_id)
      .await
      .map_err(Error::storage)?;
    entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));
    Ok(entries)
  }

  /// Whether `game_id` is favorited. Anonymous viewers see `false`
  /// rather than an error so catalog cards render without a session.
  pub async fn is_favorite(&self, game_id: &GameId) -> Result<bool> {
    let Some(me) = self.session.borrow().identity().cloned() else {
      return Ok(false);
    };
    self
      .store
      .is_favorite(me.user_id, game_id)
      .await
      .map_err(Error::storage)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use playdex_core::auth::AuthBackend as _;
  use playdex_store_sqlite::SqliteStore;

  fn session(session: Session) -> watch::Receiver<Session> {
    let (tx, rx) = watch::channel(session);
    // Keep the channel open for the test's lifetime.
    std::mem::forget(tx);
    rx
  }

  // Rows in the store reference real users, so test identities go
  // through sign-up rather than being fabricated.
  async fn signed_up(store: &SqliteStore, email: &str) -> Identity {
    store
      .sign_up(email, "correct-horse-battery", None)
      .await
      .unwrap()
  }

  fn game(id: i64, name: &str) -> GameSummary {
    GameSummary {
      id:               GameId::Catalog(id),
      name:             name.into(),
      background_image: None,
      rating:           Some(4.2),
      released:         None,
    }
  }

  #[tokio::test]
  async fn anonymous_toggle_is_rejected() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let favorites = Favorites::new(store, session(Session::Anonymous));

    assert!(matches!(
      favorites.toggle(&game(1, "Celeste")).await,
      Err(Error::NotAuthenticated)
    ));
    assert!(matches!(
      favorites.list().await,
      Err(Error::NotAuthenticated)
    ));
  }

  #[tokio::test]
  async fn anonymous_is_favorite_reads_false() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let favorites = Favorites::new(store, session(Session::Anonymous));

    assert!(!favorites.is_favorite(&GameId::Catalog(1)).await.unwrap());
  }

  #[tokio::test]
  async fn toggle_then_list_round_trip() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let me = signed_up(&store, "alice@example.com").await;
    let favorites = Favorites::new(store, session(Session::Authenticated(me)));

    let toggle = favorites.toggle(&game(1, "Celeste")).await.unwrap();
    assert!(toggle.is_favorited());
    assert!(favorites.is_favorite(&GameId::Catalog(1)).await.unwrap());

    let entries = favorites.list().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].game_name, "Celeste");

    let toggle = favorites.toggle(&game(1, "Celeste")).await.unwrap();
    assert!(!toggle.is_favorited());
    assert!(favorites.list().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn list_is_newest_first() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let me = signed_up(&store, "alice@example.com").await;
    let favorites = Favorites::new(store, session(Session::Authenticated(me)));

    favorites.toggle(&game(1, "Celeste")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    favorites.toggle(&game(2, "Hades")).await.unwrap();

    let names: Vec<_> = favorites
      .list()
      .await
      .unwrap()
      .into_iter()
      .map(|e| e.game_name)
      .collect();
    assert_eq!(names, ["Hades", "Celeste"]);
  }
}
