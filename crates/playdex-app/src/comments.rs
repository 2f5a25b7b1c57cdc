//! The comments service: posting, listing, and author-gated deletion.

use std::sync::Arc;

use tokio::sync::watch;

use playdex_core::{
  Error, Result, Session,
  comment::{Comment, CommentFilter, CommentId, NewComment},
  game::GameId,
  identity::Identity,
  store::CommentStore,
};

/// Comment operations. Reading is public; writing requires a session.
pub struct Comments<C> {
  store:   Arc<C>,
  session: watch::Receiver<Session>,
}

impl<C> Clone for Comments<C> {
  fn clone(&self) -> Self {
    Self {
      store:   Arc::clone(&self.store),
      session: self.session.clone(),
    }
  }
}

impl<C: CommentStore> Comments<C> {
  pub fn new(store: Arc<C>, session: watch::Receiver<Session>) -> Self {
    Self { store, session }
  }

  fn identity(&self) -> Result<Identity> {
    self.session.borrow().require_identity().cloned()
  }

  /// Post a comment on `game_id` as the signed-in user.
  ///
  /// Leading/trailing whitespace is trimmed; a comment that trims to
  /// nothing is silently dropped (`Ok(None)`), matching a submit button
  /// pressed on an empty box.
  pub async fn add(&self, game_id: GameId, text: &str) -> Result<Option<Comment>> {
    let me = self.identity()?;
    let text = text.trim();
    if text.is_empty() {
      return Ok(None);
    }

    let comment = self
      .store
      .add_comment(NewComment {
        author:        me.user_id,
        author_handle: me.handle().to_owned(),
        game_id,
        text: text.to_owned(),
      })
      .await
      .map_err(Error::storage)?;
    tracing::debug!(user = %me.user_id, comment = %comment.id, "comment posted");
    Ok(Some(comment))
  }

  /// Comments on one game, newest-first. Public.
  pub async fn for_game(&self, game_id: GameId) -> Result<Vec<Comment>> {
    self
      .store
      .list_comments(&CommentFilter::by_game(game_id))
      .await
      .map_err(Error::storage)
  }

  /// The signed-in user's own comments, newest-first.
  pub async fn mine(&self) -> Result<Vec<Comment>> {
    let me = self.identity()?;
    self
      .store
      .list_comments(&CommentFilter::by_author(me.user_id))
      .await
      .map_err(Error::storage)
  }

  /// Delete a comment. Only its author may do so.
  pub async fn delete(&self, id: CommentId) -> Result<()> {
    let me = self.identity()?;
    let comment = self
      .store
      .get_comment(id)
      .await
      .map_err(Error::storage)?
      .ok_or_else(|| Error::NotFound(format!("comment {id}")))?;

    if comment.author != me.user_id {
      return Err(Error::Permission(
        "only the author may delete a comment".into(),
      ));
    }
    self.store.delete_comment(id).await.map_err(Error::storage)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use playdex_core::auth::AuthBackend as _;
  use playdex_store_sqlite::SqliteStore;

  fn session(session: Session) -> watch::Receiver<Session> {
    let (tx, rx) = watch::channel(session);
    std::mem::forget(tx);
    rx
  }

  // Comment rows reference real users, so test identities go through
  // sign-up rather than being fabricated.
  async fn signed_up(store: &SqliteStore, email: &str) -> Identity {
    store
      .sign_up(email, "correct-horse-battery", None)
      .await
      .unwrap()
  }

  #[tokio::test]
  async fn anonymous_posting_is_rejected() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let comments = Comments::new(store, session(Session::Anonymous));

    assert!(matches!(
      comments.add(GameId::Catalog(1), "hello").await,
      Err(Error::NotAuthenticated)
    ));
  }

  #[tokio::test]
  async fn whitespace_only_text_is_dropped() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let me = signed_up(&store, "alice@example.com").await;
    let comments = Comments::new(store, session(Session::Authenticated(me)));

    assert!(comments.add(GameId::Catalog(1), "   \n\t").await.unwrap().is_none());
    assert!(comments.for_game(GameId::Catalog(1)).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn posted_comment_carries_the_email_handle() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let me = signed_up(&store, "alice@example.com").await;
    let comments = Comments::new(store, session(Session::Authenticated(me)));

    let comment = comments
      .add(GameId::Catalog(1), "  lovely soundtrack  ")
      .await
      .unwrap()
      .unwrap();
    assert_eq!(comment.author_handle, "alice");
    assert_eq!(comment.text, "lovely soundtrack");
  }

  #[tokio::test]
  async fn reading_is_public() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let me = signed_up(&store, "alice@example.com").await;
    let writer = Comments::new(
      Arc::clone(&store),
      session(Session::Authenticated(me)),
    );
    writer.add(GameId::Catalog(7), "first").await.unwrap();

    let reader = Comments::new(store, session(Session::Anonymous));
    assert_eq!(reader.for_game(GameId::Catalog(7)).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn only_the_author_may_delete() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let alice_id = signed_up(&store, "alice@example.com").await;
    let mallory_id = signed_up(&store, "mallory@example.com").await;
    let alice = Comments::new(
      Arc::clone(&store),
      session(Session::Authenticated(alice_id)),
    );
    let mallory = Comments::new(
      Arc::clone(&store),
      session(Session::Authenticated(mallory_id)),
    );

    let comment = alice
      .add(GameId::Catalog(1), "keep this")
      .await
      .unwrap()
      .unwrap();

    assert!(matches!(
      mallory.delete(comment.id).await,
      Err(Error::Permission(_))
    ));
    assert_eq!(alice.for_game(GameId::Catalog(1)).await.unwrap().len(), 1);

    alice.delete(comment.id).await.unwrap();
    assert!(alice.for_game(GameId::Catalog(1)).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn deleting_a_missing_comment_is_not_found() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let me = signed_up(&store, "alice@example.com").await;
    let comments = Comments::new(store, session(Session::Authenticated(me)));

    assert!(matches!(
      comments.delete(CommentId::new()).await,
      Err(Error::NotFound(_))
    ));
  }
}
