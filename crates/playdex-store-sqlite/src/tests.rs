//! Integration tests for `SqliteStore` against an in-memory database.

use std::time::Duration;

use chrono::NaiveDate;
use playdex_core::{
  Error as CoreError,
  auth::{AuthBackend, OauthIdentity},
  comment::{CommentFilter, CommentId, NewComment},
  favorite::FavoriteToggle,
  game::{GameId, GameSummary},
  identity::{Identity, ProfileUpdate, ProviderKind},
  store::{CommentStore, FavoriteStore},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn signed_up(store: &SqliteStore, email: &str) -> Identity {
  store
    .sign_up(email, "correct-horse-battery", Some("tester"))
    .await
    .expect("sign up")
}

fn game(id: i64, name: &str) -> GameSummary {
  GameSummary {
    id:               GameId::Catalog(id),
    name:             name.to_owned(),
    background_image: Some(format!("https://img.example/{id}.jpg")),
    rating:           Some(4.2),
    released:         NaiveDate::from_ymd_opt(2013, 9, 17),
  }
}

// ─── Favorites ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_adds_then_removes() {
  let s = store().await;
  let user = signed_up(&s, "alice@example.com").await;
  let g = game(42, "The Witness");

  let first = s.toggle_favorite(user.user_id, &g).await.unwrap();
  assert_eq!(first, FavoriteToggle::Added);

  let favorites = s.list_favorites(user.user_id).await.unwrap();
  assert_eq!(favorites.len(), 1);
  assert_eq!(favorites[0].game_id, GameId::Catalog(42));
  assert_eq!(favorites[0].game_name, "The Witness");
  assert_eq!(favorites[0].released, NaiveDate::from_ymd_opt(2013, 9, 17));

  let second = s.toggle_favorite(user.user_id, &g).await.unwrap();
  assert_eq!(second, FavoriteToggle::Removed);
  assert!(s.list_favorites(user.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn toggle_twice_is_an_involution() {
  let s = store().await;
  let user = signed_up(&s, "alice@example.com").await;
  let g = game(7, "Hades");

  s.toggle_favorite(user.user_id, &g).await.unwrap();
  let before = s.is_favorite(user.user_id, &g.id).await.unwrap();

  s.toggle_favorite(user.user_id, &g).await.unwrap();
  s.toggle_favorite(user.user_id, &g).await.unwrap();

  assert_eq!(s.is_favorite(user.user_id, &g.id).await.unwrap(), before);
}

#[tokio::test]
async fn favorites_are_scoped_per_owner() {
  let s = store().await;
  let alice = signed_up(&s, "alice@example.com").await;
  let bob = signed_up(&s, "bob@example.com").await;

  s.toggle_favorite(alice.user_id, &game(1, "Celeste")).await.unwrap();
  s.toggle_favorite(bob.user_id, &game(2, "Portal")).await.unwrap();

  let alices = s.list_favorites(alice.user_id).await.unwrap();
  assert_eq!(alices.len(), 1);
  assert_eq!(alices[0].game_id, GameId::Catalog(1));
  assert!(!s.is_favorite(alice.user_id, &GameId::Catalog(2)).await.unwrap());
}

#[tokio::test]
async fn list_favorites_empty_for_new_owner() {
  let s = store().await;
  let user = signed_up(&s, "alice@example.com").await;
  assert!(s.list_favorites(user.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn purge_favorites_removes_all_for_owner() {
  let s = store().await;
  let user = signed_up(&s, "alice@example.com").await;
  s.toggle_favorite(user.user_id, &game(1, "Celeste")).await.unwrap();
  s.toggle_favorite(user.user_id, &game(2, "Portal")).await.unwrap();

  let removed = s.purge_favorites(user.user_id).await.unwrap();
  assert_eq!(removed, 2);
  assert!(s.list_favorites(user.user_id).await.unwrap().is_empty());
}

// ─── Comments ────────────────────────────────────────────────────────────────

fn new_comment(author: &Identity, game_id: i64, text: &str) -> NewComment {
  NewComment {
    author:        author.user_id,
    author_handle: author.handle().to_owned(),
    game_id:       GameId::Catalog(game_id),
    text:          text.to_owned(),
  }
}

#[tokio::test]
async fn add_and_get_comment() {
  let s = store().await;
  let user = signed_up(&s, "alice@example.com").await;

  let comment = s
    .add_comment(new_comment(&user, 42, "a quiet masterpiece"))
    .await
    .unwrap();
  assert_eq!(comment.author, user.user_id);
  assert_eq!(comment.author_handle, "tester");

  let fetched = s.get_comment(comment.id).await.unwrap().unwrap();
  assert_eq!(fetched, comment);
}

#[tokio::test]
async fn get_comment_missing_returns_none() {
  let s = store().await;
  assert!(s.get_comment(CommentId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_comments_newest_first_and_filtered() {
  let s = store().await;
  let alice = signed_up(&s, "alice@example.com").await;
  let bob = signed_up(&s, "bob@example.com").await;

  s.add_comment(new_comment(&alice, 1, "first")).await.unwrap();
  tokio::time::sleep(Duration::from_millis(5)).await;
  s.add_comment(new_comment(&bob, 1, "second")).await.unwrap();
  tokio::time::sleep(Duration::from_millis(5)).await;
  s.add_comment(new_comment(&alice, 2, "third")).await.unwrap();

  let all = s.list_comments(&CommentFilter::default()).await.unwrap();
  assert_eq!(
    all.iter().map(|c| c.text.as_str()).collect::<Vec<_>>(),
    ["third", "second", "first"]
  );

  let by_alice = s
    .list_comments(&CommentFilter::by_author(alice.user_id))
    .await
    .unwrap();
  assert!(by_alice.iter().all(|c| c.author == alice.user_id));
  assert_eq!(
    by_alice.iter().map(|c| c.text.as_str()).collect::<Vec<_>>(),
    ["third", "first"]
  );

  let on_game_1 = s
    .list_comments(&CommentFilter::by_game(GameId::Catalog(1)))
    .await
    .unwrap();
  assert_eq!(
    on_game_1.iter().map(|c| c.text.as_str()).collect::<Vec<_>>(),
    ["second", "first"]
  );
}

#[tokio::test]
async fn delete_comment_removes_it() {
  let s = store().await;
  let user = signed_up(&s, "alice@example.com").await;
  let comment = s.add_comment(new_comment(&user, 1, "gone soon")).await.unwrap();

  s.delete_comment(comment.id).await.unwrap();
  assert!(s.get_comment(comment.id).await.unwrap().is_none());

  // Deleting again is a no-op.
  s.delete_comment(comment.id).await.unwrap();
}

#[tokio::test]
async fn purge_comments_removes_all_by_author() {
  let s = store().await;
  let alice = signed_up(&s, "alice@example.com").await;
  let bob = signed_up(&s, "bob@example.com").await;
  s.add_comment(new_comment(&alice, 1, "one")).await.unwrap();
  s.add_comment(new_comment(&alice, 2, "two")).await.unwrap();
  s.add_comment(new_comment(&bob, 1, "keep")).await.unwrap();

  assert_eq!(s.purge_comments(alice.user_id).await.unwrap(), 2);
  let remaining = s.list_comments(&CommentFilter::default()).await.unwrap();
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].author, bob.user_id);
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sign_up_signs_in_and_restores() {
  let s = store().await;
  let identity = signed_up(&s, "alice@example.com").await;
  assert_eq!(identity.provider, ProviderKind::Password);

  let restored = s.restore().await.unwrap().expect("restored identity");
  assert_eq!(restored, identity);
}

#[tokio::test]
async fn sign_up_rejects_bad_input() {
  let s = store().await;

  assert!(matches!(
    s.sign_up("no-at-sign", "correct-horse-battery", None).await,
    Err(CoreError::InvalidEmail(_))
  ));
  assert!(matches!(
    s.sign_up("a@example.com", "short", None).await,
    Err(CoreError::WeakPassword(_))
  ));

  signed_up(&s, "alice@example.com").await;
  assert!(matches!(
    s.sign_up("alice@example.com", "correct-horse-battery", None).await,
    Err(CoreError::EmailInUse)
  ));
}

#[tokio::test]
async fn sign_in_verifies_the_password() {
  let s = store().await;
  let identity = signed_up(&s, "alice@example.com").await;
  s.sign_out().await.unwrap();

  let signed_in = s
    .sign_in("alice@example.com", "correct-horse-battery")
    .await
    .unwrap();
  assert_eq!(signed_in.user_id, identity.user_id);

  assert!(matches!(
    s.sign_in("alice@example.com", "wrong-password").await,
    Err(CoreError::InvalidCredentials)
  ));
  assert!(matches!(
    s.sign_in("nobody@example.com", "correct-horse-battery").await,
    Err(CoreError::InvalidCredentials)
  ));
}

#[tokio::test]
async fn sign_out_clears_the_persisted_session() {
  let s = store().await;
  signed_up(&s, "alice@example.com").await;

  s.sign_out().await.unwrap();
  assert!(s.restore().await.unwrap().is_none());
}

#[tokio::test]
async fn oauth_sign_in_creates_then_reuses_the_identity() {
  let s = store().await;
  let oauth = OauthIdentity {
    provider:     ProviderKind::Github,
    email:        "dev@example.com".to_owned(),
    display_name: Some("dev".to_owned()),
    avatar_url:   Some("https://avatars.example/dev".to_owned()),
  };

  let first = s.sign_in_oauth(oauth.clone()).await.unwrap();
  assert_eq!(first.provider, ProviderKind::Github);
  assert!(first.is_oauth());

  let second = s.sign_in_oauth(oauth).await.unwrap();
  assert_eq!(second.user_id, first.user_id);
}

#[tokio::test]
async fn oauth_accounts_have_no_password_operations() {
  let s = store().await;
  let identity = s
    .sign_in_oauth(OauthIdentity {
      provider:     ProviderKind::Github,
      email:        "dev@example.com".to_owned(),
      display_name: None,
      avatar_url:   None,
    })
    .await
    .unwrap();

  assert!(matches!(
    s.reauthenticate(identity.user_id, "anything-at-all").await,
    Err(CoreError::Unsupported(_))
  ));
  assert!(matches!(
    s.set_password(identity.user_id, "new-password-123").await,
    Err(CoreError::Unsupported(_))
  ));
  assert!(matches!(
    s.sign_in("dev@example.com", "anything-at-all").await,
    Err(CoreError::InvalidCredentials)
  ));
}

#[tokio::test]
async fn reauthenticate_then_change_password() {
  let s = store().await;
  let identity = signed_up(&s, "alice@example.com").await;

  s.reauthenticate(identity.user_id, "correct-horse-battery")
    .await
    .unwrap();
  assert!(matches!(
    s.reauthenticate(identity.user_id, "wrong").await,
    Err(CoreError::InvalidCredentials)
  ));

  s.set_password(identity.user_id, "staple-battery-horse")
    .await
    .unwrap();
  s.sign_in("alice@example.com", "staple-battery-horse")
    .await
    .unwrap();
  assert!(matches!(
    s.sign_in("alice@example.com", "correct-horse-battery").await,
    Err(CoreError::InvalidCredentials)
  ));
}

#[tokio::test]
async fn update_profile_applies_partial_fields() {
  let s = store().await;
  let identity = signed_up(&s, "alice@example.com").await;

  let updated = s
    .update_profile(
      identity.user_id,
      ProfileUpdate {
        display_name: Some("Alice".to_owned()),
        avatar_url:   None,
      },
    )
    .await
    .unwrap();
  assert_eq!(updated.display_name.as_deref(), Some("Alice"));
  // Untouched fields survive.
  assert_eq!(updated.email, identity.email);
}

#[tokio::test]
async fn password_reset_is_silent_for_unknown_email() {
  let s = store().await;
  signed_up(&s, "alice@example.com").await;

  s.request_password_reset("alice@example.com").await.unwrap();
  // Unknown address: same observable outcome, no account enumeration.
  s.request_password_reset("stranger@example.com").await.unwrap();
}

#[tokio::test]
async fn delete_account_cascades_over_side_stores() {
  let s = store().await;
  let identity = signed_up(&s, "alice@example.com").await;
  s.toggle_favorite(identity.user_id, &game(1, "Celeste")).await.unwrap();
  s.add_comment(new_comment(&identity, 1, "bye")).await.unwrap();

  s.delete_account(identity.user_id).await.unwrap();

  assert!(s.restore().await.unwrap().is_none());
  assert!(s.list_favorites(identity.user_id).await.unwrap().is_empty());
  assert!(
    s.list_comments(&CommentFilter::by_author(identity.user_id))
      .await
      .unwrap()
      .is_empty()
  );
  assert!(matches!(
    s.delete_account(identity.user_id).await,
    Err(CoreError::UserNotFound)
  ));
}
