//! The `FavoriteStore` and `CommentStore` traits.
//!
//! Implemented by storage backends (e.g. `playdex-store-sqlite`). The
//! service layer (`playdex-app`) depends on these abstractions, not on any
//! concrete backend, and wraps `Self::Error` into the unified taxonomy at
//! the call boundary.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes.

use std::future::Future;

use crate::{
  comment::{Comment, CommentFilter, CommentId, NewComment},
  favorite::{FavoriteEntry, FavoriteToggle},
  game::{GameId, GameSummary},
  identity::UserId,
};

// ─── Favorites ───────────────────────────────────────────────────────────────

/// Abstraction over the favorites document store.
pub trait FavoriteStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Flip the favorite marker for `(owner, game.id)`.
  ///
  /// If no entry exists one is created (with a store-assigned `added_at`)
  /// and [`FavoriteToggle::Added`] is returned; otherwise the entry is
  /// deleted and [`FavoriteToggle::Removed`] is returned. Always a flip,
  /// never a set-to-value.
  fn toggle_favorite<'a>(
    &'a self,
    owner: UserId,
    game: &'a GameSummary,
  ) -> impl Future<Output = Result<FavoriteToggle, Self::Error>> + Send + 'a;

  /// All favorite entries for `owner`, unordered at the storage boundary.
  /// Empty list (not an error) when none exist.
  fn list_favorites(
    &self,
    owner: UserId,
  ) -> impl Future<Output = Result<Vec<FavoriteEntry>, Self::Error>> + Send + '_;

  /// Existence probe for per-card UI hydration.
  fn is_favorite<'a>(
    &'a self,
    owner: UserId,
    game_id: &'a GameId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Delete every entry owned by `owner`; returns the number removed.
  /// Used by account deletion.
  fn purge_favorites(
    &self,
    owner: UserId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}

// ─── Comments ────────────────────────────────────────────────────────────────

/// Abstraction over the comments document store.
///
/// Authorization (only the author may delete) is the caller's concern;
/// [`CommentStore::delete_comment`] deletes unconditionally.
pub trait CommentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a comment with a store-assigned id and timestamp.
  fn add_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  /// Retrieve one comment. Returns `None` if not found.
  fn get_comment(
    &self,
    id: CommentId,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  /// Comments matching `filter`, newest-first by `created_at`.
  fn list_comments<'a>(
    &'a self,
    filter: &'a CommentFilter,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + 'a;

  /// Delete a comment unconditionally. Deleting a missing comment is a
  /// no-op.
  fn delete_comment(
    &self,
    id: CommentId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete every comment authored by `owner`; returns the number removed.
  fn purge_comments(
    &self,
    owner: UserId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
