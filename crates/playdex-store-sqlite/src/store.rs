//! [`SqliteStore`] — the SQLite implementation of the favorite and comment
//! stores.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use playdex_core::{
  comment::{Comment, CommentFilter, CommentId, NewComment},
  favorite::{FavoriteEntry, FavoriteToggle},
  game::{GameId, GameSummary},
  identity::UserId,
  store::{CommentStore, FavoriteStore},
};

use crate::{
  Error, Result,
  encode::{
    RawComment, RawFavorite, encode_date, encode_dt, encode_game_id, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A playdex document store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── FavoriteStore impl ──────────────────────────────────────────────────────

impl FavoriteStore for SqliteStore {
  type Error = Error;

  async fn toggle_favorite(
    &self,
    owner: UserId,
    game: &GameSummary,
  ) -> Result<FavoriteToggle> {
    let owner_str    = encode_uuid(owner.0);
    let game_id_str  = encode_game_id(&game.id);
    let game_name    = game.name.clone();
    let game_image   = game.background_image.clone();
    let rating       = game.rating;
    let released_str = game.released.map(encode_date);
    let added_at_str = encode_dt(Utc::now());

    // Existence check and flip happen inside one connection call, so two
    // toggles from the same process cannot interleave.
    let toggled = self
      .conn
      .call(move |conn| {
        let exists: bool = conn
          .query_row(
            "SELECT 1 FROM favorites WHERE owner_id = ?1 AND game_id = ?2",
            rusqlite::params![owner_str, game_id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if exists {
          conn.execute(
            "DELETE FROM favorites WHERE owner_id = ?1 AND game_id = ?2",
            rusqlite::params![owner_str, game_id_str],
          )?;
          Ok(FavoriteToggle::Removed)
        } else {
          conn.execute(
            "INSERT INTO favorites (
               owner_id, game_id, game_name, game_image, rating, released, added_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
              owner_str,
              game_id_str,
              game_name,
              game_image,
              rating,
              released_str,
              added_at_str,
            ],
          )?;
          Ok(FavoriteToggle::Added)
        }
      })
      .await?;

    Ok(toggled)
  }

  async fn list_favorites(&self, owner: UserId) -> Result<Vec<FavoriteEntry>> {
    let owner_str = encode_uuid(owner.0);

    let raws: Vec<RawFavorite> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT owner_id, game_id, game_name, game_image, rating, released, added_at
           FROM favorites WHERE owner_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], |row| {
            Ok(RawFavorite {
              owner_id:   row.get(0)?,
              game_id:    row.get(1)?,
              game_name:  row.get(2)?,
              game_image: row.get(3)?,
              rating:     row.get(4)?,
              released:   row.get(5)?,
              added_at:   row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFavorite::into_entry).collect()
  }

  async fn is_favorite(&self, owner: UserId, game_id: &GameId) -> Result<bool> {
    let owner_str   = encode_uuid(owner.0);
    let game_id_str = encode_game_id(game_id);

    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM favorites WHERE owner_id = ?1 AND game_id = ?2",
              rusqlite::params![owner_str, game_id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(exists)
  }

  async fn purge_favorites(&self, owner: UserId) -> Result<usize> {
    let owner_str = encode_uuid(owner.0);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM favorites WHERE owner_id = ?1",
          rusqlite::params![owner_str],
        )?)
      })
      .await?;

    Ok(removed)
  }
}

// ─── CommentStore impl ───────────────────────────────────────────────────────

impl CommentStore for SqliteStore {
  type Error = Error;

  async fn add_comment(&self, input: NewComment) -> Result<Comment> {
    let comment = Comment {
      id:            CommentId::new(),
      author:        input.author,
      author_handle: input.author_handle,
      game_id:       input.game_id,
      text:          input.text,
      created_at:    Utc::now(),
    };

    let id_str      = encode_uuid(comment.id.0);
    let author_str  = encode_uuid(comment.author.0);
    let handle      = comment.author_handle.clone();
    let game_id_str = encode_game_id(&comment.game_id);
    let text        = comment.text.clone();
    let at_str      = encode_dt(comment.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO comments (
             comment_id, author_id, author_handle, game_id, text, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, author_str, handle, game_id_str, text, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(comment)
  }

  async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>> {
    let id_str = encode_uuid(id.0);

    let raw: Option<RawComment> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT comment_id, author_id, author_handle, game_id, text, created_at
               FROM comments WHERE comment_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawComment {
                  comment_id:    row.get(0)?,
                  author_id:     row.get(1)?,
                  author_handle: row.get(2)?,
                  game_id:       row.get(3)?,
                  text:          row.get(4)?,
                  created_at:    row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawComment::into_comment).transpose()
  }

  async fn list_comments(&self, filter: &CommentFilter) -> Result<Vec<Comment>> {
    let author_str = filter.author.map(|a| encode_uuid(a.0));
    let game_str   = filter.game.as_ref().map(encode_game_id);

    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        // Build WHERE clause dynamically; parameters are numbered in the
        // order the conditions are appended.
        let mut conds: Vec<String> = vec![];
        let mut args: Vec<String> = vec![];
        if let Some(a) = author_str {
          args.push(a);
          conds.push(format!("author_id = ?{}", args.len()));
        }
        if let Some(g) = game_str {
          args.push(g);
          conds.push(format!("game_id = ?{}", args.len()));
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT comment_id, author_id, author_handle, game_id, text, created_at
           FROM comments
           {where_clause}
           ORDER BY created_at DESC, comment_id"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(args), |row| {
            Ok(RawComment {
              comment_id:    row.get(0)?,
              author_id:     row.get(1)?,
              author_handle: row.get(2)?,
              game_id:       row.get(3)?,
              text:          row.get(4)?,
              created_at:    row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  async fn delete_comment(&self, id: CommentId) -> Result<()> {
    let id_str = encode_uuid(id.0);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM comments WHERE comment_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn purge_comments(&self, owner: UserId) -> Result<usize> {
    let owner_str = encode_uuid(owner.0);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM comments WHERE author_id = ?1",
          rusqlite::params![owner_str],
        )?)
      })
      .await?;

    Ok(removed)
  }
}
