//! Error type for `playdex-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("invalid stored game id: {0}")]
  GameId(#[from] playdex_core::game::ParseGameIdError),

  #[error("unknown stored provider: {0:?}")]
  Provider(String),

  #[error("password hash error: {0}")]
  Password(String),
}

/// The auth backend surfaces the unified taxonomy; everything the database
/// throws at it becomes an opaque storage failure.
impl From<Error> for playdex_core::Error {
  fn from(e: Error) -> Self {
    playdex_core::Error::storage(e)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
