//! Error type for `playdex-catalog`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Transport failure: unreachable host, timeout, or undecodable body.
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The catalog answered with a non-2xx status.
  #[error("catalog responded with status {0}")]
  Status(reqwest::StatusCode),
}

/// The service layer folds catalog failures into the unified taxonomy.
impl From<Error> for playdex_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Status(status) => playdex_core::Error::Catalog {
        status: status.as_u16(),
      },
      Error::Http(e) => playdex_core::Error::Network(e.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
