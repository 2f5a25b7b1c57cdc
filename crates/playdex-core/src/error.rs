//! The unified error taxonomy surfaced to callers.
//!
//! Storage backends and the catalog client keep their own error types; the
//! service layer boxes those into [`Error::Storage`] / maps them to
//! [`Error::Catalog`] at the call boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  // ── Credential failures ───────────────────────────────────────────────

  #[error("invalid email address: {0:?}")]
  InvalidEmail(String),

  #[error("password too weak (minimum {0} characters)")]
  WeakPassword(usize),

  #[error("an account already exists for this email")]
  EmailInUse,

  /// Wrong password and unknown account collapse into one variant at the
  /// sign-in boundary, so a failed attempt does not reveal which it was.
  #[error("invalid email or password")]
  InvalidCredentials,

  #[error("no account found for this email")]
  UserNotFound,

  #[error("too many attempts; try again later")]
  TooManyAttempts,

  // ── Authorization ─────────────────────────────────────────────────────

  #[error("operation requires a signed-in identity")]
  NotAuthenticated,

  #[error("permission denied: {0}")]
  Permission(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("operation not supported: {0}")]
  Unsupported(&'static str),

  // ── Transport ─────────────────────────────────────────────────────────

  #[error("network error: {0}")]
  Network(String),

  #[error("timed out waiting for {0}")]
  Timeout(&'static str),

  #[error("sign-in popup was blocked")]
  PopupBlocked,

  #[error("sign-in popup was closed before completing")]
  PopupClosed,

  // ── Backends ──────────────────────────────────────────────────────────

  #[error("catalog request failed with status {status}")]
  Catalog { status: u16 },

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error as [`Error::Storage`].
  pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(source))
  }

  /// True for failures the user can correct by re-entering credentials.
  pub fn is_credential(&self) -> bool {
    matches!(
      self,
      Self::InvalidEmail(_)
        | Self::WeakPassword(_)
        | Self::EmailInUse
        | Self::InvalidCredentials
        | Self::UserNotFound
        | Self::TooManyAttempts
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
