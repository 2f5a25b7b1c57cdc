//! Session — the process-wide authentication state.
//!
//! A session starts in [`Session::Loading`] and settles to either
//! [`Session::Authenticated`] or [`Session::Anonymous`] once the auth
//! backend's restore completes (or the loading bound expires).

use serde::{Deserialize, Serialize};

use crate::{
  error::{Error, Result},
  identity::Identity,
};

/// The authentication state machine: `Loading → {Authenticated, Anonymous}`,
/// with further transitions on sign-in/sign-out.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "phase", content = "identity")]
pub enum Session {
  /// The backend has not yet reported whether a user is signed in.
  #[default]
  Loading,
  /// No signed-in identity.
  Anonymous,
  /// A signed-in identity.
  Authenticated(Identity),
}

impl Session {
  pub fn is_loading(&self) -> bool {
    matches!(self, Self::Loading)
  }

  pub fn identity(&self) -> Option<&Identity> {
    match self {
      Self::Authenticated(identity) => Some(identity),
      _ => None,
    }
  }

  /// The signed-in identity, or [`Error::NotAuthenticated`].
  pub fn require_identity(&self) -> Result<&Identity> {
    self.identity().ok_or(Error::NotAuthenticated)
  }
}
