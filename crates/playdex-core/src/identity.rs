//! Identity — the authenticated user's opaque reference.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum accepted password length for credential accounts.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Opaque user identifier.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }
}

impl Default for UserId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// How an identity authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
  /// Email + password credential.
  Password,
  /// Third-party OAuth; no local password exists for these accounts.
  Github,
}

/// An authenticated user as reported by the auth backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
  pub user_id:      UserId,
  pub email:        String,
  pub display_name: Option<String>,
  pub avatar_url:   Option<String>,
  pub provider:     ProviderKind,
}

impl Identity {
  /// Display-name fallback chain: profile name, email local part, `"User"`.
  pub fn handle(&self) -> &str {
    self
      .display_name
      .as_deref()
      .filter(|n| !n.is_empty())
      .or_else(|| self.email.split('@').next().filter(|p| !p.is_empty()))
      .unwrap_or("User")
  }

  /// The avatar to render: the uploaded photo, or a deterministic
  /// generated one seeded by the user id.
  pub fn avatar_or_default(&self) -> String {
    self.avatar_url.clone().unwrap_or_else(|| {
      format!(
        "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
        self.user_id
      )
    })
  }

  /// OAuth-only identities have no password to verify against.
  pub fn is_oauth(&self) -> bool {
    self.provider != ProviderKind::Password
  }
}

/// Partial profile fields applied by `update_profile`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
  pub display_name: Option<String>,
  pub avatar_url:   Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn identity(display_name: Option<&str>, email: &str) -> Identity {
    Identity {
      user_id:      UserId::new(),
      email:        email.to_owned(),
      display_name: display_name.map(str::to_owned),
      avatar_url:   None,
      provider:     ProviderKind::Password,
    }
  }

  #[test]
  fn handle_prefers_display_name() {
    let id = identity(Some("alice"), "alice.l@example.com");
    assert_eq!(id.handle(), "alice");
  }

  #[test]
  fn handle_falls_back_to_email_local_part() {
    let id = identity(None, "alice.l@example.com");
    assert_eq!(id.handle(), "alice.l");
  }

  #[test]
  fn handle_falls_back_to_user() {
    let id = identity(Some(""), "@example.com");
    assert_eq!(id.handle(), "User");
  }

  #[test]
  fn default_avatar_is_seeded_by_user_id() {
    let id = identity(None, "a@b.c");
    assert!(id.avatar_or_default().contains(&id.user_id.to_string()));
  }
}
