//! The `AuthBackend` and `OauthFlow` traits.
//!
//! Unlike the store traits, `AuthBackend` returns the unified
//! [`Error`](crate::Error) directly: the session layer pattern-matches
//! credential variants (wrong password vs. unknown account vs. weak
//! password), so an opaque associated error type would not do.

use std::future::Future;

use crate::{
  error::Result,
  identity::{Identity, ProfileUpdate, ProviderKind, UserId},
};

/// Identity attributes reported by a completed third-party OAuth flow.
#[derive(Debug, Clone, PartialEq)]
pub struct OauthIdentity {
  pub provider:     ProviderKind,
  pub email:        String,
  pub display_name: Option<String>,
  pub avatar_url:   Option<String>,
}

/// Credential and identity operations of the auth service.
pub trait AuthBackend: Send + Sync {
  /// Create a credential-based identity and set its display name.
  fn sign_up<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
    display_name: Option<&'a str>,
  ) -> impl Future<Output = Result<Identity>> + Send + 'a;

  /// Authenticate with an email + password credential.
  fn sign_in<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Identity>> + Send + 'a;

  /// Record a completed OAuth sign-in, creating the identity on first use.
  fn sign_in_oauth(
    &self,
    oauth: OauthIdentity,
  ) -> impl Future<Output = Result<Identity>> + Send + '_;

  /// The identity persisted from a previous sign-in, if any. May be slow
  /// (the hosted service round-trips); the session layer bounds the wait.
  fn restore(&self) -> impl Future<Output = Result<Option<Identity>>> + Send + '_;

  /// Clear the persisted sign-in.
  fn sign_out(&self) -> impl Future<Output = Result<()>> + Send + '_;

  /// Verify the current password for a signed-in user. Precedes
  /// password changes and account deletion.
  fn reauthenticate<'a>(
    &'a self,
    user: UserId,
    password: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Replace the password. The caller re-authenticates first.
  fn set_password<'a>(
    &'a self,
    user: UserId,
    new_password: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Apply partial profile fields and return the updated identity.
  fn update_profile(
    &self,
    user: UserId,
    update: ProfileUpdate,
  ) -> impl Future<Output = Result<Identity>> + Send + '_;

  /// Send (or queue) a password-reset message for `email`.
  fn request_password_reset<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Delete the identity record itself. Side-store documents are purged
  /// by the session layer before this is called.
  fn delete_account(
    &self,
    user: UserId,
  ) -> impl Future<Output = Result<()>> + Send + '_;
}

/// A third-party interactive sign-in flow (a popup in the original client).
///
/// Implementations may block indefinitely on user interaction; the session
/// layer races them against a fixed timeout.
pub trait OauthFlow: Send + Sync {
  fn provider(&self) -> ProviderKind;

  /// Run the flow to completion and report the authenticated identity.
  fn authenticate(&self) -> impl Future<Output = Result<OauthIdentity>> + Send + '_;
}
