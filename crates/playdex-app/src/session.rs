//! [`SessionStore`] — the single source of truth for "who is signed in".
//!
//! State machine: `Loading → {Authenticated, Anonymous}`, then
//! sign-in/sign-out transitions for the rest of the process lifetime.
//!
//! # The loading timeout
//!
//! At construction a restore task races the backend against a fixed bound.
//! If the bound expires first, `Anonymous` is published so the UI stops
//! blocking, and the still-running restore corrects the state when it
//! finally lands. This is a deliberate availability-over-consistency
//! tradeoff: on a slow network a legitimately signed-in user is momentarily
//! treated as anonymous.

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;

use playdex_core::{
  Error, Result, Session,
  auth::{AuthBackend, OauthFlow},
  identity::{Identity, ProfileUpdate},
  store::{CommentStore, FavoriteStore},
};

/// How long the initial restore may block the UI in the `Loading` phase.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// How long an interactive OAuth flow may run before it is abandoned.
pub const OAUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Owns the process-wide [`Session`] and the identity lifecycle operations.
///
/// Cloning is cheap; all clones publish to the same channel.
pub struct SessionStore<A> {
  backend: Arc<A>,
  tx:      watch::Sender<Session>,
}

impl<A> Clone for SessionStore<A> {
  fn clone(&self) -> Self {
    Self {
      backend: Arc::clone(&self.backend),
      tx:      self.tx.clone(),
    }
  }
}

impl<A: AuthBackend + 'static> SessionStore<A> {
  /// Start in `Loading` and spawn the restore race with the default bound.
  pub fn new(backend: Arc<A>) -> Self {
    Self::with_load_timeout(backend, DEFAULT_LOAD_TIMEOUT)
  }

  pub fn with_load_timeout(backend: Arc<A>, bound: Duration) -> Self {
    let (tx, _rx) = watch::channel(Session::Loading);
    let store = Self { backend, tx };
    store.spawn_restore(bound);
    store
  }

  fn spawn_restore(&self, bound: Duration) {
    let backend = Arc::clone(&self.backend);
    let tx = self.tx.clone();

    tokio::spawn(async move {
      let restore = backend.restore();
      tokio::pin!(restore);

      let early = tokio::select! {
        res = &mut restore => Some(res),
        _ = tokio::time::sleep(bound) => None,
      };

      // The restore outcome only ever resolves the `Loading` phase. An
      // explicit sign-in or sign-out that happened meanwhile wins over
      // the stale restore result.
      match early {
        Some(Ok(Some(identity))) => {
          tracing::info!(user = %identity.user_id, "session restored");
          settle_loading(&tx, Session::Authenticated(identity));
        }
        Some(Ok(None)) => {
          settle_loading(&tx, Session::Anonymous);
        }
        Some(Err(e)) => {
          tracing::warn!(error = %e, "session restore failed");
          settle_loading(&tx, Session::Anonymous);
        }
        None => {
          // Bound expired: stop blocking the UI, but keep waiting so the
          // late answer can still upgrade the session.
          tracing::warn!(?bound, "session restore exceeded the loading bound");
          let timed_out = settle_loading(&tx, Session::Anonymous);

          match restore.await {
            Ok(Some(identity)) if timed_out => {
              tx.send_if_modified(|session| match session {
                Session::Anonymous => {
                  tracing::info!(user = %identity.user_id, "late session restore");
                  *session = Session::Authenticated(identity.clone());
                  true
                }
                _ => false,
              });
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "late session restore failed"),
          }
        }
      }
    });
  }

  /// Subscribe to session transitions. The receiver always holds the
  /// latest state; `unsubscribe` is dropping it.
  pub fn subscribe(&self) -> watch::Receiver<Session> {
    self.tx.subscribe()
  }

  /// Snapshot of the current session.
  pub fn current(&self) -> Session {
    self.tx.borrow().clone()
  }

  fn current_identity(&self) -> Result<Identity> {
    self.tx.borrow().require_identity().cloned()
  }

  // ── Lifecycle operations ──────────────────────────────────────────────

  /// Create a credential account; a successful sign-up also signs in.
  pub async fn sign_up(
    &self,
    email: &str,
    password: &str,
    display_name: Option<&str>,
  ) -> Result<Identity> {
    let identity = self.backend.sign_up(email, password, display_name).await?;
    tracing::info!(user = %identity.user_id, "signed up");
    self.tx.send_replace(Session::Authenticated(identity.clone()));
    Ok(identity)
  }

  pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
    let identity = self.backend.sign_in(email, password).await?;
    tracing::info!(user = %identity.user_id, "signed in");
    self.tx.send_replace(Session::Authenticated(identity.clone()));
    Ok(identity)
  }

  /// Run a third-party sign-in flow, bounded by [`OAUTH_TIMEOUT`].
  ///
  /// On timeout the session is left untouched; the orphaned flow's result
  /// is discarded.
  pub async fn sign_in_with_oauth<F: OauthFlow>(&self, flow: &F) -> Result<Identity> {
    let oauth = tokio::time::timeout(OAUTH_TIMEOUT, flow.authenticate())
      .await
      .map_err(|_| Error::Timeout("the OAuth provider"))??;

    let identity = self.backend.sign_in_oauth(oauth).await?;
    tracing::info!(user = %identity.user_id, provider = ?identity.provider, "signed in via OAuth");
    self.tx.send_replace(Session::Authenticated(identity.clone()));
    Ok(identity)
  }

  /// Clear the identity. The original client follows this with a full
  /// reload to the root route; here the published `Anonymous` state is the
  /// reset.
  pub async fn sign_out(&self) -> Result<()> {
    self.backend.sign_out().await?;
    tracing::info!("signed out");
    self.tx.send_replace(Session::Anonymous);
    Ok(())
  }

  pub async fn request_password_reset(&self, email: &str) -> Result<()> {
    self.backend.request_password_reset(email).await
  }

  /// Re-authenticate with the current credential, then update it.
  pub async fn change_password(
    &self,
    current_password: &str,
    new_password: &str,
  ) -> Result<()> {
    let identity = self.current_identity()?;
    self
      .backend
      .reauthenticate(identity.user_id, current_password)
      .await?;
    self.backend.set_password(identity.user_id, new_password).await
  }

  /// Apply partial profile fields and publish the refreshed identity.
  pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Identity> {
    let identity = self.current_identity()?;
    let updated = self.backend.update_profile(identity.user_id, update).await?;
    self.tx.send_replace(Session::Authenticated(updated.clone()));
    Ok(updated)
  }

  /// Delete the signed-in account and its side-store documents.
  ///
  /// Forbidden for OAuth-only identities: there is no password to verify.
  pub async fn delete_account<F, C>(
    &self,
    password: &str,
    favorites: &F,
    comments: &C,
  ) -> Result<()>
  where
    F: FavoriteStore,
    C: CommentStore,
  {
    let identity = self.current_identity()?;
    if identity.is_oauth() {
      return Err(Error::Unsupported(
        "deleting an account that signs in through OAuth",
      ));
    }

    self.backend.reauthenticate(identity.user_id, password).await?;

    let removed_favorites = favorites
      .purge_favorites(identity.user_id)
      .await
      .map_err(Error::storage)?;
    let removed_comments = comments
      .purge_comments(identity.user_id)
      .await
      .map_err(Error::storage)?;
    self.backend.delete_account(identity.user_id).await?;

    tracing::info!(
      user = %identity.user_id,
      removed_favorites,
      removed_comments,
      "account deleted"
    );
    self.tx.send_replace(Session::Anonymous);
    Ok(())
  }
}

/// Resolve the `Loading` phase to `next`. A session already moved past
/// `Loading` by an explicit operation is left untouched. Returns whether
/// the transition was applied.
fn settle_loading(tx: &watch::Sender<Session>, next: Session) -> bool {
  tx.send_if_modified(|session| match session {
    Session::Loading => {
      *session = next.clone();
      true
    }
    _ => false,
  })
}
