//! Local credential-based [`AuthBackend`] over the `users` and
//! `active_session` tables.
//!
//! Passwords are stored as argon2 PHC strings and never leave this module.
//! The persisted `active_session` row is what [`AuthBackend::restore`] reads
//! at startup, standing in for the hosted service's session notification.

use argon2::{
  Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier as _,
  password_hash::SaltString,
};
use chrono::Utc;
use rand_core::OsRng;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use playdex_core::{
  Error as CoreError, Result as CoreResult,
  auth::{AuthBackend, OauthIdentity},
  identity::{Identity, MIN_PASSWORD_LEN, ProfileUpdate, ProviderKind, UserId},
};

use crate::{
  Error, Result, SqliteStore,
  encode::{RawUser, encode_dt, encode_provider, encode_uuid},
};

const USER_COLUMNS: &str =
  "user_id, email, display_name, avatar_url, provider, password_hash";

/// Minimal shape check; the authority on deliverability is the mail system,
/// not us.
fn validate_email(email: &str) -> CoreResult<()> {
  let valid = match email.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !email.contains(char::is_whitespace)
    }
    None => false,
  };
  if valid {
    Ok(())
  } else {
    Err(CoreError::InvalidEmail(email.to_owned()))
  }
}

fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::Password(e.to_string()))
}

/// Any verification failure (malformed hash included) reads as a mismatch.
fn verify_password(hash: &str, password: &str) -> bool {
  PasswordHash::new(hash)
    .map(|parsed| {
      Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
    })
    .unwrap_or(false)
}

fn check_strength(password: &str) -> CoreResult<()> {
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(CoreError::WeakPassword(MIN_PASSWORD_LEN));
  }
  Ok(())
}

impl SqliteStore {
  async fn user_row_by_email(&self, email: &str) -> Result<Option<RawUser>> {
    let email = email.to_owned();
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
              rusqlite::params![email],
              read_user_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }

  async fn user_row_by_id(&self, user: UserId) -> Result<Option<RawUser>> {
    let id_str = encode_uuid(user.0);
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
              rusqlite::params![id_str],
              read_user_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }

  /// Record `user` as the store's persisted sign-in.
  async fn set_active_session(&self, user: UserId) -> Result<()> {
    let id_str = encode_uuid(user.0);
    let at_str = encode_dt(Utc::now());
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO active_session (slot, user_id, signed_in_at)
           VALUES (0, ?1, ?2)
           ON CONFLICT (slot) DO UPDATE SET user_id = ?1, signed_in_at = ?2",
          rusqlite::params![id_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn read_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:       row.get(0)?,
    email:         row.get(1)?,
    display_name:  row.get(2)?,
    avatar_url:    row.get(3)?,
    provider:      row.get(4)?,
    password_hash: row.get(5)?,
  })
}

// ─── AuthBackend impl ────────────────────────────────────────────────────────

impl AuthBackend for SqliteStore {
  async fn sign_up(
    &self,
    email: &str,
    password: &str,
    display_name: Option<&str>,
  ) -> CoreResult<Identity> {
    validate_email(email)?;
    check_strength(password)?;

    if self.user_row_by_email(email).await?.is_some() {
      return Err(CoreError::EmailInUse);
    }

    let identity = Identity {
      user_id:      UserId::new(),
      email:        email.to_owned(),
      display_name: display_name.map(str::to_owned),
      avatar_url:   None,
      provider:     ProviderKind::Password,
    };

    let id_str   = encode_uuid(identity.user_id.0);
    let email    = identity.email.clone();
    let name     = identity.display_name.clone();
    let hash     = hash_password(password)?;
    let now_str  = encode_dt(Utc::now());
    let provider = encode_provider(identity.provider).to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (
             user_id, email, display_name, avatar_url, provider,
             password_hash, created_at, updated_at
           ) VALUES (?1, ?2, ?3, NULL, ?4, ?5, ?6, ?6)",
          rusqlite::params![id_str, email, name, provider, hash, now_str],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::from)?;

    // Signing up also signs in, as the hosted service does.
    self.set_active_session(identity.user_id).await?;
    Ok(identity)
  }

  async fn sign_in(&self, email: &str, password: &str) -> CoreResult<Identity> {
    let raw = self
      .user_row_by_email(email)
      .await?
      .ok_or(CoreError::InvalidCredentials)?;

    // An OAuth-only account has no hash; a password attempt against it
    // reads as a plain credential failure.
    let hash = raw
      .password_hash
      .as_deref()
      .ok_or(CoreError::InvalidCredentials)?;
    if !verify_password(hash, password) {
      return Err(CoreError::InvalidCredentials);
    }

    let identity = raw.into_identity()?;
    self.set_active_session(identity.user_id).await?;
    Ok(identity)
  }

  async fn sign_in_oauth(&self, oauth: OauthIdentity) -> CoreResult<Identity> {
    let identity = match self.user_row_by_email(&oauth.email).await? {
      Some(raw) => {
        let existing = raw.into_identity()?;
        // Refresh profile attributes the provider reports.
        let update = ProfileUpdate {
          display_name: oauth.display_name,
          avatar_url:   oauth.avatar_url,
        };
        self.update_profile(existing.user_id, update).await?
      }
      None => {
        let identity = Identity {
          user_id:      UserId::new(),
          email:        oauth.email,
          display_name: oauth.display_name,
          avatar_url:   oauth.avatar_url,
          provider:     oauth.provider,
        };

        let id_str   = encode_uuid(identity.user_id.0);
        let email    = identity.email.clone();
        let name     = identity.display_name.clone();
        let avatar   = identity.avatar_url.clone();
        let provider = encode_provider(identity.provider).to_owned();
        let now_str  = encode_dt(Utc::now());

        self
          .conn
          .call(move |conn| {
            conn.execute(
              "INSERT INTO users (
                 user_id, email, display_name, avatar_url, provider,
                 password_hash, created_at, updated_at
               ) VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, ?6)",
              rusqlite::params![id_str, email, name, avatar, provider, now_str],
            )?;
            Ok(())
          })
          .await
          .map_err(Error::from)?;

        identity
      }
    };

    self.set_active_session(identity.user_id).await?;
    Ok(identity)
  }

  async fn restore(&self) -> CoreResult<Option<Identity>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT u.user_id, u.email, u.display_name, u.avatar_url,
                      u.provider, u.password_hash
               FROM active_session s
               JOIN users u ON u.user_id = s.user_id
               WHERE s.slot = 0",
              [],
              read_user_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::from)?;

    Ok(raw.map(RawUser::into_identity).transpose()?)
  }

  async fn sign_out(&self) -> CoreResult<()> {
    self
      .conn
      .call(|conn| {
        conn.execute("DELETE FROM active_session WHERE slot = 0", [])?;
        Ok(())
      })
      .await
      .map_err(Error::from)?;
    Ok(())
  }

  async fn reauthenticate(&self, user: UserId, password: &str) -> CoreResult<()> {
    let raw = self
      .user_row_by_id(user)
      .await?
      .ok_or(CoreError::UserNotFound)?;

    let hash = raw
      .password_hash
      .as_deref()
      .ok_or(CoreError::Unsupported("password verification for an OAuth-only account"))?;

    if !verify_password(hash, password) {
      return Err(CoreError::InvalidCredentials);
    }
    Ok(())
  }

  async fn set_password(&self, user: UserId, new_password: &str) -> CoreResult<()> {
    check_strength(new_password)?;

    let raw = self
      .user_row_by_id(user)
      .await?
      .ok_or(CoreError::UserNotFound)?;
    if raw.password_hash.is_none() {
      return Err(CoreError::Unsupported("changing the password of an OAuth-only account"));
    }

    let id_str  = encode_uuid(user.0);
    let hash    = hash_password(new_password)?;
    let now_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET password_hash = ?2, updated_at = ?3 WHERE user_id = ?1",
          rusqlite::params![id_str, hash, now_str],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::from)?;
    Ok(())
  }

  async fn update_profile(
    &self,
    user: UserId,
    update: ProfileUpdate,
  ) -> CoreResult<Identity> {
    if self.user_row_by_id(user).await?.is_none() {
      return Err(CoreError::UserNotFound);
    }

    let id_str  = encode_uuid(user.0);
    let name    = update.display_name;
    let avatar  = update.avatar_url;
    let now_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET
             display_name = COALESCE(?2, display_name),
             avatar_url   = COALESCE(?3, avatar_url),
             updated_at   = ?4
           WHERE user_id = ?1",
          rusqlite::params![id_str, name, avatar, now_str],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::from)?;

    let raw = self
      .user_row_by_id(user)
      .await?
      .ok_or(CoreError::UserNotFound)?;
    Ok(raw.into_identity()?)
  }

  async fn request_password_reset(&self, email: &str) -> CoreResult<()> {
    // Deliberately indistinguishable for unknown addresses, so the
    // operation cannot be used to enumerate accounts.
    match self.user_row_by_email(email).await? {
      Some(raw) => {
        let token   = encode_uuid(Uuid::new_v4());
        let user_id = raw.user_id.clone();
        let now_str = encode_dt(Utc::now());
        self
          .conn
          .call(move |conn| {
            conn.execute(
              "INSERT INTO password_resets (token, user_id, requested_at)
               VALUES (?1, ?2, ?3)",
              rusqlite::params![token, user_id, now_str],
            )?;
            Ok(())
          })
          .await
          .map_err(Error::from)?;
        tracing::info!(user = %raw.user_id, "password reset requested");
      }
      None => {
        tracing::debug!("password reset requested for unknown email");
      }
    }
    Ok(())
  }

  async fn delete_account(&self, user: UserId) -> CoreResult<()> {
    let id_str = encode_uuid(user.0);

    let removed = self
      .conn
      .call(move |conn| {
        // Cascades over active_session, password_resets, favorites and
        // comments.
        Ok(conn.execute(
          "DELETE FROM users WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await
      .map_err(Error::from)?;

    if removed == 0 {
      return Err(CoreError::UserNotFound);
    }
    Ok(())
  }
}
