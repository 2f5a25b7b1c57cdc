//! SQLite backend for the playdex stores.
//!
//! Implements [`playdex_core::store::FavoriteStore`],
//! [`playdex_core::store::CommentStore`], and a local credential-based
//! [`playdex_core::auth::AuthBackend`]. Wraps [`tokio_rusqlite`] so all
//! database access runs on a dedicated thread without blocking the async
//! runtime.

mod auth;
mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
