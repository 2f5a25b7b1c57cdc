//! Service layer for playdex.
//!
//! Wires any [`playdex_core::auth::AuthBackend`], store backends, and a
//! [`playdex_core::catalog::CatalogSource`] into the operations the UI
//! consumes: the session lifecycle, authenticated favorite/comment
//! services, and the profile aggregation.
//!
//! The session is the only push-based piece: [`SessionStore`] owns a
//! `tokio::sync::watch` channel, the single writer; every other component
//! holds a receiver and reads the current state on demand.

pub mod comments;
pub mod favorites;
pub mod profile;
pub mod session;

pub use comments::Comments;
pub use favorites::Favorites;
pub use profile::{
  CommentCard, FavoriteCard, ProfileLimits, ProfileView, build_profile,
};
pub use session::{DEFAULT_LOAD_TIMEOUT, OAUTH_TIMEOUT, SessionStore};
