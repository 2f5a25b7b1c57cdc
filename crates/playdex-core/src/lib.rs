//! Core types and trait definitions for the playdex game catalog.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod auth;
pub mod catalog;
pub mod comment;
pub mod error;
pub mod favorite;
pub mod game;
pub mod identity;
pub mod session;
pub mod store;

pub use error::{Error, Result};
pub use identity::{Identity, ProviderKind, UserId};
pub use session::Session;
