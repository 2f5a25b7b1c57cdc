//! HTTP client for the external game-metadata catalog.
//!
//! Implements [`playdex_core::catalog::CatalogSource`] over the RAWG-style
//! REST API: JSON responses with a `results` array and a `next`-page link,
//! every request carrying an API key.

mod client;
mod dto;

pub mod error;

pub use client::{CatalogClient, CatalogConfig};
pub use error::{Error, Result};
